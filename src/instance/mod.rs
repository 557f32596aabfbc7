// The `instance` module contains the data model for the instance. These types are immutable.
mod variable;
pub use crate::instance::variable::{BoolVar, IntVar};

mod literal;
pub use crate::instance::literal::Literal;

mod linear;
pub use crate::instance::linear::{LinearExpr, LinearTerm};

mod constraint;
pub use crate::instance::constraint::{Constraint, ConstraintId, ConstraintKind};
