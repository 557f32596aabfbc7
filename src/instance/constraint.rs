use core::fmt;
use std::hash::Hasher;

use super::{LinearExpr, Literal};

pub type ConstraintId = usize;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// `expr == rhs`, enforced only while `enforcement` (if any) is true
    LinearEq {
        expr: LinearExpr,
        rhs: i64,
        enforcement: Option<Literal>,
    },
    /// At least one of the literals is true
    BoolOr(Vec<Literal>),
}

#[derive(Clone, Eq)]
pub struct Constraint {
    id: ConstraintId,
    kind: ConstraintKind,
}

impl std::hash::Hash for Constraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::cmp::PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Constraint {
    pub(crate) fn new_with_id(id: ConstraintId, kind: ConstraintKind) -> Constraint {
        let kind = match kind {
            ConstraintKind::BoolOr(mut literals) => {
                literals.sort_by_key(|l| l.var());
                ConstraintKind::BoolOr(literals)
            }
            linear => linear,
        };
        Constraint { id, kind }
    }

    pub fn id(&self) -> ConstraintId {
        self.id
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    pub fn is_disjunction(&self) -> bool {
        matches!(self.kind, ConstraintKind::BoolOr(_))
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ConstraintKind::LinearEq {
                expr,
                rhs,
                enforcement,
            } => {
                if let Some(lit) = enforcement {
                    write!(f, "{:?} => ", lit)?;
                }
                write!(f, "{:?} == {}", expr, rhs)
            }
            ConstraintKind::BoolOr(literals) => {
                write!(f, "or(")?;
                let mut fst = true;
                for &lit in literals {
                    if !fst {
                        write!(f, ", ")?;
                    }
                    fst = false;
                    write!(f, "{:?}", lit)?;
                }
                write!(f, ")")
            }
        }
    }
}
