use log::debug;
use thiserror::Error;

use crate::instance::*;
use crate::solver::Instance;
use crate::variable_registry::VariableRegister;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("variable {name} has an empty domain [{lo}, {hi}]")]
    EmptyDomain { name: String, lo: i64, hi: i64 },
    #[error("constraint {0} references a variable that was not created by this builder")]
    UnknownVariable(ConstraintId),
}

/// Collects variables and constraints, and compiles them into an [`Instance`].
#[derive(Clone, Debug)]
pub struct ProblemBuilder {
    variables: VariableRegister,
    constraints: Vec<ConstraintKind>,
}

impl ProblemBuilder {
    pub fn new() -> ProblemBuilder {
        ProblemBuilder {
            variables: VariableRegister::new(),
            constraints: vec![],
        }
    }

    pub fn int_var(&mut self, name: &str, lo: i64, hi: i64) -> Result<IntVar, ModelError> {
        if lo > hi {
            return Err(ModelError::EmptyDomain {
                name: name.to_string(),
                lo,
                hi,
            });
        }
        Ok(self.variables.create_int(name, lo, hi))
    }

    pub fn bool_var(&mut self, name: &str) -> Literal {
        Literal::positive(self.variables.create_bool(name))
    }

    pub fn require_linear_eq(&mut self, expr: LinearExpr, rhs: i64) {
        self.constraints.push(ConstraintKind::LinearEq {
            expr,
            rhs,
            enforcement: None,
        });
    }

    /// Half-reification: `expr == rhs` must hold whenever `enforcement` is true. Nothing is
    /// implied when the equality holds and the literal is false.
    pub fn require_linear_eq_if(&mut self, enforcement: Literal, expr: LinearExpr, rhs: i64) {
        self.constraints.push(ConstraintKind::LinearEq {
            expr,
            rhs,
            enforcement: Some(enforcement),
        });
    }

    /// At least one literal must be true. An empty list can never be satisfied.
    pub fn require_any(&mut self, literals: &[Literal]) {
        self.constraints.push(ConstraintKind::BoolOr(literals.to_vec()));
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn build(self) -> Result<Instance, ModelError> {
        let ProblemBuilder {
            variables,
            constraints: kinds,
        } = self;

        let mut constraints = Vec::with_capacity(kinds.len());
        for (id, kind) in kinds.into_iter().enumerate() {
            if !references_known_vars(&variables, &kind) {
                return Err(ModelError::UnknownVariable(id));
            }
            constraints.push(Constraint::new_with_id(id, kind));
        }
        debug!(
            "built instance: {} int vars, {} bool vars, {} constraints",
            variables.int_count(),
            variables.bool_count(),
            constraints.len()
        );
        Ok(Instance::new(constraints, variables))
    }
}

impl Default for ProblemBuilder {
    fn default() -> Self {
        ProblemBuilder::new()
    }
}

fn references_known_vars(variables: &VariableRegister, kind: &ConstraintKind) -> bool {
    match kind {
        ConstraintKind::LinearEq {
            expr, enforcement, ..
        } => {
            expr.vars().all(|v| variables.contains_int(v))
                && enforcement.map_or(true, |l| variables.contains_bool(l.var()))
        }
        ConstraintKind::BoolOr(literals) => {
            literals.iter().all(|l| variables.contains_bool(l.var()))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solver::{SearchParams, Solution, SolveStatus};

    #[test]
    fn test_build_unary_problem() {
        let mut pb = ProblemBuilder::new();

        let x = pb.int_var("x", 0, 3).unwrap();
        let y = pb.int_var("y", 0, 3).unwrap();
        let b = pb.bool_var("b");

        assert_ne!(x, y);
        assert_ne!(b.invert(), b);
        assert_eq!(pb.constraint_count(), 0);
    }

    #[test]
    fn test_empty_domain_is_rejected() {
        let mut pb = ProblemBuilder::new();
        assert_eq!(
            pb.int_var("x", 5, 4),
            Err(ModelError::EmptyDomain {
                name: "x".to_string(),
                lo: 5,
                hi: 4
            })
        );
    }

    #[test]
    fn test_foreign_variables_are_rejected() {
        let mut other = ProblemBuilder::new();
        other.int_var("a", 0, 1).unwrap();
        let foreign = other.int_var("b", 0, 1).unwrap();

        let mut pb = ProblemBuilder::new();
        pb.int_var("x", 0, 1).unwrap();
        pb.require_linear_eq(LinearExpr::new().plus(foreign), 1);

        assert_eq!(pb.build().err(), Some(ModelError::UnknownVariable(0)));
    }

    #[test]
    fn test_build_and_run_reified_choice() {
        // x + y == 5 or x - y == 3, with x, y in [0, 4]
        let mut pb = ProblemBuilder::new();
        let x = pb.int_var("x", 0, 4).unwrap();
        let y = pb.int_var("y", 0, 4).unwrap();
        let sum = pb.bool_var("sum");
        let diff = pb.bool_var("diff");

        pb.require_linear_eq_if(sum, LinearExpr::new().plus(x).plus(y), 5);
        pb.require_linear_eq_if(diff, LinearExpr::new().plus(x).minus(y), 3);
        pb.require_any(&[sum, diff]);
        assert_eq!(pb.constraint_count(), 3);

        let instance = pb.build().unwrap();
        let mut found = vec![];
        let result = instance.solve_with_callback(&SearchParams::default(), &mut |s: &Solution| {
            found.push((s.value(x), s.value(y)));
        });

        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(found, vec![(1, 4), (2, 3), (3, 0), (3, 2), (4, 1)]);
    }
}
