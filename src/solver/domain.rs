use core::fmt;

use crate::instance::*;
use crate::variable_registry::VariableRegister;

/// Current bounds of every integer variable and the value (if any) of every boolean.
#[derive(Clone)]
pub(crate) struct DomainStore {
    lower: Vec<i64>,
    upper: Vec<i64>,
    bools: Vec<Option<bool>>,
}

impl DomainStore {
    pub(crate) fn new(variables: &VariableRegister) -> DomainStore {
        let (lower, upper) = variables
            .iter_int()
            .map(|var| variables.int_domain(var))
            .unzip();
        DomainStore {
            lower,
            upper,
            bools: vec![None; variables.bool_count()],
        }
    }

    pub(crate) fn lb(&self, var: IntVar) -> i64 {
        self.lower[var.index()]
    }

    pub(crate) fn ub(&self, var: IntVar) -> i64 {
        self.upper[var.index()]
    }

    pub(crate) fn is_fixed(&self, var: IntVar) -> bool {
        self.lb(var) == self.ub(var)
    }

    pub(crate) fn bool_value(&self, var: BoolVar) -> Option<bool> {
        self.bools[var.index()]
    }

    pub(crate) fn literal_value(&self, lit: Literal) -> Option<bool> {
        self.bool_value(lit.var()).map(|value| lit.under(value))
    }

    pub(crate) fn int_vars(&self) -> impl Iterator<Item = IntVar> + '_ {
        (0..self.lower.len()).map(|ix| IntVar(ix as u64))
    }

    pub(crate) fn bool_vars(&self) -> impl Iterator<Item = BoolVar> + '_ {
        (0..self.bools.len()).map(|ix| BoolVar(ix as u64))
    }

    pub(crate) fn term_min(&self, term: &LinearTerm) -> i64 {
        if term.coefficient > 0 {
            term.coefficient * self.lb(term.var)
        } else {
            term.coefficient * self.ub(term.var)
        }
    }

    pub(crate) fn term_max(&self, term: &LinearTerm) -> i64 {
        if term.coefficient > 0 {
            term.coefficient * self.ub(term.var)
        } else {
            term.coefficient * self.lb(term.var)
        }
    }

    /// The smallest and largest values the expression can take under the current bounds
    pub(crate) fn sum_bounds(&self, expr: &LinearExpr) -> (i64, i64) {
        expr.terms().iter().fold((0, 0), |(min, max), term| {
            (min + self.term_min(term), max + self.term_max(term))
        })
    }

    pub(crate) fn can_equal(&self, expr: &LinearExpr, rhs: i64) -> bool {
        let (min, max) = self.sum_bounds(expr);
        min <= rhs && rhs <= max
    }

    // Raw setters. Callers go through the trail so that changes can be undone.
    pub(crate) fn set_lower(&mut self, var: IntVar, value: i64) {
        self.lower[var.index()] = value;
    }

    pub(crate) fn set_upper(&mut self, var: IntVar, value: i64) {
        self.upper[var.index()] = value;
    }

    pub(crate) fn set_bool(&mut self, var: BoolVar, value: Option<bool>) {
        self.bools[var.index()] = value;
    }

    pub(crate) fn evaluate(&self, constraint: &Constraint) -> EvaluationResult {
        match constraint.kind() {
            ConstraintKind::LinearEq {
                expr,
                rhs,
                enforcement,
            } => {
                let enforced = match enforcement {
                    None => Some(true),
                    Some(lit) => self.literal_value(*lit),
                };
                if enforced == Some(false) {
                    return EvaluationResult::True;
                }
                let (min, max) = self.sum_bounds(expr);
                if min == max && min == *rhs {
                    EvaluationResult::True
                } else if enforced == Some(true) && (min == max || !self.can_equal(expr, *rhs)) {
                    EvaluationResult::False
                } else {
                    EvaluationResult::Unknown
                }
            }
            ConstraintKind::BoolOr(literals) => {
                let mut result = EvaluationResult::False;
                for &lit in literals {
                    match self.literal_value(lit) {
                        Some(true) => return EvaluationResult::True,
                        Some(false) => {}
                        None => result = EvaluationResult::Unknown,
                    }
                }
                result
            }
        }
    }
}

impl fmt::Debug for DomainStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut fst = true;
        for var in self.int_vars() {
            if !fst {
                write!(f, ", ")?;
            }
            fst = false;
            if self.is_fixed(var) {
                write!(f, "{:?}={}", var, self.lb(var))?;
            } else {
                write!(f, "{:?}=[{}, {}]", var, self.lb(var), self.ub(var))?;
            }
        }
        let assigned = self
            .bool_vars()
            .filter(|&var| self.bool_value(var).is_some())
            .count();
        write!(f, "; {}/{} bools assigned", assigned, self.bools.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum EvaluationResult {
    True,
    False,
    Unknown,
}

#[cfg(test)]
mod test {
    use super::*;

    fn store() -> (DomainStore, IntVar, IntVar, BoolVar) {
        let mut reg = VariableRegister::new();
        let x = reg.create_int("x", 0, 4);
        let y = reg.create_int("y", 2, 3);
        let b = reg.create_bool("b");
        (DomainStore::new(&reg), x, y, b)
    }

    #[test]
    fn test_sum_bounds() {
        let (domains, x, y, _) = store();
        let expr = LinearExpr::new().plus(x).minus(y);
        assert_eq!(domains.sum_bounds(&expr), (-3, 2));
        assert!(domains.can_equal(&expr, 2));
        assert!(!domains.can_equal(&expr, 3));
    }

    #[test]
    fn test_evaluate_enforced_linear() {
        let (mut domains, x, y, b) = store();
        let sel = Literal::positive(b);
        let constraint = Constraint::new_with_id(
            0,
            ConstraintKind::LinearEq {
                expr: LinearExpr::new().plus(x).plus(y),
                rhs: 5,
                enforcement: Some(sel),
            },
        );
        assert_eq!(domains.evaluate(&constraint), EvaluationResult::Unknown);

        domains.set_lower(x, 1);
        domains.set_upper(x, 1);
        domains.set_upper(y, 2);
        // 1 + 2 != 5, but nothing forces the selector
        assert_eq!(domains.evaluate(&constraint), EvaluationResult::Unknown);

        domains.set_bool(b, Some(true));
        assert_eq!(domains.evaluate(&constraint), EvaluationResult::False);

        domains.set_bool(b, Some(false));
        assert_eq!(domains.evaluate(&constraint), EvaluationResult::True);
    }

    #[test]
    fn test_evaluate_disjunction() {
        let (mut domains, _, _, b) = store();
        let constraint = Constraint::new_with_id(
            0,
            ConstraintKind::BoolOr(vec![Literal::positive(b)]),
        );
        assert_eq!(domains.evaluate(&constraint), EvaluationResult::Unknown);
        domains.set_bool(b, Some(false));
        assert_eq!(domains.evaluate(&constraint), EvaluationResult::False);

        let empty = Constraint::new_with_id(1, ConstraintKind::BoolOr(vec![]));
        assert_eq!(domains.evaluate(&empty), EvaluationResult::False);
    }
}
