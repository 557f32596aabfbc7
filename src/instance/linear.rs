use std::fmt;

use super::IntVar;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinearTerm {
    pub coefficient: i64,
    pub var: IntVar,
}

/// A weighted sum of integer variables. Terms are kept sorted by variable, with duplicate
/// variables merged and zero coefficients dropped.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct LinearExpr {
    terms: Vec<LinearTerm>,
}

impl LinearExpr {
    pub fn new() -> LinearExpr {
        LinearExpr { terms: vec![] }
    }

    pub fn from_terms<I>(terms: I) -> LinearExpr
    where
        I: IntoIterator<Item = (i64, IntVar)>,
    {
        terms
            .into_iter()
            .fold(LinearExpr::new(), |expr, (coefficient, var)| {
                expr.term(coefficient, var)
            })
    }

    pub fn term(mut self, coefficient: i64, var: IntVar) -> LinearExpr {
        match self.terms.binary_search_by_key(&var, |t| t.var) {
            Ok(ix) => {
                self.terms[ix].coefficient += coefficient;
                if self.terms[ix].coefficient == 0 {
                    self.terms.remove(ix);
                }
            }
            Err(ix) => {
                if coefficient != 0 {
                    self.terms.insert(ix, LinearTerm { coefficient, var });
                }
            }
        }
        self
    }

    pub fn plus(self, var: IntVar) -> LinearExpr {
        self.term(1, var)
    }

    pub fn minus(self, var: IntVar) -> LinearExpr {
        self.term(-1, var)
    }

    pub fn terms(&self) -> &[LinearTerm] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn vars(&self) -> impl Iterator<Item = IntVar> + '_ {
        self.terms.iter().map(|t| t.var)
    }

    pub fn coefficient(&self, var: IntVar) -> Option<i64> {
        self.terms
            .binary_search_by_key(&var, |t| t.var)
            .ok()
            .map(|ix| self.terms[ix].coefficient)
    }

    pub fn evaluate<F>(&self, value: F) -> i64
    where
        F: Fn(IntVar) -> i64,
    {
        self.terms
            .iter()
            .map(|t| t.coefficient * value(t.var))
            .sum()
    }
}

impl fmt::Debug for LinearExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (ix, term) in self.terms.iter().enumerate() {
            let magnitude = term.coefficient.abs();
            match (ix, term.coefficient < 0) {
                (0, false) => {}
                (0, true) => write!(f, "-")?,
                (_, false) => write!(f, " + ")?,
                (_, true) => write!(f, " - ")?,
            }
            if magnitude != 1 {
                write!(f, "{}*", magnitude)?;
            }
            write!(f, "{:?}", term.var)?;
        }
        Ok(())
    }
}
