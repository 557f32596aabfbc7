use fnv::FnvHashMap;
use itertools::Itertools;

use crate::instance::*;

use super::trail::Event;

/// Watch lists: which constraints need another look when a variable's domain changes.
#[derive(Clone, Debug)]
pub(crate) struct ConstraintIndex {
    // Mapping from integer variable to the constraints that mention it
    by_int: Vec<Vec<ConstraintId>>,
    // Mapping from boolean variable to the constraints that mention it
    by_bool: Vec<Vec<ConstraintId>>,
    // The linear constraints each literal enforces
    enforced_by: FnvHashMap<Literal, Vec<ConstraintId>>,
}

impl ConstraintIndex {
    pub(crate) fn new(
        constraints: &[Constraint],
        int_count: usize,
        bool_count: usize,
    ) -> ConstraintIndex {
        let mut idx = ConstraintIndex {
            by_int: vec![vec![]; int_count],
            by_bool: vec![vec![]; bool_count],
            enforced_by: FnvHashMap::default(),
        };

        for constraint in constraints {
            if let ConstraintKind::LinearEq {
                expr, enforcement, ..
            } = constraint.kind()
            {
                for var in expr.vars() {
                    idx.by_int[var.index()].push(constraint.id());
                }
                if let Some(lit) = enforcement {
                    idx.by_bool[lit.var().index()].push(constraint.id());
                    idx.enforced_by
                        .entry(*lit)
                        .or_insert(vec![])
                        .push(constraint.id());
                }
            }
        }

        // Disjunctions also watch the integer variables of the linears their literals enforce, so
        // the hull of the disjuncts can be recomputed when bounds move.
        for constraint in constraints {
            if let ConstraintKind::BoolOr(literals) = constraint.kind() {
                for var in literals.iter().map(|l| l.var()).unique() {
                    idx.by_bool[var.index()].push(constraint.id());
                }
                let int_vars = literals
                    .iter()
                    .flat_map(|lit| idx.enforced_by(*lit).iter().copied())
                    .flat_map(|id| linear_vars(&constraints[id]))
                    .unique()
                    .collect_vec();
                for var in int_vars {
                    idx.by_int[var.index()].push(constraint.id());
                }
            }
        }

        idx
    }

    pub(crate) fn watchers(&self, event: Event) -> &[ConstraintId] {
        match event {
            Event::Int(var) => &self.by_int[var.index()],
            Event::Bool(var) => &self.by_bool[var.index()],
        }
    }

    pub(crate) fn enforced_by(&self, lit: Literal) -> &[ConstraintId] {
        self.enforced_by
            .get(&lit)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }
}

fn linear_vars(constraint: &Constraint) -> Vec<IntVar> {
    match constraint.kind() {
        ConstraintKind::LinearEq { expr, .. } => expr.vars().collect(),
        ConstraintKind::BoolOr(_) => vec![],
    }
}
