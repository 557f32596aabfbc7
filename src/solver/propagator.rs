use std::collections::VecDeque;

use itertools::Itertools;
use log::trace;

use crate::instance::*;

use super::constraint_index::ConstraintIndex;
use super::domain::DomainStore;
use super::trail::{DomainConflict, Trail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Conflict {
    pub(crate) constraint: ConstraintId,
    pub(crate) cause: Option<DomainConflict>,
}

impl Conflict {
    fn at(constraint: ConstraintId) -> Conflict {
        Conflict {
            constraint,
            cause: None,
        }
    }

    fn wipeout(constraint: ConstraintId) -> impl Fn(DomainConflict) -> Conflict {
        move |cause| Conflict {
            constraint,
            cause: Some(cause),
        }
    }
}

// The bounds a single disjunct places on one variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DisjunctBounds {
    Unrestricted,
    Empty,
    Within(i64, i64),
}

// c -> constraints
pub(crate) struct Propagator<'c> {
    constraints: &'c [Constraint],
    index: &'c ConstraintIndex,
    queue: VecDeque<ConstraintId>,
    queued: Vec<bool>,
    runs: u64,
}

impl<'c> Propagator<'c> {
    pub(crate) fn new(constraints: &'c [Constraint], index: &'c ConstraintIndex) -> Propagator<'c> {
        Propagator {
            constraints,
            index,
            queue: VecDeque::new(),
            queued: vec![false; constraints.len()],
            runs: 0,
        }
    }

    /// How many times a constraint has been propagated
    pub(crate) fn runs(&self) -> u64 {
        self.runs
    }

    pub(crate) fn enqueue_all(&mut self) {
        for id in 0..self.constraints.len() {
            self.enqueue(id);
        }
    }

    fn enqueue(&mut self, id: ConstraintId) {
        if !self.queued[id] {
            self.queued[id] = true;
            self.queue.push_back(id);
        }
    }

    fn clear(&mut self) {
        for id in self.queue.drain(..) {
            self.queued[id] = false;
        }
    }

    /// Runs every constraint touched by a domain change until nothing moves any more.
    pub(crate) fn propagate(&mut self, trail: &mut Trail) -> Result<(), Conflict> {
        let index = self.index;
        loop {
            for event in trail.take_events() {
                for &id in index.watchers(event) {
                    self.enqueue(id);
                }
            }
            let id = match self.queue.pop_front() {
                Some(id) => id,
                None => return Ok(()),
            };
            self.queued[id] = false;
            self.runs += 1;

            if let Err(conflict) = self.propagate_constraint(id, trail) {
                trace!("conflict: {:?}", conflict);
                self.clear();
                trail.take_events();
                return Err(conflict);
            }
        }
    }

    fn propagate_constraint(&self, id: ConstraintId, trail: &mut Trail) -> Result<(), Conflict> {
        let constraints = self.constraints;
        match constraints[id].kind() {
            ConstraintKind::LinearEq {
                expr,
                rhs,
                enforcement,
            } => self.propagate_linear(id, expr, *rhs, *enforcement, trail),
            ConstraintKind::BoolOr(literals) => self.propagate_disjunction(id, literals, trail),
        }
    }

    fn propagate_linear(
        &self,
        id: ConstraintId,
        expr: &LinearExpr,
        rhs: i64,
        enforcement: Option<Literal>,
        trail: &mut Trail,
    ) -> Result<(), Conflict> {
        if let Some(lit) = enforcement {
            match trail.domains().literal_value(lit) {
                Some(false) => return Ok(()),
                Some(true) => {}
                None => {
                    // Only the implication is enforced: a selector is switched off once its
                    // equality is impossible, never switched on.
                    if !trail.domains().can_equal(expr, rhs) {
                        trace!("{:?} disabled by {:?} == {}", lit, expr, rhs);
                        trail.assign(lit.invert()).map_err(Conflict::wipeout(id))?;
                    }
                    return Ok(());
                }
            }
        }

        let (min, max) = trail.domains().sum_bounds(expr);
        if rhs < min || rhs > max {
            return Err(Conflict::at(id));
        }
        // Terms are tightened against the bounds at the start of this pass. Any change re-queues
        // the constraint.
        for term in expr.terms() {
            let others_min = min - trail.domains().term_min(term);
            let others_max = max - trail.domains().term_max(term);
            let (lo, hi) = implied_bounds(term.coefficient, rhs - others_max, rhs - others_min);
            trail
                .set_lower(term.var, lo)
                .map_err(Conflict::wipeout(id))?;
            trail
                .set_upper(term.var, hi)
                .map_err(Conflict::wipeout(id))?;
        }
        Ok(())
    }

    fn propagate_disjunction(
        &self,
        id: ConstraintId,
        literals: &[Literal],
        trail: &mut Trail,
    ) -> Result<(), Conflict> {
        let mut live = vec![];
        for &lit in literals {
            match trail.domains().literal_value(lit) {
                Some(true) => return Ok(()),
                Some(false) => {}
                None => live.push(lit),
            }
        }

        match live.len() {
            0 => Err(Conflict::at(id)),
            1 => {
                trace!("unit: {:?}", live[0]);
                trail.assign(live[0]).map_err(Conflict::wipeout(id))?;
                Ok(())
            }
            _ => self.constructive_disjunction(id, &live, trail),
        }
    }

    /// Whichever live literal ends up true, its linears must hold. So a variable restricted by
    /// every disjunct can be narrowed to the hull of what each disjunct allows.
    fn constructive_disjunction(
        &self,
        id: ConstraintId,
        live: &[Literal],
        trail: &mut Trail,
    ) -> Result<(), Conflict> {
        if live.iter().any(|&lit| self.index.enforced_by(lit).is_empty()) {
            return Ok(());
        }
        let candidates = self
            .index
            .enforced_by(live[0])
            .iter()
            .flat_map(|&cid| self.linear(cid).map(|(expr, _)| expr.vars().collect_vec()))
            .flatten()
            .unique()
            .collect_vec();

        for var in candidates {
            if trail.domains().is_fixed(var) {
                continue;
            }
            let mut hull: Option<(i64, i64)> = None;
            let mut restricted = true;
            for &lit in live {
                match self.disjunct_bounds(lit, var, trail.domains()) {
                    DisjunctBounds::Unrestricted => {
                        restricted = false;
                        break;
                    }
                    DisjunctBounds::Empty => {}
                    DisjunctBounds::Within(lo, hi) => {
                        hull = Some(match hull {
                            None => (lo, hi),
                            Some((a, b)) => (a.min(lo), b.max(hi)),
                        });
                    }
                }
            }
            if !restricted {
                continue;
            }
            match hull {
                None => return Err(Conflict::at(id)),
                Some((lo, hi)) => {
                    if lo > trail.domains().lb(var) || hi < trail.domains().ub(var) {
                        trace!("hull of {:?}: [{}, {}]", var, lo, hi);
                    }
                    trail.set_lower(var, lo).map_err(Conflict::wipeout(id))?;
                    trail.set_upper(var, hi).map_err(Conflict::wipeout(id))?;
                }
            }
        }
        Ok(())
    }

    fn disjunct_bounds(&self, lit: Literal, var: IntVar, domains: &DomainStore) -> DisjunctBounds {
        let mut bounds = DisjunctBounds::Unrestricted;
        for &cid in self.index.enforced_by(lit) {
            let (expr, rhs) = match self.linear(cid) {
                Some(linear) => linear,
                None => continue,
            };
            if !domains.can_equal(expr, rhs) {
                return DisjunctBounds::Empty;
            }
            let (lo, hi) = match linear_bounds_for(domains, expr, rhs, var) {
                Some(implied) => implied,
                None => continue,
            };
            bounds = match bounds {
                DisjunctBounds::Unrestricted => DisjunctBounds::Within(lo, hi),
                DisjunctBounds::Within(a, b) => DisjunctBounds::Within(a.max(lo), b.min(hi)),
                DisjunctBounds::Empty => DisjunctBounds::Empty,
            };
            if let DisjunctBounds::Within(a, b) = bounds {
                if a > b {
                    return DisjunctBounds::Empty;
                }
            }
        }
        bounds
    }

    fn linear(&self, id: ConstraintId) -> Option<(&'c LinearExpr, i64)> {
        let constraints = self.constraints;
        match constraints[id].kind() {
            ConstraintKind::LinearEq { expr, rhs, .. } => Some((expr, *rhs)),
            ConstraintKind::BoolOr(_) => None,
        }
    }
}

/// The bounds `expr == rhs` implies for `var`, intersected with its current bounds. None if the
/// variable does not appear in the expression.
fn linear_bounds_for(
    domains: &DomainStore,
    expr: &LinearExpr,
    rhs: i64,
    var: IntVar,
) -> Option<(i64, i64)> {
    let term = expr.terms().iter().find(|t| t.var == var)?;
    let (min, max) = domains.sum_bounds(expr);
    let others_min = min - domains.term_min(term);
    let others_max = max - domains.term_max(term);
    let (lo, hi) = implied_bounds(term.coefficient, rhs - others_max, rhs - others_min);
    Some((lo.max(domains.lb(var)), hi.min(domains.ub(var))))
}

/// Bounds on `x` given `coefficient * x` lies in `[lo, hi]`
fn implied_bounds(coefficient: i64, lo: i64, hi: i64) -> (i64, i64) {
    if coefficient > 0 {
        (div_ceil(lo, coefficient), div_floor(hi, coefficient))
    } else {
        (div_ceil(hi, coefficient), div_floor(lo, coefficient))
    }
}

fn div_floor(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn div_ceil(a: i64, b: i64) -> i64 {
    -div_floor(-a, b)
}
