use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use log::{debug, trace};

use crate::instance::*;
use crate::variable_registry::VariableRegister;

use super::constraint_index::ConstraintIndex;
use super::domain::{DomainStore, EvaluationResult};
use super::params::SearchParams;
use super::propagator::Propagator;
use super::trail::{Decision, Trail};

/// Picks the next branching decision. Integer variables first, in creation order, splitting on
/// the lower bound; then any boolean left open.
#[derive(Debug, Clone)]
struct TraversalPath;

impl TraversalPath {
    fn next(&self, domains: &DomainStore) -> Option<(Decision, Decision)> {
        if let Some(var) = domains.int_vars().find(|&v| !domains.is_fixed(v)) {
            let lb = domains.lb(var);
            return Some((Decision::Fix(var, lb), Decision::AtLeast(var, lb + 1)));
        }
        domains
            .bool_vars()
            .find(|&v| domains.bool_value(v).is_none())
            .map(|var| {
                let lit = Literal::positive(var);
                (Decision::Assign(lit), Decision::Assign(lit.invert()))
            })
    }
}

/// Receives each solution as the search finds it.
pub trait SolutionCallback {
    fn on_solution(&mut self, solution: &Solution);
}

impl<F> SolutionCallback for F
where
    F: FnMut(&Solution),
{
    fn on_solution(&mut self, solution: &Solution) {
        self(solution)
    }
}

#[derive(Clone)]
pub struct Instance {
    pub(crate) variables: Rc<VariableRegister>,
    pub(crate) constraints: Vec<Constraint>,
}

impl Instance {
    pub(crate) fn new(constraints: Vec<Constraint>, variables: VariableRegister) -> Instance {
        Instance {
            variables: Rc::new(variables),
            constraints,
        }
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn int_var_count(&self) -> usize {
        self.variables.int_count()
    }

    pub fn bool_var_count(&self) -> usize {
        self.variables.bool_count()
    }

    pub fn int_var_by_name(&self, name: &str) -> Option<IntVar> {
        self.variables.get_int_by_name(name)
    }

    /// Finds the first solution, if there is one
    pub fn solve(&self) -> Option<Solution> {
        let mut first = None;
        self.solve_with_callback(&SearchParams::first_solution(), &mut |s: &Solution| {
            first = Some(s.clone())
        });
        first
    }

    /// Enumerates every assignment of the integer variables that can be extended to a full
    /// solution, calling `callback` once for each. Booleans are completed with the first
    /// consistent values found and do not produce extra solutions.
    pub fn solve_with_callback<C>(&self, params: &SearchParams, callback: &mut C) -> SolveResult
    where
        C: SolutionCallback + ?Sized,
    {
        let started = Instant::now();
        let mut stats = EvaluationStats::default();
        let traversal_plan = TraversalPath;

        let index = ConstraintIndex::new(
            &self.constraints,
            self.variables.int_count(),
            self.variables.bool_count(),
        );
        let mut propagator = Propagator::new(&self.constraints, &index);
        let mut trail = Trail::new(DomainStore::new(&self.variables));
        propagator.enqueue_all();

        let mut limit_reached = false;
        loop {
            if params.budget_exhausted(&stats, started) {
                debug!("search budget exhausted after {:?}", started.elapsed());
                limit_reached = true;
                break;
            }

            let propagated = propagator.propagate(&mut trail);
            stats.propagations = propagator.runs();
            if propagated.is_err() {
                stats.conflicts += 1;
                if !self.backtrack_and_pivot(&mut trail) {
                    break;
                }
                continue;
            }

            // Now, keep stepping into the problem
            if let Some((decision, alternative)) = traversal_plan.next(trail.domains()) {
                stats.decisions += 1;
                trace!(
                    "decision at level {}: {:?}",
                    trail.current_decision_level(),
                    decision
                );
                if trail.add_decision(decision, Some(alternative)).is_err()
                    && !self.backtrack_and_pivot(&mut trail)
                {
                    break;
                }
                continue;
            }

            // Everything is assigned and consistent
            debug_assert!(self
                .constraints
                .iter()
                .all(|c| trail.domains().evaluate(c) == EvaluationResult::True));
            let solution = Solution::new(self.variables.clone(), trail.domains());
            stats.solutions += 1;
            trace!("solution {}: {:?}", stats.solutions, solution);
            callback.on_solution(&solution);

            if params.enough_solutions(&stats) {
                limit_reached = true;
                break;
            }
            trail.drop_boolean_decisions();
            if !self.backtrack_and_pivot(&mut trail) {
                break;
            }
        }

        let status = match (limit_reached, stats.solutions > 0) {
            (false, true) => SolveStatus::Optimal,
            (false, false) => SolveStatus::Infeasible,
            (true, true) => SolveStatus::Feasible,
            (true, false) => SolveStatus::Unknown,
        };
        debug!(
            "search finished: status={} stats={:?} elapsed={:?}",
            status,
            stats,
            started.elapsed()
        );
        SolveResult { status, stats }
    }

    // Returns false once there is nowhere left to go
    fn backtrack_and_pivot(&self, trail: &mut Trail) -> bool {
        loop {
            let pivot = match trail.backtrack() {
                None => return false,
                Some(pivot) => pivot,
            };
            trace!(
                "pivot at level {}: {:?}",
                trail.current_decision_level(),
                pivot
            );
            if trail.add_decision(pivot, None).is_ok() {
                return true;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// The search space was exhausted and at least one solution was found
    Optimal,
    /// A limit stopped the search after at least one solution
    Feasible,
    /// The search space was exhausted without a solution
    Infeasible,
    /// A limit stopped the search before any solution
    Unknown,
}

impl SolveStatus {
    pub fn name(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Infeasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvaluationStats {
    pub decisions: u64,
    pub propagations: u64,
    pub conflicts: u64,
    pub solutions: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolveResult {
    pub status: SolveStatus,
    pub stats: EvaluationStats,
}

impl SolveResult {
    pub fn solution_count(&self) -> usize {
        self.stats.solutions
    }
}

/// A complete assignment, detached from the search that produced it.
#[derive(Clone)]
pub struct Solution {
    variables: Rc<VariableRegister>,
    int_values: Vec<i64>,
    bool_values: Vec<bool>,
}

impl Solution {
    fn new(variables: Rc<VariableRegister>, domains: &DomainStore) -> Solution {
        let int_values = domains.int_vars().map(|v| domains.lb(v)).collect();
        let bool_values = domains
            .bool_vars()
            .map(|v| domains.bool_value(v).unwrap_or(false))
            .collect();
        Solution {
            variables,
            int_values,
            bool_values,
        }
    }

    pub fn value(&self, var: IntVar) -> i64 {
        self.int_values[var.index()]
    }

    pub fn values(&self, vars: &[IntVar]) -> Vec<i64> {
        vars.iter().map(|&v| self.value(v)).collect()
    }

    pub fn value_by_name(&self, name: &str) -> Option<i64> {
        self.variables
            .get_int_by_name(name)
            .map(|var| self.value(var))
    }

    pub fn literal_value(&self, lit: Literal) -> bool {
        lit.under(self.bool_values[lit.var().index()])
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for var in self.variables.iter_int() {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}={}", self.variables.int_name(var), self.value(var))?;
        }
        let enabled = self.bool_values.iter().filter(|&&b| b).count();
        write!(f, "; {}/{} bools true", enabled, self.bool_values.len())
    }
}
