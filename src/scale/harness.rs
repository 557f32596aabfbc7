use std::fmt;

use log::{debug, info};

use crate::solver::{EvaluationStats, SearchParams, Solution, SolveStatus};

use super::combination::Coverage;
use super::config::PuzzleConfig;
use super::model::ScaleModel;
use super::{verify, ScaleError};

/// One set of weights, in slot order.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct WeightSolution {
    weights: Vec<i64>,
}

impl WeightSolution {
    pub fn new(weights: Vec<i64>) -> WeightSolution {
        WeightSolution { weights }
    }

    pub fn weights(&self) -> &[i64] {
        &self.weights
    }

    pub fn weight(&self, slot: usize) -> i64 {
        self.weights[slot]
    }

    pub fn sorted(&self) -> Vec<i64> {
        let mut weights = self.weights.clone();
        weights.sort_unstable();
        weights
    }
}

impl fmt::Debug for WeightSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.weights)
    }
}

impl fmt::Display for WeightSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (slot, weight) in self.weights.iter().enumerate() {
            if slot > 0 {
                write!(f, " ")?;
            }
            write!(f, "  w{} = {}", slot + 1, weight)?;
        }
        Ok(())
    }
}

/// The outcome of one enumeration run.
#[derive(Clone, Debug)]
pub struct Enumeration {
    pub status: SolveStatus,
    pub solutions: Vec<WeightSolution>,
    pub stats: EvaluationStats,
}

impl Enumeration {
    pub fn solution_count(&self) -> usize {
        self.solutions.len()
    }
}

impl ScaleModel {
    /// Runs the search to exhaustion (or until a limit in `params`), handing each weight
    /// assignment to `observer` as it is found.
    pub fn enumerate<F>(&self, params: &SearchParams, mut observer: F) -> Enumeration
    where
        F: FnMut(&WeightSolution),
    {
        let weights = self.weights();
        let targets = self.config().targets();
        let mut solutions = vec![];

        let result = self
            .instance
            .solve_with_callback(params, &mut |s: &Solution| {
                let solution = WeightSolution::new(s.values(weights));
                debug_assert!(verify::measures_range(
                    solution.weights(),
                    targets.clone()
                ));
                observer(&solution);
                solutions.push(solution);
            });

        info!(
            "enumeration finished: status={} solutions={}",
            result.status,
            solutions.len()
        );
        Enumeration {
            status: result.status,
            solutions,
            stats: result.stats,
        }
    }
}

/// Builds the model for `config` and enumerates it with the search limits the config carries.
pub fn solve_puzzle<F>(config: &PuzzleConfig, observer: F) -> Result<Enumeration, ScaleError>
where
    F: FnMut(&WeightSolution),
{
    let model = ScaleModel::build(config)?;
    Ok(model.enumerate(&config.search.params(), observer))
}

/// Finds the fewest weights that can measure every value in `[min_value, max_value]`, trying
/// counts from one up to `max_weights`. Returns the count with the first weights found for it.
///
/// `None` means no count up to `max_weights` works, or that a limit in `params` cut a search
/// short before it could tell.
pub fn minimal_weight_count(
    min_value: i64,
    max_value: i64,
    coverage: Option<Coverage>,
    max_weights: usize,
    params: &SearchParams,
) -> Result<Option<(usize, WeightSolution)>, ScaleError> {
    let params = SearchParams {
        solution_limit: Some(1),
        ..params.clone()
    };
    for weight_count in 1..=max_weights {
        let mut config = PuzzleConfig::new(min_value, max_value, weight_count);
        config.coverage = coverage;
        let model = ScaleModel::build(&config)?;

        let enumeration = model.enumerate(&params, |_| {});
        debug!(
            "{} weights: {} after {} decisions",
            weight_count, enumeration.status, enumeration.stats.decisions
        );
        match enumeration.status {
            SolveStatus::Infeasible => continue,
            SolveStatus::Unknown => return Ok(None),
            SolveStatus::Optimal | SolveStatus::Feasible => {
                return Ok(enumeration
                    .solutions
                    .into_iter()
                    .next()
                    .map(|solution| (weight_count, solution)));
            }
        }
    }
    Ok(None)
}
