use std::time::{Duration, Instant};

use super::EvaluationStats;

/// Budgets for one search. Every limit is optional; with none set the search runs until the
/// space is exhausted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub max_decisions: Option<u64>,
    pub time_limit: Option<Duration>,
    pub solution_limit: Option<usize>,
}

impl SearchParams {
    pub fn new() -> SearchParams {
        SearchParams::default()
    }

    /// Stop at the first solution
    pub fn first_solution() -> SearchParams {
        SearchParams::new().with_solution_limit(1)
    }

    pub fn with_max_decisions(mut self, max_decisions: u64) -> SearchParams {
        self.max_decisions = Some(max_decisions);
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> SearchParams {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn with_solution_limit(mut self, solution_limit: usize) -> SearchParams {
        self.solution_limit = Some(solution_limit);
        self
    }

    pub(crate) fn budget_exhausted(&self, stats: &EvaluationStats, started: Instant) -> bool {
        self.max_decisions
            .map_or(false, |max| stats.decisions >= max)
            || self
                .time_limit
                .map_or(false, |limit| started.elapsed() >= limit)
    }

    pub(crate) fn enough_solutions(&self, stats: &EvaluationStats) -> bool {
        self.solution_limit
            .map_or(false, |limit| stats.solutions >= limit)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_limits() {
        let started = Instant::now();
        let mut stats = EvaluationStats::default();

        let unlimited = SearchParams::new();
        stats.decisions = 1_000_000;
        stats.solutions = 1_000;
        assert!(!unlimited.budget_exhausted(&stats, started));
        assert!(!unlimited.enough_solutions(&stats));

        let limited = SearchParams::new()
            .with_max_decisions(10)
            .with_solution_limit(2);
        stats.decisions = 9;
        stats.solutions = 1;
        assert!(!limited.budget_exhausted(&stats, started));
        assert!(!limited.enough_solutions(&stats));
        stats.decisions = 10;
        stats.solutions = 2;
        assert!(limited.budget_exhausted(&stats, started));
        assert!(limited.enough_solutions(&stats));

        let timed = SearchParams::new().with_time_limit(Duration::ZERO);
        assert!(timed.budget_exhausted(&EvaluationStats::default(), started));
    }
}
