//! Independent checks on weight sets, by brute force over every placement.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use itertools::Itertools;

use super::combination::CombinationVector;

/// Every value some nonzero placement of `weights` balances.
pub fn measurable_values(weights: &[i64]) -> BTreeSet<i64> {
    placements(weights.len())
        .map(|placement| placement.signed_sum(weights))
        .collect()
}

pub fn unmeasurable_targets(weights: &[i64], targets: RangeInclusive<i64>) -> Vec<i64> {
    let measurable = measurable_values(weights);
    targets.filter(|t| !measurable.contains(t)).collect()
}

pub fn measures_range(weights: &[i64], targets: RangeInclusive<i64>) -> bool {
    let measurable = measurable_values(weights);
    targets.into_iter().all(|t| measurable.contains(&t))
}

/// The first placement that balances `target`, preferring placements with fewer weights.
pub fn placement_for(weights: &[i64], target: i64) -> Option<CombinationVector> {
    placements(weights.len())
        .sorted_by_key(|p| p.coefficients().iter().filter(|&&c| c != 0).count())
        .find(|p| p.signed_sum(weights) == target)
}

fn placements(len: usize) -> impl Iterator<Item = CombinationVector> {
    (0..len)
        .map(|_| [1i8, 0, -1])
        .multi_cartesian_product()
        .filter_map(CombinationVector::new)
}
