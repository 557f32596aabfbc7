use std::fmt;

use itertools::Itertools;
use lazy_static::lazy_static;
use serde::Deserialize;

use crate::instance::{IntVar, LinearExpr};

use super::config::ConfigError;

/// Enumeration grows as 3^n, so the weight count is capped.
pub const MAX_WEIGHT_COUNT: usize = 12;

pub const LEGACY_WEIGHT_COUNT: usize = 4;

// The one vector with a positive coefficient that the legacy set leaves out
const LEGACY_OMITTED: [i8; LEGACY_WEIGHT_COUNT] = [-1, 1, -1, -1];

lazy_static! {
    static ref LEGACY_COMBINATIONS: Vec<CombinationVector> = generate(LEGACY_WEIGHT_COUNT)
        .filter(|c| c.has_positive() && c.coefficients() != LEGACY_OMITTED)
        .collect();
}

/// Which nonzero coefficient vectors the model offers for each target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    /// The historical 64-vector set for four weights: every vector with a `+1`, except
    /// `(-1, +1, -1, -1)`.
    Legacy,
    /// Every vector with at least one `+1`. Vectors without one always sum below zero, so
    /// nothing is lost while `min_value >= 1`. Not the default for any other range.
    Positive,
    /// All `3^n - 1` nonzero vectors.
    Full,
}

impl Coverage {
    /// Ranges reaching zero or below get the full set, since targets there can need vectors
    /// without a `+1`. Otherwise four weights keep the legacy set.
    pub fn default_for(weight_count: usize, min_value: i64) -> Coverage {
        if min_value < 1 {
            Coverage::Full
        } else if weight_count == LEGACY_WEIGHT_COUNT {
            Coverage::Legacy
        } else {
            Coverage::Positive
        }
    }
}

/// One placement of the weights: `+1` puts the weight opposite the object, `-1` next to it,
/// `0` leaves it off the scale. Never all zero.
///
/// Only the signed sum `Σ cᵢ·wᵢ == target` is modelled. Descriptions that call `+1` "the
/// object's pan" label the pans the other way round; the coefficients and the equation are the
/// same.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombinationVector(Vec<i8>);

impl CombinationVector {
    pub fn new(coefficients: Vec<i8>) -> Option<CombinationVector> {
        let valid = coefficients.iter().all(|c| (-1..=1).contains(c))
            && coefficients.iter().any(|&c| c != 0);
        if valid {
            Some(CombinationVector(coefficients))
        } else {
            None
        }
    }

    pub fn coefficients(&self) -> &[i8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_positive(&self) -> bool {
        self.0.iter().any(|&c| c > 0)
    }

    /// The net weight this placement balances
    pub fn signed_sum(&self, weights: &[i64]) -> i64 {
        self.0
            .iter()
            .zip(weights)
            .map(|(&c, &w)| c as i64 * w)
            .sum()
    }

    pub fn expression(&self, weights: &[IntVar]) -> LinearExpr {
        LinearExpr::from_terms(
            self.0
                .iter()
                .zip(weights)
                .map(|(&c, &var)| (c as i64, var)),
        )
    }
}

impl fmt::Debug for CombinationVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.0.iter().join(", "))
    }
}

impl fmt::Display for CombinationVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut fst = true;
        for (slot, &c) in self.0.iter().enumerate() {
            if c == 0 {
                continue;
            }
            match (fst, c < 0) {
                (true, false) => {}
                (true, true) => write!(f, "-")?,
                (false, false) => write!(f, " + ")?,
                (false, true) => write!(f, " - ")?,
            }
            fst = false;
            write!(f, "w{}", slot + 1)?;
        }
        Ok(())
    }
}

/// Every combination vector the given coverage allows, ordered by how many weights are used,
/// then by which weights, then by sign pattern with `+` first.
pub fn combinations(
    weight_count: usize,
    coverage: Coverage,
) -> Result<Vec<CombinationVector>, ConfigError> {
    if weight_count == 0 {
        return Err(ConfigError::NoWeights);
    }
    if weight_count > MAX_WEIGHT_COUNT {
        return Err(ConfigError::TooManyWeights(weight_count));
    }
    match coverage {
        Coverage::Legacy if weight_count != LEGACY_WEIGHT_COUNT => {
            Err(ConfigError::LegacyRequiresFourWeights(weight_count))
        }
        Coverage::Legacy => Ok(LEGACY_COMBINATIONS.clone()),
        Coverage::Positive => Ok(generate(weight_count)
            .filter(|c| c.has_positive())
            .collect()),
        Coverage::Full => Ok(generate(weight_count).collect()),
    }
}

fn generate(weight_count: usize) -> impl Iterator<Item = CombinationVector> {
    (1..=weight_count).flat_map(move |used| {
        (0..weight_count).combinations(used).flat_map(move |slots| {
            (0..used)
                .map(|_| [1i8, -1])
                .multi_cartesian_product()
                .map(move |signs| {
                    let mut coefficients = vec![0i8; weight_count];
                    for (&slot, sign) in slots.iter().zip(signs) {
                        coefficients[slot] = sign;
                    }
                    CombinationVector(coefficients)
                })
        })
    })
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_legacy_set_has_64_distinct_vectors() {
        let legacy = combinations(4, Coverage::Legacy).unwrap();
        assert_eq!(legacy.len(), 64);
        assert_eq!(legacy.iter().collect::<HashSet<_>>().len(), 64);
        assert!(legacy.iter().all(|c| c.len() == 4 && c.has_positive()));
        assert!(!legacy.contains(&CombinationVector(vec![-1, 1, -1, -1])));
    }

    #[test]
    fn test_legacy_set_matches_historical_prefix() {
        let legacy = combinations(4, Coverage::Legacy).unwrap();
        let expected = vec![
            vec![1, 0, 0, 0],
            vec![0, 1, 0, 0],
            vec![0, 0, 1, 0],
            vec![0, 0, 0, 1],
            vec![1, 1, 0, 0],
            vec![1, -1, 0, 0],
            vec![-1, 1, 0, 0],
            vec![1, 0, 1, 0],
        ];
        assert_eq!(
            legacy[..8].iter().map(|c| c.coefficients().to_vec()).collect_vec(),
            expected
        );
    }

    #[test]
    fn test_full_and_positive_sizes() {
        for n in 1..=6 {
            let full = combinations(n, Coverage::Full).unwrap();
            let positive = combinations(n, Coverage::Positive).unwrap();
            let expected_full = 3usize.pow(n as u32) - 1;
            assert_eq!(full.len(), expected_full);
            assert_eq!(full.iter().collect::<HashSet<_>>().len(), expected_full);
            // everything except the 2^n - 1 vectors made only of zeros and -1s
            assert_eq!(positive.len(), expected_full - (2usize.pow(n as u32) - 1));
        }
        assert_eq!(combinations(4, Coverage::Full).unwrap().len(), 80);
        assert_eq!(combinations(4, Coverage::Positive).unwrap().len(), 65);
    }

    #[test]
    fn test_enumeration_is_idempotent() {
        let first: HashSet<_> = combinations(4, Coverage::Legacy).unwrap().into_iter().collect();
        let second: HashSet<_> = combinations(4, Coverage::Legacy).unwrap().into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_counts() {
        assert!(matches!(
            combinations(0, Coverage::Full),
            Err(ConfigError::NoWeights)
        ));
        assert!(matches!(
            combinations(3, Coverage::Legacy),
            Err(ConfigError::LegacyRequiresFourWeights(3))
        ));
        assert!(matches!(
            combinations(MAX_WEIGHT_COUNT + 1, Coverage::Full),
            Err(ConfigError::TooManyWeights(_))
        ));
    }

    #[test]
    fn test_default_coverage_follows_range() {
        assert_eq!(Coverage::default_for(4, 1), Coverage::Legacy);
        assert_eq!(Coverage::default_for(3, 1), Coverage::Positive);
        assert_eq!(Coverage::default_for(2, 0), Coverage::Full);
        assert_eq!(Coverage::default_for(4, -1), Coverage::Full);
    }

    #[test]
    fn test_vector_helpers() {
        assert!(CombinationVector::new(vec![0, 0]).is_none());
        assert!(CombinationVector::new(vec![2, 0]).is_none());

        let c = CombinationVector::new(vec![-1, 0, 1, 1]).unwrap();
        assert_eq!(c.signed_sum(&[1, 3, 9, 27]), 35);
        assert_eq!(format!("{}", c), "-w1 + w3 + w4");
        assert_eq!(format!("{:?}", c), "(-1, 0, 1, 1)");

        let weights = [IntVar(0), IntVar(1), IntVar(2), IntVar(3)];
        assert_eq!(format!("{:?}", c.expression(&weights)), "-x0 + x2 + x3");
    }
}
