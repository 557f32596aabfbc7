use std::{fs, io, ops::RangeInclusive, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;

use crate::solver::SearchParams;

use super::combination::{Coverage, LEGACY_WEIGHT_COUNT, MAX_WEIGHT_COUNT};

/// Values beyond this are rejected so that no signed sum can overflow.
pub const MAX_ABS_VALUE: i64 = 1 << 32;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("empty value range: max_value {max} is below min_value {min}")]
    EmptyRange { min: i64, max: i64 },
    #[error("value {0} is too large in magnitude")]
    ValueOutOfRange(i64),
    #[error("weight_count must be at least 1")]
    NoWeights,
    #[error("weight_count {0} is above the supported maximum")]
    TooManyWeights(usize),
    #[error("legacy coverage is only defined for 4 weights, got {0}")]
    LegacyRequiresFourWeights(usize),
    #[error("io error")]
    IO(#[from] io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
}

type Result<T> = std::result::Result<T, ConfigError>;

/// The puzzle parameters: weights and targets share the inclusive range
/// `[min_value, max_value]`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PuzzleConfig {
    pub min_value: i64,
    pub max_value: i64,
    pub weight_count: usize,
    /// Which combination vectors the model uses. Unset means full when `min_value < 1`, else
    /// legacy for four weights and positive otherwise.
    pub coverage: Option<Coverage>,
    pub search: SearchConfig,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        PuzzleConfig {
            min_value: 1,
            max_value: 40,
            weight_count: 4,
            coverage: None,
            search: SearchConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub max_decisions: Option<u64>,
    pub time_limit_secs: Option<u64>,
    pub solution_limit: Option<usize>,
}

impl SearchConfig {
    pub fn params(&self) -> SearchParams {
        SearchParams {
            max_decisions: self.max_decisions,
            time_limit: self.time_limit_secs.map(Duration::from_secs),
            solution_limit: self.solution_limit,
        }
    }
}

impl PuzzleConfig {
    pub fn new(min_value: i64, max_value: i64, weight_count: usize) -> PuzzleConfig {
        PuzzleConfig {
            min_value,
            max_value,
            weight_count,
            ..PuzzleConfig::default()
        }
    }

    pub fn with_coverage(mut self, coverage: Coverage) -> PuzzleConfig {
        self.coverage = Some(coverage);
        self
    }

    pub fn coverage(&self) -> Coverage {
        self.coverage
            .unwrap_or_else(|| Coverage::default_for(self.weight_count, self.min_value))
    }

    /// How many targets must be measurable. Non-positive for an inverted range.
    pub fn value_count(&self) -> i64 {
        self.max_value - self.min_value + 1
    }

    pub fn targets(&self) -> RangeInclusive<i64> {
        self.min_value..=self.max_value
    }

    pub fn validate(&self) -> Result<()> {
        for value in [self.min_value, self.max_value] {
            if value.unsigned_abs() > MAX_ABS_VALUE as u64 {
                return Err(ConfigError::ValueOutOfRange(value));
            }
        }
        if self.value_count() <= 0 {
            return Err(ConfigError::EmptyRange {
                min: self.min_value,
                max: self.max_value,
            });
        }
        if self.weight_count == 0 {
            return Err(ConfigError::NoWeights);
        }
        if self.weight_count > MAX_WEIGHT_COUNT {
            return Err(ConfigError::TooManyWeights(self.weight_count));
        }
        if self.coverage() == Coverage::Legacy && self.weight_count != LEGACY_WEIGHT_COUNT {
            return Err(ConfigError::LegacyRequiresFourWeights(self.weight_count));
        }
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<PuzzleConfig> {
        let config: PuzzleConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<PuzzleConfig> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
