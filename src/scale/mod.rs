//! The balance scale puzzle: choose weights so that every value in a range can be weighed on a
//! two-pan balance, with each weight on either pan or left off.

use thiserror::Error;

use crate::problem_builder::ModelError;

pub mod combination;
pub mod config;
pub mod harness;
pub mod model;
pub mod verify;

pub use combination::{combinations, CombinationVector, Coverage};
pub use config::{ConfigError, PuzzleConfig, SearchConfig};
pub use harness::{minimal_weight_count, solve_puzzle, Enumeration, WeightSolution};
pub use model::{ScaleModel, TargetConstraint};

#[derive(Error, Debug)]
pub enum ScaleError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("could not build model: {0}")]
    Model(#[from] ModelError),
}
