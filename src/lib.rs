pub mod instance;
pub mod problem_builder;
pub mod scale;
pub mod solver;
pub(crate) mod variable_registry;

pub use instance::*;
