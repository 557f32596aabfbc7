mod constraint_index;
mod domain;
mod params;
mod propagator;
mod trail;

mod dfs;
pub use crate::solver::dfs::*;
pub use crate::solver::params::SearchParams;
