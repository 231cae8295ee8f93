//! Min-cut graph bisection by simulated annealing.
//!
//! Splits the nodes of an undirected weighted graph into two groups of equal
//! size (differing by one when N is odd) while minimizing the total weight of
//! edges crossing between them. Single-node swaps keep the group sizes fixed,
//! so only the cut weight is annealed on; the imbalance penalty is reported
//! for diagnostics.
//!
//! Hill climbing is the zero-temperature special case: set
//! [`AnnealConfig::with_initial_temperature`] to `0.0`.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Johnson, Aragon, McGeoch & Schevon (1989), "Optimization by Simulated
//!   Annealing: An Experimental Evaluation; Part I, Graph Partitioning"

mod config;
mod cost;
mod runner;
mod types;

pub use config::{AnnealConfig, TrialCount};
pub use cost::{evaluate, CostEvaluator, DEFAULT_UNEVEN_PENALTY};
pub use runner::{
    anneal, estimate_initial_temperature, metropolis_probability, AnnealResult, AnnealRunner,
    StopReason,
};
pub use types::{Cost, Partition, Progress, ProgressObserver, Solution};
