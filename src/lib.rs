//! Graph bisection by simulated annealing.
//!
//! Given an undirected weighted graph as a symmetric adjacency matrix, finds
//! two near-equal groups of nodes with a small total weight of edges running
//! between them.
//!
//! - [`Graph`]: validated adjacency matrix, parseable from text.
//! - [`bisect::CostEvaluator`]: cut weight and imbalance penalty of a split.
//! - [`bisect::AnnealRunner`]: the annealing search, with cancellation,
//!   progress observation and an injectable random generator.
//!
//! # Examples
//!
//! ```
//! use u_bisect::bisect::{AnnealConfig, AnnealRunner};
//! use u_bisect::Graph;
//!
//! let graph = Graph::from_rows(vec![
//!     vec![0.0, 3.0, 0.0, 1.0],
//!     vec![3.0, 0.0, 1.0, 0.0],
//!     vec![0.0, 1.0, 0.0, 3.0],
//!     vec![1.0, 0.0, 3.0, 0.0],
//! ])
//! .unwrap();
//!
//! let result = AnnealRunner::run(&graph, &AnnealConfig::default().with_seed(1)).unwrap();
//! assert!(result.best.cost.connection_cost <= 6.0);
//! ```

pub mod bisect;
pub mod error;
pub mod graph;

pub use error::BisectError;
pub use graph::Graph;
