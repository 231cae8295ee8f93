//! Error taxonomy for graph bisection.

use thiserror::Error;

/// Errors surfaced by graph construction, cost evaluation and annealing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BisectError {
    /// The adjacency matrix cannot be bisected (shape, size, weights, symmetry).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Two groups overlap or do not cover every node of the graph.
    ///
    /// Indicates a bug in move application, never a user error.
    #[error("invalid partition: {0}")]
    InvalidPartition(String),

    /// A tunable in [`AnnealConfig`](crate::bisect::AnnealConfig) is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A matrix token in textual input is not a number.
    #[error("line {line}: cannot parse `{token}` as a weight")]
    Parse {
        /// 1-based line number in the source text.
        line: usize,
        /// The offending token.
        token: String,
    },
}
