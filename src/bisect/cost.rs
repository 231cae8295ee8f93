//! Cut-cost evaluation.
//!
//! Summation runs over the full A×B cross product, `Σ_{i∈A, j∈B} w[i][j]`.
//! Every undirected crossing edge appears exactly once in that product, and
//! since `w` is symmetric the result does not depend on which group is `A`.

use super::types::{Cost, Partition};
use crate::error::BisectError;
use crate::graph::Graph;

/// Default penalty weight per node of group-size difference.
pub const DEFAULT_UNEVEN_PENALTY: f64 = 5.0;

/// Computes [`Cost`] for a candidate bisection.
#[derive(Debug, Clone, Copy)]
pub struct CostEvaluator {
    pub uneven_penalty: f64,
}

impl Default for CostEvaluator {
    fn default() -> Self {
        Self {
            uneven_penalty: DEFAULT_UNEVEN_PENALTY,
        }
    }
}

impl CostEvaluator {
    pub fn new(uneven_penalty: f64) -> Self {
        Self { uneven_penalty }
    }

    /// Evaluates the cost of splitting `graph` into `group_a` and `group_b`.
    ///
    /// Fails with [`BisectError::InvalidPartition`] if the groups overlap or
    /// do not cover every node.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_bisect::bisect::CostEvaluator;
    /// use u_bisect::Graph;
    ///
    /// let graph: Graph = "0 1 1\n1 0 0\n1 0 0".parse().unwrap();
    /// let cost = CostEvaluator::default().evaluate(&graph, &[0], &[1, 2]).unwrap();
    /// assert_eq!(cost.connection_cost, 2.0);
    /// assert_eq!(cost.uneven_cost, 5.0);
    /// ```
    pub fn evaluate(
        &self,
        graph: &Graph,
        group_a: &[usize],
        group_b: &[usize],
    ) -> Result<Cost, BisectError> {
        Partition::new(group_a.to_vec(), group_b.to_vec()).validate(graph.size())?;
        Ok(self.evaluate_unchecked(graph, group_a, group_b))
    }

    /// Evaluates a [`Partition`] with the same checks as [`evaluate`](Self::evaluate).
    pub fn evaluate_partition(
        &self,
        graph: &Graph,
        partition: &Partition,
    ) -> Result<Cost, BisectError> {
        partition.validate(graph.size())?;
        Ok(self.evaluate_unchecked(graph, &partition.group_a, &partition.group_b))
    }

    /// Hot-path evaluation for partitions the caller already knows are valid.
    pub(crate) fn evaluate_unchecked(
        &self,
        graph: &Graph,
        group_a: &[usize],
        group_b: &[usize],
    ) -> Cost {
        let connection_cost = group_a
            .iter()
            .map(|&i| {
                let row = graph.row(i);
                group_b.iter().map(|&j| row[j]).sum::<f64>()
            })
            .sum();
        let uneven_cost = self.uneven_penalty * group_a.len().abs_diff(group_b.len()) as f64;

        Cost {
            connection_cost,
            uneven_cost,
        }
    }
}

/// [`CostEvaluator::evaluate`] with the default penalty.
pub fn evaluate(graph: &Graph, group_a: &[usize], group_b: &[usize]) -> Result<Cost, BisectError> {
    CostEvaluator::default().evaluate(graph, group_a, group_b)
}
