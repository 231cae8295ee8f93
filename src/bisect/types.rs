//! Partition, cost and progress types.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::BisectError;

/// Two disjoint groups of node indices covering `0..n`.
///
/// Groups are ordered sequences; the position of a node inside its group is
/// what a swap move addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partition {
    pub group_a: Vec<usize>,
    pub group_b: Vec<usize>,
}

impl Partition {
    pub fn new(group_a: Vec<usize>, group_b: Vec<usize>) -> Self {
        Self { group_a, group_b }
    }

    /// Shuffles `0..n` and splits it into groups of `⌈n/2⌉` and `⌊n/2⌋`.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut nodes: Vec<usize> = (0..n).collect();
        nodes.shuffle(rng);
        let group_b = nodes.split_off(n.div_ceil(2));
        Self {
            group_a: nodes,
            group_b,
        }
    }

    /// Total number of nodes across both groups.
    pub fn len(&self) -> usize {
        self.group_a.len() + self.group_b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group_a.is_empty() && self.group_b.is_empty()
    }

    /// Exchanges `group_a[ia]` with `group_b[ib]`. Applying it twice restores
    /// the partition it was applied to.
    #[inline]
    pub fn swap(&mut self, ia: usize, ib: usize) {
        std::mem::swap(&mut self.group_a[ia], &mut self.group_b[ib]);
    }

    /// Picks one position in each group uniformly at random.
    ///
    /// Both groups must be non-empty.
    pub fn random_swap<R: Rng>(&self, rng: &mut R) -> (usize, usize) {
        (
            rng.random_range(0..self.group_a.len()),
            rng.random_range(0..self.group_b.len()),
        )
    }

    /// Checks that the groups are disjoint and together cover exactly `0..n`.
    pub fn validate(&self, n: usize) -> Result<(), BisectError> {
        let mut seen = vec![false; n];
        for &node in self.group_a.iter().chain(&self.group_b) {
            match seen.get_mut(node) {
                None => {
                    return Err(BisectError::InvalidPartition(format!(
                        "node {node} is out of range for a graph of {n} nodes"
                    )))
                }
                Some(true) => {
                    return Err(BisectError::InvalidPartition(format!(
                        "node {node} appears more than once"
                    )))
                }
                Some(slot) => *slot = true,
            }
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(BisectError::InvalidPartition(format!(
                "node {missing} is not assigned to either group"
            )));
        }
        Ok(())
    }

    /// Both groups sorted and shifted to 1-based numbering for display.
    pub fn to_one_based(&self) -> (Vec<usize>, Vec<usize>) {
        let present = |group: &[usize]| {
            let mut out: Vec<usize> = group.iter().map(|&v| v + 1).collect();
            out.sort_unstable();
            out
        };
        (present(&self.group_a), present(&self.group_b))
    }
}

/// Cost of a partition.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cost {
    /// Total weight of edges crossing between the groups. Annealed on.
    pub connection_cost: f64,

    /// `penalty × |len(A) − len(B)|`. Diagnostic only.
    pub uneven_cost: f64,
}

/// A partition together with its cost when it was recorded.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    pub partition: Partition,
    pub cost: Cost,
}

/// Record emitted for every accepted move.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    /// 1-based proposal counter at the time of acceptance.
    pub iteration: usize,
    pub uneven_cost: f64,
    pub connection_cost: f64,
    pub temperature: f64,
}

/// Receives a [`Progress`] record at every accepted move.
///
/// Implemented for any `FnMut(&Progress)`, and for `()` as a no-op.
pub trait ProgressObserver {
    fn on_accept(&mut self, progress: &Progress);
}

impl<F: FnMut(&Progress)> ProgressObserver for F {
    fn on_accept(&mut self, progress: &Progress) {
        self(progress)
    }
}

impl ProgressObserver for () {
    fn on_accept(&mut self, _progress: &Progress) {}
}
