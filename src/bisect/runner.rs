//! Annealing search loop.
//!
//! # Algorithm
//!
//! 1. Shuffle the nodes and split them into two halves
//! 2. Estimate a starting temperature from the mean |Δ| of random swaps
//! 3. At each temperature level, propose `inner_loop_multiplier × N` swaps:
//!    a. Exchange one random node of each group
//!    b. Accept with probability `exp(Δ / T)` (Metropolis), else swap back
//! 4. Cool geometrically, `T ← cooling_rate × T`
//! 5. Stop on zero cut, stagnation, or an external limit

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::AnnealConfig;
use super::cost::CostEvaluator;
use super::types::{Cost, Partition, Progress, ProgressObserver, Solution};
use crate::error::BisectError;
use crate::graph::Graph;

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The incumbent cut reached zero weight.
    ZeroCost,
    /// The stagnation threshold was reached without a new best.
    Stagnation,
    /// `max_iterations` proposals were made.
    IterationLimit,
    /// `time_limit` elapsed.
    TimeLimit,
    /// The cancellation flag was raised.
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::ZeroCost => "zero connection cost",
            StopReason::Stagnation => "stagnation",
            StopReason::IterationLimit => "iteration limit",
            StopReason::TimeLimit => "time limit",
            StopReason::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealResult {
    /// Lowest-connection-cost state among the initial and all accepted ones.
    pub best: Solution,

    /// State held when the search stopped.
    pub incumbent: Solution,

    /// Connection cost of every accepted move, in order.
    pub cost_trace: Vec<f64>,

    /// Total number of proposals.
    pub iterations: usize,

    /// Number of accepted proposals.
    pub accepted_moves: usize,

    /// Number of accepted proposals that lowered the incumbent cost.
    pub improving_moves: usize,

    pub initial_temperature: f64,
    pub final_temperature: f64,
    pub stop_reason: StopReason,
    pub elapsed: Duration,
}

impl AnnealResult {
    /// Splits the result into the best solution and the cost trace.
    pub fn into_parts(self) -> (Solution, Vec<f64>) {
        (self.best, self.cost_trace)
    }
}

/// Metropolis acceptance probability for a move with `delta = current − candidate`.
///
/// Non-negative deltas are always accepted. Worsening moves are accepted
/// with `exp(delta / temperature)`, and never once the temperature is zero.
#[inline]
pub fn metropolis_probability(delta: f64, temperature: f64) -> f64 {
    if delta >= 0.0 {
        1.0
    } else if temperature > 0.0 {
        (delta / temperature).exp()
    } else {
        0.0
    }
}

/// Estimates a starting temperature scaled to the graph's own cost deltas.
///
/// Applies `config.trial_count` cumulative random swaps to a scratch copy of
/// `partition` and returns `temperature_multiplier × mean |Δ|`, where each Δ
/// is measured against `initial`.
pub fn estimate_initial_temperature<R: Rng>(
    graph: &Graph,
    partition: &Partition,
    initial: Cost,
    config: &AnnealConfig,
    rng: &mut R,
) -> f64 {
    let evaluator = CostEvaluator::new(config.uneven_penalty);
    let trials = config.trial_count.trials(graph.size());
    let mut scratch = partition.clone();

    let mut delta_sum = 0.0;
    for _ in 0..trials {
        let (ia, ib) = scratch.random_swap(rng);
        scratch.swap(ia, ib);
        let cost = evaluator.evaluate_unchecked(graph, &scratch.group_a, &scratch.group_b);
        delta_sum += (initial.connection_cost - cost.connection_cost).abs();
    }

    config.temperature_multiplier * delta_sum / trials as f64
}

/// Runs the annealing search with the default configuration.
pub fn anneal(graph: &Graph) -> Result<AnnealResult, BisectError> {
    AnnealRunner::run(graph, &AnnealConfig::default())
}

/// Executes the simulated annealing bisection.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs the search, seeding the generator from `config.seed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_bisect::bisect::{AnnealConfig, AnnealRunner};
    /// use u_bisect::Graph;
    ///
    /// let graph: Graph = "0 1 0 0\n1 0 0 0\n0 0 0 1\n0 0 1 0".parse().unwrap();
    /// let result = AnnealRunner::run(&graph, &AnnealConfig::default().with_seed(42)).unwrap();
    /// assert_eq!(result.best.partition.len(), 4);
    /// ```
    pub fn run(graph: &Graph, config: &AnnealConfig) -> Result<AnnealResult, BisectError> {
        Self::run_with_cancel(graph, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// Raising the flag stops the search before the next proposal; the best
    /// solution found so far is returned.
    pub fn run_with_cancel(
        graph: &Graph,
        config: &AnnealConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealResult, BisectError> {
        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random::<u64>));
        Self::run_with(graph, config, &mut rng, &mut (), cancel.as_deref())
    }

    /// Runs the search with a caller-supplied generator and progress observer.
    ///
    /// `config.seed` is ignored; all randomness (shuffle, swap selection,
    /// acceptance draws) comes from `rng`.
    pub fn run_with<R, O>(
        graph: &Graph,
        config: &AnnealConfig,
        rng: &mut R,
        observer: &mut O,
        cancel: Option<&AtomicBool>,
    ) -> Result<AnnealResult, BisectError>
    where
        R: Rng,
        O: ProgressObserver + ?Sized,
    {
        config.validate()?;

        let n = graph.size();
        let evaluator = CostEvaluator::new(config.uneven_penalty);
        let started = Instant::now();

        // Initialize
        let mut partition = Partition::random(n, rng);
        let mut current_cost = evaluator.evaluate_partition(graph, &partition)?;
        let mut best = Solution {
            partition: partition.clone(),
            cost: current_cost,
        };

        let initial_temperature = match config.initial_temperature {
            Some(t) => t,
            None => estimate_initial_temperature(graph, &partition, current_cost, config, rng),
        };
        let stagnation_threshold = config.stagnation_threshold(n);
        let inner_iterations = config.inner_iterations(n);

        log::info!(
            "annealing {n} nodes: T0 = {initial_temperature:.4}, \
             {inner_iterations} proposals per level, stagnation threshold {stagnation_threshold}"
        );

        let mut temperature = initial_temperature;
        let mut cost_trace = Vec::new();
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut stagnation = 0usize;

        let stop_reason = 'search: loop {
            if current_cost.connection_cost <= 0.0 {
                break StopReason::ZeroCost;
            }

            for _ in 0..inner_iterations {
                if let Some(reason) = external_stop(config, iterations, started, cancel) {
                    break 'search reason;
                }
                iterations += 1;

                let (ia, ib) = partition.random_swap(rng);
                partition.swap(ia, ib);
                debug_assert!(partition.validate(n).is_ok(), "swap broke the partition");

                let candidate =
                    evaluator.evaluate_unchecked(graph, &partition.group_a, &partition.group_b);
                let delta = current_cost.connection_cost - candidate.connection_cost;
                let probability = metropolis_probability(delta, temperature);

                if rng.random::<f64>() < probability {
                    accepted_moves += 1;
                    if delta > 0.0 {
                        improving_moves += 1;
                    }
                    current_cost = candidate;
                    cost_trace.push(candidate.connection_cost);

                    if candidate.connection_cost < best.cost.connection_cost {
                        best = Solution {
                            partition: partition.clone(),
                            cost: candidate,
                        };
                        stagnation = 0;
                    } else {
                        stagnation += 1;
                    }

                    let progress = Progress {
                        iteration: iterations,
                        uneven_cost: candidate.uneven_cost,
                        connection_cost: candidate.connection_cost,
                        temperature,
                    };
                    log::debug!(
                        "iteration {}: uneven cost {}, connection cost {}",
                        progress.iteration,
                        progress.uneven_cost,
                        progress.connection_cost
                    );
                    observer.on_accept(&progress);

                    if candidate.connection_cost <= 0.0 {
                        break 'search StopReason::ZeroCost;
                    }
                } else {
                    partition.swap(ia, ib);
                    stagnation += 1;
                }

                if stagnation >= stagnation_threshold {
                    break 'search StopReason::Stagnation;
                }
            }

            // Cool down
            temperature *= config.cooling_rate;
            log::trace!("temperature lowered to {temperature:.6}");
        };

        let elapsed = started.elapsed();
        log::info!(
            "stopped ({stop_reason}) after {iterations} iterations in {:.5}s: \
             connection cost {}, uneven cost {}",
            elapsed.as_secs_f64(),
            best.cost.connection_cost,
            best.cost.uneven_cost
        );

        Ok(AnnealResult {
            best,
            incumbent: Solution {
                partition,
                cost: current_cost,
            },
            cost_trace,
            iterations,
            accepted_moves,
            improving_moves,
            initial_temperature,
            final_temperature: temperature,
            stop_reason,
            elapsed,
        })
    }
}

/// Checks the caller-imposed bounds: cancellation, iteration cap, time cap.
fn external_stop(
    config: &AnnealConfig,
    iterations: usize,
    started: Instant,
    cancel: Option<&AtomicBool>,
) -> Option<StopReason> {
    if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
        return Some(StopReason::Cancelled);
    }
    if config.max_iterations > 0 && iterations >= config.max_iterations {
        return Some(StopReason::IterationLimit);
    }
    if config.time_limit.is_some_and(|limit| started.elapsed() >= limit) {
        return Some(StopReason::TimeLimit);
    }
    None
}
