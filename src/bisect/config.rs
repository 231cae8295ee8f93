//! Annealing configuration.

use std::time::Duration;

use crate::error::BisectError;

/// How many trial swaps to sample when estimating the starting temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrialCount {
    /// `⌊N² / 2⌋` trials.
    #[default]
    HalfSquare,

    /// One trial per member of the larger group, `⌈N / 2⌉`.
    GroupSize,
}

impl TrialCount {
    /// Number of trials for a graph of `n` nodes. Never zero.
    pub fn trials(self, n: usize) -> usize {
        let trials = match self {
            TrialCount::HalfSquare => n * n / 2,
            TrialCount::GroupSize => n.div_ceil(2),
        };
        trials.max(1)
    }
}

/// Configuration for an annealing run.
///
/// Every tunable lives here rather than in process-wide constants, so a test
/// can pin extreme values (`cooling_rate = 1.0` never cools,
/// `initial_temperature = 0.0` degenerates to first-improvement hill climbing).
///
/// # Examples
///
/// ```
/// use u_bisect::bisect::{AnnealConfig, TrialCount};
///
/// let config = AnnealConfig::default()
///     .with_cooling_rate(0.95)
///     .with_temperature_multiplier(3.0)
///     .with_trial_count(TrialCount::GroupSize)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Penalty per node of size difference between the groups.
    ///
    /// Reported in [`Cost::uneven_cost`](super::Cost) only; never annealed on.
    pub uneven_penalty: f64,

    /// Geometric cooling factor in (0, 1]. `1.0` keeps the temperature fixed.
    pub cooling_rate: f64,

    /// Starting temperature = multiplier × mean |Δ| over the trial swaps.
    pub temperature_multiplier: f64,

    /// Fixed starting temperature. Skips the estimate when set.
    pub initial_temperature: Option<f64>,

    /// Trial count for the starting-temperature estimate.
    pub trial_count: TrialCount,

    /// Proposals per temperature level = multiplier × N.
    pub inner_loop_multiplier: usize,

    /// Proposals without a new best before stopping. `None` = N².
    pub stagnation_limit: Option<usize>,

    /// Maximum total proposals (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Wall-clock budget for the search loop.
    pub time_limit: Option<Duration>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            uneven_penalty: 5.0,
            cooling_rate: 0.92,
            temperature_multiplier: 2.0,
            initial_temperature: None,
            trial_count: TrialCount::default(),
            inner_loop_multiplier: 5,
            stagnation_limit: None,
            max_iterations: 0,
            time_limit: None,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_uneven_penalty(mut self, penalty: f64) -> Self {
        self.uneven_penalty = penalty;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_temperature_multiplier(mut self, multiplier: f64) -> Self {
        self.temperature_multiplier = multiplier;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = Some(t);
        self
    }

    pub fn with_trial_count(mut self, trial_count: TrialCount) -> Self {
        self.trial_count = trial_count;
        self
    }

    pub fn with_inner_loop_multiplier(mut self, multiplier: usize) -> Self {
        self.inner_loop_multiplier = multiplier;
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = Some(limit);
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Proposals per temperature level for a graph of `n` nodes.
    pub fn inner_iterations(&self, n: usize) -> usize {
        self.inner_loop_multiplier * n
    }

    /// Stagnation threshold for a graph of `n` nodes.
    pub fn stagnation_threshold(&self, n: usize) -> usize {
        self.stagnation_limit.unwrap_or(n * n)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), BisectError> {
        let invalid = |msg: String| Err(BisectError::InvalidConfig(msg));

        if !self.uneven_penalty.is_finite() || self.uneven_penalty < 0.0 {
            return invalid(format!(
                "uneven_penalty must be non-negative, got {}",
                self.uneven_penalty
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return invalid(format!(
                "cooling_rate must be in (0, 1], got {}",
                self.cooling_rate
            ));
        }
        if !self.temperature_multiplier.is_finite() || self.temperature_multiplier < 0.0 {
            return invalid(format!(
                "temperature_multiplier must be non-negative, got {}",
                self.temperature_multiplier
            ));
        }
        if let Some(t) = self.initial_temperature {
            if !t.is_finite() || t < 0.0 {
                return invalid(format!("initial_temperature must be non-negative, got {t}"));
            }
        }
        if self.inner_loop_multiplier == 0 {
            return invalid("inner_loop_multiplier must be at least 1".into());
        }
        if self.stagnation_limit == Some(0) {
            return invalid("stagnation_limit must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnnealConfig::default();
        assert!((config.uneven_penalty - 5.0).abs() < 1e-12);
        assert!((config.cooling_rate - 0.92).abs() < 1e-12);
        assert!((config.temperature_multiplier - 2.0).abs() < 1e-12);
        assert_eq!(config.inner_iterations(6), 30);
        assert_eq!(config.stagnation_threshold(6), 36);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_trial_count_never_zero() {
        assert_eq!(TrialCount::HalfSquare.trials(6), 18);
        assert_eq!(TrialCount::HalfSquare.trials(1), 1);
        assert_eq!(TrialCount::HalfSquare.trials(0), 1);
        assert_eq!(TrialCount::GroupSize.trials(5), 3);
        assert_eq!(TrialCount::GroupSize.trials(0), 1);
    }

    #[test]
    fn test_validate_cooling_rate_bounds() {
        assert!(AnnealConfig::default().with_cooling_rate(1.0).validate().is_ok());
        assert!(AnnealConfig::default().with_cooling_rate(0.0).validate().is_err());
        assert!(AnnealConfig::default().with_cooling_rate(1.5).validate().is_err());
        assert!(AnnealConfig::default()
            .with_cooling_rate(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_zero_temperature_allowed() {
        let config = AnnealConfig::default().with_initial_temperature(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_values() {
        assert!(AnnealConfig::default()
            .with_uneven_penalty(-1.0)
            .validate()
            .is_err());
        assert!(AnnealConfig::default()
            .with_initial_temperature(-1.0)
            .validate()
            .is_err());
        assert!(AnnealConfig::default()
            .with_inner_loop_multiplier(0)
            .validate()
            .is_err());
        assert!(matches!(
            AnnealConfig::default().with_stagnation_limit(0).validate(),
            Err(BisectError::InvalidConfig(_))
        ));
    }
}
