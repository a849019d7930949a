//! Search configuration.

use serde::{Deserialize, Serialize};

use crate::compare::Metric;
use crate::error::{Error, Result};

/// Rule deciding whether a mutation that lowers the aggregate score is kept.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceptance {
    /// Keep any mutation that does not lower the aggregate score (ties kept).
    #[default]
    Greedy,

    /// Additionally keep a worsening mutation with probability
    /// `exp(-(previous - new) / temperature)`.
    ///
    /// The accepted score is then no longer monotonic.
    Metropolis,
}

/// Configuration for the descriptor search.
///
/// # Examples
///
/// ```
/// use u_descriptors::compare::Metric;
/// use u_descriptors::search::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_max_descriptors(120)
///     .with_max_perturbation(0.05)
///     .with_metric(Metric::JensenShannon)
///     .with_max_iterations(10_000)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Total descriptor count, fixed descriptors included.
    pub max_descriptors: usize,

    /// Largest change a single reweight may apply to one effect.
    pub max_perturbation: f64,

    /// Temperature for [`Acceptance::Metropolis`]. Unused by `Greedy`.
    pub temperature: f64,

    /// Acceptance rule.
    pub acceptance: Acceptance,

    /// Metric used to score each area.
    pub metric: Metric,

    /// Whether the reweight operator may pick nation/state descriptors.
    ///
    /// Fixed descriptors have fixed membership; their effects are still
    /// levers the search can tune.
    pub reweight_fixed: bool,

    /// Iteration budget. 0 = run until cancelled.
    pub max_iterations: usize,

    /// Record the accepted score in the result history every this many
    /// iterations.
    pub history_interval: usize,

    /// Rescore areas with rayon (requires the `parallel` feature).
    pub parallel: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_descriptors: 300,
            max_perturbation: 0.1,
            temperature: 0.5,
            acceptance: Acceptance::default(),
            metric: Metric::default(),
            reweight_fixed: true,
            max_iterations: 0,
            history_interval: 100,
            parallel: false,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_max_descriptors(mut self, n: usize) -> Self {
        self.max_descriptors = n;
        self
    }

    pub fn with_max_perturbation(mut self, delta: f64) -> Self {
        self.max_perturbation = delta;
        self
    }

    pub fn with_temperature(mut self, t: f64) -> Self {
        self.temperature = t;
        self
    }

    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_reweight_fixed(mut self, enabled: bool) -> Self {
        self.reweight_fixed = enabled;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_history_interval(mut self, n: usize) -> Self {
        self.history_interval = n.max(1);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.max_perturbation.is_finite() || self.max_perturbation < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_perturbation must be finite and non-negative, got {}",
                self.max_perturbation
            )));
        }
        if self.acceptance == Acceptance::Metropolis && self.temperature <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "metropolis temperature must be positive, got {}",
                self.temperature
            )));
        }
        if self.history_interval == 0 {
            return Err(Error::InvalidConfig(
                "history_interval must be positive".into(),
            ));
        }
        Ok(())
    }
}
