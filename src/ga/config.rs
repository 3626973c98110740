//! GA configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Parameters of the generational GA.
///
/// # Example
/// ```
/// use u_dose_match::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_max_generations(20)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Individuals per generation (default: 200).
    pub population_size: usize,
    /// Generation budget (default: 400).
    pub max_generations: usize,
    /// Fraction of each generation produced by crossover (default: 0.8).
    pub crossover_rate: f64,
    /// Fraction of all genes in a generation reset at random (default: 0.02).
    pub mutation_rate: f64,
    /// Relative best-fitness improvement at or below which a generation
    /// counts as stalled (default: 1e-6).
    pub convergence_tolerance: f64,
    /// Consecutive stalled generations before stopping; 0 disables (default: 60).
    pub convergence_window: usize,
    /// Stop as soon as the best fitness reaches this value (default: 1e4).
    pub fitness_threshold: f64,
    /// Selection weights are capped at this multiple of the mean fitness;
    /// 0 disables (default: 10).
    pub selection_cap: f64,
    /// Random seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            max_generations: 400,
            crossover_rate: 0.8,
            mutation_rate: 0.02,
            convergence_tolerance: 1e-6,
            convergence_window: 60,
            fitness_threshold: 1e4,
            selection_cap: 10.0,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the number of individuals per generation.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the share of each generation bred by crossover.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the convergence criterion.
    pub fn with_convergence(mut self, tolerance: f64, window: usize) -> Self {
        self.convergence_tolerance = tolerance;
        self.convergence_window = window;
        self
    }

    /// Sets the fitness at which the search stops early.
    pub fn with_fitness_threshold(mut self, threshold: f64) -> Self {
        self.fitness_threshold = threshold;
        self
    }

    /// Caps selection weight at `cap` times the mean fitness. 0 disables the cap.
    pub fn with_selection_cap(mut self, cap: f64) -> Self {
        self.selection_cap = cap;
        self
    }

    /// Fixes the random seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of individuals bred by crossover each generation (always even).
    pub fn offspring_count(&self) -> usize {
        let pairs = (0.5 * self.crossover_rate * self.population_size as f64).floor() as usize;
        (2 * pairs).min(self.population_size)
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(invalid("population_size", "must be at least 2"));
        }
        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(invalid(name, format!("must lie in [0, 1], got {rate}")));
            }
        }
        if !self.convergence_tolerance.is_finite() || self.convergence_tolerance < 0.0 {
            return Err(invalid("convergence_tolerance", "must be finite and non-negative"));
        }
        if self.fitness_threshold.is_nan() {
            return Err(invalid("fitness_threshold", "must be a number"));
        }
        if !self.selection_cap.is_finite() || self.selection_cap < 0.0 {
            return Err(invalid("selection_cap", "must be finite and non-negative"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> MatchError {
    MatchError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}
