//! Per-call matching parameters.

use serde::{Deserialize, Serialize};

use crate::cost::CostWeights;
use crate::error::Result;
use crate::ga::GaConfig;

/// Overrides for cost weights and GA parameters.
///
/// Flat on the wire: `{"population_size": 50, "duplicate": 12, "seed": 1}`.
/// Keys that are absent keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchParams {
    #[serde(flatten)]
    pub weights: CostWeights,
    #[serde(flatten)]
    pub ga: GaConfig,
    /// Include the itemized cost of the best assignment in the result.
    pub verbose: bool,
}

impl MatchParams {
    /// Default weights and GA settings, verbose off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the penalty weights.
    pub fn with_weights(mut self, weights: CostWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replaces the GA settings.
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    /// Fixes the GA seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ga.seed = Some(seed);
        self
    }

    /// Requests an itemized cost breakdown in the result.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Checks weights and GA settings.
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        self.ga.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_deserialize() {
        let params: MatchParams = serde_json::from_str(
            r#"{"population_size": 50, "duplicate": 12.5, "seed": 3, "verbose": true}"#,
        )
        .unwrap();
        assert_eq!(params.ga.population_size, 50);
        assert_eq!(params.ga.seed, Some(3));
        assert_eq!(params.weights.duplicate, 12.5);
        assert_eq!(params.weights.day, CostWeights::default().day);
        assert!(params.verbose);
    }

    #[test]
    fn test_empty_object_is_default() {
        let params: MatchParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, MatchParams::default());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_propagates() {
        let params = MatchParams::new().with_ga(GaConfig::default().with_crossover_rate(-0.1));
        assert!(params.validate().is_err());
    }
}
