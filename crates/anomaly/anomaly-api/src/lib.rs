//! Anomaly Detection API
//!
//! Configuration types and builders for isolation forest anomaly detection.

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use anomaly_spi::{AnomalyError, AnomalyResult, Attribute, AttributeSet, Result};

/// Default number of trees.
pub const DEFAULT_N_TREES: usize = 100;

/// Default subsample size per tree.
pub const DEFAULT_SAMPLE_SIZE: usize = 256;

/// Default decision threshold for [`DetectorConfig`].
pub const DEFAULT_THRESHOLD: f64 = 0.6;

// ============================================================================
// Forest Configuration
// ============================================================================

/// What to do when the requested subsample is larger than the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplePolicy {
    /// Reject the configuration.
    #[default]
    Strict,
    /// Shrink the subsample to the population size.
    ClampToPopulation,
}

/// Isolation forest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees in the ensemble (default: 100).
    pub n_trees: usize,
    /// Items drawn without replacement per tree (default: 256).
    pub sample_size: usize,
    /// Maximum path depth explored while scoring (default: sample size - 1).
    pub height_limit: Option<usize>,
    /// Handling of a subsample larger than the population.
    pub sample_policy: SamplePolicy,
    /// Round the subsample size down to a power of two.
    pub round_to_power_of_two: bool,
    /// Master seed; `None` draws one from OS entropy.
    pub seed: Option<u64>,
    /// Build trees and batch-score on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_N_TREES,
            sample_size: DEFAULT_SAMPLE_SIZE,
            height_limit: None,
            sample_policy: SamplePolicy::Strict,
            round_to_power_of_two: false,
            seed: None,
            parallel: true,
        }
    }
}

impl ForestConfig {
    pub fn new(n_trees: usize, sample_size: usize) -> Self {
        Self {
            n_trees,
            sample_size,
            ..Default::default()
        }
    }

    pub fn with_n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_height_limit(mut self, height_limit: usize) -> Self {
        self.height_limit = Some(height_limit);
        self
    }

    pub fn with_sample_policy(mut self, policy: SamplePolicy) -> Self {
        self.sample_policy = policy;
        self
    }

    /// Shorthand for [`SamplePolicy::ClampToPopulation`].
    pub fn clamped(self) -> Self {
        self.with_sample_policy(SamplePolicy::ClampToPopulation)
    }

    pub fn with_power_of_two(mut self, enabled: bool) -> Self {
        self.round_to_power_of_two = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check the population-independent parameters.
    pub fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            return Err(AnomalyError::invalid_configuration(
                "n_trees",
                "must be at least 1",
            ));
        }
        if self.sample_size == 0 {
            return Err(AnomalyError::invalid_configuration(
                "sample_size",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Subsample size actually used for a population of `population` items.
    ///
    /// Applies the sample policy first, then the optional power-of-two rounding.
    pub fn resolve_sample_size(&self, population: usize) -> Result<usize> {
        self.validate()?;
        if population == 0 {
            return Err(AnomalyError::invalid_configuration(
                "items",
                "population must not be empty",
            ));
        }

        let psi = match self.sample_policy {
            SamplePolicy::Strict if self.sample_size > population => {
                return Err(AnomalyError::invalid_configuration(
                    "sample_size",
                    format!(
                        "{} exceeds population size {}",
                        self.sample_size, population
                    ),
                ));
            }
            SamplePolicy::Strict => self.sample_size,
            SamplePolicy::ClampToPopulation => self.sample_size.min(population),
        };

        if self.round_to_power_of_two {
            Ok(floor_power_of_two(psi))
        } else {
            Ok(psi)
        }
    }

    /// Height limit used when scoring with subsample size `psi`.
    ///
    /// A tree built from `psi` items is at most `psi - 1` deep, so larger
    /// limits are capped there.
    pub fn resolve_height_limit(&self, psi: usize) -> usize {
        let full_depth = psi.saturating_sub(1);
        self.height_limit.map_or(full_depth, |l| l.min(full_depth))
    }
}

/// Largest power of two `<= n`, for `n >= 1`.
fn floor_power_of_two(n: usize) -> usize {
    1 << (usize::BITS - 1 - n.leading_zeros())
}

// ============================================================================
// Detector Configuration
// ============================================================================

/// Isolation forest detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Forest parameters used on every fit.
    pub forest: ForestConfig,
    /// Scores strictly above this value are flagged (default: 0.6).
    pub threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            forest: ForestConfig::default(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl DetectorConfig {
    pub fn new(forest: ForestConfig, threshold: f64) -> Self {
        Self { forest, threshold }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(AnomalyError::invalid_configuration(
                "threshold",
                "must be in (0, 1]",
            ));
        }
        self.forest.validate()
    }
}
