//! Isolation forest behind the fit/score detector contract.

use anomaly_api::DetectorConfig;
use anomaly_spi::{AnomalyDetector, AnomalyError, AnomalyResult, AttributeSet, Result};

use crate::forest::IsolationForest;

/// Isolation forest anomaly detector.
///
/// Each call to [`AnomalyDetector::fit`] builds a fresh forest from the given
/// population; scoring before a successful fit is an
/// [`AnomalyError::InvalidState`] error.
pub struct IsolationForestDetector<T> {
    config: DetectorConfig,
    attributes: AttributeSet<T>,
    forest: Option<IsolationForest<T>>,
}

impl<T> IsolationForestDetector<T> {
    /// Create a detector with the default configuration.
    pub fn new(attributes: AttributeSet<T>) -> Self {
        Self::from_config(attributes, DetectorConfig::default())
    }

    /// Create from configuration.
    pub fn from_config(attributes: AttributeSet<T>, config: DetectorConfig) -> Self {
        Self {
            config,
            attributes,
            forest: None,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// The forest built by the last successful fit.
    pub fn forest(&self) -> Option<&IsolationForest<T>> {
        self.forest.as_ref()
    }

    fn fitted_forest(&self) -> Result<&IsolationForest<T>> {
        self.forest.as_ref().ok_or_else(AnomalyError::not_fitted)
    }
}

impl<T: Sync> AnomalyDetector<T> for IsolationForestDetector<T> {
    fn fit(&mut self, items: &[T]) -> Result<()> {
        self.forest = None;
        self.config.validate()?;
        let forest = IsolationForest::builder(items, self.attributes.clone())
            .config(self.config.forest.clone())
            .build()?;
        self.forest = Some(forest);
        Ok(())
    }

    fn detect(&self, items: &[T]) -> Result<AnomalyResult> {
        let scores = self.score(items)?;
        Ok(AnomalyResult::from_scores(scores, self.config.threshold))
    }

    fn score(&self, items: &[T]) -> Result<Vec<f64>> {
        Ok(self.fitted_forest()?.score_all(items))
    }

    fn is_fitted(&self) -> bool {
        self.forest.is_some()
    }
}
