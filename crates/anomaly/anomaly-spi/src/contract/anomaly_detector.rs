//! Anomaly detector trait definition.

use crate::error::Result;
use crate::model::AnomalyResult;

/// Anomaly detector trait.
///
/// Implementations learn a model of "normal" from a population of items and
/// score items against it. Scores are in `(0, 1]`, higher meaning more
/// anomalous.
pub trait AnomalyDetector<T>: Send + Sync {
    /// Fit the detector to a population of items, replacing any previous model.
    fn fit(&mut self, items: &[T]) -> Result<()>;

    /// Detect anomalies among `items` using the detector's threshold.
    fn detect(&self, items: &[T]) -> Result<AnomalyResult>;

    /// Compute anomaly scores without thresholding, in item order.
    fn score(&self, items: &[T]) -> Result<Vec<f64>>;

    /// Check if detector has been fitted.
    fn is_fitted(&self) -> bool;
}
