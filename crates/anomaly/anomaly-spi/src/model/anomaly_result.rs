//! Anomaly detection result types.

use serde::{Deserialize, Serialize};

/// Anomaly detection result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    /// Boolean mask indicating anomalies.
    pub is_anomaly: Vec<bool>,
    /// Anomaly scores for each item.
    pub scores: Vec<f64>,
    /// Threshold used for detection.
    pub threshold: f64,
}

impl AnomalyResult {
    /// Create a new anomaly result.
    pub fn new(is_anomaly: Vec<bool>, scores: Vec<f64>, threshold: f64) -> Self {
        Self {
            is_anomaly,
            scores,
            threshold,
        }
    }

    /// Build a result by flagging every score strictly above `threshold`.
    pub fn from_scores(scores: Vec<f64>, threshold: f64) -> Self {
        let is_anomaly = scores.iter().map(|&s| s > threshold).collect();
        Self::new(is_anomaly, scores, threshold)
    }

    /// Get indices of detected anomalies.
    pub fn anomaly_indices(&self) -> Vec<usize> {
        self.is_anomaly
            .iter()
            .enumerate()
            .filter_map(|(i, &is_anomaly)| if is_anomaly { Some(i) } else { None })
            .collect()
    }

    /// Count of detected anomalies.
    pub fn anomaly_count(&self) -> usize {
        self.is_anomaly.iter().filter(|&&x| x).count()
    }

    /// `(index, score)` pairs ordered by descending score, ties by index.
    pub fn ranked(&self) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = self.scores.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    /// The `n` highest-scored items, see [`AnomalyResult::ranked`].
    pub fn top(&self, n: usize) -> Vec<(usize, f64)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}
