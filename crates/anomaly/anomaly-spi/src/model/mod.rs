//! Data models for anomaly detection.
//!
//! This module contains data structures used throughout the anomaly detection system.

mod anomaly_result;

pub use anomaly_result::AnomalyResult;
