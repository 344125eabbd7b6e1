//! Contract definitions for anomaly detection.
//!
//! This module contains trait definitions that providers must implement.

mod anomaly_detector;
mod attribute;

pub use anomaly_detector::AnomalyDetector;
pub use attribute::{Attribute, AttributeSet, FnAttribute};
