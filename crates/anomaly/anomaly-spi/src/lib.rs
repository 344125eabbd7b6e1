//! Anomaly Detection Service Provider Interface
//!
//! Defines the item/attribute contracts, the detector trait and the shared
//! error and result types for isolation-based anomaly detection.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{AnomalyDetector, Attribute, AttributeSet, FnAttribute};
pub use error::{AnomalyError, Result};
pub use model::AnomalyResult;
