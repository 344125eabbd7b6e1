//! # anomaly
//!
//! Isolation forest anomaly detection.
//!
//! Items of any type are described by a set of real-valued attributes. A
//! forest of random split trees is grown on subsamples of the population, and
//! items that the trees isolate in few splits receive scores close to 1.
//!
//! ```rust
//! use anomaly::{AnomalyDetector, AttributeSet, DetectorConfig, ForestConfig, IsolationForestDetector};
//!
//! let mut items: Vec<(f64, f64)> = (0..100)
//!     .map(|i| ((i % 10) as f64 * 0.1, (i / 10) as f64 * 0.1))
//!     .collect();
//! items.push((8.0, -8.0));
//!
//! let attributes = AttributeSet::new()
//!     .with("x", |p: &(f64, f64)| p.0)
//!     .with("y", |p: &(f64, f64)| p.1);
//! let config = DetectorConfig::new(ForestConfig::new(100, 64).with_seed(7), 0.6);
//!
//! let mut detector = IsolationForestDetector::from_config(attributes, config);
//! detector.fit(&items).unwrap();
//! let result = detector.detect(&items).unwrap();
//!
//! assert_eq!(result.top(1)[0].0, 100);
//! ```

pub use anomaly_facade::*;
