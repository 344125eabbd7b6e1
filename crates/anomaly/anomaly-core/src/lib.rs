//! Anomaly Detection Core
//!
//! Isolation forest construction, path length scoring, and the
//! fit/score detector built on top of it.

mod correction;
mod sampling;
mod tree;
mod forest;
mod detector;

pub use correction::*;
pub use tree::*;
pub use forest::*;
pub use detector::*;
