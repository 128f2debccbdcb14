//! Cost anomaly detection
//!
//! Flags days whose cost exceeds an interquartile-range threshold
//! computed over the whole billing series.

mod iqr_detector;

pub use iqr_detector::{quantile, AnomalyReport, DetectorError, IqrDetector};
