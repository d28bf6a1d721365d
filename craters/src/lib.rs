//! Craters - crater detection on grayscale planetary images.
//!
//! A crater lit from one side shows a bright rim facing the sun and a dark
//! shadow opposite it. The detector cuts the image into a bright mask and a
//! dark mask, traces the contours of both and pairs every bright contour with
//! its nearest dark one. Each pair is a [`Crater`]; together they form a
//! [`CraterField`] with radius and sun-angle statistics.
//!
//! A second, independent path runs a Hough circle transform over a small
//! resolution pyramid ([`find_circles`]). The [`generator`] module synthesizes
//! crater fields for testing both.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use craters::{CraterDetector, DetectorConfig};
//!
//! let image = image::open("moon.png")?;
//! let detector = CraterDetector::new(DetectorConfig::default())?;
//! let detection = detector.detect(&image)?;
//!
//! let stats = detection.field.stats();
//! println!("{} craters, sun at {:.1} deg", stats.num_craters, stats.sun_angle_degrees);
//! ```

mod config;
mod detector;
mod error;
mod extract;
pub mod generator;
mod matcher;
mod model;
mod multiscale;
mod report;
mod segment;
pub mod vision;

#[cfg(test)]
pub(crate) mod test_utils;

#[cfg(test)]
mod tests;

// ============================================================================
// Configuration and errors
// ============================================================================

pub use config::{
    CircleConfig, DetectorConfig, KernelSize, MatchConfig, MatchStrategy, OpenCleanup,
    SegmentationConfig,
};
pub use error::{Error, Result};
pub use report::{LogReporter, NullReporter, Reporter};

// ============================================================================
// Pipeline
// ============================================================================

pub use detector::{detect, find_circles, CraterDetector, Detection};

// ============================================================================
// Stages
// ============================================================================

pub use extract::{extract_contours, ContourSet};
pub use matcher::{match_contours, min_cost_assignment, ContourFeature, CraterCandidate, MatchOutcome};
pub use multiscale::{build_pyramid, dedup_circles, DetectedCircle};
pub use segment::{local_maxima, peak_bounds, segment, Segmentation, ThresholdBounds};

/// Multi-scale circle detection on an already grayscale image.
pub use multiscale::find_circles as find_circles_gray;

// ============================================================================
// Results
// ============================================================================

pub use model::{Crater, CraterField, FieldStats};
