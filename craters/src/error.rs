//! Error types for crater detection.

use thiserror::Error;

/// Failures surfaced by the detection pipeline.
///
/// All of them are local to one image and recoverable by the caller; the
/// pipeline never retries on its own (widening percentiles, say, is up to
/// whoever called it).
#[derive(Debug, Error)]
pub enum Error {
    #[error("Image has no local intensity maxima, cannot derive thresholds")]
    EmptyPeakSet,

    #[error("Segmentation produced no dark contours to pair with")]
    NoDarkContours,

    #[error("Segmentation produced no bright contours")]
    NoBrightContours,

    #[error("Contour has {points} points, at least 3 are required")]
    DegenerateContour { points: usize },

    #[error("Unsupported image shape: {channels} channels, expected 1 or 3")]
    UnsupportedImageShape { channels: u8 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
