//! Configuration types for crater detection.
//!
//! Every tunable of the pipeline lives in one of the structs below. They are
//! plain values: build one per run, validate it, hand it to
//! [`CraterDetector`](crate::CraterDetector). Nothing here is process-wide, so
//! two detectors with different settings can live side by side.
//!
//! All structs deserialize with `#[serde(default)]`, which means a config file
//! only has to name the fields it changes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Kernels
// ============================================================================

/// Size of an elliptical structuring element, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSize {
    pub width: u8,
    pub height: u8,
}

impl KernelSize {
    pub const fn square(size: u8) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "{name} must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Erode-then-dilate pass that removes speckle noise from a raw threshold mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenCleanup {
    pub erode: KernelSize,
    pub dilate: KernelSize,
}

impl Default for OpenCleanup {
    fn default() -> Self {
        Self {
            erode: KernelSize::square(5),
            dilate: KernelSize::square(10),
        }
    }
}

// ============================================================================
// Segmentation
// ============================================================================

/// Adaptive threshold and mask cleaning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Fraction of the sorted peak values below the dark threshold.
    pub low_percentile: f64,
    /// Fraction of the sorted peak values below the bright threshold.
    pub high_percentile: f64,
    /// Structuring element of the morphological close applied to both masks.
    pub close_kernel: KernelSize,
    /// Optional noise removal run on the raw masks before closing.
    pub open_cleanup: Option<OpenCleanup>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            low_percentile: 0.001,
            high_percentile: 0.95,
            close_kernel: KernelSize::square(10),
            open_cleanup: None,
        }
    }
}

impl SegmentationConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("low_percentile", self.low_percentile),
            ("high_percentile", self.high_percentile),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be in [0, 1), got {value}"
                )));
            }
        }
        if self.low_percentile >= self.high_percentile {
            return Err(Error::InvalidConfig(format!(
                "low_percentile ({}) must be below high_percentile ({})",
                self.low_percentile, self.high_percentile
            )));
        }
        self.close_kernel.validate("close_kernel")?;
        if let Some(cleanup) = &self.open_cleanup {
            cleanup.erode.validate("open_cleanup.erode")?;
            cleanup.dilate.validate("open_cleanup.dilate")?;
        }
        Ok(())
    }
}

// ============================================================================
// Matching
// ============================================================================

/// How bright contours are paired with dark contours.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchStrategy {
    /// Every bright contour takes its nearest dark contour. A dark contour
    /// can end up in several candidates.
    #[default]
    Greedy,
    /// Minimum total distance assignment where each dark contour is used at
    /// most once. Bright contours left without a partner produce no candidate.
    OneToOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub strategy: MatchStrategy,
}

// ============================================================================
// Multi-scale circle detection
// ============================================================================

/// Parameters of the pyramid Hough circle detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleConfig {
    /// Side of the square Gaussian kernel applied before building the pyramid. Must be odd.
    pub blur_kernel: u32,
    /// Sigma of that Gaussian, in pixels.
    pub blur_sigma: f32,
    /// Number of pyramid levels. `steps / 2` levels are coarser and `steps / 2`
    /// finer than the source.
    pub steps: usize,
    /// Minimum distance between two circle centres found at one level.
    pub min_center_distance: f32,
    /// High Canny threshold of the edge pass; the low one is half of it.
    pub canny_threshold: f32,
    /// Votes a centre needs, and edge points a radius needs, to be accepted.
    pub accumulator_threshold: u32,
    /// Smallest radius searched, in level pixels.
    pub min_radius: u32,
    /// Largest radius searched. `None` uses a quarter of the mean source side
    /// and clamps rescaled radii to it; `Some` bypasses that ceiling.
    pub max_radius: Option<u32>,
    /// Base distance of the duplicate merge. `None` uses `(width + height) / 2 / 500`.
    pub dedup_min_dist: Option<f64>,
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            blur_kernel: 9,
            blur_sigma: 2.0,
            steps: 3,
            min_center_distance: 5.0,
            canny_threshold: 20.0,
            accumulator_threshold: 70,
            min_radius: 0,
            max_radius: None,
            dedup_min_dist: None,
        }
    }
}

impl CircleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.blur_kernel == 0 || self.blur_kernel % 2 == 0 {
            return Err(Error::InvalidConfig(format!(
                "blur_kernel must be odd, got {}",
                self.blur_kernel
            )));
        }
        if !(self.blur_sigma > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "blur_sigma must be positive, got {}",
                self.blur_sigma
            )));
        }
        if self.steps == 0 {
            return Err(Error::InvalidConfig("steps must be at least 1".into()));
        }
        if self.canny_threshold <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "canny_threshold must be positive, got {}",
                self.canny_threshold
            )));
        }
        if let Some(max_radius) = self.max_radius {
            if max_radius < self.min_radius {
                return Err(Error::InvalidConfig(format!(
                    "max_radius ({max_radius}) is below min_radius ({})",
                    self.min_radius
                )));
            }
        }
        if let Some(min_dist) = self.dedup_min_dist {
            if min_dist.is_nan() || min_dist < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "dedup_min_dist must be non-negative, got {min_dist}"
                )));
            }
        }
        Ok(())
    }

    /// Radius search ceiling for a source image of the given size.
    pub fn radius_ceiling(&self, width: u32, height: u32) -> u32 {
        self.max_radius
            .unwrap_or_else(|| ((width as f64 + height as f64) / 2.0 / 4.0) as u32)
    }

    /// Base distance of the duplicate merge for a source image of the given size.
    pub fn dedup_distance(&self, width: u32, height: u32) -> f64 {
        self.dedup_min_dist
            .unwrap_or((width as f64 + height as f64) / 2.0 / 500.0)
    }
}

// ============================================================================
// Detector
// ============================================================================

/// Full configuration of one detection run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub segmentation: SegmentationConfig,
    pub matching: MatchConfig,
    pub circles: CircleConfig,
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        self.segmentation.validate()?;
        self.circles.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        DetectorConfig::default().validate().unwrap();
    }

    #[test]
    fn percentile_order_is_checked() {
        let config = SegmentationConfig {
            low_percentile: 0.5,
            high_percentile: 0.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn percentile_of_one_is_rejected() {
        let config = SegmentationConfig {
            high_percentile: 1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn even_blur_kernel_is_rejected() {
        let config = CircleConfig {
            blur_kernel: 8,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn nan_blur_sigma_is_rejected() {
        let config = CircleConfig {
            blur_sigma: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn derived_circle_bounds() {
        let config = CircleConfig::default();
        assert_eq!(config.radius_ceiling(400, 200), 75);
        assert!((config.dedup_distance(600, 400) - 1.0).abs() < 1e-12);

        let bypassed = CircleConfig {
            max_radius: Some(500),
            dedup_min_dist: Some(3.0),
            ..Default::default()
        };
        assert_eq!(bypassed.radius_ceiling(400, 200), 500);
        assert_eq!(bypassed.dedup_distance(600, 400), 3.0);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "segmentation:\n  high_percentile: 0.9\nmatching:\n  strategy: one_to_one\n";
        let config: DetectorConfig = serde_yml::from_str(yaml).unwrap();

        assert_eq!(config.segmentation.high_percentile, 0.9);
        assert_eq!(config.segmentation.low_percentile, 0.001);
        assert_eq!(config.matching.strategy, MatchStrategy::OneToOne);
        assert_eq!(config.circles, CircleConfig::default());
    }

    #[test]
    fn match_strategy_parses_from_text() {
        assert_eq!(
            "one_to_one".parse::<MatchStrategy>().unwrap(),
            MatchStrategy::OneToOne
        );
        assert_eq!(MatchStrategy::Greedy.to_string(), "greedy");
    }
}
