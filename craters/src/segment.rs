//! Adaptive thresholding of an image into bright and dark feature masks.
//!
//! Thresholds come from the strict local maxima of the image read as one long
//! raster sequence: a bright spot or a textured shadow yields a run of peaks,
//! flat regions yield none. The peak values are sorted and the two configured
//! percentiles pick the dark and bright bounds.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::config::SegmentationConfig;
use crate::error::{Error, Result};
use crate::report::Reporter;
use crate::vision::{dilate, erode, morph_close, range_mask, StructuringElement};

/// Intensity bounds of the two masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdBounds {
    /// Dark mask is `[0, min_val]`.
    pub min_val: u8,
    /// Bright mask is `[max_val, 255]`.
    pub max_val: u8,
}

/// Cleaned masks of one image.
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub bounds: ThresholdBounds,
    pub bright: GrayImage,
    pub dark: GrayImage,
}

/// Values of the samples strictly greater than both raster neighbours.
/// The first and last samples have one neighbour and are never peaks.
pub fn local_maxima(samples: &[u8]) -> Vec<u8> {
    samples
        .windows(3)
        .filter(|w| w[1] > w[0] && w[1] > w[2])
        .map(|w| w[1])
        .collect()
}

/// Picks `sorted[floor(p * N)]` from the raster peaks for each percentile.
pub fn peak_bounds(
    image: &GrayImage,
    low_percentile: f64,
    high_percentile: f64,
) -> Result<ThresholdBounds> {
    let mut peaks = local_maxima(image.as_raw());
    if peaks.is_empty() {
        return Err(Error::EmptyPeakSet);
    }
    peaks.sort_unstable();

    let at = |p: f64| {
        let index = (p * peaks.len() as f64).floor() as usize;
        peaks[index.min(peaks.len() - 1)]
    };
    Ok(ThresholdBounds {
        min_val: at(low_percentile),
        max_val: at(high_percentile),
    })
}

/// Thresholds `image` and cleans both masks.
pub fn segment(
    image: &GrayImage,
    config: &SegmentationConfig,
    reporter: &dyn Reporter,
) -> Result<Segmentation> {
    let bounds = peak_bounds(image, config.low_percentile, config.high_percentile)?;
    reporter.debug(format_args!(
        "threshold bounds: dark <= {}, bright >= {}",
        bounds.min_val, bounds.max_val
    ));

    let close = StructuringElement::ellipse(config.close_kernel);
    let cleanup = config.open_cleanup.map(|open| {
        (
            StructuringElement::ellipse(open.erode),
            StructuringElement::ellipse(open.dilate),
        )
    });

    let clean = |raw: GrayImage| {
        let raw = match &cleanup {
            Some((erode_element, dilate_element)) => {
                dilate(&erode(&raw, erode_element), dilate_element)
            }
            None => raw,
        };
        morph_close(&raw, &close)
    };

    let bright = clean(range_mask(image, bounds.max_val, u8::MAX));
    let dark = clean(range_mask(image, 0, bounds.min_val));

    Ok(Segmentation {
        bounds,
        bright,
        dark,
    })
}
