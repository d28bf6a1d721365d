//! Multi-scale Hough circle detection.
//!
//! The blurred image is run through the circle transform at every level of a
//! small resolution pyramid. Detections are mapped back to source pixels and
//! near-duplicates across levels are merged. Merging compares every pair of
//! circles, which is fine for the hundreds of detections one image yields but
//! has no spatial index to scale beyond that.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::config::CircleConfig;
use crate::error::Result;
use crate::report::Reporter;
use crate::vision::{gaussian_blur, hough_circles, pyr_down, pyr_up, HoughCircle, HoughParams};

/// A circle in source image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetectedCircle {
    pub x: i32,
    pub y: i32,
    pub radius: u32,
}

impl DetectedCircle {
    pub fn new(x: i32, y: i32, radius: u32) -> Self {
        Self { x, y, radius }
    }

    /// Distance in `(x, y, radius)` space.
    fn distance(&self, other: &DetectedCircle) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        let dr = f64::from(self.radius) - f64::from(other.radius);
        (dx * dx + dy * dy + dr * dr).sqrt()
    }
}

/// `steps / 2` halved levels (coarsest first), `image` itself, then
/// `steps / 2` doubled levels (finest last).
pub fn build_pyramid(image: &GrayImage, steps: usize) -> Vec<GrayImage> {
    let half = steps / 2;

    let mut coarse = Vec::with_capacity(half);
    let mut level = image.clone();
    for _ in 0..half {
        level = pyr_down(&level);
        coarse.push(level.clone());
    }
    coarse.reverse();

    let mut levels = coarse;
    levels.push(image.clone());
    let mut level = image.clone();
    for _ in 0..half {
        level = pyr_up(&level);
        levels.push(level.clone());
    }
    levels
}

/// Circles of `image` across the pyramid, deduplicated, in detection order.
pub fn find_circles(
    image: &GrayImage,
    config: &CircleConfig,
    reporter: &dyn Reporter,
) -> Result<Vec<DetectedCircle>> {
    config.validate()?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Ok(Vec::new());
    }

    let ceiling = config.radius_ceiling(width, height);
    let params = HoughParams {
        min_center_distance: config.min_center_distance,
        canny_threshold: config.canny_threshold,
        accumulator_threshold: config.accumulator_threshold,
        min_radius: config.min_radius,
        max_radius: ceiling,
    };

    let blurred = gaussian_blur(image, config.blur_kernel, config.blur_sigma);
    let levels = build_pyramid(&blurred, config.steps);

    let clamp = config.max_radius.is_none().then_some(ceiling);
    let mut circles = Vec::new();
    for level in &levels {
        let width_ratio = f64::from(level.width()) / f64::from(width);
        let height_ratio = f64::from(level.height()) / f64::from(height);

        let found = hough_circles(level, &params, reporter);
        reporter.debug(format_args!(
            "pyramid level {}x{}: {} circles",
            level.width(),
            level.height(),
            found.len()
        ));

        circles.extend(
            found
                .iter()
                .map(|circle| to_source(circle, width_ratio, height_ratio, clamp)),
        );
    }

    let min_dist = config.dedup_distance(width, height);
    let merged = dedup_circles(&circles, min_dist);
    reporter.info(format_args!(
        "{} circles over {} pyramid levels, {} after merging",
        circles.len(),
        levels.len(),
        merged.len()
    ));
    Ok(merged)
}

/// Maps a circle found on a pyramid level back to source pixels, clamping
/// the radius to `ceiling` when one is given.
fn to_source(
    circle: &HoughCircle,
    width_ratio: f64,
    height_ratio: f64,
    ceiling: Option<u32>,
) -> DetectedCircle {
    let x = f64::from(circle.x) / width_ratio;
    let y = f64::from(circle.y) / height_ratio;
    // The radius shares a single factor for both axes.
    let mut radius = f64::from(circle.radius) / (height_ratio / width_ratio);
    if let Some(ceiling) = ceiling {
        radius = radius.min(f64::from(ceiling));
    }
    DetectedCircle::new(
        x.round() as i32,
        y.round() as i32,
        radius.round().max(0.0) as u32,
    )
}

/// Merges circles closer than `min_dist * 1.01^mean_radius` in `(x, y, radius)`.
///
/// Passes repeat until nothing merges, so the result is a fixed point:
/// deduplicating it again returns it unchanged.
pub fn dedup_circles(circles: &[DetectedCircle], min_dist: f64) -> Vec<DetectedCircle> {
    let mut current = circles.to_vec();
    loop {
        let next = dedup_pass(&current, min_dist);
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

/// One sweep in order: each unconsumed circle collects every later unconsumed
/// circle within tolerance, and the cluster becomes its rounded mean.
fn dedup_pass(circles: &[DetectedCircle], min_dist: f64) -> Vec<DetectedCircle> {
    let mut consumed = vec![false; circles.len()];
    let mut merged = Vec::with_capacity(circles.len());

    for i in 0..circles.len() {
        if consumed[i] {
            continue;
        }
        consumed[i] = true;
        let anchor = circles[i];
        let mut sum = (f64::from(anchor.x), f64::from(anchor.y), f64::from(anchor.radius));
        let mut count = 1.0;

        for j in i + 1..circles.len() {
            if consumed[j] {
                continue;
            }
            let other = circles[j];
            if anchor.distance(&other) < merge_tolerance(&anchor, &other, min_dist) {
                consumed[j] = true;
                sum.0 += f64::from(other.x);
                sum.1 += f64::from(other.y);
                sum.2 += f64::from(other.radius);
                count += 1.0;
            }
        }

        merged.push(DetectedCircle::new(
            (sum.0 / count).round_ties_even() as i32,
            (sum.1 / count).round_ties_even() as i32,
            (sum.2 / count).round_ties_even() as u32,
        ));
    }
    merged
}

/// Tolerance grows 1% per pixel of the pair's mean radius.
fn merge_tolerance(a: &DetectedCircle, b: &DetectedCircle, min_dist: f64) -> f64 {
    let mean_radius = (f64::from(a.radius) + f64::from(b.radius)) / 2.0;
    min_dist * 1.01f64.powf(mean_radius)
}
