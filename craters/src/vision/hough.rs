//! Gradient Hough circle transform.
//!
//! Edge pixels come from Canny. Each one casts a vote at every integer
//! distance along both senses of its Sobel gradient, so circle centres show up
//! as peaks where boundary normals converge. Peaks are visited strongest first;
//! a peak too close to an already accepted circle is skipped, otherwise its
//! radius is the distance most edge pixels share with it.

use image::GrayImage;
use imageproc::edges::canny;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use crate::report::Reporter;

/// Parameters of one transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoughParams {
    /// Minimum distance between accepted centres.
    pub min_center_distance: f32,
    /// High Canny threshold; the low threshold is half of it.
    pub canny_threshold: f32,
    /// Votes a centre needs, and edge pixels its radius needs.
    pub accumulator_threshold: u32,
    pub min_radius: u32,
    pub max_radius: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoughCircle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Accumulator value at the centre.
    pub votes: u32,
}

/// Finds circles in `gray`, strongest centre first.
pub fn hough_circles(
    gray: &GrayImage,
    params: &HoughParams,
    reporter: &dyn Reporter,
) -> Vec<HoughCircle> {
    let (w, h) = gray.dimensions();
    let r_min = params.min_radius.max(1);
    let r_max = params.max_radius;
    if w < 3 || h < 3 || r_max < r_min {
        return Vec::new();
    }

    let edges = canny(gray, params.canny_threshold / 2.0, params.canny_threshold);
    let gx = horizontal_sobel(gray);
    let gy = vertical_sobel(gray);

    let stride = w as usize;
    let mut accum = vec![0u32; stride * h as usize];
    let mut edge_points: Vec<(f32, f32)> = Vec::new();

    for (x, y, pixel) in edges.enumerate_pixels() {
        if pixel[0] == 0 {
            continue;
        }
        let gxv = f32::from(gx.get_pixel(x, y)[0]);
        let gyv = f32::from(gy.get_pixel(x, y)[0]);
        let mag = (gxv * gxv + gyv * gyv).sqrt();
        if mag < 1e-6 {
            continue;
        }
        let (xf, yf) = (x as f32, y as f32);
        edge_points.push((xf, yf));

        let (dx, dy) = (gxv / mag, gyv / mag);
        for sign in [1.0f32, -1.0] {
            let mut last: Option<(i64, i64)> = None;
            for r in r_min..=r_max {
                let cx = (xf + sign * dx * r as f32).round() as i64;
                let cy = (yf + sign * dy * r as f32).round() as i64;
                if cx < 0 || cy < 0 || cx >= w as i64 || cy >= h as i64 {
                    break;
                }
                // Consecutive radii can round to the same cell.
                if last == Some((cx, cy)) {
                    continue;
                }
                last = Some((cx, cy));
                accum[cy as usize * stride + cx as usize] += 1;
            }
        }
    }

    let mut centres = accumulator_peaks(&accum, w, h, params.accumulator_threshold);
    centres.sort_by(|a, b| b.2.cmp(&a.2));
    reporter.debug(format_args!(
        "hough: {} edge pixels, {} centre peaks on {w}x{h}",
        edge_points.len(),
        centres.len()
    ));

    let min_dist_sq = params.min_center_distance * params.min_center_distance;
    let mut histogram = vec![0u32; r_max as usize + 2];
    let mut circles: Vec<HoughCircle> = Vec::new();

    for (cx, cy, votes) in centres {
        let (cx, cy) = (cx as f32, cy as f32);
        let crowded = circles.iter().any(|c| {
            let (ddx, ddy) = (c.x - cx, c.y - cy);
            ddx * ddx + ddy * ddy < min_dist_sq
        });
        if crowded {
            continue;
        }

        histogram.fill(0);
        for &(ex, ey) in &edge_points {
            let d = ((ex - cx).powi(2) + (ey - cy).powi(2)).sqrt().round() as u32;
            if (r_min..=r_max).contains(&d) {
                histogram[d as usize] += 1;
            }
        }

        let mut best: Option<(u32, u32)> = None;
        for r in r_min..=r_max {
            let r = r as usize;
            let support = histogram[r - 1] + histogram[r] + histogram[r + 1];
            if best.is_none_or(|(_, s)| support > s) {
                best = Some((r as u32, support));
            }
        }

        if let Some((radius, support)) = best {
            if support >= params.accumulator_threshold {
                circles.push(HoughCircle {
                    x: cx,
                    y: cy,
                    radius: radius as f32,
                    votes,
                });
            }
        }
    }

    circles
}

/// Accumulator cells above `threshold` that dominate their 4-neighbourhood.
///
/// Ties are broken toward the top-left cell so a flat pair yields one peak.
fn accumulator_peaks(accum: &[u32], w: u32, h: u32, threshold: u32) -> Vec<(u32, u32, u32)> {
    let stride = w as usize;
    let mut peaks = Vec::new();
    for y in 1..h as usize - 1 {
        for x in 1..stride - 1 {
            let idx = y * stride + x;
            let v = accum[idx];
            if v > threshold
                && v > accum[idx - 1]
                && v >= accum[idx + 1]
                && v > accum[idx - stride]
                && v >= accum[idx + stride]
            {
                peaks.push((x as u32, y as u32, v));
            }
        }
    }
    peaks
}
