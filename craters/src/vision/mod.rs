//! Image-processing primitives the detector is built on.
//!
//! Most of this is a thin layer over `image` and `imageproc` (grayscale
//! conversion, morphology, border following, edges, filtering, drawing). The
//! pieces those crates do not ship, namely the minimum enclosing circle,
//! the gradient Hough circle transform and the resolution pyramid, are
//! implemented here so the stages above only ever talk to this module.

mod contours;
mod drawing;
mod enclosing_circle;
mod geometry;
mod hough;
mod morphology;
mod pyramid;

pub use contours::{find_contours, Contour, Point};
pub use drawing::{draw_contour_mut, draw_segment_mut};
pub use enclosing_circle::{min_enclosing_circle, Circle};
pub use geometry::{arc_length, bounding_rect, contour_area, convex_hull};
pub use hough::{hough_circles, HoughCircle, HoughParams};
pub use morphology::{dilate, erode, morph_close, morph_open, StructuringElement};
pub use pyramid::{gaussian_blur, gaussian_kernel, pyr_down, pyr_up};

use image::{DynamicImage, GrayImage, Luma};

use crate::error::{Error, Result};

/// Converts a single- or three-channel image to 8-bit grayscale.
pub fn grayscale(image: &DynamicImage) -> Result<GrayImage> {
    match image.color().channel_count() {
        1 | 3 => Ok(image.to_luma8()),
        channels => Err(Error::UnsupportedImageShape { channels }),
    }
}

/// Binary mask of the pixels whose value lies in `[lo, hi]` (255 inside, 0 outside).
pub fn range_mask(image: &GrayImage, lo: u8, hi: u8) -> GrayImage {
    let mut mask = GrayImage::new(image.width(), image.height());
    for (src, dst) in image.pixels().zip(mask.pixels_mut()) {
        if (lo..=hi).contains(&src.0[0]) {
            *dst = Luma([255]);
        }
    }
    mask
}
