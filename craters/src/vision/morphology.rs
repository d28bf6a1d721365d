//! Binary morphology with elliptical structuring elements.
//!
//! Masks are 0/255 images, so imageproc's grayscale morphology (max/min over
//! the element) is exactly binary dilation/erosion.

use image::{GrayImage, Luma};
use imageproc::morphology::{
    grayscale_close, grayscale_dilate, grayscale_erode, grayscale_open, Mask,
};

use crate::config::KernelSize;

/// A structuring element together with the mask imageproc operates on.
pub struct StructuringElement {
    size: KernelSize,
    mask: Mask,
}

impl StructuringElement {
    /// Ellipse inscribed in a `width x height` box, anchored at its centre.
    ///
    /// Row `i` spans `c - dx ..= c + dx` with `dx = round(c * sqrt(1 - (i - r)^2 / r^2))`,
    /// `r = height / 2`, `c = width / 2`, which is the classic construction for
    /// elliptical kernels (a 1-row kernel is a full line).
    pub fn ellipse(size: KernelSize) -> Self {
        let width = u32::from(size.width.max(1));
        let height = u32::from(size.height.max(1));
        let r = (height / 2) as i64;
        let c = (width / 2) as i64;
        let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

        let mut image = GrayImage::new(width, height);
        for i in 0..height as i64 {
            let dy = i - r;
            if dy.abs() > r {
                continue;
            }
            let dx = if r > 0 {
                (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as i64
            } else {
                c
            };
            let j1 = (c - dx).max(0);
            let j2 = (c + dx + 1).min(width as i64);
            for j in j1..j2 {
                image.put_pixel(j as u32, i as u32, Luma([255]));
            }
        }

        let mask = Mask::from_image(&image, c as u8, r as u8);
        Self { size, mask }
    }

    pub fn size(&self) -> KernelSize {
        self.size
    }
}

impl std::fmt::Debug for StructuringElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuringElement")
            .field("size", &self.size)
            .finish()
    }
}

pub fn erode(mask: &GrayImage, element: &StructuringElement) -> GrayImage {
    grayscale_erode(mask, &element.mask)
}

pub fn dilate(mask: &GrayImage, element: &StructuringElement) -> GrayImage {
    grayscale_dilate(mask, &element.mask)
}

/// Dilate then erode: merges fragments closer than the element into one blob.
pub fn morph_close(mask: &GrayImage, element: &StructuringElement) -> GrayImage {
    grayscale_close(mask, &element.mask)
}

/// Erode then dilate with the same element: drops specks smaller than it.
pub fn morph_open(mask: &GrayImage, element: &StructuringElement) -> GrayImage {
    grayscale_open(mask, &element.mask)
}
