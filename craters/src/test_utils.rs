//! Synthetic images for unit tests.
//!
//! Plateaus of one value have no strict local maxima along the raster, so lit
//! and shadowed disks carry a one-pixel column texture: bright disks alternate
//! 250/255 and dark disks 0/5. Odd columns hold the peaks.

use image::{GrayImage, Luma};

pub const BACKGROUND: u8 = 128;

pub fn blank(width: u32, height: u32, value: u8) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([value]))
}

fn paint_disk(image: &mut GrayImage, center: (i32, i32), radius: i32, value: impl Fn(u32) -> u8) {
    let r2 = radius * radius;
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let dx = x as i32 - center.0;
        let dy = y as i32 - center.1;
        if dx * dx + dy * dy <= r2 {
            *pixel = Luma([value(x)]);
        }
    }
}

pub fn paint_bright_disk(image: &mut GrayImage, center: (i32, i32), radius: i32) {
    paint_disk(image, center, radius, |x| if x % 2 == 1 { 255 } else { 250 });
}

pub fn paint_dark_disk(image: &mut GrayImage, center: (i32, i32), radius: i32) {
    paint_disk(image, center, radius, |x| if x % 2 == 1 { 5 } else { 0 });
}

/// A lit disk over a shadow disk on a flat background. The shadow is drawn
/// first, so overlapping disks leave a dark crescent.
pub fn crater_scene(
    width: u32,
    height: u32,
    bright: (i32, i32),
    dark: (i32, i32),
    radius: i32,
) -> GrayImage {
    let mut image = blank(width, height, BACKGROUND);
    paint_dark_disk(&mut image, dark, radius);
    paint_bright_disk(&mut image, bright, radius);
    image
}

/// A plain light disk on a dark background, for the circle detectors.
pub fn disk_image(width: u32, height: u32, center: (i32, i32), radius: i32) -> GrayImage {
    let mut image = blank(width, height, 30);
    paint_disk(&mut image, center, radius, |_| 220);
    image
}
