//! Gaussian smoothing and the 2x resolution pyramid.

use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter::separable_filter_equal;

type FloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Binomial weights of the 5-tap pyramid filter.
const PYRAMID_TAPS: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// Normalised 1-D Gaussian of `size` taps centred on the middle one.
pub fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let size = size.max(1) as i32;
    let half = (size - 1) as f32 / 2.0;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - half;
            (-(x * x) / denom).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// Separable Gaussian blur with a `size x size` kernel.
pub fn gaussian_blur(image: &GrayImage, size: u32, sigma: f32) -> GrayImage {
    filter_rounded(image, &gaussian_kernel(size, sigma))
}

/// Separable filter computed in `f32` and rounded back to 8 bits once.
fn filter_rounded(image: &GrayImage, kernel: &[f32]) -> GrayImage {
    let float: FloatImage = ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        Luma([f32::from(image.get_pixel(x, y)[0])])
    });
    let filtered = separable_filter_equal(&float, kernel);
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([filtered.get_pixel(x, y)[0].round().clamp(0.0, 255.0) as u8])
    })
}

/// Halves the resolution: 5-tap blur, then every second row and column.
/// Output size is `ceil(w / 2) x ceil(h / 2)`.
pub fn pyr_down(image: &GrayImage) -> GrayImage {
    let blurred = filter_rounded(image, &PYRAMID_TAPS);
    let width = image.width().div_ceil(2);
    let height = image.height().div_ceil(2);
    GrayImage::from_fn(width, height, |x, y| *blurred.get_pixel(2 * x, 2 * y))
}

/// Doubles the resolution: bilinear upsampling, then the 5-tap blur.
pub fn pyr_up(image: &GrayImage) -> GrayImage {
    let upsampled = imageops::resize(
        image,
        image.width() * 2,
        image.height() * 2,
        FilterType::Triangle,
    );
    filter_rounded(&upsampled, &PYRAMID_TAPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalised_and_symmetric() {
        let kernel = gaussian_kernel(9, 2.0);
        assert_eq!(kernel.len(), 9);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        for i in 0..4 {
            assert!((kernel[i] - kernel[8 - i]).abs() < 1e-7);
        }
        assert!(kernel[4] > kernel[3]);
    }

    #[test]
    fn pyramid_sizes() {
        let image = GrayImage::new(101, 64);
        let down = pyr_down(&image);
        assert_eq!(down.dimensions(), (51, 32));
        let up = pyr_up(&image);
        assert_eq!(up.dimensions(), (202, 128));
    }

    #[test]
    fn flat_image_stays_flat() {
        let image = GrayImage::from_pixel(40, 30, Luma([90]));
        for level in [gaussian_blur(&image, 9, 2.0), pyr_down(&image), pyr_up(&image)] {
            assert!(level.pixels().all(|p| p[0] == 90));
        }
    }

    #[test]
    fn repeated_blur_keeps_brightness() {
        let mut image =
            GrayImage::from_fn(32, 32, |x, _| Luma([if x % 2 == 0 { 201 } else { 199 }]));
        for _ in 0..5 {
            image = gaussian_blur(&image, 9, 2.0);
        }
        let mean = image.pixels().map(|p| f64::from(p[0])).sum::<f64>() / (32.0 * 32.0);
        assert!((mean - 200.0).abs() < 0.5, "mean drifted to {mean}");
    }
}
