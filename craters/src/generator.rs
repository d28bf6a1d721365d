//! Synthetic crater fields.
//!
//! Each crater is three overlapping disks: a lit disk shifted against the sun
//! direction, a shadow disk shifted along it, and a background disk on top at
//! the true centre, which leaves a lit crescent and a dark crescent. Sizes
//! follow a truncated power law, so small craters dominate.

use image::{Rgb, RgbImage};
use imageproc::pixelops::interpolate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([100, 100, 100]);
pub const LIGHT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
pub const SHADOW_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub num_craters: usize,
    pub width: u32,
    pub height: u32,
    /// Smallest crater size the power law can produce, in pixels.
    pub min_radius: f64,
    /// Largest crater size the power law can produce, in pixels.
    pub max_radius: f64,
    /// Crater size divided by this is the light/shadow offset.
    pub shadow_factor: f64,
    /// Power-law exponent of the size distribution. Must not be -1.
    pub alpha: f64,
    /// Direction the light comes from, in degrees, measured like image atan2.
    pub sun_angle_degrees: f64,
    /// Fixed seed for reproducible fields; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_craters: 700,
            width: 1024,
            height: 1024,
            min_radius: 10.0,
            max_radius: 30.0,
            shadow_factor: 5.0,
            alpha: -1.5,
            sun_angle_degrees: 0.0,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "field must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.min_radius > 0.0) || self.max_radius < self.min_radius {
            return Err(Error::InvalidConfig(format!(
                "radius range {}..{} is empty or not positive",
                self.min_radius, self.max_radius
            )));
        }
        if !(self.shadow_factor > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "shadow_factor must be positive, got {}",
                self.shadow_factor
            )));
        }
        if !self.alpha.is_finite() || (self.alpha + 1.0).abs() < f64::EPSILON {
            return Err(Error::InvalidConfig(format!(
                "alpha must be finite and not -1, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Summary of a generated field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratedStats {
    pub min_rad: u32,
    pub max_rad: u32,
    pub mean_rad: f64,
    pub width: u32,
    pub height: u32,
    pub num_craters: usize,
    pub shadow_factor: f64,
    pub sun_angle_degrees: f64,
    pub alpha: f64,
}

pub fn generate(config: &GeneratorConfig) -> Result<(RgbImage, GeneratedStats)> {
    config.validate()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut image = RgbImage::from_pixel(config.width, config.height, BACKGROUND_COLOR);
    let angle = config.sun_angle_degrees.to_radians();
    let exponent = config.alpha + 1.0;
    let a = config.min_radius.powf(exponent);
    let b = config.max_radius.powf(exponent) - a;

    let mut radii = Vec::with_capacity(config.num_craters);
    for _ in 0..config.num_craters {
        let cx = rng.random_range(0..config.width) as f64;
        let cy = rng.random_range(0..config.height) as f64;
        let u: f64 = rng.random();

        let size = (a + b * u).powf(1.0 / exponent).floor();
        radii.push(draw_crater(&mut image, (cx, cy), size, config.shadow_factor, angle));
    }

    let stats = GeneratedStats {
        min_rad: radii.iter().copied().min().unwrap_or(0),
        max_rad: radii.iter().copied().max().unwrap_or(0),
        mean_rad: if radii.is_empty() {
            0.0
        } else {
            radii.iter().map(|&r| f64::from(r)).sum::<f64>() / radii.len() as f64
        },
        width: config.width,
        height: config.height,
        num_craters: config.num_craters,
        shadow_factor: config.shadow_factor,
        sun_angle_degrees: config.sun_angle_degrees,
        alpha: config.alpha,
    };
    Ok((image, stats))
}

/// Draws light, shadow and background disks for one crater; returns the disk radius.
fn draw_crater(
    image: &mut RgbImage,
    center: (f64, f64),
    size: f64,
    shadow_factor: f64,
    sun_angle: f64,
) -> u32 {
    let shift = (size / shadow_factor).round();
    let (dx, dy) = (sun_angle.cos() * shift, sun_angle.sin() * shift);
    let radius = (size - size / shadow_factor / 2.0).round().max(0.0) as u32;

    let (cx, cy) = center;
    let r = f64::from(radius);
    draw_aa_disk(image, ((cx - dx).trunc(), (cy - dy).trunc()), r, LIGHT_COLOR);
    draw_aa_disk(image, ((cx + dx).trunc(), (cy + dy).trunc()), r, SHADOW_COLOR);
    draw_aa_disk(image, (cx, cy), r, BACKGROUND_COLOR);
    radius
}

/// Filled disk with a one-pixel anti-aliased rim, blended over the image.
fn draw_aa_disk(image: &mut RgbImage, center: (f64, f64), radius: f64, color: Rgb<u8>) {
    let (width, height) = image.dimensions();
    let reach = radius + 1.0;
    let x0 = (center.0 - reach).floor().max(0.0) as u32;
    let y0 = (center.1 - reach).floor().max(0.0) as u32;
    let x1 = (center.0 + reach).ceil().min(f64::from(width) - 1.0);
    let y1 = (center.1 + reach).ceil().min(f64::from(height) - 1.0);
    if x1 < 0.0 || y1 < 0.0 {
        return;
    }

    for y in y0..=y1 as u32 {
        for x in x0..=x1 as u32 {
            let d = (f64::from(x) - center.0).hypot(f64::from(y) - center.1);
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0) as f32;
            if coverage <= 0.0 {
                continue;
            }
            let pixel = image.get_pixel_mut(x, y);
            *pixel = interpolate(color, *pixel, coverage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            num_craters: 25,
            width: 256,
            height: 192,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let (first, first_stats) = generate(&small(7)).unwrap();
        let (second, second_stats) = generate(&small(7)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first_stats, second_stats);

        let (other, _) = generate(&small(8)).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn radii_follow_size_bounds() {
        let config = GeneratorConfig {
            num_craters: 300,
            ..small(3)
        };
        let (image, stats) = generate(&config).unwrap();

        assert_eq!(image.dimensions(), (256, 192));
        assert_eq!(stats.num_craters, 300);
        // size in [10, 30] and radius = round(size * 0.9).
        assert!(stats.min_rad >= 9, "{stats:?}");
        assert!(stats.max_rad <= 27, "{stats:?}");
        assert!(stats.min_rad as f64 <= stats.mean_rad && stats.mean_rad <= stats.max_rad as f64);
        // Small craters dominate under a negative exponent.
        assert!(stats.mean_rad < 18.0, "{stats:?}");
    }

    #[test]
    fn field_has_light_shadow_and_background() {
        let (image, _) = generate(&small(11)).unwrap();
        assert!(image.pixels().any(|p| *p == LIGHT_COLOR));
        assert!(image.pixels().any(|p| *p == SHADOW_COLOR));
        assert!(image.pixels().any(|p| *p == BACKGROUND_COLOR));
    }

    #[test]
    fn crater_puts_light_against_the_sun() {
        let mut image = RgbImage::from_pixel(100, 100, BACKGROUND_COLOR);
        let radius = draw_crater(&mut image, (50.0, 50.0), 20.0, 5.0, 0.0);
        assert_eq!(radius, 18);

        // Sun at 0 degrees: light west of the centre, shadow east of it.
        assert_eq!(*image.get_pixel(30, 50), LIGHT_COLOR);
        assert_eq!(*image.get_pixel(70, 50), SHADOW_COLOR);
        assert_eq!(*image.get_pixel(50, 50), BACKGROUND_COLOR);
        assert_eq!(*image.get_pixel(50, 20), BACKGROUND_COLOR);

        let mut image = RgbImage::from_pixel(100, 100, BACKGROUND_COLOR);
        draw_crater(&mut image, (50.0, 50.0), 20.0, 5.0, 90f64.to_radians());
        assert_eq!(*image.get_pixel(50, 30), LIGHT_COLOR);
        assert_eq!(*image.get_pixel(50, 70), SHADOW_COLOR);
    }

    #[test]
    fn rim_is_blended() {
        let mut image = RgbImage::from_pixel(40, 40, SHADOW_COLOR);
        draw_aa_disk(&mut image, (20.0, 20.0), 10.0, LIGHT_COLOR);
        assert_eq!(*image.get_pixel(20, 20), LIGHT_COLOR);
        assert_eq!(*image.get_pixel(20, 35), SHADOW_COLOR);
        // Pixel centre 10.44 from the disk centre is partly covered.
        let rim = image.get_pixel(23, 30)[0];
        assert!(rim > 0 && rim < 255, "rim value {rim}");
    }

    #[test]
    fn empty_field_has_zero_stats() {
        let config = GeneratorConfig {
            num_craters: 0,
            ..small(1)
        };
        let (image, stats) = generate(&config).unwrap();
        assert!(image.pixels().all(|p| *p == BACKGROUND_COLOR));
        assert_eq!((stats.min_rad, stats.max_rad, stats.mean_rad), (0, 0, 0.0));
    }

    #[test]
    fn invalid_configs_are_rejected() {
        for config in [
            GeneratorConfig {
                alpha: -1.0,
                ..Default::default()
            },
            GeneratorConfig {
                min_radius: 0.0,
                ..Default::default()
            },
            GeneratorConfig {
                min_radius: 40.0,
                ..Default::default()
            },
            GeneratorConfig {
                shadow_factor: 0.0,
                ..Default::default()
            },
            GeneratorConfig {
                width: 0,
                ..Default::default()
            },
        ] {
            assert!(matches!(generate(&config), Err(Error::InvalidConfig(_))));
        }
    }
}
