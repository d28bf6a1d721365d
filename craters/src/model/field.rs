use serde::{Deserialize, Serialize};

use super::Crater;

/// Craters of one image, in detection order.
#[derive(Debug, Clone, PartialEq)]
pub struct CraterField {
    width: u32,
    height: u32,
    craters: Vec<Crater>,
}

/// Aggregate measurements of a [`CraterField`]. Angles are in radians unless
/// the field name says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub width: u32,
    pub height: u32,
    pub num_craters: usize,
    pub mean_rad: f64,
    pub min_rad: f64,
    pub max_rad: f64,
    pub sun_angle: f64,
    pub sun_angle_degrees: f64,
    pub min_sun_angle: f64,
    pub min_sun_angle_degrees: f64,
    pub max_sun_angle: f64,
    pub max_sun_angle_degrees: f64,
}

impl CraterField {
    pub fn new(width: u32, height: u32, craters: Vec<Crater>) -> Self {
        Self {
            width,
            height,
            craters,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn craters(&self) -> &[Crater] {
        &self.craters
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Crater> {
        self.craters.iter()
    }

    pub fn len(&self) -> usize {
        self.craters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.craters.is_empty()
    }

    /// Recomputes every aggregate from the craters. An empty field reports zeros.
    pub fn stats(&self) -> FieldStats {
        let radii: Vec<f64> = self.craters.iter().map(Crater::radius).collect();
        let angles: Vec<f64> = self.craters.iter().map(Crater::sun_angle).collect();
        let (mean_rad, min_rad, max_rad) = summarize(&radii);
        let (sun_angle, min_sun_angle, max_sun_angle) = summarize(&angles);

        FieldStats {
            width: self.width,
            height: self.height,
            num_craters: self.craters.len(),
            mean_rad,
            min_rad,
            max_rad,
            sun_angle,
            sun_angle_degrees: sun_angle.to_degrees(),
            min_sun_angle,
            min_sun_angle_degrees: min_sun_angle.to_degrees(),
            max_sun_angle,
            max_sun_angle_degrees: max_sun_angle.to_degrees(),
        }
    }
}

impl<'a> IntoIterator for &'a CraterField {
    type Item = &'a Crater;
    type IntoIter = std::slice::Iter<'a, Crater>;

    fn into_iter(self) -> Self::IntoIter {
        self.craters.iter()
    }
}

/// `(mean, min, max)`, all zero for an empty slice.
fn summarize(values: &[f64]) -> (f64, f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (mean, min, max)
}
