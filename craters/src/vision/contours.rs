use image::GrayImage;

use crate::error::{Error, Result};

pub type Point = imageproc::point::Point<i32>;

/// Fewest points a contour needs to describe an area.
pub const MIN_CONTOUR_POINTS: usize = 3;

/// Closed boundary of a mask region, every border pixel in tracing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    /// Fails with [`Error::DegenerateContour`] for fewer than three points.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() < MIN_CONTOUR_POINTS {
            return Err(Error::DegenerateContour {
                points: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// This contour's points followed by `other`'s.
    pub fn concat(&self, other: &Contour) -> Contour {
        let mut points = Vec::with_capacity(self.len() + other.len());
        points.extend_from_slice(&self.points);
        points.extend_from_slice(&other.points);
        Contour { points }
    }
}

/// Suzuki-Abe border following over the non-zero pixels of `mask`.
///
/// Every border pixel is kept, outer borders and holes alike. Borders with
/// fewer than [`MIN_CONTOUR_POINTS`] points are dropped. The second vector
/// holds the parent index of each kept contour; a parent that was dropped, or
/// a top-level border, is `None`.
pub fn find_contours(mask: &GrayImage) -> (Vec<Contour>, Vec<Option<usize>>) {
    let raw = imageproc::contours::find_contours::<i32>(mask);

    let mut remap = vec![None; raw.len()];
    let mut kept = 0;
    for (index, contour) in raw.iter().enumerate() {
        if contour.points.len() >= MIN_CONTOUR_POINTS {
            remap[index] = Some(kept);
            kept += 1;
        }
    }

    let mut contours = Vec::with_capacity(kept);
    let mut parents = Vec::with_capacity(kept);
    for contour in raw {
        if contour.points.len() < MIN_CONTOUR_POINTS {
            continue;
        }
        parents.push(contour.parent.and_then(|parent| remap[parent]));
        contours.push(Contour {
            points: contour.points,
        });
    }
    (contours, parents)
}
