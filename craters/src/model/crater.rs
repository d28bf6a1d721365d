use glam::DVec2;
use imageproc::rect::Rect;

use crate::matcher::CraterCandidate;
use crate::vision::{self, Circle, Point};

/// One detected crater.
///
/// Every measurement is derived from the candidate's contours on each call;
/// nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crater {
    candidate: CraterCandidate,
}

impl Crater {
    pub fn new(candidate: CraterCandidate) -> Self {
        Self { candidate }
    }

    pub fn candidate(&self) -> &CraterCandidate {
        &self.candidate
    }

    pub fn min_enclosing_circle(&self) -> Circle {
        vision::min_enclosing_circle(self.candidate.combined().points())
    }

    /// Radius of the circle enclosing both the lit and the shadowed part.
    pub fn radius(&self) -> f64 {
        self.min_enclosing_circle().radius
    }

    /// Enclosing-circle centre of the bright contour, rounded to whole pixels.
    pub fn high_center(&self) -> DVec2 {
        vision::min_enclosing_circle(self.candidate.high().points())
            .center
            .round()
    }

    /// Enclosing-circle centre of the dark contour, rounded to whole pixels.
    pub fn low_center(&self) -> DVec2 {
        vision::min_enclosing_circle(self.candidate.low().points())
            .center
            .round()
    }

    /// Direction from the shadow toward the lit side, in radians in `(-pi, pi]`.
    pub fn sun_angle(&self) -> f64 {
        let offset = self.high_center() - self.low_center();
        offset.y.atan2(offset.x)
    }

    pub fn sun_angle_degrees(&self) -> f64 {
        self.sun_angle().to_degrees()
    }

    pub fn arc_length(&self) -> f64 {
        vision::arc_length(self.candidate.combined().points())
    }

    pub fn area(&self) -> f64 {
        vision::contour_area(self.candidate.combined().points())
    }

    pub fn convex_hull(&self) -> Vec<Point> {
        vision::convex_hull(self.candidate.combined().points())
    }

    pub fn bounding_rect(&self) -> Option<Rect> {
        vision::bounding_rect(self.candidate.combined().points())
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::vision::Contour;

    fn square(x: i32, y: i32, side: i32) -> Contour {
        Contour::new(vec![
            Point::new(x, y),
            Point::new(x + side, y),
            Point::new(x + side, y + side),
            Point::new(x, y + side),
        ])
        .unwrap()
    }

    fn crater(high: Contour, low: Contour) -> Crater {
        Crater::new(CraterCandidate::new(high, low))
    }

    #[test]
    fn sun_angle_points_from_shadow_to_light() {
        // Light to the right of the shadow.
        let east = crater(square(20, 0, 10), square(0, 0, 10));
        assert!(east.sun_angle().abs() < 1e-12);

        // Light above the shadow (image y grows downward).
        let north = crater(square(0, 0, 10), square(0, 20, 10));
        assert!((north.sun_angle() + PI / 2.0).abs() < 1e-12);
        assert!((north.sun_angle_degrees() + 90.0).abs() < 1e-9);

        let west = crater(square(0, 0, 10), square(20, 0, 10));
        assert!((west.sun_angle() - PI).abs() < 1e-12);
    }

    #[test]
    fn centres_are_rounded() {
        // Enclosing circle of a 0..=3 square is centred at 1.5.
        let c = crater(square(0, 0, 3), square(10, 10, 4));
        assert_eq!(c.high_center(), DVec2::new(2.0, 2.0));
        assert_eq!(c.low_center(), DVec2::new(12.0, 12.0));
    }

    #[test]
    fn measurements_use_combined_contour() {
        let c = crater(square(0, 0, 10), square(10, 0, 10));
        let bounds = c.bounding_rect().unwrap();
        assert_eq!((bounds.left(), bounds.top()), (0, 0));
        assert_eq!((bounds.width(), bounds.height()), (21, 11));
        let hull = c.convex_hull();
        for corner in [(0, 0), (20, 0), (20, 10), (0, 10)] {
            assert!(hull.contains(&Point::new(corner.0, corner.1)), "{corner:?}");
        }

        // Circle through (0, 0), (20, 0), (20, 10), (0, 10).
        let expected = (10.0f64 * 10.0 + 5.0 * 5.0).sqrt();
        assert!((c.radius() - expected).abs() < 1e-9);
        assert!(c.arc_length() > 0.0);
        assert!(c.area() >= 0.0);
    }
}
