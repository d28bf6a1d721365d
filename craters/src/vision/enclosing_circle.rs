//! Smallest circle enclosing a point set.
//!
//! The circle is determined by hull vertices only, so the convex hull is taken
//! first and the incremental algorithm runs on it: grow a circle through the
//! first point that falls outside, then through pairs and triples of
//! boundary points.

use glam::DVec2;

use super::contours::Point;
use super::geometry::convex_hull;

const CONTAINS_EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
}

impl Circle {
    fn from_point(p: DVec2) -> Self {
        Self {
            center: p,
            radius: 0.0,
        }
    }

    fn from_diameter(a: DVec2, b: DVec2) -> Self {
        Self {
            center: (a + b) * 0.5,
            radius: a.distance(b) * 0.5,
        }
    }

    /// Circumcircle of three points; the widest pair when they are collinear.
    fn from_three(a: DVec2, b: DVec2, c: DVec2) -> Self {
        let ab = b - a;
        let ac = c - a;
        let d = 2.0 * ab.perp_dot(ac);
        if d.abs() < f64::EPSILON {
            let candidates = [
                Self::from_diameter(a, b),
                Self::from_diameter(a, c),
                Self::from_diameter(b, c),
            ];
            return candidates
                .into_iter()
                .fold(candidates[0], |best, next| if next.radius > best.radius { next } else { best });
        }

        let ab2 = ab.length_squared();
        let ac2 = ac.length_squared();
        let offset = DVec2::new(ac.y * ab2 - ab.y * ac2, ab.x * ac2 - ac.x * ab2) / d;
        Self {
            center: a + offset,
            radius: offset.length(),
        }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        self.center.distance(p) <= self.radius + CONTAINS_EPSILON * self.radius.max(1.0)
    }
}

/// Minimum enclosing circle of `points`. An empty slice gives a zero circle at the origin.
pub fn min_enclosing_circle(points: &[Point]) -> Circle {
    let hull = convex_hull(points);
    let source: &[Point] = if hull.is_empty() { points } else { &hull };
    let points: Vec<DVec2> = source
        .iter()
        .map(|p| DVec2::new(p.x as f64, p.y as f64))
        .collect();

    let Some(&first) = points.first() else {
        return Circle::from_point(DVec2::ZERO);
    };

    let mut circle = Circle::from_point(first);
    for i in 1..points.len() {
        if circle.contains(points[i]) {
            continue;
        }
        circle = Circle::from_point(points[i]);
        for j in 0..i {
            if circle.contains(points[j]) {
                continue;
            }
            circle = Circle::from_diameter(points[i], points[j]);
            for k in 0..j {
                if !circle.contains(points[k]) {
                    circle = Circle::from_three(points[i], points[j], points[k]);
                }
            }
        }
    }
    circle
}
