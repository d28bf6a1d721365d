use imageproc::rect::Rect;

use super::contours::Point;

/// Perimeter of the closed polygon through `points`.
pub fn arc_length(points: &[Point]) -> f64 {
    imageproc::geometry::arc_length(points, true)
}

/// Unsigned shoelace area of the closed polygon through `points`.
pub fn contour_area(points: &[Point]) -> f64 {
    imageproc::geometry::contour_area(points)
}

pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.is_empty() {
        return Vec::new();
    }
    imageproc::geometry::convex_hull(points)
}

/// Smallest axis-aligned rectangle containing every point, inclusive of both edges.
pub fn bounding_rect(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Rect::at(min_x, min_y).of_size((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32))
}
