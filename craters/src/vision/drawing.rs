use glam::DVec2;
use image::RgbImage;
use imageproc::drawing::draw_line_segment_mut;

use super::contours::Point;

/// Draws the closed polyline through `points`.
pub fn draw_contour_mut(image: &mut RgbImage, points: &[Point], color: image::Rgb<u8>) {
    match points {
        [] => {}
        [only] => {
            if only.x >= 0
                && only.y >= 0
                && (only.x as u32) < image.width()
                && (only.y as u32) < image.height()
            {
                image.put_pixel(only.x as u32, only.y as u32, color);
            }
        }
        _ => {
            for (i, p) in points.iter().enumerate() {
                let q = points[(i + 1) % points.len()];
                draw_line_segment_mut(
                    image,
                    (p.x as f32, p.y as f32),
                    (q.x as f32, q.y as f32),
                    color,
                );
            }
        }
    }
}

pub fn draw_segment_mut(image: &mut RgbImage, from: DVec2, to: DVec2, color: image::Rgb<u8>) {
    draw_line_segment_mut(
        image,
        (from.x as f32, from.y as f32),
        (to.x as f32, to.y as f32),
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn contour_is_closed() {
        let mut image = RgbImage::new(20, 20);
        let red = Rgb([255, 0, 0]);
        let points = [Point::new(2, 2), Point::new(10, 2), Point::new(10, 10)];
        draw_contour_mut(&mut image, &points, red);

        assert_eq!(*image.get_pixel(6, 2), red);
        assert_eq!(*image.get_pixel(10, 6), red);
        // Closing edge from (10, 10) back to (2, 2).
        assert_eq!(*image.get_pixel(6, 6), red);
        assert_eq!(*image.get_pixel(2, 10), Rgb([0, 0, 0]));
    }

    #[test]
    fn segment_outside_image_is_clipped() {
        let mut image = RgbImage::new(10, 10);
        draw_segment_mut(
            &mut image,
            DVec2::new(-5.0, 5.0),
            DVec2::new(15.0, 5.0),
            Rgb([0, 255, 0]),
        );
        assert!((0..10).all(|x| image.get_pixel(x, 5)[1] == 255));
    }
}
