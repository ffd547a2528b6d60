use crate::drawing::{PathCommand, ShapePath};
use crate::math::{PI, Point, TAU};
use std::f32::consts::FRAC_PI_2;
use tiny_skia::PathBuilder;

/// Builds a tiny-skia path with 2D canvas subpath rules: a line or arc with
/// no open subpath starts from where the last one left off, and `rect`
/// style commands leave the pen at their origin.
struct CanvasPathWriter {
    builder: PathBuilder,
    open: bool,
    subpath_start: Point,
    pen: Option<Point>,
}

impl CanvasPathWriter {
    fn new() -> Self {
        Self {
            builder: PathBuilder::new(),
            open: false,
            subpath_start: Point::ZERO,
            pen: None,
        }
    }

    fn move_to(&mut self, point: Point) {
        self.builder.move_to(point.x, point.y);
        self.open = true;
        self.subpath_start = point;
        self.pen = Some(point);
    }

    fn line_to(&mut self, point: Point) {
        if !self.open {
            match self.pen {
                Some(pen) => self.move_to(pen),
                None => return self.move_to(point),
            }
        }
        self.builder.line_to(point.x, point.y);
        self.pen = Some(point);
    }

    fn close(&mut self) {
        if self.open {
            self.builder.close();
            self.open = false;
            self.pen = Some(self.subpath_start);
        }
    }

    /// Arcs are split into quarter turns, each one cubic.
    fn arc(&mut self, center: Point, radius_x: f32, radius_y: f32, start: f32, end: f32) {
        let sweep = (end - start).clamp(-TAU, TAU);
        if !sweep.is_finite() || !start.is_finite() {
            return;
        }
        let radius_x = radius_x.max(0.0);
        let radius_y = radius_y.max(0.0);
        let on_arc = |angle: f32| {
            Point::new(
                center.x + radius_x * angle.cos(),
                center.y + radius_y * angle.sin(),
            )
        };

        self.line_to(on_arc(start));

        let pieces = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = sweep / pieces as f32;
        let k = 4.0 / 3.0 * (step / 4.0).tan();
        for i in 0..pieces {
            let a0 = start + step * i as f32;
            let a1 = a0 + step;
            let (s0, c0) = a0.sin_cos();
            let (s1, c1) = a1.sin_cos();
            let end = on_arc(a1);
            self.builder.cubic_to(
                center.x + radius_x * (c0 - k * s0),
                center.y + radius_y * (s0 + k * c0),
                center.x + radius_x * (c1 + k * s1),
                center.y + radius_y * (s1 - k * c1),
                end.x,
                end.y,
            );
            self.pen = Some(end);
        }
    }

    fn rect(&mut self, origin: Point, width: f32, height: f32) {
        self.move_to(origin);
        self.line_to(Point::new(origin.x + width, origin.y));
        self.line_to(Point::new(origin.x + width, origin.y + height));
        self.line_to(Point::new(origin.x, origin.y + height));
        self.close();
        self.pen = Some(origin);
    }

    fn round_rect(&mut self, origin: Point, width: f32, height: f32, radius: f32) {
        let left = origin.x.min(origin.x + width);
        let top = origin.y.min(origin.y + height);
        let right = origin.x.max(origin.x + width);
        let bottom = origin.y.max(origin.y + height);
        let radius = radius
            .min((right - left) / 2.0)
            .min((bottom - top) / 2.0)
            .max(0.0);
        if !(radius > 0.0) {
            return self.rect(Point::new(left, top), right - left, bottom - top);
        }

        self.open = false;
        self.pen = None;
        let corners = [
            (Point::new(right - radius, top + radius), -FRAC_PI_2),
            (Point::new(right - radius, bottom - radius), 0.0),
            (Point::new(left + radius, bottom - radius), FRAC_PI_2),
            (Point::new(left + radius, top + radius), PI),
        ];
        for (center, start) in corners {
            self.arc(center, radius, radius, start, start + FRAC_PI_2);
        }
        self.close();
        self.pen = Some(origin);
    }
}

/// `None` when the path has nothing to paint.
pub(crate) fn to_skia(path: &ShapePath) -> Option<tiny_skia::Path> {
    let mut writer = CanvasPathWriter::new();
    for command in path.commands() {
        match *command {
            PathCommand::MoveTo(point) => writer.move_to(point),
            PathCommand::LineTo(point) => writer.line_to(point),
            PathCommand::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => writer.arc(center, radius, radius, start_angle, end_angle),
            PathCommand::Ellipse {
                center,
                radius_x,
                radius_y,
                start_angle,
                end_angle,
            } => writer.arc(center, radius_x, radius_y, start_angle, end_angle),
            PathCommand::Rect {
                origin,
                width,
                height,
            } => writer.rect(origin, width, height),
            PathCommand::RoundRect {
                origin,
                width,
                height,
                radius,
            } => writer.round_rect(origin, width, height, radius),
            PathCommand::Close => writer.close(),
        }
    }
    writer.builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(path: &tiny_skia::Path) -> (f32, f32, f32, f32) {
        let b = path.bounds();
        (b.left(), b.top(), b.right(), b.bottom())
    }

    #[test]
    fn line_keeps_its_two_points() {
        let mut path = ShapePath::new();
        path.move_to(Point::new(1.0, 1.0)).line_to(Point::new(4.0, 5.0));

        let skia = to_skia(&path).unwrap();
        assert_eq!(
            skia.points(),
            &[tiny_skia::Point::from_xy(1.0, 1.0), tiny_skia::Point::from_xy(4.0, 5.0)]
        );
    }

    #[test]
    fn circle_bounds_match_the_radius() {
        let mut path = ShapePath::new();
        path.circle(Point::new(20.0, 20.0), 10.0);

        let (left, top, right, bottom) = bounds(&to_skia(&path).unwrap());
        assert!((left - 10.0).abs() < 0.01 && (right - 30.0).abs() < 0.01);
        assert!((top - 10.0).abs() < 0.01 && (bottom - 30.0).abs() < 0.01);
    }

    #[test]
    fn round_rect_stays_inside_its_box() {
        let mut path = ShapePath::new();
        path.round_rect(Point::new(0.0, 0.0), 40.0, 20.0, 50.0);

        let (left, top, right, bottom) = bounds(&to_skia(&path).unwrap());
        assert!(left >= -0.001 && right <= 40.001);
        assert!(top >= -0.001 && bottom <= 20.001);
    }

    #[test]
    fn line_after_rect_starts_at_the_rect_origin() {
        let mut path = ShapePath::new();
        path.rect(Point::new(2.0, 3.0), 10.0, 10.0)
            .line_to(Point::new(50.0, 60.0));

        let skia = to_skia(&path).unwrap();
        let points = skia.points();
        assert_eq!(points[points.len() - 2], tiny_skia::Point::from_xy(2.0, 3.0));
        assert_eq!(points[points.len() - 1], tiny_skia::Point::from_xy(50.0, 60.0));
    }

    #[test]
    fn empty_or_move_only_paths_have_nothing_to_paint() {
        assert!(to_skia(&ShapePath::new()).is_none());

        let mut path = ShapePath::new();
        path.move_to(Point::new(3.0, 3.0));
        assert!(to_skia(&path).is_none());
    }
}
