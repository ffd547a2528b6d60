use crate::drawing::{DrawMode, ShapePath};
use crate::math::Point;
use crate::raster::Capabilities;

/// Turns a two-point gesture into a path for the active draw mode.
///
/// Resolution is pure: the same mode, points and radius always produce the
/// same path. Surface capabilities are fixed when the resolver is built.
#[derive(Debug, Clone, Copy)]
pub struct ShapeResolver {
    capabilities: Capabilities,
}

impl ShapeResolver {
    pub fn new(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    pub fn supports_corner_radius(&self) -> bool {
        self.capabilities.round_rect
    }

    /// Freehand has no two-point geometry and resolves to an empty path.
    pub fn resolve(&self, mode: DrawMode, anchor: Point, current: Point, corner_radius: f32) -> ShapePath {
        let mut path = ShapePath::new();
        match mode {
            DrawMode::Freehand => {}
            DrawMode::StraightLine => {
                path.move_to(anchor).line_to(current);
            }
            DrawMode::Rect => {
                // Dragging up or left is valid; normalize to a positive box.
                let origin = Point::new(anchor.x.min(current.x), anchor.y.min(current.y));
                let width = (current.x - anchor.x).abs();
                let height = (current.y - anchor.y).abs();
                let radius = corner_radius.max(0.0).min(width / 2.0).min(height / 2.0);
                if self.supports_corner_radius() && radius > 0.0 {
                    path.round_rect(origin, width, height, radius);
                } else {
                    path.rect(origin, width, height);
                }
            }
            DrawMode::CircleFromDiameter => {
                path.circle(anchor.midpoint(current), anchor.distance(current) / 2.0);
            }
            DrawMode::CircleFromCenter => {
                path.circle(anchor, anchor.distance(current));
            }
            DrawMode::Ellipse => {
                let center = anchor.midpoint(current);
                path.ellipse(center, (current.x - center.x).abs(), (current.y - center.y).abs());
            }
        }
        path
    }
}
