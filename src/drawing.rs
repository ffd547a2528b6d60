use crate::math::{Point, TAU};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrawMode {
    #[default]
    Freehand,
    StraightLine,
    Rect,
    /// The two points are the ends of a diameter.
    CircleFromDiameter,
    /// The first point is the fixed center, the second lies on the circle.
    CircleFromCenter,
    /// The two points are opposite corners of the bounding box.
    Ellipse,
}

impl DrawMode {
    pub const ALL: [DrawMode; 6] = [
        DrawMode::Freehand,
        DrawMode::StraightLine,
        DrawMode::Rect,
        DrawMode::CircleFromDiameter,
        DrawMode::CircleFromCenter,
        DrawMode::Ellipse,
    ];

    /// Shape modes render through the draft surface; freehand paints directly.
    pub fn uses_preview(self) -> bool {
        self != DrawMode::Freehand
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Arc {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    Ellipse {
        center: Point,
        radius_x: f32,
        radius_y: f32,
        start_angle: f32,
        end_angle: f32,
    },
    Rect {
        origin: Point,
        width: f32,
        height: f32,
    },
    RoundRect {
        origin: Point,
        width: f32,
        height: f32,
        radius: f32,
    },
    Close,
}

/// Ordered drawing primitives, built the way a 2D canvas path is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePath {
    commands: Vec<PathCommand>,
}

impl ShapePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn move_to(&mut self, point: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(point));
        self
    }

    pub fn line_to(&mut self, point: Point) -> &mut Self {
        self.commands.push(PathCommand::LineTo(point));
        self
    }

    pub fn arc(&mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32) -> &mut Self {
        self.commands.push(PathCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        });
        self
    }

    pub fn ellipse(&mut self, center: Point, radius_x: f32, radius_y: f32) -> &mut Self {
        self.commands.push(PathCommand::Ellipse {
            center,
            radius_x,
            radius_y,
            start_angle: 0.0,
            end_angle: TAU,
        });
        self.close()
    }

    pub fn circle(&mut self, center: Point, radius: f32) -> &mut Self {
        self.arc(center, radius, 0.0, TAU);
        self.close()
    }

    pub fn rect(&mut self, origin: Point, width: f32, height: f32) -> &mut Self {
        self.commands.push(PathCommand::Rect {
            origin,
            width,
            height,
        });
        self
    }

    pub fn round_rect(&mut self, origin: Point, width: f32, height: f32, radius: f32) -> &mut Self {
        self.commands.push(PathCommand::RoundRect {
            origin,
            width,
            height,
            radius,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_is_a_closed_full_arc() {
        let mut path = ShapePath::new();
        path.circle(Point::new(1.0, 2.0), 3.0);

        assert_eq!(
            path.commands(),
            &[
                PathCommand::Arc {
                    center: Point::new(1.0, 2.0),
                    radius: 3.0,
                    start_angle: 0.0,
                    end_angle: TAU,
                },
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn draw_mode_names_round_trip_through_json() {
        let json = serde_json::to_string(&DrawMode::CircleFromDiameter).unwrap();
        assert_eq!(json, "\"circleFromDiameter\"");
        let mode: DrawMode = serde_json::from_str("\"straightLine\"").unwrap();
        assert_eq!(mode, DrawMode::StraightLine);
    }

    #[test]
    fn only_freehand_skips_the_preview() {
        for mode in DrawMode::ALL {
            assert_eq!(mode.uses_preview(), mode != DrawMode::Freehand);
        }
    }
}
