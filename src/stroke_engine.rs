use crate::drawing::ShapePath;
use crate::math::Point;
use crate::raster::Surface;
use crate::style::StyleState;

/// Freehand drawing straight onto the committed surface.
///
/// Every extension strokes only the newest segment; the whole path is kept
/// so it can be filled once on release.
#[derive(Debug, Default)]
pub struct StrokeEngine {
    path: ShapePath,
    last: Option<Point>,
}

impl StrokeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }

    pub fn begin(&mut self, point: Point) {
        self.path = ShapePath::new();
        self.path.move_to(point);
        self.last = Some(point);
    }

    pub fn extend<S: Surface>(&mut self, point: Point, surface: &mut S, style: &StyleState) {
        let Some(last) = self.last else {
            return;
        };
        if last == point {
            return;
        }

        let mut segment = ShapePath::new();
        segment.move_to(last).line_to(point);
        surface.stroke(&segment, style);

        self.path.line_to(point);
        self.last = Some(point);
    }

    /// Ends the stroke at `point` and returns the accumulated path.
    pub fn finish<S: Surface>(&mut self, point: Point, surface: &mut S, style: &StyleState) -> Option<ShapePath> {
        if !self.is_active() {
            return None;
        }
        self.extend(point, surface, style);
        self.last = None;

        let path = std::mem::take(&mut self.path);
        if style.fill_mode() {
            surface.fill(&path, style);
        }
        Some(path)
    }

    /// Drops the stroke without filling.
    pub fn cancel(&mut self) {
        self.path = ShapePath::new();
        self.last = None;
    }
}
