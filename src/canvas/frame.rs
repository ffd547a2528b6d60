use crate::math::Point;

/// On-screen placement of the canvas, in client (window) pixels.
///
/// `left`/`top` are the outer corner of the canvas element, the border
/// insets sit between that corner and the first drawable pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasLayout {
    pub left: f32,
    pub top: f32,
    pub border_left: f32,
    pub border_top: f32,
    pub width: u32,
    pub height: u32,
}

impl CanvasLayout {
    pub fn content_origin(&self) -> [f32; 2] {
        [self.left + self.border_left, self.top + self.border_top]
    }
}

/// Maps client positions to canvas pixels.
///
/// The layout must be refreshed whenever the canvas moves (resize, scroll,
/// relayout). A stale layout is not detected: coordinates stay finite but
/// drift by the missed offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasFrame {
    layout: CanvasLayout,
}

impl CanvasFrame {
    pub fn new(layout: CanvasLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> CanvasLayout {
        self.layout
    }

    pub fn refresh(&mut self, layout: CanvasLayout) {
        self.layout = layout;
    }

    /// Never fails; positions outside the canvas map to negative or
    /// out-of-range coordinates.
    pub fn client_to_canvas(&self, client_x: f32, client_y: f32) -> Point {
        let [x, y] = self.layout.content_origin();
        Point::new(client_x - x, client_y - y)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0.0
            && point.y >= 0.0
            && point.x < self.layout.width as f32
            && point.y < self.layout.height as f32
    }
}
