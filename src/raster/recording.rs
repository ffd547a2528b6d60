use crate::drawing::ShapePath;
use crate::raster::{Capabilities, Surface};
use crate::style::StyleState;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SurfaceOp {
    Clear,
    Resize(u32, u32),
    Stroke(ShapePath),
    Fill(ShapePath),
}

/// Surface double that records every call instead of painting.
#[derive(Debug, Clone)]
pub(crate) struct RecordingSurface {
    size: (u32, u32),
    capabilities: Capabilities,
    pub ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            capabilities: Capabilities::default(),
            ops: Vec::new(),
        }
    }

    pub fn without_round_rect(mut self) -> Self {
        self.capabilities.round_rect = false;
        self
    }

    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn strokes(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, SurfaceOp::Stroke(_))).count()
    }

    pub fn fills(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, SurfaceOp::Fill(_))).count()
    }
}

impl Surface for RecordingSurface {
    fn dimensions(&self) -> (u32, u32) {
        self.size
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn clear(&mut self) {
        self.ops.push(SurfaceOp::Clear);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.ops.push(SurfaceOp::Resize(width, height));
    }

    fn stroke(&mut self, path: &ShapePath, _style: &StyleState) {
        self.ops.push(SurfaceOp::Stroke(path.clone()));
    }

    fn fill(&mut self, path: &ShapePath, _style: &StyleState) {
        self.ops.push(SurfaceOp::Fill(path.clone()));
    }
}
