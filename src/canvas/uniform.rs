use crate::canvas::CanvasLayout;

/// Placement of the canvas quad, consumed by `canvas.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    screen_size: [f32; 2],
    origin: [f32; 2],
    canvas_size: [f32; 2],
    _padding: [f32; 2],
}

impl FrameUniforms {
    pub fn new(layout: &CanvasLayout, window_size: (f32, f32)) -> Self {
        let mut uniforms: Self = bytemuck::Zeroable::zeroed();
        uniforms.update(layout, window_size);
        uniforms
    }

    pub fn update(&mut self, layout: &CanvasLayout, window_size: (f32, f32)) {
        self.screen_size = [window_size.0.max(1.0), window_size.1.max(1.0)];
        self.origin = layout.content_origin();
        self.canvas_size = [layout.width as f32, layout.height as f32];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_includes_border() {
        let layout = CanvasLayout {
            left: 16.0,
            top: 16.0,
            border_left: 2.0,
            border_top: 2.0,
            width: 640,
            height: 480,
        };
        let uniforms = FrameUniforms::new(&layout, (800.0, 600.0));
        assert_eq!(uniforms.origin, [18.0, 18.0]);
        assert_eq!(uniforms.canvas_size, [640.0, 480.0]);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
    }
}
