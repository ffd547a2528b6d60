use crate::app_state::State;

/// Window background around the canvas.
const BACKDROP: wgpu::Color = wgpu::Color {
    r: 0.78,
    g: 0.78,
    b: 0.8,
    a: 1.0,
};

impl State {
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Canvas Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKDROP),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // Committed canvas first, then the draft preview on top.
            render_pass.set_pipeline(&self.gpu.canvas_pipeline);
            for layer in [&self.committed_layer, &self.draft_layer] {
                render_pass.set_bind_group(0, &layer.bind_group, &[]);
                render_pass.draw(0..4, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
