use crate::app_state::State;
use crate::controller::InputEvent;
use crate::drawing::DrawMode;
use crate::style::{CapStyle, Color, LineCap, StyleChange};
use anyhow::Context;
use winit::event::*;
use winit::keyboard::{KeyCode, PhysicalKey};

const SCROLL_LINE: f32 = 40.0;
const ALPHA_STEP: f32 = 0.1;
const RADIUS_STEP: f32 = 2.0;

impl State {
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.gpu.config.width = new_size.width;
            self.gpu.config.height = new_size.height;
            self.gpu.surface.configure(&self.gpu.device, &self.gpu.config);
            self.publish_layout();
        }
    }

    fn publish_layout(&mut self) {
        let layout = self.canvas_layout();
        self.controller.dispatch(InputEvent::LayoutChanged(layout));
        self.frame
            .uniforms
            .update(&layout, (self.size.width as f32, self.size.height as f32));
        self.gpu
            .queue
            .write_buffer(&self.frame.buffer, 0, bytemuck::cast_slice(&[self.frame.uniforms]));
    }

    pub fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.input.cursor = [position.x as f32, position.y as f32];
                let [x, y] = self.input.cursor;
                self.controller.dispatch(InputEvent::PointerMove { x, y });
                true
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let [x, y] = self.input.cursor;
                match state {
                    ElementState::Pressed => {
                        // Gestures only start on the canvas itself.
                        let point = self.controller.frame().client_to_canvas(x, y);
                        if self.controller.frame().contains(point) {
                            self.controller.dispatch(InputEvent::PointerDown { x, y });
                        }
                    }
                    ElementState::Released => {
                        self.controller.dispatch(InputEvent::PointerUp { x, y });
                    }
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x * SCROLL_LINE, y * SCROLL_LINE),
                    MouseScrollDelta::PixelDelta(pos) => (pos.x as f32, pos.y as f32),
                };
                self.input.scroll[0] = (self.input.scroll[0] - dx).max(0.0);
                self.input.scroll[1] = (self.input.scroll[1] - dy).max(0.0);
                self.publish_layout();
                true
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if key_event.state != ElementState::Pressed {
                    return false;
                }
                let PhysicalKey::Code(keycode) = key_event.physical_key else {
                    return false;
                };
                let handled = self.handle_key(keycode);
                if handled {
                    self.refresh_title();
                }
                handled
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, keycode: KeyCode) -> bool {
        let style = self.controller.style();
        let change = match keycode {
            KeyCode::Digit1 => StyleChange::DrawMode(DrawMode::Freehand),
            KeyCode::Digit2 => StyleChange::DrawMode(DrawMode::StraightLine),
            KeyCode::Digit3 => StyleChange::DrawMode(DrawMode::Rect),
            KeyCode::Digit4 => StyleChange::DrawMode(DrawMode::CircleFromDiameter),
            KeyCode::Digit5 => StyleChange::DrawMode(DrawMode::CircleFromCenter),
            KeyCode::Digit6 => StyleChange::DrawMode(DrawMode::Ellipse),
            KeyCode::KeyF => StyleChange::FillMode(!style.fill_mode()),
            KeyCode::BracketLeft => StyleChange::Width((style.line_width() - 1.0).max(1.0)),
            KeyCode::BracketRight => StyleChange::Width(style.line_width() + 1.0),
            KeyCode::KeyQ => StyleChange::CapStyle(if style.line_cap() == LineCap::Round {
                CapStyle::Square
            } else {
                CapStyle::Round
            }),
            KeyCode::Minus => StyleChange::GlobalAlpha((style.global_alpha() - ALPHA_STEP).max(0.0)),
            KeyCode::Equal => StyleChange::GlobalAlpha((style.global_alpha() + ALPHA_STEP).min(1.0)),
            KeyCode::Comma => StyleChange::CornerRadius((style.corner_radius() - RADIUS_STEP).max(0.0)),
            KeyCode::Period => StyleChange::CornerRadius(style.corner_radius() + RADIUS_STEP),
            KeyCode::KeyK => StyleChange::Color(Color::BLACK),
            KeyCode::KeyW => StyleChange::Color(Color::WHITE),
            KeyCode::KeyR => StyleChange::Color(Color::rgb(255, 0, 0)),
            KeyCode::KeyG => StyleChange::Color(Color::rgb(0, 128, 0)),
            KeyCode::KeyB => StyleChange::Color(Color::rgb(0, 0, 255)),
            KeyCode::Delete => {
                self.controller.dispatch(InputEvent::Clear);
                return true;
            }
            KeyCode::KeyS => {
                if let Err(err) = self.save_to_gallery() {
                    log::warn!("save failed: {err:#}");
                }
                return true;
            }
            KeyCode::KeyL => {
                if let Err(err) = self.load_from_gallery() {
                    log::warn!("load failed: {err:#}");
                }
                return true;
            }
            _ => return false,
        };

        log::debug!("style change {change:?}");
        self.controller.dispatch(InputEvent::StyleChanged(change));
        true
    }

    fn save_to_gallery(&mut self) -> anyhow::Result<()> {
        let gallery = self.gallery.as_mut().context("gallery is unavailable")?;
        let title = gallery.next_untitled();
        let png = self.controller.export_png()?;
        gallery.save(&title, &png)?;
        self.gallery_cursor = 0;
        Ok(())
    }

    /// Loads the newest picture, then older ones on repeated presses.
    fn load_from_gallery(&mut self) -> anyhow::Result<()> {
        let gallery = self.gallery.as_ref().context("gallery is unavailable")?;
        anyhow::ensure!(!gallery.is_empty(), "gallery is empty");
        let back = self.gallery_cursor % gallery.len();
        let title = gallery.titles().rev().nth(back).context("gallery index out of range")?;
        let png = gallery.load(title)?;
        self.controller.load_image(&png)?;
        self.gallery_cursor = back + 1;
        log::info!("loaded \"{title}\" ({} of {})", back + 1, gallery.len());
        Ok(())
    }

    fn refresh_title(&self) {
        let style = self.controller.style();
        self.window.set_title(&format!(
            "wpaint: {:?}, width {}, alpha {:.1}{}",
            self.controller.mode(),
            style.line_width(),
            style.global_alpha(),
            if style.fill_mode() { ", fill" } else { "" }
        ));
    }
}
