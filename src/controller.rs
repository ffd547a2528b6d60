use crate::canvas::{CanvasFrame, CanvasLayout};
use crate::compositor::Compositor;
use crate::drawing::{DrawMode, ShapePath};
use crate::geometry::ShapeResolver;
use crate::math::Point;
use crate::raster::{Capabilities, CodecError, Raster, Surface};
use crate::settings::Settings;
use crate::stroke_engine::StrokeEngine;
use crate::style::{StyleChange, StyleState};

/// Everything the drawing core reacts to. Pointer positions are client
/// coordinates; the controller maps them through the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    /// The canvas moved or changed size.
    LayoutChanged(CanvasLayout),
    StyleChanged(StyleChange),
    /// Wipes the committed canvas. An active gesture keeps going.
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub anchor: Point,
    pub current: Point,
}

/// Single-threaded owner of style, gesture and both surfaces.
///
/// Each call to [`Controller::dispatch`] runs to completion, so a move always
/// finishes its clear, resolve and render cycle before the next event.
#[derive(Debug)]
pub struct Controller<S: Surface = Raster> {
    frame: CanvasFrame,
    style: StyleState,
    mode: DrawMode,
    /// Mode selected mid-gesture, applied once the gesture ends.
    pending_mode: Option<DrawMode>,
    gesture: Option<GestureState>,
    resolver: ShapeResolver,
    stroke: StrokeEngine,
    compositor: Compositor<S>,
}

impl<S: Surface> Controller<S> {
    pub fn new(committed: S, draft: S, layout: CanvasLayout, style: StyleState, mode: DrawMode) -> Self {
        let capabilities = committed.capabilities();
        log::debug!("surface capabilities: {capabilities:?}");
        let mut compositor = Compositor::new(committed, draft);
        if compositor.committed().dimensions() != (layout.width, layout.height) {
            compositor.resize(layout.width, layout.height);
        }
        Self {
            frame: CanvasFrame::new(layout),
            style: style.sanitized(),
            mode,
            pending_mode: None,
            gesture: None,
            resolver: ShapeResolver::new(capabilities),
            stroke: StrokeEngine::new(),
            compositor,
        }
    }

    pub fn style(&self) -> &StyleState {
        &self.style
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn gesture(&self) -> Option<GestureState> {
        self.gesture
    }

    pub fn frame(&self) -> &CanvasFrame {
        &self.frame
    }

    pub fn resolver(&self) -> &ShapeResolver {
        &self.resolver
    }

    pub fn compositor(&self) -> &Compositor<S> {
        &self.compositor
    }

    pub fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(self.frame.client_to_canvas(x, y)),
            InputEvent::PointerMove { x, y } => self.pointer_move(self.frame.client_to_canvas(x, y)),
            InputEvent::PointerUp { x, y } => self.pointer_up(self.frame.client_to_canvas(x, y)),
            InputEvent::LayoutChanged(layout) => self.relayout(layout),
            InputEvent::StyleChanged(change) => self.change_style(change),
            InputEvent::Clear => {
                log::debug!("clearing canvas");
                self.compositor.clear_committed();
            }
        }
    }

    fn pointer_down(&mut self, point: Point) {
        if self.gesture.is_some() {
            log::debug!("pointer down during an active gesture; restarting");
            self.stroke.cancel();
            self.compositor.discard_preview();
        }
        if let Some(mode) = self.pending_mode.take() {
            self.mode = mode;
        }

        self.gesture = Some(GestureState {
            anchor: point,
            current: point,
        });
        if self.mode == DrawMode::Freehand {
            self.stroke.begin(point);
        }
        log::trace!("{:?} gesture started at ({}, {})", self.mode, point.x, point.y);
    }

    fn pointer_move(&mut self, point: Point) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        gesture.current = point;
        let gesture = *gesture;

        if self.mode.uses_preview() {
            let path = self.resolve(gesture);
            self.compositor.preview(&path, &self.style);
        } else {
            self.stroke.extend(point, self.compositor.committed_mut(), &self.style);
        }
    }

    fn pointer_up(&mut self, point: Point) {
        let Some(mut gesture) = self.gesture.take() else {
            return;
        };
        gesture.current = point;

        if self.mode.uses_preview() {
            let path = self.resolve(gesture);
            self.compositor.commit(&path, &self.style);
            log::debug!("committed {:?}", self.mode);
        } else {
            self.stroke.finish(point, self.compositor.committed_mut(), &self.style);
        }

        if let Some(mode) = self.pending_mode.take() {
            log::debug!("switching to deferred mode {mode:?}");
            self.mode = mode;
        }
    }

    fn relayout(&mut self, layout: CanvasLayout) {
        self.frame.refresh(layout);
        if self.compositor.committed().dimensions() == (layout.width, layout.height) {
            return;
        }

        log::debug!("resizing canvas to {}x{}", layout.width, layout.height);
        self.compositor.resize(layout.width, layout.height);
        if let Some(gesture) = self.gesture.filter(|_| self.mode.uses_preview()) {
            let path = self.resolve(gesture);
            self.compositor.preview(&path, &self.style);
        }
    }

    fn change_style(&mut self, change: StyleChange) {
        if let StyleChange::DrawMode(mode) = change {
            if self.gesture.is_some() {
                self.pending_mode = Some(mode);
            } else {
                self.mode = mode;
            }
            return;
        }
        self.style.apply(change);
    }

    fn resolve(&self, gesture: GestureState) -> ShapePath {
        self.resolver
            .resolve(self.mode, gesture.anchor, gesture.current, self.style.corner_radius())
    }
}

impl Controller<Raster> {
    /// Opaque committed canvas plus a transparent draft, placed where the
    /// settings put the canvas.
    pub fn from_settings(settings: &Settings, width: u32, height: u32) -> Self {
        let capabilities = Capabilities {
            round_rect: settings.rounded_rects,
        };
        let committed = Raster::new(width, height, settings.background).with_capabilities(capabilities);
        let draft = Raster::transparent(width, height).with_capabilities(capabilities);
        let layout = CanvasLayout {
            left: settings.canvas_origin[0],
            top: settings.canvas_origin[1],
            border_left: settings.border,
            border_top: settings.border,
            width,
            height,
        };
        Self::new(committed, draft, layout, settings.style.clone(), settings.draw_mode)
    }

    pub fn export_png(&self) -> Result<Vec<u8>, CodecError> {
        self.compositor.committed().encode_png()
    }

    /// Decodes `bytes` and draws them onto the committed canvas at the
    /// origin, clipped to the smaller size.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let image = Raster::decode(bytes)?;
        log::debug!("loading {}x{} image", image.width(), image.height());
        self.compositor.committed_mut().draw_image(&image);
        Ok(())
    }
}
