use crate::drawing::ShapePath;
use crate::raster::Surface;
use crate::style::StyleState;

/// Owns the committed canvas and the draft overlay.
///
/// Shape previews only ever touch the draft. The single path into the
/// committed surface for a resolved shape is [`Compositor::commit`].
#[derive(Debug)]
pub struct Compositor<S: Surface> {
    committed: S,
    draft: S,
}

impl<S: Surface> Compositor<S> {
    pub fn new(committed: S, mut draft: S) -> Self {
        let (width, height) = committed.dimensions();
        if draft.dimensions() != (width, height) {
            draft.resize(width, height);
        }
        draft.clear();
        Self { committed, draft }
    }

    pub fn committed(&self) -> &S {
        &self.committed
    }

    pub fn draft(&self) -> &S {
        &self.draft
    }

    /// Direct access for freehand strokes and image loads.
    pub(crate) fn committed_mut(&mut self) -> &mut S {
        &mut self.committed
    }

    pub fn preview(&mut self, path: &ShapePath, style: &StyleState) {
        self.draft.clear();
        self.draft.stroke(path, style);
    }

    /// Writes `path` to the committed surface once and leaves the draft empty.
    pub fn commit(&mut self, path: &ShapePath, style: &StyleState) {
        self.draft.clear();
        self.committed.stroke(path, style);
        if style.fill_mode() {
            self.committed.fill(path, style);
        }
    }

    pub fn discard_preview(&mut self) {
        self.draft.clear();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.committed.resize(width, height);
        self.draft.resize(width, height);
        self.draft.clear();
    }

    pub fn clear_committed(&mut self) {
        self.committed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point;
    use crate::raster::recording::{RecordingSurface, SurfaceOp};

    fn compositor() -> Compositor<RecordingSurface> {
        let mut compositor = Compositor::new(RecordingSurface::new(100, 80), RecordingSurface::new(1, 1));
        compositor.draft.take_ops();
        compositor
    }

    fn segment() -> ShapePath {
        let mut path = ShapePath::new();
        path.move_to(Point::new(1.0, 1.0)).line_to(Point::new(9.0, 9.0));
        path
    }

    #[test]
    fn draft_matches_committed_size() {
        let compositor = Compositor::new(RecordingSurface::new(100, 80), RecordingSurface::new(3, 3));
        assert_eq!(compositor.draft().dimensions(), (100, 80));
    }

    #[test]
    fn preview_never_touches_committed() {
        let mut compositor = compositor();
        compositor.preview(&segment(), &StyleState::default());
        compositor.preview(&segment(), &StyleState::default());

        assert!(compositor.committed().ops.is_empty());
        assert_eq!(
            compositor.draft().ops,
            vec![
                SurfaceOp::Clear,
                SurfaceOp::Stroke(segment()),
                SurfaceOp::Clear,
                SurfaceOp::Stroke(segment()),
            ]
        );
    }

    #[test]
    fn commit_strokes_once_and_fills_only_in_fill_mode() {
        let mut compositor = compositor();
        compositor.commit(&segment(), &StyleState::default());
        assert_eq!(compositor.committed().strokes(), 1);
        assert_eq!(compositor.committed().fills(), 0);

        let mut style = StyleState::default();
        style.set_fill_mode(true);
        compositor.commit(&segment(), &style);
        assert_eq!(compositor.committed().strokes(), 2);
        assert_eq!(compositor.committed().fills(), 1);
        assert_eq!(compositor.draft().ops.last(), Some(&SurfaceOp::Clear));
    }

    #[test]
    fn resize_keeps_surfaces_in_lockstep() {
        let mut compositor = compositor();
        compositor.resize(300, 200);
        assert_eq!(compositor.committed().dimensions(), (300, 200));
        assert_eq!(compositor.draft().dimensions(), (300, 200));
    }
}
