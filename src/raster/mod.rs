mod path;

#[cfg(test)]
pub(crate) mod recording;

use crate::drawing::ShapePath;
use crate::style::{Color, LineCap, LineJoin, StyleState};
use image::{ImageEncoder, RgbaImage};
use thiserror::Error;
use tiny_skia::{
    BlendMode, ColorU8, FillRule, IntSize, Paint, Pixmap, PixmapPaint, PremultipliedColorU8, Stroke, Transform,
};

const MITER_LIMIT: f32 = 10.0;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode raster as PNG: {0}")]
    Encode(#[source] image::ImageError),
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
}

/// Optional features of a drawing surface, probed once per surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub round_rect: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { round_rect: true }
    }
}

pub trait Surface {
    fn dimensions(&self) -> (u32, u32);

    fn capabilities(&self) -> Capabilities;

    /// Resets every pixel to the surface background.
    fn clear(&mut self);

    /// Changes the size, keeping existing pixels anchored at the origin.
    fn resize(&mut self, width: u32, height: u32);

    fn stroke(&mut self, path: &ShapePath, style: &StyleState);

    fn fill(&mut self, path: &ShapePath, style: &StyleState);
}

/// Premultiplied RGBA pixmap. The committed canvas uses an opaque
/// background, the draft overlay a transparent one. A zero-sized raster
/// holds no pixmap and ignores drawing.
#[derive(Debug, Clone)]
pub struct Raster {
    pixmap: Option<Pixmap>,
    background: Color,
    capabilities: Capabilities,
    revision: u64,
}

impl Raster {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            pixmap: blank_pixmap(width, height, background),
            background,
            capabilities: Capabilities::default(),
            revision: 0,
        }
    }

    pub fn transparent(width: u32, height: u32) -> Self {
        Self::new(width, height, Color::TRANSPARENT)
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Straight-alpha color of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let pixel = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some(Color::rgba(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()))
    }

    /// Premultiplied RGBA8 rows, ready for a texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixmap.as_ref().map(|pixmap| pixmap.data()).unwrap_or_default()
    }

    /// Bumped on every mutation; lets the presenter skip unchanged uploads.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_blank(&self) -> bool {
        let background = premultiplied(self.background);
        self.pixmap
            .as_ref()
            .is_none_or(|pixmap| pixmap.pixels().iter().all(|p| *p == background))
    }

    /// Composites `image` source-over at the origin, clipped to the smaller
    /// of the two sizes.
    pub fn draw_image(&mut self, image: &RgbaImage) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let Some(source) = pixmap_from_image(image) else {
            return;
        };
        pixmap.draw_pixmap(0, 0, source.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
        self.revision += 1;
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, CodecError> {
        let (width, height) = self.dimensions();
        let straight: Vec<u8> = self
            .pixmap
            .iter()
            .flat_map(|pixmap| pixmap.pixels())
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        let mut bytes = Vec::new();
        image::codecs::png::PngEncoder::new(&mut bytes)
            .write_image(&straight, width, height, image::ColorType::Rgba8)
            .map_err(CodecError::Encode)?;
        Ok(bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<RgbaImage, CodecError> {
        let image = image::load_from_memory(bytes).map_err(CodecError::Decode)?;
        Ok(image.to_rgba8())
    }

    fn paint(&mut self, color: Color, style: &StyleState, draw: impl FnOnce(&mut Pixmap, &Paint)) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let mut color = skia_color(color);
        color.apply_opacity(style.global_alpha());
        if color.alpha() <= 0.0 {
            return;
        }

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        draw(pixmap, &paint);
        self.revision += 1;
    }
}

impl Surface for Raster {
    fn dimensions(&self) -> (u32, u32) {
        self.pixmap
            .as_ref()
            .map_or((0, 0), |pixmap| (pixmap.width(), pixmap.height()))
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(skia_color(self.background));
        }
        self.revision += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.dimensions() == (width, height) {
            return;
        }
        let mut resized = blank_pixmap(width, height, self.background);
        if let (Some(target), Some(source)) = (resized.as_mut(), self.pixmap.as_ref()) {
            let copy = PixmapPaint {
                blend_mode: BlendMode::Source,
                ..PixmapPaint::default()
            };
            target.draw_pixmap(0, 0, source.as_ref(), &copy, Transform::identity(), None);
        }
        self.pixmap = resized;
        self.revision += 1;
    }

    fn stroke(&mut self, path: &ShapePath, style: &StyleState) {
        let Some(outline) = path::to_skia(path) else {
            return;
        };
        let stroke = Stroke {
            width: style.line_width(),
            miter_limit: MITER_LIMIT,
            line_cap: match style.line_cap() {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match style.line_join() {
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
            },
            ..Stroke::default()
        };
        self.paint(style.stroke_color(), style, |pixmap, paint| {
            pixmap.stroke_path(&outline, paint, &stroke, Transform::identity(), None);
        });
    }

    fn fill(&mut self, path: &ShapePath, style: &StyleState) {
        let Some(area) = path::to_skia(path) else {
            return;
        };
        self.paint(style.fill_color(), style, |pixmap, paint| {
            pixmap.fill_path(&area, paint, FillRule::Winding, Transform::identity(), None);
        });
    }
}

fn skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn premultiplied(color: Color) -> PremultipliedColorU8 {
    ColorU8::from_rgba(color.r, color.g, color.b, color.a).premultiply()
}

fn blank_pixmap(width: u32, height: u32, background: Color) -> Option<Pixmap> {
    if width == 0 || height == 0 {
        return None;
    }
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        log::warn!("cannot allocate a {width}x{height} raster");
        return None;
    };
    pixmap.fill(skia_color(background));
    Some(pixmap)
}

fn pixmap_from_image(image: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;
    let data = image
        .pixels()
        .flat_map(|p| {
            let [r, g, b, a] = p.0;
            let c = ColorU8::from_rgba(r, g, b, a).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Pixmap::from_vec(data, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point;

    fn style(width: f32) -> StyleState {
        let mut style = StyleState::default();
        style.set_line_width(width);
        style
    }

    fn line(from: (f32, f32), to: (f32, f32)) -> ShapePath {
        let mut path = ShapePath::new();
        path.move_to(Point::new(from.0, from.1)).line_to(Point::new(to.0, to.1));
        path
    }

    #[test]
    fn stroke_paints_the_line_and_nothing_far_away() {
        let mut raster = Raster::new(64, 64, Color::WHITE);
        raster.stroke(&line((10.0, 10.0), (50.0, 50.0)), &style(8.0));

        assert_eq!(raster.pixel(30, 30), Some(Color::BLACK));
        assert_eq!(raster.pixel(50, 10), Some(Color::WHITE));
        assert_eq!(raster.pixel(5, 60), Some(Color::WHITE));
    }

    #[test]
    fn transparent_raster_takes_the_source_color() {
        let mut raster = Raster::transparent(32, 32);
        let mut style = style(6.0);
        style.set_color(Color::rgb(200, 10, 10));
        raster.stroke(&line((0.0, 16.0), (32.0, 16.0)), &style);

        assert_eq!(raster.pixel(16, 16), Some(Color::rgb(200, 10, 10)));
        assert_eq!(raster.pixel(16, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn global_alpha_blends_with_background() {
        let mut raster = Raster::new(32, 32, Color::WHITE);
        let mut style = style(10.0);
        style.set_global_alpha(0.5);
        raster.stroke(&line((0.0, 16.0), (32.0, 16.0)), &style);

        let pixel = raster.pixel(16, 16).unwrap();
        assert!((126..=129).contains(&pixel.r), "got {pixel:?}");
        assert_eq!(pixel.a, 255);
    }

    #[test]
    fn overlapping_stroke_pieces_do_not_double_blend() {
        let mut raster = Raster::new(64, 64, Color::WHITE);
        let mut style = style(10.0);
        style.set_global_alpha(0.5);
        let mut path = ShapePath::new();
        path.move_to(Point::new(10.0, 32.0))
            .line_to(Point::new(32.0, 32.0))
            .line_to(Point::new(54.0, 32.0));
        raster.stroke(&path, &style);

        assert_eq!(raster.pixel(32, 32), raster.pixel(20, 32));
    }

    #[test]
    fn fill_covers_interior() {
        let mut raster = Raster::new(40, 40, Color::WHITE);
        let mut style = style(1.0);
        style.set_fill_color(Color::rgb(0, 0, 255));
        let mut path = ShapePath::new();
        path.rect(Point::new(5.0, 5.0), 20.0, 10.0);
        raster.fill(&path, &style);

        assert_eq!(raster.pixel(15, 10), Some(Color::rgb(0, 0, 255)));
        assert_eq!(raster.pixel(30, 10), Some(Color::WHITE));
        assert_eq!(raster.pixel(15, 20), Some(Color::WHITE));
    }

    #[test]
    fn clear_restores_background_and_bumps_revision() {
        let mut raster = Raster::new(16, 16, Color::WHITE);
        raster.stroke(&line((0.0, 8.0), (16.0, 8.0)), &style(4.0));
        assert!(!raster.is_blank());

        let revision = raster.revision();
        raster.clear();
        assert!(raster.is_blank());
        assert!(raster.revision() > revision);
    }

    #[test]
    fn resize_keeps_content_at_origin() {
        let mut raster = Raster::new(20, 20, Color::WHITE);
        raster.stroke(&line((0.0, 5.0), (20.0, 5.0)), &style(4.0));

        raster.resize(40, 10);
        assert_eq!(raster.dimensions(), (40, 10));
        assert_eq!(raster.pixel(10, 5), Some(Color::BLACK));
        assert_eq!(raster.pixel(30, 5), Some(Color::WHITE));
    }

    #[test]
    fn png_export_and_import_clip_to_smaller_size() {
        let mut source = Raster::new(30, 30, Color::WHITE);
        source.stroke(&line((0.0, 25.0), (30.0, 25.0)), &style(4.0));
        let bytes = source.encode_png().unwrap();

        let decoded = Raster::decode(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (30, 30));

        let mut target = Raster::new(20, 40, Color::rgb(0, 255, 0));
        target.draw_image(&decoded);
        assert_eq!(target.pixel(10, 25), Some(Color::BLACK));
        assert_eq!(target.pixel(10, 10), Some(Color::WHITE));
        assert_eq!(target.pixel(10, 35), Some(Color::rgb(0, 255, 0)));
    }

    #[test]
    fn zero_sized_raster_ignores_drawing() {
        let mut raster = Raster::new(0, 12, Color::WHITE);
        raster.stroke(&line((0.0, 0.0), (10.0, 10.0)), &style(4.0));
        raster.draw_image(&RgbaImage::new(4, 4));

        assert_eq!(raster.dimensions(), (0, 0));
        assert!(raster.as_bytes().is_empty());
        assert!(raster.is_blank());

        raster.resize(8, 8);
        assert_eq!(raster.pixel(4, 4), Some(Color::WHITE));
    }

    #[test]
    fn bytes_are_premultiplied() {
        let mut raster = Raster::transparent(8, 8);
        let mut style = style(20.0);
        style.set_color(Color::rgb(255, 255, 255));
        style.set_global_alpha(0.5);
        raster.stroke(&line((0.0, 4.0), (8.0, 4.0)), &style);

        let offset = (4 * 8 + 4) * 4;
        let texel = &raster.as_bytes()[offset..offset + 4];
        assert_eq!(texel[0], texel[3]);
        assert!((126..=129).contains(&texel[3]), "got {texel:?}");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            Raster::decode(b"not an image"),
            Err(CodecError::Decode(_))
        ));
    }
}
