//! Pixel surface backed by a `tiny-skia` pixmap.
//!
//! Text is drawn from the built-in bitmap glyphs, so rendering needs no font
//! files and produces the same pixels on every host.

use thiserror::Error;
use tiny_skia::{
    BlendMode, FillRule, LinearGradient, PathBuilder, Pixmap, SpreadMode, Stroke, Transform,
};
use tracing::warn;

use super::glyphs;
use super::surface::{
    Color, Paint, Path, PathSegment, Point, Rect, ResizableSurface, Surface, TextAlign, TextStyle,
};

/// Glyph cell size as a fraction of the font size.
const CELL_PER_FONT_PX: f32 = 0.1;

/// Extra width added to every lit cell for bold text, in cells.
const BOLD_SPREAD: f32 = 0.35;

/// Errors produced by the raster backend.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("cannot allocate a {width}x{height} pixmap")]
    Allocation { width: u32, height: u32 },

    #[error("surface has no pixels to encode")]
    Empty,

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// An RGBA pixel buffer.
///
/// A zero-sized surface holds no pixmap; every drawing call on it is a no-op.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixmap: Option<Pixmap>,
}

impl RasterSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let pixmap = allocate(width, height)?;
        Ok(Self {
            width,
            height,
            pixmap,
        })
    }

    /// Raw premultiplied RGBA bytes, row-major. Empty for a zero-sized surface.
    pub fn data(&self) -> &[u8] {
        self.pixmap.as_ref().map(|p| p.data()).unwrap_or(&[])
    }

    /// Straight-alpha color of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some(Color {
            r: c.red(),
            g: c.green(),
            b: c.blue(),
            a: c.alpha(),
        })
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        self.pixmap
            .as_ref()
            .ok_or(RasterError::Empty)?
            .encode_png()
            .map_err(|e| RasterError::Encode(e.to_string()))
    }
}

fn allocate(width: u32, height: u32) -> Result<Option<Pixmap>, RasterError> {
    if width == 0 || height == 0 {
        return Ok(None);
    }

    Pixmap::new(width, height)
        .map(Some)
        .ok_or(RasterError::Allocation { width, height })
}

impl Surface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_drawable(&self) -> bool {
        self.pixmap.is_some()
    }

    fn clear(&mut self, region: Rect) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };

        let full = region.x <= 0.0
            && region.y <= 0.0
            && region.right() >= self.width as f32
            && region.bottom() >= self.height as f32;
        if full {
            pixmap.fill(tiny_skia::Color::TRANSPARENT);
            return;
        }

        if let Some(rect) = sk_rect(&region) {
            let mut paint = tiny_skia::Paint::default();
            paint.blend_mode = BlendMode::Clear;
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };

        let mut builder = PathBuilder::new();
        builder.move_to(from.x, from.y);
        builder.line_to(to.x, to.y);
        let Some(path) = builder.finish() else {
            return;
        };

        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &solid(color), &stroke, Transform::identity(), None);
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        if path.is_empty() {
            return;
        }
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let (Some(path), Some(paint)) = (sk_path(path), sk_paint(paint)) else {
            return;
        };

        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn fill_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };

        let cell = style.size * CELL_PER_FONT_PX;
        let text_width = glyphs::text_width_cells(text) as f32 * cell;
        let left = match style.align {
            TextAlign::Left => position.x,
            TextAlign::Center => position.x - text_width / 2.0,
            TextAlign::Right => position.x - text_width,
        };
        let top = position.y - glyphs::ROWS as f32 * cell;
        let cell_width = if style.bold {
            cell * (1.0 + BOLD_SPREAD)
        } else {
            cell
        };

        let mut builder = PathBuilder::new();
        for (index, c) in text.chars().enumerate() {
            let origin = left + (index as u32 * glyphs::ADVANCE) as f32 * cell;
            for (col, row) in glyphs::cells(c) {
                let x = origin + col as f32 * cell;
                let y = top + row as f32 * cell;
                if let Some(rect) = tiny_skia::Rect::from_xywh(x, y, cell_width, cell) {
                    builder.push_rect(rect);
                }
            }
        }

        if let Some(path) = builder.finish() {
            pixmap.fill_path(
                &path,
                &solid(style.color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }
}

impl ResizableSurface for RasterSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixmap = allocate(width, height).unwrap_or_else(|e| {
            warn!(width, height, error = %e, "Failed to resize raster surface");
            None
        });
    }
}

fn sk_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn sk_point(point: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(point.x, point.y)
}

fn sk_rect(rect: &Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
}

fn solid(color: Color) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(sk_color(color));
    paint.anti_alias = true;
    paint
}

fn sk_paint(paint: &Paint) -> Option<tiny_skia::Paint<'static>> {
    match paint {
        Paint::Solid(color) => Some(solid(*color)),
        Paint::LinearGradient { start, end, stops } => {
            let stops = stops
                .iter()
                .map(|stop| tiny_skia::GradientStop::new(stop.offset, sk_color(stop.color)))
                .collect();
            let shader = LinearGradient::new(
                sk_point(*start),
                sk_point(*end),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            )?;

            let mut paint = tiny_skia::Paint::default();
            paint.shader = shader;
            paint.anti_alias = true;
            Some(paint)
        }
    }
}

fn sk_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for segment in path.segments() {
        match *segment {
            PathSegment::MoveTo(p) => builder.move_to(p.x, p.y),
            PathSegment::LineTo(p) => builder.line_to(p.x, p.y),
            PathSegment::QuadTo { control, to } => {
                builder.quad_to(control.x, control.y, to.x, to.y)
            }
            PathSegment::Close => builder.close(),
        }
    }
    builder.finish()
}
