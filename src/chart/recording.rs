//! Display-list surface.
//!
//! Keeps the draw calls instead of rasterizing them. A clear that covers the
//! whole surface discards everything recorded before it, so the list always
//! describes what is currently visible.

use super::surface::{Color, Paint, Path, Point, Rect, ResizableSurface, Surface, TextStyle};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear {
        region: Rect,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f32,
    },
    FillPath {
        path: Path,
        paint: Paint,
    },
    Text {
        text: String,
        position: Point,
        style: TextStyle,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    fn covers_surface(&self, region: &Rect) -> bool {
        region.x <= 0.0
            && region.y <= 0.0
            && region.right() >= self.width as f32
            && region.bottom() >= self.height as f32
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, region: Rect) {
        if self.covers_surface(&region) {
            self.ops.clear();
        }
        self.ops.push(DrawOp::Clear { region });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.ops.push(DrawOp::FillPath {
            path: path.clone(),
            paint: paint.clone(),
        });
    }

    fn fill_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            position,
            style: *style,
        });
    }
}

impl ResizableSurface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.ops.clear();
    }
}
