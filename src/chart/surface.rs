//! The drawing contract the chart renderer writes through.
//!
//! A [`Surface`] is anything that can clear itself, stroke a line, fill a
//! path with a solid or gradient paint, and place text. The renderer only
//! ever talks to this trait, so the same chart can be drawn into a pixmap,
//! recorded as a display list, or forwarded to another backend.

use std::fmt;

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Build an opaque color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

/// A point in surface pixel coordinates (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// One step of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic curve through `control` ending at `to`.
    QuadTo { control: Point, to: Point },
    Close,
}

/// A backend-independent vector path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.segments.push(PathSegment::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.segments.push(PathSegment::LineTo(Point::new(x, y)));
        self
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        self.segments.push(PathSegment::QuadTo {
            control: Point::new(cx, cy),
            to: Point::new(x, y),
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.segments.push(PathSegment::Close);
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// A color stop along a gradient, `offset` in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

/// How a filled path is colored.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),

    /// Linear gradient from `start` to `end`, padded beyond the stops.
    LinearGradient {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    /// Top-to-bottom gradient spanning `top..bottom`.
    pub fn vertical_gradient(top: f32, bottom: f32, from: Color, to: Color) -> Self {
        Paint::LinearGradient {
            start: Point::new(0.0, top),
            end: Point::new(0.0, bottom),
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: from,
                },
                GradientStop {
                    offset: 1.0,
                    color: to,
                },
            ],
        }
    }
}

/// Horizontal anchoring of text relative to its position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Text styling; `position.y` given to [`Surface::fill_text`] is the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
    pub bold: bool,
    pub align: TextAlign,
}

/// A 2D drawing target with a known pixel size.
pub trait Surface {
    /// Current `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Reset a region to fully transparent.
    fn clear(&mut self, region: Rect);

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32);

    fn fill_path(&mut self, path: &Path, paint: &Paint);

    fn fill_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Whether there is anything to draw into.
    fn is_drawable(&self) -> bool {
        let (width, height) = self.size();
        width > 0 && height > 0
    }
}

/// Surfaces whose pixel size can change after creation.
pub trait ResizableSurface: Surface {
    fn resize(&mut self, width: u32, height: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_display() {
        assert_eq!(Color::from_hex(0xE91E63).to_string(), "#E91E63");
        assert_eq!(
            Color {
                r: 0,
                g: 0,
                b: 0,
                a: 0
            }
            .to_string(),
            "#00000000"
        );
    }

    #[test]
    fn test_path_builder_chains() {
        let mut path = Path::new();
        assert!(path.is_empty());

        path.move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .quad_to(10.0, 10.0, 0.0, 10.0)
            .close();

        assert!(!path.is_empty());
        assert_eq!(path.segments().len(), 4);
        assert!(matches!(path.segments()[2], PathSegment::QuadTo { .. }));
    }
}
