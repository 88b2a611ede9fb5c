//! Rounded rectangle paths built from lines and quadratic corners.
//!
//! Backends are never asked for a native rounded-rect primitive; every
//! surface that can fill a [`Path`] can draw these.

use super::surface::{Path, Rect};

/// Corner radii in clockwise order starting at the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    pub const fn uniform(radius: f32) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }

    /// Rounded top, square bottom.
    pub const fn top(radius: f32) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: 0.0,
            bottom_left: 0.0,
        }
    }

    /// Shrink all radii by one factor so that no side is asked to hold more
    /// curvature than its length.
    pub fn fitted_to(self, width: f32, height: f32) -> Self {
        let clamp = |r: f32| if r.is_finite() { r.max(0.0) } else { 0.0 };
        let radii = Self {
            top_left: clamp(self.top_left),
            top_right: clamp(self.top_right),
            bottom_right: clamp(self.bottom_right),
            bottom_left: clamp(self.bottom_left),
        };

        let sides = [
            (width, radii.top_left + radii.top_right),
            (height, radii.top_right + radii.bottom_right),
            (width, radii.bottom_right + radii.bottom_left),
            (height, radii.bottom_left + radii.top_left),
        ];

        let scale = sides
            .iter()
            .filter(|(_, sum)| *sum > 0.0)
            .map(|(side, sum)| side.max(0.0) / sum)
            .fold(1.0_f32, f32::min);

        if scale >= 1.0 {
            radii
        } else {
            Self {
                top_left: radii.top_left * scale,
                top_right: radii.top_right * scale,
                bottom_right: radii.bottom_right * scale,
                bottom_left: radii.bottom_left * scale,
            }
        }
    }
}

/// Outline of `rect` with the given corner radii.
///
/// Each corner is a quadratic curve whose control point is the corner itself.
/// A zero radius degenerates to a square corner.
pub fn rounded_rect(rect: Rect, radii: CornerRadii) -> Path {
    let r = radii.fitted_to(rect.width, rect.height);
    let (x, y, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());

    let mut path = Path::new();
    path.move_to(x + r.top_left, y)
        .line_to(right - r.top_right, y)
        .quad_to(right, y, right, y + r.top_right)
        .line_to(right, bottom - r.bottom_right)
        .quad_to(right, bottom, right - r.bottom_right, bottom)
        .line_to(x + r.bottom_left, bottom)
        .quad_to(x, bottom, x, bottom - r.bottom_left)
        .line_to(x, y + r.top_left)
        .quad_to(x, y, x + r.top_left, y)
        .close();
    path
}
