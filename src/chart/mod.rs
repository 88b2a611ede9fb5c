//! 7-day activity bar chart.
//!
//! [`render`] lays the histogram out from the surface size alone and draws
//! it in a fixed order: clear, gridlines, then per bar the gradient fill, the
//! day label and (for non-zero bars) the value label. Nothing is cached
//! between calls, so re-rendering after a resize or with the same inputs
//! always produces a complete, fresh frame.

pub mod raster;
pub mod recording;
pub mod rounded_rect;
pub mod surface;

mod glyphs;

use crate::aggregation::{BucketVector, WINDOW_DAYS};

use self::rounded_rect::{CornerRadii, rounded_rect};
use self::surface::{Color, Paint, Point, Rect, Surface, TextAlign, TextStyle};

/// Axis labels, index-aligned with [`BucketVector`] (oldest first).
pub const DAY_LABELS: [&str; WINDOW_DAYS] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Space left around the plot area on every side, in pixels.
pub const PADDING: f32 = 40.0;

/// Number of horizontal bands the gridlines divide the plot height into.
pub const GRID_BANDS: u32 = 5;

/// Fraction of each slot occupied by its bar.
pub const BAR_WIDTH_RATIO: f32 = 0.6;

/// Default radius of a bar's top corners.
pub const DEFAULT_CORNER_RADIUS: f32 = 8.0;

const GRIDLINE_WIDTH: f32 = 1.0;
const LABEL_FONT_SIZE: f32 = 12.0;
const DAY_LABEL_OFFSET: f32 = 20.0;
const VALUE_LABEL_OFFSET: f32 = 8.0;

/// Fixed chart palette.
pub mod palette {
    use super::surface::Color;

    pub const GRIDLINE: Color = Color::from_hex(0xE5E7EB);
    pub const BAR_TOP: Color = Color::from_hex(0xE91E63);
    pub const BAR_BOTTOM: Color = Color::from_hex(0xF06292);
    pub const AXIS_LABEL: Color = Color::from_hex(0x6B7280);
    pub const VALUE_LABEL: Color = Color::from_hex(0x111827);
}

/// Rendering options that callers may tune.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    /// Radius of each bar's top corners; the bottom is always square.
    pub corner_radius: f32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            corner_radius: DEFAULT_CORNER_RADIUS,
        }
    }
}

/// Placement of a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub value: u32,
    pub rect: Rect,
}

impl BarGeometry {
    /// Horizontal center, where both labels are anchored.
    pub fn center_x(&self) -> f32 {
        self.rect.x + self.rect.width / 2.0
    }
}

/// Layout derived from the surface size and the data.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub chart_width: f32,
    pub chart_height: f32,
    /// Width of one day's slot.
    pub spacing: f32,
    pub bar_width: f32,
    /// Largest value, floored at 1.
    pub max_value: u32,
    pub bars: Vec<BarGeometry>,
}

impl ChartGeometry {
    pub fn compute(width: u32, height: u32, data: &BucketVector) -> Self {
        let (width, height) = (width as f32, height as f32);
        let chart_width = (width - PADDING * 2.0).max(0.0);
        let chart_height = (height - PADDING * 2.0).max(0.0);

        let spacing = chart_width / WINDOW_DAYS as f32;
        let bar_width = spacing * BAR_WIDTH_RATIO;
        let max_value = data.max_value();
        let baseline = PADDING + chart_height;

        let bars = data
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let bar_height = value as f32 / max_value as f32 * chart_height;
                let x = PADDING + spacing * index as f32 + spacing / 2.0 - bar_width / 2.0;
                BarGeometry {
                    value,
                    rect: Rect::new(x, baseline - bar_height, bar_width, bar_height),
                }
            })
            .collect();

        Self {
            width,
            height,
            padding: PADDING,
            chart_width,
            chart_height,
            spacing,
            bar_width,
            max_value,
            bars,
        }
    }

    /// Y coordinate of the plot's bottom edge.
    pub fn baseline(&self) -> f32 {
        self.padding + self.chart_height
    }

    /// Y coordinates of the gridlines, top edge first, baseline last.
    pub fn gridlines(&self) -> impl Iterator<Item = f32> + '_ {
        (0..=GRID_BANDS)
            .map(move |i| self.padding + self.chart_height / GRID_BANDS as f32 * i as f32)
    }
}

/// Draw `data` onto `surface` at `width` x `height` with the default style.
pub fn render<S: Surface + ?Sized>(surface: &mut S, width: u32, height: u32, data: &BucketVector) {
    render_with_style(surface, width, height, data, &ChartStyle::default());
}

/// Draw `data` onto `surface` at `width` x `height`.
///
/// Returns without touching the surface when either the requested size or the
/// surface itself is empty.
pub fn render_with_style<S: Surface + ?Sized>(
    surface: &mut S,
    width: u32,
    height: u32,
    data: &BucketVector,
    style: &ChartStyle,
) {
    if width == 0 || height == 0 || !surface.is_drawable() {
        return;
    }

    let geometry = ChartGeometry::compute(width, height, data);
    let (surface_width, surface_height) = surface.size();
    surface.clear(Rect::new(
        0.0,
        0.0,
        surface_width.max(width) as f32,
        surface_height.max(height) as f32,
    ));

    let left = geometry.padding;
    let right = geometry.width - geometry.padding;
    for y in geometry.gridlines() {
        surface.stroke_line(
            Point::new(left, y),
            Point::new(right, y),
            palette::GRIDLINE,
            GRIDLINE_WIDTH,
        );
    }

    let day_style = label_style(palette::AXIS_LABEL, false);
    let value_style = label_style(palette::VALUE_LABEL, true);
    let day_label_y = geometry.baseline() + DAY_LABEL_OFFSET;

    for (bar, label) in geometry.bars.iter().zip(DAY_LABELS) {
        if bar.rect.height > 0.0 && bar.rect.width > 0.0 {
            let paint = Paint::vertical_gradient(
                bar.rect.y,
                bar.rect.bottom(),
                palette::BAR_TOP,
                palette::BAR_BOTTOM,
            );
            let path = rounded_rect(bar.rect, CornerRadii::top(style.corner_radius));
            surface.fill_path(&path, &paint);
        }

        surface.fill_text(label, Point::new(bar.center_x(), day_label_y), &day_style);

        if bar.value > 0 {
            surface.fill_text(
                &bar.value.to_string(),
                Point::new(bar.center_x(), bar.rect.y - VALUE_LABEL_OFFSET),
                &value_style,
            );
        }
    }
}

fn label_style(color: Color, bold: bool) -> TextStyle {
    TextStyle {
        color,
        size: LABEL_FONT_SIZE,
        bold,
        align: TextAlign::Center,
    }
}

#[cfg(test)]
mod tests {
    use super::recording::{DrawOp, RecordingSurface};
    use super::surface::PathSegment;
    use super::*;

    fn day_labels(ops: &[DrawOp]) -> Vec<String> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, style, .. } if style.color == palette::AXIS_LABEL => {
                    Some(text.clone())
                }
                _ => None,
            })
            .collect()
    }

    fn value_labels(ops: &[DrawOp]) -> Vec<String> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, style, .. } if style.color == palette::VALUE_LABEL => {
                    Some(text.clone())
                }
                _ => None,
            })
            .collect()
    }

    fn fills(ops: &[DrawOp]) -> usize {
        ops.iter()
            .filter(|op| matches!(op, DrawOp::FillPath { .. }))
            .count()
    }

    #[test]
    fn test_geometry_layout() {
        let data = BucketVector::new([1, 2, 3, 4, 5, 6, 7]);
        let geometry = ChartGeometry::compute(780, 300, &data);

        assert!((geometry.chart_width - 700.0).abs() < 1e-3);
        assert!((geometry.chart_height - 220.0).abs() < 1e-3);
        assert!((geometry.spacing - 100.0).abs() < 1e-3);
        assert!((geometry.bar_width - 60.0).abs() < 1e-3);
        assert_eq!(geometry.max_value, 7);

        let first = geometry.bars[0].rect;
        assert!((first.x - 60.0).abs() < 1e-3);
        assert!((geometry.bars[0].center_x() - 90.0).abs() < 1e-3);

        let last = geometry.bars[6].rect;
        assert!((last.height - 220.0).abs() < 1e-3);
        assert!((last.y - 40.0).abs() < 1e-3);
        assert!((last.bottom() - 260.0).abs() < 1e-3);
    }

    #[test]
    fn test_gridlines_span_plot() {
        let geometry = ChartGeometry::compute(780, 300, &BucketVector::default());
        let ys: Vec<f32> = geometry.gridlines().collect();

        assert_eq!(ys.len(), GRID_BANDS as usize + 1);
        assert!((ys[0] - 40.0).abs() < 1e-3);
        assert!((ys[1] - 84.0).abs() < 1e-3);
        assert!((ys[5] - 260.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_window_geometry() {
        let geometry = ChartGeometry::compute(780, 300, &BucketVector::default());

        assert_eq!(geometry.max_value, 1);
        assert!(geometry.bars.iter().all(|bar| bar.rect.height == 0.0));
    }

    #[test]
    fn test_tiny_surface_has_no_negative_sizes() {
        let geometry = ChartGeometry::compute(50, 30, &BucketVector::new([3; 7]));

        assert_eq!(geometry.chart_width, 0.0);
        assert_eq!(geometry.chart_height, 0.0);
        assert!(geometry.bars.iter().all(|bar| bar.rect.width == 0.0));
    }

    #[test]
    fn test_empty_window_draws_flat_chart() {
        let mut surface = RecordingSurface::new(780, 300);
        render(&mut surface, 780, 300, &BucketVector::default());
        let ops = surface.ops();

        assert_eq!(day_labels(ops), DAY_LABELS);
        assert!(value_labels(ops).is_empty());
        assert_eq!(fills(ops), 0);
    }

    #[test]
    fn test_zero_bar_keeps_day_label_only() {
        let mut surface = RecordingSurface::new(780, 300);
        render(&mut surface, 780, 300, &BucketVector::new([2, 0, 1, 0, 0, 0, 4]));
        let ops = surface.ops();

        assert_eq!(day_labels(ops), DAY_LABELS);
        assert_eq!(value_labels(ops), vec!["2", "1", "4"]);
        assert_eq!(fills(ops), 3);
    }

    #[test]
    fn test_draw_order() {
        let mut surface = RecordingSurface::new(780, 300);
        render(&mut surface, 780, 300, &BucketVector::new([1, 0, 0, 0, 0, 0, 0]));
        let ops = surface.ops();

        assert!(matches!(ops[0], DrawOp::Clear { .. }));
        assert!(
            ops[1..=6]
                .iter()
                .all(|op| matches!(op, DrawOp::Line { color, .. } if *color == palette::GRIDLINE))
        );
        assert!(matches!(&ops[7], DrawOp::FillPath { .. }));
    }

    #[test]
    fn test_bar_gradient_spans_bar() {
        let mut surface = RecordingSurface::new(780, 300);
        render(&mut surface, 780, 300, &BucketVector::new([0, 0, 0, 0, 0, 0, 5]));

        let paint = surface
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::FillPath { paint, .. } => Some(paint.clone()),
                _ => None,
            })
            .unwrap();

        assert_eq!(
            paint,
            Paint::vertical_gradient(40.0, 260.0, palette::BAR_TOP, palette::BAR_BOTTOM)
        );
    }

    #[test]
    fn test_value_label_sits_above_bar() {
        let mut surface = RecordingSurface::new(780, 300);
        render(&mut surface, 780, 300, &BucketVector::new([0, 0, 0, 0, 0, 0, 5]));

        let position = surface
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { text, position, .. } if text == "5" => Some(*position),
                _ => None,
            })
            .unwrap();

        assert!((position.y - 32.0).abs() < 1e-3);
        assert!((position.x - 690.0).abs() < 1e-3);
    }

    #[test]
    fn test_render_is_idempotent() {
        let data = BucketVector::new([1, 4, 0, 2, 0, 7, 3]);
        let mut surface = RecordingSurface::new(640, 300);

        render(&mut surface, 640, 300, &data);
        let first = surface.ops().to_vec();
        render(&mut surface, 640, 300, &data);

        assert_eq!(surface.ops(), first.as_slice());
    }

    #[test]
    fn test_zero_size_is_a_no_op() {
        let mut surface = RecordingSurface::new(780, 300);
        render(&mut surface, 0, 300, &BucketVector::new([1; 7]));
        render(&mut surface, 780, 0, &BucketVector::new([1; 7]));
        assert!(surface.ops().is_empty());

        let mut empty = RecordingSurface::new(0, 0);
        render(&mut empty, 780, 300, &BucketVector::new([1; 7]));
        assert!(empty.ops().is_empty());
    }

    #[test]
    fn test_custom_corner_radius() {
        let mut surface = RecordingSurface::new(780, 300);
        let style = ChartStyle { corner_radius: 0.0 };
        render_with_style(
            &mut surface,
            780,
            300,
            &BucketVector::new([0, 0, 0, 0, 0, 0, 1]),
            &style,
        );

        let path = surface
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::FillPath { path, .. } => Some(path.clone()),
                _ => None,
            })
            .unwrap();

        assert_eq!(path.segments()[0], PathSegment::MoveTo(Point::new(660.0, 40.0)));
    }
}
