//! Fixed countdown layout. All measurements are pre-zoom and scaled by [`ZOOM_FACTOR`].

use crate::config::ZOOM_FACTOR;
use crate::render::surface::FontSpec;
use crate::text::fonts::FaceKind;

const ZOOM: f64 = ZOOM_FACTOR as f64;

/// Gap between columns and between a counter and its label.
pub const GAP: f64 = 10.0 * ZOOM;
/// Cell reserved for one counter.
pub const BIG_CELL_WIDTH: f64 = 102.5 * ZOOM;
pub const BIG_CELL_HEIGHT: f64 = 73.0 * ZOOM;
/// Cell reserved for one label.
pub const SMALL_CELL_HEIGHT: f64 = 17.0 * ZOOM;
/// Center of the first column.
pub const BASE_X: f64 = 75.0 * ZOOM;

pub const DIGIT_FONT: FontSpec = FontSpec::new(FaceKind::Regular, 60.0 * ZOOM as f32);
pub const LABEL_FONT: FontSpec = FontSpec::new(FaceKind::Semibold, 12.0 * ZOOM as f32);
/// Extra space between label characters.
pub const LABEL_SPACING: f64 = 0.2 * 12.0 * ZOOM;

pub const LABELS: [&str; 4] = ["DAYS", "HOURS", "MINUTES", "SECONDS"];

/// Anchor points for one counter column. Text is centered on `x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnLayout {
    pub x: f64,
    pub digits_y: f64,
    pub label_y: f64,
}

/// Column anchors for a canvas of `height` pixels.
///
/// Columns sit at fixed horizontal offsets; only the vertical placement depends on the canvas.
pub fn columns(height: u32) -> [ColumnLayout; 4] {
    let h = f64::from(height);
    let digits_y = h / 2.0 - GAP;
    let column_height = BIG_CELL_HEIGHT + GAP + SMALL_CELL_HEIGHT;
    let label_y = (h - column_height) / 2.0 + column_height - SMALL_CELL_HEIGHT;

    std::array::from_fn(|i| ColumnLayout {
        x: BASE_X + (BIG_CELL_WIDTH + GAP) * i as f64,
        digits_y,
        label_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_step_by_cell_plus_gap() {
        let cols = columns(300);
        let xs: Vec<f64> = cols.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![150.0, 375.0, 600.0, 825.0]);
    }

    #[test]
    fn labels_sit_below_digits() {
        for h in [300, 640, 1000] {
            let c = columns(h)[0];
            assert_eq!(c.digits_y, f64::from(h) / 2.0 - 20.0);
            assert_eq!(c.label_y, (f64::from(h) - 200.0) / 2.0 + 166.0);
            assert!(c.label_y > c.digits_y);
        }
    }

    #[test]
    fn fonts_scale_with_zoom() {
        assert_eq!(DIGIT_FONT.size_px, 120.0);
        assert_eq!(LABEL_FONT.size_px, 24.0);
        assert!((LABEL_SPACING - 4.8).abs() < 1e-9);
    }
}
