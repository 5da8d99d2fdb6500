//! Column pattern.

use super::{fit_count, push_grid, LayerPattern, Slot};
use crate::layer::PatternFrame;

/// Regular grid of unturned boxes.
///
/// Spare length and width of the target are spread evenly between the
/// columns and rows, so the outer boxes sit on the target edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnPattern;

impl ColumnPattern {
    /// Returns (first offset, pitch) for `count` boxes of `size` in `span`.
    fn spread(span: f64, size: f64, count: usize) -> (f64, f64) {
        if count <= 1 {
            return (0.5 * (span - size).max(0.0), size);
        }
        let gap = (span - count as f64 * size).max(0.0) / (count - 1) as f64;
        (0.0, size + gap)
    }
}

impl LayerPattern for ColumnPattern {
    fn name(&self) -> &'static str {
        "Column"
    }

    fn can_be_swapped(&self) -> bool {
        false
    }

    fn dimensions(&self, frame: &PatternFrame) -> Option<(f64, f64)> {
        let nx = fit_count(frame.length, frame.box_length);
        let ny = fit_count(frame.width, frame.box_width);
        if nx == 0 || ny == 0 {
            return None;
        }
        Some((nx as f64 * frame.box_length, ny as f64 * frame.box_width))
    }

    fn slots(&self, frame: &PatternFrame, length: f64, width: f64) -> Vec<Slot> {
        let nx = fit_count(length, frame.box_length);
        let ny = fit_count(width, frame.box_width);

        let (x0, dx) = Self::spread(length, frame.box_length, nx);
        let (y0, dy) = Self::spread(width, frame.box_width, ny);

        let mut slots = Vec::with_capacity(nx * ny);
        push_grid(&mut slots, (x0, y0), (nx, ny), (dx, dy), false);
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use approx::assert_relative_eq;
    use u_stacking_core::geometry::HalfAxis;

    #[test]
    fn test_column_counts() {
        let mut layer = layer((400.0, 300.0, 200.0), (1200.0, 800.0), HalfAxis::ZPos);
        let (l, w) = ColumnPattern.layer_dimensions(&layer, false).unwrap();
        assert_relative_eq!(l, 1200.0);
        assert_relative_eq!(w, 600.0);
        assert!(ColumnPattern.generate_layer(&mut layer, l, w, false));
        assert_eq!(layer.len(), 6);
        assert_valid(&layer);

        // Opposite half-axis turns the footprint: 300 x 400.
        let mut turned = super::super::test_support::layer(
            (400.0, 300.0, 200.0),
            (1200.0, 800.0),
            HalfAxis::ZNeg,
        );
        assert!(generate(&ColumnPattern, &mut turned, false));
        assert_eq!(turned.len(), 8);
        assert_valid(&turned);
    }

    #[test]
    fn test_column_is_centred() {
        let mut layer = layer((400.0, 300.0, 200.0), (1200.0, 800.0), HalfAxis::ZPos);
        assert!(generate(&ColumnPattern, &mut layer, false));
        let bounds = layer.bounds().unwrap();
        assert_relative_eq!(bounds.min_x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.min_y, 100.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max_y, 700.0, epsilon = 1e-9);
    }

    #[test]
    fn test_column_spreads_spare_room() {
        let mut layer = layer((400.0, 300.0, 200.0), (1200.0, 800.0), HalfAxis::ZPos);
        assert!(ColumnPattern.generate_layer(&mut layer, 1200.0, 800.0, false));
        let ys: Vec<f64> = layer
            .positions()
            .iter()
            .take(2)
            .map(|p| layer.position_footprint(p).min_y)
            .collect();
        assert_relative_eq!(ys[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(ys[1], 500.0, epsilon = 1e-9);
        assert_valid(&layer);
    }

    #[test]
    fn test_single_box_is_centred() {
        let mut layer = layer((700.0, 500.0, 200.0), (1200.0, 800.0), HalfAxis::ZPos);
        assert!(generate(&ColumnPattern, &mut layer, false));
        assert_eq!(layer.len(), 1);
        let fp = layer.position_footprint(&layer.positions()[0]);
        assert_relative_eq!(fp.min_x, 250.0, epsilon = 1e-9);
        assert_relative_eq!(fp.min_y, 150.0, epsilon = 1e-9);
    }
}
