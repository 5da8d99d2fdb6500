//! Layer patterns: strategies for tiling a rectangle with identical boxes.
//!
//! A pattern works in a [`PatternFrame`]: a usable rectangle and the
//! footprint of an unturned box. It produces [`Slot`]s, each an unturned box
//! (`box_length` along X) or a turned one (`box_width` along X).
//!
//! Swapping is handled here once for every pattern: a swapped layer is the
//! pattern computed on the transposed frame and mirrored back about the
//! diagonal, which turns every box.
//!
//! # Patterns
//!
//! | Name | Swappable | Layout |
//! |------|-----------|--------|
//! | `Column` | no | grid of unturned boxes |
//! | `Interlocked` | yes | block of unturned columns beside a block of turned columns |
//! | `Spiral` | yes | pinwheel of four blocks around a central hole |
//! | `EnlargedSpiral` | yes | pinwheel with the central hole filled |

mod column;
mod interlocked;
mod spiral;

pub use column::ColumnPattern;
pub use interlocked::InterlockedPattern;
pub use spiral::{EnlargedSpiralPattern, SpiralPattern};

use crate::layer::{Layer, PatternFrame};
use std::sync::Arc;

/// Tolerance used when comparing lengths.
pub(crate) const EPS: f64 = 1e-6;

/// A box position produced by a pattern, relative to the target rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Minimum x of the box footprint.
    pub x: f64,
    /// Minimum y of the box footprint.
    pub y: f64,
    /// Whether the box is turned a quarter about the vertical.
    pub turned: bool,
}

impl Slot {
    pub fn new(x: f64, y: f64, turned: bool) -> Self {
        Self { x, y, turned }
    }

    fn transposed(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
            turned: !self.turned,
        }
    }
}

/// Number of `size` lengths fitting in `length`.
pub(crate) fn fit_count(length: f64, size: f64) -> usize {
    if size <= 0.0 || length < size - EPS {
        return 0;
    }
    ((length + EPS) / size).floor() as usize
}

/// Appends a `cols x rows` grid of equal boxes starting at (`x0`, `y0`).
pub(crate) fn push_grid(
    slots: &mut Vec<Slot>,
    origin: (f64, f64),
    counts: (usize, usize),
    pitch: (f64, f64),
    turned: bool,
) {
    let (x0, y0) = origin;
    let (cols, rows) = counts;
    let (dx, dy) = pitch;
    for i in 0..cols {
        for j in 0..rows {
            slots.push(Slot::new(x0 + i as f64 * dx, y0 + j as f64 * dy, turned));
        }
    }
}

/// A tiling strategy for one layer.
///
/// Implementors only describe the unswapped tiling through
/// [`dimensions`](LayerPattern::dimensions) and [`slots`](LayerPattern::slots);
/// the provided methods apply the swap and fill a [`Layer`].
pub trait LayerPattern: Send + Sync {
    /// Unique pattern name, matched by the constraint set.
    fn name(&self) -> &'static str;

    /// Whether the swapped variant differs from the plain one.
    fn can_be_swapped(&self) -> bool;

    /// Returns the (length, width) actually covered in `frame`, or `None`
    /// if no box fits.
    fn dimensions(&self, frame: &PatternFrame) -> Option<(f64, f64)>;

    /// Returns non-overlapping slots inside `[0, length] x [0, width]`.
    ///
    /// `length`/`width` are at most the frame's and at least the result of
    /// [`dimensions`](LayerPattern::dimensions).
    fn slots(&self, frame: &PatternFrame, length: f64, width: f64) -> Vec<Slot>;

    /// Returns the (length, width) achievable in `layer`.
    fn layer_dimensions(&self, layer: &Layer, swapped: bool) -> Option<(f64, f64)> {
        let frame = layer.pattern_frame();
        if swapped {
            self.dimensions(&frame.transposed()).map(|(l, w)| (w, l))
        } else {
            self.dimensions(&frame)
        }
    }

    /// Fills `layer` so that its boxes cover a `length x width` rectangle
    /// centred on the usable footprint.
    ///
    /// Returns false, leaving the layer empty, when the target does not fit
    /// the footprint or no box could be placed.
    fn generate_layer(&self, layer: &mut Layer, length: f64, width: f64, swapped: bool) -> bool {
        layer.clear();

        let frame = layer.pattern_frame();
        if length <= 0.0
            || width <= 0.0
            || length > frame.length + EPS
            || width > frame.width + EPS
        {
            return false;
        }

        let offset_x = 0.5 * (frame.length - length).max(0.0);
        let offset_y = 0.5 * (frame.width - width).max(0.0);

        let slots = if swapped {
            self.slots(&frame.transposed(), width, length)
                .into_iter()
                .map(Slot::transposed)
                .collect()
        } else {
            self.slots(&frame, length, width)
        };

        for slot in slots {
            layer.add_position(offset_x + slot.x, offset_y + slot.y, slot.turned);
        }

        !layer.is_empty()
    }
}

/// Returns the built-in patterns in enumeration order.
pub fn default_patterns() -> Vec<Arc<dyn LayerPattern>> {
    vec![
        Arc::new(ColumnPattern),
        Arc::new(InterlockedPattern),
        Arc::new(SpiralPattern),
        Arc::new(EnlargedSpiralPattern),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::boundary::PalletProperties;
    use crate::constraint::ConstraintSet;
    use crate::geometry::BoxProperties;
    use u_stacking_core::geometry::HalfAxis;

    pub fn layer(
        box_dims: (f64, f64, f64),
        pallet: (f64, f64),
        axis: HalfAxis,
    ) -> Layer {
        Layer::new(
            &BoxProperties::new(box_dims.0, box_dims.1, box_dims.2),
            &PalletProperties::new(pallet.0, pallet.1, 0.0),
            &ConstraintSet::default(),
            axis,
        )
    }

    /// Asserts that every box lies in the footprint and no two boxes overlap.
    pub fn assert_valid(layer: &Layer) {
        let footprints: Vec<_> = layer
            .positions()
            .iter()
            .map(|p| layer.position_footprint(p))
            .collect();
        for (i, a) in footprints.iter().enumerate() {
            assert!(
                layer.footprint().contains(a, 1e-6),
                "box {} at {:?} leaves the footprint",
                i,
                a
            );
            for (j, b) in footprints.iter().enumerate().skip(i + 1) {
                assert!(!a.overlaps(b, 1e-6), "boxes {} and {} overlap", i, j);
            }
        }
    }

    /// Generates `pattern` at its own dimensions.
    pub fn generate(pattern: &dyn LayerPattern, layer: &mut Layer, swapped: bool) -> bool {
        match pattern.layer_dimensions(layer, swapped) {
            Some((l, w)) => pattern.generate_layer(layer, l, w, swapped),
            None => false,
        }
    }
}
