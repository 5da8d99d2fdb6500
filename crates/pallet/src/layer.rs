//! Single layers of boxes.
//!
//! A [`Layer`] is built for one vertical half-axis of the box. The half-axis
//! fixes the box frame: which box dimension stands upright and where the
//! other two point in the pallet plane. A layer pattern then fills the layer
//! with slots, each holding an unturned box or a box turned a quarter about
//! the vertical.
//!
//! | vertical | length dir | width dir | footprint (X x Y) | height |
//! |----------|------------|-----------|-------------------|--------|
//! | `+Z`     | `+X`       | `+Y`      | L x W             | H      |
//! | `-Z`     | `+Y`       | `+X`      | W x L             | H      |
//! | `+X`     | `+Z`       | `+X`      | W x H             | L      |
//! | `-X`     | `-Z`       | `+Y`      | H x W             | L      |
//! | `+Y`     | `+X`       | `+Z`      | L x H             | W      |
//! | `-Y`     | `+Y`       | `-Z`      | H x L             | W      |
//!
//! The negative half-axis of each pair therefore yields the turned footprint
//! of the positive one, which is what makes alternating layers interlock.

use crate::boundary::PalletProperties;
use crate::constraint::ConstraintSet;
use crate::geometry::BoxProperties;
use nalgebra::Vector3;
use u_stacking_core::geometry::HalfAxis;
use u_stacking_core::{BoxPosition, AABB2D};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A box slot inside a layer.
///
/// The slot stores the box placed on a layer starting at `z = 0`: x/y are
/// pallet coordinates and the origin z is zero unless the box height axis
/// points down.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayerPosition {
    base: BoxPosition,
}

impl LayerPosition {
    /// Returns the offset of the box origin from the layer bottom.
    pub fn offset(&self) -> &Vector3<f64> {
        self.base.position()
    }

    /// Returns the world direction of the box length.
    pub fn length_dir(&self) -> HalfAxis {
        self.base.length_dir()
    }

    /// Returns the world direction of the box width.
    pub fn width_dir(&self) -> HalfAxis {
        self.base.width_dir()
    }

    /// Places the slot on a layer starting at `z`.
    pub fn at_height(&self, z: f64) -> BoxPosition {
        self.base.raised(z)
    }
}

/// The rectangle and box footprint a pattern works with.
///
/// `length`/`width` are the usable pallet footprint; `box_length` and
/// `box_width` the footprint of an unturned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternFrame {
    pub length: f64,
    pub width: f64,
    pub box_length: f64,
    pub box_width: f64,
}

impl PatternFrame {
    /// Returns the frame mirrored about the footprint diagonal.
    pub fn transposed(&self) -> Self {
        Self {
            length: self.width,
            width: self.length,
            ..*self
        }
    }
}

/// One layer of boxes standing on `axis_ortho`.
#[derive(Debug, Clone)]
pub struct Layer {
    axis_ortho: HalfAxis,
    length_dir: HalfAxis,
    width_dir: HalfAxis,
    dims: Vector3<f64>,
    box_length: f64,
    box_width: f64,
    box_height: f64,
    footprint: AABB2D<f64>,
    positions: Vec<LayerPosition>,
}

impl Layer {
    /// Creates an empty layer for the given vertical half-axis.
    pub fn new(
        box_props: &BoxProperties,
        pallet: &PalletProperties,
        constraints: &ConstraintSet,
        axis_ortho: HalfAxis,
    ) -> Self {
        let (length_dir, width_dir) = Self::frame(axis_ortho);
        let dims = Vector3::new(box_props.length(), box_props.width(), box_props.height());
        let extent = Self::world_extent(&dims, length_dir, width_dir);

        Self {
            axis_ortho,
            length_dir,
            width_dir,
            dims,
            box_length: extent.x,
            box_width: extent.y,
            box_height: extent.z,
            footprint: AABB2D::new(
                -constraints.overhang_x,
                -constraints.overhang_y,
                pallet.length() + constraints.overhang_x,
                pallet.width() + constraints.overhang_y,
            ),
            positions: Vec::new(),
        }
    }

    /// Returns the world directions of box length and width for an unturned
    /// box standing on `axis_ortho`.
    pub fn frame(axis_ortho: HalfAxis) -> (HalfAxis, HalfAxis) {
        match axis_ortho {
            HalfAxis::ZPos => (HalfAxis::XPos, HalfAxis::YPos),
            HalfAxis::ZNeg => (HalfAxis::YPos, HalfAxis::XPos),
            HalfAxis::XPos => (HalfAxis::ZPos, HalfAxis::XPos),
            HalfAxis::XNeg => (HalfAxis::ZNeg, HalfAxis::YPos),
            HalfAxis::YPos => (HalfAxis::XPos, HalfAxis::ZPos),
            HalfAxis::YNeg => (HalfAxis::YPos, HalfAxis::ZNeg),
        }
    }

    fn directions(&self, turned: bool) -> (HalfAxis, HalfAxis) {
        if turned {
            (
                self.length_dir.quarter_turn_z(),
                self.width_dir.quarter_turn_z(),
            )
        } else {
            (self.length_dir, self.width_dir)
        }
    }

    fn world_extent(dims: &Vector3<f64>, l: HalfAxis, w: HalfAxis) -> Vector3<f64> {
        let h = l.cross(w).unwrap_or(HalfAxis::ZPos);
        (l.to_vector() * dims.x + w.to_vector() * dims.y + h.to_vector() * dims.z).abs()
    }

    /// Returns the vertical half-axis.
    pub fn axis_ortho(&self) -> HalfAxis {
        self.axis_ortho
    }

    /// Returns the X extent of an unturned box.
    pub fn box_length(&self) -> f64 {
        self.box_length
    }

    /// Returns the Y extent of an unturned box.
    pub fn box_width(&self) -> f64 {
        self.box_width
    }

    /// Returns the box extent along the stacking direction.
    pub fn box_height(&self) -> f64 {
        self.box_height
    }

    /// Returns the usable footprint, overhang included.
    pub fn footprint(&self) -> &AABB2D<f64> {
        &self.footprint
    }

    /// Returns the pattern frame of this layer.
    pub fn pattern_frame(&self) -> PatternFrame {
        PatternFrame {
            length: self.footprint.length(),
            width: self.footprint.width(),
            box_length: self.box_length,
            box_width: self.box_width,
        }
    }

    /// Removes all positions.
    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Adds a box whose footprint starts at (`x`, `y`), measured from the
    /// minimum corner of the usable footprint.
    pub fn add_position(&mut self, x: f64, y: f64, turned: bool) {
        let (length_dir, width_dir) = self.directions(turned);
        let height_dir = length_dir.cross(width_dir).unwrap_or(HalfAxis::ZPos);

        let spans = [
            length_dir.to_vector() * self.dims.x,
            width_dir.to_vector() * self.dims.y,
            height_dir.to_vector() * self.dims.z,
        ];
        // Shift the origin so that the box's minimum corner sits on the slot.
        let mut offset = Vector3::new(self.footprint.min_x + x, self.footprint.min_y + y, 0.0);
        for span in spans {
            offset -= span.inf(&Vector3::zeros());
        }

        if let Some(base) = BoxPosition::new(offset, length_dir, width_dir) {
            self.positions.push(LayerPosition { base });
        }
    }

    /// Returns the positions in insertion order.
    pub fn positions(&self) -> &[LayerPosition] {
        &self.positions
    }

    /// Returns the number of boxes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the layer holds no box.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the footprint occupied by one position.
    pub fn position_footprint(&self, position: &LayerPosition) -> AABB2D<f64> {
        position
            .at_height(0.0)
            .aabb(self.dims.x, self.dims.y, self.dims.z)
            .footprint()
    }

    /// Returns the rectangle covered by all boxes, if any.
    pub fn bounds(&self) -> Option<AABB2D<f64>> {
        self.positions
            .iter()
            .map(|p| self.position_footprint(p))
            .reduce(|a, b| a.union(&b))
    }
}

impl<'a> IntoIterator for &'a Layer {
    type Item = &'a LayerPosition;
    type IntoIter = std::slice::Iter<'a, LayerPosition>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use u_stacking_core::geometry::Axis;

    fn layer(axis: HalfAxis) -> Layer {
        Layer::new(
            &BoxProperties::new(400.0, 300.0, 200.0),
            &PalletProperties::new(1200.0, 800.0, 144.0),
            &ConstraintSet::default(),
            axis,
        )
    }

    #[test]
    fn test_frames_point_the_axis_up() {
        for axis in HalfAxis::ALL {
            let (l, w) = Layer::frame(axis);
            let h = l.cross(w).unwrap();
            // The box's own `axis` must end up pointing to world +Z.
            let up = match axis.axis() {
                Axis::X => l,
                Axis::Y => w,
                Axis::Z => h,
            };
            let up = if axis.is_positive() { up } else { up.opposite() };
            assert_eq!(up, HalfAxis::ZPos, "axis {}", axis);
        }
    }

    #[test]
    fn test_footprints_per_axis() {
        let expect = [
            (HalfAxis::ZPos, 400.0, 300.0, 200.0),
            (HalfAxis::ZNeg, 300.0, 400.0, 200.0),
            (HalfAxis::XPos, 300.0, 200.0, 400.0),
            (HalfAxis::XNeg, 200.0, 300.0, 400.0),
            (HalfAxis::YPos, 400.0, 200.0, 300.0),
            (HalfAxis::YNeg, 200.0, 400.0, 300.0),
        ];
        for (axis, l, w, h) in expect {
            let layer = layer(axis);
            assert_relative_eq!(layer.box_length(), l);
            assert_relative_eq!(layer.box_width(), w);
            assert_relative_eq!(layer.box_height(), h);
        }
    }

    #[test]
    fn test_add_position_lands_on_slot() {
        for axis in HalfAxis::ALL {
            for turned in [false, true] {
                let mut layer = layer(axis);
                layer.add_position(100.0, 50.0, turned);
                let fp = layer.position_footprint(&layer.positions()[0]);
                assert_relative_eq!(fp.min_x, 100.0, epsilon = 1e-9);
                assert_relative_eq!(fp.min_y, 50.0, epsilon = 1e-9);
                let (l, w) = if turned {
                    (layer.box_width(), layer.box_length())
                } else {
                    (layer.box_length(), layer.box_width())
                };
                assert_relative_eq!(fp.length(), l, epsilon = 1e-9);
                assert_relative_eq!(fp.width(), w, epsilon = 1e-9);

                let aabb = layer.positions()[0]
                    .at_height(144.0)
                    .aabb(400.0, 300.0, 200.0);
                assert_relative_eq!(aabb.min_z, 144.0, epsilon = 1e-9);
                assert_relative_eq!(aabb.height(), layer.box_height(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_overhang_extends_footprint() {
        let layer = Layer::new(
            &BoxProperties::new(400.0, 300.0, 200.0),
            &PalletProperties::new(1200.0, 800.0, 144.0),
            &ConstraintSet::default().with_overhang(20.0, 10.0),
            HalfAxis::ZPos,
        );
        let frame = layer.pattern_frame();
        assert_relative_eq!(frame.length, 1240.0);
        assert_relative_eq!(frame.width, 820.0);
        assert_relative_eq!(layer.footprint().min_x, -20.0);
    }

    #[test]
    fn test_transposed_frame() {
        let frame = layer(HalfAxis::ZPos).pattern_frame().transposed();
        assert_relative_eq!(frame.length, 800.0);
        assert_relative_eq!(frame.width, 1200.0);
        assert_relative_eq!(frame.box_length, 400.0);
    }
}
