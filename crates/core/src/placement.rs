//! Placement representation for stacked boxes.

use crate::aabb::AABB3D;
use crate::geometry::HalfAxis;
use nalgebra::Vector3;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A box placed in world space.
///
/// The box's own length axis points along `length_dir`, its width axis along
/// `width_dir` and its height axis along `length_dir × width_dir`, starting
/// from `position`. Directions may be negative, in which case the box extends
/// from `position` towards decreasing coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxPosition {
    position: Vector3<f64>,
    length_dir: HalfAxis,
    width_dir: HalfAxis,
}

impl BoxPosition {
    /// Creates a new box position.
    ///
    /// Returns `None` when both directions lie on the same axis.
    pub fn new(position: Vector3<f64>, length_dir: HalfAxis, width_dir: HalfAxis) -> Option<Self> {
        if length_dir.axis() == width_dir.axis() {
            return None;
        }
        Some(Self {
            position,
            length_dir,
            width_dir,
        })
    }

    /// Returns the box origin.
    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    /// Returns the world direction of the box length.
    pub fn length_dir(&self) -> HalfAxis {
        self.length_dir
    }

    /// Returns the world direction of the box width.
    pub fn width_dir(&self) -> HalfAxis {
        self.width_dir
    }

    /// Returns the world direction of the box height.
    pub fn height_dir(&self) -> HalfAxis {
        // Directions are validated as perpendicular in `new`.
        self.length_dir
            .cross(self.width_dir)
            .unwrap_or(HalfAxis::ZPos)
    }

    /// Returns the world-space bounding box for the given box dimensions.
    pub fn aabb(&self, length: f64, width: f64, height: f64) -> AABB3D<f64> {
        let far = self.position
            + self.length_dir.to_vector() * length
            + self.width_dir.to_vector() * width
            + self.height_dir().to_vector() * height;
        AABB3D::from_corners(&self.position, &far)
    }

    /// Returns a copy raised by `dz`.
    pub fn raised(&self, dz: f64) -> Self {
        Self {
            position: self.position + Vector3::new(0.0, 0.0, dz),
            ..*self
        }
    }
}

/// Orientation statistics for a set of box positions.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementStats {
    /// Total number of positions.
    pub count: usize,
    /// Number of boxes per world direction of their height axis.
    pub vertical_distribution: BTreeMap<HalfAxis, usize>,
    /// Number of boxes whose length runs along world Y.
    pub turned_count: usize,
}

impl PlacementStats {
    /// Computes statistics from a set of positions.
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a BoxPosition>) -> Self {
        let mut stats = Self::default();
        for p in positions {
            stats.count += 1;
            *stats
                .vertical_distribution
                .entry(p.height_dir())
                .or_insert(0) += 1;
            if p.length_dir().axis() == crate::geometry::Axis::Y {
                stats.turned_count += 1;
            }
        }
        stats
    }
}
