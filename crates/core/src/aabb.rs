//! Axis-aligned bounding boxes for footprints and stacked boxes.

use nalgebra::{RealField, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in the pallet plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AABB2D<S> {
    /// Minimum x coordinate.
    pub min_x: S,
    /// Minimum y coordinate.
    pub min_y: S,
    /// Maximum x coordinate.
    pub max_x: S,
    /// Maximum y coordinate.
    pub max_y: S,
}

impl<S: RealField + Copy> AABB2D<S> {
    /// Creates a new AABB from min/max coordinates.
    pub fn new(min_x: S, min_y: S, max_x: S, max_y: S) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates an AABB from its minimum corner and its size.
    pub fn from_origin(x: S, y: S, length: S, width: S) -> Self {
        Self::new(x, y, x + length, y + width)
    }

    /// Returns the x extent.
    pub fn length(&self) -> S {
        self.max_x - self.min_x
    }

    /// Returns the y extent.
    pub fn width(&self) -> S {
        self.max_y - self.min_y
    }

    /// Returns the area of the AABB.
    pub fn area(&self) -> S {
        self.length() * self.width()
    }

    /// Returns true if the interiors of both rectangles overlap by more
    /// than `eps` along both axes.
    pub fn overlaps(&self, other: &Self, eps: S) -> bool {
        self.min_x + eps < other.max_x
            && other.min_x + eps < self.max_x
            && self.min_y + eps < other.max_y
            && other.min_y + eps < self.max_y
    }

    /// Returns true if `other` lies inside this rectangle, within `eps`.
    pub fn contains(&self, other: &Self, eps: S) -> bool {
        other.min_x >= self.min_x - eps
            && other.min_y >= self.min_y - eps
            && other.max_x <= self.max_x + eps
            && other.max_y <= self.max_y + eps
    }

    /// Returns the union (bounding box) of two AABBs.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AABB3D<S> {
    /// Minimum x coordinate.
    pub min_x: S,
    /// Minimum y coordinate.
    pub min_y: S,
    /// Minimum z coordinate.
    pub min_z: S,
    /// Maximum x coordinate.
    pub max_x: S,
    /// Maximum y coordinate.
    pub max_y: S,
    /// Maximum z coordinate.
    pub max_z: S,
}

impl<S: RealField + Copy> AABB3D<S> {
    /// Creates a new AABB from min/max coordinates.
    pub fn new(min_x: S, min_y: S, min_z: S, max_x: S, max_y: S, max_z: S) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Creates an AABB spanning two corners given in any order.
    pub fn from_corners(a: &Vector3<S>, b: &Vector3<S>) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            min_z: a.z.min(b.z),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
            max_z: a.z.max(b.z),
        }
    }

    /// Returns the x extent.
    pub fn length(&self) -> S {
        self.max_x - self.min_x
    }

    /// Returns the y extent.
    pub fn width(&self) -> S {
        self.max_y - self.min_y
    }

    /// Returns the z extent.
    pub fn height(&self) -> S {
        self.max_z - self.min_z
    }

    /// Returns the volume of the AABB.
    pub fn volume(&self) -> S {
        self.length() * self.width() * self.height()
    }

    /// Returns the footprint of the AABB.
    pub fn footprint(&self) -> AABB2D<S> {
        AABB2D::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Returns true if the interiors overlap by more than `eps` along all axes.
    pub fn overlaps(&self, other: &Self, eps: S) -> bool {
        self.footprint().overlaps(&other.footprint(), eps)
            && self.min_z + eps < other.max_z
            && other.min_z + eps < self.max_z
    }

    /// Returns the union (bounding box) of two AABBs.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            min_z: self.min_z.min(other.min_z),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
            max_z: self.max_z.max(other.max_z),
        }
    }
}
