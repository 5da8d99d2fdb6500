//! Core geometry traits and axis types.

use crate::{Error, Result};
use nalgebra::Vector3;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Trait for the item being stacked.
pub trait Geometry: Clone + Send + Sync {
    /// Returns the volume of one item.
    fn measure(&self) -> f64;

    /// Returns the weight of one item.
    fn weight(&self) -> f64;

    /// Returns the item extent along one of its own axes.
    fn extent(&self, axis: Axis) -> f64;

    /// Validates the geometry and returns an error if invalid.
    fn validate(&self) -> Result<()>;
}

/// Trait for the support the items are stacked on.
pub trait Boundary: Clone + Send + Sync {
    /// Returns the footprint area.
    fn measure(&self) -> f64;

    /// Returns the z coordinate at which the load starts.
    fn base_height(&self) -> f64;

    /// Validates the boundary and returns an error if invalid.
    fn validate(&self) -> Result<()>;
}

/// One of the three principal axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Returns the axis index (X = 0, Y = 1, Z = 2).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the axis for an index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the (negative, positive) half-axes of this axis.
    pub fn half_axes(self) -> (HalfAxis, HalfAxis) {
        match self {
            Axis::X => (HalfAxis::XNeg, HalfAxis::XPos),
            Axis::Y => (HalfAxis::YNeg, HalfAxis::YPos),
            Axis::Z => (HalfAxis::ZNeg, HalfAxis::ZPos),
        }
    }

    /// Returns the axis name.
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A directed axis.
///
/// Discriminants follow the enumeration order used by the stacker: the
/// negative half-axis of an axis `i` is `2i`, the positive one `2i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HalfAxis {
    #[cfg_attr(feature = "serde", serde(rename = "-X"))]
    XNeg = 0,
    #[cfg_attr(feature = "serde", serde(rename = "+X"))]
    XPos = 1,
    #[cfg_attr(feature = "serde", serde(rename = "-Y"))]
    YNeg = 2,
    #[cfg_attr(feature = "serde", serde(rename = "+Y"))]
    YPos = 3,
    #[cfg_attr(feature = "serde", serde(rename = "-Z"))]
    ZNeg = 4,
    #[cfg_attr(feature = "serde", serde(rename = "+Z"))]
    ZPos = 5,
}

impl HalfAxis {
    /// All half-axes in index order.
    pub const ALL: [HalfAxis; 6] = [
        HalfAxis::XNeg,
        HalfAxis::XPos,
        HalfAxis::YNeg,
        HalfAxis::YPos,
        HalfAxis::ZNeg,
        HalfAxis::ZPos,
    ];

    /// Returns the half-axis index (0..6).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the half-axis for an index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the undirected axis.
    pub fn axis(self) -> Axis {
        match self {
            HalfAxis::XNeg | HalfAxis::XPos => Axis::X,
            HalfAxis::YNeg | HalfAxis::YPos => Axis::Y,
            HalfAxis::ZNeg | HalfAxis::ZPos => Axis::Z,
        }
    }

    /// Returns true for the positive direction.
    pub fn is_positive(self) -> bool {
        self.index() % 2 == 1
    }

    /// Returns the opposite direction.
    pub fn opposite(self) -> Self {
        // XNeg <-> XPos, ...
        Self::ALL[self.index() ^ 1]
    }

    /// Returns the unit vector.
    pub fn to_vector(self) -> Vector3<f64> {
        let sign = if self.is_positive() { 1.0 } else { -1.0 };
        match self.axis() {
            Axis::X => Vector3::new(sign, 0.0, 0.0),
            Axis::Y => Vector3::new(0.0, sign, 0.0),
            Axis::Z => Vector3::new(0.0, 0.0, sign),
        }
    }

    /// Returns the half-axis matching an axis-aligned unit vector.
    pub fn from_vector(v: &Vector3<f64>) -> Option<Self> {
        const EPS: f64 = 1e-9;
        let candidates = [(v.x, Axis::X), (v.y, Axis::Y), (v.z, Axis::Z)];
        let mut found = None;
        for (component, axis) in candidates {
            if component.abs() < EPS {
                continue;
            }
            if found.is_some() || (component.abs() - 1.0).abs() > EPS {
                return None;
            }
            let (neg, pos) = axis.half_axes();
            found = Some(if component > 0.0 { pos } else { neg });
        }
        found
    }

    /// Returns the cross product, or `None` for parallel half-axes.
    pub fn cross(self, other: HalfAxis) -> Option<Self> {
        Self::from_vector(&self.to_vector().cross(&other.to_vector()))
    }

    /// Rotates a quarter turn counter-clockwise about +Z.
    pub fn quarter_turn_z(self) -> Self {
        match self {
            HalfAxis::XPos => HalfAxis::YPos,
            HalfAxis::YPos => HalfAxis::XNeg,
            HalfAxis::XNeg => HalfAxis::YNeg,
            HalfAxis::YNeg => HalfAxis::XPos,
            z => z,
        }
    }

    /// Returns the short signed name (`+X`, `-Z`, ...).
    pub fn name(self) -> &'static str {
        match self {
            HalfAxis::XNeg => "-X",
            HalfAxis::XPos => "+X",
            HalfAxis::YNeg => "-Y",
            HalfAxis::YPos => "+Y",
            HalfAxis::ZNeg => "-Z",
            HalfAxis::ZPos => "+Z",
        }
    }
}

impl fmt::Display for HalfAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HalfAxis {
    type Err = Error;

    /// Accepts `+X`, `-x`, `X` (positive) and `XP`/`XN` spellings.
    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let (positive, letter) = match upper.as_str() {
            "+X" | "X" | "XP" => (true, 'X'),
            "-X" | "XN" => (false, 'X'),
            "+Y" | "Y" | "YP" => (true, 'Y'),
            "-Y" | "YN" => (false, 'Y'),
            "+Z" | "Z" | "ZP" => (true, 'Z'),
            "-Z" | "ZN" => (false, 'Z'),
            _ => {
                return Err(Error::ConfigError(format!("Unknown half-axis '{}'", s)));
            }
        };
        let axis = match letter {
            'X' => Axis::X,
            'Y' => Axis::Y,
            _ => Axis::Z,
        };
        let (neg, pos) = axis.half_axes();
        Ok(if positive { pos } else { neg })
    }
}
