//! Box (case) properties.

use u_stacking_core::geometry::{Axis, Geometry, HalfAxis};
use u_stacking_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The box stacked on the pallet. All boxes of one analysis share it.
///
/// The box's own axes are X (length), Y (width) and Z (height).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxProperties {
    /// Extent along the box X axis.
    length: f64,

    /// Extent along the box Y axis.
    width: f64,

    /// Extent along the box Z axis.
    height: f64,

    /// Weight of one box.
    #[cfg_attr(feature = "serde", serde(default))]
    weight: f64,
}

impl BoxProperties {
    /// Creates a new box with the given dimensions and no weight.
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
            weight: 0.0,
        }
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Returns the length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns the width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the box extent along a box half-axis; the sign is ignored.
    pub fn dimension(&self, axis: HalfAxis) -> f64 {
        self.extent(axis.axis())
    }

    /// Returns the volume of one box.
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }
}

impl Geometry for BoxProperties {
    fn measure(&self) -> f64 {
        self.volume()
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.length,
            Axis::Y => self.width,
            Axis::Z => self.height,
        }
    }

    fn validate(&self) -> Result<()> {
        let finite = [self.length, self.width, self.height, self.weight]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::InvalidGeometry(
                "Box dimensions and weight must be finite".into(),
            ));
        }

        if self.length <= 0.0 || self.width <= 0.0 || self.height <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "All box dimensions must be positive (got {} x {} x {})",
                self.length, self.width, self.height
            )));
        }

        if self.weight < 0.0 {
            return Err(Error::InvalidGeometry(
                "Box weight cannot be negative".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_volume() {
        let b = BoxProperties::new(400.0, 300.0, 200.0);
        assert_relative_eq!(b.measure(), 24_000_000.0, epsilon = 0.001);
    }

    #[test]
    fn test_dimension_per_half_axis() {
        let b = BoxProperties::new(400.0, 300.0, 200.0).with_weight(5.0);
        assert_relative_eq!(b.dimension(HalfAxis::XNeg), 400.0);
        assert_relative_eq!(b.dimension(HalfAxis::YPos), 300.0);
        assert_relative_eq!(b.dimension(HalfAxis::ZNeg), 200.0);
        assert_relative_eq!(b.weight(), 5.0);
    }

    #[test]
    fn test_validation() {
        assert!(BoxProperties::new(10.0, 20.0, 30.0).validate().is_ok());
        assert!(BoxProperties::new(-10.0, 20.0, 30.0).validate().is_err());
        assert!(BoxProperties::new(10.0, 0.0, 30.0).validate().is_err());
        assert!(BoxProperties::new(10.0, 20.0, f64::NAN).validate().is_err());
        assert!(BoxProperties::new(10.0, 20.0, 30.0)
            .with_weight(-1.0)
            .validate()
            .is_err());
    }
}
