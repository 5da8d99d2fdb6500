//! Pallet and interlayer properties.

use u_stacking_core::geometry::Boundary;
use u_stacking_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The pallet the load is built on.
///
/// The footprint spans `[0, length] x [0, width]` in world X/Y and the first
/// layer starts at `z = height`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PalletProperties {
    /// Footprint extent along world X.
    length: f64,

    /// Footprint extent along world Y.
    width: f64,

    /// Height of the pallet deck.
    #[cfg_attr(feature = "serde", serde(default))]
    height: f64,

    /// Weight of the empty pallet.
    #[cfg_attr(feature = "serde", serde(default))]
    weight: f64,
}

impl PalletProperties {
    /// Creates a new pallet with the given footprint and deck height.
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
            weight: 0.0,
        }
    }

    /// Sets the pallet weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Returns the footprint length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns the footprint width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the deck height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the pallet weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl Boundary for PalletProperties {
    fn measure(&self) -> f64 {
        self.length * self.width
    }

    fn base_height(&self) -> f64 {
        self.height
    }

    fn validate(&self) -> Result<()> {
        let finite = [self.length, self.width, self.height, self.weight]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::InvalidBoundary(
                "Pallet dimensions and weight must be finite".into(),
            ));
        }

        if self.length <= 0.0 || self.width <= 0.0 {
            return Err(Error::InvalidBoundary(
                "Pallet length and width must be positive".into(),
            ));
        }

        if self.height < 0.0 {
            return Err(Error::InvalidBoundary(
                "Pallet height cannot be negative".into(),
            ));
        }

        if self.weight < 0.0 {
            return Err(Error::InvalidBoundary(
                "Pallet weight cannot be negative".into(),
            ));
        }

        Ok(())
    }
}

/// A separator sheet laid between groups of layers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterlayerProperties {
    /// Sheet thickness.
    thickness: f64,

    /// Sheet weight.
    #[cfg_attr(feature = "serde", serde(default))]
    weight: f64,
}

impl InterlayerProperties {
    /// Creates a new interlayer with the given thickness.
    pub fn new(thickness: f64) -> Self {
        Self {
            thickness,
            weight: 0.0,
        }
    }

    /// Sets the sheet weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Returns the thickness.
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Returns the sheet weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Validates the interlayer.
    pub fn validate(&self) -> Result<()> {
        if !self.thickness.is_finite() || self.thickness <= 0.0 {
            return Err(Error::InvalidBoundary(
                "Interlayer thickness must be positive".into(),
            ));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(Error::InvalidBoundary(
                "Interlayer weight cannot be negative".into(),
            ));
        }
        Ok(())
    }
}
