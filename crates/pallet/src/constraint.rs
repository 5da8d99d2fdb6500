//! Constraint set consulted by the stacker.

use std::collections::BTreeSet;
use u_stacking_core::geometry::{Axis, HalfAxis};
use u_stacking_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stacking policy: allowed patterns and orientations, layer sequencing and
/// the caps that end a stack.
///
/// Every cap is optional and `None` means unlimited.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConstraintSet {
    /// Allowed pattern names. Empty allows every pattern.
    pub allowed_patterns: BTreeSet<String>,

    /// Allowed vertical half-axes of the box.
    pub allowed_axes: BTreeSet<HalfAxis>,

    /// Allow stacks repeating a single layer.
    pub allow_aligned_layers: bool,

    /// Allow stacks alternating two layers.
    pub allow_alternate_layers: bool,

    /// Maximum height of the load, pallet included.
    pub maximum_height: Option<f64>,

    /// Maximum weight of the boxes on the pallet.
    pub maximum_weight: Option<f64>,

    /// Maximum number of boxes.
    pub maximum_count: Option<usize>,

    /// Insert an interlayer after every `n` layers.
    pub interlayer_period: Option<usize>,

    /// Allowed overhang beyond each pallet edge along X.
    pub overhang_x: f64,

    /// Allowed overhang beyond each pallet edge along Y.
    pub overhang_y: f64,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self {
            allowed_patterns: BTreeSet::new(),
            allowed_axes: HalfAxis::ALL.into_iter().collect(),
            allow_aligned_layers: true,
            allow_alternate_layers: true,
            maximum_height: None,
            maximum_weight: None,
            maximum_count: None,
            interlayer_period: None,
            overhang_x: 0.0,
            overhang_y: 0.0,
        }
    }
}

impl ConstraintSet {
    /// Creates a constraint set allowing everything, with no caps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the allowed patterns to the given names.
    pub fn with_patterns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_patterns = names.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts the allowed vertical half-axes.
    pub fn with_half_axes(mut self, axes: impl IntoIterator<Item = HalfAxis>) -> Self {
        self.allowed_axes = axes.into_iter().collect();
        self
    }

    /// Restricts the allowed vertical axes, both directions of each.
    pub fn with_vertical_axes(mut self, axes: impl IntoIterator<Item = Axis>) -> Self {
        self.allowed_axes = axes
            .into_iter()
            .flat_map(|axis| {
                let (neg, pos) = axis.half_axes();
                [neg, pos]
            })
            .collect();
        self
    }

    /// Allows or forbids stacks of a single repeated layer.
    pub fn with_aligned_layers(mut self, allow: bool) -> Self {
        self.allow_aligned_layers = allow;
        self
    }

    /// Allows or forbids stacks alternating two layers.
    pub fn with_alternate_layers(mut self, allow: bool) -> Self {
        self.allow_alternate_layers = allow;
        self
    }

    /// Sets the maximum load height (pallet included).
    pub fn with_maximum_height(mut self, height: f64) -> Self {
        self.maximum_height = Some(height);
        self
    }

    /// Sets the maximum weight of the boxes.
    pub fn with_maximum_weight(mut self, weight: f64) -> Self {
        self.maximum_weight = Some(weight);
        self
    }

    /// Sets the maximum number of boxes.
    pub fn with_maximum_count(mut self, count: usize) -> Self {
        self.maximum_count = Some(count);
        self
    }

    /// Inserts an interlayer after every `period` layers.
    pub fn with_interlayer_period(mut self, period: usize) -> Self {
        self.interlayer_period = Some(period);
        self
    }

    /// Sets the allowed overhang on each side of the pallet.
    pub fn with_overhang(mut self, x: f64, y: f64) -> Self {
        self.overhang_x = x;
        self.overhang_y = y;
        self
    }

    /// Returns true if the named pattern may be used.
    pub fn allow_pattern(&self, name: &str) -> bool {
        self.allowed_patterns.is_empty() || self.allowed_patterns.contains(name)
    }

    /// Returns true if the box may stand with `axis` pointing up.
    pub fn allow_ortho_axis(&self, axis: HalfAxis) -> bool {
        self.allowed_axes.contains(&axis)
    }

    /// Returns true if interlayers are inserted.
    pub fn has_interlayer(&self) -> bool {
        self.interlayer_period.is_some()
    }

    /// Returns true if a cap ends every stack.
    pub fn is_bounded(&self) -> bool {
        self.maximum_height.is_some() || self.maximum_weight.is_some() || self.maximum_count.is_some()
    }

    /// Validates the policy values.
    pub fn validate(&self) -> Result<()> {
        if !self.overhang_x.is_finite()
            || !self.overhang_y.is_finite()
            || self.overhang_x < 0.0
            || self.overhang_y < 0.0
        {
            return Err(Error::ConfigError(
                "Overhang must be a non-negative finite value".into(),
            ));
        }

        if let Some(height) = self.maximum_height {
            if !height.is_finite() || height <= 0.0 {
                return Err(Error::ConfigError(
                    "Maximum height must be positive".into(),
                ));
            }
        }

        if let Some(weight) = self.maximum_weight {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(Error::ConfigError(
                    "Maximum weight must be positive".into(),
                ));
            }
        }

        if self.maximum_count == Some(0) {
            return Err(Error::ConfigError(
                "Maximum box count must be at least 1".into(),
            ));
        }

        if self.interlayer_period == Some(0) {
            return Err(Error::ConfigError(
                "Interlayer period must be at least 1".into(),
            ));
        }

        if self.allowed_axes.is_empty() {
            return Err(Error::ConfigError("No vertical axis allowed".into()));
        }

        if !self.allow_aligned_layers && !self.allow_alternate_layers {
            return Err(Error::ConfigError(
                "Neither aligned nor alternate layers are allowed".into(),
            ));
        }

        if !self.is_bounded() {
            return Err(Error::ConfigError(
                "At least one of maximum height, weight or count must be set".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded() -> ConstraintSet {
        ConstraintSet::new().with_maximum_height(1500.0)
    }

    #[test]
    fn test_default_allows_everything() {
        let cs = ConstraintSet::default();
        assert!(cs.allow_pattern("Column"));
        assert!(cs.allow_pattern("Anything"));
        for h in HalfAxis::ALL {
            assert!(cs.allow_ortho_axis(h));
        }
        assert!(!cs.has_interlayer());
        assert!(!cs.is_bounded());
    }

    #[test]
    fn test_pattern_filter() {
        let cs = bounded().with_patterns(["Column", "Spiral"]);
        assert!(cs.allow_pattern("Column"));
        assert!(cs.allow_pattern("Spiral"));
        assert!(!cs.allow_pattern("Interlocked"));
    }

    #[test]
    fn test_vertical_axes_include_both_directions() {
        let cs = bounded().with_vertical_axes([Axis::Z]);
        assert!(cs.allow_ortho_axis(HalfAxis::ZPos));
        assert!(cs.allow_ortho_axis(HalfAxis::ZNeg));
        assert!(!cs.allow_ortho_axis(HalfAxis::XPos));

        let only_up = bounded().with_half_axes([HalfAxis::ZPos]);
        assert!(!only_up.allow_ortho_axis(HalfAxis::ZNeg));
    }

    #[test]
    fn test_validation() {
        assert!(bounded().validate().is_ok());
        assert!(ConstraintSet::new().validate().is_err());
        assert!(bounded().with_interlayer_period(0).validate().is_err());
        assert!(bounded().with_maximum_count(0).validate().is_err());
        assert!(ConstraintSet::new()
            .with_maximum_weight(0.0)
            .validate()
            .is_err());
        assert!(bounded().with_overhang(-1.0, 0.0).validate().is_err());
        assert!(bounded().with_half_axes([]).validate().is_err());
        assert!(bounded()
            .with_aligned_layers(false)
            .with_alternate_layers(false)
            .validate()
            .is_err());
        assert!(ConstraintSet::new().with_maximum_count(10).validate().is_ok());
    }
}
