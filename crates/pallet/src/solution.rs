//! Stacking solutions and their ranking.

use crate::boundary::PalletProperties;
use crate::geometry::BoxProperties;
use std::cmp::Ordering;
use std::fmt;
use u_stacking_core::geometry::{Geometry, HalfAxis};
use u_stacking_core::{BoxPosition, PlacementStats, AABB3D};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the two layer templates of a stack follow each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LayerAlignment {
    /// The same layer at every level.
    Aligned,
    /// Two layers switched at successive levels. `mirrored` starts with the
    /// layer of the positive half-axis.
    Alternate { mirrored: bool },
}

impl LayerAlignment {
    /// Returns the alignment of stacker mode `0..4`.
    pub fn from_mode(mode: usize) -> Self {
        match mode {
            0 | 1 => Self::Aligned,
            2 => Self::Alternate { mirrored: false },
            _ => Self::Alternate { mirrored: true },
        }
    }
}

impl fmt::Display for LayerAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aligned => write!(f, "aligned"),
            Self::Alternate { mirrored: false } => write!(f, "alternate"),
            Self::Alternate { mirrored: true } => write!(f, "alternate mirrored"),
        }
    }
}

/// Identifies the enumeration branch a solution was grown in.
///
/// Field order is the enumeration order, so the derived `Ord` breaks ranking
/// ties deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BranchKey {
    /// Index of the pattern in the registry.
    pub pattern_index: usize,
    /// Whether the pattern was swapped.
    pub swapped: bool,
    /// Stacking axis index (0 = X, 1 = Y, 2 = Z).
    pub axis_index: usize,
    /// Alignment mode (0..4).
    pub mode: usize,
}

/// A layer of boxes in a solution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxLayer {
    z: f64,
    height: f64,
    template: usize,
    positions: Vec<BoxPosition>,
}

impl BoxLayer {
    /// Returns the z of the layer bottom.
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Returns the layer height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns which template (0 or 1) the layer was built from.
    pub fn template(&self) -> usize {
        self.template
    }

    /// Returns the boxes of the layer.
    pub fn positions(&self) -> &[BoxPosition] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// An interlayer sheet in a solution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterlayerPos {
    /// z of the sheet's bottom face.
    pub z: f64,
    /// Sheet thickness.
    pub thickness: f64,
}

/// One element of the stack, bottom to top.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StackElement {
    Layer(BoxLayer),
    Interlayer(InterlayerPos),
}

impl StackElement {
    /// Returns the z of the element bottom.
    pub fn z(&self) -> f64 {
        match self {
            Self::Layer(layer) => layer.z,
            Self::Interlayer(sheet) => sheet.z,
        }
    }

    /// Returns the element thickness along Z.
    pub fn height(&self) -> f64 {
        match self {
            Self::Layer(layer) => layer.height,
            Self::Interlayer(sheet) => sheet.thickness,
        }
    }

    /// Returns the z of the element top.
    pub fn top(&self) -> f64 {
        self.z() + self.height()
    }

    /// Returns the box layer, if this is one.
    pub fn as_layer(&self) -> Option<&BoxLayer> {
        match self {
            Self::Layer(layer) => Some(layer),
            Self::Interlayer(_) => None,
        }
    }
}

/// Accumulates a stack while it grows, then freezes it into a [`Solution`].
#[derive(Debug, Clone)]
pub struct SolutionBuilder {
    pattern_name: String,
    key: BranchKey,
    vertical_axis: HalfAxis,
    box_props: BoxProperties,
    pallet: PalletProperties,
    interlayer_weight: f64,
    usable_area: f64,
    layer_sizes: (usize, usize),
    elements: Vec<StackElement>,
    count: usize,
}

impl SolutionBuilder {
    /// Starts an empty stack on `pallet`.
    pub fn new(
        pattern_name: impl Into<String>,
        key: BranchKey,
        box_props: &BoxProperties,
        pallet: &PalletProperties,
    ) -> Self {
        Self {
            pattern_name: pattern_name.into(),
            key,
            vertical_axis: HalfAxis::ZPos,
            box_props: box_props.clone(),
            pallet: pallet.clone(),
            interlayer_weight: 0.0,
            usable_area: pallet.length() * pallet.width(),
            layer_sizes: (0, 0),
            elements: Vec::new(),
            count: 0,
        }
    }

    /// Sets the vertical half-axis of the first layer.
    pub fn with_vertical_axis(mut self, axis: HalfAxis) -> Self {
        self.vertical_axis = axis;
        self
    }

    /// Sets the weight of one interlayer sheet.
    pub fn with_interlayer_weight(mut self, weight: f64) -> Self {
        self.interlayer_weight = weight;
        self
    }

    /// Sets the usable footprint area (pallet plus overhang).
    pub fn with_usable_area(mut self, area: f64) -> Self {
        self.usable_area = area;
        self
    }

    /// Sets the box count of the two layer templates.
    pub fn with_layer_sizes(mut self, first: usize, second: usize) -> Self {
        self.layer_sizes = (first, second);
        self
    }

    /// Appends an interlayer sheet.
    pub fn add_interlayer(&mut self, z: f64, thickness: f64) {
        self.elements
            .push(StackElement::Interlayer(InterlayerPos { z, thickness }));
    }

    /// Opens a new, empty layer built from `template`.
    pub fn open_layer(&mut self, z: f64, height: f64, template: usize) {
        self.elements.push(StackElement::Layer(BoxLayer {
            z,
            height,
            template,
            positions: Vec::new(),
        }));
    }

    /// Adds a box to the layer opened last.
    ///
    /// Returns false if no layer is open.
    pub fn add_box(&mut self, position: BoxPosition) -> bool {
        match self.elements.last_mut() {
            Some(StackElement::Layer(layer)) => {
                layer.positions.push(position);
                self.count += 1;
                true
            }
            _ => false,
        }
    }

    /// Returns the number of boxes placed so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Finalises the stack.
    ///
    /// An empty trailing layer and a trailing interlayer are dropped. Returns
    /// `None` if the stack holds no box.
    pub fn build(mut self) -> Option<Solution> {
        while let Some(last) = self.elements.last() {
            let drop = match last {
                StackElement::Layer(layer) => layer.is_empty(),
                StackElement::Interlayer(_) => true,
            };
            if !drop {
                break;
            }
            self.elements.pop();
        }

        if self.count == 0 {
            return None;
        }

        // Alternating stacks stay heterogeneous even when cut to one layer.
        let alignment = LayerAlignment::from_mode(self.key.mode);
        let homogeneous = alignment == LayerAlignment::Aligned;

        let title = format!(
            "{}{} | vertical axis {} | {}",
            self.pattern_name,
            if self.key.swapped { " (swapped)" } else { "" },
            self.vertical_axis,
            alignment
        );

        Some(Solution {
            title,
            pattern_name: self.pattern_name,
            key: self.key,
            vertical_axis: self.vertical_axis,
            alignment,
            homogeneous,
            box_props: self.box_props,
            pallet: self.pallet,
            interlayer_weight: self.interlayer_weight,
            usable_area: self.usable_area,
            layer_sizes: self.layer_sizes,
            elements: self.elements,
            count: self.count,
        })
    }
}

/// A complete stack satisfying every constraint.
///
/// Elements are ordered bottom to top and touch each other: the top of one
/// is the bottom of the next.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    title: String,
    pattern_name: String,
    key: BranchKey,
    vertical_axis: HalfAxis,
    alignment: LayerAlignment,
    homogeneous: bool,
    box_props: BoxProperties,
    pallet: PalletProperties,
    interlayer_weight: f64,
    usable_area: f64,
    layer_sizes: (usize, usize),
    elements: Vec<StackElement>,
    count: usize,
}

impl Solution {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn pattern_name(&self) -> &str {
        &self.pattern_name
    }

    /// Returns the branch the solution was grown in.
    pub fn key(&self) -> BranchKey {
        self.key
    }

    /// Returns the vertical half-axis of the first layer.
    pub fn vertical_axis(&self) -> HalfAxis {
        self.vertical_axis
    }

    pub fn is_swapped(&self) -> bool {
        self.key.swapped
    }

    pub fn alignment(&self) -> LayerAlignment {
        self.alignment
    }

    /// Returns true for aligned stacks, which repeat one template.
    pub fn is_homogeneous(&self) -> bool {
        self.homogeneous
    }

    /// Returns the stack elements, bottom to top.
    pub fn elements(&self) -> &[StackElement] {
        &self.elements
    }

    /// Returns the box layers, bottom to top.
    pub fn layers(&self) -> impl Iterator<Item = &BoxLayer> + '_ {
        self.elements.iter().filter_map(StackElement::as_layer)
    }

    /// Returns every box position, bottom layer first.
    pub fn positions(&self) -> impl Iterator<Item = &BoxPosition> + '_ {
        self.layers().flat_map(|layer| layer.positions.iter())
    }

    /// Returns the number of boxes.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn box_properties(&self) -> &BoxProperties {
        &self.box_props
    }

    pub fn layer_count(&self) -> usize {
        self.layers().count()
    }

    pub fn interlayer_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, StackElement::Interlayer(_)))
            .count()
    }

    /// Returns the z of the stack top (the pallet deck if empty).
    pub fn top_z(&self) -> f64 {
        self.elements
            .last()
            .map_or(self.pallet.height(), StackElement::top)
    }

    /// Returns the height of the load above the pallet deck.
    pub fn stack_height(&self) -> f64 {
        self.top_z() - self.pallet.height()
    }

    /// Returns the weight of boxes and interlayers.
    pub fn load_weight(&self) -> f64 {
        self.count as f64 * self.box_props.weight()
            + self.interlayer_count() as f64 * self.interlayer_weight
    }

    /// Returns the load weight plus the pallet.
    pub fn total_weight(&self) -> f64 {
        self.load_weight() + self.pallet.weight()
    }

    /// Returns the box volume over the volume of the usable footprint up to
    /// the stack top.
    pub fn volume_efficiency(&self) -> f64 {
        let envelope = self.usable_area * self.stack_height();
        if envelope <= 0.0 {
            return 0.0;
        }
        self.count as f64 * self.box_props.volume() / envelope
    }

    /// Returns the box count of the two layer templates.
    pub fn boxes_per_layer(&self) -> (usize, usize) {
        self.layer_sizes
    }

    /// Returns the bounding box of all boxes.
    pub fn bounding_box(&self) -> Option<AABB3D<f64>> {
        let (l, w, h) = (
            self.box_props.length(),
            self.box_props.width(),
            self.box_props.height(),
        );
        self.positions()
            .map(|p| p.aabb(l, w, h))
            .reduce(|a, b| a.union(&b))
    }

    /// Returns orientation statistics of the boxes.
    pub fn placement_stats(&self) -> PlacementStats {
        PlacementStats::from_positions(self.positions())
    }

    /// Ranking order: more boxes, then lower top, then homogeneous stacks,
    /// then enumeration order.
    pub fn cmp_rank(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.top_z().total_cmp(&other.top_z()))
            .then_with(|| other.homogeneous.cmp(&self.homogeneous))
            .then_with(|| self.key.cmp(&other.key))
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} boxes, {} layers, top at {:.1}",
            self.title,
            self.count,
            self.layer_count(),
            self.top_z()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn upright(x: f64, y: f64, z: f64) -> BoxPosition {
        BoxPosition::new(Vector3::new(x, y, z), HalfAxis::XPos, HalfAxis::YPos).unwrap()
    }

    fn builder(mode: usize) -> SolutionBuilder {
        SolutionBuilder::new(
            "Column",
            BranchKey {
                mode,
                axis_index: 2,
                ..Default::default()
            },
            &BoxProperties::new(400.0, 300.0, 200.0).with_weight(5.0),
            &PalletProperties::new(1200.0, 800.0, 144.0).with_weight(25.0),
        )
        .with_vertical_axis(HalfAxis::ZPos)
        .with_interlayer_weight(1.0)
    }

    /// Grows `layers` full layers of two boxes, an interlayer between each.
    fn grow(mut b: SolutionBuilder, layers: usize) -> SolutionBuilder {
        let mut z = 144.0;
        for i in 0..layers {
            if i > 0 {
                b.add_interlayer(z, 5.0);
                z += 5.0;
            }
            b.open_layer(z, 200.0, i % 2);
            b.add_box(upright(0.0, 0.0, z));
            b.add_box(upright(400.0, 0.0, z));
            z += 200.0;
        }
        b
    }

    #[test]
    fn test_empty_builder_yields_nothing() {
        let mut b = builder(0);
        b.open_layer(144.0, 200.0, 0);
        assert!(b.build().is_none());
    }

    #[test]
    fn test_add_box_needs_open_layer() {
        let mut b = builder(0);
        assert!(!b.add_box(upright(0.0, 0.0, 144.0)));
        b.add_interlayer(144.0, 5.0);
        assert!(!b.add_box(upright(0.0, 0.0, 149.0)));
        assert_eq!(b.count(), 0);
    }

    #[test]
    fn test_trailing_elements_dropped() {
        let mut b = grow(builder(0), 2);
        b.add_interlayer(549.0, 5.0);
        b.open_layer(554.0, 200.0, 0);
        let solution = b.build().unwrap();
        assert_eq!(solution.layer_count(), 2);
        assert_eq!(solution.interlayer_count(), 1);
        assert_relative_eq!(solution.top_z(), 549.0);
        assert_relative_eq!(solution.stack_height(), 405.0);
    }

    #[test]
    fn test_statistics() {
        let solution = grow(builder(0).with_layer_sizes(2, 2), 3).build().unwrap();
        assert_eq!(solution.count(), 6);
        assert_eq!(solution.positions().count(), 6);
        assert_eq!(solution.boxes_per_layer(), (2, 2));
        assert_relative_eq!(solution.load_weight(), 6.0 * 5.0 + 2.0);
        assert_relative_eq!(solution.total_weight(), 57.0);

        let bbox = solution.bounding_box().unwrap();
        assert_relative_eq!(bbox.min_z, 144.0);
        assert_relative_eq!(bbox.max_x, 800.0);

        let expected = 6.0 * 400.0 * 300.0 * 200.0 / (1200.0 * 800.0 * 610.0);
        assert_relative_eq!(solution.volume_efficiency(), expected, epsilon = 1e-12);
        assert_eq!(solution.placement_stats().count, 6);
    }

    #[test]
    fn test_elements_are_contiguous() {
        let solution = grow(builder(2), 4).build().unwrap();
        for pair in solution.elements().windows(2) {
            assert_relative_eq!(pair[0].top(), pair[1].z(), epsilon = 1e-9);
        }
        assert!(!solution.is_homogeneous());
        let templates: Vec<usize> = solution.layers().map(BoxLayer::template).collect();
        assert_eq!(templates, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_title() {
        let solution = grow(builder(3), 1).build().unwrap();
        assert_eq!(
            solution.title(),
            "Column | vertical axis +Z | alternate mirrored"
        );
        assert!(!solution.is_homogeneous());
    }

    #[test]
    fn test_single_alternate_layer_ranks_after_aligned() {
        let single = |pattern_index: usize, mode: usize| {
            let key = BranchKey {
                pattern_index,
                mode,
                ..Default::default()
            };
            let mut b = SolutionBuilder::new(
                "Column",
                key,
                &BoxProperties::new(400.0, 300.0, 200.0),
                &PalletProperties::new(1200.0, 800.0, 144.0),
            );
            b.open_layer(144.0, 200.0, 0);
            b.add_box(upright(0.0, 0.0, 144.0));
            b.build().unwrap()
        };
        let alternate = single(0, 2);
        let aligned = single(1, 0);
        assert!(!alternate.is_homogeneous());
        assert!(aligned.is_homogeneous());
        assert_eq!(aligned.cmp_rank(&alternate), Ordering::Less);
    }

    #[test]
    fn test_ranking() {
        let more = grow(builder(2), 3).build().unwrap();
        let fewer = grow(builder(0), 2).build().unwrap();
        assert_eq!(more.cmp_rank(&fewer), Ordering::Less);

        let mut lower = builder(1);
        lower.open_layer(144.0, 100.0, 0);
        for i in 0..4 {
            lower.add_box(upright(i as f64 * 300.0, 0.0, 144.0));
        }
        let lower = lower.build().unwrap();
        let higher = grow(builder(0), 2).build().unwrap();
        assert_eq!(lower.cmp_rank(&higher), Ordering::Less);

        let aligned = grow(builder(0), 2).build().unwrap();
        let alternate = grow(builder(2), 2).build().unwrap();
        assert_eq!(aligned.cmp_rank(&alternate), Ordering::Less);
        assert_eq!(aligned.cmp_rank(&aligned.clone()), Ordering::Equal);
    }
}
