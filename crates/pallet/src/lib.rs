//! # U-Stacking Pallet
//!
//! Layer stacking of identical boxes on a pallet.
//!
//! The [`Stacker`] tries every registered [`LayerPattern`] in both swap
//! states, on each stacking axis, with aligned and alternating layers, grows
//! each combination until a height, weight or count cap is hit and returns
//! the resulting [`Solution`]s ranked best first.
//!
//! ```rust
//! use u_stacking_pallet::{BoxProperties, ConstraintSet, PalletProperties, Stacker};
//! use u_stacking_core::{Axis, Solver};
//!
//! let case = BoxProperties::new(400.0, 300.0, 200.0).with_weight(5.0);
//! let pallet = PalletProperties::new(1200.0, 800.0, 144.0);
//! let constraints = ConstraintSet::new()
//!     .with_patterns(["Column"])
//!     .with_vertical_axes([Axis::Z])
//!     .with_maximum_height(1500.0);
//!
//! let result = Stacker::default_config()
//!     .with_constraints(constraints)
//!     .solve(&case, &pallet)
//!     .unwrap();
//! assert_eq!(result.best().unwrap().count(), 48);
//! ```

pub mod boundary;
pub mod constraint;
pub mod export;
pub mod geometry;
pub mod layer;
pub mod pattern;
pub mod solution;
pub mod stacker;

// Re-exports
pub use boundary::{InterlayerProperties, PalletProperties};
pub use constraint::ConstraintSet;
pub use export::CsvExporter;
pub use geometry::BoxProperties;
pub use layer::{Layer, LayerPosition, PatternFrame};
pub use pattern::{
    default_patterns, ColumnPattern, EnlargedSpiralPattern, InterlockedPattern, LayerPattern,
    Slot, SpiralPattern,
};
pub use solution::{
    BoxLayer, BranchKey, InterlayerPos, LayerAlignment, Solution, SolutionBuilder, StackElement,
};
pub use stacker::Stacker;
pub use u_stacking_core::{Config, Error, Result, SolveResult};
