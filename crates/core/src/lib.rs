//! # U-Stacking Core
//!
//! Core traits and abstractions for the U-Stacking pallet loading engine.
//!
//! This crate provides the foundational types shared by the layer stacking
//! solver and its outer surfaces (scenario runner, exporters).
//!
//! ## Core Components
//!
//! - **Axes**: [`Axis`], [`HalfAxis`] - directed axes used for stacking
//!   direction and box orientation
//! - **Geometry traits**: [`Geometry`] (the stacked item), [`Boundary`] (the
//!   support)
//! - **Placements**: [`BoxPosition`] - a box placed in world space
//! - **Bounding boxes**: [`AABB2D`], [`AABB3D`]
//! - **Solver trait**: [`Solver`], [`Config`], [`SolveResult`]
//!
//! ## Configuration
//!
//! ```rust
//! use u_stacking_core::Config;
//!
//! let config = Config::new()
//!     .with_time_limit(5_000)
//!     .with_parallel(true)
//!     .with_max_solutions(20);
//! assert_eq!(config.max_solutions, 20);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod aabb;
pub mod error;
pub mod geometry;
pub mod placement;
pub mod result;
pub mod solver;

// Re-exports
pub use aabb::{AABB2D, AABB3D};
pub use error::{Error, Result};
pub use geometry::{Axis, Boundary, Geometry, HalfAxis};
pub use placement::{BoxPosition, PlacementStats};
pub use result::{SolveResult, SolveSummary};
pub use solver::{Config, ProgressCallback, ProgressInfo, Solver};
