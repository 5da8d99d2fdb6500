//! # U-Stacking
//!
//! Pallet loading engine for identical boxes.
//!
//! This crate computes multi-layer loads of one box size on one pallet:
//! - **Layer patterns**: Column, Interlocked, Spiral and EnlargedSpiral tilings
//! - **Stacking**: aligned and alternating layers, interlayers, height/weight/count caps
//! - **Ranking**: candidate loads sorted best first
//!
//! ## Quick Start
//!
//! ```rust
//! use u_stacking::pallet::{BoxProperties, ConstraintSet, PalletProperties, Stacker};
//! use u_stacking::Solver;
//!
//! let case = BoxProperties::new(400.0, 300.0, 200.0).with_weight(5.0);
//! let pallet = PalletProperties::new(1200.0, 800.0, 144.0);
//! let stacker = Stacker::default_config()
//!     .with_constraints(ConstraintSet::new().with_maximum_height(1500.0));
//!
//! let result = stacker.solve(&case, &pallet).unwrap();
//! let best = result.best().unwrap();
//! println!("{}", best.title());
//! ```
//!
//! ## Feature Flags
//!
//! - `pallet` (default): layer stacking solver
//! - `serde`: Serialization support

/// Core traits and abstractions.
pub use u_stacking_core as core;

/// Layer stacking on pallets.
#[cfg(feature = "pallet")]
pub use u_stacking_pallet as pallet;

// Re-export commonly used types at root level
pub use u_stacking_core::{Config, Error, HalfAxis, Result, SolveResult, Solver};
