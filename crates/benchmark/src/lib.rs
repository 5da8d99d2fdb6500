//! Scenario runner for U-Stacking
//!
//! This crate provides:
//! - JSON scenario files describing a box, a pallet and a stacking policy
//! - A runner solving scenarios with the layer stacker
//! - Ranking tables, JSON reports and CSV export of the best load

mod runner;
mod scenario;

pub use runner::{RunOptions, RunReport, ScenarioRunner, SolutionReport};
pub use scenario::{Scenario, ScenarioError};
