//! Stacking scenario files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use u_stacking_core::geometry::{Axis, Boundary, Geometry};
use u_stacking_core::Config;
use u_stacking_pallet::{BoxProperties, ConstraintSet, InterlayerProperties, PalletProperties};

/// Errors that can occur when loading or running scenarios.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Stacking failed: {0}")]
    SolveError(#[from] u_stacking_core::Error),
}

/// One stacking problem: a box, a pallet and the stacking policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name
    pub name: String,
    /// The box to stack
    #[serde(rename = "box")]
    pub box_props: BoxProperties,
    /// The pallet
    pub pallet: PalletProperties,
    /// Interlayer sheet, required when the constraints set a period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interlayer: Option<InterlayerProperties>,
    /// Stacking policy
    #[serde(default)]
    pub constraints: ConstraintSet,
    /// Solver configuration
    #[serde(default)]
    pub config: Config,
}

impl Scenario {
    /// Parses a scenario from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a scenario from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Serializes the scenario as pretty JSON.
    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the box, pallet and interlayer values.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.trim().is_empty() {
            return Err(ScenarioError::InvalidScenario(
                "Scenario name is empty".into(),
            ));
        }
        self.box_props
            .validate()
            .map_err(|e| ScenarioError::InvalidScenario(e.to_string()))?;
        self.pallet
            .validate()
            .map_err(|e| ScenarioError::InvalidScenario(e.to_string()))?;
        if self.constraints.has_interlayer() && self.interlayer.is_none() {
            return Err(ScenarioError::InvalidScenario(format!(
                "'{}' sets an interlayer period but no interlayer",
                self.name
            )));
        }
        Ok(())
    }

    /// The reference case: 400x300x200 boxes of 5 kg on a 1200x800 pallet,
    /// Column layers on the vertical axis, 1500 high.
    pub fn demo() -> Self {
        Self {
            name: "demo-400x300x200".into(),
            box_props: BoxProperties::new(400.0, 300.0, 200.0).with_weight(5.0),
            pallet: PalletProperties::new(1200.0, 800.0, 144.0).with_weight(25.0),
            interlayer: None,
            constraints: ConstraintSet::new()
                .with_patterns(["Column"])
                .with_vertical_axes([Axis::Z])
                .with_maximum_height(1500.0),
            config: Config::default(),
        }
    }
}
