//! Scenario runner and result reports.

use crate::scenario::{Scenario, ScenarioError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use u_stacking_core::solver::Solver;
use u_stacking_core::{SolveResult, SolveSummary};
use u_stacking_pallet::{CsvExporter, Solution, Stacker};

/// Overrides applied on top of a scenario's own configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Force sequential branch evaluation.
    pub sequential: bool,
    /// Time limit in milliseconds, replacing the scenario's when set.
    pub time_limit_ms: Option<u64>,
    /// Maximum number of solutions kept, replacing the scenario's when set.
    pub max_solutions: Option<usize>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_max_solutions(mut self, max: usize) -> Self {
        self.max_solutions = Some(max);
        self
    }
}

/// One ranked solution, flattened for reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionReport {
    pub rank: usize,
    pub title: String,
    pub pattern: String,
    pub count: usize,
    pub layers: usize,
    pub interlayers: usize,
    pub top_z: f64,
    pub load_weight: f64,
    pub total_weight: f64,
    pub volume_efficiency: f64,
}

impl SolutionReport {
    fn new(rank: usize, solution: &Solution) -> Self {
        Self {
            rank,
            title: solution.title().to_string(),
            pattern: solution.pattern_name().to_string(),
            count: solution.count(),
            layers: solution.layer_count(),
            interlayers: solution.interlayer_count(),
            top_z: solution.top_z(),
            load_weight: solution.load_weight(),
            total_weight: solution.total_weight(),
            volume_efficiency: solution.volume_efficiency(),
        }
    }
}

/// Outcome of running one scenario.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub scenario: String,
    pub result: SolveResult<Solution>,
}

/// Serialized form of a [`RunReport`].
#[derive(Debug, Serialize)]
struct RunReportJson<'a> {
    scenario: &'a str,
    summary: SolveSummary,
    branches_total: usize,
    branches_empty: usize,
    truncated: usize,
    solutions: Vec<SolutionReport>,
}

impl RunReport {
    /// Returns the ranked solutions as flat reports.
    pub fn solution_reports(&self) -> Vec<SolutionReport> {
        self.result
            .solutions
            .iter()
            .enumerate()
            .map(|(i, s)| SolutionReport::new(i + 1, s))
            .collect()
    }

    /// Returns the best solution, if any.
    pub fn best(&self) -> Option<&Solution> {
        self.result.best()
    }

    /// Prints a ranking table of the first `top` solutions (0 = all).
    pub fn print_summary(&self, top: usize) {
        let summary = SolveSummary::from(&self.result);
        println!("\nScenario: {}", self.scenario);
        println!(
            "Branches: {} enumerated, {} evaluated, {} empty",
            self.result.branches_total, self.result.branches_evaluated, self.result.branches_empty
        );
        println!(
            "Solutions: {} in {} ms{}",
            summary.solutions,
            summary.time_ms,
            if summary.cancelled { " (interrupted)" } else { "" }
        );
        println!("{:-<100}", "");
        println!(
            "{:>4}  {:<56} {:>6} {:>6} {:>9} {:>8}",
            "rank", "solution", "boxes", "layers", "top z", "eff %"
        );
        println!("{:-<100}", "");

        let limit = if top == 0 { usize::MAX } else { top };
        for report in self.solution_reports().into_iter().take(limit) {
            println!(
                "{:>4}  {:<56} {:>6} {:>6} {:>9.1} {:>8.1}",
                report.rank,
                report.title,
                report.count,
                report.layers,
                report.top_z,
                report.volume_efficiency * 100.0
            );
        }
    }

    /// Saves the report as pretty JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ScenarioError> {
        let json = RunReportJson {
            scenario: &self.scenario,
            summary: SolveSummary::from(&self.result),
            branches_total: self.result.branches_total,
            branches_empty: self.result.branches_empty,
            truncated: self.result.truncated,
            solutions: self.solution_reports(),
        };
        fs::write(path, serde_json::to_string_pretty(&json)?)?;
        Ok(())
    }

    /// Exports the best solution's box positions as CSV.
    ///
    /// Returns false if there is no solution to export.
    pub fn save_best_csv(&self, path: impl AsRef<Path>) -> Result<bool, ScenarioError> {
        match self.best() {
            Some(best) => {
                CsvExporter::new().export_to_path(best, path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Runs scenarios through the [`Stacker`].
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    options: RunOptions,
}

impl ScenarioRunner {
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    /// Solves `scenario` and returns the ranked result.
    pub fn run(&self, scenario: &Scenario) -> Result<RunReport, ScenarioError> {
        let mut config = scenario.config.clone();
        if self.options.sequential {
            config.parallel = false;
        }
        if let Some(ms) = self.options.time_limit_ms {
            config.time_limit_ms = ms;
        }
        if let Some(max) = self.options.max_solutions {
            config.max_solutions = max;
        }

        let mut stacker = Stacker::new(config).with_constraints(scenario.constraints.clone());
        if let Some(interlayer) = &scenario.interlayer {
            stacker = stacker.with_interlayer(interlayer.clone());
        }

        log::info!("Running scenario '{}'", scenario.name);
        let result = stacker.solve(&scenario.box_props, &scenario.pallet)?;
        log::info!(
            "Scenario '{}': {} solutions in {} ms",
            scenario.name,
            result.solutions.len(),
            result.computation_time_ms
        );

        Ok(RunReport {
            scenario: scenario.name.clone(),
            result,
        })
    }
}
