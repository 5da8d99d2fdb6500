//! Solve result representation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a stacking solve operation.
///
/// `solutions` is ranked best first. An empty list is a valid outcome: no
/// combination produced a load.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveResult<T> {
    /// Ranked candidate solutions.
    pub solutions: Vec<T>,

    /// Number of branches enumerated.
    pub branches_total: usize,

    /// Number of branches actually grown into a stack.
    pub branches_evaluated: usize,

    /// Number of evaluated branches that produced no box.
    pub branches_empty: usize,

    /// Number of solutions dropped by `Config::max_solutions`.
    pub truncated: usize,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Strategy used for solving.
    pub strategy: Option<String>,

    /// Whether the solve was cancelled or hit its time limit.
    pub cancelled: bool,
}

impl<T> SolveResult<T> {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self {
            solutions: Vec::new(),
            branches_total: 0,
            branches_evaluated: 0,
            branches_empty: 0,
            truncated: 0,
            computation_time_ms: 0,
            strategy: None,
            cancelled: false,
        }
    }

    /// Returns the best solution, if any.
    pub fn best(&self) -> Option<&T> {
        self.solutions.first()
    }

    /// Returns the number of solutions.
    pub fn solution_count(&self) -> usize {
        self.solutions.len()
    }

    /// Returns true if at least one solution was found.
    pub fn is_successful(&self) -> bool {
        !self.solutions.is_empty()
    }

    /// Returns true if every enumerated branch was evaluated.
    pub fn completed_normally(&self) -> bool {
        !self.cancelled
    }

    /// Sets the strategy name.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Keeps at most `max` solutions. `0` keeps all.
    pub fn truncate(&mut self, max: usize) {
        if max > 0 && self.solutions.len() > max {
            self.truncated += self.solutions.len() - max;
            self.solutions.truncate(max);
        }
    }
}

impl<T> Default for SolveResult<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for a solve result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveSummary {
    /// Number of solutions returned.
    pub solutions: usize,
    /// Number of branches evaluated.
    pub branches_evaluated: usize,
    /// Computation time in milliseconds.
    pub time_ms: u64,
    /// Strategy used.
    pub strategy: String,
    /// Whether the solve stopped early.
    pub cancelled: bool,
}

impl<T> From<&SolveResult<T>> for SolveSummary {
    fn from(result: &SolveResult<T>) -> Self {
        Self {
            solutions: result.solutions.len(),
            branches_evaluated: result.branches_evaluated,
            time_ms: result.computation_time_ms,
            strategy: result
                .strategy
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            cancelled: result.cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_new() {
        let result: SolveResult<u32> = SolveResult::new();
        assert!(result.solutions.is_empty());
        assert!(!result.is_successful());
        assert!(result.completed_normally());
        assert!(result.best().is_none());
    }

    #[test]
    fn test_truncate() {
        let mut result = SolveResult::new();
        result.solutions = vec![5, 4, 3, 2, 1];
        result.truncate(0);
        assert_eq!(result.solution_count(), 5);
        result.truncate(2);
        assert_eq!(result.solutions, vec![5, 4]);
        assert_eq!(result.truncated, 3);
        assert_eq!(result.best(), Some(&5));
    }

    #[test]
    fn test_solve_summary() {
        let mut result = SolveResult::new().with_strategy("LayerEnumeration");
        result.solutions.push(1u8);
        result.branches_evaluated = 12;
        result.computation_time_ms = 3;

        let summary = SolveSummary::from(&result);
        assert_eq!(summary.solutions, 1);
        assert_eq!(summary.branches_evaluated, 12);
        assert_eq!(summary.strategy, "LayerEnumeration");
        assert!(!summary.cancelled);
    }
}
