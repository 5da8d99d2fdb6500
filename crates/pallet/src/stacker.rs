//! Layer stacking solver.
//!
//! The stacker enumerates every combination of layer pattern, swap state and
//! stacking axis, builds the two layers of the axis (one per half-axis) and
//! grows a stack for each allowed way of sequencing them:
//!
//! | mode | gate | templates |
//! |------|------|-----------|
//! | 0 | aligned layers | negative half-axis layer repeated |
//! | 1 | aligned layers | positive half-axis layer repeated |
//! | 2 | alternate layers | negative, positive, ... at the common footprint |
//! | 3 | alternate layers | positive, negative, ... at the common footprint |
//!
//! Stacks grow until the height, weight or count cap is reached; the
//! non-empty ones are ranked with [`Solution::cmp_rank`].

use crate::boundary::{InterlayerProperties, PalletProperties};
use crate::constraint::ConstraintSet;
use crate::geometry::BoxProperties;
use crate::layer::Layer;
use crate::pattern::{default_patterns, LayerPattern};
use crate::solution::{BranchKey, Solution, SolutionBuilder};
use u_stacking_core::geometry::{Axis, Boundary, Geometry};
use u_stacking_core::solver::{Config, ProgressCallback, ProgressInfo, Solver};
use u_stacking_core::{Error, Result, SolveResult};

use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Strategy label reported in [`SolveResult::strategy`].
pub const STRATEGY: &str = "LayerStacking";

/// One pattern, swap state and stacking axis to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Branch {
    pattern_index: usize,
    swapped: bool,
    axis_index: usize,
}

impl Branch {
    fn key(&self, mode: usize) -> BranchKey {
        BranchKey {
            pattern_index: self.pattern_index,
            swapped: self.swapped,
            axis_index: self.axis_index,
            mode,
        }
    }
}

/// Inputs shared by every branch of one solve.
struct StackContext<'a> {
    box_props: &'a BoxProperties,
    pallet: &'a PalletProperties,
    interlayer: Option<&'a InterlayerProperties>,
}

/// Generates ranked layer stacks of identical boxes on a pallet.
pub struct Stacker {
    config: Config,
    constraints: ConstraintSet,
    interlayer: Option<InterlayerProperties>,
    patterns: Vec<Arc<dyn LayerPattern>>,
    cancelled: Arc<AtomicBool>,
}

impl Stacker {
    /// Creates a stacker with the built-in patterns and default constraints.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            constraints: ConstraintSet::default(),
            interlayer: None,
            patterns: default_patterns(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a stacker with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Sets the constraint set.
    pub fn with_constraints(mut self, constraints: ConstraintSet) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the interlayer used when the constraint set enables them.
    pub fn with_interlayer(mut self, interlayer: InterlayerProperties) -> Self {
        self.interlayer = Some(interlayer);
        self
    }

    /// Registers an additional pattern after the existing ones.
    pub fn with_pattern(mut self, pattern: Arc<dyn LayerPattern>) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Returns the registered patterns in enumeration order.
    pub fn patterns(&self) -> &[Arc<dyn LayerPattern>] {
        &self.patterns
    }

    /// Returns a handle that cancels a running solve when set.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    fn validate(&self, box_props: &BoxProperties, pallet: &PalletProperties) -> Result<()> {
        box_props.validate()?;
        pallet.validate()?;
        self.constraints.validate()?;

        if self.constraints.has_interlayer() {
            match &self.interlayer {
                Some(interlayer) => interlayer.validate()?,
                None => {
                    return Err(Error::ConfigError(
                        "Interlayer period set without interlayer properties".into(),
                    ))
                }
            }
        }

        if !self
            .patterns
            .iter()
            .any(|p| self.constraints.allow_pattern(p.name()))
        {
            return Err(Error::ConfigError(
                "No registered pattern is allowed".into(),
            ));
        }

        // A weight cap alone never stops a stack of weightless boxes.
        let c = &self.constraints;
        let stops = c.maximum_height.is_some()
            || c.maximum_count.is_some()
            || (c.maximum_weight.is_some() && box_props.weight() > 0.0);
        if !stops {
            return Err(Error::ConfigError(
                "Weight cap needs a positive box weight when no other cap is set".into(),
            ));
        }

        Ok(())
    }

    /// Lists the branches in enumeration order.
    fn branches(&self) -> Vec<Branch> {
        let mut branches = Vec::new();
        for (pattern_index, pattern) in self.patterns.iter().enumerate() {
            if !self.constraints.allow_pattern(pattern.name()) {
                continue;
            }
            let swaps: &[bool] = if pattern.can_be_swapped() {
                &[false, true]
            } else {
                &[false]
            };
            for &swapped in swaps {
                for (axis_index, axis) in Axis::ALL.iter().enumerate() {
                    let (_, ortho2) = axis.half_axes();
                    if !self.constraints.allow_ortho_axis(ortho2) {
                        continue;
                    }
                    branches.push(Branch {
                        pattern_index,
                        swapped,
                        axis_index,
                    });
                }
            }
        }
        branches
    }

    /// Grows every allowed alignment mode of `branch`.
    fn evaluate(&self, ctx: &StackContext<'_>, branch: Branch) -> Vec<Solution> {
        let pattern = &self.patterns[branch.pattern_index];
        let swapped = branch.swapped;
        let (ortho1, ortho2) = Axis::ALL[branch.axis_index].half_axes();

        let new_layer = |axis| Layer::new(ctx.box_props, ctx.pallet, &self.constraints, axis);
        let probe1 = new_layer(ortho1);
        let probe2 = new_layer(ortho2);
        let dims1 = pattern.layer_dimensions(&probe1, swapped);
        let dims2 = pattern.layer_dimensions(&probe2, swapped);

        log::trace!(
            "Branch {} swapped={} axis {}: footprints {:?} / {:?}",
            pattern.name(),
            swapped,
            Axis::ALL[branch.axis_index],
            dims1,
            dims2
        );

        let mut solutions = Vec::new();
        for mode in 0..4 {
            let aligned = mode < 2;
            if aligned && !self.constraints.allow_aligned_layers {
                continue;
            }
            if !aligned && !self.constraints.allow_alternate_layers {
                continue;
            }

            let templates = match mode {
                0 => dims1.and_then(|(l, w)| {
                    let mut layer = probe1.clone();
                    pattern
                        .generate_layer(&mut layer, l, w, swapped)
                        .then(|| (layer.clone(), layer))
                }),
                1 => dims2.and_then(|(l, w)| {
                    let mut layer = probe2.clone();
                    pattern
                        .generate_layer(&mut layer, l, w, swapped)
                        .then(|| (layer.clone(), layer))
                }),
                _ => match (dims1, dims2) {
                    (Some((l1, w1)), Some((l2, w2))) => {
                        let (l, w) = (l1.max(l2), w1.max(w2));
                        let mut layer1 = probe1.clone();
                        let mut layer2 = probe2.clone();
                        let ok1 = pattern.generate_layer(&mut layer1, l, w, swapped);
                        let ok2 = pattern.generate_layer(&mut layer2, l, w, swapped);
                        match (ok1 && ok2, mode) {
                            (false, _) => None,
                            (true, 2) => Some((layer1, layer2)),
                            (true, _) => Some((layer2, layer1)),
                        }
                    }
                    _ => None,
                },
            };

            let Some((first, second)) = templates else {
                log::debug!(
                    "{} swapped={} axis {} mode {}: no layer generated",
                    pattern.name(),
                    swapped,
                    Axis::ALL[branch.axis_index],
                    mode
                );
                continue;
            };

            let key = branch.key(mode);
            if let Some(solution) = self.grow(ctx, key, pattern.name(), [&first, &second]) {
                solutions.push(solution);
            }
        }
        solutions
    }

    /// Grows one stack alternating `templates` by layer parity.
    fn grow(
        &self,
        ctx: &StackContext<'_>,
        key: BranchKey,
        pattern_name: &str,
        templates: [&Layer; 2],
    ) -> Option<Solution> {
        let c = &self.constraints;
        let interlayer = c.interlayer_period.zip(ctx.interlayer);
        let box_weight = ctx.box_props.weight();

        let mut builder = SolutionBuilder::new(pattern_name, key, ctx.box_props, ctx.pallet)
            .with_vertical_axis(templates[0].axis_ortho())
            .with_interlayer_weight(ctx.interlayer.map_or(0.0, |i| i.weight()))
            .with_usable_area(templates[0].footprint().area())
            .with_layer_sizes(templates[0].len(), templates[1].len());

        let mut z = ctx.pallet.base_height();
        let mut since_interlayer = 0usize;
        let mut index = 0usize;

        'grow: loop {
            let parity = index % 2;
            let template = templates[parity];

            let due = interlayer.filter(|(period, _)| since_interlayer >= *period);
            let layer_z = due.map_or(z, |(_, sheet)| z + sheet.thickness());

            if let Some(max_height) = c.maximum_height {
                if layer_z + template.box_height() >= max_height {
                    break;
                }
            }

            if let Some((_, sheet)) = due {
                builder.add_interlayer(z, sheet.thickness());
                since_interlayer = 0;
            }
            z = layer_z;
            if interlayer.is_some() {
                since_interlayer += 1;
            }

            builder.open_layer(z, template.box_height(), parity);
            for position in template {
                let next = builder.count() + 1;
                let over_weight = c
                    .maximum_weight
                    .map_or(false, |max| next as f64 * box_weight > max);
                let over_count = c.maximum_count.map_or(false, |max| next > max);
                if over_weight || over_count {
                    break 'grow;
                }
                builder.add_box(position.at_height(z));
            }

            z += template.box_height();
            index += 1;
        }

        builder.build()
    }

    fn is_interrupted(&self, start: &Instant) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        self.config.time_limit_ms > 0
            && start.elapsed().as_millis() as u64 >= self.config.time_limit_ms
    }

    fn run(
        &self,
        box_props: &BoxProperties,
        pallet: &PalletProperties,
        callback: Option<&ProgressCallback>,
    ) -> Result<SolveResult<Solution>> {
        let start = Instant::now();
        self.validate(box_props, pallet)?;

        // Reset cancellation flag
        self.cancelled.store(false, Ordering::Relaxed);

        let ctx = StackContext {
            box_props,
            pallet,
            interlayer: self.interlayer.as_ref(),
        };
        let branches = self.branches();
        let total = branches.len();
        log::debug!(
            "Stacking {}x{}x{} on {}x{}: {} branches, parallel={}",
            box_props.length(),
            box_props.width(),
            box_props.height(),
            pallet.length(),
            pallet.width(),
            total,
            self.config.parallel
        );

        let done = AtomicUsize::new(0);
        let found = AtomicUsize::new(0);
        let interrupted = AtomicBool::new(false);

        let visit = |branch: Branch| -> Option<Vec<Solution>> {
            if self.is_interrupted(&start) {
                interrupted.store(true, Ordering::Relaxed);
                return None;
            }
            let solutions = self.evaluate(&ctx, branch);
            let branches_done = done.fetch_add(1, Ordering::Relaxed) + 1;
            let solutions_found =
                found.fetch_add(solutions.len(), Ordering::Relaxed) + solutions.len();
            if let Some(cb) = callback {
                cb(ProgressInfo {
                    branches_done,
                    branches_total: total,
                    solutions_found,
                    elapsed_ms: start.elapsed().as_millis() as u64,
                    running: true,
                });
            }
            Some(solutions)
        };

        let outcomes: Vec<Option<Vec<Solution>>> = if self.config.parallel {
            branches.into_par_iter().map(visit).collect()
        } else {
            branches.into_iter().map(visit).collect()
        };

        let mut result = SolveResult::new().with_strategy(STRATEGY);
        result.branches_total = total;
        for solutions in outcomes.into_iter().flatten() {
            result.branches_evaluated += 1;
            if solutions.is_empty() {
                result.branches_empty += 1;
            }
            result.solutions.extend(solutions);
        }
        result.solutions.sort_by(Solution::cmp_rank);
        result.truncate(self.config.max_solutions);

        result.cancelled = interrupted.load(Ordering::Relaxed);
        if result.cancelled {
            log::warn!(
                "Stacking interrupted after {}/{} branches",
                result.branches_evaluated,
                total
            );
        }
        result.computation_time_ms = start.elapsed().as_millis() as u64;

        if let Some(cb) = callback {
            cb(ProgressInfo {
                branches_done: result.branches_evaluated,
                branches_total: total,
                solutions_found: result.solutions.len(),
                elapsed_ms: result.computation_time_ms,
                running: false,
            });
        }

        log::debug!(
            "Stacking done: {} solutions in {} ms",
            result.solutions.len(),
            result.computation_time_ms
        );
        Ok(result)
    }
}

impl Default for Stacker {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Solver for Stacker {
    type Geometry = BoxProperties;
    type Boundary = PalletProperties;
    type Solution = Solution;

    fn solve(
        &self,
        geometry: &Self::Geometry,
        boundary: &Self::Boundary,
    ) -> Result<SolveResult<Solution>> {
        self.run(geometry, boundary, None)
    }

    fn solve_with_progress(
        &self,
        geometry: &Self::Geometry,
        boundary: &Self::Boundary,
        callback: ProgressCallback,
    ) -> Result<SolveResult<Solution>> {
        self.run(geometry, boundary, Some(&callback))
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Mutex;
    use u_stacking_core::geometry::HalfAxis;

    fn case() -> BoxProperties {
        BoxProperties::new(400.0, 300.0, 200.0).with_weight(5.0)
    }

    fn pallet() -> PalletProperties {
        PalletProperties::new(1200.0, 800.0, 144.0)
    }

    fn column_on_z() -> ConstraintSet {
        ConstraintSet::new()
            .with_patterns(["Column"])
            .with_vertical_axes([Axis::Z])
            .with_maximum_height(1500.0)
    }

    #[test]
    fn test_column_scenario() {
        let stacker = Stacker::default_config().with_constraints(column_on_z());
        let result = stacker.solve(&case(), &pallet()).unwrap();

        assert_eq!(result.branches_total, 1);
        assert_eq!(result.solutions.len(), 4);
        assert_eq!(result.strategy.as_deref(), Some(STRATEGY));

        let best = result.best().unwrap();
        assert_eq!(best.count(), 48);
        assert_eq!(best.layer_count(), 6);
        assert_eq!(best.vertical_axis(), HalfAxis::ZNeg);
        assert_relative_eq!(best.top_z(), 1344.0);
        assert!(result.solutions.iter().all(|s| s.interlayer_count() == 0));

        let upright = result.solutions.iter().find(|s| s.key().mode == 1).unwrap();
        assert_eq!(upright.count(), 36);
        assert_eq!(upright.title(), "Column | vertical axis +Z | aligned");
    }

    #[test]
    fn test_height_cap_holds() {
        let stacker = Stacker::default_config()
            .with_constraints(ConstraintSet::new().with_maximum_height(1500.0));
        let result = stacker.solve(&case(), &pallet()).unwrap();
        assert!(result.is_successful());
        for solution in &result.solutions {
            for layer in solution.layers() {
                assert!(layer.z() + layer.height() < 1500.0);
            }
        }
    }

    #[test]
    fn test_weight_cap_truncates_layer() {
        let constraints = column_on_z()
            .with_half_axes([HalfAxis::ZPos])
            .with_aligned_layers(true)
            .with_alternate_layers(false)
            .with_maximum_weight(52.0);
        let stacker = Stacker::default_config().with_constraints(constraints);
        let result = stacker.solve(&case(), &pallet()).unwrap();
        for solution in &result.solutions {
            assert_eq!(solution.count(), 10);
            assert!(solution.load_weight() <= 52.0);
        }
    }

    #[test]
    fn test_count_cap() {
        let constraints = ConstraintSet::new().with_maximum_count(20);
        let stacker = Stacker::default_config().with_constraints(constraints);
        let result = stacker.solve(&case(), &pallet()).unwrap();
        assert!(result.is_successful());
        for solution in &result.solutions {
            assert!(solution.count() <= 20);
        }
        assert_eq!(result.best().unwrap().count(), 20);
    }

    #[test]
    fn test_interlayer_period() {
        let constraints = column_on_z().with_interlayer_period(2);
        let stacker = Stacker::default_config()
            .with_constraints(constraints)
            .with_interlayer(InterlayerProperties::new(5.0).with_weight(1.0));
        let result = stacker.solve(&case(), &pallet()).unwrap();
        for solution in &result.solutions {
            let layers = solution.layer_count();
            assert_eq!(solution.interlayer_count(), (layers - 1) / 2);
            for pair in solution.elements().windows(2) {
                assert_relative_eq!(pair[0].top(), pair[1].z(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_interlayer_period_requires_sheet() {
        let stacker =
            Stacker::default_config().with_constraints(column_on_z().with_interlayer_period(1));
        assert!(matches!(
            stacker.solve(&case(), &pallet()),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        let stacker = Stacker::default_config().with_constraints(column_on_z());
        assert!(matches!(
            stacker.solve(&BoxProperties::new(0.0, 1.0, 1.0), &pallet()),
            Err(Error::InvalidGeometry(_))
        ));
        assert!(matches!(
            stacker.solve(&case(), &PalletProperties::new(1200.0, -1.0, 0.0)),
            Err(Error::InvalidBoundary(_))
        ));

        let unbounded = Stacker::default_config().with_constraints(ConstraintSet::new());
        assert!(unbounded.solve(&case(), &pallet()).is_err());

        let weightless = Stacker::default_config()
            .with_constraints(ConstraintSet::new().with_maximum_weight(100.0));
        assert!(weightless
            .solve(&BoxProperties::new(400.0, 300.0, 200.0), &pallet())
            .is_err());

        let unknown = Stacker::default_config()
            .with_constraints(column_on_z().with_patterns(["Hexagonal"]));
        assert!(unknown.solve(&case(), &pallet()).is_err());
    }

    #[test]
    fn test_box_too_large_yields_empty_result() {
        let stacker = Stacker::default_config().with_constraints(column_on_z());
        let result = stacker
            .solve(&BoxProperties::new(1500.0, 1000.0, 100.0), &pallet())
            .unwrap();
        assert!(!result.is_successful());
        assert_eq!(result.branches_empty, result.branches_evaluated);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let constraints = ConstraintSet::new().with_maximum_height(1800.0);
        let parallel = Stacker::new(Config::default().with_parallel(true))
            .with_constraints(constraints.clone())
            .solve(&case(), &pallet())
            .unwrap();
        let sequential = Stacker::new(Config::default().with_parallel(false))
            .with_constraints(constraints)
            .solve(&case(), &pallet())
            .unwrap();

        let titles = |r: &SolveResult<Solution>| -> Vec<(String, usize)> {
            r.solutions
                .iter()
                .map(|s| (s.title().to_string(), s.count()))
                .collect()
        };
        assert_eq!(titles(&parallel), titles(&sequential));
    }

    #[test]
    fn test_ranking_is_sorted() {
        let stacker = Stacker::default_config()
            .with_constraints(ConstraintSet::new().with_maximum_height(1500.0));
        let result = stacker.solve(&case(), &pallet()).unwrap();
        for pair in result.solutions.windows(2) {
            assert_ne!(pair[0].cmp_rank(&pair[1]), std::cmp::Ordering::Greater);
        }
    }

    #[test]
    fn test_max_solutions_truncates() {
        let stacker = Stacker::new(Config::default().with_max_solutions(2))
            .with_constraints(ConstraintSet::new().with_maximum_height(1500.0));
        let result = stacker.solve(&case(), &pallet()).unwrap();
        assert_eq!(result.solutions.len(), 2);
        assert!(result.truncated > 0);
    }

    #[test]
    fn test_cancel_during_solve() {
        // The flag is reset on entry, so cancel after the first branch.
        let stacker = Stacker::new(Config::default().with_parallel(false))
            .with_constraints(ConstraintSet::new().with_maximum_height(1500.0));
        let handle = stacker.cancel_handle();
        let result = stacker
            .solve_with_progress(
                &case(),
                &pallet(),
                Box::new(move |_| handle.store(true, Ordering::Relaxed)),
            )
            .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.branches_evaluated, 1);
        assert!(result.branches_total > 1);
    }

    #[test]
    fn test_progress_reports_every_branch() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let stacker = Stacker::default_config().with_constraints(column_on_z());
        let result = stacker
            .solve_with_progress(
                &case(),
                &pallet(),
                Box::new(move |info| sink.lock().unwrap().push(info)),
            )
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), result.branches_total + 1);
        let last = seen.last().unwrap();
        assert!(!last.running);
        assert_eq!(last.solutions_found, result.solutions.len());
    }

    #[test]
    fn test_overhang_allows_wider_layers() {
        let tight = Stacker::default_config()
            .with_constraints(column_on_z().with_half_axes([HalfAxis::ZPos]));
        let loose = Stacker::default_config().with_constraints(
            column_on_z()
                .with_half_axes([HalfAxis::ZPos])
                .with_overhang(0.0, 50.0),
        );
        let box_props = BoxProperties::new(400.0, 300.0, 200.0);
        let tight = tight.solve(&box_props, &pallet()).unwrap();
        let loose = loose.solve(&box_props, &pallet()).unwrap();
        // 900 of usable width fits three rows of 300.
        assert!(loose.best().unwrap().count() > tight.best().unwrap().count());
    }
}
