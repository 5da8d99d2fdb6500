//! Spiral (pinwheel) patterns.
//!
//! Four blocks turn around a central hole with half-turn symmetry:
//!
//! ```text
//!  +-----+-----------+
//!  |  D  |     C     |
//!  |     +-----+-----+
//!  +-----+ hole|     |
//!  |     +-----+  B  |
//!  |  A        |     |
//!  +-----------+-----+
//! ```
//!
//! A and C hold unturned boxes, B and D turned ones. C mirrors A and D
//! mirrors B, so a configuration is fixed by the column/row counts of A and
//! B.

use super::{fit_count, push_grid, LayerPattern, Slot, EPS};
use crate::layer::PatternFrame;

/// Column grid filling the central hole.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HoleFill {
    cols: usize,
    rows: usize,
    turned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pinwheel {
    /// Columns and rows of block A.
    nx: usize,
    ny: usize,
    /// Columns and rows of block B.
    mx: usize,
    my: usize,
    box_length: f64,
    box_width: f64,
    hole: Option<HoleFill>,
}

impl Pinwheel {
    fn a(&self) -> f64 {
        self.nx as f64 * self.box_length
    }

    fn b(&self) -> f64 {
        self.ny as f64 * self.box_width
    }

    fn e(&self) -> f64 {
        self.mx as f64 * self.box_width
    }

    fn c(&self) -> f64 {
        self.my as f64 * self.box_length
    }

    fn length(&self) -> f64 {
        self.a() + self.e()
    }

    fn width(&self) -> f64 {
        self.b() + self.c()
    }

    fn area(&self) -> f64 {
        self.length() * self.width()
    }

    /// Returns true if no two blocks overlap.
    fn is_valid(&self) -> bool {
        let (a, b, c, e) = (self.a(), self.b(), self.c(), self.e());
        let a_meets_c = e < a - EPS && c < b - EPS;
        let b_meets_d = a < e - EPS && b < c - EPS;
        !a_meets_c && !b_meets_d
    }

    /// Returns the hole rectangle as (x, y, length, width).
    fn hole_rect(&self) -> (f64, f64, f64, f64) {
        let (a, b, c, e) = (self.a(), self.b(), self.c(), self.e());
        (a.min(e), b.min(c), (a - e).abs(), (b - c).abs())
    }

    fn fill_hole(&mut self) {
        let (_, _, hx, hy) = self.hole_rect();
        let unturned = (
            fit_count(hx, self.box_length),
            fit_count(hy, self.box_width),
        );
        let turned = (
            fit_count(hx, self.box_width),
            fit_count(hy, self.box_length),
        );
        let fill = if turned.0 * turned.1 > unturned.0 * unturned.1 {
            HoleFill {
                cols: turned.0,
                rows: turned.1,
                turned: true,
            }
        } else {
            HoleFill {
                cols: unturned.0,
                rows: unturned.1,
                turned: false,
            }
        };
        self.hole = (fill.cols * fill.rows > 0).then_some(fill);
    }

    fn count(&self) -> usize {
        let hole = self.hole.map_or(0, |h| h.cols * h.rows);
        2 * (self.nx * self.ny + self.mx * self.my) + hole
    }

    /// More boxes first, then the smaller bounding area.
    fn beats(&self, other: &Self) -> bool {
        match self.count().cmp(&other.count()) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => self.area() < other.area() - EPS,
        }
    }

    /// Enumerates the configurations fitting `frame` and returns the best.
    ///
    /// For each size of block A, one of block B's dimensions is taken as
    /// large as possible and the other ranges over the values keeping the
    /// blocks apart.
    fn best(frame: &PatternFrame, with_hole: bool) -> Option<Self> {
        let (bl, bw) = (frame.box_length, frame.box_width);
        let mut best: Option<Self> = None;

        let mut consider = |mut candidate: Self| {
            if !candidate.is_valid() {
                return;
            }
            if with_hole {
                candidate.fill_hole();
            }
            if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                best = Some(candidate);
            }
        };

        for nx in 1..=fit_count(frame.length, bl) {
            let a = nx as f64 * bl;
            let mx_max = fit_count(frame.length - a, bw);
            if mx_max == 0 {
                continue;
            }
            for ny in 1..=fit_count(frame.width, bw) {
                let b = ny as f64 * bw;
                let my_max = fit_count(frame.width - b, bl);
                if my_max == 0 {
                    continue;
                }
                let base = Pinwheel {
                    nx,
                    ny,
                    mx: mx_max,
                    my: my_max,
                    box_length: bl,
                    box_width: bw,
                    hole: None,
                };

                // B spans at least A's length and stays below A's top.
                if mx_max as f64 * bw >= a - EPS {
                    for my in 1..=my_max.min(fit_count(b, bl)) {
                        consider(Pinwheel { my, ..base });
                    }
                }
                // B reaches at least A's top and stays within A's length.
                if my_max as f64 * bl >= b - EPS {
                    for mx in 1..=mx_max.min(fit_count(a, bw)) {
                        consider(Pinwheel { mx, ..base });
                    }
                }
            }
        }
        best
    }

    fn slots(&self, length: f64, width: f64) -> Vec<Slot> {
        let (bl, bw) = (self.box_length, self.box_width);
        let (a, b, c, e) = (self.a(), self.b(), self.c(), self.e());
        let ox = 0.5 * (length - self.length()).max(0.0);
        let oy = 0.5 * (width - self.width()).max(0.0);

        let mut slots = Vec::with_capacity(self.count());
        push_grid(&mut slots, (ox, oy), (self.nx, self.ny), (bl, bw), false);
        push_grid(&mut slots, (ox + a, oy), (self.mx, self.my), (bw, bl), true);
        push_grid(&mut slots, (ox + e, oy + c), (self.nx, self.ny), (bl, bw), false);
        push_grid(&mut slots, (ox, oy + b), (self.mx, self.my), (bw, bl), true);

        if let Some(fill) = self.hole {
            let (hx, hy, hl, hw) = self.hole_rect();
            let (pl, pw) = if fill.turned { (bw, bl) } else { (bl, bw) };
            let x0 = ox + hx + 0.5 * (hl - fill.cols as f64 * pl);
            let y0 = oy + hy + 0.5 * (hw - fill.rows as f64 * pw);
            push_grid(&mut slots, (x0, y0), (fill.cols, fill.rows), (pl, pw), fill.turned);
        }
        slots
    }
}

fn pinwheel_slots(frame: &PatternFrame, length: f64, width: f64, with_hole: bool) -> Vec<Slot> {
    let target = PatternFrame {
        length,
        width,
        ..*frame
    };
    Pinwheel::best(&target, with_hole)
        .map(|p| p.slots(length, width))
        .unwrap_or_default()
}

/// Pinwheel of four blocks around an empty hole.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpiralPattern;

impl LayerPattern for SpiralPattern {
    fn name(&self) -> &'static str {
        "Spiral"
    }

    fn can_be_swapped(&self) -> bool {
        true
    }

    fn dimensions(&self, frame: &PatternFrame) -> Option<(f64, f64)> {
        Pinwheel::best(frame, false).map(|p| (p.length(), p.width()))
    }

    fn slots(&self, frame: &PatternFrame, length: f64, width: f64) -> Vec<Slot> {
        pinwheel_slots(frame, length, width, false)
    }
}

/// Pinwheel whose central hole is filled with a column grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnlargedSpiralPattern;

impl LayerPattern for EnlargedSpiralPattern {
    fn name(&self) -> &'static str {
        "EnlargedSpiral"
    }

    fn can_be_swapped(&self) -> bool {
        true
    }

    fn dimensions(&self, frame: &PatternFrame) -> Option<(f64, f64)> {
        Pinwheel::best(frame, true).map(|p| (p.length(), p.width()))
    }

    fn slots(&self, frame: &PatternFrame, length: f64, width: f64) -> Vec<Slot> {
        pinwheel_slots(frame, length, width, true)
    }
}
