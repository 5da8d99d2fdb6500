//! Interlocked pattern.

use super::{fit_count, push_grid, LayerPattern, Slot};
use crate::layer::PatternFrame;

/// A block of unturned columns followed along X by a block of turned
/// columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterlockedPattern;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Blocks {
    unturned_cols: usize,
    unturned_rows: usize,
    turned_cols: usize,
    turned_rows: usize,
}

impl Blocks {
    fn count(&self) -> usize {
        self.unturned_cols * self.unturned_rows + self.turned_cols * self.turned_rows
    }

    /// Picks the split with the most boxes; ties keep more unturned columns.
    fn best(frame: &PatternFrame) -> Option<Self> {
        let (bl, bw) = (frame.box_length, frame.box_width);
        let unturned_rows = fit_count(frame.width, bw);
        let turned_rows = fit_count(frame.width, bl);
        if unturned_rows == 0 || turned_rows == 0 {
            return None;
        }

        let mut best: Option<Self> = None;
        for n1 in (1..=fit_count(frame.length, bl)).rev() {
            let remaining = frame.length - n1 as f64 * bl;
            let n2 = fit_count(remaining, bw);
            if n2 == 0 {
                continue;
            }
            let candidate = Self {
                unturned_cols: n1,
                unturned_rows,
                turned_cols: n2,
                turned_rows,
            };
            if best.map_or(true, |b| candidate.count() > b.count()) {
                best = Some(candidate);
            }
        }
        best
    }

    fn extent(&self, bl: f64, bw: f64) -> (f64, f64) {
        (
            self.unturned_cols as f64 * bl + self.turned_cols as f64 * bw,
            (self.unturned_rows as f64 * bw).max(self.turned_rows as f64 * bl),
        )
    }
}

impl LayerPattern for InterlockedPattern {
    fn name(&self) -> &'static str {
        "Interlocked"
    }

    fn can_be_swapped(&self) -> bool {
        true
    }

    fn dimensions(&self, frame: &PatternFrame) -> Option<(f64, f64)> {
        Blocks::best(frame).map(|b| b.extent(frame.box_length, frame.box_width))
    }

    fn slots(&self, frame: &PatternFrame, length: f64, width: f64) -> Vec<Slot> {
        let target = PatternFrame {
            length,
            width,
            ..*frame
        };
        let Some(blocks) = Blocks::best(&target) else {
            return Vec::new();
        };
        let (bl, bw) = (frame.box_length, frame.box_width);
        let (used, _) = blocks.extent(bl, bw);
        let gap = (length - used).max(0.0);

        let mut slots = Vec::with_capacity(blocks.count());
        push_grid(
            &mut slots,
            (0.0, 0.5 * (width - blocks.unturned_rows as f64 * bw)),
            (blocks.unturned_cols, blocks.unturned_rows),
            (bl, bw),
            false,
        );
        push_grid(
            &mut slots,
            (
                blocks.unturned_cols as f64 * bl + gap,
                0.5 * (width - blocks.turned_rows as f64 * bl),
            ),
            (blocks.turned_cols, blocks.turned_rows),
            (bw, bl),
            true,
        );
        slots
    }
}
