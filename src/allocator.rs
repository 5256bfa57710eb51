//! Places unit requests across board instances, opening boards on demand.

use crate::expand::UnitRequest;
use crate::guillotine::{GuillotineBin, ScoreStrategy, ScoredPlacement};
use crate::types::{Placement, Rect};

#[derive(Debug, Clone)]
pub struct BoardAllocator {
    usable: Rect,
    kerf: u32,
    strategy: ScoreStrategy,
    bins: Vec<GuillotineBin>,
}

impl BoardAllocator {
    pub fn new(usable: Rect, kerf: u32, strategy: ScoreStrategy) -> Self {
        Self {
            usable,
            kerf,
            strategy,
            bins: Vec::new(),
        }
    }

    /// Whether the unit fits an empty board in an allowed orientation.
    pub fn fits_board(&self, unit: &UnitRequest) -> bool {
        unit.rect.fits_in(&self.usable)
            || (unit.allow_rotate && unit.rect.rotated().fits_in(&self.usable))
    }

    /// Places the unit on the best open board, or on a newly opened one.
    ///
    /// Returns `None` when the unit does not fit even an empty board; no board
    /// is opened in that case.
    pub fn place(&mut self, unit: &UnitRequest) -> Option<Placement> {
        if !self.fits_board(unit) {
            return None;
        }

        let mut best: Option<(usize, ScoredPlacement)> = None;
        for (bi, bin) in self.bins.iter().enumerate() {
            if let Some(scored) = bin.find_best(unit.rect, unit.allow_rotate, self.strategy)
                && best.is_none_or(|(_, b)| scored.score < b.score)
            {
                best = Some((bi, scored));
            }
        }

        if let Some((bi, scored)) = best {
            return Some(self.bins[bi].place(scored, unit.rect, unit.part));
        }

        let id = self.bins.len();
        let mut bin = GuillotineBin::new(id, self.usable, self.kerf);
        let scored = bin.find_best(unit.rect, unit.allow_rotate, self.strategy)?;
        tracing::debug!(board_id = id, "opened board");
        let placement = bin.place(scored, unit.rect, unit.part);
        self.bins.push(bin);
        Some(placement)
    }

    pub fn bins(&self) -> &[GuillotineBin] {
        &self.bins
    }

    pub fn into_bins(self) -> Vec<GuillotineBin> {
        self.bins
    }
}
