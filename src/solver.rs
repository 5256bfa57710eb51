use std::time::Instant;

use crate::allocator::BoardAllocator;
use crate::expand::expand_demands;
use crate::guillotine::GuillotineBin;
use crate::model::UnplacedReason;
use crate::types::{Placement, Rect, Sheet};
use crate::validate::Job;

/// A part copy that could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unplaced {
    pub part: usize,
    pub rect: Rect,
    pub reason: UnplacedReason,
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub sheet: Sheet,
    /// Opened boards, indexed by board id.
    pub bins: Vec<GuillotineBin>,
    /// All placements in the order they were made.
    pub placements: Vec<Placement>,
    pub unplaced: Vec<Unplaced>,
}

impl Solution {
    pub fn sheet_count(&self) -> usize {
        self.bins.len()
    }

    pub fn panels_count(&self) -> usize {
        self.placements.len() + self.unplaced.len()
    }
}

/// Packs one material: expand, sort, then place unit requests one at a time.
pub struct Solver<'a> {
    job: &'a Job,
}

impl<'a> Solver<'a> {
    pub fn new(job: &'a Job) -> Self {
        Self { job }
    }

    pub fn solve(&self) -> Solution {
        let params = &self.job.params;
        let pieces = expand_demands(&self.job.demands, params.seed);
        let deadline = params.time_limit.map(|limit| Instant::now() + limit);

        let mut alloc = BoardAllocator::new(self.job.sheet.usable(), params.kerf, params.strategy);
        let mut placements = Vec::with_capacity(pieces.len());
        let mut unplaced = Vec::new();

        for (i, unit) in pieces.iter().enumerate() {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                tracing::warn!(
                    remaining = pieces.len() - i,
                    "time limit reached, leaving remaining parts unplaced"
                );
                unplaced.extend(pieces[i..].iter().map(|u| Unplaced {
                    part: u.part,
                    rect: u.rect,
                    reason: UnplacedReason::Timeout,
                }));
                break;
            }

            match alloc.place(unit) {
                Some(placement) => placements.push(placement),
                None => {
                    tracing::warn!(
                        part = %self.job.demands[unit.part].id,
                        size = %unit.rect,
                        usable = %self.job.sheet.usable(),
                        "part exceeds board dimensions"
                    );
                    unplaced.push(Unplaced {
                        part: unit.part,
                        rect: unit.rect,
                        reason: UnplacedReason::ExceedsBoard,
                    });
                }
            }
        }

        Solution {
            sheet: self.job.sheet,
            bins: alloc.into_bins(),
            placements,
            unplaced,
        }
    }
}
