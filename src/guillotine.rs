use serde::{Deserialize, Serialize};

use crate::types::{FreeRect, Placement, Rect};

/// One opened board: its free regions, placements and cut length so far.
#[derive(Debug, Clone)]
pub struct GuillotineBin {
    id: usize,
    usable: Rect,
    kerf: u32,
    pub free_rects: Vec<FreeRect>,
    pub placements: Vec<Placement>,
    cut_length: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(clippy::enum_variant_names)]
pub enum ScoreStrategy {
    #[default]
    BestAreaFit,
    BestShortSideFit,
    BestLongSideFit,
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredPlacement {
    pub free_idx: usize,
    pub rotated: bool,
    pub score: (u64, u64),
}

impl GuillotineBin {
    pub fn new(id: usize, usable: Rect, kerf: u32) -> Self {
        Self {
            id,
            usable,
            kerf,
            free_rects: vec![FreeRect {
                x: 0,
                y: 0,
                rect: usable,
            }],
            placements: Vec::new(),
            cut_length: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn usable(&self) -> Rect {
        self.usable
    }

    /// Sum of split cut lengths on this board, trim cuts excluded.
    pub fn cut_length(&self) -> u64 {
        self.cut_length
    }

    pub fn used_area(&self) -> u64 {
        self.placements.iter().map(|p| p.rect.area()).sum()
    }

    pub fn find_best(
        &self,
        piece: Rect,
        allow_rotate: bool,
        score_strategy: ScoreStrategy,
    ) -> Option<ScoredPlacement> {
        let mut best: Option<ScoredPlacement> = None;
        let try_rotated = allow_rotate && !piece.is_square();

        for (idx, free) in self.free_rects.iter().enumerate() {
            if free.rect.is_empty() {
                tracing::error!(
                    board_id = self.id,
                    x = free.x,
                    y = free.y,
                    w = free.rect.w,
                    h = free.rect.h,
                    "degenerate free rectangle reached the fit test, skipping"
                );
                continue;
            }

            let mut orientations = [Some((piece, false)), None];
            if try_rotated {
                orientations[1] = Some((piece.rotated(), true));
            }

            for (candidate, rotated) in orientations.into_iter().flatten() {
                if !candidate.fits_in(&free.rect) {
                    continue;
                }
                let score = Self::score(candidate, free.rect, score_strategy);
                if best.is_none_or(|b| score < b.score) {
                    best = Some(ScoredPlacement {
                        free_idx: idx,
                        rotated,
                        score,
                    });
                }
            }
        }

        best
    }

    /// Lower is better. Only called with `piece` fitting inside `free`.
    fn score(piece: Rect, free: Rect, strategy: ScoreStrategy) -> (u64, u64) {
        let dw = (free.w - piece.w) as u64;
        let dh = (free.h - piece.h) as u64;
        let short = dw.min(dh);
        let long = dw.max(dh);
        match strategy {
            ScoreStrategy::BestAreaFit => (free.area() - piece.area(), short),
            ScoreStrategy::BestShortSideFit => (short, long),
            ScoreStrategy::BestLongSideFit => (long, short),
        }
    }

    pub fn place(&mut self, scored: ScoredPlacement, piece: Rect, part: usize) -> Placement {
        let free = self.free_rects[scored.free_idx];
        let placed = if scored.rotated {
            piece.rotated()
        } else {
            piece
        };

        let placement = Placement {
            part,
            board_id: self.id,
            rect: placed,
            x: free.x,
            y: free.y,
            rotated: scored.rotated,
        };

        self.free_rects.swap_remove(scored.free_idx);
        let first_new = self.free_rects.len();
        self.cut_length += self.split(free, placed);
        self.placements.push(placement);
        self.prune_contained(first_new);

        placement
    }

    /// Splits `free` around a part placed at its top-left corner and returns
    /// the length of the cuts this introduces.
    ///
    /// The first cut crosses the whole free rectangle; the remainder beyond it
    /// keeps the full extent, the other one is bounded by the part.
    fn split(&mut self, free: FreeRect, placed: Rect) -> u64 {
        let right_w = free.rect.w.saturating_sub(placed.w.saturating_add(self.kerf));
        let bottom_h = free.rect.h.saturating_sub(placed.h.saturating_add(self.kerf));
        let cut_right = placed.w < free.rect.w;
        let cut_below = placed.h < free.rect.h;

        // Cut along the shorter leftover axis first
        let horizontal_first = match (right_w > 0, bottom_h > 0) {
            (true, true) => free.rect.w - placed.w < free.rect.h - placed.h,
            (false, true) => true,
            _ => false,
        };

        let (right, bottom, cut) = if horizontal_first {
            (
                Rect::new(right_w, placed.h),
                Rect::new(free.rect.w, bottom_h),
                cut_below as u64 * free.rect.w as u64 + cut_right as u64 * placed.h as u64,
            )
        } else {
            (
                Rect::new(right_w, free.rect.h),
                Rect::new(placed.w, bottom_h),
                cut_right as u64 * free.rect.h as u64 + cut_below as u64 * placed.w as u64,
            )
        };

        if !right.is_empty() {
            self.free_rects.push(FreeRect {
                x: free.x + placed.w + self.kerf,
                y: free.y,
                rect: right,
            });
        }
        if !bottom.is_empty() {
            self.free_rects.push(FreeRect {
                x: free.x,
                y: free.y + placed.h + self.kerf,
                rect: bottom,
            });
        }

        cut
    }

    /// Drops free rectangles fully contained in another one, keeping the larger.
    ///
    /// Only the rectangles from `first_new` on were just added; the older ones
    /// are already pairwise non-contained, so each is checked against the
    /// new ones only.
    fn prune_contained(&mut self, first_new: usize) {
        let fresh = self.free_rects.split_off(first_new);
        self.free_rects
            .retain(|old| !fresh.iter().any(|new| new.contains(old)));
        for new in fresh {
            if !self.free_rects.iter().any(|r| r.contains(&new)) {
                self.free_rects.push(new);
            }
        }
    }
}
