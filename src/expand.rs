//! Expands part lines into individual unit requests in placement order.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::types::{Demand, Rect};

/// One copy of a part waiting to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitRequest {
    /// Index of the originating [`Demand`].
    pub part: usize,
    pub rect: Rect,
    /// Already false when the part is grain locked.
    pub allow_rotate: bool,
}

fn rank(rect: Rect) -> (u64, u32) {
    (rect.area(), rect.w.max(rect.h))
}

/// Largest area first, then longest side, then list position.
///
/// With a seed, part lines of equal rank are shuffled deterministically
/// instead of keeping their list position. Copies of one part stay together.
/// The shuffle uses ChaCha8 so a seed gives the same order across `rand`
/// releases.
pub fn expand_demands(demands: &[Demand], seed: Option<u64>) -> Vec<UnitRequest> {
    let mut order: Vec<usize> = (0..demands.len()).collect();
    order.sort_by(|&a, &b| rank(demands[b].rect).cmp(&rank(demands[a].rect)));

    if let Some(seed) = seed {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for group in order.chunk_by_mut(|&a, &b| rank(demands[a].rect) == rank(demands[b].rect)) {
            group.shuffle(&mut rng);
        }
    }

    let total: usize = demands.iter().map(|d| d.qty as usize).sum();
    let mut pieces = Vec::with_capacity(total);
    for idx in order {
        let d = &demands[idx];
        let unit = UnitRequest {
            part: idx,
            rect: d.rect,
            allow_rotate: d.can_rotate(),
        };
        pieces.extend(std::iter::repeat_n(unit, d.qty as usize));
    }
    pieces
}
