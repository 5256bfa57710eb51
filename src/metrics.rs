//! Aggregates a solution into the reported metrics and output records.

use std::collections::BTreeMap;

use crate::model::{DebugInfo, Metrics, OptimizationResult, PlacementOut, UnplacedPart};
use crate::solver::Solution;
use crate::types::{Demand, UNITS_PER_MM, area_to_mm2, units_to_mm};

/// `round((1 - used / board) * 100, 2)`, or 0 when no board was opened.
pub fn waste_pct(used_area: u64, board_area: u64) -> f64 {
    if board_area == 0 {
        return 0.0;
    }
    let pct = (1.0 - used_area as f64 / board_area as f64) * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Cut length per board: its trim cuts plus every split made on it.
pub fn board_cut_lengths(sol: &Solution) -> BTreeMap<usize, u64> {
    let trim = sol.sheet.trim_cut_length();
    sol.bins
        .iter()
        .map(|bin| (bin.id(), trim + bin.cut_length()))
        .collect()
}

pub fn metrics(sol: &Solution) -> Metrics {
    let board_area: u64 = sol.bins.iter().map(|b| b.usable().area()).sum();
    let used_area: u64 = sol.bins.iter().map(|b| b.used_area()).sum();
    let total_cut: u64 = board_cut_lengths(sol).values().sum();

    Metrics {
        used_area_mm2: area_to_mm2(used_area),
        board_area_mm2: area_to_mm2(board_area),
        waste_pct: waste_pct(used_area, board_area),
        placed_count: sol.placements.len(),
        unplaced_count: sol.unplaced.len(),
        boards_used: sol.sheet_count(),
        total_cut_length_mm: total_cut as f64 / UNITS_PER_MM,
    }
}

pub fn debug_info(sol: &Solution) -> DebugInfo {
    let usable = sol.sheet.usable();
    DebugInfo {
        board_width: units_to_mm(sol.sheet.size.w),
        board_height: units_to_mm(sol.sheet.size.h),
        usable_width: units_to_mm(usable.w),
        usable_height: units_to_mm(usable.h),
        bins_count: sol.sheet_count(),
        panels_count: sol.panels_count(),
    }
}

/// Builds the response record, translating placements back to board
/// coordinates (trim offsets added).
pub fn report(
    material_id: &str,
    material_name: &str,
    demands: &[Demand],
    sol: &Solution,
) -> OptimizationResult {
    let trim = sol.sheet.trim;
    let placements = sol
        .placements
        .iter()
        .map(|p| PlacementOut {
            id: demands[p.part].id.clone(),
            x_mm: units_to_mm(p.x + trim.left),
            y_mm: units_to_mm(p.y + trim.top),
            w_mm: units_to_mm(p.rect.w),
            h_mm: units_to_mm(p.rect.h),
            rot_deg: if p.rotated { 90 } else { 0 },
            board_id: p.board_id,
        })
        .collect();

    let unplaced = sol
        .unplaced
        .iter()
        .map(|u| UnplacedPart {
            id: demands[u.part].id.clone(),
            w_mm: units_to_mm(u.rect.w),
            h_mm: units_to_mm(u.rect.h),
            reason: Some(u.reason),
        })
        .collect();

    OptimizationResult {
        material_id: material_id.to_string(),
        material_name: material_name.to_string(),
        placements,
        unplaced,
        metrics: metrics(sol),
        board_cut_lengths: board_cut_lengths(sol)
            .into_iter()
            .map(|(id, len)| (id, len as f64 / UNITS_PER_MM))
            .collect(),
        debug: debug_info(sol),
    }
}
