//! Boundary validation: converts a request material into a packing job.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::{OptimizeError, Result};
use crate::guillotine::ScoreStrategy;
use crate::model::{BoardRequest, MaterialRequest, ParamsRequest, PartRequest};
use crate::types::{Demand, Rect, Sheet, Trim, mm_to_units, units_to_mm};

/// Upper bound on unit requests expanded from one material.
pub const MAX_UNIT_REQUESTS: u64 = 100_000;

/// Cutting parameters in internal units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Params {
    pub kerf: u32,
    pub seed: Option<u64>,
    pub strategy: ScoreStrategy,
    pub time_limit: Option<Duration>,
}

/// Everything the solver needs for one material.
#[derive(Debug, Clone)]
pub struct Job {
    pub sheet: Sheet,
    pub params: Params,
    pub demands: Vec<Demand>,
}

impl Job {
    pub fn unit_count(&self) -> u64 {
        self.demands.iter().map(|d| d.qty as u64).sum()
    }
}

pub fn validate_material(material: &MaterialRequest) -> Result<Job> {
    let board = material.board.as_ref().ok_or(OptimizeError::MissingBoard)?;
    let sheet = validate_board(board)?;
    let params = validate_params(&material.params)?;

    let mut seen = HashSet::new();
    let mut demands = Vec::with_capacity(material.parts.len());
    for part in &material.parts {
        if !seen.insert(part.id.as_str()) {
            return Err(OptimizeError::DuplicatePartId(part.id.clone()));
        }
        demands.push(validate_part(part)?);
    }

    let job = Job {
        sheet,
        params,
        demands,
    };
    let total = job.unit_count();
    if total > MAX_UNIT_REQUESTS {
        return Err(OptimizeError::TooManyUnits {
            total,
            limit: MAX_UNIT_REQUESTS,
        });
    }
    Ok(job)
}

fn positive(value: f64) -> Option<u32> {
    mm_to_units(value).filter(|&u| u > 0)
}

/// Largest quantity a single part line may ask for.
const MAX_QTY: f64 = u32::MAX as f64;

fn validate_board(board: &BoardRequest) -> Result<Sheet> {
    let dim = |field: &'static str, value: Option<f64>| {
        let value = value.ok_or(OptimizeError::MissingBoardField(field))?;
        positive(value).ok_or(OptimizeError::InvalidBoard { field, value })
    };
    let margin = |field: &'static str, value: f64| {
        mm_to_units(value).ok_or(OptimizeError::InvalidBoard { field, value })
    };

    let w_units = dim("w_mm", board.w_mm)?;
    let h_units = dim("h_mm", board.h_mm)?;
    let sheet = Sheet {
        size: Rect::new(w_units, h_units),
        trim: Trim {
            top: margin("trim_top_mm", board.trim_top_mm)?,
            right: margin("trim_right_mm", board.trim_right_mm)?,
            bottom: margin("trim_bottom_mm", board.trim_bottom_mm)?,
            left: margin("trim_left_mm", board.trim_left_mm)?,
        },
    };

    let usable = sheet.usable();
    if usable.is_empty() {
        return Err(OptimizeError::UnusableBoard {
            usable_width: units_to_mm(w_units) - board.trim_left_mm - board.trim_right_mm,
            usable_height: units_to_mm(h_units) - board.trim_top_mm - board.trim_bottom_mm,
        });
    }
    Ok(sheet)
}

fn validate_params(params: &ParamsRequest) -> Result<Params> {
    let kerf = mm_to_units(params.kerf_mm).ok_or(OptimizeError::InvalidKerf(params.kerf_mm))?;
    Ok(Params {
        kerf,
        seed: params.seed,
        strategy: params.heuristic.unwrap_or_default(),
        time_limit: params.time_limit_ms.map(Duration::from_millis),
    })
}

fn validate_part(part: &PartRequest) -> Result<Demand> {
    let present = |field: &'static str, value: Option<f64>| {
        value.ok_or_else(|| OptimizeError::MissingPartField {
            id: part.id.clone(),
            field,
        })
    };
    let dim = |field: &'static str, value: Option<f64>| {
        let value = present(field, value)?;
        positive(value).ok_or_else(|| OptimizeError::InvalidPart {
            id: part.id.clone(),
            field,
            value,
        })
    };
    let rect = Rect::new(dim("w_mm", part.w_mm)?, dim("h_mm", part.h_mm)?);

    let qty = present("qty", part.qty)?;
    if !(qty.fract() == 0.0 && (1.0..=MAX_QTY).contains(&qty)) {
        return Err(OptimizeError::InvalidQuantity {
            id: part.id.clone(),
            qty,
        });
    }

    Ok(Demand {
        id: part.id.clone(),
        rect,
        qty: qty as u32,
        allow_rotate: part.allow_rot_90,
        grain_locked: part.grain_locked,
    })
}
