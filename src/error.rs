//! Validation failures for a single material.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OptimizeError>;

/// Reasons a material is rejected before packing starts.
///
/// Unplaceable parts are not errors; they are reported in the result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    #[error("material has no board")]
    MissingBoard,

    #[error("board {0} is missing")]
    MissingBoardField(&'static str),

    #[error("invalid board {field}: {value} (must be a positive finite number of mm)")]
    InvalidBoard { field: &'static str, value: f64 },

    #[error("board trims leave no usable area ({usable_width}x{usable_height} mm)")]
    UnusableBoard {
        usable_width: f64,
        usable_height: f64,
    },

    #[error("part {id}: invalid {field}: {value} (must be a positive finite number of mm)")]
    InvalidPart {
        id: String,
        field: &'static str,
        value: f64,
    },

    #[error("part {id}: {field} is missing")]
    MissingPartField { id: String, field: &'static str },

    #[error("part {id}: quantity must be a positive whole number, got {qty}")]
    InvalidQuantity { id: String, qty: f64 },

    #[error("part id {0} appears more than once")]
    DuplicatePartId(String),

    #[error("invalid kerf: {0} (must be a non-negative finite number of mm)")]
    InvalidKerf(f64),

    #[error("material expands to {total} unit requests, limit is {limit}")]
    TooManyUnits { total: u64, limit: u64 },
}
