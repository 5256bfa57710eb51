//! Request and response schema.
//!
//! All lengths are millimetres. Validation into internal units happens in
//! [`crate::validate`]. Fields a material cannot do without are optional
//! here so that one malformed material is rejected on its own instead of
//! failing the whole request.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::guillotine::ScoreStrategy;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub materials: Vec<MaterialRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRequest {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parts: Vec<PartRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardRequest>,
    #[serde(default)]
    pub params: ParamsRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartRequest {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub w_mm: Option<f64>,
    #[serde(default)]
    pub h_mm: Option<f64>,
    /// Any JSON number; whole positive values are enforced by validation.
    #[serde(default)]
    pub qty: Option<f64>,
    #[serde(default = "default_true")]
    pub allow_rot_90: bool,
    #[serde(default)]
    pub grain_locked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardRequest {
    #[serde(default)]
    pub w_mm: Option<f64>,
    #[serde(default)]
    pub h_mm: Option<f64>,
    #[serde(default)]
    pub trim_top_mm: f64,
    #[serde(default)]
    pub trim_right_mm: f64,
    #[serde(default)]
    pub trim_bottom_mm: f64,
    #[serde(default)]
    pub trim_left_mm: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamsRequest {
    #[serde(default)]
    pub kerf_mm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heuristic: Option<ScoreStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_ms: Option<u64>,
}

fn default_true() -> bool {
    true
}

/// Ids may be sent as strings or integers.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub results: Vec<OptimizationResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<MaterialFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub material_id: String,
    pub material_name: String,
    pub placements: Vec<PlacementOut>,
    pub unplaced: Vec<UnplacedPart>,
    pub metrics: Metrics,
    pub board_cut_lengths: BTreeMap<usize, f64>,
    pub debug: DebugInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementOut {
    pub id: String,
    pub x_mm: f64,
    pub y_mm: f64,
    pub w_mm: f64,
    pub h_mm: f64,
    pub rot_deg: u16,
    pub board_id: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnplacedReason {
    #[serde(rename = "exceeds board dimensions")]
    ExceedsBoard,
    #[serde(rename = "timeout")]
    Timeout,
}

impl std::fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnplacedReason::ExceedsBoard => write!(f, "exceeds board dimensions"),
            UnplacedReason::Timeout => write!(f, "timeout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnplacedPart {
    pub id: String,
    pub w_mm: f64,
    pub h_mm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnplacedReason>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub used_area_mm2: f64,
    pub board_area_mm2: f64,
    pub waste_pct: f64,
    pub placed_count: usize,
    pub unplaced_count: usize,
    pub boards_used: usize,
    pub total_cut_length_mm: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    pub board_width: f64,
    pub board_height: f64,
    pub usable_width: f64,
    pub usable_height: f64,
    pub bins_count: usize,
    pub panels_count: usize,
}

/// A material rejected at validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialFailure {
    pub material_id: String,
    pub material_name: String,
    pub error: String,
}
