//! 2D rectangular cutting-stock optimizer.
//!
//! Packs rectangular parts onto trimmed boards with guillotine cuts, a saw
//! kerf, and per-part rotation and grain constraints. Each material in an
//! [`OptimizeRequest`] is packed independently:
//!
//! ```
//! use opti::model::OptimizeRequest;
//!
//! let request: OptimizeRequest = serde_json::from_str(r#"{
//!     "materials": [{
//!         "id": "m1", "name": "Birch 18",
//!         "parts": [{ "id": "side", "w_mm": 600, "h_mm": 400, "qty": 2 }],
//!         "board": { "w_mm": 2800, "h_mm": 2070 },
//!         "params": { "kerf_mm": 3 }
//!     }]
//! }"#).unwrap();
//! let response = opti::optimize(&request);
//! assert_eq!(response.results[0].placements.len(), 2);
//! ```

pub mod allocator;
pub mod config;
pub mod error;
pub mod expand;
pub mod guillotine;
pub mod metrics;
pub mod model;
pub mod optimizer;
pub mod render;
pub mod solver;
pub mod types;
pub mod validate;

pub use error::{OptimizeError, Result};
pub use model::{OptimizationResult, OptimizeRequest, OptimizeResponse};
pub use optimizer::{Optimizer, OptimizerConfig, optimize};
