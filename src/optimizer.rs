//! Request orchestration: every material is validated and packed on its own.

use rayon::prelude::*;

use crate::error::Result;
use crate::metrics;
use crate::model::{
    MaterialFailure, MaterialRequest, OptimizationResult, OptimizeRequest, OptimizeResponse,
};
use crate::solver::Solver;
use crate::validate::validate_material;

#[derive(Debug, Clone, Copy, Default)]
pub struct OptimizerConfig {
    /// Pack materials on the rayon thread pool instead of one after another.
    pub parallel: bool,
}

/// Stateless entry point; create one per request or share it freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Packs one material, or explains why it was rejected.
    pub fn optimize_material(&self, material: &MaterialRequest) -> Result<OptimizationResult> {
        tracing::debug!(
            material_id = %material.id,
            parts = material.parts.len(),
            "optimizing material"
        );
        let job = validate_material(material)?;
        let sol = Solver::new(&job).solve();
        let result = metrics::report(&material.id, &material.name, &job.demands, &sol);

        tracing::info!(
            material_id = %material.id,
            boards = result.metrics.boards_used,
            placed = result.metrics.placed_count,
            unplaced = result.metrics.unplaced_count,
            waste_pct = result.metrics.waste_pct,
            "material optimized"
        );
        Ok(result)
    }

    /// Packs every material. Rejected materials are listed under `errors`
    /// and do not affect the others; `results` keeps request order.
    pub fn optimize(&self, request: &OptimizeRequest) -> OptimizeResponse {
        let outcomes: Vec<(&MaterialRequest, Result<OptimizationResult>)> = if self.config.parallel
        {
            request
                .materials
                .par_iter()
                .map(|m| (m, self.optimize_material(m)))
                .collect()
        } else {
            request
                .materials
                .iter()
                .map(|m| (m, self.optimize_material(m)))
                .collect()
        };

        let mut response = OptimizeResponse::default();
        for (material, outcome) in outcomes {
            match outcome {
                Ok(result) => response.results.push(result),
                Err(e) => {
                    tracing::warn!(material_id = %material.id, error = %e, "material rejected");
                    response.errors.push(MaterialFailure {
                        material_id: material.id.clone(),
                        material_name: material.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        response
    }
}

/// Sequential optimisation with the default configuration.
pub fn optimize(request: &OptimizeRequest) -> OptimizeResponse {
    Optimizer::default().optimize(request)
}
