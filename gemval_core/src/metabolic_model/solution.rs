//! Result of optimizing a [`Model`](super::model::Model)
use indexmap::IndexMap;

use crate::metabolic_model::model::Model;
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Flux distribution and objective value of an optimized model
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Status reported by the solver
    pub status: OptimizationStatus,
    /// Objective value, None unless the solver found an (almost) optimal solution
    pub objective_value: Option<f64>,
    /// Net flux of every reaction, keyed by reaction id, empty unless an optimum was found
    pub fluxes: IndexMap<String, f64>,
}

impl Solution {
    /// Translate the solution of the flux balance problem back onto reactions
    pub(crate) fn from_problem_solution(model: &Model, solution: ProblemSolution) -> Self {
        let fluxes = match (&solution.variable_values, solution.status.has_values()) {
            (Some(values), true) => model
                .reactions
                .values()
                .map(|rxn| {
                    let forward = values.get(&rxn.get_forward_id()).copied().unwrap_or(0.);
                    let reverse = values.get(&rxn.get_reverse_id()).copied().unwrap_or(0.);
                    (rxn.id.clone(), forward - reverse)
                })
                .collect(),
            _ => IndexMap::new(),
        };
        Solution {
            status: solution.status,
            objective_value: solution.objective_value,
            fluxes,
        }
    }

    pub fn is_infeasible(&self) -> bool {
        self.status == OptimizationStatus::Infeasible
    }

    /// Net flux through a reaction
    pub fn flux(&self, reaction_id: &str) -> Option<f64> {
        self.fluxes.get(reaction_id).copied()
    }

    /// Objective value, NaN when no optimum was found
    pub fn objective_value_or_nan(&self) -> f64 {
        self.objective_value.unwrap_or(f64::NAN)
    }
}
