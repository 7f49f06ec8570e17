//! Growth calls from optimization results
use std::fmt::{Display, Formatter};

use log::warn;

use crate::metabolic_model::solution::Solution;
use crate::optimize::OptimizationStatus;
use crate::validation::ValidationError;

/// Objective value a solution has to exceed to count as growth
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct GrowthThreshold(pub f64);

impl GrowthThreshold {
    /// Synthesis of a single biomass precursor through its demand reaction
    pub const SYNTHESIS: GrowthThreshold = GrowthThreshold(0.1);
    /// Flux through the biomass reaction on the glucose minimal medium
    pub const BIOMASS: GrowthThreshold = GrowthThreshold(0.04);
    /// Biomass flux with a Biolog carbon source
    pub const BIOLOG: GrowthThreshold = GrowthThreshold(1e-7);
    /// Minimal uptake through a required exchange
    pub const UPTAKE: GrowthThreshold = GrowthThreshold(1e-4);

    pub fn value(&self) -> f64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Growth {
    Present,
    Absent,
}

impl Growth {
    pub fn from_bool(grows: bool) -> Self {
        if grows {
            Growth::Present
        } else {
            Growth::Absent
        }
    }

    pub fn is_present(&self) -> bool {
        *self == Growth::Present
    }
}

impl Display for Growth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Growth::Present => write!(f, "growth"),
            Growth::Absent => write!(f, "no growth"),
        }
    }
}

/// Classify an optimization result
///
/// An optimum above the threshold is growth, an optimum at or below it and an infeasible
/// problem are not. Interior point solvers may stop at reduced accuracy, such an almost optimal
/// result is classified like an optimum. Any other status can't be classified.
pub fn classify(solution: &Solution, threshold: GrowthThreshold) -> Result<Growth, ValidationError> {
    match solution.status {
        OptimizationStatus::Optimal | OptimizationStatus::AlmostOptimal => {
            if solution.status == OptimizationStatus::AlmostOptimal {
                warn!("Classifying an almost optimal solution");
            }
            let value = solution.objective_value_or_nan();
            Ok(Growth::from_bool(value > threshold.value()))
        }
        OptimizationStatus::Infeasible => Ok(Growth::Absent),
        other => Err(ValidationError::UnexpectedStatus(other)),
    }
}
