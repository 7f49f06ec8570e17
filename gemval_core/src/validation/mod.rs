//! Medium-gated growth checks of a metabolic model
//!
//! A check closes every boundary reaction except a fixed medium, optionally opens one more
//! uptake route, maximizes an objective and compares the resulting growth call with the
//! experimentally expected one. Every check runs on its own copy of the model.
use thiserror::Error;

use crate::metabolic_model::model::ModelError;
use crate::optimize::solvers::SolverError;
use crate::optimize::OptimizationStatus;

pub mod biolog;
pub mod growth;
pub mod medium;
pub mod precursors;
pub mod report;
pub mod scenario;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Unable to prepare or optimize the model")]
    Model(#[from] ModelError),
    #[error("Unable to create the solver")]
    Solver(#[from] SolverError),
    #[error("Optimization ended with status {0}, growth can't be classified")]
    UnexpectedStatus(OptimizationStatus),
}
