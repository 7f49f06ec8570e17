//! Solver interfaces
//!
//! A solver takes a fully formulated [`Problem`] and returns a [`ProblemSolution`]. Infeasible
//! or unbounded problems are reported through the solution status, errors are reserved for
//! failures to set up or run the solver itself.
use cfg_if::cfg_if;
use thiserror::Error;

use crate::configuration;
use crate::optimize::problem::Problem;
use crate::optimize::ProblemSolution;

pub mod clarabel;
#[cfg(feature = "minilp")]
pub mod microlp;

pub trait Solver {
    /// Short name of the backend, used in log messages
    fn name(&self) -> &str;

    /// Solve the linear problem
    fn solve(&self, problem: &Problem) -> Result<ProblemSolution, SolverError>;
}

/// Create the solver selected by a configuration value
pub fn solver_for(choice: &configuration::Solver) -> Result<Box<dyn Solver>, SolverError> {
    match choice {
        configuration::Solver::Clarabel => Ok(Box::new(clarabel::ClarabelSolver::default())),
        configuration::Solver::Microlp => {
            cfg_if! {
                if #[cfg(feature = "minilp")] {
                    Ok(Box::new(microlp::MicrolpSolver::default()))
                } else {
                    Err(SolverError::Unavailable("microlp".to_string()))
                }
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("The {0} solver was not compiled in, enable its cargo feature")]
    Unavailable(String),
    #[error("Invalid solver settings: {0}")]
    InvalidSettings(String),
    #[error("The problem could not be passed to the solver: {0}")]
    InvalidProblem(String),
}
