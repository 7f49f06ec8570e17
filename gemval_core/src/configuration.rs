//! Process wide defaults used when building reactions, formulating problems and loading models
use std::path::PathBuf;
use std::sync::{LazyLock, PoisonError, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

#[derive(Clone, Debug)]
pub struct Configuration {
    /// Default lower flux bound for new reactions (and for exchange/sink boundaries)
    pub lower_bound: f64,
    /// Default upper flux bound for new reactions
    pub upper_bound: f64,
    /// Relative tolerance of steady state checks, scaled by the largest flux
    pub tolerance: f64,
    /// Solver backend used by [`crate::metabolic_model::model::Model::optimize`]
    pub solver: Solver,
    /// Location of the reference model, relative to the working directory
    pub model_path: PathBuf,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            tolerance: 1e-07,
            solver: Solver::Clarabel,
            model_path: PathBuf::from("../iMD1629.xml"),
        }
    }
}

/// Take a snapshot of the current configuration
///
/// A poisoned lock still holds a usable configuration, so it is read anyway.
pub fn read() -> Configuration {
    CONFIGURATION
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Enum used to specify the default solver to use
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Solver {
    /// Use the Clarabel interior point solver
    Clarabel,
    /// Use the microlp simplex solver, requires the minilp feature to be enabled
    Microlp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Configuration::default();
        assert_eq!(config.lower_bound, -1000.);
        assert_eq!(config.upper_bound, 1000.);
        assert_eq!(config.solver, Solver::Clarabel);
        assert_eq!(config.model_path, PathBuf::from("../iMD1629.xml"));
    }
}
