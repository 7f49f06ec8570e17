//! Validation of genome scale metabolic models with flux balance analysis.
//!
//! Models are read from SBML (or COBRA JSON), turned into linear programs and checked against
//! experimentally grounded growth expectations: growth on Biolog substrates and synthesis of
//! the biomass precursors on a minimal medium.

pub mod configuration;
pub mod io;
pub mod metabolic_model;
pub mod optimize;
pub mod validation;
mod utils;
