//! Module for reading and writing Models
//!
//! SBML (Level 3 with the FBC package) is the format reference models are distributed in,
//! COBRA JSON is supported for exchange with cobrapy.
pub mod json;
pub mod sbml;
