//! SBML Level 3 IO for constraint based models
//!
//! Flux bounds and objectives are taken from the FBC package. Species ids are stored without
//! their `M_` prefix and reaction ids without `R_`, the prefixes are restored on write.
use thiserror::Error;

use crate::metabolic_model::reaction::ReactionBuilderError;

mod read;
mod validate;
mod write;

pub use validate::{validate_sbml, SbmlIssue, Severity};

pub(crate) const SBML_L3V1: &str = "http://www.sbml.org/sbml/level3/version1/core";
pub(crate) const SBML_L3V2: &str = "http://www.sbml.org/sbml/level3/version2/core";
/// Every FBC version shares this prefix, followed by the version number
pub(crate) const FBC_PREFIX: &str = "http://www.sbml.org/sbml/level3/version1/fbc/version";
pub(crate) const FBC_V2: &str = "http://www.sbml.org/sbml/level3/version1/fbc/version2";

pub(crate) const SPECIES_PREFIX: &str = "M_";
pub(crate) const REACTION_PREFIX: &str = "R_";
pub(crate) const COMPARTMENT_PREFIX: &str = "C_";

pub(crate) const DEFAULT_LB_ID: &str = "cobra_default_lb";
pub(crate) const DEFAULT_UB_ID: &str = "cobra_default_ub";
pub(crate) const ZERO_BOUND_ID: &str = "cobra_0_bound";

#[derive(Error, Debug)]
pub enum SbmlError {
    #[error("Unable to read or write file")]
    Io(#[from] std::io::Error),
    #[error("XML Error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("{0}")]
    Structure(String),
    #[error("Element {element} has no {attribute} attribute")]
    MissingAttribute { element: String, attribute: String },
    #[error("Invalid number `{value}` for {context}")]
    InvalidNumber { context: String, value: String },
    #[error("Parameter {0} has no value")]
    ParameterWithoutValue(String),
    #[error("Reaction {reaction} uses unknown flux bound parameter {parameter}")]
    UnknownParameter { reaction: String, parameter: String },
    #[error("Reaction {reaction} references unknown species {species}")]
    UnknownSpecies { reaction: String, species: String },
    #[error("Objective references unknown reaction {0}")]
    UnknownReaction(String),
    #[error("Unable to build reaction")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
}

/// Drop an SBML id prefix, ids without it are kept as they are
pub(crate) fn clip<'a>(id: &'a str, prefix: &str) -> &'a str {
    id.strip_prefix(prefix).unwrap_or(id)
}
