#![allow(dead_code)]
use std::path::PathBuf;

use gemval_core::configuration;
use gemval_core::metabolic_model::model::Model;

pub const MINI_GEM: &str = include_str!("../../test_data/test_models/mini_gem.xml");

pub fn mini_model() -> Model {
    Model::from_sbml_str(MINI_GEM).unwrap()
}

/// Load the reference model from the configured path
pub fn reference_model() -> Model {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(configuration::read().model_path);
    assert!(
        path.exists(),
        "reference model not found at {}",
        path.display()
    );
    Model::read_sbml(&path).unwrap()
}
