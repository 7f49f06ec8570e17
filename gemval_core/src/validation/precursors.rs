//! Synthesis of the biomass precursors on the glucose minimal medium
//!
//! Each precursor gets a demand reaction on its product and the synthesis reaction is
//! maximized. Glucose (and for protein and DNA oxygen) has to be taken up while doing so.
use crate::metabolic_model::reaction::BoundaryType;
use crate::validation::biolog::BIOMASS_REACTION;
use crate::validation::growth::GrowthThreshold;
use crate::validation::scenario::{FluxExpectation, Scenario, Uptake};

/// Uptake every precursor synthesis needs, in mmol/gDW/h
const PRECURSOR_UPTAKE: f64 = 1.;

/// (synthesis reaction, product, exchanges which must take up)
const PRECURSORS: &[(&str, &str, &[&str])] = &[
    ("Protein_synthesis", "Protein_c", &["EX_956_e", "EX_1503_e"]),
    ("DNA_synthesis", "DNA_c", &["EX_956_e", "EX_1503_e"]),
    ("RNA_synthesis", "RNA_c", &[]),
    ("Carbohydrates_synthesis", "Carbohydrates_c", &["EX_956_e"]),
    ("free_fatty_acids_formation", "generic_fatty_acid_c", &["EX_956_e"]),
    ("Neutral_lipids_synthesis", "Neutral_lipids_c", &["EX_956_e"]),
    ("Phospholipids_synthesis", "Phospholipids_c", &["EX_956_e"]),
];

/// Exchanges the full biomass reaction draws on: oxygen, ammonium, phosphate, sulfate, glucose
const BIOMASS_UPTAKE: &[&str] = &["EX_1503_e", "EX_1544_e", "EX_1653_e", "EX_44_e", "EX_956_e"];

fn synthesis(reaction: &str, product: &str, uptake: &[&str]) -> Scenario {
    let scenario = Scenario::growth(
        reaction,
        reaction,
        Uptake::AddBoundary {
            metabolite: product.to_string(),
            boundary_type: BoundaryType::Demand,
        },
        GrowthThreshold::SYNTHESIS,
        true,
    )
    .with_description(&format!("{} is produced and drained through a demand", product));
    if uptake.is_empty() {
        scenario
    } else {
        scenario.with_flux_expectation(FluxExpectation::uptake(uptake, PRECURSOR_UPTAKE))
    }
}

/// The precursor scenarios followed by the complete biomass reaction
pub fn scenarios() -> Vec<Scenario> {
    let mut scenarios: Vec<Scenario> = PRECURSORS
        .iter()
        .map(|(reaction, product, uptake)| synthesis(reaction, product, uptake))
        .collect();
    scenarios.push(
        Scenario::growth(
            BIOMASS_REACTION,
            BIOMASS_REACTION,
            Uptake::None,
            GrowthThreshold::BIOMASS,
            true,
        )
        .with_description("Biomass is produced on the glucose minimal medium")
        .with_flux_expectation(FluxExpectation::uptake(
            BIOMASS_UPTAKE,
            GrowthThreshold::UPTAKE.value(),
        )),
    );
    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precursor_scenarios() {
        let scenarios = scenarios();
        assert_eq!(scenarios.len(), 8);

        let protein = &scenarios[0];
        assert_eq!(protein.objective, "Protein_synthesis");
        assert_eq!(protein.threshold, GrowthThreshold::SYNTHESIS);
        assert_eq!(
            protein.flux_expectations,
            vec![FluxExpectation {
                reactions: vec!["EX_956_e".to_string(), "EX_1503_e".to_string()],
                below: -1.,
            }]
        );

        let rna = scenarios.iter().find(|s| s.name == "RNA_synthesis").unwrap();
        assert!(rna.flux_expectations.is_empty());

        let fatty_acids = &scenarios[4];
        assert_eq!(
            fatty_acids.uptake,
            Uptake::AddBoundary {
                metabolite: "generic_fatty_acid_c".to_string(),
                boundary_type: BoundaryType::Demand,
            }
        );

        let biomass = scenarios.last().unwrap();
        assert_eq!(biomass.uptake, Uptake::None);
        assert_eq!(biomass.threshold, GrowthThreshold::BIOMASS);
        assert_eq!(biomass.flux_expectations[0].below, -1e-4);
        assert_eq!(biomass.flux_expectations[0].reactions.len(), 5);
    }
}
