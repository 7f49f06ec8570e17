//! Growth on Biolog carbon and nitrogen sources
//!
//! Each source is offered through a sink reaction on the minimal medium without glucose and
//! the biomass reaction is maximized. The expected calls come from Biolog phenotype plates.
use crate::metabolic_model::reaction::BoundaryType;
use crate::validation::growth::GrowthThreshold;
use crate::validation::scenario::{Scenario, Uptake};

pub const BIOMASS_REACTION: &str = "Biomass_reaction_1";

/// A Biolog substrate and whether growth was observed on it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarbonSource {
    pub metabolite: &'static str,
    pub name: &'static str,
    pub grows: bool,
}

const fn source(metabolite: &'static str, name: &'static str, grows: bool) -> CarbonSource {
    CarbonSource {
        metabolite,
        name,
        grows,
    }
}

pub const CARBON_SOURCES: &[CarbonSource] = &[
    source("1361_e", "N-acetyl-D-glucosamine[c]", true),
    source("960_e", "D-ribulose[e]", true),
    source("968_c", "D-arabinofuranose[c]", false),
    source("1184_e", "L-arabinose[e]", true),
    source("1185_e", "L-arabinitol[e]", true),
    source("132_e", "beta-D-cellobiose[e]", true),
    source("994_c", "erythritol[c]", false),
    source("95_e", "beta-D-fructofuranose[e]", true),
    source("1029_e", "D-galactose[e]", true),
    source("954_e", "D-galactopyranuronate[e]", true),
    source("1047_c", "D-gluconate[c]", true),
    source("glucosamine_e", "D-glucosamine[e]", true),
    source("956_e", "D-glucose[e]", true),
    source("1039_e", "alpha-D-glucopyranose 1-phosphate[e]", true),
    source("955_e", "D-glucopyranuronate[e]", false),
    source("1056_e", "glycerol[e]", true),
    source("1269_c", "myo-inositol[c]", false),
    source("1242_e", "maltose[e]", true),
    source("1244_e", "maltotriose[e]", true),
    source("971_e", "D-mannopyranose[c]", true),
    source("1252_c", "melibiose[c]", true),
    source("75_c", "an alpha-D-galactoside[c]", false),
    source("106_c", "a beta-D-galactoside[c]", false),
    source("231_e", "raffinose[e]", true),
    source("1654_e", "D-sorbitol[e]", true),
    source("816_c", "L-sorbopyranose[c]", true),
    source("445_c", "stachyose[c]", true),
    source("1724_e", "alpha,alpha-trehalose[e]", true),
    source("1789_c", "xylitol[c]", true),
    source("967_e", "D-xylose[e]", true),
    source("1936_c", "4-aminobutanoate[c]", false),
    source("1020_c", "fumarate[c]", true),
    source("490_c", "(S)-3-hydroxybutanoate[c]", true),
    source("1939_e", "4-hydroxybutanoate[e]", true),
    source("1869_c", "2-oxoglutarate[c]", true),
    source("1203_c", "(S)-lactate[c]", true),
    source("1245_c", "(S)-malate[c]", true),
    source("798_c", "succinamate[c]", true),
    source("1663_c", "succinate[c]", true),
    source("6_c", "N-acetyl-L-glutamate[c]", false),
    source("1183_e", "L-alanine[e]", true),
    source("54_e", "L-asparagine[e]", true),
    source("1188_c", "L-aspartate[c]", true),
    source("1046_e", "L-glutamate[e]", true),
    source("1205_e", "L-ornithine[e]", true),
    source("1450_c", "L-phenylalanine[c]", false),
    source("1507_c", "L-proline[c]", true),
    source("1971_c", "5-oxo-L-proline[c]", true),
    source("1651_c", "L-serine[c]", true),
    source("1716_c", "L-threonine[c]", true),
    source("999_c", "ethanolamine[c]", false),
    source("1511_e", "putrescine[e]", true),
    source("18_e", "adenosine[e]", true),
    source("1756_c", "uridine[c]", false),
    source("45_c", "AMP[c]", true),
    source("arbutrin_e", "arbutrin[e]", true),
    source("gentiobiose_e", "gentiobiose[e]", true),
    source("glycogen_e", "glycogen[e]", true),
    source("diketodgluconate_e", "2-keto-D-gluconate[e]", true),
    source("lactose_e", "Lactose[e]", true),
    source("lactulose_e", "Lactulose[e]", true),
    source("maltitol_e", "maltitol[e]", true),
    source("mannitol_e", "mannitol[e]", true),
    source("melezitose_e", "melezitose[e]", true),
    source("palatinose_e", "palatinose[e]", true),
    source("961_e", "D-ribofuranose[e]", true),
    source("turanose_e", "turanose[e]", true),
    source("alaninamide_e", "alaninamide[e]", true),
    source("ala_gly_e", "L-alanyl-glycine[e]", true),
    source("glycyl_l_glutamate_e", "glycyl-L-glutamate[e]", true),
];

impl CarbonSource {
    pub fn scenario(&self) -> Scenario {
        Scenario::growth(
            &format!("biolog_{}", self.metabolite),
            BIOMASS_REACTION,
            Uptake::AddBoundary {
                metabolite: self.metabolite.to_string(),
                boundary_type: BoundaryType::Sink,
            },
            GrowthThreshold::BIOLOG,
            self.grows,
        )
        .with_description(&format!("Metabolite name: {}", self.name))
    }
}

/// One scenario per entry of [`CARBON_SOURCES`]
pub fn scenarios() -> Vec<Scenario> {
    CARBON_SOURCES.iter().map(CarbonSource::scenario).collect()
}

/// Without any carbon source the biomass reaction can't carry flux
pub fn no_carbon_source() -> Scenario {
    Scenario::infeasible("no_carbon_source", BIOMASS_REACTION, Uptake::None)
        .with_description("No growth without a carbon source")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::scenario::Expectation;
    use std::collections::HashSet;

    #[test]
    fn table_shape() {
        assert_eq!(CARBON_SOURCES.len(), 70);
        let ids: HashSet<&str> = CARBON_SOURCES.iter().map(|s| s.metabolite).collect();
        assert_eq!(ids.len(), 70);
        let no_growth: Vec<&str> = CARBON_SOURCES
            .iter()
            .filter(|s| !s.grows)
            .map(|s| s.metabolite)
            .collect();
        assert_eq!(
            no_growth,
            vec![
                "968_c", "994_c", "955_e", "1269_c", "75_c", "106_c", "1936_c", "6_c", "1450_c",
                "999_c", "1756_c"
            ]
        );
    }

    #[test]
    fn scenarios_use_sinks_on_biomass() {
        let scenarios = scenarios();
        let glucose = scenarios
            .iter()
            .find(|s| s.name == "biolog_956_e")
            .unwrap();
        assert_eq!(glucose.objective, BIOMASS_REACTION);
        assert_eq!(glucose.threshold, GrowthThreshold::BIOLOG);
        assert_eq!(glucose.expected, Expectation::Growth(true));
        assert_eq!(glucose.description, "Metabolite name: D-glucose[e]");
        assert_eq!(
            glucose.uptake,
            Uptake::AddBoundary {
                metabolite: "956_e".to_string(),
                boundary_type: BoundaryType::Sink
            }
        );
        assert_eq!(no_carbon_source().expected, Expectation::Infeasible);
    }
}
