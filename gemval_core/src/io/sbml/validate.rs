use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use log::warn;

use crate::io::sbml::read::{parse_document, SbmlDocument};
use crate::metabolic_model::model::Model;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

/// A problem found while validating an SBML document
#[derive(Clone, Debug, PartialEq)]
pub struct SbmlIssue {
    pub severity: Severity,
    pub message: String,
}

impl SbmlIssue {
    fn warning(message: String) -> Self {
        SbmlIssue {
            severity: Severity::Warning,
            message,
        }
    }

    fn error(message: String) -> Self {
        SbmlIssue {
            severity: Severity::Error,
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for SbmlIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

/// Validate an SBML document and parse it into a model
///
/// Documents which are not well-formed SBML produce no model. Otherwise every consistency
/// problem is listed, and the model is returned whenever it can still be built.
pub fn validate_sbml(text: &str) -> (Option<Model>, Vec<SbmlIssue>) {
    let document = match parse_document(text) {
        Ok(document) => document,
        Err(err) => return (None, vec![SbmlIssue::error(err.to_string())]),
    };
    let mut issues = document.consistency_issues();
    let model = match document.to_model() {
        Ok(model) => Some(model),
        Err(err) => {
            issues.push(SbmlIssue::error(format!("Unable to build a model: {}", err)));
            None
        }
    };
    for issue in &issues {
        warn!("{}", issue);
    }
    (model, issues)
}

/// Collect the ids which occur more than once, in order of their second occurrence
fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    ids.filter(|id| !seen.insert(*id) && reported.insert(*id))
        .collect()
}

impl SbmlDocument {
    fn consistency_issues(&self) -> Vec<SbmlIssue> {
        let mut issues = Vec::new();
        for (kind, ids) in [
            ("compartment", duplicates(self.compartments.iter().map(|c| c.id.as_str()))),
            ("species", duplicates(self.species.iter().map(|s| s.id.as_str()))),
            ("parameter", duplicates(self.parameters.iter().map(|p| p.id.as_str()))),
            ("reaction", duplicates(self.reactions.iter().map(|r| r.id.as_str()))),
        ] {
            for id in ids {
                issues.push(SbmlIssue::error(format!("Duplicate {} id {}", kind, id)));
            }
        }

        let compartments: HashSet<&str> =
            self.compartments.iter().map(|c| c.id.as_str()).collect();
        for species in &self.species {
            match species.compartment.as_deref() {
                Some(c) if !compartments.contains(c) => issues.push(SbmlIssue::warning(format!(
                    "Species {} is in unknown compartment {}",
                    species.id, c
                ))),
                None => issues.push(SbmlIssue::warning(format!(
                    "Species {} has no compartment",
                    species.id
                ))),
                _ => {}
            }
        }

        let species: HashSet<&str> = self.species.iter().map(|s| s.id.as_str()).collect();
        let parameters = self.parameter_values();
        for reaction in &self.reactions {
            if reaction.reactants.is_empty() && reaction.products.is_empty() {
                issues.push(SbmlIssue::warning(format!(
                    "Reaction {} has no reactants or products",
                    reaction.id
                )));
            }
            for (id, _) in reaction.reactants.iter().chain(&reaction.products) {
                if !species.contains(id.as_str()) {
                    issues.push(SbmlIssue::error(format!(
                        "Reaction {} references unknown species {}",
                        reaction.id, id
                    )));
                }
            }
            match self.resolve_bounds(reaction, &parameters) {
                Ok((lower, upper)) if lower > upper => issues.push(SbmlIssue::error(format!(
                    "Reaction {} has lower bound {} above upper bound {}",
                    reaction.id, lower, upper
                ))),
                Ok(_) => {}
                Err(err) => issues.push(SbmlIssue::error(err.to_string())),
            }
        }

        match &self.objective {
            Some(objective) => {
                let reactions: HashSet<&str> =
                    self.reactions.iter().map(|r| r.id.as_str()).collect();
                for (id, _) in &objective.flux_objectives {
                    if !reactions.contains(id.as_str()) {
                        issues.push(SbmlIssue::error(format!(
                            "Objective references unknown reaction {}",
                            id
                        )));
                    }
                }
            }
            None => issues.push(SbmlIssue::warning("Model has no objective".to_string())),
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(species: &str, reactions: &str, extra: &str) -> String {
        format!(
            r#"<sbml xmlns="http://www.sbml.org/sbml/level3/version1/core" xmlns:fbc="http://www.sbml.org/sbml/level3/version1/fbc/version2" level="3" version="1">
  <model id="v">
    <listOfCompartments><compartment id="c" constant="true"/></listOfCompartments>
    <listOfSpecies>{}</listOfSpecies>
    <listOfParameters>
      <parameter id="cobra_0_bound" value="0" constant="true"/>
      <parameter id="cobra_default_ub" value="1000" constant="true"/>
      <parameter id="minus_five" value="-5" constant="true"/>
    </listOfParameters>
    <listOfReactions>{}</listOfReactions>
    {}
  </model>
</sbml>"#,
            species, reactions, extra
        )
    }

    const SPECIES: &str = r#"<species id="M_a_c" compartment="c" constant="false" boundaryCondition="false" hasOnlySubstanceUnits="false"/>"#;
    const OBJECTIVE: &str = r#"<fbc:listOfObjectives fbc:activeObjective="obj"><fbc:objective fbc:id="obj" fbc:type="maximize"><fbc:listOfFluxObjectives><fbc:fluxObjective fbc:reaction="R_DM_a_c" fbc:coefficient="1"/></fbc:listOfFluxObjectives></fbc:objective></fbc:listOfObjectives>"#;

    fn reaction(id: &str, species: &str, lower: &str) -> String {
        format!(
            r#"<reaction id="R_{}" reversible="false" fast="false" fbc:lowerFluxBound="{}" fbc:upperFluxBound="cobra_default_ub"><listOfReactants><speciesReference species="M_{}" constant="true"/></listOfReactants></reaction>"#,
            id, lower, species
        )
    }

    #[test]
    fn consistent_document() {
        let text = document(SPECIES, &reaction("DM_a_c", "a_c", "cobra_0_bound"), OBJECTIVE);
        let (model, issues) = validate_sbml(&text);
        assert!(issues.is_empty(), "{:?}", issues);
        assert_eq!(model.unwrap().reactions.len(), 1);
    }

    #[test]
    fn malformed_document_has_no_model() {
        let (model, issues) = validate_sbml("<sbml><model></sbml>");
        assert!(model.is_none());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }

    #[test]
    fn consistency_problems_keep_the_model() {
        let species = format!(
            "{}{}",
            SPECIES,
            r#"<species id="M_b_x" compartment="x" constant="false" boundaryCondition="false" hasOnlySubstanceUnits="false"/>"#
        );
        let reactions = format!(
            "{}{}{}",
            reaction("DM_a_c", "a_c", "cobra_0_bound"),
            reaction("DM_a_c", "a_c", "cobra_0_bound"),
            r#"<reaction id="R_EMPTY" reversible="true" fast="false" fbc:lowerFluxBound="cobra_0_bound" fbc:upperFluxBound="minus_five"/>"#
        );
        let (model, issues) = validate_sbml(&document(&species, &reactions, OBJECTIVE));
        assert!(model.is_some());
        let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
        assert!(messages.contains(&"Duplicate reaction id DM_a_c"));
        assert!(messages.contains(&"Species b_x is in unknown compartment x"));
        assert!(messages.contains(&"Reaction EMPTY has no reactants or products"));
        assert!(messages.contains(&"Reaction EMPTY has lower bound 0 above upper bound -5"));
    }

    #[test]
    fn dangling_references_drop_the_model() {
        let reactions = format!(
            "{}{}",
            reaction("DM_a_c", "a_c", "cobra_0_bound"),
            reaction("DM_z_c", "z_c", "missing_bound")
        );
        let extra = OBJECTIVE.replace("R_DM_a_c", "R_NOPE");
        let (model, issues) = validate_sbml(&document(SPECIES, &reactions, &extra));
        assert!(model.is_none());
        let errors: Vec<&SbmlIssue> = issues.iter().filter(|i| i.is_error()).collect();
        // unknown species, unknown parameter, unknown objective reaction, failed build
        assert_eq!(errors.len(), 4);
    }
}
