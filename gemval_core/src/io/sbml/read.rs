use std::fs;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use log::{info, warn};
use roxmltree::{Document, Node};

use crate::configuration;
use crate::io::sbml::{
    clip, SbmlError, COMPARTMENT_PREFIX, DEFAULT_LB_ID, DEFAULT_UB_ID, FBC_PREFIX,
    REACTION_PREFIX, SBML_L3V1, SBML_L3V2, SPECIES_PREFIX,
};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::ReactionBuilder;
use crate::optimize::objective::ObjectiveSense;

/// Contents of an SBML document, ids already stripped of their prefixes
///
/// Nothing is cross-checked at this stage, which lets validation report every problem.
#[derive(Clone, Debug, Default)]
pub(crate) struct SbmlDocument {
    pub id: Option<String>,
    pub name: Option<String>,
    pub compartments: Vec<SbmlCompartment>,
    pub species: Vec<SbmlSpecies>,
    pub parameters: Vec<SbmlParameter>,
    pub reactions: Vec<SbmlReaction>,
    pub objective: Option<SbmlObjective>,
}

#[derive(Clone, Debug)]
pub(crate) struct SbmlCompartment {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Clone, Debug)]
pub(crate) struct SbmlSpecies {
    pub id: String,
    pub name: Option<String>,
    pub compartment: Option<String>,
    pub charge: Option<i32>,
    pub formula: Option<String>,
}

#[derive(Clone, Debug)]
pub(crate) struct SbmlParameter {
    pub id: String,
    pub value: f64,
}

#[derive(Clone, Debug)]
pub(crate) struct SbmlReaction {
    pub id: String,
    pub name: Option<String>,
    pub reversible: Option<bool>,
    pub sbo_term: Option<String>,
    pub reactants: Vec<(String, f64)>,
    pub products: Vec<(String, f64)>,
    pub lower_bound: Option<String>,
    pub upper_bound: Option<String>,
}

#[derive(Clone, Debug)]
pub(crate) struct SbmlObjective {
    pub sense: ObjectiveSense,
    pub flux_objectives: Vec<(String, f64)>,
}

struct Namespaces {
    core: String,
    fbc: Option<String>,
}

impl Namespaces {
    fn fbc_attribute<'a>(&self, node: Node<'a, '_>, name: &str) -> Option<&'a str> {
        self.fbc
            .as_deref()
            .and_then(|fbc| node.attribute((fbc, name)))
    }
}

impl Model {
    /// Read a model from an SBML file
    pub fn read_sbml<P: AsRef<Path>>(path: P) -> Result<Model, SbmlError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let model = Model::from_sbml_str(&text)?;
        info!(
            "Read SBML model {} ({} reactions, {} metabolites)",
            path.display(),
            model.reactions.len(),
            model.metabolites.len()
        );
        Ok(model)
    }

    /// Parse a model from the text of an SBML document
    pub fn from_sbml_str(text: &str) -> Result<Model, SbmlError> {
        parse_document(text)?.to_model()
    }
}

pub(crate) fn parse_document(text: &str) -> Result<SbmlDocument, SbmlError> {
    let document = Document::parse(text)?;
    let root_elements: Vec<Node> = document
        .root()
        .children()
        .filter(|it| it.is_element())
        .collect();
    let sbml = match root_elements.as_slice() {
        [] => return Err(SbmlError::Structure("Document is empty.".to_string())),
        [sbml] => *sbml,
        _ => {
            return Err(SbmlError::Structure(
                "Document contains multiple top-level tags. Only SBML tag is expected.".to_string(),
            ))
        }
    };
    if sbml.tag_name().name() != "sbml" {
        return Err(SbmlError::Structure(
            "Root element is not <sbml>.".to_string(),
        ));
    }
    let core = match sbml.tag_name().namespace() {
        Some(ns) if ns == SBML_L3V1 || ns == SBML_L3V2 => ns.to_string(),
        _ => {
            return Err(SbmlError::Structure(
                "The document does not use an SBML Level 3 namespace.".to_string(),
            ))
        }
    };
    let fbc = sbml
        .namespaces()
        .map(|ns| ns.uri())
        .find(|uri| uri.starts_with(FBC_PREFIX))
        .map(str::to_string);
    if fbc.is_none() {
        warn!("Document does not use the fbc package, flux bounds fall back to defaults");
    }
    let ns = Namespaces { core, fbc };

    let model = read_unique_child(sbml, &ns.core, "model")?;
    Ok(SbmlDocument {
        id: model.attribute("id").map(str::to_string),
        name: model.attribute("name").map(str::to_string),
        compartments: read_compartments(model, &ns)?,
        species: read_species(model, &ns)?,
        parameters: read_parameters(model, &ns)?,
        reactions: read_reactions(model, &ns)?,
        objective: read_objective(model, &ns)?,
    })
}

// region Elements
fn read_compartments(model: Node, ns: &Namespaces) -> Result<Vec<SbmlCompartment>, SbmlError> {
    list_items(model, &ns.core, "listOfCompartments", "compartment")?
        .into_iter()
        .map(|node| {
            Ok(SbmlCompartment {
                id: clip(required_attribute(node, "id")?, COMPARTMENT_PREFIX).to_string(),
                name: node.attribute("name").map(str::to_string),
            })
        })
        .collect()
}

fn read_species(model: Node, ns: &Namespaces) -> Result<Vec<SbmlSpecies>, SbmlError> {
    let mut result = Vec::new();
    for node in list_items(model, &ns.core, "listOfSpecies", "species")? {
        let id = clip(required_attribute(node, "id")?, SPECIES_PREFIX).to_string();
        let charge = match ns.fbc_attribute(node, "charge") {
            Some(raw) => Some(parse_number::<i32>(raw, &format!("charge of {}", id))?),
            None => None,
        };
        result.push(SbmlSpecies {
            name: node.attribute("name").map(str::to_string),
            compartment: node
                .attribute("compartment")
                .map(|c| clip(c, COMPARTMENT_PREFIX).to_string()),
            charge,
            formula: ns
                .fbc_attribute(node, "chemicalFormula")
                .map(str::to_string),
            id,
        });
    }
    Ok(result)
}

fn read_parameters(model: Node, ns: &Namespaces) -> Result<Vec<SbmlParameter>, SbmlError> {
    let mut result = Vec::new();
    for node in list_items(model, &ns.core, "listOfParameters", "parameter")? {
        let id = required_attribute(node, "id")?.to_string();
        let value = match node.attribute("value") {
            Some(raw) => parse_number::<f64>(raw, &format!("parameter {}", id))?,
            None => return Err(SbmlError::ParameterWithoutValue(id)),
        };
        result.push(SbmlParameter { id, value });
    }
    Ok(result)
}

fn read_species_references(
    reaction: Node,
    ns: &Namespaces,
    list: &str,
    reaction_id: &str,
) -> Result<Vec<(String, f64)>, SbmlError> {
    let mut result = Vec::new();
    for node in list_items(reaction, &ns.core, list, "speciesReference")? {
        let species = clip(required_attribute(node, "species")?, SPECIES_PREFIX).to_string();
        let stoichiometry = match node.attribute("stoichiometry") {
            Some(raw) => parse_number::<f64>(
                raw,
                &format!("stoichiometry of {} in {}", species, reaction_id),
            )?,
            None => 1.,
        };
        result.push((species, stoichiometry));
    }
    Ok(result)
}

fn read_reactions(model: Node, ns: &Namespaces) -> Result<Vec<SbmlReaction>, SbmlError> {
    let mut result = Vec::new();
    for node in list_items(model, &ns.core, "listOfReactions", "reaction")? {
        let id = clip(required_attribute(node, "id")?, REACTION_PREFIX).to_string();
        result.push(SbmlReaction {
            name: node.attribute("name").map(str::to_string),
            reversible: node.attribute("reversible").map(|r| r == "true"),
            sbo_term: node.attribute("sboTerm").map(str::to_string),
            reactants: read_species_references(node, ns, "listOfReactants", &id)?,
            products: read_species_references(node, ns, "listOfProducts", &id)?,
            lower_bound: ns
                .fbc_attribute(node, "lowerFluxBound")
                .map(str::to_string),
            upper_bound: ns
                .fbc_attribute(node, "upperFluxBound")
                .map(str::to_string),
            id,
        });
    }
    Ok(result)
}

/// Read the active objective, or the first one when none is marked active
fn read_objective(model: Node, ns: &Namespaces) -> Result<Option<SbmlObjective>, SbmlError> {
    let Some(fbc) = ns.fbc.as_deref() else {
        return Ok(None);
    };
    let Some(list) = read_optional_child(model, fbc, "listOfObjectives")? else {
        return Ok(None);
    };
    let objectives = child_tags(list, fbc, "objective");
    let active = list.attribute((fbc, "activeObjective"));
    let chosen = objectives
        .iter()
        .find(|o| active.is_some() && o.attribute((fbc, "id")) == active)
        .or_else(|| objectives.first());
    let Some(objective) = chosen else {
        return Ok(None);
    };
    let sense = match objective.attribute((fbc, "type")) {
        Some("minimize") => ObjectiveSense::Minimize,
        _ => ObjectiveSense::Maximize,
    };
    let mut flux_objectives = Vec::new();
    for node in list_items(*objective, fbc, "listOfFluxObjectives", "fluxObjective")? {
        let reaction = node
            .attribute((fbc, "reaction"))
            .ok_or_else(|| SbmlError::MissingAttribute {
                element: "fluxObjective".to_string(),
                attribute: "reaction".to_string(),
            })?;
        let reaction = clip(reaction, REACTION_PREFIX).to_string();
        let coefficient = match node.attribute((fbc, "coefficient")) {
            Some(raw) => parse_number::<f64>(raw, &format!("objective coefficient of {}", reaction))?,
            None => 1.,
        };
        flux_objectives.push((reaction, coefficient));
    }
    Ok(Some(SbmlObjective {
        sense,
        flux_objectives,
    }))
}
// endregion Elements

// region Conversion
impl SbmlDocument {
    pub(crate) fn parameter_values(&self) -> IndexMap<&str, f64> {
        self.parameters
            .iter()
            .map(|p| (p.id.as_str(), p.value))
            .collect()
    }

    /// Lower and upper bound of a reaction
    ///
    /// Missing bounds use the `cobra_default_lb`/`cobra_default_ub` parameters and then the
    /// configured defaults, a reaction marked irreversible without a lower bound gets 0.
    pub(crate) fn resolve_bounds(
        &self,
        reaction: &SbmlReaction,
        parameters: &IndexMap<&str, f64>,
    ) -> Result<(f64, f64), SbmlError> {
        let config = configuration::read();
        let lookup = |parameter: &String| {
            parameters
                .get(parameter.as_str())
                .copied()
                .ok_or_else(|| SbmlError::UnknownParameter {
                    reaction: reaction.id.clone(),
                    parameter: parameter.clone(),
                })
        };
        let lower_bound = match &reaction.lower_bound {
            Some(parameter) => lookup(parameter)?,
            None if reaction.reversible == Some(false) => 0.,
            None => parameters
                .get(DEFAULT_LB_ID)
                .copied()
                .unwrap_or(config.lower_bound),
        };
        let upper_bound = match &reaction.upper_bound {
            Some(parameter) => lookup(parameter)?,
            None => parameters
                .get(DEFAULT_UB_ID)
                .copied()
                .unwrap_or(config.upper_bound),
        };
        Ok((lower_bound, upper_bound))
    }

    pub(crate) fn to_model(&self) -> Result<Model, SbmlError> {
        let mut model = Model::new_empty();
        model.id = self.id.clone();
        model.name = self.name.clone();
        for compartment in &self.compartments {
            model.compartments.insert(
                compartment.id.clone(),
                compartment
                    .name
                    .clone()
                    .unwrap_or_else(|| compartment.id.clone()),
            );
        }
        for species in &self.species {
            model.add_metabolite(Metabolite {
                id: species.id.clone(),
                name: species.name.clone(),
                compartment: species.compartment.clone(),
                charge: species.charge.unwrap_or_default(),
                formula: species.formula.clone(),
                notes: None,
                annotation: None,
            });
        }

        let parameters = self.parameter_values();
        for reaction in &self.reactions {
            let mut metabolites: IndexMap<String, f64> = IndexMap::new();
            let references = reaction
                .reactants
                .iter()
                .map(|(s, c)| (s, -c))
                .chain(reaction.products.iter().map(|(s, c)| (s, *c)));
            for (species, coefficient) in references {
                if !model.metabolites.contains_key(species) {
                    return Err(SbmlError::UnknownSpecies {
                        reaction: reaction.id.clone(),
                        species: species.clone(),
                    });
                }
                *metabolites.entry(species.clone()).or_insert(0.) += coefficient;
            }
            // A species on both sides with equal stoichiometry takes no part in the reaction
            metabolites.retain(|_, coefficient| *coefficient != 0.);
            let (lower_bound, upper_bound) = self.resolve_bounds(reaction, &parameters)?;
            let new_reaction = ReactionBuilder::default()
                .id(reaction.id.clone())
                .name(reaction.name.clone())
                .metabolites(metabolites)
                .lower_bound(lower_bound)
                .upper_bound(upper_bound)
                .sbo_term(reaction.sbo_term.clone())
                .build()?;
            model.add_reaction(new_reaction);
        }

        if let Some(objective) = &self.objective {
            for (reaction_id, coefficient) in &objective.flux_objectives {
                if !model.reactions.contains_key(reaction_id) {
                    return Err(SbmlError::UnknownReaction(reaction_id.clone()));
                }
                model.objective.insert(reaction_id.clone(), *coefficient);
            }
            model.objective_sense = objective.sense;
        }
        Ok(model)
    }
}
// endregion Conversion

// region Helpers
/// Find the given tag in a parent `Node`. Returns error if the tag does not exist or is
/// present in multiple instances.
fn read_unique_child<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    namespace: &str,
    name: &str,
) -> Result<Node<'a, 'input>, SbmlError> {
    read_optional_child(parent, namespace, name)?.ok_or_else(|| {
        SbmlError::Structure(format!(
            "Could not find tag {} in {}.",
            name,
            parent.tag_name().name()
        ))
    })
}

/// Like [`read_unique_child`], but a missing tag is not an error
fn read_optional_child<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    namespace: &str,
    name: &str,
) -> Result<Option<Node<'a, 'input>>, SbmlError> {
    let mut tags = child_tags(parent, namespace, name).into_iter();
    let fst = tags.next();
    if tags.next().is_some() {
        return Err(SbmlError::Structure(format!(
            "Multiple {} found in {}.",
            name,
            parent.tag_name().name()
        )));
    }
    Ok(fst)
}

/// Find all child `Nodes` that have a given name.
fn child_tags<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    namespace: &str,
    name: &str,
) -> Vec<Node<'a, 'input>> {
    parent
        .children()
        .filter(|n| {
            n.is_element()
                && n.tag_name().name() == name
                && n.tag_name().namespace() == Some(namespace)
        })
        .collect()
}

/// Items of an optional `listOf...` element
fn list_items<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    namespace: &str,
    list: &str,
    item: &str,
) -> Result<Vec<Node<'a, 'input>>, SbmlError> {
    Ok(match read_optional_child(parent, namespace, list)? {
        Some(list) => child_tags(list, namespace, item),
        None => Vec::new(),
    })
}

fn required_attribute<'a>(node: Node<'a, '_>, attribute: &str) -> Result<&'a str, SbmlError> {
    node.attribute(attribute)
        .ok_or_else(|| SbmlError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute: attribute.to_string(),
        })
}

fn parse_number<T: FromStr>(raw: &str, context: &str) -> Result<T, SbmlError> {
    raw.trim().parse::<T>().map_err(|_| SbmlError::InvalidNumber {
        context: context.to_string(),
        value: raw.to_string(),
    })
}
// endregion Helpers

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sbml xmlns="http://www.sbml.org/sbml/level3/version1/core" xmlns:fbc="http://www.sbml.org/sbml/level3/version1/fbc/version2" level="3" version="1" fbc:required="false">
  <model id="small" name="Small model" fbc:strict="true">
    <listOfCompartments>
      <compartment id="c" name="cytosol" constant="true"/>
      <compartment id="e" name="extracellular" constant="true"/>
    </listOfCompartments>
    <listOfSpecies>
      <species id="M_956_e" name="D-glucose" compartment="e" hasOnlySubstanceUnits="false" boundaryCondition="false" constant="false" fbc:charge="0" fbc:chemicalFormula="C6H12O6"/>
      <species id="M_956_c" name="D-glucose" compartment="c" hasOnlySubstanceUnits="false" boundaryCondition="false" constant="false"/>
      <species id="M_pyr_c" compartment="c" hasOnlySubstanceUnits="false" boundaryCondition="false" constant="false" fbc:charge="-1"/>
    </listOfSpecies>
    <listOfParameters>
      <parameter id="cobra_default_lb" value="-1000" constant="true"/>
      <parameter id="cobra_default_ub" value="1000" constant="true"/>
      <parameter id="cobra_0_bound" value="0" constant="true"/>
      <parameter id="R_EX_956_e_lower_bound" value="-10" constant="true"/>
    </listOfParameters>
    <listOfReactions>
      <reaction id="R_EX_956_e" reversible="true" fast="false" fbc:lowerFluxBound="R_EX_956_e_lower_bound" fbc:upperFluxBound="cobra_default_ub">
        <listOfReactants>
          <speciesReference species="M_956_e" stoichiometry="1" constant="true"/>
        </listOfReactants>
      </reaction>
      <reaction id="R_T_glc" reversible="false" fast="false" fbc:lowerFluxBound="cobra_0_bound" fbc:upperFluxBound="cobra_default_ub">
        <listOfReactants>
          <speciesReference species="M_956_e" constant="true"/>
        </listOfReactants>
        <listOfProducts>
          <speciesReference species="M_956_c" stoichiometry="1" constant="true"/>
        </listOfProducts>
      </reaction>
      <reaction id="R_GLYC" name="glycolysis" reversible="false" fast="false">
        <listOfReactants>
          <speciesReference species="M_956_c" stoichiometry="1" constant="true"/>
        </listOfReactants>
        <listOfProducts>
          <speciesReference species="M_pyr_c" stoichiometry="2" constant="true"/>
        </listOfProducts>
      </reaction>
      <reaction id="R_DM_pyr_c" reversible="false" fast="false" sboTerm="SBO:0000628" fbc:lowerFluxBound="cobra_0_bound" fbc:upperFluxBound="cobra_default_ub">
        <listOfReactants>
          <speciesReference species="M_pyr_c" stoichiometry="1" constant="true"/>
        </listOfReactants>
      </reaction>
    </listOfReactions>
    <fbc:listOfObjectives fbc:activeObjective="obj">
      <fbc:objective fbc:id="other" fbc:type="minimize">
        <fbc:listOfFluxObjectives>
          <fbc:fluxObjective fbc:reaction="R_T_glc" fbc:coefficient="1"/>
        </fbc:listOfFluxObjectives>
      </fbc:objective>
      <fbc:objective fbc:id="obj" fbc:type="maximize">
        <fbc:listOfFluxObjectives>
          <fbc:fluxObjective fbc:reaction="R_DM_pyr_c" fbc:coefficient="1"/>
        </fbc:listOfFluxObjectives>
      </fbc:objective>
    </fbc:listOfObjectives>
  </model>
</sbml>"#;

    #[test]
    fn read_small_document() {
        let model = Model::from_sbml_str(SMALL).unwrap();
        assert_eq!(model.id.as_deref(), Some("small"));
        assert_eq!(model.compartments["e"], "extracellular");
        assert_eq!(
            model.metabolites.keys().collect::<Vec<_>>(),
            vec!["956_e", "956_c", "pyr_c"]
        );
        let glucose = model.metabolite("956_e").unwrap();
        assert_eq!(glucose.formula.as_deref(), Some("C6H12O6"));
        assert_eq!(model.metabolite("pyr_c").unwrap().charge, -1);

        let exchange = model.reaction("EX_956_e").unwrap();
        assert_eq!((exchange.lower_bound, exchange.upper_bound), (-10., 1000.));
        assert_eq!(exchange.metabolites["956_e"], -1.);
        // No bound parameters and reversible="false"
        let glycolysis = model.reaction("GLYC").unwrap();
        assert_eq!((glycolysis.lower_bound, glycolysis.upper_bound), (0., 1000.));
        assert_eq!(glycolysis.metabolites["pyr_c"], 2.);
        assert_eq!(
            model.reaction("DM_pyr_c").unwrap().sbo_term.as_deref(),
            Some("SBO:0000628")
        );

        assert_eq!(model.objective_reactions(), vec!["DM_pyr_c"]);
        assert_eq!(model.objective_sense, ObjectiveSense::Maximize);
    }

    #[test]
    fn unknown_bound_parameter() {
        let text = SMALL.replace(
            "fbc:lowerFluxBound=\"R_EX_956_e_lower_bound\"",
            "fbc:lowerFluxBound=\"missing\"",
        );
        assert!(matches!(
            Model::from_sbml_str(&text),
            Err(SbmlError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn unknown_species() {
        let text = SMALL.replace("species=\"M_pyr_c\" stoichiometry=\"2\"", "species=\"M_x_c\"");
        assert!(matches!(
            Model::from_sbml_str(&text),
            Err(SbmlError::UnknownSpecies { .. })
        ));
    }

    #[test]
    fn invalid_numbers() {
        let text = SMALL.replace("value=\"-10\"", "value=\"ten\"");
        assert!(matches!(
            Model::from_sbml_str(&text),
            Err(SbmlError::InvalidNumber { .. })
        ));
        let text = SMALL.replace("value=\"-10\"", "");
        assert!(matches!(
            Model::from_sbml_str(&text),
            Err(SbmlError::ParameterWithoutValue(_))
        ));
    }

    #[test]
    fn structural_errors() {
        assert!(matches!(
            Model::from_sbml_str("<sbml"),
            Err(SbmlError::Xml(_))
        ));
        assert!(matches!(
            Model::from_sbml_str("<model/>"),
            Err(SbmlError::Structure(_))
        ));
        let no_model = r#"<sbml xmlns="http://www.sbml.org/sbml/level3/version1/core" level="3" version="1"/>"#;
        assert!(matches!(
            Model::from_sbml_str(no_model),
            Err(SbmlError::Structure(_))
        ));
    }

    #[test]
    fn species_on_both_sides_cancel() {
        let text = r#"<sbml xmlns="http://www.sbml.org/sbml/level3/version1/core" level="3" version="1">
  <model id="cancel">
    <listOfSpecies>
      <species id="M_a_c" compartment="c" constant="false" boundaryCondition="false" hasOnlySubstanceUnits="false"/>
      <species id="M_b_c" compartment="c" constant="false" boundaryCondition="false" hasOnlySubstanceUnits="false"/>
    </listOfSpecies>
    <listOfReactions>
      <reaction id="R_X" reversible="true" fast="false">
        <listOfReactants>
          <speciesReference species="M_a_c" stoichiometry="1" constant="true"/>
          <speciesReference species="M_b_c" stoichiometry="1" constant="true"/>
        </listOfReactants>
        <listOfProducts>
          <speciesReference species="M_a_c" stoichiometry="1" constant="true"/>
        </listOfProducts>
      </reaction>
    </listOfReactions>
  </model>
</sbml>"#;
        let model = Model::from_sbml_str(text).unwrap();
        let reaction = model.reaction("X").unwrap();
        assert_eq!(
            reaction.metabolites,
            IndexMap::from([("b_c".to_string(), -1.)])
        );
        assert!(reaction.is_boundary());
        assert_eq!(model.boundary(), vec!["X"]);
        // The species itself is still part of the model
        assert!(model.metabolite("a_c").is_ok());
    }

    #[test]
    fn without_fbc_bounds_use_defaults() {
        let text = r#"<sbml xmlns="http://www.sbml.org/sbml/level3/version1/core" level="3" version="1">
  <model id="plain">
    <listOfSpecies><species id="M_a" compartment="c" constant="false" boundaryCondition="false" hasOnlySubstanceUnits="false"/></listOfSpecies>
    <listOfReactions>
      <reaction id="R_SK_a" reversible="true" fast="false">
        <listOfReactants><speciesReference species="M_a" constant="true"/></listOfReactants>
      </reaction>
    </listOfReactions>
  </model>
</sbml>"#;
        let model = Model::from_sbml_str(text).unwrap();
        let sink = model.reaction("SK_a").unwrap();
        assert_eq!((sink.lower_bound, sink.upper_bound), (-1000., 1000.));
        assert!(model.objective.is_empty());
    }
}
