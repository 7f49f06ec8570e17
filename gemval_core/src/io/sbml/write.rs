use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;

use indexmap::IndexMap;
use log::info;

use crate::configuration;
use crate::io::sbml::{
    SbmlError, DEFAULT_LB_ID, DEFAULT_UB_ID, FBC_V2, REACTION_PREFIX, SBML_L3V1,
    SPECIES_PREFIX, ZERO_BOUND_ID,
};
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::Reaction;
use crate::optimize::objective::ObjectiveSense;
use crate::utils::escape_xml;

/// Numbers as SBML writes them, infinities become `INF`/`-INF`
fn format_number(value: f64) -> String {
    if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        format!("{}", value)
    }
}

impl Model {
    pub fn write_sbml<P: AsRef<Path>>(&self, path: P) -> Result<(), SbmlError> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        self.write_as_sbml(&mut out)?;
        out.flush()?;
        info!("Wrote SBML model to {}", path.display());
        Ok(())
    }

    pub fn to_sbml(&self) -> Result<String, SbmlError> {
        let mut buffer: Vec<u8> = Vec::new();
        self.write_as_sbml(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Write the model as an SBML Level 3 Version 1 document with FBC version 2
    pub fn write_as_sbml(&self, out: &mut dyn Write) -> Result<(), Error> {
        let bounds = BoundParameters::new(self);
        writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(
            out,
            "<sbml xmlns=\"{}\" xmlns:fbc=\"{}\" level=\"3\" version=\"1\" fbc:required=\"false\">",
            SBML_L3V1, FBC_V2
        )?;
        write!(out, "  <model")?;
        if let Some(id) = &self.id {
            write!(out, " id=\"{}\"", escape_xml(id))?;
        }
        if let Some(name) = &self.name {
            write!(out, " name=\"{}\"", escape_xml(name))?;
        }
        writeln!(out, " fbc:strict=\"true\">")?;
        self.write_compartments(out)?;
        self.write_species(out)?;
        bounds.write(out)?;
        self.write_reactions(out, &bounds)?;
        self.write_objective(out)?;
        writeln!(out, "  </model>")?;
        writeln!(out, "</sbml>")?;
        Ok(())
    }

    fn write_compartments(&self, out: &mut dyn Write) -> Result<(), Error> {
        if self.compartments.is_empty() {
            return Ok(());
        }
        writeln!(out, "    <listOfCompartments>")?;
        for (id, name) in &self.compartments {
            writeln!(
                out,
                "      <compartment id=\"{}\" name=\"{}\" constant=\"true\"/>",
                escape_xml(id),
                escape_xml(name)
            )?;
        }
        writeln!(out, "    </listOfCompartments>")?;
        Ok(())
    }

    fn write_species(&self, out: &mut dyn Write) -> Result<(), Error> {
        if self.metabolites.is_empty() {
            return Ok(());
        }
        writeln!(out, "    <listOfSpecies>")?;
        for metabolite in self.metabolites.values() {
            write!(
                out,
                "      <species id=\"{}{}\"",
                SPECIES_PREFIX,
                escape_xml(&metabolite.id)
            )?;
            if let Some(name) = &metabolite.name {
                write!(out, " name=\"{}\"", escape_xml(name))?;
            }
            if let Some(compartment) = &metabolite.compartment {
                write!(out, " compartment=\"{}\"", escape_xml(compartment))?;
            }
            write!(
                out,
                " hasOnlySubstanceUnits=\"false\" boundaryCondition=\"false\" constant=\"false\" fbc:charge=\"{}\"",
                metabolite.charge
            )?;
            if let Some(formula) = &metabolite.formula {
                write!(out, " fbc:chemicalFormula=\"{}\"", escape_xml(formula))?;
            }
            writeln!(out, "/>")?;
        }
        writeln!(out, "    </listOfSpecies>")?;
        Ok(())
    }

    fn write_reactions(&self, out: &mut dyn Write, bounds: &BoundParameters) -> Result<(), Error> {
        if self.reactions.is_empty() {
            return Ok(());
        }
        writeln!(out, "    <listOfReactions>")?;
        for reaction in self.reactions.values() {
            let (lower, upper) = bounds.of(reaction);
            write!(
                out,
                "      <reaction id=\"{}{}\"",
                REACTION_PREFIX,
                escape_xml(&reaction.id)
            )?;
            if let Some(name) = &reaction.name {
                write!(out, " name=\"{}\"", escape_xml(name))?;
            }
            if let Some(sbo) = &reaction.sbo_term {
                write!(out, " sboTerm=\"{}\"", escape_xml(sbo))?;
            }
            writeln!(
                out,
                " reversible=\"{}\" fast=\"false\" fbc:lowerFluxBound=\"{}\" fbc:upperFluxBound=\"{}\">",
                reaction.lower_bound < 0.,
                escape_xml(&lower),
                escape_xml(&upper)
            )?;
            write_species_references(
                out,
                "listOfReactants",
                reaction
                    .metabolites
                    .iter()
                    .filter(|(_, c)| **c < 0.)
                    .map(|(id, c)| (id, -c)),
            )?;
            write_species_references(
                out,
                "listOfProducts",
                reaction
                    .metabolites
                    .iter()
                    .filter(|(_, c)| **c > 0.)
                    .map(|(id, c)| (id, *c)),
            )?;
            writeln!(out, "      </reaction>")?;
        }
        writeln!(out, "    </listOfReactions>")?;
        Ok(())
    }

    fn write_objective(&self, out: &mut dyn Write) -> Result<(), Error> {
        if self.objective.is_empty() {
            return Ok(());
        }
        let sense = match self.objective_sense {
            ObjectiveSense::Maximize => "maximize",
            ObjectiveSense::Minimize => "minimize",
        };
        writeln!(out, "    <fbc:listOfObjectives fbc:activeObjective=\"obj\">")?;
        writeln!(out, "      <fbc:objective fbc:id=\"obj\" fbc:type=\"{}\">", sense)?;
        writeln!(out, "        <fbc:listOfFluxObjectives>")?;
        for (reaction_id, coefficient) in &self.objective {
            writeln!(
                out,
                "          <fbc:fluxObjective fbc:reaction=\"{}{}\" fbc:coefficient=\"{}\"/>",
                REACTION_PREFIX,
                escape_xml(reaction_id),
                format_number(*coefficient)
            )?;
        }
        writeln!(out, "        </fbc:listOfFluxObjectives>")?;
        writeln!(out, "      </fbc:objective>")?;
        writeln!(out, "    </fbc:listOfObjectives>")?;
        Ok(())
    }
}

fn write_species_references<'a>(
    out: &mut dyn Write,
    list: &str,
    references: impl Iterator<Item = (&'a String, f64)>,
) -> Result<(), Error> {
    let mut references = references.peekable();
    if references.peek().is_none() {
        return Ok(());
    }
    writeln!(out, "        <{}>", list)?;
    for (species, stoichiometry) in references {
        writeln!(
            out,
            "          <speciesReference species=\"{}{}\" stoichiometry=\"{}\" constant=\"true\"/>",
            SPECIES_PREFIX,
            escape_xml(species),
            format_number(stoichiometry)
        )?;
    }
    writeln!(out, "        </{}>", list)?;
    Ok(())
}

/// Flux bound parameters of a model
///
/// The configured default bounds and zero share one parameter each, every other bound gets a
/// parameter named after its reaction.
struct BoundParameters {
    parameters: IndexMap<String, f64>,
    default_lb: f64,
    default_ub: f64,
}

impl BoundParameters {
    fn new(model: &Model) -> Self {
        let config = configuration::read();
        let mut bounds = BoundParameters {
            parameters: IndexMap::from([
                (DEFAULT_LB_ID.to_string(), config.lower_bound),
                (DEFAULT_UB_ID.to_string(), config.upper_bound),
                (ZERO_BOUND_ID.to_string(), 0.),
            ]),
            default_lb: config.lower_bound,
            default_ub: config.upper_bound,
        };
        for reaction in model.reactions.values() {
            let (lower, upper) = bounds.of(reaction);
            bounds.parameters.entry(lower).or_insert(reaction.lower_bound);
            bounds.parameters.entry(upper).or_insert(reaction.upper_bound);
        }
        bounds
    }

    fn shared(&self, value: f64) -> Option<&'static str> {
        if value == self.default_lb {
            Some(DEFAULT_LB_ID)
        } else if value == self.default_ub {
            Some(DEFAULT_UB_ID)
        } else if value == 0. {
            Some(ZERO_BOUND_ID)
        } else {
            None
        }
    }

    /// Parameter ids of the lower and upper bound of a reaction
    fn of(&self, reaction: &Reaction) -> (String, String) {
        let lower = self
            .shared(reaction.lower_bound)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}{}_lower_bound", REACTION_PREFIX, reaction.id));
        let upper = self
            .shared(reaction.upper_bound)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}{}_upper_bound", REACTION_PREFIX, reaction.id));
        (lower, upper)
    }

    fn write(&self, out: &mut dyn Write) -> Result<(), Error> {
        writeln!(out, "    <listOfParameters>")?;
        for (id, value) in &self.parameters {
            writeln!(
                out,
                "      <parameter id=\"{}\" value=\"{}\" sboTerm=\"SBO:0000626\" constant=\"true\"/>",
                escape_xml(id),
                format_number(*value)
            )?;
        }
        writeln!(out, "    </listOfParameters>")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::metabolite::MetaboliteBuilder;
    use crate::metabolic_model::reaction::{BoundaryType, ReactionBuilder};
    use pretty_assertions::assert_eq;

    fn small_model() -> Model {
        let mut model = Model::new_empty();
        model.id = Some("small".to_string());
        model.compartments.insert("c".to_string(), "cytosol".to_string());
        model.compartments.insert("e".to_string(), "extracellular".to_string());
        for (id, name, compartment) in [
            ("956_e", "D-glucose", "e"),
            ("956_c", "D-glucose", "c"),
            ("pyr_c", "pyruvate & co", "c"),
        ] {
            model.add_metabolite(
                MetaboliteBuilder::default()
                    .id(id)
                    .name(Some(name.to_string()))
                    .compartment(Some(compartment.to_string()))
                    .build()
                    .unwrap(),
            );
        }
        model
            .add_boundary("956_e", BoundaryType::Exchange)
            .unwrap();
        model.set_bounds("EX_956_e", -10., 1000.).unwrap();
        model.add_reaction(
            ReactionBuilder::default()
                .id("T_glc")
                .metabolites(IndexMap::from([
                    ("956_e".to_string(), -1.),
                    ("956_c".to_string(), 1.),
                ]))
                .lower_bound(0.)
                .upper_bound(f64::INFINITY)
                .build()
                .unwrap(),
        );
        model.add_reaction(
            ReactionBuilder::default()
                .id("GLYC")
                .name(Some("glycolysis".to_string()))
                .metabolites(IndexMap::from([
                    ("956_c".to_string(), -1.),
                    ("pyr_c".to_string(), 2.5),
                ]))
                .lower_bound(0.)
                .upper_bound(1000.)
                .build()
                .unwrap(),
        );
        model.add_boundary("pyr_c", BoundaryType::Demand).unwrap();
        model.set_objective("DM_pyr_c").unwrap();
        model
    }

    #[test]
    fn written_document_reads_back() {
        let model = small_model();
        let text = model.to_sbml().unwrap();
        let reread = Model::from_sbml_str(&text).unwrap();
        assert_eq!(reread, model);
    }

    #[test]
    fn bound_parameters() {
        let text = small_model().to_sbml().unwrap();
        assert!(text.contains("<parameter id=\"R_EX_956_e_lower_bound\" value=\"-10\""));
        assert!(text.contains("<parameter id=\"R_T_glc_upper_bound\" value=\"INF\""));
        assert!(text.contains("fbc:lowerFluxBound=\"cobra_0_bound\" fbc:upperFluxBound=\"cobra_default_ub\""));
        assert!(text.contains("name=\"pyruvate &amp; co\""));
        assert!(text.contains("<species id=\"M_956_e\""));
        assert!(text.contains("fbc:reaction=\"R_DM_pyr_c\""));
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.xml");
        let model = small_model();
        model.write_sbml(&path).unwrap();
        assert_eq!(Model::read_sbml(&path).unwrap(), model);
    }
}
