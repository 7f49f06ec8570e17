//! Growth media expressed as open boundary reactions
use log::debug;

use crate::metabolic_model::model::{Model, ModelError};

/// Boundary reactions left open once every other boundary is closed
#[derive(Clone, Debug, PartialEq)]
pub struct Medium {
    /// Reactions which may only carry positive flux (secretion through demands)
    pub open_upper: Vec<String>,
    /// Reactions open in both directions
    pub open_both: Vec<String>,
    /// Magnitude of the opened bounds
    pub bound: f64,
}

impl Medium {
    /// Minimal medium without a carbon source
    ///
    /// Biomass, the byproducts `1059_m`, `148_c` and `1111_e` can be drained, and the
    /// inorganic exchanges (`1407_e`, `1782_e`, oxygen `1503_e`, CO2 `1665_e`, ammonium
    /// `1544_e`, `118_e`, sulfate `44_e`, phosphate `1653_e`) are open.
    pub fn minimal() -> Self {
        Medium {
            open_upper: ["DM_Biomass_c", "DM_1059_m", "DM_148_c", "DM_1111_e"]
                .map(String::from)
                .to_vec(),
            open_both: [
                "EX_1407_e",
                "EX_1782_e",
                "EX_1503_e",
                "EX_1665_e",
                "EX_1544_e",
                "EX_118_e",
                "EX_44_e",
                "EX_1653_e",
            ]
            .map(String::from)
            .to_vec(),
            bound: 1000.,
        }
    }

    /// Minimal medium with D-glucose (`EX_956_e`) as carbon source
    pub fn minimal_glucose() -> Self {
        Medium::minimal().with_exchange("EX_956_e")
    }

    /// Add a reaction open in both directions
    pub fn with_exchange(mut self, reaction_id: &str) -> Self {
        if !self.open_both.iter().any(|id| id == reaction_id) {
            self.open_both.push(reaction_id.to_string());
        }
        self
    }

    /// Close every boundary reaction of the model, then open the medium
    ///
    /// Fails on the first medium reaction the model doesn't have.
    pub fn apply(&self, model: &mut Model) -> Result<(), ModelError> {
        let boundary = model.boundary();
        for id in &boundary {
            model.set_bounds(id, 0., 0.)?;
        }
        for id in &self.open_upper {
            model.set_bounds(id, 0., self.bound)?;
        }
        for id in &self.open_both {
            model.set_bounds(id, -self.bound, self.bound)?;
        }
        debug!(
            "Closed {} boundary reactions, opened {} for the medium",
            boundary.len(),
            self.open_upper.len() + self.open_both.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::metabolite::MetaboliteBuilder;
    use crate::metabolic_model::reaction::BoundaryType;

    fn model_with(exchanges: &[&str], demands: &[&str]) -> Model {
        let mut model = Model::new_empty();
        for met in exchanges {
            model.add_metabolite(
                MetaboliteBuilder::default()
                    .id(*met)
                    .compartment(Some("e".to_string()))
                    .build()
                    .unwrap(),
            );
            model.add_boundary(met, BoundaryType::Exchange).unwrap();
        }
        for met in demands {
            model.add_metabolite(
                MetaboliteBuilder::default()
                    .id(*met)
                    .compartment(Some("c".to_string()))
                    .build()
                    .unwrap(),
            );
            model.add_boundary(met, BoundaryType::Demand).unwrap();
        }
        model
    }

    #[test]
    fn glucose_medium_extends_minimal() {
        let medium = Medium::minimal_glucose();
        assert_eq!(medium.open_both.len(), 9);
        assert_eq!(medium.open_both.last().map(String::as_str), Some("EX_956_e"));
        assert_eq!(medium.open_upper, Medium::minimal().open_upper);
        assert_eq!(Medium::minimal_glucose().with_exchange("EX_956_e"), medium);
    }

    #[test]
    fn apply_closes_everything_else() {
        let mut model = model_with(&["a_e", "b_e"], &["x_c", "y_c"]);
        let medium = Medium {
            open_upper: vec!["DM_x_c".to_string()],
            open_both: vec!["EX_a_e".to_string()],
            bound: 500.,
        };
        medium.apply(&mut model).unwrap();
        let bounds = |id: &str| {
            let r = model.reaction(id).unwrap();
            (r.lower_bound, r.upper_bound)
        };
        assert_eq!(bounds("EX_a_e"), (-500., 500.));
        assert_eq!(bounds("EX_b_e"), (0., 0.));
        assert_eq!(bounds("DM_x_c"), (0., 500.));
        assert_eq!(bounds("DM_y_c"), (0., 0.));
        assert_eq!(model.medium().keys().collect::<Vec<_>>(), vec!["EX_a_e"]);
    }

    #[test]
    fn unknown_medium_reaction() {
        let mut model = model_with(&["a_e"], &[]);
        assert!(matches!(
            Medium::minimal().apply(&mut model),
            Err(ModelError::ReactionNotFound(_))
        ));
    }
}
