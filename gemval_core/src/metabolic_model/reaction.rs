//! This module provides a struct for representing reactions
use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use indexmap::IndexMap;

use crate::utils::hash_as_hex_string;

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Reaction {
    /// Used to identify the reaction
    #[builder(setter(into))]
    pub id: String,
    /// Metabolite stoichiometry of the reaction, negative coefficients are consumed
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Lower flux bound
    #[builder(default = "crate::configuration::read().lower_bound")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "crate::configuration::read().upper_bound")]
    pub upper_bound: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
    /// Systems Biology Ontology term, e.g. `SBO:0000627` for exchanges
    #[builder(default = "None")]
    pub sbo_term: Option<String>,
    /// Notes about the reaction
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Reaction Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Reaction {
    /// Determine the id to be associated with the forward reaction in the optimization problem
    ///
    /// # Note:
    /// The forward id is "{reaction_id}_forward"
    pub fn get_forward_id(&self) -> String {
        format!("{}_forward", &self.id)
    }

    /// Determine the id to be associated with the reverse reaction in the optimization problem
    ///
    /// # Note:
    /// The reverse id is "{reaction_id}_reverse_{hexidecimal hash of reaction_id}"
    pub fn get_reverse_id(&self) -> String {
        format!("{}_reverse_{}", &self.id, hash_as_hex_string(&self.id))
    }

    /// Lower and upper bound of the forward half of the reaction
    pub(crate) fn forward_bounds(&self) -> (f64, f64) {
        (self.lower_bound.max(0.), self.upper_bound.max(0.))
    }

    /// Lower and upper bound of the reverse half of the reaction
    pub(crate) fn reverse_bounds(&self) -> (f64, f64) {
        ((-self.upper_bound).max(0.), (-self.lower_bound).max(0.))
    }

    /// A boundary reaction has exactly one participating metabolite
    pub fn is_boundary(&self) -> bool {
        self.metabolites.len() == 1
    }

    /// Whether the reaction can carry flux in the reverse direction
    pub fn is_reversible(&self) -> bool {
        self.lower_bound < 0. && self.upper_bound > 0.
    }

}

impl Display for Reaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let side = |coefs: Vec<(&String, f64)>| {
            coefs
                .into_iter()
                .map(|(id, c)| {
                    if (c - 1.).abs() < f64::EPSILON {
                        id.to_string()
                    } else {
                        format!("{} {}", c, id)
                    }
                })
                .collect::<Vec<_>>()
                .join(" + ")
        };
        let left = side(
            self.metabolites
                .iter()
                .filter(|(_, c)| **c < 0.)
                .map(|(id, c)| (id, -c))
                .collect(),
        );
        let right = side(
            self.metabolites
                .iter()
                .filter(|(_, c)| **c > 0.)
                .map(|(id, c)| (id, *c))
                .collect(),
        );
        let arrow = if self.is_reversible() {
            "<=>"
        } else if self.upper_bound <= 0. && self.lower_bound < 0. {
            "<--"
        } else {
            "-->"
        };
        write!(f, "{}: {} {} {}", self.id, left, arrow, right)
    }
}

/// Kinds of boundary reaction which can be attached to a metabolite
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryType {
    /// Reversible exchange of an extracellular metabolite with the environment
    Exchange,
    /// Irreversible consumption of a metabolite
    Demand,
    /// Reversible supply or consumption of an intracellular metabolite
    Sink,
}

impl BoundaryType {
    /// Prefix used for generated reaction ids
    pub fn prefix(&self) -> &'static str {
        match self {
            BoundaryType::Exchange => "EX_",
            BoundaryType::Demand => "DM_",
            BoundaryType::Sink => "SK_",
        }
    }

    /// SBO term attached to generated reactions
    pub fn sbo_term(&self) -> &'static str {
        match self {
            BoundaryType::Exchange => "SBO:0000627",
            BoundaryType::Demand => "SBO:0000628",
            BoundaryType::Sink => "SBO:0000632",
        }
    }

    /// Guess the boundary type of a reaction from its SBO term or id prefix
    pub fn of_reaction(reaction: &Reaction) -> Option<BoundaryType> {
        if !reaction.is_boundary() {
            return None;
        }
        let all = [BoundaryType::Exchange, BoundaryType::Demand, BoundaryType::Sink];
        if let Some(sbo) = reaction.sbo_term.as_deref() {
            if let Some(found) = all.iter().find(|t| t.sbo_term() == sbo) {
                return Some(*found);
            }
        }
        all.into_iter().find(|t| reaction.id.starts_with(t.prefix()))
    }
}

impl Display for BoundaryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryType::Exchange => write!(f, "exchange"),
            BoundaryType::Demand => write!(f, "demand"),
            BoundaryType::Sink => write!(f, "sink"),
        }
    }
}
