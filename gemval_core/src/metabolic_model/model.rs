//! This module provides the Model struct for representing an entire metabolic model
use indexmap::IndexMap;
use log::{debug, warn};
use nalgebra::DVector;
use nalgebra_sparse::coo::CooMatrix;
use nalgebra_sparse::csc::CscMatrix;
use thiserror::Error;

use crate::configuration;
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::{
    BoundaryType, Reaction, ReactionBuilder, ReactionBuilderError,
};
use crate::metabolic_model::solution::Solution;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::{Problem, ProblemError};
use crate::optimize::solvers::{solver_for, Solver, SolverError};

/// Represents a Genome Scale Metabolic Model
///
/// Cloning a model produces a fully independent deep copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    /// Id associated with the Model
    pub id: Option<String>,
    /// Human readable name of the Model
    pub name: Option<String>,
    /// Map of reaction ids to Reactions
    pub reactions: IndexMap<String, Reaction>,
    /// Map of metabolite ids to Metabolites
    pub metabolites: IndexMap<String, Metabolite>,
    /// Map of reaction ids to objective function coefficients
    pub objective: IndexMap<String, f64>,
    /// Whether the objective is maximized or minimized
    pub objective_sense: ObjectiveSense,
    /// Compartments in the model
    ///
    /// An IndexMap<String, String> of {short name: long name}
    pub compartments: IndexMap<String, String>,
    /// A version identifier for the Model, stored as a string
    pub version: Option<String>,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            id: None,
            name: None,
            reactions: IndexMap::new(),
            metabolites: IndexMap::new(),
            objective: IndexMap::new(),
            objective_sense: ObjectiveSense::Maximize,
            compartments: IndexMap::new(),
            version: None,
        }
    }

    // region Adding and Removing
    /// Add a reaction to the model
    ///
    /// Metabolites referenced by the reaction which are not yet part of the model are added
    /// with only their id. A reaction with an existing id replaces the old one in place.
    ///
    /// # Examples
    /// ```rust
    /// use gemval_core::metabolic_model::model::Model;
    /// use gemval_core::metabolic_model::reaction::ReactionBuilder;
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default().id("new_reaction").build().unwrap();
    /// model.add_reaction(new_reaction);
    /// assert_eq!(model.reactions.len(), 1);
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) {
        for met_id in reaction.metabolites.keys() {
            if !self.metabolites.contains_key(met_id) {
                self.metabolites
                    .insert(met_id.clone(), Metabolite::new_id_only(met_id));
            }
        }
        self.reactions.insert(reaction.id.clone(), reaction);
    }

    /// Add a metabolite to the model, replacing any metabolite with the same id
    pub fn add_metabolite(&mut self, metabolite: Metabolite) {
        self.metabolites.insert(metabolite.id.clone(), metabolite);
    }

    /// Remove a reaction (and its objective coefficient) from the model
    ///
    /// The order of the remaining reactions is preserved, metabolites are kept.
    pub fn remove_reaction(&mut self, reaction_id: &str) -> Result<Reaction, ModelError> {
        let reaction = self
            .reactions
            .shift_remove(reaction_id)
            .ok_or_else(|| ModelError::ReactionNotFound(reaction_id.to_string()))?;
        self.objective.shift_remove(reaction_id);
        debug!("Removed reaction {}", reaction_id);
        Ok(reaction)
    }
    // endregion Adding and Removing

    // region Lookup
    pub fn reaction(&self, reaction_id: &str) -> Result<&Reaction, ModelError> {
        self.reactions
            .get(reaction_id)
            .ok_or_else(|| ModelError::ReactionNotFound(reaction_id.to_string()))
    }

    pub fn reaction_mut(&mut self, reaction_id: &str) -> Result<&mut Reaction, ModelError> {
        self.reactions
            .get_mut(reaction_id)
            .ok_or_else(|| ModelError::ReactionNotFound(reaction_id.to_string()))
    }

    pub fn metabolite(&self, metabolite_id: &str) -> Result<&Metabolite, ModelError> {
        self.metabolites
            .get(metabolite_id)
            .ok_or_else(|| ModelError::MetaboliteNotFound(metabolite_id.to_string()))
    }
    // endregion Lookup

    /// Set both flux bounds of a reaction
    pub fn set_bounds(
        &mut self,
        reaction_id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ModelError> {
        if lower_bound > upper_bound {
            return Err(ModelError::InvalidBounds {
                id: reaction_id.to_string(),
                lower_bound,
                upper_bound,
            });
        }
        let reaction = self.reaction_mut(reaction_id)?;
        reaction.lower_bound = lower_bound;
        reaction.upper_bound = upper_bound;
        Ok(())
    }

    // region Objective
    /// Maximize the flux through a single reaction
    pub fn set_objective(&mut self, reaction_id: &str) -> Result<(), ModelError> {
        self.reaction(reaction_id)?;
        self.objective.clear();
        self.objective.insert(reaction_id.to_string(), 1.);
        self.objective_sense = ObjectiveSense::Maximize;
        Ok(())
    }

    /// Ids of the reactions with a non-zero objective coefficient
    pub fn objective_reactions(&self) -> Vec<&str> {
        self.objective
            .iter()
            .filter(|(_, coef)| **coef != 0.)
            .map(|(id, _)| id.as_str())
            .collect()
    }
    // endregion Objective

    // region Boundary Reactions
    /// Ids of all boundary reactions (reactions with a single metabolite), in model order
    pub fn boundary(&self) -> Vec<String> {
        self.reactions
            .values()
            .filter(|r| r.is_boundary())
            .map(|r| r.id.clone())
            .collect()
    }

    /// The compartment representing the environment
    ///
    /// This is `e` when the model has such a compartment, otherwise the compartment holding
    /// the most boundary metabolites.
    pub fn external_compartment(&self) -> Option<String> {
        let has_e = self.compartments.contains_key("e")
            || self
                .metabolites
                .values()
                .any(|m| m.compartment.as_deref() == Some("e"));
        if has_e {
            return Some("e".to_string());
        }
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for reaction in self.reactions.values().filter(|r| r.is_boundary()) {
            for met_id in reaction.metabolites.keys() {
                if let Some(compartment) = self
                    .metabolites
                    .get(met_id)
                    .and_then(|m| m.compartment.as_deref())
                {
                    *counts.entry(compartment).or_insert(0) += 1;
                }
            }
        }
        counts
            .into_iter()
            .max_by_key(|(_, n)| *n)
            .map(|(c, _)| c.to_string())
    }

    /// Classify a boundary reaction, None for reactions which aren't boundaries
    ///
    /// The SBO term or the id prefix decide first; otherwise reactions of external metabolites
    /// are exchanges, reversible ones sinks and the rest demands.
    pub fn boundary_type(&self, reaction: &Reaction) -> Option<BoundaryType> {
        if !reaction.is_boundary() {
            return None;
        }
        if let Some(known) = BoundaryType::of_reaction(reaction) {
            return Some(known);
        }
        let compartment = reaction
            .metabolites
            .keys()
            .next()
            .and_then(|id| self.metabolites.get(id))
            .and_then(|m| m.compartment.clone());
        if compartment.is_some() && compartment == self.external_compartment() {
            Some(BoundaryType::Exchange)
        } else if reaction.lower_bound < 0. {
            Some(BoundaryType::Sink)
        } else {
            Some(BoundaryType::Demand)
        }
    }

    fn boundary_of_type(&self, boundary_type: BoundaryType) -> Vec<String> {
        self.reactions
            .values()
            .filter(|r| self.boundary_type(r) == Some(boundary_type))
            .map(|r| r.id.clone())
            .collect()
    }

    pub fn exchanges(&self) -> Vec<String> {
        self.boundary_of_type(BoundaryType::Exchange)
    }

    pub fn demands(&self) -> Vec<String> {
        self.boundary_of_type(BoundaryType::Demand)
    }

    pub fn sinks(&self) -> Vec<String> {
        self.boundary_of_type(BoundaryType::Sink)
    }

    /// Add a boundary reaction for a metabolite
    ///
    /// The reaction id is the boundary prefix followed by the metabolite id (`SK_956_e`), and
    /// the metabolite is consumed with coefficient 1. Exchanges and sinks get the configured
    /// default bounds, demands can only consume.
    ///
    /// Returns the id of the new reaction.
    pub fn add_boundary(
        &mut self,
        metabolite_id: &str,
        boundary_type: BoundaryType,
    ) -> Result<String, ModelError> {
        let metabolite = self.metabolite(metabolite_id)?.clone();
        if boundary_type == BoundaryType::Exchange {
            let external = self.external_compartment();
            if metabolite.compartment.is_none() || metabolite.compartment != external {
                return Err(ModelError::NotExternalCompartment {
                    metabolite: metabolite.id,
                    compartment: metabolite.compartment,
                    external,
                });
            }
        }
        let reaction_id = format!("{}{}", boundary_type.prefix(), metabolite.id);
        if self.reactions.contains_key(&reaction_id) {
            return Err(ModelError::BoundaryExists(reaction_id));
        }
        let config = configuration::read();
        let lower_bound = match boundary_type {
            BoundaryType::Demand => 0.,
            BoundaryType::Exchange | BoundaryType::Sink => config.lower_bound,
        };
        let reaction = ReactionBuilder::default()
            .id(reaction_id.clone())
            .name(Some(format!("{} {}", metabolite.display_name(), boundary_type)))
            .metabolites(IndexMap::from([(metabolite.id.clone(), -1.)]))
            .lower_bound(lower_bound)
            .upper_bound(config.upper_bound)
            .sbo_term(Some(boundary_type.sbo_term().to_string()))
            .build()?;
        debug!("Added {} reaction {}", boundary_type, reaction_id);
        self.reactions.insert(reaction_id.clone(), reaction);
        Ok(reaction_id)
    }

    /// Run `f` with a temporary boundary reaction attached to a metabolite
    ///
    /// The boundary is removed again once `f` returns, whatever it returned, so the model
    /// ends up with the same reactions and bounds it started with.
    pub fn with_boundary<F, R>(
        &mut self,
        metabolite_id: &str,
        boundary_type: BoundaryType,
        f: F,
    ) -> Result<R, ModelError>
    where
        F: FnOnce(&mut Model) -> R,
    {
        let reaction_id = self.add_boundary(metabolite_id, boundary_type)?;
        let result = f(self);
        if let Err(err) = self.remove_reaction(&reaction_id) {
            warn!("Temporary boundary was already gone: {}", err);
        }
        Ok(result)
    }

    /// Exchange reactions currently allowing uptake, mapped to the maximal uptake rate
    pub fn medium(&self) -> IndexMap<String, f64> {
        let mut medium = IndexMap::new();
        for id in self.exchanges() {
            let reaction = &self.reactions[&id];
            let coefficient = reaction.metabolites.values().next().copied().unwrap_or(-1.);
            let uptake = if coefficient < 0. {
                -reaction.lower_bound
            } else {
                reaction.upper_bound
            };
            if uptake > 0. {
                medium.insert(id, uptake);
            }
        }
        medium
    }
    // endregion Boundary Reactions

    // region Stoichiometry
    /// Stoichiometric matrix with metabolites as rows and reactions as columns, both in model
    /// order
    pub fn stoichiometric_matrix(&self) -> Result<CscMatrix<f64>, ModelError> {
        let mut coo = CooMatrix::new(self.metabolites.len(), self.reactions.len());
        for (col, reaction) in self.reactions.values().enumerate() {
            for (met_id, coefficient) in &reaction.metabolites {
                let row = self
                    .metabolites
                    .get_index_of(met_id)
                    .ok_or_else(|| ModelError::MetaboliteNotFound(met_id.clone()))?;
                coo.push(row, col, *coefficient);
            }
        }
        Ok(CscMatrix::from(&coo))
    }

    /// Net production rate `S v` of every metabolite under the fluxes of a solution
    ///
    /// At steady state every entry is zero up to solver tolerance.
    pub fn mass_balance_residual(&self, solution: &Solution) -> Result<DVector<f64>, ModelError> {
        let stoichiometry = self.stoichiometric_matrix()?;
        let fluxes = DVector::from_iterator(
            self.reactions.len(),
            self.reactions
                .keys()
                .map(|id| solution.flux(id).unwrap_or(0.)),
        );
        let mut residual = DVector::<f64>::zeros(self.metabolites.len());
        for (row, col, coefficient) in stoichiometry.triplet_iter() {
            residual[row] += coefficient * fluxes[col];
        }
        Ok(residual)
    }

    /// Metabolites whose net production under a solution exceeds the configured tolerance
    ///
    /// The tolerance scales with the largest flux magnitude, so fluxes near the default
    /// bounds are held to the same relative accuracy as small ones.
    pub fn unbalanced_metabolites(&self, solution: &Solution) -> Result<Vec<String>, ModelError> {
        let residual = self.mass_balance_residual(solution)?;
        let largest_flux = solution
            .fluxes
            .values()
            .fold(0_f64, |acc, flux| acc.max(flux.abs()));
        let tolerance = configuration::read().tolerance * largest_flux.max(1.);
        Ok(self
            .metabolites
            .keys()
            .zip(residual.iter())
            .filter(|(_, r)| r.abs() > tolerance)
            .map(|(id, _)| id.clone())
            .collect())
    }
    // endregion Stoichiometry

    // region Optimization
    /// Solve the flux balance problem with the configured solver
    pub fn optimize(&self) -> Result<Solution, ModelError> {
        let solver = solver_for(&configuration::read().solver)?;
        self.optimize_with(solver.as_ref())
    }

    /// Solve the flux balance problem with a given solver
    pub fn optimize_with(&self, solver: &dyn Solver) -> Result<Solution, ModelError> {
        if self.objective_reactions().is_empty() {
            warn!("Optimizing a model without an objective");
        }
        let problem = Problem::from_model(self)?;
        let solution = solver.solve(&problem)?;
        debug!(
            "{} solved {} variables, {} constraints: {}",
            solver.name(),
            problem.num_variables(),
            problem.num_constraints(),
            solution.status
        );
        Ok(Solution::from_problem_solution(self, solution))
    }

    /// Only the objective value of [`Model::optimize`], NaN when no optimum exists
    pub fn slim_optimize(&self) -> Result<f64, ModelError> {
        Ok(self.optimize()?.objective_value_or_nan())
    }
    // endregion Optimization
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Reaction {0} is not part of the model")]
    ReactionNotFound(String),
    #[error("Metabolite {0} is not part of the model")]
    MetaboliteNotFound(String),
    #[error("Boundary reaction {0} already exists")]
    BoundaryExists(String),
    #[error("Invalid bounds for {id}: lower bound {lower_bound} > upper bound {upper_bound}")]
    InvalidBounds {
        id: String,
        lower_bound: f64,
        upper_bound: f64,
    },
    #[error("Metabolite {metabolite} is in compartment {compartment:?}, an exchange needs the external compartment {external:?}")]
    NotExternalCompartment {
        metabolite: String,
        compartment: Option<String>,
        external: Option<String>,
    },
    #[error("Unable to build reaction")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
    #[error("Unable to formulate the optimization problem")]
    Problem(#[from] ProblemError),
    #[error("Solver failure")]
    Solver(#[from] SolverError),
}
