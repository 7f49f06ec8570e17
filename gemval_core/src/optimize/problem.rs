//! Provides struct representing an optimization problem, and the flux balance formulation
//! of a [`Model`]
use crate::metabolic_model::model::{Model, ModelError};
use crate::optimize::constraint::Constraint;
use crate::optimize::objective::{Objective, ObjectiveSense};
use crate::optimize::variable::Variable;
use indexmap::IndexMap;
use thiserror::Error;

/// A linear optimization problem over continuous variables
#[derive(Debug, Clone)]
pub struct Problem {
    /// Objective to optimize
    objective: Objective,
    /// Variables of the optimization problem, in column order
    variables: IndexMap<String, Variable>,
    /// Constraints of the optimization problem
    constraints: IndexMap<String, Constraint>,
}

impl Problem {
    // region Creation Functions
    /// Create a new optimization problem
    pub fn new(objective_sense: ObjectiveSense) -> Self {
        Self {
            objective: Objective::new(objective_sense),
            variables: IndexMap::new(),
            constraints: IndexMap::new(),
        }
    }

    /// Create a new maximization problem
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization problem
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }
    // endregion Creation Functions

    // region Adding Variables
    /// Create a new continuous variable and add it to the optimization problem
    ///
    /// Returns the column index of the new variable.
    pub fn add_new_variable(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<usize, ProblemError> {
        if self.variables.contains_key(id) {
            return Err(ProblemError::VariableIdAlreadyExists(id.to_string()));
        }
        if lower_bound > upper_bound || lower_bound.is_nan() || upper_bound.is_nan() {
            return Err(ProblemError::InvalidVariableBounds(id.to_string()));
        }
        let index = self.variables.len();
        self.variables
            .insert(id.to_string(), Variable::new(id, lower_bound, upper_bound, index));
        Ok(index)
    }
    // endregion Adding Variables

    // region Adding Constraints
    /// Add a constraint to the problem
    pub fn add_constraint(&mut self, id: &str, constraint: Constraint) -> Result<(), ProblemError> {
        self.validate_constraint(id, &constraint)?;
        self.constraints.insert(id.to_string(), constraint);
        Ok(())
    }

    /// Create a new equality constraint and add it to the model
    pub fn add_new_equality_constraint(
        &mut self,
        id: &str,
        variables: &[usize],
        coefficients: &[f64],
        equals: f64,
    ) -> Result<(), ProblemError> {
        self.add_constraint(id, Constraint::new_equality(variables, coefficients, equals))
    }

    /// Create a new equality constraint using variable ids rather than column indices
    pub fn add_new_equality_constraint_by_id(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        equals: f64,
    ) -> Result<(), ProblemError> {
        let variables = self.indices_of(variables)?;
        self.add_new_equality_constraint(id, &variables, coefficients, equals)
    }

    /// Create a new inequality constraint using variable ids rather than column indices
    pub fn add_new_inequality_constraint_by_id(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        let variables = self.indices_of(variables)?;
        self.add_constraint(
            id,
            Constraint::new_inequality(&variables, coefficients, lower_bound, upper_bound),
        )
    }
    // endregion Adding Constraints

    /// Add a new linear term to the objective using the variable id
    pub fn add_new_linear_objective_term_by_id(
        &mut self,
        variable_id: &str,
        coefficient: f64,
    ) -> Result<(), ProblemError> {
        let index = match self.variables.get(variable_id) {
            Some(variable) => variable.index,
            None => return Err(ProblemError::NonExistentVariablesInObjective),
        };
        self.objective.add_term(index, coefficient);
        Ok(())
    }

    // region Accessors
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    pub fn variable(&self, id: &str) -> Option<&Variable> {
        self.variables.get(id)
    }

    pub fn constraints(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.constraints.iter().map(|(id, c)| (id.as_str(), c))
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
    // endregion Accessors

    // region Validation Functions
    fn indices_of(&self, ids: &[&str]) -> Result<Vec<usize>, ProblemError> {
        ids.iter()
            .map(|id| {
                self.variables
                    .get(*id)
                    .map(|v| v.index)
                    .ok_or(ProblemError::NonExistentVariablesInConstraint)
            })
            .collect()
    }

    /// Check that a constraint to be added is valid to add to this Problem
    fn validate_constraint(&self, id: &str, constraint: &Constraint) -> Result<(), ProblemError> {
        if self.constraints.contains_key(id) {
            return Err(ProblemError::ConstraintAlreadyExists(id.to_string()));
        }
        if let Constraint::Inequality {
            lower_bound,
            upper_bound,
            ..
        } = constraint
        {
            if lower_bound > upper_bound {
                return Err(ProblemError::InvalidConstraintBounds(id.to_string()));
            }
        }
        if constraint
            .terms()
            .iter()
            .any(|t| t.variable >= self.variables.len())
        {
            return Err(ProblemError::NonExistentVariablesInConstraint);
        }
        Ok(())
    }
    // endregion Validation Functions
}

// region Flux Balance Formulation
impl Problem {
    /// Formulate the flux balance analysis problem of a model
    ///
    /// Every reaction is split into a forward and a reverse variable, both non-negative, so that
    /// the flux is `forward - reverse`. Each metabolite taking part in at least one reaction
    /// contributes a steady state constraint `S v = 0`.
    pub fn from_model(model: &Model) -> Result<Problem, ModelError> {
        let mut problem = Problem::new(model.objective_sense);
        let mut columns: Vec<(usize, usize)> = Vec::with_capacity(model.reactions.len());
        for reaction in model.reactions.values() {
            let (forward_lb, forward_ub) = reaction.forward_bounds();
            let (reverse_lb, reverse_ub) = reaction.reverse_bounds();
            let forward = problem.add_new_variable(&reaction.get_forward_id(), forward_lb, forward_ub)?;
            let reverse = problem.add_new_variable(&reaction.get_reverse_id(), reverse_lb, reverse_ub)?;
            columns.push((forward, reverse));
        }

        let stoichiometry = model.stoichiometric_matrix()?;
        let mut rows: Vec<(Vec<usize>, Vec<f64>)> = vec![(Vec::new(), Vec::new()); model.metabolites.len()];
        for (row, col, coefficient) in stoichiometry.triplet_iter() {
            if *coefficient == 0. {
                continue;
            }
            let (forward, reverse) = columns[col];
            let (vars, coefs) = &mut rows[row];
            vars.extend([forward, reverse]);
            coefs.extend([*coefficient, -*coefficient]);
        }
        for (met_id, (vars, coefs)) in model.metabolites.keys().zip(rows) {
            // Metabolites which no reaction touches only add empty rows
            if vars.is_empty() {
                continue;
            }
            problem.add_new_equality_constraint(met_id, &vars, &coefs, 0.)?;
        }

        for (reaction_id, coefficient) in &model.objective {
            let index = model
                .reactions
                .get_index_of(reaction_id)
                .ok_or_else(|| ModelError::ReactionNotFound(reaction_id.clone()))?;
            let (forward, reverse) = columns[index];
            problem.objective.add_term(forward, *coefficient);
            problem.objective.add_term(reverse, -*coefficient);
        }
        Ok(problem)
    }
}
// endregion Flux Balance Formulation

/// Errors associated with the Problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add variable {0} with the same id as an existing variable")]
    VariableIdAlreadyExists(String),
    /// Error when trying to add variable with invalid bounds
    #[error("Tried to give variable {0} a lower_bound > upper_bound")]
    InvalidVariableBounds(String),
    /// Error when trying to add a constraint with the same id as an existing constraint
    #[error("Tried to add constraint {0} with the same id as an existing constraint")]
    ConstraintAlreadyExists(String),
    /// Error when trying to add a constraint with invalid bounds
    #[error("Tried to add inequality constraint {0} with lower_bound > upper_bound")]
    InvalidConstraintBounds(String),
    /// Error when trying to add a constraint that contains variables not in the model
    #[error("Tried to add a constraint with variables not in the problem")]
    NonExistentVariablesInConstraint,
    /// Error when trying to add an objective term which includes variables not in the model
    #[error("Tried adding an objective term with variables not in the problem")]
    NonExistentVariablesInObjective,
}
