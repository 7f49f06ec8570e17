//! Growth scenarios and the runner which evaluates them against a model
use std::fmt::{Display, Formatter};

use log::{debug, info, warn};

use crate::configuration;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::BoundaryType;
use crate::metabolic_model::solution::Solution;
use crate::optimize::solvers::{solver_for, Solver};
use crate::optimize::OptimizationStatus;
use crate::validation::growth::{classify, Growth, GrowthThreshold};
use crate::validation::medium::Medium;
use crate::validation::ValidationError;

/// Extra uptake route opened on top of the medium
#[derive(Clone, Debug, PartialEq)]
pub enum Uptake {
    None,
    /// Lower the lower bound of an existing exchange reaction
    OpenExchange { reaction: String, lower_bound: f64 },
    /// Attach a new boundary reaction to a metabolite for the duration of the check
    AddBoundary {
        metabolite: String,
        boundary_type: BoundaryType,
    },
}

/// Every listed reaction must carry a flux strictly below `below`
///
/// Exchanges consume their metabolite, so a negative bound asks for net uptake.
#[derive(Clone, Debug, PartialEq)]
pub struct FluxExpectation {
    pub reactions: Vec<String>,
    pub below: f64,
}

impl FluxExpectation {
    /// Net uptake of more than `magnitude` through every listed exchange
    pub fn uptake(reactions: &[&str], magnitude: f64) -> Self {
        FluxExpectation {
            reactions: reactions.iter().map(|r| r.to_string()).collect(),
            below: -magnitude,
        }
    }

    fn failures(&self, solution: &Solution) -> Vec<FluxFailure> {
        self.reactions
            .iter()
            .filter_map(|id| {
                let flux = solution.flux(id);
                match flux {
                    Some(value) if value < self.below => None,
                    _ => Some(FluxFailure {
                        reaction: id.clone(),
                        flux,
                        below: self.below,
                    }),
                }
            })
            .collect()
    }
}

/// A flux which missed its expectation, `flux` is None for reactions without a value
#[derive(Clone, Debug, PartialEq)]
pub struct FluxFailure {
    pub reaction: String,
    pub flux: Option<f64>,
    pub below: f64,
}

impl Display for FluxFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.flux {
            Some(flux) => write!(f, "{} = {} (expected < {})", self.reaction, flux, self.below),
            None => write!(f, "{} has no flux (expected < {})", self.reaction, self.below),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Expectation {
    /// Growth (true) or no growth (false)
    Growth(bool),
    /// The problem has no feasible flux distribution at all
    Infeasible,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    /// Reaction whose flux is maximized
    pub objective: String,
    pub uptake: Uptake,
    pub threshold: GrowthThreshold,
    pub expected: Expectation,
    pub flux_expectations: Vec<FluxExpectation>,
}

impl Scenario {
    pub fn growth(
        name: &str,
        objective: &str,
        uptake: Uptake,
        threshold: GrowthThreshold,
        grows: bool,
    ) -> Self {
        Scenario {
            name: name.to_string(),
            description: String::new(),
            objective: objective.to_string(),
            uptake,
            threshold,
            expected: Expectation::Growth(grows),
            flux_expectations: Vec::new(),
        }
    }

    pub fn infeasible(name: &str, objective: &str, uptake: Uptake) -> Self {
        Scenario {
            expected: Expectation::Infeasible,
            ..Scenario::growth(name, objective, uptake, GrowthThreshold::BIOMASS, false)
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_flux_expectation(mut self, expectation: FluxExpectation) -> Self {
        self.flux_expectations.push(expectation);
        self
    }
}

/// Result of running a single scenario
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioOutcome {
    /// Name of the scenario
    pub scenario: String,
    pub expected: Expectation,
    pub status: OptimizationStatus,
    pub objective_value: Option<f64>,
    pub growth: Growth,
    pub passed: bool,
    pub flux_failures: Vec<FluxFailure>,
}

impl Display for ScenarioOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.passed { "passed" } else { "FAILED" };
        write!(f, "{}: {} ({}, {}", self.scenario, verdict, self.status, self.growth)?;
        if let Some(value) = self.objective_value {
            write!(f, ", objective {:.6}", value)?;
        }
        write!(f, ")")?;
        for failure in &self.flux_failures {
            write!(f, "; {}", failure)?;
        }
        Ok(())
    }
}

/// Runs scenarios against copies of a model on a fixed medium
pub struct ScenarioRunner {
    base: Model,
    solver: Box<dyn Solver>,
}

impl ScenarioRunner {
    /// Apply the medium to the model and use the configured solver
    pub fn new(model: Model, medium: &Medium) -> Result<Self, ValidationError> {
        let solver = solver_for(&configuration::read().solver)?;
        ScenarioRunner::with_solver(model, medium, solver)
    }

    pub fn with_solver(
        mut model: Model,
        medium: &Medium,
        solver: Box<dyn Solver>,
    ) -> Result<Self, ValidationError> {
        medium.apply(&mut model)?;
        Ok(ScenarioRunner {
            base: model,
            solver,
        })
    }

    /// The model with the medium applied, scenarios never modify it
    pub fn base(&self) -> &Model {
        &self.base
    }

    /// Optimize towards the scenario objective, while any added boundary is still in place
    fn solve(&self, model: &mut Model, scenario: &Scenario) -> Result<Solution, ValidationError> {
        model.set_objective(&scenario.objective)?;
        let solution = model.optimize_with(self.solver.as_ref())?;
        if solution.status.has_values() {
            let unbalanced = model.unbalanced_metabolites(&solution)?;
            if !unbalanced.is_empty() {
                warn!(
                    "{}: steady state violated for {}",
                    scenario.name,
                    unbalanced.join(", ")
                );
            }
        }
        Ok(solution)
    }

    pub fn run(&self, scenario: &Scenario) -> Result<ScenarioOutcome, ValidationError> {
        let mut model = self.base.clone();
        let solution = match &scenario.uptake {
            Uptake::None => self.solve(&mut model, scenario)?,
            Uptake::OpenExchange {
                reaction,
                lower_bound,
            } => {
                let upper_bound = model.reaction(reaction)?.upper_bound;
                model.set_bounds(reaction, *lower_bound, upper_bound)?;
                self.solve(&mut model, scenario)?
            }
            Uptake::AddBoundary {
                metabolite,
                boundary_type,
            } => model.with_boundary(metabolite, *boundary_type, |m| {
                self.solve(m, scenario)
            })??,
        };
        debug!(
            "{}: {} with objective {:?}",
            scenario.name, solution.status, solution.objective_value
        );

        let growth = classify(&solution, scenario.threshold).inspect_err(|err| {
            warn!("{}: {}", scenario.name, err);
        })?;
        let expectation_met = match scenario.expected {
            Expectation::Growth(grows) => growth == Growth::from_bool(grows),
            Expectation::Infeasible => solution.is_infeasible(),
        };
        let flux_failures: Vec<FluxFailure> = if solution.status.has_values() {
            scenario
                .flux_expectations
                .iter()
                .flat_map(|e| e.failures(&solution))
                .collect()
        } else {
            Vec::new()
        };
        let outcome = ScenarioOutcome {
            scenario: scenario.name.clone(),
            expected: scenario.expected,
            status: solution.status,
            objective_value: solution.objective_value,
            growth,
            passed: expectation_met && flux_failures.is_empty(),
            flux_failures,
        };
        if outcome.passed {
            info!("{}", outcome);
        } else {
            warn!("{}", outcome);
        }
        Ok(outcome)
    }

    /// Run scenarios in order, stopping at the first one which can't be evaluated
    pub fn run_all(&self, scenarios: &[Scenario]) -> Result<Vec<ScenarioOutcome>, ValidationError> {
        scenarios.iter().map(|s| self.run(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::metabolite::MetaboliteBuilder;
    use crate::metabolic_model::reaction::ReactionBuilder;
    use indexmap::IndexMap;

    /// Substrate `s_e` can only enter through an exchange, `t_c` is a dead end
    fn toy_model() -> Model {
        let mut model = Model::new_empty();
        for (id, compartment) in [("s_e", "e"), ("s_c", "c"), ("bio_c", "c"), ("t_c", "c")] {
            model.add_metabolite(
                MetaboliteBuilder::default()
                    .id(id)
                    .compartment(Some(compartment.to_string()))
                    .build()
                    .unwrap(),
            );
        }
        let reaction = |id: &str, mets: &[(&str, f64)]| {
            ReactionBuilder::default()
                .id(id)
                .metabolites(mets.iter().map(|(m, c)| (m.to_string(), *c)).collect::<IndexMap<_, _>>())
                .lower_bound(0.)
                .upper_bound(1000.)
                .build()
                .unwrap()
        };
        model.add_reaction(reaction("EX_s_e", &[("s_e", -1.)]));
        model.add_reaction(reaction("T_s", &[("s_e", -1.), ("s_c", 1.)]));
        model.add_reaction(reaction("GROW", &[("s_c", -2.), ("bio_c", 1.)]));
        model.add_reaction(reaction("DM_bio_c", &[("bio_c", -1.)]));
        model
    }

    fn medium() -> Medium {
        Medium {
            open_upper: vec!["DM_bio_c".to_string()],
            open_both: Vec::new(),
            bound: 1000.,
        }
    }

    #[test]
    fn runner_applies_medium_once() {
        let runner = ScenarioRunner::new(toy_model(), &medium()).unwrap();
        let exchange = runner.base().reaction("EX_s_e").unwrap();
        assert_eq!((exchange.lower_bound, exchange.upper_bound), (0., 0.));
    }

    #[test]
    fn open_exchange_grows() {
        let runner = ScenarioRunner::new(toy_model(), &medium()).unwrap();
        let scenario = Scenario::growth(
            "substrate",
            "GROW",
            Uptake::OpenExchange {
                reaction: "EX_s_e".to_string(),
                lower_bound: -10.,
            },
            GrowthThreshold::SYNTHESIS,
            true,
        )
        .with_flux_expectation(FluxExpectation::uptake(&["EX_s_e"], 1.));
        let outcome = runner.run(&scenario).unwrap();
        assert!(outcome.passed, "{}", outcome);
        assert!((outcome.objective_value.unwrap() - 5.).abs() < 1e-4);
        // The base model is untouched
        assert_eq!(runner.base().reaction("EX_s_e").unwrap().lower_bound, 0.);
    }

    #[test]
    fn flux_expectation_failure() {
        let runner = ScenarioRunner::new(toy_model(), &medium()).unwrap();
        let scenario = Scenario::growth(
            "substrate",
            "GROW",
            Uptake::OpenExchange {
                reaction: "EX_s_e".to_string(),
                lower_bound: -10.,
            },
            GrowthThreshold::SYNTHESIS,
            true,
        )
        .with_flux_expectation(FluxExpectation::uptake(&["EX_s_e"], 20.));
        let outcome = runner.run(&scenario).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.growth, Growth::Present);
        assert_eq!(outcome.flux_failures.len(), 1);
        assert_eq!(outcome.flux_failures[0].reaction, "EX_s_e");
    }

    #[test]
    fn sinks_are_scoped_to_the_scenario() {
        let runner = ScenarioRunner::new(toy_model(), &medium()).unwrap();
        let grows = Scenario::growth(
            "sink_s_c",
            "GROW",
            Uptake::AddBoundary {
                metabolite: "s_c".to_string(),
                boundary_type: BoundaryType::Sink,
            },
            GrowthThreshold::BIOLOG,
            true,
        );
        let dead_end = Scenario::growth(
            "sink_t_c",
            "GROW",
            Uptake::AddBoundary {
                metabolite: "t_c".to_string(),
                boundary_type: BoundaryType::Sink,
            },
            GrowthThreshold::SYNTHESIS,
            false,
        );
        let outcomes = runner.run_all(&[grows, dead_end]).unwrap();
        assert!(outcomes.iter().all(|o| o.passed));
        assert_eq!(outcomes[0].growth, Growth::Present);
        assert_eq!(outcomes[1].growth, Growth::Absent);
        assert!(!runner.base().reactions.contains_key("SK_s_c"));
    }

    #[test]
    fn demand_objective() {
        let runner = ScenarioRunner::new(toy_model(), &medium()).unwrap();
        // Demand on the substrate itself, no uptake route means no flux
        let scenario = Scenario::growth(
            "demand_s_c",
            "DM_s_c",
            Uptake::AddBoundary {
                metabolite: "s_c".to_string(),
                boundary_type: BoundaryType::Demand,
            },
            GrowthThreshold::SYNTHESIS,
            false,
        );
        let outcome = runner.run(&scenario).unwrap();
        assert_eq!(outcome.status, OptimizationStatus::Optimal);
        assert!(outcome.passed);
    }

    #[test]
    fn infeasible_expectation() {
        let mut model = toy_model();
        model.set_bounds("GROW", 1., 1000.).unwrap();
        let runner = ScenarioRunner::new(model, &medium()).unwrap();
        let scenario = Scenario::infeasible("forced_growth", "GROW", Uptake::None);
        let outcome = runner.run(&scenario).unwrap();
        assert_eq!(outcome.status, OptimizationStatus::Infeasible);
        assert_eq!(outcome.growth, Growth::Absent);
        assert!(outcome.passed);
    }

    #[test]
    fn unknown_objective_is_an_error() {
        let runner = ScenarioRunner::new(toy_model(), &medium()).unwrap();
        let scenario = Scenario::growth("missing", "NOPE", Uptake::None, GrowthThreshold::BIOMASS, true);
        assert!(matches!(runner.run(&scenario), Err(ValidationError::Model(_))));
    }
}
