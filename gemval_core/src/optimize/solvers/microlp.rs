//! Solver interface for the microlp simplex solver

use indexmap::IndexMap;
use log::debug;
use microlp::{ComparisonOp, Error as MicrolpError, OptimizationDirection, Variable as LpVariable};

use crate::optimize::constraint::Constraint;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::{OptimizationStatus, ProblemSolution};

#[derive(Clone, Debug, Default)]
pub struct MicrolpSolver {}

impl Solver for MicrolpSolver {
    fn name(&self) -> &str {
        "microlp"
    }

    fn solve(&self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        let direction = match problem.objective().sense() {
            ObjectiveSense::Maximize => OptimizationDirection::Maximize,
            ObjectiveSense::Minimize => OptimizationDirection::Minimize,
        };
        let mut lp = microlp::Problem::new(direction);
        let coefficients = problem.objective().coefficients(problem.num_variables());
        let columns: Vec<LpVariable> = problem
            .variables()
            .map(|v| lp.add_var(coefficients[v.index()], (v.lower_bound, v.upper_bound)))
            .collect();

        for (_, constraint) in problem.constraints() {
            let expr: Vec<(LpVariable, f64)> = constraint
                .terms()
                .iter()
                .map(|t| (columns[t.variable], t.coefficient))
                .collect();
            match constraint {
                Constraint::Equality { equals, .. } => {
                    lp.add_constraint(expr.as_slice(), ComparisonOp::Eq, *equals)
                }
                Constraint::Inequality {
                    lower_bound,
                    upper_bound,
                    ..
                } => {
                    if upper_bound.is_finite() {
                        lp.add_constraint(expr.as_slice(), ComparisonOp::Le, *upper_bound);
                    }
                    if lower_bound.is_finite() {
                        lp.add_constraint(expr.as_slice(), ComparisonOp::Ge, *lower_bound);
                    }
                }
            }
        }

        match lp.solve() {
            Ok(solution) => {
                let variable_values: IndexMap<String, f64> = problem
                    .variables()
                    .map(|v| (v.id.clone(), solution[columns[v.index()]]))
                    .collect();
                Ok(ProblemSolution {
                    status: OptimizationStatus::Optimal,
                    objective_value: Some(solution.objective()),
                    variable_values: Some(variable_values),
                })
            }
            Err(MicrolpError::Infeasible) => {
                Ok(ProblemSolution::without_values(OptimizationStatus::Infeasible))
            }
            Err(MicrolpError::Unbounded) => {
                Ok(ProblemSolution::without_values(OptimizationStatus::Unbounded))
            }
            Err(other) => {
                debug!("microlp stopped: {}", other);
                Ok(ProblemSolution::without_values(OptimizationStatus::SolverHalted))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_simple_lp() {
        let mut problem = Problem::new_maximization();
        problem.add_new_variable("x", 0., 3.).unwrap();
        problem.add_new_variable("y", 0., f64::INFINITY).unwrap();
        problem
            .add_new_inequality_constraint_by_id("c", &["x", "y"], &[1., 2.], f64::NEG_INFINITY, 4.)
            .unwrap();
        problem.add_new_linear_objective_term_by_id("x", 1.).unwrap();
        problem.add_new_linear_objective_term_by_id("y", 1.).unwrap();

        let solution = MicrolpSolver::default().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 3.5).abs() < 1e-8);
    }

    #[test]
    fn infeasible_lp() {
        let mut problem = Problem::new_maximization();
        problem.add_new_variable("x", 0., 1.).unwrap();
        problem
            .add_new_equality_constraint_by_id("c", &["x"], &[1.], 5.)
            .unwrap();
        let solution = MicrolpSolver::default().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Infeasible);
    }
}
