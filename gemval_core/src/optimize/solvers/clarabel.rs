//! Implements a solver interface for Clarabel
//!
//! Clarabel solves `min 1/2 x'Px + q'x` subject to `Ax + s = b`, `s` in a product of cones.
//! Linear problems use `P = 0`; equalities and fixed variables go to the zero cone, bounds
//! and inequalities to the nonnegative cone.

use clarabel::algebra::CscMatrix;
use clarabel::solver::*;
use indexmap::IndexMap;
use log::debug;

use crate::optimize::constraint::{Constraint, ConstraintTerm};
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::{OptimizationStatus, ProblemSolution};

#[derive(Clone, Debug)]
pub struct ClarabelSolver {
    /// Maximum number of interior point iterations
    pub max_iter: u32,
}

impl Default for ClarabelSolver {
    fn default() -> Self {
        ClarabelSolver { max_iter: 200 }
    }
}

/// Rows of `A x + s = b`, split by cone
#[derive(Default)]
struct ConeRows {
    /// Per column, (row, value) entries of the zero cone block
    zero: Vec<Vec<(usize, f64)>>,
    zero_b: Vec<f64>,
    /// Per column, (row, value) entries of the nonnegative cone block
    nonneg: Vec<Vec<(usize, f64)>>,
    nonneg_b: Vec<f64>,
}

impl ConeRows {
    fn new(num_variables: usize) -> Self {
        ConeRows {
            zero: vec![Vec::new(); num_variables],
            nonneg: vec![Vec::new(); num_variables],
            ..Default::default()
        }
    }

    /// terms = rhs
    fn push_zero(&mut self, terms: &[ConstraintTerm], rhs: f64) {
        let row = self.zero_b.len();
        for t in terms {
            self.zero[t.variable].push((row, t.coefficient));
        }
        self.zero_b.push(rhs);
    }

    /// sign * terms <= rhs
    fn push_nonneg(&mut self, terms: &[ConstraintTerm], sign: f64, rhs: f64) {
        let row = self.nonneg_b.len();
        for t in terms {
            self.nonneg[t.variable].push((row, sign * t.coefficient));
        }
        self.nonneg_b.push(rhs);
    }

    /// Stack the zero block on top of the nonnegative block as one CSC matrix
    fn assemble(self) -> (CscMatrix<f64>, Vec<f64>, Vec<SupportedConeT<f64>>) {
        let num_zero = self.zero_b.len();
        let num_rows = num_zero + self.nonneg_b.len();
        let num_cols = self.zero.len();
        let mut colptr = Vec::with_capacity(num_cols + 1);
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();
        colptr.push(0);
        for (zero_col, nonneg_col) in self.zero.into_iter().zip(self.nonneg) {
            for (row, value) in zero_col {
                rowval.push(row);
                nzval.push(value);
            }
            for (row, value) in nonneg_col {
                rowval.push(num_zero + row);
                nzval.push(value);
            }
            colptr.push(rowval.len());
        }
        let a = CscMatrix::new(num_rows, num_cols, colptr, rowval, nzval);

        let mut cones = Vec::new();
        if num_zero > 0 {
            cones.push(ZeroConeT(num_zero));
        }
        if !self.nonneg_b.is_empty() {
            cones.push(NonnegativeConeT(self.nonneg_b.len()));
        }
        let mut b = self.zero_b;
        b.extend(self.nonneg_b);
        (a, b, cones)
    }
}

impl ClarabelSolver {
    fn cone_rows(problem: &Problem) -> ConeRows {
        let mut rows = ConeRows::new(problem.num_variables());
        for variable in problem.variables() {
            let term = [ConstraintTerm {
                variable: variable.index(),
                coefficient: 1.,
            }];
            if variable.is_fixed() {
                rows.push_zero(&term, variable.lower_bound);
                continue;
            }
            if variable.upper_bound.is_finite() {
                rows.push_nonneg(&term, 1., variable.upper_bound);
            }
            if variable.lower_bound.is_finite() {
                rows.push_nonneg(&term, -1., -variable.lower_bound);
            }
        }
        for (_, constraint) in problem.constraints() {
            match constraint {
                Constraint::Equality { terms, equals } => rows.push_zero(terms, *equals),
                Constraint::Inequality {
                    terms,
                    lower_bound,
                    upper_bound,
                } => {
                    if upper_bound.is_finite() {
                        rows.push_nonneg(terms, 1., *upper_bound);
                    }
                    if lower_bound.is_finite() {
                        rows.push_nonneg(terms, -1., -*lower_bound);
                    }
                }
            }
        }
        rows
    }

    fn map_status(status: SolverStatus) -> OptimizationStatus {
        match status {
            SolverStatus::Solved => OptimizationStatus::Optimal,
            SolverStatus::AlmostSolved => OptimizationStatus::AlmostOptimal,
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                OptimizationStatus::Infeasible
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                OptimizationStatus::Unbounded
            }
            SolverStatus::NumericalError | SolverStatus::InsufficientProgress => {
                OptimizationStatus::NumericalError
            }
            SolverStatus::Unsolved => OptimizationStatus::Unoptimized,
            _ => OptimizationStatus::SolverHalted,
        }
    }
}

impl Solver for ClarabelSolver {
    fn name(&self) -> &str {
        "clarabel"
    }

    fn solve(&self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        let n = problem.num_variables();
        if n == 0 {
            return Err(SolverError::InvalidProblem(
                "problem has no variables".to_string(),
            ));
        }
        // Clarabel always minimizes
        let sense = problem.objective().sense();
        let sign = match sense {
            ObjectiveSense::Maximize => -1.,
            ObjectiveSense::Minimize => 1.,
        };
        let q: Vec<f64> = problem
            .objective()
            .coefficients(n)
            .into_iter()
            .map(|c| sign * c)
            .collect();
        let p = CscMatrix::new(n, n, vec![0; n + 1], Vec::new(), Vec::new());
        let (a, b, cones) = Self::cone_rows(problem).assemble();

        let settings: DefaultSettings<f64> = DefaultSettingsBuilder::default()
            .verbose(false)
            .max_iter(self.max_iter)
            .build()
            .map_err(|e| SolverError::InvalidSettings(format!("{:?}", e)))?;
        let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings);
        solver.solve();

        let status = Self::map_status(solver.solution.status);
        debug!(
            "clarabel finished with {:?} after {} iterations",
            solver.solution.status, solver.solution.iterations
        );
        if !status.has_values() {
            return Ok(ProblemSolution::without_values(status));
        }

        let variable_values: IndexMap<String, f64> = problem
            .variables()
            .map(|v| (v.id.clone(), solver.solution.x[v.index()]))
            .collect();
        Ok(ProblemSolution {
            status,
            objective_value: Some(sign * solver.solution.obj_val),
            variable_values: Some(variable_values),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-5, "{} != {}", a, b);
    }

    #[test]
    fn solve_simple_lp() {
        // max x + y subject to x + 2y <= 4, x <= 3, x,y >= 0
        let mut problem = Problem::new_maximization();
        problem.add_new_variable("x", 0., 3.).unwrap();
        problem.add_new_variable("y", 0., f64::INFINITY).unwrap();
        problem
            .add_new_inequality_constraint_by_id("c", &["x", "y"], &[1., 2.], f64::NEG_INFINITY, 4.)
            .unwrap();
        problem.add_new_linear_objective_term_by_id("x", 1.).unwrap();
        problem.add_new_linear_objective_term_by_id("y", 1.).unwrap();

        let solution = ClarabelSolver::default().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert_close(solution.objective_value.unwrap(), 3.5);
        let values = solution.variable_values.unwrap();
        assert_close(values["x"], 3.);
        assert_close(values["y"], 0.5);
    }

    #[test]
    fn fixed_variables_and_equalities() {
        // min x + y subject to x - y = 1, y fixed at 2
        let mut problem = Problem::new_minimization();
        problem.add_new_variable("x", 0., 10.).unwrap();
        problem.add_new_variable("y", 2., 2.).unwrap();
        problem
            .add_new_equality_constraint_by_id("c", &["x", "y"], &[1., -1.], 1.)
            .unwrap();
        problem.add_new_linear_objective_term_by_id("x", 1.).unwrap();
        problem.add_new_linear_objective_term_by_id("y", 1.).unwrap();

        let solution = ClarabelSolver::default().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert_close(solution.objective_value.unwrap(), 5.);
    }

    #[test]
    fn infeasible_lp() {
        let mut problem = Problem::new_maximization();
        problem.add_new_variable("x", 0., 1.).unwrap();
        problem
            .add_new_equality_constraint_by_id("c", &["x"], &[1.], 5.)
            .unwrap();
        problem.add_new_linear_objective_term_by_id("x", 1.).unwrap();

        let solution = ClarabelSolver::default().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Infeasible);
        assert_eq!(solution.objective_value, None);
    }

    #[test]
    fn unbounded_lp() {
        let mut problem = Problem::new_maximization();
        problem.add_new_variable("x", 0., f64::INFINITY).unwrap();
        problem.add_new_linear_objective_term_by_id("x", 1.).unwrap();

        let solution = ClarabelSolver::default().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Unbounded);
    }
}
