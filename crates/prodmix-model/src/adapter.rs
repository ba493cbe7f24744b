use prodmix_solver::{LpProblem, LpSolver, Solution, SolutionStatus, Solver};
use tracing::{debug, info};

use crate::builder::build_problem;
use crate::params::{InputError, MixInputs};

/// Outcome of one production-mix solve
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum MixSolution {
    /// Units of product A and product B, and the profit they earn
    Optimal { quantities: (f64, f64), profit: f64 },
    Infeasible,
    /// Unbounded, malformed, or the solver did not converge
    SolverFailure,
}

impl MixSolution {
    /// Translate a solver result for a problem posed by [`build_problem`]. The problem
    /// minimizes negated profit, so the profit is the negated objective value.
    pub fn from_solution(solution: &Solution) -> Self {
        match solution.status {
            SolutionStatus::Optimal => match solution.values.as_slice() {
                [a, b] => MixSolution::Optimal {
                    quantities: (*a, *b),
                    profit: -solution.objective_value,
                },
                _ => MixSolution::SolverFailure,
            },
            SolutionStatus::Infeasible => MixSolution::Infeasible,
            SolutionStatus::Unbounded | SolutionStatus::Error => MixSolution::SolverFailure,
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, MixSolution::Optimal { .. })
    }
}

/// Run one solve attempt of an already built problem
pub fn solve_problem(solver: &impl LpSolver, problem: &LpProblem) -> MixSolution {
    let solution = solver.solve(problem);
    debug!(status = ?solution.status, iterations = solution.iterations, "solver returned");
    MixSolution::from_solution(&solution)
}

/// Validate, build and solve with the bundled simplex solver
pub fn solve_production_mix(inputs: &MixInputs) -> Result<MixSolution, InputError> {
    solve_production_mix_with(&Solver::new(), inputs)
}

/// Validate, build and solve with any [`LpSolver`]
pub fn solve_production_mix_with(solver: &impl LpSolver, inputs: &MixInputs) -> Result<MixSolution, InputError> {
    inputs.validate()?;

    let problem = build_problem(inputs);
    let outcome = solve_problem(solver, &problem);

    match outcome {
        MixSolution::Optimal { quantities: (a, b), profit } => {
            info!(
                product_a = %inputs.products[0].name,
                quantity_a = a,
                product_b = %inputs.products[1].name,
                quantity_b = b,
                profit,
                "optimal production mix"
            );
        }
        MixSolution::Infeasible | MixSolution::SolverFailure => {
            info!(outcome = ?outcome, "no production mix found");
        }
    }

    Ok(outcome)
}
