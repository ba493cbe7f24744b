mod problem;
mod simplex;
mod solution;
mod solver;

pub use problem::{Bounds, Constraint, ConstraintOp, LpProblem, Objective, ProblemError};
pub use simplex::Solver;
pub use solution::{Solution, SolutionStatus};
pub use solver::LpSolver;
