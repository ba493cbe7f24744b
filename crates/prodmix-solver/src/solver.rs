use crate::problem::LpProblem;
use crate::solution::Solution;

/// Anything that can solve a problem of the form
/// `min/max c^T x  subject to  A x (<=|>=|=) b,  lower <= x <= upper`.
///
/// The simplex [`Solver`](crate::Solver) is the bundled implementation; other
/// backends only need to report a [`Solution`] with the same conventions:
/// `objective_value` in the caller's objective sense and `values` empty unless
/// the status is optimal.
pub trait LpSolver {
    fn solve(&self, problem: &LpProblem) -> Solution;
}

impl<S: LpSolver + ?Sized> LpSolver for &S {
    fn solve(&self, problem: &LpProblem) -> Solution {
        (**self).solve(problem)
    }
}
