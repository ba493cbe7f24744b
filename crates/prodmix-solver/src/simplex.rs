use tracing::{debug, trace};

use crate::problem::{ConstraintOp, LpProblem};
use crate::solution::Solution;
use crate::solver::LpSolver;

/// Simplex solver for linear programming problems
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots (both phases together) before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Solve the LP problem using the two-phase simplex method
    pub fn solve(&self, problem: &LpProblem) -> Solution {
        if let Err(e) = problem.validate() {
            debug!(error = %e, "rejecting malformed problem");
            return Solution::error();
        }

        let mut tableau = self.build_tableau(problem);
        let mut iterations = 0;

        // Phase 1: Find initial basic feasible solution
        if tableau.n_artificial > 0 {
            match self.phase1(&mut tableau, &mut iterations) {
                Phase1Result::Feasible => {}
                Phase1Result::Infeasible => {
                    debug!(iterations, "phase 1 left artificial variables in the basis");
                    return Solution::infeasible().with_iterations(iterations);
                }
                Phase1Result::IterationLimit => {
                    debug!(iterations, "phase 1 hit the iteration limit");
                    return Solution::error().with_iterations(iterations);
                }
            }
        }

        // Phase 2: Optimize
        let exclude_from = tableau.n_vars + tableau.n_slack;
        match self.run(&mut tableau, exclude_from, &mut iterations) {
            SimplexResult::Optimal => {}
            SimplexResult::Unbounded => {
                debug!(iterations, "objective is unbounded");
                return Solution::unbounded().with_iterations(iterations);
            }
            SimplexResult::IterationLimit => {
                debug!(iterations, "phase 2 hit the iteration limit");
                return Solution::error().with_iterations(iterations);
            }
        }

        let solution = self.extract_solution(&tableau, problem, iterations);
        debug!(
            iterations,
            objective = solution.objective_value,
            values = ?solution.values,
            "optimal solution found"
        );
        solution
    }

    /// Build the tableau for the problem shifted so that every variable has a zero
    /// lower bound. Finite upper bounds become extra `<=` rows and rows with a
    /// negative right-hand side are negated so the initial basis stays feasible.
    fn build_tableau(&self, problem: &LpProblem) -> Tableau {
        let n_vars = problem.num_variables();
        let lower: Vec<f64> = problem.bounds.iter().map(|b| b.lower).collect();

        let mut rows: Vec<Row> = problem
            .constraints
            .iter()
            .map(|c| {
                let shift: f64 = c.coefficients.iter().zip(&lower).map(|(a, l)| a * l).sum();
                Row {
                    coefficients: c.coefficients.clone(),
                    op: c.op,
                    rhs: c.rhs - shift,
                }
            })
            .collect();

        for (j, b) in problem.bounds.iter().enumerate() {
            if b.upper.is_finite() {
                let mut coefficients = vec![0.0; n_vars];
                coefficients[j] = 1.0;
                rows.push(Row {
                    coefficients,
                    op: ConstraintOp::Le,
                    rhs: b.upper - b.lower,
                });
            }
        }

        for row in &mut rows {
            if row.rhs < 0.0 {
                row.rhs = -row.rhs;
                for coef in &mut row.coefficients {
                    *coef = -*coef;
                }
                row.op = match row.op {
                    ConstraintOp::Le => ConstraintOp::Ge,
                    ConstraintOp::Ge => ConstraintOp::Le,
                    ConstraintOp::Eq => ConstraintOp::Eq,
                };
            }
        }

        // Count slack and artificial variables needed
        let mut n_slack = 0;
        let mut n_artificial = 0;
        for row in &rows {
            match row.op {
                ConstraintOp::Le => n_slack += 1,
                ConstraintOp::Ge => {
                    n_slack += 1; // surplus
                    n_artificial += 1;
                }
                ConstraintOp::Eq => n_artificial += 1,
            }
        }

        let n_rows = rows.len();
        let total_cols = n_vars + n_slack + n_artificial + 1; // +1 for RHS

        let mut tableau = Tableau {
            data: vec![vec![0.0; total_cols]; n_rows + 1],
            basic_vars: vec![0; n_rows],
            n_vars,
            n_slack,
            n_artificial,
        };

        let mut slack_idx = n_vars;
        let mut artificial_idx = n_vars + n_slack;

        for (i, row) in rows.iter().enumerate() {
            tableau.data[i][..n_vars].copy_from_slice(&row.coefficients);
            tableau.data[i][total_cols - 1] = row.rhs;

            match row.op {
                ConstraintOp::Le => {
                    tableau.data[i][slack_idx] = 1.0;
                    tableau.basic_vars[i] = slack_idx;
                    slack_idx += 1;
                }
                ConstraintOp::Ge => {
                    tableau.data[i][slack_idx] = -1.0; // surplus
                    slack_idx += 1;
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    artificial_idx += 1;
                }
                ConstraintOp::Eq => {
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    artificial_idx += 1;
                }
            }
        }

        // Objective row (last row). The tableau always maximizes; a positive entry
        // marks a column whose increase improves the objective.
        for (j, &coef) in problem.objective.coefficients.iter().enumerate() {
            tableau.data[n_rows][j] = if problem.objective.minimize { -coef } else { coef };
        }

        tableau
    }

    fn phase1(&self, tableau: &mut Tableau, iterations: &mut usize) -> Phase1Result {
        let n_rows = tableau.n_rows();
        let n_cols = tableau.data[0].len();
        let art_start = tableau.n_vars + tableau.n_slack;

        let orig_obj = std::mem::replace(&mut tableau.data[n_rows], vec![0.0; n_cols]);

        // Maximize -sum(artificials)
        for j in art_start..(art_start + tableau.n_artificial) {
            tableau.data[n_rows][j] = -1.0;
        }

        // Make objective row consistent with basic artificial variables
        for i in 0..n_rows {
            if tableau.basic_vars[i] >= art_start {
                for j in 0..n_cols {
                    tableau.data[n_rows][j] += tableau.data[i][j];
                }
            }
        }

        match self.run(tableau, n_cols - 1, iterations) {
            SimplexResult::Optimal => {}
            // The phase 1 objective is bounded by zero
            SimplexResult::Unbounded => return Phase1Result::Infeasible,
            SimplexResult::IterationLimit => return Phase1Result::IterationLimit,
        }

        let rhs_col = n_cols - 1;
        for i in 0..n_rows {
            if tableau.basic_vars[i] >= art_start && tableau.data[i][rhs_col].abs() > self.tolerance {
                return Phase1Result::Infeasible;
            }
        }

        // Artificials still basic at zero level would re-enter the solution once
        // phase 2 pivots on their row, so swap them for any real column.
        for i in 0..n_rows {
            if tableau.basic_vars[i] >= art_start {
                if let Some(col) = (0..art_start).find(|&j| tableau.data[i][j].abs() > self.tolerance) {
                    self.pivot(tableau, i, col);
                }
            }
        }

        // Restore original objective and adjust for basic variables
        tableau.data[n_rows] = orig_obj;
        for i in 0..n_rows {
            let basic = tableau.basic_vars[i];
            let ratio = tableau.data[n_rows][basic];
            if ratio.abs() > self.tolerance {
                for j in 0..n_cols {
                    tableau.data[n_rows][j] -= ratio * tableau.data[i][j];
                }
            }
        }

        Phase1Result::Feasible
    }

    /// Pivot until no column below `exclude_from` can improve the objective row
    fn run(&self, tableau: &mut Tableau, exclude_from: usize, iterations: &mut usize) -> SimplexResult {
        loop {
            let Some(pivot_col) = self.find_pivot_column(tableau, exclude_from) else {
                return SimplexResult::Optimal;
            };
            let Some(pivot_row) = self.find_pivot_row(tableau, pivot_col) else {
                return SimplexResult::Unbounded;
            };
            if *iterations >= self.max_iterations {
                return SimplexResult::IterationLimit;
            }
            *iterations += 1;
            trace!(iteration = *iterations, row = pivot_row, col = pivot_col, "pivot");
            self.pivot(tableau, pivot_row, pivot_col);
        }
    }

    fn find_pivot_column(&self, tableau: &Tableau, exclude_from: usize) -> Option<usize> {
        let obj_row = tableau.n_rows();

        // Most positive reduced cost
        let mut max_val = self.tolerance;
        let mut max_col = None;

        for j in 0..exclude_from {
            if tableau.data[obj_row][j] > max_val {
                max_val = tableau.data[obj_row][j];
                max_col = Some(j);
            }
        }

        max_col
    }

    fn find_pivot_row(&self, tableau: &Tableau, col: usize) -> Option<usize> {
        let rhs_col = tableau.data[0].len() - 1;

        let mut min_ratio = f64::INFINITY;
        let mut min_row = None;

        for i in 0..tableau.n_rows() {
            let val = tableau.data[i][col];
            if val > self.tolerance {
                let ratio = tableau.data[i][rhs_col] / val;
                if ratio >= 0.0 && ratio < min_ratio {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }

        min_row
    }

    fn pivot(&self, tableau: &mut Tableau, row: usize, col: usize) {
        let n_cols = tableau.data[0].len();

        tableau.basic_vars[row] = col;

        let pivot_val = tableau.data[row][col];
        for j in 0..n_cols {
            tableau.data[row][j] /= pivot_val;
        }

        let pivot_row = tableau.data[row].clone();
        for (i, other) in tableau.data.iter_mut().enumerate() {
            if i != row {
                let factor = other[col];
                if factor != 0.0 {
                    for j in 0..n_cols {
                        other[j] -= factor * pivot_row[j];
                    }
                }
            }
        }
    }

    fn extract_solution(&self, tableau: &Tableau, problem: &LpProblem, iterations: usize) -> Solution {
        let n_vars = problem.num_variables();
        let rhs_col = tableau.data[0].len() - 1;

        let mut values: Vec<f64> = problem.bounds.iter().map(|b| b.lower).collect();
        for (i, &basic) in tableau.basic_vars.iter().enumerate() {
            if basic < n_vars {
                values[basic] += tableau.data[i][rhs_col];
            }
        }

        let objective_value = problem
            .objective
            .coefficients
            .iter()
            .zip(&values)
            .map(|(c, x)| c * x)
            .sum();

        Solution::optimal(values, objective_value, iterations)
    }
}

impl LpSolver for Solver {
    fn solve(&self, problem: &LpProblem) -> Solution {
        Solver::solve(self, problem)
    }
}

struct Row {
    coefficients: Vec<f64>,
    op: ConstraintOp,
    rhs: f64,
}

struct Tableau {
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    n_vars: usize,
    n_slack: usize,
    n_artificial: usize,
}

impl Tableau {
    /// Number of constraint rows (the objective row is last)
    fn n_rows(&self) -> usize {
        self.basic_vars.len()
    }
}

enum SimplexResult {
    Optimal,
    Unbounded,
    IterationLimit,
}

enum Phase1Result {
    Feasible,
    Infeasible,
    IterationLimit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Bounds, LpProblem};
    use crate::solution::SolutionStatus;

    fn xy() -> LpProblem {
        LpProblem::new(vec!["x".to_string(), "y".to_string()])
    }

    #[test]
    fn test_simple_maximization() {
        // Maximize: 3x + 2y
        // Subject to:
        //   x + y <= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=11
        let mut problem = xy();
        problem.set_objective(vec![3.0, 2.0], false);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 11.0).abs() < 1e-6, "obj = {} (expected 11)", solution.objective_value);
    }

    #[test]
    fn test_minimization_with_ge() {
        // Minimize: 2x + 3y
        // Subject to:
        //   x + y >= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=9
        let mut problem = xy();
        problem.set_objective(vec![2.0, 3.0], true);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Ge, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 9.0).abs() < 1e-6, "obj = {} (expected 9)", solution.objective_value);
    }

    #[test]
    fn test_negated_profit_minimization() {
        // Minimize: -5000x - 8000y
        // Subject to:
        //   2x + 4y <= 100
        //   x + 2y <= 80
        // Optimal: x=50, y=0, obj=-250000
        let mut problem = xy();
        problem.set_objective(vec![-5000.0, -8000.0], true);
        problem.add_constraint("flour", vec![2.0, 4.0], ConstraintOp::Le, 100.0);
        problem.add_constraint("machine", vec![1.0, 2.0], ConstraintOp::Le, 80.0);

        let solution = Solver::new().solve(&problem);

        assert!(solution.is_optimal());
        assert!((solution.values[0] - 50.0).abs() < 1e-6);
        assert!(solution.values[1].abs() < 1e-6);
        assert!((solution.objective_value + 250000.0).abs() < 1e-6);
        assert_eq!(solution.iterations, 2);
    }

    #[test]
    fn test_infeasible() {
        // x >= 5
        // x <= 3
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("lower", vec![1.0], ConstraintOp::Ge, 5.0);
        problem.add_constraint("upper", vec![1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_negative_rhs_le_is_infeasible() {
        // x + y <= -1 with x, y >= 0
        let mut problem = xy();
        problem.set_objective(vec![1.0, 1.0], false);
        problem.add_constraint("impossible", vec![1.0, 1.0], ConstraintOp::Le, -1.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Infeasible);
    }

    #[test]
    fn test_unbounded() {
        // Maximize x + y with only x <= 3
        let mut problem = xy();
        problem.set_objective(vec![1.0, 1.0], false);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Unbounded);
    }

    #[test]
    fn test_equality_constraint() {
        // Minimize x + 2y subject to x + y = 10, x <= 6
        // Optimal: x=6, y=4, obj=14
        let mut problem = xy();
        problem.set_objective(vec![1.0, 2.0], true);
        problem.add_constraint("total", vec![1.0, 1.0], ConstraintOp::Eq, 10.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 6.0);

        let solution = Solver::new().solve(&problem);

        assert!(solution.is_optimal());
        assert!((solution.values[0] - 6.0).abs() < 1e-6);
        assert!((solution.values[1] - 4.0).abs() < 1e-6);
        assert!((solution.objective_value - 14.0).abs() < 1e-6);
    }

    #[test]
    fn test_bounds_are_honoured() {
        // Maximize x + y subject to x + y <= 10, 2 <= x <= 4, y <= 3
        // Optimal: x=4, y=3, obj=7
        let mut problem = xy();
        problem.set_objective(vec![1.0, 1.0], false);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Le, 10.0);
        problem.set_bounds(0, Bounds::new(2.0, 4.0));
        problem.set_bounds(1, Bounds::new(0.0, 3.0));

        let solution = Solver::new().solve(&problem);

        assert!(solution.is_optimal());
        assert!((solution.values[0] - 4.0).abs() < 1e-6);
        assert!((solution.values[1] - 3.0).abs() < 1e-6);
        assert!((solution.objective_value - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_lower_bound_binds_when_minimizing() {
        // Minimize x subject to x <= 10, x >= 2 (as a bound)
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("x_max", vec![1.0], ConstraintOp::Le, 10.0);
        problem.set_bounds(0, Bounds::new(2.0, f64::INFINITY));

        let solution = Solver::new().solve(&problem);

        assert!(solution.is_optimal());
        assert!((solution.values[0] - 2.0).abs() < 1e-9);
        assert!((solution.objective_value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_problem_is_error() {
        let mut problem = xy();
        problem.set_objective(vec![1.0], false);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Error);
    }

    #[test]
    fn test_iteration_limit_is_error() {
        let mut problem = xy();
        problem.set_objective(vec![3.0, 2.0], false);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().with_max_iterations(0).solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Error);
    }

    #[test]
    fn test_zero_rhs_gives_trivial_solution() {
        let mut problem = xy();
        problem.set_objective(vec![-5000.0, -8000.0], true);
        problem.add_constraint("flour", vec![2.0, 4.0], ConstraintOp::Le, 0.0);
        problem.add_constraint("machine", vec![1.0, 2.0], ConstraintOp::Le, 0.0);

        let solution = Solver::new().solve(&problem);

        assert!(solution.is_optimal());
        assert_eq!(solution.values, vec![0.0, 0.0]);
        assert!(solution.objective_value.abs() < 1e-9);
    }
}
