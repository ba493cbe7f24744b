use thiserror::Error;

/// Represents a linear programming problem
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LpProblem {
    /// Variable names
    pub variables: Vec<String>,
    /// Objective function coefficients
    pub objective: Objective,
    /// Constraints
    pub constraints: Vec<Constraint>,
    /// Per-variable bounds, in variable order
    pub bounds: Vec<Bounds>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Whether to minimize or maximize
    pub minimize: bool,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

/// Lower and upper limit of a single variable
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    /// `[0, +inf)`
    pub const NON_NEGATIVE: Bounds = Bounds {
        lower: 0.0,
        upper: f64::INFINITY,
    };

    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::NON_NEGATIVE
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Objective has {found} coefficients but problem has {expected} variables")]
    ObjectiveLength { expected: usize, found: usize },
    #[error("Constraint {name} has {found} coefficients but problem has {expected} variables")]
    ConstraintLength {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Problem has {found} bounds but {expected} variables")]
    BoundsLength { expected: usize, found: usize },
    #[error("Variable {0} has no finite lower bound")]
    UnboundedBelow(String),
    #[error("Variable {0} has an empty bound range")]
    EmptyBounds(String),
}

impl LpProblem {
    pub fn new(variables: Vec<String>) -> Self {
        let n = variables.len();
        Self {
            variables,
            objective: Objective {
                coefficients: vec![0.0; n],
                minimize: true,
            },
            constraints: Vec::new(),
            bounds: vec![Bounds::NON_NEGATIVE; n],
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, minimize: bool) {
        self.objective = Objective { coefficients, minimize };
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            op,
            rhs,
        });
    }

    pub fn set_bounds(&mut self, index: usize, bounds: Bounds) {
        if let Some(slot) = self.bounds.get_mut(index) {
            *slot = bounds;
        }
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Check that every coefficient vector and the bounds match the variable count,
    /// and that the bounds are something the simplex tableau can express.
    pub fn validate(&self) -> Result<(), ProblemError> {
        let n = self.num_variables();

        if self.objective.coefficients.len() != n {
            return Err(ProblemError::ObjectiveLength {
                expected: n,
                found: self.objective.coefficients.len(),
            });
        }

        for c in &self.constraints {
            if c.coefficients.len() != n {
                return Err(ProblemError::ConstraintLength {
                    name: c.name.clone(),
                    expected: n,
                    found: c.coefficients.len(),
                });
            }
        }

        if self.bounds.len() != n {
            return Err(ProblemError::BoundsLength {
                expected: n,
                found: self.bounds.len(),
            });
        }

        for (name, b) in self.variables.iter().zip(&self.bounds) {
            if !b.lower.is_finite() {
                return Err(ProblemError::UnboundedBelow(name.clone()));
            }
            if b.upper < b.lower {
                return Err(ProblemError::EmptyBounds(name.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_problem_is_non_negative() {
        let problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(problem.bounds, vec![Bounds::NON_NEGATIVE; 2]);
        assert!(problem.objective.minimize);
        assert!(problem.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_constraint() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.add_constraint("short", vec![1.0], ConstraintOp::Le, 4.0);

        let err = problem.validate().unwrap_err();
        assert_eq!(
            err,
            ProblemError::ConstraintLength {
                name: "short".to_string(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn test_validate_rejects_free_variable() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_bounds(0, Bounds::new(f64::NEG_INFINITY, 10.0));

        assert_eq!(problem.validate(), Err(ProblemError::UnboundedBelow("x".to_string())));
    }

    #[test]
    fn test_validate_rejects_empty_range() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_bounds(0, Bounds::new(5.0, 1.0));

        assert_eq!(problem.validate(), Err(ProblemError::EmptyBounds("x".to_string())));
    }
}
