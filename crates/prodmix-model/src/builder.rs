use prodmix_solver::{Bounds, ConstraintOp, LpProblem};

use crate::params::{MixInputs, PRODUCTS, RESOURCES};

/// Assemble the production-mix LP.
///
/// Profit is maximized by minimizing its negation. Row `i` of the constraint matrix is
/// resource `i` and column `j` is product `j`; both decision variables are bounded to
/// `[0, +inf)`. Inputs are passed through as given, see [`MixInputs::validate`].
pub fn build_problem(inputs: &MixInputs) -> LpProblem {
    let mut problem = LpProblem::new(inputs.products.iter().map(|p| p.name.clone()).collect());

    problem.set_objective(inputs.products.iter().map(|p| -p.profit_per_unit).collect(), true);

    for (r, resource) in inputs.resources.iter().enumerate() {
        let coefficients = (0..PRODUCTS).map(|p| inputs.consumption(p, r)).collect();
        problem.add_constraint(resource.name.clone(), coefficients, ConstraintOp::Le, resource.max_available);
    }

    for j in 0..PRODUCTS {
        problem.set_bounds(j, Bounds::NON_NEGATIVE);
    }

    debug_assert_eq!(problem.num_constraints(), RESOURCES);
    problem
}
