pub mod adapter;
pub mod builder;
pub mod params;
pub mod plot;
pub mod report;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use adapter::{solve_problem, solve_production_mix, solve_production_mix_with, MixSolution};
pub use builder::build_problem;
pub use params::{InputError, MixInputs, ProductParameters, ResourceCapacity, PRODUCTS, RESOURCES};
pub use plot::{render_svg, ConstraintLine, FeasibleRegion, PlotConfig, PlotError, SvgPlot};
pub use report::{format_currency, Report, FAILURE_MESSAGE};
