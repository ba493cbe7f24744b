mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use prodmix_model::{MixInputs, MixSolution, PlotConfig, ProductParameters, Report, ResourceCapacity, SvgPlot};
use prodmix_solver::Solver;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "prodmix")]
#[command(about = "Maximize profit for a two-product production mix", long_about = None)]
struct Cli {
    /// Log solver progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the production mix and print the result
    Solve {
        #[command(flatten)]
        inputs: InputArgs,
        /// Also write the feasible-region plot to this SVG file
        #[arg(long)]
        plot: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Maximum simplex pivots before giving up
        #[arg(long, default_value_t = 10000)]
        max_iterations: usize,
    },
    /// Solve and write only the feasible-region plot
    Plot {
        #[command(flatten)]
        inputs: InputArgs,
        /// SVG file to write
        #[arg(short, long, default_value = "feasible-region.svg")]
        output: PathBuf,
        /// Image width in pixels
        #[arg(long, default_value_t = 800)]
        width: u32,
        /// Image height in pixels
        #[arg(long, default_value_t = 600)]
        height: u32,
        /// Plot title
        #[arg(long)]
        title: Option<String>,
    },
    /// Print the default inputs as JSON, for use with --input
    Defaults,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Production parameters; the defaults are the chips-and-doughnuts example
#[derive(Args)]
struct InputArgs {
    /// Read all inputs from a JSON file instead of the flags below
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Profit per unit of Keripik (Rp)
    #[arg(long, default_value_t = 5000.0, allow_negative_numbers = true)]
    profit_a: f64,
    /// Profit per unit of Donat (Rp)
    #[arg(long, default_value_t = 8000.0, allow_negative_numbers = true)]
    profit_b: f64,

    /// Flour per unit of Keripik (kg)
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    flour_a: f64,
    /// Flour per unit of Donat (kg)
    #[arg(long, default_value_t = 4.0, allow_negative_numbers = true)]
    flour_b: f64,
    /// Total flour available (kg)
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    flour: f64,

    /// Machine time per unit of Keripik (hours)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    machine_a: f64,
    /// Machine time per unit of Donat (hours)
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    machine_b: f64,
    /// Total machine time available (hours)
    #[arg(long, default_value_t = 80.0, allow_negative_numbers = true)]
    machine: f64,
}

impl InputArgs {
    fn load(&self) -> MixInputs {
        if let Some(ref path) = self.input {
            let source = match std::fs::read_to_string(path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error reading file: {}", e);
                    std::process::exit(1);
                }
            };
            return match serde_json::from_str(&source) {
                Ok(inputs) => inputs,
                Err(e) => {
                    eprintln!("Invalid input file {}: {}", path.display(), e);
                    std::process::exit(1);
                }
            };
        }

        let defaults = MixInputs::default();
        let [a, b] = defaults.products;
        let [flour, machine] = defaults.resources;
        MixInputs {
            products: [
                ProductParameters::new(a.name, self.profit_a, [self.flour_a, self.machine_a]),
                ProductParameters::new(b.name, self.profit_b, [self.flour_b, self.machine_b]),
            ],
            resources: [
                ResourceCapacity::new(flour.name, self.flour),
                ResourceCapacity::new(machine.name, self.machine),
            ],
        }
    }
}

fn solve(inputs: &MixInputs, solver: &Solver) -> MixSolution {
    match prodmix_model::solve_production_mix_with(solver, inputs) {
        Ok(solution) => solution,
        Err(e) => {
            eprintln!("Input error: {}", e);
            std::process::exit(1);
        }
    }
}

fn write_plot(plot: &SvgPlot<'_>, path: &Path) {
    if let Err(e) = plot.write_to_file(path) {
        eprintln!("Error writing plot: {}", e);
        std::process::exit(1);
    }
    info!(path = %path.display(), "plot written");
}

/// Print the report to `out` and write the plot when one was asked for. Returns
/// whether an optimal mix was found. In JSON mode `out` receives nothing but the report.
fn run_solve(
    inputs: &MixInputs,
    solver: &Solver,
    format: Format,
    plot: Option<&Path>,
    out: &mut impl Write,
) -> io::Result<bool> {
    let solution = solve(inputs, solver);
    let report = Report::new(inputs, &solution);

    match format {
        Format::Text if report.is_success() => writeln!(out, "{}", report)?,
        Format::Text => eprintln!("{}", report),
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }

    if !solution.is_optimal() {
        return Ok(false);
    }

    if let Some(path) = plot {
        if let Ok(svg) = SvgPlot::new(PlotConfig::default(), inputs, &solution) {
            write_plot(&svg, path);
            match format {
                Format::Text => {
                    writeln!(out)?;
                    writeln!(out, "Plot written to {}", path.display())?;
                }
                Format::Json => eprintln!("Plot written to {}", path.display()),
            }
        }
    }
    Ok(true)
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Solve {
            inputs,
            plot,
            format,
            max_iterations,
        } => {
            let inputs = inputs.load();
            let solver = Solver::new().with_max_iterations(max_iterations);
            let mut stdout = io::stdout().lock();
            match run_solve(&inputs, &solver, format, plot.as_deref(), &mut stdout) {
                Ok(true) => {}
                Ok(false) => std::process::exit(1),
                Err(e) => {
                    eprintln!("Error writing report: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Plot {
            inputs,
            output,
            width,
            height,
            title,
        } => {
            let inputs = inputs.load();
            let solution = solve(&inputs, &Solver::new());

            let mut config = PlotConfig::default().with_size(width, height);
            if let Some(title) = title {
                config = config.with_title(title);
            }

            match SvgPlot::new(config, &inputs, &solution) {
                Ok(svg) => {
                    write_plot(&svg, &output);
                    println!("Plot written to {}", output.display());
                }
                Err(_) => {
                    eprintln!("{}", prodmix_model::FAILURE_MESSAGE);
                    std::process::exit(1);
                }
            }
        }
        Commands::Defaults => match serde_json::to_string_pretty(&MixInputs::default()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error encoding defaults: {}", e);
                std::process::exit(1);
            }
        },
    }
}
