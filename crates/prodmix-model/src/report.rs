use std::fmt;

use crate::adapter::MixSolution;
use crate::params::MixInputs;

/// Shown for every unsuccessful solve, whatever the solver's reason
pub const FAILURE_MESSAGE: &str = "Optimization failed to find a solution. Check the input data.";

/// Prefix of displayed currency amounts (Indonesian rupiah)
pub const CURRENCY: &str = "Rp";

/// Human-readable summary of a solve
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum Report {
    Optimal {
        products: Vec<ProductLine>,
        /// Unrounded total profit
        total_profit: f64,
        /// Total profit as displayed, e.g. `Rp 250,000`
        total_profit_display: String,
    },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProductLine {
    pub name: String,
    /// Unrounded quantity, as used for plotting
    pub quantity: f64,
    /// Quantity rounded to whole units
    pub units: String,
}

impl Report {
    pub fn new(inputs: &MixInputs, solution: &MixSolution) -> Self {
        match *solution {
            MixSolution::Optimal {
                quantities: (a, b),
                profit,
            } => Report::Optimal {
                products: vec![
                    ProductLine::new(&inputs.products[0].name, a),
                    ProductLine::new(&inputs.products[1].name, b),
                ],
                total_profit: profit,
                total_profit_display: format_currency(profit),
            },
            MixSolution::Infeasible | MixSolution::SolverFailure => Report::Failed {
                message: FAILURE_MESSAGE.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Report::Optimal { .. })
    }
}

impl ProductLine {
    fn new(name: &str, quantity: f64) -> Self {
        Self {
            name: name.to_string(),
            quantity,
            units: format_units(quantity),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Optimal {
                products,
                total_profit_display,
                ..
            } => {
                writeln!(f, "Optimization result")?;
                for p in products {
                    writeln!(f, "  {} produced: {} units", p.name, p.units)?;
                }
                write!(f, "  Maximum total profit: {}", total_profit_display)
            }
            Report::Failed { message } => write!(f, "{}", message),
        }
    }
}

/// Round to the nearest whole unit, never showing `-0`
pub fn format_units(value: f64) -> String {
    format!("{:.0}", value.round() + 0.0)
}

/// Whole-unit currency amount with comma thousands separators: `Rp 1,234,568`
pub fn format_currency(amount: f64) -> String {
    let rounded = format_units(amount);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{} {}{}", CURRENCY, sign, grouped)
}
