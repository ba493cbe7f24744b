use thiserror::Error;

/// Number of products (decision variables) in the model
pub const PRODUCTS: usize = 2;
/// Number of resources (constraints) in the model
pub const RESOURCES: usize = 2;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: f64 },
    #[error("{field} must be a finite number")]
    NotFinite { field: String },
}

/// Per-unit economics of one product
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductParameters {
    pub name: String,
    /// Profit earned per unit produced
    pub profit_per_unit: f64,
    /// Units of each resource consumed per unit produced, in resource order
    pub consumption_per_unit: [f64; RESOURCES],
}

/// Amount of one resource available for the production run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceCapacity {
    pub name: String,
    pub max_available: f64,
}

/// Complete input snapshot for one solve
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MixInputs {
    pub products: [ProductParameters; PRODUCTS],
    pub resources: [ResourceCapacity; RESOURCES],
}

impl ProductParameters {
    pub fn new(name: impl Into<String>, profit_per_unit: f64, consumption_per_unit: [f64; RESOURCES]) -> Self {
        Self {
            name: name.into(),
            profit_per_unit,
            consumption_per_unit,
        }
    }
}

impl ResourceCapacity {
    pub fn new(name: impl Into<String>, max_available: f64) -> Self {
        Self {
            name: name.into(),
            max_available,
        }
    }
}

impl Default for MixInputs {
    /// Chips and doughnuts sharing flour (kg) and machine time (hours)
    fn default() -> Self {
        Self {
            products: [
                ProductParameters::new("Keripik", 5000.0, [2.0, 1.0]),
                ProductParameters::new("Donat", 8000.0, [4.0, 2.0]),
            ],
            resources: [
                ResourceCapacity::new("Tepung", 100.0),
                ResourceCapacity::new("Waktu Mesin", 80.0),
            ],
        }
    }
}

impl MixInputs {
    /// Units of `resource` consumed per unit of `product`
    pub fn consumption(&self, product: usize, resource: usize) -> f64 {
        self.products[product].consumption_per_unit[resource]
    }

    pub fn capacity(&self, resource: usize) -> f64 {
        self.resources[resource].max_available
    }

    /// Reject negative and non-finite numbers. Zero is allowed everywhere.
    pub fn validate(&self) -> Result<(), InputError> {
        for p in &self.products {
            check(format!("{} profit per unit", p.name), p.profit_per_unit)?;
            for (r, &rate) in p.consumption_per_unit.iter().enumerate() {
                check(
                    format!("{} consumption of {}", p.name, self.resources[r].name),
                    rate,
                )?;
            }
        }
        for r in &self.resources {
            check(format!("{} capacity", r.name), r.max_available)?;
        }
        Ok(())
    }
}

fn check(field: String, value: f64) -> Result<(), InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(InputError::Negative { field, value });
    }
    Ok(())
}
