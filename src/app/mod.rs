pub mod calculators;

pub use calculators::{CalculationRequest, CalculationResult};
