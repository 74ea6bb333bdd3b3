pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::{CalculationRequest, CalculationResult};
pub use config::{batch::BatchConfig, cli::LocalStorage, rates::RateTables};
pub use core::batch::BatchRunner;
pub use core::engine::CalcEngine;
pub use utils::error::{JurisError, Result};
