pub mod batch;
pub mod calendar;
pub mod engine;
pub mod extenso;
pub mod format;
pub mod report;
pub mod tax_id;

pub use crate::domain::ports::{Calculator, DigitSource, ReportStorage};
pub use crate::utils::error::Result;
