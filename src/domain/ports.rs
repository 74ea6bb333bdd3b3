use crate::config::rates::RateTables;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// 計算器：輸入經驗證後，依費率表產生輸出
pub trait Calculator {
    type Input: Validate;
    type Output;

    fn name(&self) -> &'static str;

    fn calculate(&self, input: &Self::Input, tables: &RateTables) -> Result<Self::Output>;
}

/// Source of decimal digits (0..=9) used to generate documents.
pub trait DigitSource {
    fn next_digit(&mut self) -> Result<u8>;
}

pub trait ReportStorage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<String>;
}
