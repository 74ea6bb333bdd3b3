//! CPF / CNPJ check-digit validation, formatting and generation.

use crate::domain::ports::DigitSource;
use crate::utils::error::{JurisError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const CPF_LEN: usize = 11;
const CNPJ_LEN: usize = 14;
const CNPJ_WEIGHTS_1: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_WEIGHTS_2: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Cpf,
    Cnpj,
}

impl DocumentType {
    /// Digit count after `clean_cpf_cnpj`: 11 for CPF, 14 for CNPJ.
    pub fn expected_len(self) -> usize {
        match self {
            DocumentType::Cpf => CPF_LEN,
            DocumentType::Cnpj => CNPJ_LEN,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Cpf => f.write_str("CPF"),
            DocumentType::Cnpj => f.write_str("CNPJ"),
        }
    }
}

/// 移除所有非數字字元
pub fn clean_cpf_cnpj(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn detect_document_type(value: &str) -> Option<DocumentType> {
    match clean_cpf_cnpj(value).len() {
        CPF_LEN => Some(DocumentType::Cpf),
        CNPJ_LEN => Some(DocumentType::Cnpj),
        _ => None,
    }
}

fn to_digits(clean: &str) -> Vec<u32> {
    clean.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

/// 加權總和 mod 11：餘數小於 2 時為 0，否則為 11 - 餘數
fn mod11_digit(digits: &[u32], weights: impl Iterator<Item = u32>) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

fn cpf_check_digits(base: &[u32]) -> (u32, u32) {
    let first = mod11_digit(&base[..9], (2..=10).rev());
    let mut extended = base[..9].to_vec();
    extended.push(first);
    let second = mod11_digit(&extended, (2..=11).rev());
    (first, second)
}

fn cnpj_check_digits(base: &[u32]) -> (u32, u32) {
    let first = mod11_digit(&base[..12], CNPJ_WEIGHTS_1.iter().copied());
    let mut extended = base[..12].to_vec();
    extended.push(first);
    let second = mod11_digit(&extended, CNPJ_WEIGHTS_2.iter().copied());
    (first, second)
}

pub fn is_valid_cpf(value: &str) -> bool {
    let digits = to_digits(&clean_cpf_cnpj(value));
    if digits.len() != CPF_LEN || all_same(&digits) {
        return false;
    }
    let (first, second) = cpf_check_digits(&digits);
    digits[9] == first && digits[10] == second
}

pub fn is_valid_cnpj(value: &str) -> bool {
    let digits = to_digits(&clean_cpf_cnpj(value));
    if digits.len() != CNPJ_LEN || all_same(&digits) {
        return false;
    }
    let (first, second) = cnpj_check_digits(&digits);
    digits[12] == first && digits[13] == second
}

pub fn is_valid_cpf_cnpj(value: &str) -> bool {
    match detect_document_type(value) {
        Some(DocumentType::Cpf) => is_valid_cpf(value),
        Some(DocumentType::Cnpj) => is_valid_cnpj(value),
        None => false,
    }
}

pub fn format_cpf(value: &str) -> String {
    let clean = clean_cpf_cnpj(value);
    if clean.len() != CPF_LEN {
        return value.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &clean[0..3],
        &clean[3..6],
        &clean[6..9],
        &clean[9..11]
    )
}

pub fn format_cnpj(value: &str) -> String {
    let clean = clean_cpf_cnpj(value);
    if clean.len() != CNPJ_LEN {
        return value.to_string();
    }
    format!(
        "{}.{}.{}/{}-{}",
        &clean[0..2],
        &clean[2..5],
        &clean[5..8],
        &clean[8..12],
        &clean[12..14]
    )
}

pub fn format_cpf_cnpj(value: &str) -> String {
    match detect_document_type(value) {
        Some(DocumentType::Cpf) => format_cpf(value),
        Some(DocumentType::Cnpj) => format_cnpj(value),
        None => value.to_string(),
    }
}

/// Digits drawn from the operating system's random source.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsDigitSource;

impl DigitSource for OsDigitSource {
    fn next_digit(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            getrandom::fill(&mut byte).map_err(|e| {
                JurisError::calculation(format!("random source unavailable: {}", e))
            })?;
            // 250 = 25 * 10，丟棄其餘值以避免偏差
            if byte[0] < 250 {
                return Ok(byte[0] % 10);
            }
        }
    }
}

fn random_prefix<S: DigitSource>(source: &mut S, len: usize) -> Result<Vec<u32>> {
    loop {
        let mut prefix = Vec::with_capacity(len);
        for _ in 0..len {
            prefix.push(u32::from(source.next_digit()? % 10));
        }
        if !all_same(&prefix) {
            return Ok(prefix);
        }
        tracing::debug!("Discarding repeated-digit prefix during document generation");
    }
}

fn digits_to_string(digits: &[u32]) -> String {
    digits
        .iter()
        .filter_map(|d| char::from_digit(*d, 10))
        .collect()
}

pub fn generate_cpf_with<S: DigitSource>(source: &mut S) -> Result<String> {
    let mut digits = random_prefix(source, 9)?;
    let (first, second) = cpf_check_digits(&digits);
    digits.push(first);
    digits.push(second);
    Ok(digits_to_string(&digits))
}

pub fn generate_cnpj_with<S: DigitSource>(source: &mut S) -> Result<String> {
    let mut digits = random_prefix(source, 12)?;
    let (first, second) = cnpj_check_digits(&digits);
    digits.push(first);
    digits.push(second);
    Ok(digits_to_string(&digits))
}

pub fn generate_cpf() -> Result<String> {
    generate_cpf_with(&mut OsDigitSource)
}

pub fn generate_cnpj() -> Result<String> {
    generate_cnpj_with(&mut OsDigitSource)
}

pub fn generate_document(kind: DocumentType, formatted: bool) -> Result<String> {
    let raw = match kind {
        DocumentType::Cpf => generate_cpf()?,
        DocumentType::Cnpj => generate_cnpj()?,
    };
    Ok(if formatted { format_cpf_cnpj(&raw) } else { raw })
}
