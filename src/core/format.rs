//! pt-BR formatting helpers. Malformed input is returned unchanged.

use crate::core::tax_id::clean_cpf_cnpj;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(\d{5})(\d{4})$").expect("mobile pattern is valid"));
static LANDLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(\d{4})(\d{4})$").expect("landline pattern is valid"));
static CEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{5})(\d{3})$").expect("cep pattern is valid"));
static PROCESSO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{7})(\d{2})(\d{4})(\d)(\d{2})(\d{4})$").expect("processo pattern is valid")
});

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// 1234.5 → "1.234,50"
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    match fraction {
        Some(f) => format!("{}{},{}", sign, group_thousands(integer), f),
        None => format!("{}{}", sign, group_thousands(integer)),
    }
}

pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format_number(value, 2);
    match formatted.strip_prefix('-') {
        Some(abs) => format!("-R$ {}", abs),
        None => format!("R$ {}", formatted),
    }
}

/// `value` is expressed in percentage points: 7.5 → "7,50%".
pub fn format_percent(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    format!("{}%", format_number(value, decimals))
}

/// "R$ 1.234,56" → 1234.56
pub fn parse_currency(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let rest = rest.trim_start_matches("R$").trim();
    if rest.is_empty() {
        return None;
    }
    let normalized = if rest.contains(',') {
        rest.replace('.', "").replace(',', ".")
    } else {
        // 沒有逗號時，點號視為千分位，除非只有一個點且後面最多兩位
        match rest.split_once('.') {
            Some((_, frac)) if frac.len() <= 2 && !frac.contains('.') => rest.to_string(),
            _ => rest.replace('.', ""),
        }
    };
    if !normalized
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.')
    {
        return None;
    }
    let parsed: f64 = normalized.parse().ok()?;
    Some(if negative { -parsed } else { parsed })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// ISO date (optionally with a time part) → "dd/mm/aaaa".
pub fn format_date_str(value: &str) -> String {
    let candidate = value.get(..10).unwrap_or(value);
    match NaiveDate::parse_from_str(candidate, "%Y-%m-%d") {
        Ok(date) => format_date(date),
        Err(_) => value.to_string(),
    }
}

pub fn format_datetime(value: NaiveDateTime) -> String {
    value.format("%d/%m/%Y %H:%M").to_string()
}

pub fn parse_date_br(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d/%m/%Y").ok()
}

pub fn format_phone(value: &str) -> String {
    let digits = clean_cpf_cnpj(value);
    if MOBILE_RE.is_match(&digits) {
        MOBILE_RE.replace(&digits, "($1) $2-$3").into_owned()
    } else if LANDLINE_RE.is_match(&digits) {
        LANDLINE_RE.replace(&digits, "($1) $2-$3").into_owned()
    } else {
        value.to_string()
    }
}

pub fn format_cep(value: &str) -> String {
    let digits = clean_cpf_cnpj(value);
    if CEP_RE.is_match(&digits) {
        CEP_RE.replace(&digits, "$1-$2").into_owned()
    } else {
        value.to_string()
    }
}

/// 20 digits → "NNNNNNN-DD.AAAA.J.TR.OOOO"
pub fn format_processo(value: &str) -> String {
    let digits = clean_cpf_cnpj(value);
    if PROCESSO_RE.is_match(&digits) {
        PROCESSO_RE
            .replace(&digits, "$1-$2.$3.$4.$5.$6")
            .into_owned()
    } else {
        value.to_string()
    }
}

fn mod97(digits: &str) -> u32 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0, |acc, d| (acc * 10 + d) % 97)
}

/// CNJ unified numbering check digits (ISO 7064 mod 97-10).
pub fn is_valid_processo(value: &str) -> bool {
    let digits = clean_cpf_cnpj(value);
    if digits.len() != 20 {
        return false;
    }
    let reordered = format!("{}{}{}", &digits[0..7], &digits[9..20], &digits[7..9]);
    mod97(&reordered) == 1
}

/// Check digits for a CNJ number given without them (18 digits: N, A, J, TR, O).
pub fn processo_check_digits(without_dv: &str) -> Option<String> {
    let digits = clean_cpf_cnpj(without_dv);
    if digits.len() != 18 {
        return None;
    }
    let remainder = mod97(&format!("{}00", digits));
    Some(format!("{:02}", 98 - remainder))
}

fn plural(n: u32, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}", n, plural)
    }
}

/// Sentence length in days (30-day months, 12-month years) → "2 anos, 6 meses e 10 dias".
pub fn format_pena(total_dias: u32) -> String {
    let anos = total_dias / 360;
    let meses = (total_dias % 360) / 30;
    let dias = total_dias % 30;

    let mut parts = Vec::new();
    if anos > 0 {
        parts.push(plural(anos, "ano", "anos"));
    }
    if meses > 0 {
        parts.push(plural(meses, "mês", "meses"));
    }
    if dias > 0 {
        parts.push(plural(dias, "dia", "dias"));
    }

    match parts.len() {
        0 => "0 dias".to_string(),
        1 => parts.remove(0),
        _ => {
            let last = parts.pop().unwrap_or_default();
            format!("{} e {}", parts.join(", "), last)
        }
    }
}
