/// 以「分」為單位四捨五入（half away from zero）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Equivalent monthly rate of an annual rate compounded monthly.
pub fn monthly_from_annual(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0
}
