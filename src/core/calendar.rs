use crate::utils::error::{JurisError, Result};
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| JurisError::calculation(format!("date overflow adding {} months", months)))
}

pub fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| JurisError::calculation(format!("date overflow adding {} days", days)))
}

/// "2024-03" → 2024-03-01
pub fn parse_competencia(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .map_err(|_| JurisError::invalid("competencia", value, "Expected format YYYY-MM"))
}

pub fn format_competencia(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Completed years between two dates (anniversary based).
pub fn full_years_between(inicio: NaiveDate, fim: NaiveDate) -> u32 {
    if fim < inicio {
        return 0;
    }
    let mut years = (fim.year() - inicio.year()) as u32;
    if (fim.month(), fim.day()) < (inicio.month(), inicio.day()) {
        years = years.saturating_sub(1);
    }
    years
}

/// 計算「avos」：完整月份數，剩餘不足一個月但達 15 天以上也算一個月。
/// 起訖日皆包含在內。
pub fn avos(inicio: NaiveDate, fim: NaiveDate) -> u32 {
    if fim < inicio {
        return 0;
    }
    let Some(limite) = fim.succ_opt() else {
        return 0;
    };
    let mut count = 0u32;
    let mut cursor = inicio;
    while let Some(next) = inicio.checked_add_months(Months::new(count + 1)) {
        if next > limite {
            break;
        }
        count += 1;
        cursor = next;
    }
    let restante = (limite - cursor).num_days();
    if restante >= 15 {
        count += 1;
    }
    count
}

/// Easter Sunday (anonymous Gregorian algorithm).
pub fn easter(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// 全國性假日（含以復活節推算的移動假日）
pub fn national_holidays(year: i32) -> Vec<NaiveDate> {
    let mut fixed: Vec<(u32, u32)> = vec![
        (1, 1),
        (4, 21),
        (5, 1),
        (9, 7),
        (10, 12),
        (11, 2),
        (11, 15),
        (12, 25),
    ];
    // Dia da Consciência Negra: feriado nacional a partir de 2024
    if year >= 2024 {
        fixed.push((11, 20));
    }

    let mut holidays: Vec<NaiveDate> = fixed
        .into_iter()
        .filter_map(|(m, d)| NaiveDate::from_ymd_opt(year, m, d))
        .collect();

    if let Some(pascoa) = easter(year) {
        for offset in [-48i64, -47, -2, 60] {
            if let Some(date) = pascoa.checked_add_signed(chrono::Duration::days(offset)) {
                holidays.push(date);
            }
        }
    }
    holidays.sort();
    holidays
}

/// Recesso forense (art. 220 CPC): 20 de dezembro a 20 de janeiro.
pub fn is_recesso_forense(date: NaiveDate) -> bool {
    (date.month() == 12 && date.day() >= 20) || (date.month() == 1 && date.day() <= 20)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_holiday(date: NaiveDate, extra: &[NaiveDate]) -> bool {
    extra.contains(&date) || national_holidays(date.year()).contains(&date)
}

pub fn is_business_day(date: NaiveDate, extra: &[NaiveDate]) -> bool {
    !is_weekend(date) && !is_holiday(date, extra)
}

/// Business days (Mon–Sat minus holidays) and rest days (Sundays and holidays)
/// of a calendar month, as used for DSR.
pub fn dias_uteis_e_descanso(competencia: NaiveDate, extra: &[NaiveDate]) -> (u32, u32) {
    let first = competencia.with_day(1).unwrap_or(competencia);
    let mut uteis = 0;
    let mut descanso = 0;
    let mut day = first;
    while day.month() == first.month() {
        if day.weekday() == Weekday::Sun || is_holiday(day, extra) {
            descanso += 1;
        } else {
            uteis += 1;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    (uteis, descanso)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_full_years_between() {
        assert_eq!(full_years_between(d(2020, 3, 10), d(2024, 3, 9)), 3);
        assert_eq!(full_years_between(d(2020, 3, 10), d(2024, 3, 10)), 4);
        assert_eq!(full_years_between(d(2024, 3, 10), d(2020, 3, 10)), 0);
    }

    #[test]
    fn test_avos() {
        // 整年
        assert_eq!(avos(d(2024, 1, 1), d(2024, 12, 31)), 12);
        // 1/jan a 15/jun: 5 meses completos + 15 dias
        assert_eq!(avos(d(2024, 1, 1), d(2024, 6, 15)), 6);
        // 1/jan a 14/jun: 5 meses completos + 14 dias
        assert_eq!(avos(d(2024, 1, 1), d(2024, 6, 14)), 5);
        assert_eq!(avos(d(2024, 3, 10), d(2024, 3, 20)), 0);
    }

    #[test]
    fn test_easter() {
        assert_eq!(easter(2024), Some(d(2024, 3, 31)));
        assert_eq!(easter(2025), Some(d(2025, 4, 20)));
    }

    #[test]
    fn test_holidays() {
        let holidays = national_holidays(2024);
        assert!(holidays.contains(&d(2024, 2, 13))); // carnaval
        assert!(holidays.contains(&d(2024, 3, 29))); // sexta-feira santa
        assert!(holidays.contains(&d(2024, 5, 30))); // corpus christi
        assert!(holidays.contains(&d(2024, 11, 20)));
        assert!(!national_holidays(2023).contains(&d(2023, 11, 20)));
    }

    #[test]
    fn test_business_days() {
        assert!(is_business_day(d(2024, 3, 4), &[]));
        assert!(!is_business_day(d(2024, 3, 2), &[]));
        assert!(!is_business_day(d(2024, 3, 4), &[d(2024, 3, 4)]));
        assert!(is_recesso_forense(d(2024, 12, 20)));
        assert!(is_recesso_forense(d(2025, 1, 20)));
        assert!(!is_recesso_forense(d(2025, 1, 21)));
    }

    #[test]
    fn test_dias_uteis_e_descanso() {
        // junho/2024: 30 dias, 5 domingos, sem feriados nacionais
        assert_eq!(dias_uteis_e_descanso(d(2024, 6, 1), &[]), (25, 5));
    }

    #[test]
    fn test_competencia() {
        assert_eq!(parse_competencia("2024-03").unwrap(), d(2024, 3, 1));
        assert!(parse_competencia("03/2024").is_err());
        assert_eq!(format_competencia(d(2024, 3, 1)), "2024-03");
    }
}
