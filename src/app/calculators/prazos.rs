//! Contagem de prazos processuais (arts. 219, 220 e 224 CPC).

use crate::config::rates::RateTables;
use crate::core::calendar::{is_business_day, is_holiday, is_recesso_forense};
use crate::domain::ports::Calculator;
use crate::utils::error::{JurisError, Result};
use crate::utils::validation::{validate_range, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contagem {
    #[default]
    DiasUteis,
    DiasCorridos,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrazoInput {
    pub data_intimacao: NaiveDate,
    pub dias: u32,
    #[serde(default)]
    pub contagem: Contagem,
    /// Fazenda Pública, Defensoria, Ministério Público, litisconsortes com procuradores distintos.
    #[serde(default)]
    pub em_dobro: bool,
    #[serde(default)]
    pub feriados_adicionais: Vec<NaiveDate>,
    #[serde(default = "default_true")]
    pub suspender_recesso: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrazoOutput {
    pub prazo_dias: u32,
    pub data_inicio: NaiveDate,
    pub data_final: NaiveDate,
    pub dias_corridos_total: i64,
    pub dias_nao_contados: u32,
    pub feriados_no_periodo: Vec<NaiveDate>,
    pub prorrogado: bool,
}

impl Validate for PrazoInput {
    fn validate(&self) -> Result<()> {
        validate_range("dias", self.dias, 1, 3650)
    }
}

fn proximo_dia(data: NaiveDate) -> Result<NaiveDate> {
    data.succ_opt()
        .ok_or_else(|| JurisError::calculation(format!("date overflow after {}", data)))
}

struct Calendario<'a> {
    feriados: &'a [NaiveDate],
    suspender_recesso: bool,
}

impl Calendario<'_> {
    fn suspenso(&self, data: NaiveDate) -> bool {
        self.suspender_recesso && is_recesso_forense(data)
    }

    fn dia_util(&self, data: NaiveDate) -> bool {
        is_business_day(data, self.feriados) && !self.suspenso(data)
    }

    fn conta(&self, data: NaiveDate, contagem: Contagem) -> bool {
        match contagem {
            Contagem::DiasUteis => self.dia_util(data),
            Contagem::DiasCorridos => !self.suspenso(data),
        }
    }

    fn proximo_util(&self, mut data: NaiveDate) -> Result<NaiveDate> {
        while !self.dia_util(data) {
            data = proximo_dia(data)?;
        }
        Ok(data)
    }
}

/// 排除送達當日，自其後第一個工作日起算；屆滿日若非工作日則順延
pub fn calcular_prazo(input: &PrazoInput) -> Result<PrazoOutput> {
    let calendario = Calendario {
        feriados: &input.feriados_adicionais,
        suspender_recesso: input.suspender_recesso,
    };
    let prazo_dias = if input.em_dobro { input.dias * 2 } else { input.dias };

    let dia_seguinte = proximo_dia(input.data_intimacao)?;
    let data_inicio = match input.contagem {
        Contagem::DiasUteis => calendario.proximo_util(dia_seguinte)?,
        Contagem::DiasCorridos => dia_seguinte,
    };
    let mut contados = 0;
    let mut dias_nao_contados = 0;
    let mut feriados_no_periodo = Vec::new();
    let mut data = data_inicio;
    loop {
        if is_holiday(data, &input.feriados_adicionais) {
            feriados_no_periodo.push(data);
        }
        if calendario.conta(data, input.contagem) {
            contados += 1;
            if contados == prazo_dias {
                break;
            }
        } else {
            dias_nao_contados += 1;
        }
        data = proximo_dia(data)?;
    }

    let data_final = calendario.proximo_util(data)?;
    let prorrogado = data_final != data;
    debug!(
        "📅 Prazo de {} dias: {} → {}{}",
        prazo_dias,
        data_inicio,
        data_final,
        if prorrogado { " (prorrogado)" } else { "" }
    );

    Ok(PrazoOutput {
        prazo_dias,
        data_inicio,
        data_final,
        dias_corridos_total: (data_final - input.data_intimacao).num_days(),
        dias_nao_contados,
        feriados_no_periodo,
        prorrogado,
    })
}

pub struct PrazoCalculator;

impl Calculator for PrazoCalculator {
    type Input = PrazoInput;
    type Output = PrazoOutput;

    fn name(&self) -> &'static str {
        "prazo_processual"
    }

    fn calculate(&self, input: &PrazoInput, _tables: &RateTables) -> Result<PrazoOutput> {
        calcular_prazo(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn input(intimacao: NaiveDate, dias: u32) -> PrazoInput {
        PrazoInput {
            data_intimacao: intimacao,
            dias,
            contagem: Contagem::DiasUteis,
            em_dobro: false,
            feriados_adicionais: vec![],
            suspender_recesso: true,
        }
    }

    #[test]
    fn test_business_days_skip_weekend() {
        let out = calcular_prazo(&input(d(2024, 3, 1), 5)).unwrap();
        assert_eq!(out.data_inicio, d(2024, 3, 4));
        assert_eq!(out.data_final, d(2024, 3, 8));
    }

    #[test]
    fn test_good_friday_is_skipped() {
        let out = calcular_prazo(&input(d(2024, 3, 25), 5)).unwrap();
        assert_eq!(out.data_final, d(2024, 4, 2));
        assert_eq!(out.feriados_no_periodo, vec![d(2024, 3, 29)]);
    }

    #[test]
    fn test_recess_suspends_counting() {
        let out = calcular_prazo(&input(d(2024, 12, 18), 5)).unwrap();
        assert_eq!(out.data_final, d(2025, 1, 24));
    }

    #[test]
    fn test_calendar_days_extend_to_business_day() {
        let mut i = input(d(2024, 3, 1), 15);
        i.contagem = Contagem::DiasCorridos;
        let out = calcular_prazo(&i).unwrap();
        // 15º dia corrido cai no sábado 16/03
        assert_eq!(out.data_inicio, d(2024, 3, 2));
        assert_eq!(out.data_final, d(2024, 3, 18));
        assert!(out.prorrogado);
    }

    #[test]
    fn test_doubled_deadline() {
        let mut i = input(d(2024, 3, 1), 5);
        i.em_dobro = true;
        let out = calcular_prazo(&i).unwrap();
        assert_eq!(out.prazo_dias, 10);
        assert_eq!(out.data_final, d(2024, 3, 15));
    }

    #[test]
    fn test_custom_holiday() {
        let mut i = input(d(2024, 3, 1), 5);
        i.feriados_adicionais = vec![d(2024, 3, 6)];
        let out = calcular_prazo(&i).unwrap();
        assert_eq!(out.data_final, d(2024, 3, 11));
    }
}
