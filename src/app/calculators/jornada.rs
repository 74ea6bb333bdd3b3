//! Horas extras (com reflexo em DSR) e adicional noturno.

use crate::config::rates::RateTables;
use crate::core::calendar::{dias_uteis_e_descanso, parse_competencia};
use crate::domain::ports::Calculator;
use crate::utils::error::{JurisError, Result};
use crate::utils::money::round2;
use crate::utils::validation::{validate_non_negative, validate_positive, Validate};
use serde::{Deserialize, Serialize};

fn default_jornada() -> f64 {
    220.0
}

fn default_percentual_normal() -> f64 {
    50.0
}

fn default_percentual_especial() -> f64 {
    100.0
}

fn default_percentual_noturno() -> f64 {
    20.0
}

/// Minutes of the reduced night hour (art. 73 §1 CLT).
const HORA_NOTURNA_MINUTOS: f64 = 52.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorasExtrasInput {
    pub salario: f64,
    #[serde(default = "default_jornada")]
    pub jornada_mensal: f64,
    #[serde(default)]
    pub horas_normais: f64,
    /// Sundays and holidays.
    #[serde(default)]
    pub horas_especiais: f64,
    #[serde(default = "default_percentual_normal")]
    pub percentual_normal: f64,
    #[serde(default = "default_percentual_especial")]
    pub percentual_especial: f64,
    /// "YYYY-MM"; derives business and rest days when they are not given.
    #[serde(default)]
    pub competencia: Option<String>,
    #[serde(default)]
    pub dias_uteis: Option<u32>,
    #[serde(default)]
    pub dias_descanso: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorasExtrasOutput {
    pub valor_hora: f64,
    pub valor_horas_normais: f64,
    pub valor_horas_especiais: f64,
    pub total_horas_extras: f64,
    pub dias_uteis: u32,
    pub dias_descanso: u32,
    pub reflexo_dsr: f64,
    pub total: f64,
}

impl Validate for HorasExtrasInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("salario", self.salario)?;
        validate_positive("jornadaMensal", self.jornada_mensal)?;
        validate_non_negative("horasNormais", self.horas_normais)?;
        validate_non_negative("horasEspeciais", self.horas_especiais)?;
        validate_non_negative("percentualNormal", self.percentual_normal)?;
        validate_non_negative("percentualEspecial", self.percentual_especial)?;
        if let Some(competencia) = &self.competencia {
            parse_competencia(competencia)?;
        }
        if self.competencia.is_none() && (self.dias_uteis.is_none() || self.dias_descanso.is_none())
        {
            return Err(JurisError::MissingFieldError {
                field: "competencia (or diasUteis + diasDescanso)".to_string(),
            });
        }
        if self.dias_uteis == Some(0) {
            return Err(JurisError::invalid("diasUteis", 0, "Must be greater than zero"));
        }
        Ok(())
    }
}

pub fn calcular_horas_extras(input: &HorasExtrasInput) -> Result<HorasExtrasOutput> {
    let valor_hora = input.salario / input.jornada_mensal;
    let valor_horas_normais =
        round2(valor_hora * (1.0 + input.percentual_normal / 100.0) * input.horas_normais);
    let valor_horas_especiais =
        round2(valor_hora * (1.0 + input.percentual_especial / 100.0) * input.horas_especiais);
    let total_horas_extras = round2(valor_horas_normais + valor_horas_especiais);

    let (calendario_uteis, calendario_descanso) = match &input.competencia {
        Some(c) => dias_uteis_e_descanso(parse_competencia(c)?, &[]),
        None => (0, 0),
    };
    let dias_uteis = input.dias_uteis.unwrap_or(calendario_uteis);
    let dias_descanso = input.dias_descanso.unwrap_or(calendario_descanso);
    if dias_uteis == 0 {
        return Err(JurisError::calculation("no business days in the period"));
    }

    // DSR = (horas extras / dias úteis) × domingos e feriados
    let reflexo_dsr =
        round2(total_horas_extras / f64::from(dias_uteis) * f64::from(dias_descanso));

    Ok(HorasExtrasOutput {
        valor_hora: round2(valor_hora),
        valor_horas_normais,
        valor_horas_especiais,
        total_horas_extras,
        dias_uteis,
        dias_descanso,
        reflexo_dsr,
        total: round2(total_horas_extras + reflexo_dsr),
    })
}

pub struct HorasExtrasCalculator;

impl Calculator for HorasExtrasCalculator {
    type Input = HorasExtrasInput;
    type Output = HorasExtrasOutput;

    fn name(&self) -> &'static str {
        "horas_extras"
    }

    fn calculate(&self, input: &HorasExtrasInput, _tables: &RateTables) -> Result<HorasExtrasOutput> {
        calcular_horas_extras(input)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdicionalNoturnoInput {
    pub salario: f64,
    #[serde(default = "default_jornada")]
    pub jornada_mensal: f64,
    /// Clock hours worked between 22h and 5h.
    pub horas_noturnas: f64,
    #[serde(default = "default_percentual_noturno")]
    pub percentual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdicionalNoturnoOutput {
    pub valor_hora: f64,
    pub horas_reduzidas: f64,
    pub adicional: f64,
}

impl Validate for AdicionalNoturnoInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("salario", self.salario)?;
        validate_positive("jornadaMensal", self.jornada_mensal)?;
        validate_non_negative("horasNoturnas", self.horas_noturnas)?;
        validate_non_negative("percentual", self.percentual)
    }
}

pub fn calcular_adicional_noturno(input: &AdicionalNoturnoInput) -> AdicionalNoturnoOutput {
    let valor_hora = input.salario / input.jornada_mensal;
    let horas_reduzidas = input.horas_noturnas * 60.0 / HORA_NOTURNA_MINUTOS;
    AdicionalNoturnoOutput {
        valor_hora: round2(valor_hora),
        horas_reduzidas: round2(horas_reduzidas),
        adicional: round2(valor_hora * input.percentual / 100.0 * horas_reduzidas),
    }
}

pub struct AdicionalNoturnoCalculator;

impl Calculator for AdicionalNoturnoCalculator {
    type Input = AdicionalNoturnoInput;
    type Output = AdicionalNoturnoOutput;

    fn name(&self) -> &'static str {
        "adicional_noturno"
    }

    fn calculate(
        &self,
        input: &AdicionalNoturnoInput,
        _tables: &RateTables,
    ) -> Result<AdicionalNoturnoOutput> {
        Ok(calcular_adicional_noturno(input))
    }
}
