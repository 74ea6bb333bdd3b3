//! Dosimetria da pena em três fases (art. 68 CP).
//!
//! Penas são manipuladas em dias, com meses de 30 dias e anos de 360 dias;
//! frações de dia são desprezadas (art. 11 CP).

use crate::config::rates::RateTables;
use crate::core::format::format_pena;
use crate::domain::ports::Calculator;
use crate::utils::error::{JurisError, Result};
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const DIAS_POR_MES: u32 = 30;
pub const DIAS_POR_ANO: u32 = 360;
/// Longest sentence accepted in a request (1000 anos).
pub const PENA_MAXIMA_DIAS: u32 = 1000 * DIAS_POR_ANO;
/// Largest term accepted in an increase or decrease fraction.
pub const TERMO_MAXIMO_FRACAO: u32 = 100;
pub const MAX_CAUSAS: usize = 10;

/// Sentence length as years, months and days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pena {
    #[serde(default)]
    pub anos: u32,
    #[serde(default)]
    pub meses: u32,
    #[serde(default)]
    pub dias: u32,
}

impl Pena {
    /// Saturates at `u32::MAX`; `validate_limite` rejects anything that large.
    pub fn total_dias(&self) -> u32 {
        self.anos
            .saturating_mul(DIAS_POR_ANO)
            .saturating_add(self.meses.saturating_mul(DIAS_POR_MES))
            .saturating_add(self.dias)
    }

    /// 刑期不得超過 `PENA_MAXIMA_DIAS`，回傳總日數
    pub fn validate_limite(&self, field: &str) -> Result<u32> {
        let total = self.total_dias();
        if total > PENA_MAXIMA_DIAS {
            return Err(JurisError::invalid(
                field,
                total,
                format!("Sentence cannot exceed {} days", PENA_MAXIMA_DIAS),
            ));
        }
        Ok(total)
    }

    pub fn from_dias(total: u32) -> Self {
        Self {
            anos: total / DIAS_POR_ANO,
            meses: (total % DIAS_POR_ANO) / DIAS_POR_MES,
            dias: total % DIAS_POR_MES,
        }
    }
}

impl fmt::Display for Pena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_pena(self.total_dias()))
    }
}

/// A fraction such as "1/3", written as a string in requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fracao {
    pub numerador: u32,
    pub denominador: u32,
}

impl Fracao {
    pub fn new(numerador: u32, denominador: u32) -> Result<Self> {
        if denominador == 0 {
            return Err(JurisError::invalid(
                "fracao",
                format!("{}/{}", numerador, denominador),
                "Denominator must be greater than zero",
            ));
        }
        Ok(Self { numerador, denominador })
    }

    pub fn valor(&self) -> f64 {
        f64::from(self.numerador) / f64::from(self.denominador)
    }
}

impl FromStr for Fracao {
    type Err = JurisError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || JurisError::invalid("fracao", s, "Expected a fraction such as 1/3");
        let (n, d) = s.trim().split_once('/').ok_or_else(invalid)?;
        let numerador = n.trim().parse().map_err(|_| invalid())?;
        let denominador = d.trim().parse().map_err(|_| invalid())?;
        Fracao::new(numerador, denominador)
    }
}

impl TryFrom<String> for Fracao {
    type Error = JurisError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Fracao> for String {
    fn from(value: Fracao) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Fracao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerador, self.denominador)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Fechado,
    Semiaberto,
    Aberto,
}

impl Regime {
    pub fn proximo(self) -> Option<Regime> {
        match self {
            Regime::Fechado => Some(Regime::Semiaberto),
            Regime::Semiaberto => Some(Regime::Aberto),
            Regime::Aberto => None,
        }
    }

    /// 依刑期與累犯決定起始執行制度（art. 33 §2 CP）
    pub fn inicial(pena_dias: u32, reincidente: bool) -> Regime {
        let anos_4 = 4 * DIAS_POR_ANO;
        let anos_8 = 8 * DIAS_POR_ANO;
        match pena_dias {
            d if d > anos_8 => Regime::Fechado,
            d if d > anos_4 => {
                if reincidente {
                    Regime::Fechado
                } else {
                    Regime::Semiaberto
                }
            }
            _ => {
                if reincidente {
                    Regime::Semiaberto
                } else {
                    Regime::Aberto
                }
            }
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Regime::Fechado => "fechado",
            Regime::Semiaberto => "semiaberto",
            Regime::Aberto => "aberto",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DosimetriaInput {
    pub pena_minima: Pena,
    pub pena_maxima: Pena,
    /// Unfavourable judicial circumstances of art. 59 CP (0..=8).
    #[serde(default)]
    pub circunstancias_desfavoraveis: u32,
    #[serde(default)]
    pub agravantes: u32,
    #[serde(default)]
    pub atenuantes: u32,
    #[serde(default)]
    pub causas_aumento: Vec<Fracao>,
    #[serde(default)]
    pub causas_diminuicao: Vec<Fracao>,
    #[serde(default)]
    pub reincidente: bool,
    #[serde(default)]
    pub violencia_ou_grave_ameaca: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DosimetriaOutput {
    pub pena_base_dias: u32,
    pub pena_intermediaria_dias: u32,
    pub pena_definitiva_dias: u32,
    pub pena_base: String,
    pub pena_intermediaria: String,
    pub pena_definitiva: String,
    pub regime_inicial: Regime,
    pub substituicao_possivel: bool,
    pub sursis_possivel: bool,
}

impl Validate for DosimetriaInput {
    fn validate(&self) -> Result<()> {
        let maxima = self.pena_maxima.validate_limite("penaMaxima")?;
        let minima = self.pena_minima.validate_limite("penaMinima")?;
        if maxima == 0 {
            return Err(JurisError::invalid("penaMaxima", 0, "Must be greater than zero"));
        }
        if minima > maxima {
            return Err(JurisError::invalid(
                "penaMinima",
                self.pena_minima,
                "Minimum sentence cannot exceed the maximum",
            ));
        }
        validate_range("circunstanciasDesfavoraveis", self.circunstancias_desfavoraveis, 0, 8)?;
        validate_range("agravantes", self.agravantes, 0, 100)?;
        validate_range("atenuantes", self.atenuantes, 0, 100)?;
        for (field, causas) in [
            ("causasAumento", &self.causas_aumento),
            ("causasDiminuicao", &self.causas_diminuicao),
        ] {
            if causas.len() > MAX_CAUSAS {
                return Err(JurisError::invalid(
                    field,
                    causas.len(),
                    format!("At most {} causes are accepted", MAX_CAUSAS),
                ));
            }
            for fracao in causas {
                if fracao.numerador > TERMO_MAXIMO_FRACAO
                    || fracao.denominador > TERMO_MAXIMO_FRACAO
                {
                    return Err(JurisError::invalid(
                        field,
                        fracao,
                        format!("Fraction terms cannot exceed {}", TERMO_MAXIMO_FRACAO),
                    ));
                }
            }
        }
        for fracao in &self.causas_diminuicao {
            if fracao.numerador >= fracao.denominador {
                return Err(JurisError::invalid(
                    "causasDiminuicao",
                    fracao,
                    "A decrease must be a fraction below 1",
                ));
            }
        }
        Ok(())
    }
}

/// `pena × fator / d`, failing instead of overflowing.
fn aplicar_fracao(pena: i64, fator: i64, d: i64) -> Result<i64> {
    pena.checked_mul(fator)
        .map(|v| v / d)
        .ok_or_else(|| JurisError::calculation("Third-phase sentence exceeds the representable range"))
}

pub fn calcular_dosimetria(input: &DosimetriaInput) -> Result<DosimetriaOutput> {
    let minima = i64::from(input.pena_minima.total_dias());
    let maxima = i64::from(input.pena_maxima.total_dias());

    // 第一階段：每項不利情狀加上 (最高 − 最低) / 8
    let base = minima + (maxima - minima) * i64::from(input.circunstancias_desfavoraveis) / 8;

    // 第二階段：加重／減輕各 1/6，結果不得超出法定刑範圍（Súmula 231 STJ）
    let saldo = i64::from(input.agravantes) - i64::from(input.atenuantes);
    let intermediaria = (base + (base * saldo).div_euclid(6)).clamp(minima, maxima);

    // 第三階段：加重與減輕事由依序連乘，可超出法定刑範圍
    let mut definitiva = intermediaria;
    for fracao in &input.causas_aumento {
        let (n, d) = (i64::from(fracao.numerador), i64::from(fracao.denominador));
        definitiva = aplicar_fracao(definitiva, d + n, d)?;
    }
    for fracao in &input.causas_diminuicao {
        let (n, d) = (i64::from(fracao.numerador), i64::from(fracao.denominador));
        definitiva = aplicar_fracao(definitiva, (d - n).max(0), d)?;
    }

    let to_dias = |v: i64| u32::try_from(v.max(0)).unwrap_or(u32::MAX);
    let pena_base_dias = to_dias(base);
    let pena_intermediaria_dias = to_dias(intermediaria);
    let pena_definitiva_dias = to_dias(definitiva);
    debug!(
        "⚖️ Dosimetria: base {} → intermediária {} → definitiva {} dias",
        pena_base_dias, pena_intermediaria_dias, pena_definitiva_dias
    );

    // art. 44 CP：四年以下、非暴力、非累犯
    let substituicao_possivel = pena_definitiva_dias <= 4 * DIAS_POR_ANO
        && !input.violencia_ou_grave_ameaca
        && !input.reincidente;
    // art. 77 CP：兩年以下、非累犯，且不適用替代刑時才考慮緩刑
    let sursis_possivel =
        pena_definitiva_dias <= 2 * DIAS_POR_ANO && !input.reincidente && !substituicao_possivel;

    Ok(DosimetriaOutput {
        pena_base_dias,
        pena_intermediaria_dias,
        pena_definitiva_dias,
        pena_base: format_pena(pena_base_dias),
        pena_intermediaria: format_pena(pena_intermediaria_dias),
        pena_definitiva: format_pena(pena_definitiva_dias),
        regime_inicial: Regime::inicial(pena_definitiva_dias, input.reincidente),
        substituicao_possivel,
        sursis_possivel,
    })
}

pub struct DosimetriaCalculator;

impl Calculator for DosimetriaCalculator {
    type Input = DosimetriaInput;
    type Output = DosimetriaOutput;

    fn name(&self) -> &'static str {
        "dosimetria"
    }

    fn calculate(&self, input: &DosimetriaInput, _tables: &RateTables) -> Result<DosimetriaOutput> {
        calcular_dosimetria(input)
    }
}
