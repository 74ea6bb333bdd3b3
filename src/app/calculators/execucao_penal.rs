//! Execução penal: progressão de regime (art. 112 LEP), livramento
//! condicional (art. 83 CP) e detração (art. 42 CP).

use crate::app::calculators::dosimetria::{Fracao, Pena, Regime};
use crate::config::rates::RateTables;
use crate::core::calendar::add_days;
use crate::core::format::format_pena;
use crate::domain::ports::Calculator;
use crate::utils::error::{JurisError, Result};
use crate::utils::validation::Validate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hipóteses dos incisos do art. 112 LEP e do §3 (gestante ou mãe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HipoteseProgressao {
    PrimarioSemViolencia,
    ReincidenteSemViolencia,
    PrimarioComViolencia,
    ReincidenteComViolencia,
    PrimarioHediondo,
    HediondoComMorte,
    ReincidenteHediondo,
    ReincidenteHediondoComMorte,
    GestanteOuMae,
}

impl HipoteseProgressao {
    /// Share of the remaining sentence, in percent.
    pub fn percentual(self) -> f64 {
        match self {
            HipoteseProgressao::PrimarioSemViolencia => 16.0,
            HipoteseProgressao::ReincidenteSemViolencia => 20.0,
            HipoteseProgressao::PrimarioComViolencia => 25.0,
            HipoteseProgressao::ReincidenteComViolencia => 30.0,
            HipoteseProgressao::PrimarioHediondo => 40.0,
            HipoteseProgressao::HediondoComMorte => 50.0,
            HipoteseProgressao::ReincidenteHediondo => 60.0,
            HipoteseProgressao::ReincidenteHediondoComMorte => 70.0,
            HipoteseProgressao::GestanteOuMae => 12.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HipoteseLivramento {
    /// Primário de bons antecedentes: 1/3.
    Primario,
    /// Reincidente em crime doloso: 1/2.
    Reincidente,
    /// Crime hediondo ou equiparado: 2/3.
    Hediondo,
}

impl HipoteseLivramento {
    pub fn fracao(self) -> Fracao {
        match self {
            HipoteseLivramento::Primario => Fracao { numerador: 1, denominador: 3 },
            HipoteseLivramento::Reincidente => Fracao { numerador: 1, denominador: 2 },
            HipoteseLivramento::Hediondo => Fracao { numerador: 2, denominador: 3 },
        }
    }
}

fn default_regime() -> Regime {
    Regime::Fechado
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressaoInput {
    pub pena: Pena,
    pub data_inicio: NaiveDate,
    pub hipotese: HipoteseProgressao,
    #[serde(default = "default_regime")]
    pub regime_inicial: Regime,
    /// Provisional custody already served (detração).
    #[serde(default)]
    pub dias_detracao: u32,
    /// Days remitted by work or study (remição).
    #[serde(default)]
    pub dias_remidos: u32,
    #[serde(default)]
    pub livramento: Option<HipoteseLivramento>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtapaProgressao {
    pub de: Regime,
    pub para: Regime,
    pub dias_requisito: u32,
    pub data_prevista: NaiveDate,
    pub pena_restante_dias: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivramentoCondicional {
    pub fracao: Fracao,
    pub dias_requisito: u32,
    pub data_prevista: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressaoOutput {
    pub pena_total_dias: u32,
    pub pena_total: String,
    pub dias_cumpridos: u32,
    pub percentual: f64,
    pub etapas: Vec<EtapaProgressao>,
    pub livramento: Option<LivramentoCondicional>,
    pub data_termino: NaiveDate,
}

impl Validate for ProgressaoInput {
    fn validate(&self) -> Result<()> {
        let total = self.pena.validate_limite("pena")?;
        if total == 0 {
            return Err(JurisError::invalid("pena", self.pena, "Sentence must be greater than zero"));
        }
        let cumpridos = self.dias_detracao.saturating_add(self.dias_remidos);
        if cumpridos >= total {
            return Err(JurisError::invalid(
                "diasDetracao",
                cumpridos,
                "Days already served must be below the sentence",
            ));
        }
        Ok(())
    }
}

fn fracao_de(dias: u32, percentual: f64) -> u32 {
    (f64::from(dias) * percentual / 100.0).ceil() as u32
}

/// 每次晉級的要件以「剩餘刑期」計算；已羈押與減刑日數僅折抵第一階段
pub fn calcular_progressao(input: &ProgressaoInput) -> Result<ProgressaoOutput> {
    let pena_total_dias = input.pena.total_dias();
    let dias_cumpridos = input.dias_detracao.saturating_add(input.dias_remidos);
    let percentual = input.hipotese.percentual();

    let mut etapas = Vec::new();
    let mut saldo = pena_total_dias;
    let mut credito = dias_cumpridos;
    let mut cursor = input.data_inicio;
    let mut regime = input.regime_inicial;
    while let Some(para) = regime.proximo() {
        let dias_requisito = fracao_de(saldo, percentual);
        let a_cumprir = dias_requisito.saturating_sub(credito);
        credito = credito.saturating_sub(dias_requisito);
        cursor = add_days(cursor, u64::from(a_cumprir))?;
        saldo = saldo.saturating_sub(dias_requisito);
        etapas.push(EtapaProgressao {
            de: regime,
            para,
            dias_requisito,
            data_prevista: cursor,
            pena_restante_dias: saldo,
        });
        regime = para;
    }

    let livramento = match input.livramento {
        Some(hipotese) => {
            let fracao = hipotese.fracao();
            let dias_requisito = (u64::from(pena_total_dias) * u64::from(fracao.numerador))
                .div_ceil(u64::from(fracao.denominador));
            let a_cumprir = dias_requisito.saturating_sub(u64::from(dias_cumpridos));
            Some(LivramentoCondicional {
                fracao,
                dias_requisito: u32::try_from(dias_requisito).unwrap_or(u32::MAX),
                data_prevista: add_days(input.data_inicio, a_cumprir)?,
            })
        }
        None => None,
    };

    let data_termino = add_days(
        input.data_inicio,
        u64::from(pena_total_dias.saturating_sub(dias_cumpridos)),
    )?;
    debug!(
        "🔓 Progressão: {} etapas, término previsto em {}",
        etapas.len(),
        data_termino
    );

    Ok(ProgressaoOutput {
        pena_total_dias,
        pena_total: format_pena(pena_total_dias),
        dias_cumpridos,
        percentual,
        etapas,
        livramento,
        data_termino,
    })
}

pub struct ProgressaoCalculator;

impl Calculator for ProgressaoCalculator {
    type Input = ProgressaoInput;
    type Output = ProgressaoOutput;

    fn name(&self) -> &'static str {
        "progressao_regime"
    }

    fn calculate(&self, input: &ProgressaoInput, _tables: &RateTables) -> Result<ProgressaoOutput> {
        calcular_progressao(input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodoCustodia {
    pub inicio: NaiveDate,
    pub fim: NaiveDate,
}

impl PeriodoCustodia {
    /// Both ends count.
    pub fn dias(&self) -> u32 {
        u32::try_from((self.fim - self.inicio).num_days() + 1).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetracaoInput {
    pub pena: Pena,
    #[serde(default)]
    pub periodos: Vec<PeriodoCustodia>,
    /// Custody days given directly, added to the periods.
    #[serde(default)]
    pub dias_adicionais: u32,
    #[serde(default)]
    pub reincidente: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetracaoOutput {
    pub pena_total_dias: u32,
    pub dias_detraidos: u32,
    pub pena_restante_dias: u32,
    pub pena_restante: String,
    /// Initial regime reconsidered after the deduction (art. 387 §2 CPP).
    pub regime_inicial: Regime,
}

impl Validate for DetracaoInput {
    fn validate(&self) -> Result<()> {
        if self.pena.validate_limite("pena")? == 0 {
            return Err(JurisError::invalid("pena", self.pena, "Sentence must be greater than zero"));
        }
        for periodo in &self.periodos {
            if periodo.fim < periodo.inicio {
                return Err(JurisError::invalid(
                    "periodos",
                    periodo.fim,
                    "Custody period ends before it starts",
                ));
            }
        }
        Ok(())
    }
}

pub fn calcular_detracao(input: &DetracaoInput) -> DetracaoOutput {
    let pena_total_dias = input.pena.total_dias();
    let dias_detraidos = input
        .periodos
        .iter()
        .map(PeriodoCustodia::dias)
        .fold(input.dias_adicionais, u32::saturating_add);
    let pena_restante_dias = pena_total_dias.saturating_sub(dias_detraidos);

    DetracaoOutput {
        pena_total_dias,
        dias_detraidos,
        pena_restante_dias,
        pena_restante: format_pena(pena_restante_dias),
        regime_inicial: Regime::inicial(pena_restante_dias, input.reincidente),
    }
}

pub struct DetracaoCalculator;

impl Calculator for DetracaoCalculator {
    type Input = DetracaoInput;
    type Output = DetracaoOutput;

    fn name(&self) -> &'static str {
        "detracao"
    }

    fn calculate(&self, input: &DetracaoInput, _tables: &RateTables) -> Result<DetracaoOutput> {
        Ok(calcular_detracao(input))
    }
}
