use crate::config::rates::RateTables;
use crate::core::calendar::{add_days, full_years_between};
use crate::domain::ports::Calculator;
use crate::utils::error::{JurisError, Result};
use crate::utils::money::round2;
use crate::utils::validation::{validate_non_negative, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DIAS_BASE: u32 = 30;
pub const DIAS_POR_ANO: u32 = 3;
pub const DIAS_MAXIMO: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalidadeAviso {
    #[default]
    Indenizado,
    Trabalhado,
    Dispensado,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvisoPrevioInput {
    pub salario: f64,
    pub data_admissao: NaiveDate,
    pub data_desligamento: NaiveDate,
    #[serde(default)]
    pub modalidade: ModalidadeAviso,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvisoPrevioOutput {
    pub anos_completos: u32,
    pub dias: u32,
    pub valor: f64,
    pub modalidade: ModalidadeAviso,
    /// Contract end date including the notice projection.
    pub data_projetada: NaiveDate,
}

impl Validate for AvisoPrevioInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("salario", self.salario)?;
        validate_dates(self.data_admissao, self.data_desligamento)
    }
}

pub(crate) fn validate_dates(admissao: NaiveDate, desligamento: NaiveDate) -> Result<()> {
    if desligamento < admissao {
        return Err(JurisError::invalid(
            "dataDesligamento",
            desligamento,
            "Termination date cannot precede the admission date",
        ));
    }
    Ok(())
}

/// 預告期天數：30 天，每滿一年加 3 天，上限 90 天（Lei 12.506/2011）
pub fn dias_aviso(admissao: NaiveDate, desligamento: NaiveDate) -> u32 {
    let anos = full_years_between(admissao, desligamento);
    (DIAS_BASE + DIAS_POR_ANO * anos).min(DIAS_MAXIMO)
}

pub fn calcular_aviso(input: &AvisoPrevioInput) -> Result<AvisoPrevioOutput> {
    let anos_completos = full_years_between(input.data_admissao, input.data_desligamento);
    let dias = dias_aviso(input.data_admissao, input.data_desligamento);
    let valor = match input.modalidade {
        ModalidadeAviso::Dispensado => 0.0,
        _ => round2(input.salario / 30.0 * f64::from(dias)),
    };
    let data_projetada = match input.modalidade {
        ModalidadeAviso::Indenizado => add_days(input.data_desligamento, u64::from(dias))?,
        _ => input.data_desligamento,
    };

    Ok(AvisoPrevioOutput {
        anos_completos,
        dias,
        valor,
        modalidade: input.modalidade,
        data_projetada,
    })
}

pub struct AvisoPrevioCalculator;

impl Calculator for AvisoPrevioCalculator {
    type Input = AvisoPrevioInput;
    type Output = AvisoPrevioOutput;

    fn name(&self) -> &'static str {
        "aviso_previo"
    }

    fn calculate(&self, input: &AvisoPrevioInput, _tables: &RateTables) -> Result<AvisoPrevioOutput> {
        calcular_aviso(input)
    }
}
