use crate::app::calculators::dosimetria::{Pena, DIAS_POR_ANO};
use crate::config::rates::RateTables;
use crate::core::calendar::add_months;
use crate::core::format::format_pena;
use crate::domain::ports::Calculator;
use crate::utils::error::{JurisError, Result};
use crate::utils::validation::Validate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalidadePrescricao {
    /// Before final judgment: maximum abstract or concrete sentence.
    #[default]
    PretensaoPunitiva,
    /// After final judgment: the sentence imposed.
    PretensaoExecutoria,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescricaoInput {
    pub pena: Pena,
    #[serde(default)]
    pub modalidade: ModalidadePrescricao,
    #[serde(default)]
    pub menor_21_na_data_do_fato: bool,
    #[serde(default)]
    pub maior_70_na_sentenca: bool,
    #[serde(default)]
    pub reincidente: bool,
    /// Starting mark (fato, recebimento da denúncia, trânsito em julgado...).
    #[serde(default)]
    pub data_inicio: Option<NaiveDate>,
    /// Date to check the deadline against.
    #[serde(default)]
    pub data_referencia: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescricaoOutput {
    pub prazo_base_anos: u32,
    pub reducao_pela_metade: bool,
    pub aumento_reincidencia: bool,
    pub prazo_meses: u32,
    pub prazo: String,
    pub data_prescricao: Option<NaiveDate>,
    pub prescrito: Option<bool>,
}

impl Validate for PrescricaoInput {
    fn validate(&self) -> Result<()> {
        if self.pena.validate_limite("pena")? == 0 {
            return Err(JurisError::invalid("pena", self.pena, "Sentence must be greater than zero"));
        }
        if self.data_referencia.is_some() && self.data_inicio.is_none() {
            return Err(JurisError::MissingFieldError {
                field: "dataInicio".to_string(),
            });
        }
        Ok(())
    }
}

/// Tabela do art. 109 CP, em anos.
pub fn prazo_base_anos(pena_dias: u32) -> u32 {
    match pena_dias {
        d if d > 12 * DIAS_POR_ANO => 20,
        d if d > 8 * DIAS_POR_ANO => 16,
        d if d > 4 * DIAS_POR_ANO => 12,
        d if d > 2 * DIAS_POR_ANO => 8,
        d if d >= DIAS_POR_ANO => 4,
        _ => 3,
    }
}

pub fn calcular_prescricao(input: &PrescricaoInput) -> Result<PrescricaoOutput> {
    let prazo_base_anos = prazo_base_anos(input.pena.total_dias());
    let mut prazo_meses = prazo_base_anos * 12;

    // art. 110 CP：累犯僅在執行時效增加三分之一
    let aumento_reincidencia =
        input.reincidente && input.modalidade == ModalidadePrescricao::PretensaoExecutoria;
    if aumento_reincidencia {
        prazo_meses = prazo_meses * 4 / 3;
    }
    // art. 115 CP
    let reducao_pela_metade = input.menor_21_na_data_do_fato || input.maior_70_na_sentenca;
    if reducao_pela_metade {
        prazo_meses /= 2;
    }

    // 起算日當天計入（art. 10 CP），因此屆滿日為週年前一日
    let data_prescricao = match input.data_inicio {
        Some(inicio) => add_months(inicio, prazo_meses)?.pred_opt(),
        None => None,
    };
    let prescrito = match (data_prescricao, input.data_referencia) {
        (Some(limite), Some(referencia)) => Some(referencia > limite),
        _ => None,
    };

    Ok(PrescricaoOutput {
        prazo_base_anos,
        reducao_pela_metade,
        aumento_reincidencia,
        prazo_meses,
        prazo: format_pena(prazo_meses * 30),
        data_prescricao,
        prescrito,
    })
}

pub struct PrescricaoCalculator;

impl Calculator for PrescricaoCalculator {
    type Input = PrescricaoInput;
    type Output = PrescricaoOutput;

    fn name(&self) -> &'static str {
        "prescricao"
    }

    fn calculate(&self, input: &PrescricaoInput, _tables: &RateTables) -> Result<PrescricaoOutput> {
        calcular_prescricao(input)
    }
}
