pub mod adicionais;
pub mod aviso_previo;
pub mod beneficio;
pub mod correcao;
pub mod decimo_terceiro;
pub mod dosimetria;
pub mod execucao_penal;
pub mod ferias;
pub mod fgts;
pub mod honorarios;
pub mod inss;
pub mod irrf;
pub mod jornada;
pub mod pensao;
pub mod prazos;
pub mod prescricao;
pub mod rescisao;
pub mod seguro_desemprego;

use crate::domain::model::CalculationType;
use crate::utils::error::{JurisError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use adicionais::{InsalubridadeInput, InsalubridadeOutput, PericulosidadeInput, PericulosidadeOutput};
use aviso_previo::{AvisoPrevioInput, AvisoPrevioOutput};
use beneficio::{BeneficioInput, BeneficioOutput};
use correcao::{CorrecaoInput, CorrecaoOutput, JurosInput, JurosOutput};
use decimo_terceiro::{DecimoTerceiroInput, DecimoTerceiroOutput};
use dosimetria::{DosimetriaInput, DosimetriaOutput};
use execucao_penal::{DetracaoInput, DetracaoOutput, ProgressaoInput, ProgressaoOutput};
use ferias::{FeriasInput, FeriasOutput};
use fgts::{FgtsInput, FgtsOutput};
use honorarios::{HonorariosInput, HonorariosOutput};
use inss::{InssInput, InssOutput};
use irrf::{IrrfInput, IrrfOutput};
use jornada::{AdicionalNoturnoInput, AdicionalNoturnoOutput, HorasExtrasInput, HorasExtrasOutput};
use pensao::{PensaoInput, PensaoOutput};
use prazos::{PrazoInput, PrazoOutput};
use prescricao::{PrescricaoInput, PrescricaoOutput};
use rescisao::{RescisaoInput, RescisaoOutput};
use seguro_desemprego::{SeguroDesempregoInput, SeguroDesempregoOutput};

/// A calculation request as stored in `Calculation.entrada`:
/// `{"tipo": "inss", "dados": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "dados", rename_all = "snake_case")]
pub enum CalculationRequest {
    Rescisao(RescisaoInput),
    HorasExtras(HorasExtrasInput),
    Fgts(FgtsInput),
    Inss(InssInput),
    Irrf(IrrfInput),
    Ferias(FeriasInput),
    DecimoTerceiro(DecimoTerceiroInput),
    AvisoPrevio(AvisoPrevioInput),
    AdicionalNoturno(AdicionalNoturnoInput),
    Insalubridade(InsalubridadeInput),
    Periculosidade(PericulosidadeInput),
    SeguroDesemprego(SeguroDesempregoInput),
    Dosimetria(DosimetriaInput),
    ProgressaoRegime(ProgressaoInput),
    Detracao(DetracaoInput),
    Prescricao(PrescricaoInput),
    CorrecaoMonetaria(CorrecaoInput),
    Juros(JurosInput),
    Honorarios(HonorariosInput),
    PensaoAlimenticia(PensaoInput),
    PrazoProcessual(PrazoInput),
    BeneficioPrevidenciario(BeneficioInput),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "resultado", rename_all = "snake_case")]
pub enum CalculationResult {
    Rescisao(RescisaoOutput),
    HorasExtras(HorasExtrasOutput),
    Fgts(FgtsOutput),
    Inss(InssOutput),
    Irrf(IrrfOutput),
    Ferias(FeriasOutput),
    DecimoTerceiro(DecimoTerceiroOutput),
    AvisoPrevio(AvisoPrevioOutput),
    AdicionalNoturno(AdicionalNoturnoOutput),
    Insalubridade(InsalubridadeOutput),
    Periculosidade(PericulosidadeOutput),
    SeguroDesemprego(SeguroDesempregoOutput),
    Dosimetria(DosimetriaOutput),
    ProgressaoRegime(ProgressaoOutput),
    Detracao(DetracaoOutput),
    Prescricao(PrescricaoOutput),
    CorrecaoMonetaria(CorrecaoOutput),
    Juros(JurosOutput),
    Honorarios(HonorariosOutput),
    PensaoAlimenticia(PensaoOutput),
    PrazoProcessual(PrazoOutput),
    BeneficioPrevidenciario(BeneficioOutput),
}

impl CalculationRequest {
    pub fn tipo(&self) -> CalculationType {
        match self {
            CalculationRequest::Rescisao(_) => CalculationType::Rescisao,
            CalculationRequest::HorasExtras(_) => CalculationType::HorasExtras,
            CalculationRequest::Fgts(_) => CalculationType::Fgts,
            CalculationRequest::Inss(_) => CalculationType::Inss,
            CalculationRequest::Irrf(_) => CalculationType::Irrf,
            CalculationRequest::Ferias(_) => CalculationType::Ferias,
            CalculationRequest::DecimoTerceiro(_) => CalculationType::DecimoTerceiro,
            CalculationRequest::AvisoPrevio(_) => CalculationType::AvisoPrevio,
            CalculationRequest::AdicionalNoturno(_) => CalculationType::AdicionalNoturno,
            CalculationRequest::Insalubridade(_) => CalculationType::Insalubridade,
            CalculationRequest::Periculosidade(_) => CalculationType::Periculosidade,
            CalculationRequest::SeguroDesemprego(_) => CalculationType::SeguroDesemprego,
            CalculationRequest::Dosimetria(_) => CalculationType::Dosimetria,
            CalculationRequest::ProgressaoRegime(_) => CalculationType::ProgressaoRegime,
            CalculationRequest::Detracao(_) => CalculationType::Detracao,
            CalculationRequest::Prescricao(_) => CalculationType::Prescricao,
            CalculationRequest::CorrecaoMonetaria(_) => CalculationType::CorrecaoMonetaria,
            CalculationRequest::Juros(_) => CalculationType::Juros,
            CalculationRequest::Honorarios(_) => CalculationType::Honorarios,
            CalculationRequest::PensaoAlimenticia(_) => CalculationType::PensaoAlimenticia,
            CalculationRequest::PrazoProcessual(_) => CalculationType::PrazoProcessual,
            CalculationRequest::BeneficioPrevidenciario(_) => {
                CalculationType::BeneficioPrevidenciario
            }
        }
    }
}

impl CalculationRequest {
    /// 依副檔名讀取 JSON 或 TOML 請求檔
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| JurisError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }
}

impl CalculationResult {
    pub fn tipo(&self) -> CalculationType {
        match self {
            CalculationResult::Rescisao(_) => CalculationType::Rescisao,
            CalculationResult::HorasExtras(_) => CalculationType::HorasExtras,
            CalculationResult::Fgts(_) => CalculationType::Fgts,
            CalculationResult::Inss(_) => CalculationType::Inss,
            CalculationResult::Irrf(_) => CalculationType::Irrf,
            CalculationResult::Ferias(_) => CalculationType::Ferias,
            CalculationResult::DecimoTerceiro(_) => CalculationType::DecimoTerceiro,
            CalculationResult::AvisoPrevio(_) => CalculationType::AvisoPrevio,
            CalculationResult::AdicionalNoturno(_) => CalculationType::AdicionalNoturno,
            CalculationResult::Insalubridade(_) => CalculationType::Insalubridade,
            CalculationResult::Periculosidade(_) => CalculationType::Periculosidade,
            CalculationResult::SeguroDesemprego(_) => CalculationType::SeguroDesemprego,
            CalculationResult::Dosimetria(_) => CalculationType::Dosimetria,
            CalculationResult::ProgressaoRegime(_) => CalculationType::ProgressaoRegime,
            CalculationResult::Detracao(_) => CalculationType::Detracao,
            CalculationResult::Prescricao(_) => CalculationType::Prescricao,
            CalculationResult::CorrecaoMonetaria(_) => CalculationType::CorrecaoMonetaria,
            CalculationResult::Juros(_) => CalculationType::Juros,
            CalculationResult::Honorarios(_) => CalculationType::Honorarios,
            CalculationResult::PensaoAlimenticia(_) => CalculationType::PensaoAlimenticia,
            CalculationResult::PrazoProcessual(_) => CalculationType::PrazoProcessual,
            CalculationResult::BeneficioPrevidenciario(_) => {
                CalculationType::BeneficioPrevidenciario
            }
        }
    }
}
