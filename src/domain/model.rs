use crate::core::format::is_valid_processo;
use crate::core::tax_id::{clean_cpf_cnpj, is_valid_cnpj, is_valid_cpf, DocumentType};
use crate::utils::error::{JurisError, Result};
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_non_negative, Validate,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoPessoa {
    Fisica,
    Juridica,
}

impl TipoPessoa {
    pub fn document_type(self) -> DocumentType {
        match self {
            TipoPessoa::Fisica => DocumentType::Cpf,
            TipoPessoa::Juridica => DocumentType::Cnpj,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: u64,
    pub user_id: u64,
    pub nome: String,
    pub tipo_pessoa: TipoPessoa,
    /// CPF 或 CNPJ，可含分隔符號
    pub documento: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseArea {
    Trabalhista,
    Civel,
    Criminal,
    Familia,
    Previdenciario,
    Tributario,
    Outro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Ativo,
    Suspenso,
    Arquivado,
    Encerrado,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: u64,
    pub client_id: u64,
    pub numero_processo: Option<String>,
    pub titulo: String,
    pub area: CaseArea,
    pub status: CaseStatus,
    pub tribunal: Option<String>,
    pub vara: Option<String>,
    pub valor_causa: Option<f64>,
    pub data_distribuicao: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationType {
    Rescisao,
    HorasExtras,
    Fgts,
    Inss,
    Irrf,
    Ferias,
    DecimoTerceiro,
    AvisoPrevio,
    AdicionalNoturno,
    Insalubridade,
    Periculosidade,
    SeguroDesemprego,
    Dosimetria,
    ProgressaoRegime,
    Detracao,
    Prescricao,
    CorrecaoMonetaria,
    Juros,
    Honorarios,
    PensaoAlimenticia,
    PrazoProcessual,
    BeneficioPrevidenciario,
}

impl CalculationType {
    pub const ALL: [CalculationType; 22] = [
        CalculationType::Rescisao,
        CalculationType::HorasExtras,
        CalculationType::Fgts,
        CalculationType::Inss,
        CalculationType::Irrf,
        CalculationType::Ferias,
        CalculationType::DecimoTerceiro,
        CalculationType::AvisoPrevio,
        CalculationType::AdicionalNoturno,
        CalculationType::Insalubridade,
        CalculationType::Periculosidade,
        CalculationType::SeguroDesemprego,
        CalculationType::Dosimetria,
        CalculationType::ProgressaoRegime,
        CalculationType::Detracao,
        CalculationType::Prescricao,
        CalculationType::CorrecaoMonetaria,
        CalculationType::Juros,
        CalculationType::Honorarios,
        CalculationType::PensaoAlimenticia,
        CalculationType::PrazoProcessual,
        CalculationType::BeneficioPrevidenciario,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CalculationType::Rescisao => "rescisao",
            CalculationType::HorasExtras => "horas_extras",
            CalculationType::Fgts => "fgts",
            CalculationType::Inss => "inss",
            CalculationType::Irrf => "irrf",
            CalculationType::Ferias => "ferias",
            CalculationType::DecimoTerceiro => "decimo_terceiro",
            CalculationType::AvisoPrevio => "aviso_previo",
            CalculationType::AdicionalNoturno => "adicional_noturno",
            CalculationType::Insalubridade => "insalubridade",
            CalculationType::Periculosidade => "periculosidade",
            CalculationType::SeguroDesemprego => "seguro_desemprego",
            CalculationType::Dosimetria => "dosimetria",
            CalculationType::ProgressaoRegime => "progressao_regime",
            CalculationType::Detracao => "detracao",
            CalculationType::Prescricao => "prescricao",
            CalculationType::CorrecaoMonetaria => "correcao_monetaria",
            CalculationType::Juros => "juros",
            CalculationType::Honorarios => "honorarios",
            CalculationType::PensaoAlimenticia => "pensao_alimenticia",
            CalculationType::PrazoProcessual => "prazo_processual",
            CalculationType::BeneficioPrevidenciario => "beneficio_previdenciario",
        }
    }

    /// 計算類型所屬的案件領域
    pub fn area(self) -> CaseArea {
        match self {
            CalculationType::Rescisao
            | CalculationType::HorasExtras
            | CalculationType::Fgts
            | CalculationType::Ferias
            | CalculationType::DecimoTerceiro
            | CalculationType::AvisoPrevio
            | CalculationType::AdicionalNoturno
            | CalculationType::Insalubridade
            | CalculationType::Periculosidade
            | CalculationType::SeguroDesemprego => CaseArea::Trabalhista,
            CalculationType::Inss | CalculationType::BeneficioPrevidenciario => {
                CaseArea::Previdenciario
            }
            CalculationType::Irrf => CaseArea::Tributario,
            CalculationType::Dosimetria
            | CalculationType::ProgressaoRegime
            | CalculationType::Detracao
            | CalculationType::Prescricao => CaseArea::Criminal,
            CalculationType::PensaoAlimenticia => CaseArea::Familia,
            CalculationType::CorrecaoMonetaria
            | CalculationType::Juros
            | CalculationType::Honorarios
            | CalculationType::PrazoProcessual => CaseArea::Civel,
        }
    }
}

impl fmt::Display for CalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CalculationType {
    type Err = JurisError;

    fn from_str(s: &str) -> Result<Self> {
        CalculationType::ALL
            .into_iter()
            .find(|tipo| tipo.as_str() == s)
            .ok_or_else(|| JurisError::invalid("tipo", s, "Unknown calculation type"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    pub id: u64,
    pub user_id: u64,
    pub case_id: Option<u64>,
    pub tipo: CalculationType,
    pub titulo: String,
    pub entrada: serde_json::Value,
    pub resultado: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Validate for User {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_email("email", &self.email)
    }
}

impl Validate for Client {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("nome", &self.nome)?;

        let expected = self.tipo_pessoa.document_type();
        let valid = match expected {
            DocumentType::Cpf => is_valid_cpf(&self.documento),
            DocumentType::Cnpj => is_valid_cnpj(&self.documento),
        };
        if !valid {
            return Err(JurisError::InvalidDocumentError {
                kind: expected.to_string(),
                value: self.documento.clone(),
            });
        }

        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        if let Some(telefone) = &self.telefone {
            let digits = clean_cpf_cnpj(telefone);
            if digits.len() != 10 && digits.len() != 11 {
                return Err(JurisError::invalid(
                    "telefone",
                    telefone,
                    "Phone must have 10 or 11 digits including area code",
                ));
            }
        }
        Ok(())
    }
}

impl Validate for Case {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("titulo", &self.titulo)?;
        if let Some(numero) = &self.numero_processo {
            if !is_valid_processo(numero) {
                return Err(JurisError::InvalidDocumentError {
                    kind: "CNJ case number".to_string(),
                    value: numero.clone(),
                });
            }
        }
        if let Some(valor) = self.valor_causa {
            validate_non_negative("valorCausa", valor)?;
        }
        Ok(())
    }
}

impl Validate for Calculation {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("titulo", &self.titulo)
    }
}
