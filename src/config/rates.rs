use crate::utils::error::{JurisError, Result};
use crate::utils::validation::{validate_positive, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// 各計算器使用的官方費率表，預設值為 2024 年公告數值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTables {
    pub ano_referencia: i32,
    pub salario_minimo: f64,
    pub inss: InssTable,
    pub irrf: IrrfTable,
    pub fgts: FgtsRates,
    pub seguro_desemprego: SeguroDesempregoTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaixaInss {
    pub limite: f64,
    pub aliquota: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InssTable {
    pub faixas: Vec<FaixaInss>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaixaIrrf {
    /// `None` on the open-ended top bracket.
    pub limite: Option<f64>,
    pub aliquota: f64,
    pub deducao: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrfTable {
    pub faixas: Vec<FaixaIrrf>,
    pub deducao_dependente: f64,
    pub desconto_simplificado: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FgtsRates {
    pub aliquota_deposito: f64,
    pub aliquota_aprendiz: f64,
    pub juros_anuais: f64,
    /// TR used for months missing from the input table.
    pub tr_padrao: f64,
    pub multa_sem_justa_causa: f64,
    pub multa_acordo: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeguroDesempregoTable {
    pub limite_faixa1: f64,
    pub limite_faixa2: f64,
    pub fator_faixa1: f64,
    pub fator_faixa2: f64,
    pub parcela_fixa_faixa2: f64,
    pub teto: f64,
}

impl Default for RateTables {
    fn default() -> Self {
        Self {
            ano_referencia: 2024,
            salario_minimo: 1412.00,
            inss: InssTable::default(),
            irrf: IrrfTable::default(),
            fgts: FgtsRates::default(),
            seguro_desemprego: SeguroDesempregoTable::default(),
        }
    }
}

impl Default for InssTable {
    fn default() -> Self {
        Self {
            faixas: vec![
                FaixaInss { limite: 1412.00, aliquota: 0.075 },
                FaixaInss { limite: 2666.68, aliquota: 0.09 },
                FaixaInss { limite: 4000.03, aliquota: 0.12 },
                FaixaInss { limite: 7786.02, aliquota: 0.14 },
            ],
        }
    }
}

impl Default for IrrfTable {
    fn default() -> Self {
        Self {
            faixas: vec![
                FaixaIrrf { limite: Some(2259.20), aliquota: 0.0, deducao: 0.0 },
                FaixaIrrf { limite: Some(2826.65), aliquota: 0.075, deducao: 169.44 },
                FaixaIrrf { limite: Some(3751.05), aliquota: 0.15, deducao: 381.44 },
                FaixaIrrf { limite: Some(4664.68), aliquota: 0.225, deducao: 662.77 },
                FaixaIrrf { limite: None, aliquota: 0.275, deducao: 896.00 },
            ],
            deducao_dependente: 189.59,
            desconto_simplificado: 564.80,
        }
    }
}

impl Default for FgtsRates {
    fn default() -> Self {
        Self {
            aliquota_deposito: 0.08,
            aliquota_aprendiz: 0.02,
            juros_anuais: 0.03,
            tr_padrao: 0.0,
            multa_sem_justa_causa: 0.40,
            multa_acordo: 0.20,
        }
    }
}

impl Default for SeguroDesempregoTable {
    fn default() -> Self {
        Self {
            limite_faixa1: 2041.39,
            limite_faixa2: 3402.65,
            fator_faixa1: 0.8,
            fator_faixa2: 0.5,
            parcela_fixa_faixa2: 1633.10,
            teto: 2313.74,
        }
    }
}

impl InssTable {
    /// 最後一級的上限即為繳費上限
    pub fn teto(&self) -> f64 {
        self.faixas.last().map(|f| f.limite).unwrap_or(0.0)
    }
}

impl RateTables {
    /// 從 TOML 檔案載入費率表
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let tables = Self::from_toml_str(&content)?;
        tracing::debug!(
            "Loaded rate tables for {} from {}",
            tables.ano_referencia,
            path.as_ref().display()
        );
        Ok(tables)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| JurisError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn teto_inss(&self) -> f64 {
        self.inss.teto()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_positive("salario_minimo", self.salario_minimo)?;

        if self.inss.faixas.is_empty() {
            return Err(JurisError::ConfigValidationError {
                field: "inss.faixas".to_string(),
                message: "At least one bracket is required".to_string(),
            });
        }
        let mut anterior = 0.0;
        for faixa in &self.inss.faixas {
            validate_range("inss.faixas.aliquota", faixa.aliquota, 0.0, 1.0)?;
            if faixa.limite <= anterior {
                return Err(JurisError::ConfigValidationError {
                    field: "inss.faixas".to_string(),
                    message: "Bracket limits must be strictly increasing".to_string(),
                });
            }
            anterior = faixa.limite;
        }

        match self.irrf.faixas.last() {
            Some(top) if top.limite.is_none() => {}
            _ => {
                return Err(JurisError::ConfigValidationError {
                    field: "irrf.faixas".to_string(),
                    message: "The last bracket must be open-ended (no limite)".to_string(),
                })
            }
        }
        let mut anterior = 0.0;
        for (i, faixa) in self.irrf.faixas.iter().enumerate() {
            validate_range("irrf.faixas.aliquota", faixa.aliquota, 0.0, 1.0)?;
            match faixa.limite {
                Some(limite) if limite > anterior => anterior = limite,
                None if i + 1 == self.irrf.faixas.len() => {}
                _ => {
                    return Err(JurisError::ConfigValidationError {
                        field: "irrf.faixas".to_string(),
                        message: "Bracket limits must be strictly increasing".to_string(),
                    })
                }
            }
        }

        validate_range("fgts.aliquota_deposito", self.fgts.aliquota_deposito, 0.0, 1.0)?;
        validate_range("fgts.juros_anuais", self.fgts.juros_anuais, 0.0, 1.0)?;
        validate_range("fgts.multa_sem_justa_causa", self.fgts.multa_sem_justa_causa, 0.0, 1.0)?;

        if self.seguro_desemprego.limite_faixa2 <= self.seguro_desemprego.limite_faixa1 {
            return Err(JurisError::ConfigValidationError {
                field: "seguro_desemprego".to_string(),
                message: "limite_faixa2 must be greater than limite_faixa1".to_string(),
            });
        }
        Ok(())
    }
}

impl Validate for RateTables {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// 替換環境變數 (例如 ${SALARIO_MINIMO})，未定義的變數保持原樣
pub fn substitute_env_vars(content: &str) -> String {
    ENV_VAR_RE
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
}
