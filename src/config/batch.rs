use crate::app::calculators::CalculationRequest;
use crate::config::rates::{substitute_env_vars, RateTables};
use crate::core::report::ReportFormat;
use crate::domain::model::CalculationType;
use crate::utils::error::{JurisError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_formatos() -> Vec<ReportFormat> {
    vec![ReportFormat::Json]
}

fn default_arquivo_zip() -> String {
    "relatorios.zip".to_string()
}

/// 批次計算設定：一個 `[lote]` 區段與多個 `[[calculos]]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub lote: LoteConfig,
    #[serde(default)]
    pub calculos: Vec<CalculoEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoteConfig {
    pub nome: String,
    pub descricao: Option<String>,
    pub output_path: String,
    #[serde(default = "default_formatos")]
    pub formatos: Vec<ReportFormat>,
    /// Rate tables TOML; the built-in tables are used when absent.
    pub tabelas: Option<String>,
    /// Bundle every report into a single ZIP instead of loose files.
    #[serde(default)]
    pub compactar: bool,
    #[serde(default = "default_arquivo_zip")]
    pub arquivo_zip: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculoEntry {
    pub titulo: String,
    pub tipo: CalculationType,
    #[serde(default)]
    pub dados: serde_json::Value,
}

impl CalculoEntry {
    pub fn to_request(&self) -> Result<CalculationRequest> {
        let value = serde_json::json!({
            "tipo": self.tipo.as_str(),
            "dados": self.dados,
        });
        serde_json::from_value(value).map_err(|e| JurisError::ConfigValidationError {
            field: format!("calculos[{}].dados", self.titulo),
            message: e.to_string(),
        })
    }

    /// Report file stem, e.g. `003_rescisao`.
    pub fn file_stem(&self, index: usize) -> String {
        format!("{:03}_{}", index + 1, self.tipo.as_str())
    }
}

impl BatchConfig {
    /// 從 TOML 檔案載入批次設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| JurisError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("lote.nome", &self.lote.nome)?;
        validate_path("lote.output_path", &self.lote.output_path)?;
        if let Some(tabelas) = &self.lote.tabelas {
            validate_path("lote.tabelas", tabelas)?;
        }
        if self.lote.formatos.is_empty() {
            return Err(JurisError::ConfigValidationError {
                field: "lote.formatos".to_string(),
                message: "At least one output format is required".to_string(),
            });
        }
        if self.lote.compactar {
            validate_path("lote.arquivo_zip", &self.lote.arquivo_zip)?;
        }

        if self.calculos.is_empty() {
            return Err(JurisError::ConfigValidationError {
                field: "calculos".to_string(),
                message: "The batch has no [[calculos]] entries".to_string(),
            });
        }
        for calculo in &self.calculos {
            validate_non_empty_string("calculos.titulo", &calculo.titulo)?;
            calculo.to_request()?;
        }
        Ok(())
    }

    /// 載入批次指定的費率表；未指定時使用內建預設值
    pub fn load_tables(&self) -> Result<RateTables> {
        let tables = match &self.lote.tabelas {
            Some(path) => RateTables::from_file(path)?,
            None => RateTables::default(),
        };
        tables.validate()?;
        Ok(tables)
    }
}

impl Validate for BatchConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LOTE: &str = r#"
[lote]
nome = "Rescisões de março"
output_path = "./relatorios"
formatos = ["json", "csv"]

[[calculos]]
titulo = "INSS de Maria"
tipo = "inss"
[calculos.dados]
salarioContribuicao = 3000.0

[[calculos]]
titulo = "Prazo de contestação"
tipo = "prazo_processual"
[calculos.dados]
dataIntimacao = "2024-03-01"
dias = 15
"#;

    #[test]
    fn test_parse_batch() {
        let config = BatchConfig::from_toml_str(LOTE).unwrap();
        assert_eq!(config.lote.nome, "Rescisões de março");
        assert_eq!(config.lote.formatos, vec![ReportFormat::Json, ReportFormat::Csv]);
        assert!(!config.lote.compactar);
        assert_eq!(config.calculos.len(), 2);
        assert_eq!(config.calculos[1].tipo, CalculationType::PrazoProcessual);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_entries_become_requests() {
        let config = BatchConfig::from_toml_str(LOTE).unwrap();
        let request = config.calculos[0].to_request().unwrap();
        assert_eq!(request.tipo(), CalculationType::Inss);
        assert_eq!(config.calculos[0].file_stem(0), "001_inss");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("JURIS_BATCH_OUTPUT", "/tmp/juris-lote");
        let content = LOTE.replace("./relatorios", "${JURIS_BATCH_OUTPUT}");
        let config = BatchConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.lote.output_path, "/tmp/juris-lote");
        std::env::remove_var("JURIS_BATCH_OUTPUT");
    }

    #[test]
    fn test_bad_entry_data_fails_validation() {
        let content = LOTE.replace("salarioContribuicao = 3000.0", "salario = \"muito\"");
        let config = BatchConfig::from_toml_str(&content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, JurisError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_unknown_type_is_a_parse_error() {
        let content = LOTE.replace("tipo = \"inss\"", "tipo = \"usucapiao\"");
        assert!(BatchConfig::from_toml_str(&content).is_err());
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let config = BatchConfig::from_toml_str(
            "[lote]\nnome = \"vazio\"\noutput_path = \"./out\"\n",
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_batch_from_file_with_custom_tables() {
        let mut tabelas = NamedTempFile::new().unwrap();
        tabelas.write_all(b"salario_minimo = 1518.0\n").unwrap();

        let mut lote = NamedTempFile::new().unwrap();
        let content = LOTE.replace(
            "formatos = [\"json\", \"csv\"]",
            &format!(
                "formatos = [\"json\"]\ntabelas = \"{}\"",
                tabelas.path().display()
            ),
        );
        lote.write_all(content.as_bytes()).unwrap();

        let config = BatchConfig::from_file(lote.path()).unwrap();
        let tables = config.load_tables().unwrap();
        assert_eq!(tables.salario_minimo, 1518.0);
        assert_eq!(tables.teto_inss(), 7786.02);
    }
}
