pub mod batch;
pub mod cli;
pub mod rates;

#[cfg(feature = "cli")]
use crate::core::report::ReportFormat;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, validate_range, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "juris-calc")]
#[command(about = "Calculadoras jurídicas: CPF/CNPJ, valores por extenso e cálculos trabalhistas, penais e cíveis")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate, format or generate CPF numbers
    Cpf {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Validate, format or generate CNPJ numbers
    Cnpj {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Detect, validate and format a CPF or CNPJ
    Documento { valor: String },
    /// Write a whole number in Portuguese words
    Extenso { numero: u64 },
    /// Format a value as Brazilian currency and write it in words
    Moeda {
        #[arg(allow_negative_numbers = true)]
        valor: f64,
    },
    /// Run a calculation request (JSON or TOML with `tipo` and `dados`)
    Calcular {
        arquivo: String,

        #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
        formato: ReportFormat,

        #[arg(long, help = "Rate tables TOML (defaults to the built-in 2024 tables)")]
        tabelas: Option<String>,

        #[arg(long, help = "Write the report to this file instead of stdout")]
        saida: Option<String>,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum DocumentAction {
    Validate {
        valor: String,
    },
    Format {
        valor: String,
    },
    Generate {
        #[arg(long, help = "Print with punctuation")]
        formatted: bool,

        #[arg(long, default_value = "1")]
        quantidade: u32,
    },
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Cpf { action } | Command::Cnpj { action } => {
                if let DocumentAction::Generate { quantidade, .. } = action {
                    validate_range("quantidade", *quantidade, 1, 1000)?;
                }
                Ok(())
            }
            Command::Calcular {
                arquivo,
                tabelas,
                saida,
                ..
            } => {
                validate_path("arquivo", arquivo)?;
                if let Some(tabelas) = tabelas {
                    validate_path("tabelas", tabelas)?;
                }
                if let Some(saida) = saida {
                    validate_path("saida", saida)?;
                }
                Ok(())
            }
            Command::Documento { .. } | Command::Extenso { .. } | Command::Moeda { .. } => Ok(()),
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calcular() {
        let config = CliConfig::try_parse_from([
            "juris-calc",
            "calcular",
            "rescisao.json",
            "--formato",
            "csv",
            "--verbose",
        ])
        .unwrap();
        assert!(config.verbose);
        match config.command {
            Command::Calcular {
                arquivo, formato, ..
            } => {
                assert_eq!(arquivo, "rescisao.json");
                assert_eq!(formato, ReportFormat::Csv);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_negative_currency() {
        let config = CliConfig::try_parse_from(["juris-calc", "moeda", "-1234.5"]).unwrap();
        assert!(matches!(config.command, Command::Moeda { valor } if valor == -1234.5));
    }

    #[test]
    fn test_generate_quantity_is_bounded() {
        let config = CliConfig::try_parse_from([
            "juris-calc",
            "cpf",
            "generate",
            "--quantidade",
            "5000",
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }
}
