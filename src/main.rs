use clap::Parser;
use juris_calc::config::{Command, DocumentAction};
use juris_calc::core::report::{self, ReportFormat};
use juris_calc::core::tax_id::{self, DocumentType};
use juris_calc::core::{extenso, format};
use juris_calc::domain::ports::ReportStorage;
use juris_calc::utils::error::{ErrorSeverity, JurisError};
use juris_calc::utils::{logger, validation::Validate};
use juris_calc::{CalcEngine, CalculationRequest, CliConfig, LocalStorage, RateTables};
use std::path::Path;

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    // 驗證參數
    if let Err(e) = config.validate() {
        tracing::error!("❌ Argument validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    match run(config.command) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

/// Returns `Ok(false)` when a validation command rejects its input.
fn run(command: Command) -> Result<bool, JurisError> {
    match command {
        Command::Cpf { action } => document(DocumentType::Cpf, action),
        Command::Cnpj { action } => document(DocumentType::Cnpj, action),
        Command::Documento { valor } => {
            let Some(kind) = tax_id::detect_document_type(&valor) else {
                println!("❌ {} não é um CPF nem um CNPJ", valor);
                return Ok(false);
            };
            let valido = tax_id::is_valid_cpf_cnpj(&valor);
            let marca = if valido { "✅" } else { "❌" };
            println!("{} {} {}", marca, kind, tax_id::format_cpf_cnpj(&valor));
            Ok(valido)
        }
        Command::Extenso { numero } => {
            println!("{}", extenso::number_to_words(numero));
            Ok(true)
        }
        Command::Moeda { valor } => {
            println!("{}", format::format_currency(valor));
            println!("{}", extenso::currency_to_words(valor));
            Ok(true)
        }
        Command::Calcular {
            arquivo,
            formato,
            tabelas,
            saida,
        } => calcular(&arquivo, formato, tabelas.as_deref(), saida.as_deref()).map(|_| true),
    }
}

fn document(kind: DocumentType, action: DocumentAction) -> Result<bool, JurisError> {
    match action {
        DocumentAction::Validate { valor } => {
            let valido = match kind {
                DocumentType::Cpf => tax_id::is_valid_cpf(&valor),
                DocumentType::Cnpj => tax_id::is_valid_cnpj(&valor),
            };
            if valido {
                println!("✅ {} válido", kind);
            } else {
                println!("❌ {} inválido", kind);
            }
            Ok(valido)
        }
        DocumentAction::Format { valor } => {
            let limpo = tax_id::clean_cpf_cnpj(&valor);
            if limpo.len() != kind.expected_len() {
                return Err(JurisError::InvalidDocumentError {
                    kind: kind.to_string(),
                    value: valor,
                });
            }
            let formatado = match kind {
                DocumentType::Cpf => tax_id::format_cpf(&limpo),
                DocumentType::Cnpj => tax_id::format_cnpj(&limpo),
            };
            println!("{}", formatado);
            Ok(true)
        }
        DocumentAction::Generate {
            formatted,
            quantidade,
        } => {
            for _ in 0..quantidade {
                println!("{}", tax_id::generate_document(kind, formatted)?);
            }
            Ok(true)
        }
    }
}

fn calcular(
    arquivo: &str,
    formato: ReportFormat,
    tabelas: Option<&str>,
    saida: Option<&str>,
) -> Result<(), JurisError> {
    let tables = match tabelas {
        Some(path) => RateTables::from_file(path)?,
        None => RateTables::default(),
    };
    tables.validate()?;

    let request = CalculationRequest::from_file(arquivo)?;
    tracing::info!("📄 Loaded {} request from {}", request.tipo(), arquivo);

    let result = CalcEngine::with_tables(tables).run(&request)?;
    let rendered = report::render(&result, formato)?;

    match saida {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .map(|p| p.display().to_string())
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| ".".to_string());
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("{}.{}", result.tipo(), formato.extension()));
            let written = LocalStorage::new(dir).write_file(&name, rendered.as_bytes())?;
            println!("✅ {} calculado", result.tipo());
            println!("📁 Relatório salvo em: {}", written);
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
