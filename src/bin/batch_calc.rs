use clap::Parser;
use juris_calc::core::report;
use juris_calc::utils::error::ErrorSeverity;
use juris_calc::utils::{logger, validation::Validate};
use juris_calc::{BatchConfig, BatchRunner, LocalStorage};

#[derive(Parser)]
#[command(name = "batch-calc")]
#[command(about = "Run a batch of legal calculations described in a TOML file")]
struct Args {
    /// Path to the batch TOML file
    #[arg(short, long, default_value = "lote.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the output directory from the batch file
    #[arg(long)]
    output: Option<String>,

    /// Dry run - compute and summarise without writing reports
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_batch_logger(args.verbose);

    tracing::info!("🚀 Starting batch calculator");
    tracing::info!("📁 Loading batch from: {}", args.config);

    // 載入 TOML 批次設定
    let mut config = match BatchConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load batch file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(output) = &args.output {
        config.lote.output_path = output.clone();
        tracing::info!("🔧 Output path overridden to: {}", output);
    }

    // 驗證設定
    if let Err(e) = config.validate() {
        tracing::error!("❌ Batch validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let tables = match config.load_tables() {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    tracing::info!("✅ Batch loaded and validated successfully");
    display_config_summary(&config, &args);

    let storage = LocalStorage::new(config.lote.output_path.clone());
    let runner = BatchRunner::new(storage, config, tables);

    let outcome = if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No reports will be written");
        runner.compute().and_then(|items| {
            println!("🔍 Dry Run Analysis:");
            for item in &items {
                println!();
                println!("  {} [{}] -> {}.*", item.titulo, item.result.tipo(), item.stem);
                for (campo, valor) in report::summary(&item.result)? {
                    println!("    {}: {}", campo, valor);
                }
            }
            println!();
            println!("✅ Dry run complete: {} calculations", items.len());
            Ok(())
        })
    } else {
        runner.run().map(|report| {
            println!("✅ Batch completed: {} calculations", report.items.len());
            for path in &report.written {
                println!("📁 {}", path);
            }
        })
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Batch failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

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

    Ok(())
}

fn display_config_summary(config: &BatchConfig, args: &Args) {
    println!("📋 Batch Summary:");
    println!("  Name: {}", config.lote.nome);
    if let Some(descricao) = &config.lote.descricao {
        println!("  Description: {}", descricao);
    }
    println!("  Output: {}", config.lote.output_path);
    let formatos: Vec<String> = config.lote.formatos.iter().map(|f| f.to_string()).collect();
    println!("  Formats: {}", formatos.join(", "));
    if config.lote.compactar {
        println!("  Compression: {} (ZIP)", config.lote.arquivo_zip);
    }
    println!("  Calculations: {}", config.calculos.len());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
