use crate::app::calculators::CalculationResult;
use crate::config::batch::BatchConfig;
use crate::config::rates::RateTables;
use crate::core::engine::CalcEngine;
use crate::core::report;
use crate::domain::ports::ReportStorage;
use crate::utils::error::Result;

/// 單筆計算的結果與輸出檔名
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub titulo: String,
    pub stem: String,
    pub result: CalculationResult,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
    /// Paths returned by the storage, one per written file (or the single ZIP).
    pub written: Vec<String>,
}

/// 依批次設定逐筆計算並寫出報表
pub struct BatchRunner<S: ReportStorage> {
    storage: S,
    config: BatchConfig,
    engine: CalcEngine,
}

impl<S: ReportStorage> BatchRunner<S> {
    pub fn new(storage: S, config: BatchConfig, tables: RateTables) -> Self {
        Self {
            storage,
            config,
            engine: CalcEngine::with_tables(tables),
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Runs every entry without writing anything.
    pub fn compute(&self) -> Result<Vec<BatchItem>> {
        let mut items = Vec::with_capacity(self.config.calculos.len());
        for (index, entry) in self.config.calculos.iter().enumerate() {
            tracing::info!("🧮 [{}] {} ({})", index + 1, entry.titulo, entry.tipo);
            let request = entry.to_request()?;
            let result = self.engine.run(&request)?;
            items.push(BatchItem {
                titulo: entry.titulo.clone(),
                stem: entry.file_stem(index),
                result,
            });
        }
        Ok(items)
    }

    pub fn run(&self) -> Result<BatchReport> {
        tracing::info!("🚀 Starting batch: {}", self.config.lote.nome);
        let items = self.compute()?;

        let mut files = Vec::new();
        for item in &items {
            for formato in &self.config.lote.formatos {
                let content = report::render(&item.result, *formato)?;
                files.push((
                    format!("{}.{}", item.stem, formato.extension()),
                    content.into_bytes(),
                ));
            }
        }

        let written = if self.config.lote.compactar {
            let zip_data = report::bundle_zip(&files)?;
            let path = self
                .storage
                .write_file(&self.config.lote.arquivo_zip, &zip_data)?;
            tracing::info!("📦 {} reports bundled into {}", files.len(), path);
            vec![path]
        } else {
            let mut written = Vec::with_capacity(files.len());
            for (name, data) in &files {
                written.push(self.storage.write_file(name, data)?);
            }
            written
        };

        tracing::info!(
            "✅ Batch {} completed: {} calculations, {} files",
            self.config.lote.nome,
            items.len(),
            written.len()
        );
        Ok(BatchReport { items, written })
    }
}
