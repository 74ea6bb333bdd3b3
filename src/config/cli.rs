use crate::domain::ports::ReportStorage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// 報表寫入本機目錄
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }
}

impl ReportStorage for LocalStorage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&full_path, data)?;
        tracing::debug!("💾 Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(full_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_nested_directories() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().display().to_string());

        let written = storage.write_file("lote/001_inss.json", b"{}").unwrap();
        assert!(written.ends_with("001_inss.json"));
        assert_eq!(storage.read_file("lote/001_inss.json").unwrap(), b"{}");
    }
}
