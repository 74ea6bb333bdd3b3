use juris_calc::utils::validation::Validate;
use juris_calc::{BatchConfig, BatchRunner, LocalStorage};
use std::io::Read;
use tempfile::TempDir;

fn lote(output_path: &str, extra: &str) -> String {
    format!(
        r#"
[lote]
nome = "Escritório - lote semanal"
output_path = "{output_path}"
formatos = ["json", "tsv"]
{extra}

[[calculos]]
titulo = "Rescisão de João"
tipo = "rescisao"
[calculos.dados]
salario = 3000.0
dataAdmissao = "2022-03-01"
dataDesligamento = "2024-06-15"
motivo = "sem_justa_causa"
saldoFgts = 5000.0

[[calculos]]
titulo = "Prescrição do furto"
tipo = "prescricao"
[calculos.dados]
pena = {{ anos = 2 }}
dataInicio = "2020-05-10"
dataReferencia = "2024-05-10"
"#
    )
}

#[test]
fn test_batch_writes_reports_to_disk() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let config = BatchConfig::from_toml_str(&lote(&output_path, "")).unwrap();
    assert!(config.validate().is_ok());
    let tables = config.load_tables().unwrap();

    let storage = LocalStorage::new(output_path.clone());
    let report = BatchRunner::new(storage, config, tables).run().unwrap();
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.written.len(), 4);

    let json_path = temp_dir.path().join("001_rescisao.json");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(json["tipo"], "rescisao");
    assert_eq!(json["resultado"]["liquido"], 8266.53);

    let tsv = std::fs::read_to_string(temp_dir.path().join("002_prescricao.tsv")).unwrap();
    assert!(tsv.starts_with("campo\tvalor\ntipo\tprescricao\n"));
}

#[test]
fn test_batch_bundles_zip() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let config = BatchConfig::from_toml_str(&lote(
        &output_path,
        "compactar = true\narquivo_zip = \"semana.zip\"",
    ))
    .unwrap();
    let tables = config.load_tables().unwrap();
    let storage = LocalStorage::new(output_path.clone());
    let report = BatchRunner::new(storage, config, tables).run().unwrap();
    assert_eq!(report.written.len(), 1);

    // 驗證 ZIP 內容
    let zip_data = std::fs::read(temp_dir.path().join("semana.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 4);

    let mut content = String::new();
    archive
        .by_name("002_prescricao.json")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["tipo"], "prescricao");
    assert!(archive.by_name("001_rescisao.tsv").is_ok());
}

#[test]
fn test_dry_run_leaves_output_directory_empty() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("saida").to_str().unwrap().to_string();

    let config = BatchConfig::from_toml_str(&lote(&output_path, "")).unwrap();
    let tables = config.load_tables().unwrap();
    let runner = BatchRunner::new(LocalStorage::new(output_path.clone()), config, tables);

    let items = runner.compute().unwrap();
    assert_eq!(items[1].stem, "002_prescricao");
    assert!(!std::path::Path::new(&output_path).exists());
}
