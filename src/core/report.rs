use crate::app::calculators::CalculationResult;
use crate::utils::error::{JurisError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use zip::write::{FileOptions, ZipWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
    Tsv,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Tsv => "tsv",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = JurisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "tsv" => Ok(ReportFormat::Tsv),
            other => Err(JurisError::invalid("formato", other, "Expected json, csv or tsv")),
        }
    }
}

/// 將巢狀 JSON 攤平成 (路徑, 值)，陣列以索引標示，如 `faixas[0].valor`
pub fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    flatten_into(value, String::new(), &mut rows);
    rows
}

fn flatten_into(value: &Value, path: String, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                flatten_into(child, child_path, rows);
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                flatten_into(child, format!("{}[{}]", path, idx), rows);
            }
        }
        Value::Null => rows.push((path, String::new())),
        Value::String(s) => rows.push((path, s.clone())),
        other => rows.push((path, other.to_string())),
    }
}

fn result_body(result: &CalculationResult) -> Result<Value> {
    let mut value = serde_json::to_value(result)?;
    Ok(value
        .get_mut("resultado")
        .map(Value::take)
        .unwrap_or(Value::Null))
}

/// Top-level scalar fields of a result, for terminal summaries.
pub fn summary(result: &CalculationResult) -> Result<Vec<(String, String)>> {
    let body = result_body(result)?;
    let Value::Object(map) = body else {
        return Ok(Vec::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Object(_) | Value::Array(_) | Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

fn render_delimited(result: &CalculationResult, delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(["campo", "valor"])?;
    writer.write_record(["tipo", result.tipo().as_str()])?;
    for (campo, valor) in flatten(&result_body(result)?) {
        writer.write_record([campo.as_str(), valor.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| JurisError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| JurisError::calculation(format!("non UTF-8 report: {}", e)))
}

pub fn render(result: &CalculationResult, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        ReportFormat::Csv => render_delimited(result, b','),
        ReportFormat::Tsv => render_delimited(result, b'\t'),
    }
}

/// 將多份報表打包為單一 ZIP
pub fn bundle_zip(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::calculators::inss::contribuicao_progressiva;
    use crate::config::rates::RateTables;
    use std::io::Read;

    fn inss() -> CalculationResult {
        CalculationResult::Inss(contribuicao_progressiva(3000.0, &RateTables::default().inss))
    }

    #[test]
    fn test_flatten_nested_arrays() {
        let value = serde_json::json!({"a": 1, "b": [{"c": "x"}, {"c": null}]});
        let rows = flatten(&value);
        assert_eq!(
            rows,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b[0].c".to_string(), "x".to_string()),
                ("b[1].c".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_csv_report_lists_fields() {
        let csv = render(&inss(), ReportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "campo,valor");
        assert_eq!(lines[1], "tipo,inss");
        assert!(lines.contains(&"contribuicaoTotal,258.82"));
        assert!(lines.iter().any(|l| l.starts_with("faixas[0].aliquota,")));
    }

    #[test]
    fn test_tsv_uses_tabs() {
        let tsv = render(&inss(), ReportFormat::Tsv).unwrap();
        assert!(tsv.starts_with("campo\tvalor\n"));
    }

    #[test]
    fn test_json_report_is_tagged() {
        let json = render(&inss(), ReportFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tipo"], "inss");
        assert_eq!(value["resultado"]["contribuicaoTotal"], 258.82);
    }

    #[test]
    fn test_summary_skips_nested_values() {
        let rows = summary(&inss()).unwrap();
        assert!(rows.iter().any(|(k, v)| k == "contribuicaoTotal" && v == "258.82"));
        assert!(!rows.iter().any(|(k, _)| k == "faixas"));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert!("xlsx".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_zip_bundle_contains_files() {
        let data = bundle_zip(&[
            ("a.json".to_string(), b"{}".to_vec()),
            ("a.csv".to_string(), b"campo,valor".to_vec()),
        ])
        .unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive
            .by_name("a.csv")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "campo,valor");
    }
}
