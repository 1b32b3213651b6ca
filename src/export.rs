use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::model::{ColumnKind, Dataset};
use crate::data::stats::{Describe, MissingCount, describe, missing_counts};

// ---------------------------------------------------------------------------
// Summary export (JSON)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub dtype: &'static str,
}

/// Everything the summary view shows, minus the preview.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub file_name: String,
    pub rows: usize,
    pub columns: usize,
    pub schema: Vec<ColumnSummary>,
    pub missing: Vec<MissingCount>,
    pub statistics: Vec<Describe>,
}

impl SummaryReport {
    pub fn new(file_name: &str, dataset: &Dataset) -> Self {
        let (rows, columns) = dataset.shape();
        SummaryReport {
            file_name: file_name.to_string(),
            rows,
            columns,
            schema: dataset
                .columns()
                .iter()
                .map(|c| ColumnSummary {
                    name: c.name.clone(),
                    kind: c.kind(),
                    dtype: c.data.dtype(),
                })
                .collect(),
            missing: missing_counts(dataset),
            statistics: describe(dataset),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialising summary")
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }
}

/// Suggested file name for the export dialog: `orders.csv` → `orders-summary.json`.
pub fn default_export_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("dataset");
    format!("{stem}-summary.json")
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::data::loader::{UploadedFile, load_data};

    fn dataset() -> Dataset {
        let csv = "order_id,amount,country\n1,10,US\n2,,DE\n3,30,FR\n";
        load_data(&UploadedFile::new("orders.csv", csv.as_bytes().to_vec())).unwrap()
    }

    #[test]
    fn report_serialises_schema_and_stats() {
        let report = SummaryReport::new("orders.csv", &dataset());
        let value: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["rows"], 3);
        assert_eq!(value["columns"], 3);
        assert_eq!(value["schema"][1]["kind"], "numeric");
        assert_eq!(value["schema"][1]["dtype"], "float64");
        assert_eq!(value["schema"][2]["kind"], "text");
        assert_eq!(value["missing"][1]["missing"], 1);
        assert_eq!(value["statistics"][1]["column"], "amount");
        assert_eq!(value["statistics"][1]["50%"], 20.0);
        assert!(value["statistics"][0]["std"].is_number());
    }

    #[test]
    fn undefined_statistics_become_null() {
        let csv = "only\n5\n";
        let ds = load_data(&UploadedFile::new("one.csv", csv.as_bytes().to_vec())).unwrap();
        let value: Value =
            serde_json::from_str(&SummaryReport::new("one.csv", &ds).to_json().unwrap()).unwrap();
        assert!(value["statistics"][0]["std"].is_null());
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        SummaryReport::new("orders.csv", &dataset())
            .write(&path)
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"file_name\": \"orders.csv\""));
    }

    #[test]
    fn export_name_from_upload() {
        assert_eq!(default_export_name("orders.csv"), "orders-summary.json");
        assert_eq!(default_export_name("Q3.sales.xlsx"), "Q3.sales-summary.json");
        assert_eq!(default_export_name(""), "dataset-summary.json");
    }
}
