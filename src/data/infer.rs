use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::{Column, ColumnData, Dataset};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// RawTable – what every loader produces before typing
// ---------------------------------------------------------------------------

/// Header plus rows of cell text. Rows are already padded to header width.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Cell spellings read as "no value".
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// NA token, or any spelling the float parser reads as NaN (`NAN`, `nAn`, ...).
pub fn is_missing(cell: &str) -> bool {
    NA_TOKENS.contains(&cell) || cell.trim().parse::<f64>().is_ok_and(f64::is_nan)
}

pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

pub fn parse_datetime(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cell, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// ---------------------------------------------------------------------------
// Header clean-up
// ---------------------------------------------------------------------------

/// Name blank headers `Unnamed: {i}` and suffix duplicates `.1`, `.2`, ...
pub fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());

    for (i, header) in raw.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            header
        };
        let mut name = base.clone();
        let mut k = 1;
        while used.contains(&name) {
            name = format!("{base}.{k}");
            k += 1;
        }
        used.insert(name.clone());
        out.push(name);
    }
    out
}

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

/// Pick the narrowest type every present cell fits: numeric, then datetime,
/// then text. An all-missing column is numeric.
pub fn infer_column(name: String, cells: Vec<String>) -> Column {
    let present: Vec<&str> = cells
        .iter()
        .map(String::as_str)
        .filter(|c| !is_missing(c))
        .collect();

    if present.iter().all(|c| parse_number(c).is_some()) {
        let integral = present.iter().all(|c| c.trim().parse::<i64>().is_ok());
        let values = cells
            .iter()
            .map(|c| if is_missing(c) { None } else { parse_number(c) })
            .collect();
        log::debug!("column '{name}': numeric (integral: {integral})");
        return Column::new(name, ColumnData::Numeric { values, integral }, cells);
    }

    if present.iter().all(|c| parse_datetime(c).is_some()) {
        let values = cells
            .iter()
            .map(|c| if is_missing(c) { None } else { parse_datetime(c) })
            .collect();
        log::debug!("column '{name}': datetime");
        return Column::new(name, ColumnData::Temporal(values), cells);
    }

    let values = cells
        .iter()
        .map(|c| if is_missing(c) { None } else { Some(c.clone()) })
        .collect();
    log::debug!("column '{name}': text");
    Column::new(name, ColumnData::Text(values), cells)
}

/// Transpose a raw table into typed columns.
pub fn build_dataset(table: RawTable) -> Result<Dataset, LoadError> {
    let headers = unique_headers(table.headers);
    let mut columns: Vec<Vec<String>> = vec![Vec::with_capacity(table.rows.len()); headers.len()];

    for row in table.rows {
        for (slot, cell) in columns.iter_mut().zip(row) {
            slot.push(cell);
        }
    }

    let columns = headers
        .into_iter()
        .zip(columns)
        .map(|(name, cells)| infer_column(name, cells))
        .collect();
    Dataset::new(columns)
}
