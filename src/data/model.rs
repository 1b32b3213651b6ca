use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::LoadError;

// ---------------------------------------------------------------------------
// ColumnData – the typed values of one column
// ---------------------------------------------------------------------------

/// Semantic type inferred for a column at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
    Temporal,
}

/// Typed cells of a column; `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric {
        values: Vec<Option<f64>>,
        /// Every present cell was written as an integer.
        integral: bool,
    },
    Text(Vec<Option<String>>),
    Temporal(Vec<Option<NaiveDateTime>>),
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric { .. } => ColumnKind::Numeric,
            ColumnData::Text(_) => ColumnKind::Text,
            ColumnData::Temporal(_) => ColumnKind::Temporal,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric { values, .. } => values.len(),
            ColumnData::Text(values) => values.len(),
            ColumnData::Temporal(values) => values.len(),
        }
    }

    /// Number of missing cells.
    pub fn missing(&self) -> usize {
        match self {
            ColumnData::Numeric { values, .. } => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Text(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Temporal(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// Storage type label in the familiar dataframe vocabulary.
    /// Integer columns with gaps widen to floats.
    pub fn dtype(&self) -> &'static str {
        match self {
            ColumnData::Numeric { integral: true, .. } if self.missing() == 0 => "int64",
            ColumnData::Numeric { .. } => "float64",
            ColumnData::Text(_) => "object",
            ColumnData::Temporal(_) => "datetime64[ns]",
        }
    }
}

// ---------------------------------------------------------------------------
// Column – a named column plus the source text of its cells
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
    /// Cell text exactly as read, used for previews.
    source: Vec<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData, source: Vec<String>) -> Self {
        debug_assert_eq!(data.len(), source.len());
        Column {
            name: name.into(),
            data,
            source,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn is_numeric(&self) -> bool {
        self.kind() == ColumnKind::Numeric
    }

    pub fn source_text(&self, row: usize) -> &str {
        self.source.get(row).map(String::as_str).unwrap_or("")
    }

    pub fn is_missing(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numeric { values, .. } => values.get(row).is_some_and(Option::is_none),
            ColumnData::Text(values) => values.get(row).is_some_and(Option::is_none),
            ColumnData::Temporal(values) => values.get(row).is_some_and(Option::is_none),
        }
    }

    /// Present values of a numeric column, in row order. Empty for other kinds.
    pub fn numeric_values(&self) -> Vec<f64> {
        match &self.data {
            ColumnData::Numeric { values, .. } => values.iter().flatten().copied().collect(),
            _ => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Ordered named columns sharing one row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Assemble a dataset, rejecting columns of differing length.
    pub fn new(columns: Vec<Column>) -> Result<Self, LoadError> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(LoadError::InconsistentColumns {
                column: bad.name.clone(),
                expected: rows,
                found: bad.len(),
            });
        }
        Ok(Dataset { columns, rows })
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns.len())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    /// The first `n` rows as source text.
    pub fn head(&self, n: usize) -> Preview {
        let take = n.min(self.rows);
        let rows = (0..take)
            .map(|r| {
                self.columns
                    .iter()
                    .map(|c| c.source_text(r).to_string())
                    .collect()
            })
            .collect();
        let missing = (0..take)
            .map(|r| self.columns.iter().map(|c| c.is_missing(r)).collect())
            .collect();
        Preview {
            columns: self.column_names(),
            rows,
            missing,
        }
    }
}

// ---------------------------------------------------------------------------
// Preview – leading rows ready for display
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Parallel to `rows`: whether the cell counts as missing.
    pub missing: Vec<Vec<bool>>,
}

impl Preview {
    /// Re-serialize header and rows as CSV.
    pub fn to_csv(&self) -> anyhow::Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{e}"))?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Temporal => write!(f, "datetime"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(name: &str, values: &[Option<f64>]) -> Column {
        let source = values
            .iter()
            .map(|v| v.map(|x| x.to_string()).unwrap_or_default())
            .collect();
        Column::new(
            name,
            ColumnData::Numeric {
                values: values.to_vec(),
                integral: true,
            },
            source,
        )
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = Dataset::new(vec![
            numeric("a", &[Some(1.0), Some(2.0)]),
            numeric("b", &[Some(1.0)]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::InconsistentColumns { ref column, expected: 2, found: 1 } if column == "b"
        ));
    }

    #[test]
    fn dtype_widens_integers_with_gaps() {
        let full = numeric("a", &[Some(1.0), Some(2.0)]);
        let gappy = numeric("b", &[Some(1.0), None]);
        assert_eq!(full.data.dtype(), "int64");
        assert_eq!(gappy.data.dtype(), "float64");
        assert_eq!(gappy.data.missing(), 1);
    }

    #[test]
    fn head_is_clamped_to_row_count() {
        let ds = Dataset::new(vec![numeric("a", &[Some(1.0), None, Some(3.0)])]).unwrap();
        let preview = ds.head(5);
        assert_eq!(preview.rows.len(), 3);
        assert_eq!(preview.missing, vec![vec![false], vec![true], vec![false]]);
        assert_eq!(preview.to_csv().unwrap(), "a\n1\n\"\"\n3\n");
    }
}
