use std::path::PathBuf;

// ---------------------------------------------------------------------------
// LoadError – everything that can go wrong turning an upload into a Dataset
// ---------------------------------------------------------------------------

/// Failure while reading an uploaded file.
///
/// The variants only ever reach the log; the user sees a single generic
/// notice (see [`crate::session`]).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("file is not valid UTF-8 (line {line})")]
    Encoding { line: u64 },

    #[error("Expected {expected} fields in line {line}, saw {found}")]
    Ragged {
        expected: usize,
        line: u64,
        found: usize,
    },

    #[error("no columns to parse from file")]
    EmptyFile,

    #[error("reading workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook contains no sheets")]
    NoSheets,

    #[error("column '{column}' has {found} rows, expected {expected}")]
    InconsistentColumns {
        column: String,
        expected: usize,
        found: usize,
    },
}
