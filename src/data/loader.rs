use std::io::Cursor;
use std::path::Path;

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};

use super::infer::{RawTable, build_dataset};
use super::model::Dataset;
use crate::error::LoadError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ---------------------------------------------------------------------------
// UploadedFile – a file handed to us by the user
// ---------------------------------------------------------------------------

/// A user-supplied file: its name (only used to pick a parser) and its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadedFile {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, naming it after its final path component.
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(UploadedFile { name, bytes })
    }

    /// `.csv` in any letter case; every other name goes to the workbook reader.
    pub fn is_csv(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with(".csv")
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse an upload into a [`Dataset`].  Dispatch by name.
///
/// * `*.csv` – comma-separated values with a header row
/// * anything else – a spreadsheet workbook; only the first sheet is read
pub fn load_data(file: &UploadedFile) -> Result<Dataset, LoadError> {
    let table = if file.is_csv() {
        read_csv(&file.bytes)?
    } else {
        read_workbook(&file.bytes)?
    };
    build_dataset(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row, then records. Short records are padded with empty cells,
/// long ones are rejected.
fn read_csv(bytes: &[u8]) -> Result<RawTable, LoadError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LoadError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = utf8_record(reader.byte_headers()?, 1)?;
    let width = headers.len();
    let mut rows = Vec::new();

    for result in reader.byte_records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let mut row = utf8_record(&record, line)?;

        if row.len() > width {
            return Err(LoadError::Ragged {
                expected: width,
                line,
                found: row.len(),
            });
        }
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn utf8_record(record: &csv::ByteRecord, line: u64) -> Result<Vec<String>, LoadError> {
    record
        .iter()
        .map(|field| {
            std::str::from_utf8(field)
                .map(str::to_string)
                .map_err(|_| LoadError::Encoding { line })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// First sheet of any workbook format calamine recognises; the first
/// non-blank row is the header. Blank leading columns are kept (as
/// `Unnamed: {i}` columns) so positions match the sheet.
fn read_workbook(bytes: &[u8]) -> Result<RawTable, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook.worksheet_range_at(0).ok_or(LoadError::NoSheets)??;
    let lead = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(LoadError::EmptyFile);
    };
    let headers = padded_row(header_row, lead);
    let width = headers.len();

    let rows = rows
        .map(|r| {
            let mut row = padded_row(r, lead);
            row.resize(width, String::new());
            row
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn padded_row(cells: &[Data], lead: usize) -> Vec<String> {
    std::iter::repeat(String::new())
        .take(lead)
        .chain(cells.iter().map(cell_text))
        .collect()
}

/// Render a workbook cell the way it would appear in a CSV export.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnKind;

    fn csv_upload(text: &str) -> UploadedFile {
        UploadedFile::new("data.csv", text.as_bytes().to_vec())
    }

    #[test]
    fn csv_shape_and_types() {
        let ds = load_data(&csv_upload(
            "order_id,amount,country\n1,10.5,US\n2,,DE\n3,7,FR\n",
        ))
        .unwrap();
        assert_eq!(ds.shape(), (3, 3));
        let kinds: Vec<ColumnKind> = ds.columns().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![ColumnKind::Numeric, ColumnKind::Numeric, ColumnKind::Text]
        );
        assert_eq!(ds.column("amount").unwrap().data.missing(), 1);
    }

    #[test]
    fn csv_preview_round_trips_verbatim() {
        let source = "id,price,name\n\
                      1,1.50,\"Smith, J\"\n\
                      2,NA,Doe\n\
                      3,3e2,\n\
                      4,0004,x\n\
                      5,5,y\n\
                      6,6,z\n";
        let ds = load_data(&csv_upload(source)).unwrap();
        let preview = ds.head(5);

        let expected: String = source.lines().take(6).map(|l| format!("{l}\n")).collect();
        assert_eq!(preview.to_csv().unwrap(), expected);
    }

    #[test]
    fn csv_extension_is_case_insensitive() {
        let file = UploadedFile::new("DATA.CSV", b"a\n1\n".to_vec());
        assert!(file.is_csv());
        assert_eq!(load_data(&file).unwrap().shape(), (1, 1));
    }

    #[test]
    fn csv_short_rows_are_padded() {
        let ds = load_data(&csv_upload("a,b,c\n1,2\n3,4,5\n")).unwrap();
        assert_eq!(ds.shape(), (2, 3));
        assert_eq!(ds.column("c").unwrap().data.missing(), 1);
    }

    #[test]
    fn csv_long_rows_are_rejected() {
        let err = load_data(&csv_upload("a,b\n1,2\n3,4,5\n")).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Ragged {
                expected: 2,
                line: 3,
                found: 3
            }
        ));
    }

    #[test]
    fn csv_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"name,value\nx,1\n");
        let ds = load_data(&UploadedFile::new("bom.csv", bytes)).unwrap();
        assert_eq!(ds.column_names(), vec!["name", "value"]);
    }

    #[test]
    fn csv_rejects_invalid_utf8() {
        let file = UploadedFile::new("latin1.csv", b"name\ncaf\xE9\n".to_vec());
        assert!(matches!(load_data(&file), Err(LoadError::Encoding { .. })));
    }

    #[test]
    fn empty_csv_is_an_error() {
        assert!(matches!(
            load_data(&csv_upload("")),
            Err(LoadError::EmptyFile)
        ));
    }

    #[test]
    fn header_only_csv_has_no_rows() {
        let ds = load_data(&csv_upload("a,b\n")).unwrap();
        assert_eq!(ds.shape(), (0, 2));
    }

    #[test]
    fn garbage_workbook_is_an_error() {
        let file = UploadedFile::new("broken.xlsx", b"definitely not a zip archive".to_vec());
        assert!(load_data(&file).is_err());
    }

    #[test]
    fn reads_first_sheet_of_xlsx() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "order_id").unwrap();
        sheet.write_string(0, 1, "amount").unwrap();
        sheet.write_string(0, 2, "country").unwrap();
        for row in 1..=4u32 {
            sheet.write_number(row, 0, f64::from(row)).unwrap();
            if row != 2 {
                sheet.write_number(row, 1, f64::from(row) * 2.5).unwrap();
            }
            sheet.write_string(row, 2, "US").unwrap();
        }
        let second = workbook.add_worksheet();
        second.write_string(0, 0, "ignored").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let ds = load_data(&UploadedFile::new("orders.xlsx", bytes)).unwrap();
        assert_eq!(ds.shape(), (4, 3));
        assert_eq!(ds.column_names(), vec!["order_id", "amount", "country"]);
        let amount = ds.column("amount").unwrap();
        assert!(amount.is_numeric());
        assert_eq!(amount.data.missing(), 1);
        assert_eq!(amount.numeric_values(), vec![2.5, 7.5, 10.0]);
    }

    #[test]
    fn blank_leading_column_is_kept() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 1, "a").unwrap();
        sheet.write_string(0, 2, "b").unwrap();
        sheet.write_number(1, 1, 1.0).unwrap();
        sheet.write_number(1, 2, 2.0).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let ds = load_data(&UploadedFile::new("offset.xlsx", bytes)).unwrap();
        assert_eq!(ds.column_names(), vec!["Unnamed: 0", "a", "b"]);
        assert_eq!(ds.shape(), (1, 3));
        assert_eq!(ds.column("Unnamed: 0").unwrap().data.missing(), 1);
        assert_eq!(ds.column("b").unwrap().numeric_values(), vec![2.0]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = UploadedFile::read(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
