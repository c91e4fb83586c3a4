//! Delimited file reader producing classified rows.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use bom_model::{Row, RowData};

use crate::error::{IngestError, Result};

/// Columns every input file must provide. Extra columns are ignored.
pub const REQUIRED_FIELDS: [&str; 12] = [
    "system",
    "assembly",
    "part",
    "make_or_buy",
    "step_type",
    "subtype",
    "comment",
    "quantity",
    "cost",
    "cost_comment",
    "carbon_footprint",
    "carbon_comment",
];

/// Field delimiter used when none is configured.
pub const DEFAULT_DELIMITER: u8 = b'|';

/// Accepted file extensions (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 1] = ["csv"];

/// Options controlling how an input file is read.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub delimiter: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl IngestOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Loads every record of `path` as a classified [`Row`].
///
/// # Errors
///
/// Fails on an unsupported extension, unreadable file, missing columns,
/// malformed records, or any numeric cell that does not parse.
pub fn load_rows(path: &Path, options: &IngestOptions) -> Result<Vec<Row>> {
    check_extension(path)?;
    info!(path = %path.display(), "loading bill of materials");
    let file = File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_rows(file, path, options)?;
    info!(rows = rows.len(), "loaded {} rows of data", rows.len());
    Ok(rows)
}

/// Reads rows from any reader; `path` is used for error messages only.
///
/// # Errors
///
/// See [`load_rows`].
pub fn read_rows<R: Read>(reader: R, path: &Path, options: &IngestOptions) -> Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();
    let columns = ColumnIndex::from_headers(&headers, path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        let line = record.position().map_or(0, csv::Position::line);
        let data = columns.row_data(&record, path, line)?;
        rows.push(Row::new(data));
    }
    debug!(path = %path.display(), rows = rows.len(), "read records");
    Ok(rows)
}

/// Rejects files whose extension is not a supported delimited format.
///
/// # Errors
///
/// Returns [`IngestError::UnsupportedFormat`].
pub fn check_extension(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    if SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(extension))
    {
        Ok(())
    } else {
        Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: extension.to_string(),
        })
    }
}

fn csv_error(path: &Path, source: csv::Error) -> IngestError {
    IngestError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Position of each required column in the header.
struct ColumnIndex {
    positions: BTreeMap<&'static str, usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord, path: &Path) -> Result<Self> {
        if headers.iter().all(|header| header.trim().is_empty()) {
            return Err(IngestError::NoData {
                path: path.to_path_buf(),
            });
        }
        let normalized: Vec<String> = headers
            .iter()
            .map(|header| header.trim_matches('\u{feff}').trim().to_string())
            .collect();

        let mut positions = BTreeMap::new();
        let mut missing = Vec::new();
        for field in REQUIRED_FIELDS {
            match normalized.iter().position(|header| header == field) {
                Some(idx) => {
                    positions.insert(field, idx);
                }
                None => missing.push(field.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns {
                path: path.to_path_buf(),
                missing,
            });
        }
        Ok(Self { positions })
    }

    /// Returns the cell as written, or `None` when the record is too short.
    fn cell<'r>(&self, record: &'r StringRecord, field: &str) -> Option<&'r str> {
        self.positions.get(field).and_then(|&idx| record.get(idx))
    }

    fn text(&self, record: &StringRecord, field: &str) -> String {
        self.cell(record, field).unwrap_or_default().to_string()
    }

    fn number<T: std::str::FromStr>(
        &self,
        record: &StringRecord,
        field: &str,
        default: T,
        path: &Path,
        line: u64,
    ) -> Result<T> {
        // Surrounding whitespace is tolerated in numbers only; text cells keep it
        // and fail the exact-match checks.
        match self.cell(record, field).map(str::trim) {
            None | Some("") => Ok(default),
            Some(value) => value.parse().map_err(|_| IngestError::InvalidNumber {
                path: path.to_path_buf(),
                line,
                column: field.to_string(),
                value: value.to_string(),
            }),
        }
    }

    fn row_data(&self, record: &StringRecord, path: &Path, line: u64) -> Result<RowData> {
        Ok(RowData {
            system: self.text(record, "system"),
            assembly: self.text(record, "assembly"),
            part: self.text(record, "part"),
            make_or_buy: self.text(record, "make_or_buy"),
            step_type: self.text(record, "step_type"),
            subtype: self.text(record, "subtype"),
            comment: self.text(record, "comment"),
            quantity: self.number(record, "quantity", 0_i64, path, line)?,
            cost: self.number(record, "cost", f64::NAN, path, line)?,
            cost_comment: self.text(record, "cost_comment"),
            carbon_footprint: self.number(record, "carbon_footprint", f64::NAN, path, line)?,
            carbon_comment: self.text(record, "carbon_comment"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bom_model::RowKind;

    const HEADER: &str = "system|assembly|part|make_or_buy|step_type|subtype|comment|quantity|cost|cost_comment|carbon_footprint|carbon_comment";

    fn read(contents: &str) -> Result<Vec<Row>> {
        read_rows(
            contents.as_bytes(),
            Path::new("test.csv"),
            &IngestOptions::default(),
        )
    }

    #[test]
    fn test_reads_and_classifies_rows() {
        let contents = format!(
            "{HEADER}\nBrake System|||||||0||||\n|Pedal Box||||||0||||\n||Pedal|Make|||Steel pedal|1|12.5|quote|3.2|\n||||Material|Steel||1|4|invoice|1.1|est\n"
        );
        let rows = read(&contents).expect("read rows");
        let kinds: Vec<RowKind> = rows.iter().map(Row::kind).collect();
        assert_eq!(
            kinds,
            vec![RowKind::System, RowKind::Assembly, RowKind::Part, RowKind::Step]
        );
        assert_eq!(rows[2].comment(), "Steel pedal");
        assert_eq!(rows[2].quantity(), 1);
        assert!((rows[2].cost() - 12.5).abs() < 1e-9);
        assert_eq!(rows[3].identifier(), "Material: Steel");
    }

    #[test]
    fn test_blank_and_missing_numbers_use_defaults() {
        let contents = format!("{HEADER}\nBrake System|||||||||||\nSteering System\n");
        let rows = read(&contents).expect("read rows");
        for row in &rows {
            assert_eq!(row.quantity(), 0);
            assert!(row.cost().is_nan());
            assert!(row.carbon_footprint().is_nan());
        }
        assert_eq!(rows[1].system(), "Steering System");
    }

    #[test]
    fn test_unreadable_number_is_fatal() {
        let contents = format!("{HEADER}\n||Bolt|Buy|||| two |1|||\n");
        let err = read(&contents).unwrap_err();
        match err {
            IngestError::InvalidNumber {
                line,
                column,
                value,
                ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, "quantity");
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_text_cells_keep_surrounding_whitespace() {
        let contents = format!("{HEADER}\n Brake System |||||||| 2 ||||\n||||Material |Steel||1| 4 |||\n");
        let rows = read(&contents).expect("read rows");
        assert_eq!(rows[0].system(), " Brake System ");
        assert!(rows[0].validate().is_err());
        assert_eq!(rows[1].step_type(), "Material ");
        assert!(rows[1].validate().is_err());
        assert!((rows[1].cost() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_columns_are_listed() {
        let err = read("system|assembly|part\nBrake System||\n").unwrap_err();
        match err {
            IngestError::MissingColumns { missing, .. } => {
                assert_eq!(missing.len(), 9);
                assert!(missing.contains(&"make_or_buy".to_string()));
                assert!(!missing.contains(&"part".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input_has_no_data() {
        assert!(matches!(read(""), Err(IngestError::NoData { .. })));
    }

    #[test]
    fn test_extra_columns_and_byte_order_mark_are_tolerated() {
        let contents = format!("\u{feff}{HEADER}|notes\nMiscellaneous|||||||0||||| ignored\n");
        let rows = read(&contents).expect("read rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind(), RowKind::System);
    }

    #[test]
    fn test_custom_delimiter() {
        let header = HEADER.replace('|', ",");
        let contents = format!("{header}\n,,Nut,Buy,,,,8,0.1,,0,\n");
        let rows = read_rows(
            contents.as_bytes(),
            Path::new("test.csv"),
            &IngestOptions::default().with_delimiter(b','),
        )
        .expect("read rows");
        assert_eq!(rows[0].part(), "Nut");
        assert_eq!(rows[0].quantity(), 8);
    }

    #[test]
    fn test_check_extension() {
        assert!(check_extension(Path::new("bom.csv")).is_ok());
        assert!(check_extension(Path::new("BOM.CSV")).is_ok());
        assert!(matches!(
            check_extension(Path::new("bom.xlsx")),
            Err(IngestError::UnsupportedFormat { .. })
        ));
        assert!(check_extension(Path::new("bom")).is_err());
    }
}
