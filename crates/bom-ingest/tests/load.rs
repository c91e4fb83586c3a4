use std::fs;
use std::path::PathBuf;

use bom_ingest::{IngestError, IngestOptions, load_and_validate, load_rows};
use bom_model::RowKind;
use tempfile::TempDir;

const HEADER: &str = "system|assembly|part|make_or_buy|step_type|subtype|comment|quantity|cost|cost_comment|carbon_footprint|carbon_comment";

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn loads_a_valid_bill_of_materials() {
    let dir = TempDir::new().expect("temp dir");
    let contents = format!(
        "{HEADER}\n\
         Brake System|||||||0||||\n\
         |Pedal Box||||||0||||\n\
         ||Brake Pedal|Make|||Laser cut|1|||||\n\
         ||||Material|Aluminium 6082||1|12.40|supplier quote|2.1|estimate\n\
         ||||Process|Laser cutting||1|3|||\n\
         ||Master Cylinder|Buy|||AP Racing|2|85||||\n"
    );
    let path = write_file(&dir, "bom.csv", &contents);

    let batch = load_and_validate(&path, &IngestOptions::default()).expect("load batch");
    assert!(batch.is_valid());
    assert_eq!(batch.rows.len(), 6);
    assert_eq!(batch.count_kind(RowKind::Part), 2);
    assert_eq!(batch.count_kind(RowKind::Step), 2);
    assert_eq!(batch.rows[5].part(), "Master Cylinder");
    assert!(batch.rows[5].is_bought());
}

#[test]
fn invalid_rows_are_collected_not_raised() {
    let dir = TempDir::new().expect("temp dir");
    let contents = format!(
        "{HEADER}\n\
         Electronics|||||||0||||\n\
         ||Bracket|Make||||0||||\n\
         ||||Tooling|Jig||1||||\n"
    );
    let path = write_file(&dir, "bom.csv", &contents);

    let batch = load_and_validate(&path, &IngestOptions::default()).expect("load batch");
    assert!(!batch.is_valid());
    assert_eq!(batch.error_count(), 2);
    assert_eq!(batch.issues[0].position, 1);
    assert_eq!(batch.issues[1].position, 2);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.csv");
    let err = load_rows(&path, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::FileRead { .. }));
}

#[test]
fn wrong_extension_is_rejected_before_reading() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "bom.txt", HEADER);
    let err = load_rows(&path, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { ref extension, .. } if extension == "txt"));
}
