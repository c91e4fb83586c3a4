//! Tests for bom-model classification and validation.

use bom_model::{FsukSystem, Row, RowData, RowError, RowKind, validate_all, validation_issues};
use proptest::prelude::*;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLog {
    type Writer = CapturedLog;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn system(name: &str) -> Row {
    Row::new(RowData {
        system: name.to_string(),
        ..RowData::default()
    })
}

fn part(name: &str, quantity: i64, cost: f64) -> Row {
    Row::new(RowData {
        part: name.to_string(),
        make_or_buy: "Buy".to_string(),
        quantity,
        cost,
        carbon_footprint: 0.0,
        ..RowData::default()
    })
}

fn step(step_type: &str, subtype: &str) -> Row {
    Row::new(RowData {
        step_type: step_type.to_string(),
        subtype: subtype.to_string(),
        quantity: 1,
        ..RowData::default()
    })
}

#[test]
fn miscellaneous_is_a_valid_system() {
    assert!(system("Miscellaneous").validate().is_ok());
}

#[test]
fn unknown_system_lists_all_nine() {
    let err = system("Electronics").validate().unwrap_err();
    assert!(matches!(err, RowError::InvalidSystem { ref value } if value == "Electronics"));
    let message = err.to_string();
    assert_eq!(
        FsukSystem::ALL
            .iter()
            .filter(|s| message.contains(s.as_str()))
            .count(),
        9
    );
}

#[test]
fn quantity_is_checked_before_cost() {
    assert!(matches!(
        part("Rotor", 0, 10.0).validate(),
        Err(RowError::QuantityBelowMinimum { quantity: 0 })
    ));
    assert!(matches!(
        part("Rotor", 1000, 10.0).validate(),
        Err(RowError::QuantityAboveMaximum { quantity: 1000 })
    ));
    assert!(matches!(
        part("Rotor", 500, -1.0).validate(),
        Err(RowError::NegativeCost { .. })
    ));
}

#[test]
fn batch_reports_positions_of_invalid_rows() {
    let rows = vec![
        system("Brake System"),
        part("Rotor", 2, 10.0),
        part("Pad", 0, 1.0),
        step("Material", "Steel"),
        step("Process", "Drilling"),
        part("Caliper", 1, 40.0),
        step("Welding", "TIG"),
        step("Fasteners", "M6 bolt"),
        system("Suspension System"),
        part("Wishbone", 4, 0.0),
    ];

    let issues = validation_issues(&rows);
    let positions: Vec<usize> = issues.iter().map(|issue| issue.position).collect();
    assert_eq!(positions, vec![3, 7]);
    assert_eq!(issues[0].identifier, "Pad");
    assert_eq!(issues[1].kind, RowKind::Step);
    assert_eq!(validate_all(&rows), 2);
}

#[test]
fn validate_all_logs_one_line_per_invalid_row() {
    let rows = vec![
        system("Brake System"),
        part("Rotor", 2, 10.0),
        part("Pad", 0, 1.0),
        step("Material", "Steel"),
        step("Process", "Drilling"),
        part("Caliper", 1, 40.0),
        step("Welding", "TIG"),
        step("Fasteners", "M6 bolt"),
        system("Suspension System"),
        part("Wishbone", 4, 0.0),
    ];
    let log = CapturedLog::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(log.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let invalid = tracing::subscriber::with_default(subscriber, || validate_all(&rows));

    assert_eq!(invalid, 2);
    let errors: Vec<String> = log
        .lines()
        .into_iter()
        .filter(|line| line.contains("Error (row "))
        .collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("Error (row 3): "));
    assert!(errors[1].contains("Error (row 7): "));
    assert!(errors.iter().all(|line| line.contains("ERROR")));
}

#[test]
fn issue_serializes_error_as_message() {
    let issues = validation_issues(&[Row::new(RowData::default())]);
    let json = serde_json::to_value(&issues[0]).expect("serialize issue");
    assert_eq!(json["position"], 1);
    assert_eq!(json["kind"], "Undefined");
    assert_eq!(json["error"], "Invalid row");
}

fn maybe_field() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[A-Za-z][A-Za-z ]{0,12}"]
}

proptest! {
    #[test]
    fn classification_follows_first_non_empty_field(
        system in maybe_field(),
        assembly in maybe_field(),
        part in maybe_field(),
        step_type in maybe_field(),
        subtype in maybe_field(),
        comment in maybe_field(),
    ) {
        let row = Row::new(RowData {
            system: system.clone(),
            assembly: assembly.clone(),
            part: part.clone(),
            step_type: step_type.clone(),
            subtype,
            comment,
            ..RowData::default()
        });

        let expected = if !system.is_empty() {
            RowKind::System
        } else if !assembly.is_empty() {
            RowKind::Assembly
        } else if !part.is_empty() {
            RowKind::Part
        } else if !step_type.is_empty() {
            RowKind::Step
        } else {
            RowKind::Undefined
        };
        prop_assert_eq!(row.kind(), expected);
    }

    #[test]
    fn part_quantity_in_range_is_valid(quantity in 1i64..=999) {
        prop_assert!(part("Upright", quantity, 0.0).validate().is_ok());
    }
}
