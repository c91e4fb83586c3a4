use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use comfy_table::Table;
use tracing::{info, info_span};

use bom_ingest::{IngestOptions, LoadedBatch, load_and_validate};
use bom_model::{FsukSystem, MakeOrBuy, StepType};
use bom_upload::{TeamsSite, UploadConfig, UploadReport, upload_bill_of_materials};
use bom_webdriver::{Browser, DriverConfig};

use bom_cli::prompt::TerminalPrompt;

use crate::cli::{BrowserArg, InputArgs, UploadArgs, ValidateArgs};
use crate::summary::{apply_table_style, header_cell};
use crate::types::UploadRun;

pub fn run_systems() {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Code"), header_cell("System")]);
    apply_table_style(&mut table);
    for system in FsukSystem::ALL {
        table.add_row(vec![system.code(), system.as_str()]);
    }
    println!("{table}");

    let step_types: Vec<&str> = StepType::ALL.iter().map(StepType::as_str).collect();
    let make_or_buy: Vec<&str> = MakeOrBuy::ALL.iter().map(MakeOrBuy::as_str).collect();
    println!("Step types: {}", step_types.join(", "));
    println!("Make/Buy: {}", make_or_buy.join(", "));
}

pub fn run_validate(args: &ValidateArgs) -> Result<LoadedBatch> {
    load_batch(&args.input)
}

pub fn run_upload(args: &UploadArgs) -> Result<UploadRun> {
    let batch = load_batch(&args.input)?;
    if !batch.is_valid() {
        return Ok(UploadRun::Rejected(batch));
    }

    let driver_config = DriverConfig::default()
        .with_server_url(args.webdriver_url.clone())
        .with_browser(match args.browser {
            BrowserArg::Firefox => Browser::Firefox,
            BrowserArg::Chrome => Browser::Chrome,
        })
        .with_headless(args.headless)
        .with_wait_timeout(Duration::from_secs(args.timeout_secs));
    let config = UploadConfig::default()
        .with_base_revision(args.base_revision)
        .with_snapshot_label(args.label.clone())
        .with_upload_cost(!args.no_cost)
        .with_keep_open(args.keep_open);
    let mut prompt = TerminalPrompt::stdio()
        .with_username(args.username.clone())
        .with_password(args.password.clone());

    let span = info_span!("upload", file = %args.input.file.display());
    let _guard = span.enter();
    let report = upload_bill_of_materials(
        &batch.rows,
        &config,
        || TeamsSite::connect(&driver_config),
        &mut prompt,
    )
    .context("upload bill of materials")?;

    if let Some(path) = &args.report_file {
        write_report(path, &report)?;
    }
    Ok(UploadRun::Completed { batch, report })
}

fn load_batch(input: &InputArgs) -> Result<LoadedBatch> {
    let options = IngestOptions::default().with_delimiter(delimiter_byte(input.delimiter)?);
    info!(file = %input.file.display(), "loading bill of materials");
    load_and_validate(&input.file, &options)
        .with_context(|| format!("load {}", input.file.display()))
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got '{delimiter}'");
    }
    Ok(delimiter as u8)
}

fn write_report(path: &Path, report: &UploadReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize upload report")?;
    fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    info!(path = %path.display(), "wrote upload report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use bom_model::RowKind;
    use bom_upload::{RowOutcome, RowReport, SkipReason};
    use tempfile::TempDir;

    const HEADER: &str = "system|assembly|part|make_or_buy|step_type|subtype|comment|quantity|cost|cost_comment|carbon_footprint|carbon_comment";

    fn input(dir: &TempDir, contents: &str) -> InputArgs {
        let file = dir.path().join("bom.csv");
        fs::write(&file, contents).unwrap();
        InputArgs {
            file,
            delimiter: '|',
        }
    }

    fn upload_args(input: InputArgs, report_file: Option<PathBuf>) -> UploadArgs {
        UploadArgs {
            input,
            base_revision: 1,
            label: "Bill of Materials".to_string(),
            no_cost: false,
            webdriver_url: "http://127.0.0.1:9".to_string(),
            browser: BrowserArg::Firefox,
            headless: true,
            timeout_secs: 1,
            username: None,
            password: None,
            keep_open: false,
            report_file,
        }
    }

    #[test]
    fn test_write_report_records_skipped_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let report = UploadReport {
            snapshot_label: Some("Bill of Materials (05 Mar 25 14:07)".to_string()),
            rows: vec![
                RowReport {
                    position: 1,
                    kind: RowKind::Part,
                    identifier: "Hub".to_string(),
                    outcome: RowOutcome::Skipped(SkipReason::PartUploadFailed {
                        message: "save button not found".to_string(),
                    }),
                },
                RowReport {
                    position: 2,
                    kind: RowKind::Step,
                    identifier: "Machining: Turn".to_string(),
                    outcome: RowOutcome::Skipped(SkipReason::NoParentPart),
                },
            ],
        };

        write_report(&path, &report).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["snapshot_label"], "Bill of Materials (05 Mar 25 14:07)");
        assert_eq!(json["rows"][0]["outcome"]["status"], "skipped");
        assert_eq!(json["rows"][0]["outcome"]["reason"], "part_upload_failed");
        assert_eq!(json["rows"][0]["outcome"]["message"], "save button not found");
        assert_eq!(json["rows"][1]["outcome"]["reason"], "no_parent_part");
        assert_eq!(json["rows"][1]["kind"], "Step");
    }

    #[test]
    fn test_validate_flags_invalid_rows() {
        let dir = TempDir::new().unwrap();
        let args = ValidateArgs {
            input: input(
                &dir,
                &format!("{HEADER}\nBrake System|||||||0||||\n||Pad|Buy||||0|1|||\n"),
            ),
        };

        let batch = run_validate(&args).unwrap();

        assert!(!batch.is_valid());
        assert_eq!(batch.error_count(), 1);
        assert_eq!(batch.issues[0].position, 2);
    }

    #[test]
    fn test_validate_rejects_missing_file() {
        let dir = TempDir::new().unwrap();
        let args = ValidateArgs {
            input: InputArgs {
                file: dir.path().join("absent.csv"),
                delimiter: '|',
            },
        };
        assert!(run_validate(&args).is_err());
    }

    #[test]
    fn test_upload_stops_before_connecting_when_rows_are_invalid() {
        let dir = TempDir::new().unwrap();
        let report_file = dir.path().join("report.json");
        let args = upload_args(
            input(&dir, &format!("{HEADER}\nElectronics|||||||0||||\n")),
            Some(report_file.clone()),
        );

        let run = run_upload(&args).unwrap();

        assert!(matches!(run, UploadRun::Rejected(batch) if batch.error_count() == 1));
        assert!(!report_file.exists());
    }

    #[test]
    fn test_delimiter_byte() {
        assert_eq!(delimiter_byte('|').unwrap(), b'|');
        assert_eq!(delimiter_byte(',').unwrap(), b',');
        assert!(delimiter_byte('§').is_err());
    }
}
