//! CLI argument definitions for the bill-of-materials uploader.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

use bom_upload::DEFAULT_SNAPSHOT_LABEL;
use bom_webdriver::DEFAULT_SERVER_URL;

#[derive(Parser)]
#[command(
    name = "bom-uploader",
    version,
    about = "Upload a bill of materials to the Formula Student teams site",
    long_about = "Upload a pipe-delimited bill of materials to the Formula Student teams site.\n\n\
                  Rows are validated locally first; nothing is sent unless every row is valid.\n\
                  Uploading drives a browser through a running WebDriver server\n\
                  (geckodriver or chromedriver)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a bill of materials and upload it into a new snapshot.
    Upload(UploadArgs),

    /// Validate a bill of materials without uploading anything.
    Validate(ValidateArgs),

    /// List the accepted systems, step types and make/buy values.
    Systems,
}

#[derive(Args)]
pub struct InputArgs {
    /// Bill-of-materials file (.csv).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field delimiter of the input file.
    #[arg(long = "delimiter", value_name = "CHAR", default_value_t = '|')]
    pub delimiter: char,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args)]
pub struct UploadArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Revision the new snapshot is copied from.
    #[arg(long = "base-revision", value_name = "N", default_value_t = 1)]
    pub base_revision: u32,

    /// Snapshot label; the current date and time are appended.
    #[arg(long = "label", value_name = "TEXT", default_value = DEFAULT_SNAPSHOT_LABEL)]
    pub label: String,

    /// Leave cost and carbon footprint fields empty.
    #[arg(long = "no-cost")]
    pub no_cost: bool,

    /// URL of the WebDriver server.
    #[arg(
        long = "webdriver-url",
        value_name = "URL",
        env = "BOM_WEBDRIVER_URL",
        default_value = DEFAULT_SERVER_URL
    )]
    pub webdriver_url: String,

    /// Browser requested from the WebDriver server.
    #[arg(long = "browser", value_enum, default_value = "firefox")]
    pub browser: BrowserArg,

    /// Run the browser without a window.
    #[arg(long = "headless")]
    pub headless: bool,

    /// Seconds to wait for each page element before giving up.
    #[arg(long = "timeout-secs", value_name = "SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Teams site username (prompted for when absent).
    #[arg(long = "username", env = "FSUK_USERNAME")]
    pub username: Option<String>,

    /// Teams site password (prompted for when absent).
    #[arg(long = "password", env = "FSUK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Leave the browser open after the upload finishes.
    #[arg(long = "keep-open")]
    pub keep_open: bool,

    /// Write the per-row upload report as JSON.
    #[arg(long = "report-file", value_name = "PATH")]
    pub report_file: Option<PathBuf>,
}

/// CLI browser choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum BrowserArg {
    Firefox,
    Chrome,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_upload_defaults() {
        let cli = Cli::try_parse_from(["bom-uploader", "upload", "bom.csv"]).unwrap();
        let Command::Upload(args) = cli.command else {
            panic!("expected upload command");
        };
        assert_eq!(args.input.delimiter, '|');
        assert_eq!(args.base_revision, 1);
        assert_eq!(args.label, "Bill of Materials");
        assert_eq!(args.timeout_secs, 10);
        assert!(!args.no_cost);
        assert!(!args.keep_open);
    }

    #[test]
    fn test_upload_requires_file() {
        assert!(Cli::try_parse_from(["bom-uploader", "upload"]).is_err());
    }
}
