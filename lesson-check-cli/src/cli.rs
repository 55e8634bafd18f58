//! Argument parsing and the top-level run.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use lesson_check::{
    CommandRenderer, LessonPolicy, Render, Reporter, SourceConfig, ValidationReport, check_lesson,
    output,
};

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One finding per line on stderr; silent when the lesson is clean.
    Human,
    /// Full report as JSON on stdout.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "lesson-check",
    version,
    about = "Check lesson structure, front matter and block classes"
)]
pub struct Cli {
    /// Markdown renderer: reads a document body on stdin, prints its tree as JSON
    #[arg(short, long, value_name = "PATH")]
    pub parser: PathBuf,

    /// Lesson source directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub source: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Parse the process arguments and run.
///
/// Usage errors are handled by clap, which prints usage and exits.
///
/// # Errors
///
/// Returns an error if logging cannot be set up, the source directory does
/// not exist, or the report cannot be written.
pub fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose)?;
    let renderer = CommandRenderer::new(&cli.parser);
    let report = run_with(&cli, &renderer)?;
    match cli.format {
        OutputFormat::Human => write_report(report, cli.format, &mut std::io::stderr().lock()),
        OutputFormat::Json => write_report(report, cli.format, &mut std::io::stdout().lock()),
    }
}

/// Check the lesson named by `cli` with the given renderer.
///
/// # Errors
///
/// Returns an error if the source directory does not exist.
pub fn run_with(cli: &Cli, renderer: &dyn Render) -> anyhow::Result<ValidationReport> {
    let source = SourceConfig::new(&cli.source);
    let policy = LessonPolicy::default();
    tracing::info!(
        source = %cli.source.display(),
        parser = %cli.parser.display(),
        "Checking lesson"
    );
    let report = check_lesson(&source, &policy, renderer)?;
    tracing::info!(
        documents = report.documents_checked,
        findings = report.findings_count(),
        "Check finished"
    );
    Ok(report)
}

/// Write `report` in the requested format and return the exit status.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_report(
    report: ValidationReport,
    format: OutputFormat,
    writer: &mut dyn Write,
) -> anyhow::Result<i32> {
    match format {
        OutputFormat::Human => Reporter::from(report.findings).report(writer),
        OutputFormat::Json => {
            output::write_json(&report, writer)?;
            Ok(report.exit_status())
        }
    }
}
