//! CLI interface module
//!
//! Provides command-line interface using clap derive macros.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Exit codes for the CLI
///
/// These codes follow standard Unix conventions and provide
/// specific error categories for scripting and automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArgs = 2,
    InputNotFound = 3,
    OutputError = 4,
    ProcessingError = 5,
    ExternalToolError = 6,
}

impl ExitCode {
    /// Convert to process exit code
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Get human-readable description
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::InvalidArgs => "Invalid arguments",
            ExitCode::InputNotFound => "Input directory not found",
            ExitCode::OutputError => "Output error (permission denied, disk full, etc.)",
            ExitCode::ProcessingError => "One or more chapters failed to process",
            ExitCode::ExternalToolError => "External tool error (unar, etc.)",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.code()
    }
}

/// Batch stitcher for manga chapter archives
///
/// Scans a directory of CBZ/CBR/ZIP/RAR chapters, merges split tail pages
/// into their leading page, and repacks each chapter as a `.stitched.cbz`
/// container with ComicInfo metadata.
#[derive(Parser, Debug)]
#[command(name = "manga-stitch")]
#[command(version)]
#[command(about = "Merge split manga tail pages and repack chapters as CBZ", long_about = None)]
pub struct Cli {
    /// Directory full of CBZ/CBR/ZIP/RAR chapters
    pub directory: PathBuf,

    /// Recursively search the directory for chapter files
    #[arg(short, long)]
    pub recursive: bool,

    /// Title to use for the stitched chapters (overrides default)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Series to use for the stitched chapters (overrides default)
    #[arg(short, long)]
    pub series: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the banner and summary output
    #[arg(short, long)]
    pub quiet: bool,

    /// List the chapters that would be processed without processing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Version banner line, rendered from read-only build data.
pub fn banner(version: &str) -> String {
    format!(">>> manga-stitch v{} <<<", version)
}

/// Create a styled progress bar for the chapter loop
pub fn create_chapter_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    pb
}

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb
}
