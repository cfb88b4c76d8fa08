//! manga-stitch - Batch stitcher for manga chapter archives
//!
//! CLI entry point

use clap::Parser;
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Instant;

use manga_stitch::{
    banner, create_chapter_progress_bar, discover_chapters, run_batch, ChapterAssembler, Cli,
    Config, ExitCode, ProgressCallback, RunSettings,
};

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(&cli).code());
}

fn run(cli: &Cli) -> ExitCode {
    let start_time = Instant::now();

    if !cli.quiet {
        println!("{}", banner(env!("CARGO_PKG_VERSION")));
        println!();
    }

    if !cli.directory.is_dir() {
        eprintln!(
            "Error: Input directory does not exist: {}",
            cli.directory.display()
        );
        return ExitCode::InputNotFound;
    }

    // Load config file if specified, otherwise use the default search path
    let file_config = match &cli.config {
        Some(config_path) => match Config::load_from_path(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                Config::default()
            }
        },
        None => Config::load().unwrap_or_default(),
    };
    let settings = file_config.merge_with_cli(cli);

    let chapters = match discover_chapters(&cli.directory, settings.recursive) {
        Ok(chapters) => chapters,
        Err(e) => {
            eprintln!(
                "Error: Failed to scan {}: {}",
                cli.directory.display(),
                e
            );
            return ExitCode::GeneralError;
        }
    };

    if chapters.is_empty() {
        eprintln!(
            "Error: No chapter archives found in {}",
            cli.directory.display()
        );
        return ExitCode::InputNotFound;
    }

    if cli.dry_run {
        print_execution_plan(cli, &settings, &chapters);
        return ExitCode::Success;
    }

    let assembler = ChapterAssembler::new(settings.title.clone(), settings.series.clone());
    let progress = CliProgress::new(chapters.len() as u64, cli.verbose, cli.quiet);

    let summary = run_batch(&chapters, &assembler, &progress);
    progress.finish();

    if !cli.quiet {
        println!();
        println!("Summary: {}", summary.render());
        println!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
        println!();
        println!("All chapters processed!");
    }

    if summary.failed > 0 {
        eprintln!("Error: {} chapter(s) failed to process", summary.failed);
        ExitCode::ProcessingError
    } else {
        ExitCode::Success
    }
}

/// Progress reporting backed by an indicatif chapter bar.
struct CliProgress {
    bar: ProgressBar,
    verbose: u8,
    quiet: bool,
}

impl CliProgress {
    fn new(total: u64, verbose: u8, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            create_chapter_progress_bar(total)
        };
        Self { bar, verbose, quiet }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_chapter_start(&self, index: usize, _total: usize, path: &Path) {
        self.bar.set_position(index as u64);
        if let Some(name) = path.file_name() {
            self.bar.set_message(name.to_string_lossy().into_owned());
        }
        if self.verbose > 0 {
            self.bar
                .println(format!("Processing: {}", path.display()));
        }
    }

    fn on_step_start(&self, step: &str) {
        if self.verbose > 0 {
            self.bar.println(format!("  {}...", step));
        }
    }

    fn on_step_complete(&self, step: &str, message: &str) {
        if self.verbose > 0 {
            self.bar.println(format!("  {}: {}", step, message));
        }
    }

    fn on_chapter_error(&self, path: &Path, message: &str) {
        // Chapter failures are always user-visible.
        if self.quiet {
            eprintln!("Error processing {}: {}", path.display(), message);
        } else {
            self.bar
                .println(format!("Error processing {}: {}", path.display(), message));
        }
    }

    fn on_debug(&self, message: &str) {
        if self.verbose > 1 {
            self.bar.println(format!("  [DEBUG] {}", message));
        }
    }
}

/// Print the chapters that a run would process, without processing them.
fn print_execution_plan(cli: &Cli, settings: &RunSettings, chapters: &[std::path::PathBuf]) {
    println!("=== Dry Run - Execution Plan ===");
    println!();
    println!("Directory: {}", cli.directory.display());
    println!("Recursive: {}", if settings.recursive { "YES" } else { "NO" });
    println!(
        "Title: {}",
        settings.title.as_deref().unwrap_or("(default per chapter)")
    );
    println!("Series: {}", settings.series.as_deref().unwrap_or("(empty)"));
    println!("Chapters to process: {}", chapters.len());
    println!();
    for (i, chapter) in chapters.iter().enumerate() {
        println!("  {}. {}", i + 1, chapter.display());
    }
}
