//! Batch driver module
//!
//! Enumerates chapter containers under a root directory, filters
//! already-stitched outputs, and iterates the chapter assembler over the
//! rest. Chapters are processed strictly sequentially; a failing chapter is
//! reported and never halts its siblings.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::archive::ChapterFormat;
use crate::assemble::{ChapterAssembler, ProgressCallback};

/// Already-stitched output markers recognized during the directory scan.
const STITCHED_MARKERS: [&str; 2] = [".stitched.cbz", ".stitched.cbr"];

/// True if the file name carries the stitched output marker.
pub fn is_already_stitched(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    STITCHED_MARKERS.iter().any(|marker| name.ends_with(marker))
}

fn is_chapter_candidate(path: &Path) -> bool {
    ChapterFormat::from_path(path).is_some() && !is_already_stitched(path)
}

/// Find chapter containers under `root`, lexically sorted.
///
/// Immediate children only by default; unbounded depth when `recursive`.
/// Files bearing the stitched marker are excluded so repeated runs stay
/// idempotent.
pub fn discover_chapters(root: &Path, recursive: bool) -> std::io::Result<Vec<PathBuf>> {
    let mut chapters = Vec::new();

    if recursive {
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() && is_chapter_candidate(entry.path()) {
                chapters.push(entry.path().to_path_buf());
            }
        }
    } else {
        for entry in std::fs::read_dir(root)? {
            let path = entry?.path();
            if path.is_file() && is_chapter_candidate(&path) {
                chapters.push(path);
            }
        }
    }

    chapters.sort();
    Ok(chapters)
}

/// Per-category counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub stitched: usize,
    pub empty: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Human-readable one-line summary.
    pub fn render(&self) -> String {
        format!(
            "{} stitched, {} skipped, {} empty, {} failed ({} chapters)",
            self.stitched, self.skipped, self.empty, self.failed, self.total
        )
    }
}

/// Run the assembler over every discovered chapter, sequentially.
///
/// A chapter whose output container already exists is skipped, so running
/// the batch twice performs no work the second time. Failures are surfaced
/// through the progress callback with the offending path and counted.
pub fn run_batch<P: ProgressCallback>(
    chapters: &[PathBuf],
    assembler: &ChapterAssembler,
    progress: &P,
) -> BatchSummary {
    let mut summary = BatchSummary {
        total: chapters.len(),
        ..Default::default()
    };

    for (index, chapter) in chapters.iter().enumerate() {
        progress.on_chapter_start(index, chapters.len(), chapter);

        let output = assembler.output_path(chapter);
        if output.exists() {
            progress.on_debug(&format!("Skipping (already stitched): {}", chapter.display()));
            summary.skipped += 1;
            continue;
        }

        match assembler.process_chapter(chapter, index, progress) {
            Ok(outcome) if outcome.output.is_some() => summary.stitched += 1,
            Ok(_) => summary.empty += 1,
            Err(e) => {
                progress.on_chapter_error(chapter, &e.to_string());
                summary.failed += 1;
            }
        }
    }

    summary
}
