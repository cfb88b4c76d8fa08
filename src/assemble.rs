//! Chapter assembly module
//!
//! Drives one chapter end to end: extract, sequence, pair, stitch, pack,
//! clean up. The extraction directory is owned by a scoped guard so it is
//! removed on every exit path, including failures — extraction is always
//! transient.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::archive::{self, ArchiveError};
use crate::metadata::{ChapterMetadata, OutputPage, PageKind};
use crate::pairing::{self, PagePlan};
use crate::sequence::{self, SequenceError};
use crate::stitch::{self, StitchError};

/// Chapter-scoped error; one chapter's failure never halts its siblings.
#[derive(Debug, Error)]
pub enum ChapterError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Stitch(#[from] StitchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Progress callback for chapter processing
pub trait ProgressCallback: Send + Sync {
    /// Called when a chapter begins processing
    fn on_chapter_start(&self, index: usize, total: usize, path: &Path);
    /// Called when a processing step starts
    fn on_step_start(&self, step: &str);
    /// Called when a processing step completes
    fn on_step_complete(&self, step: &str, message: &str);
    /// Called when a chapter fails
    fn on_chapter_error(&self, path: &Path, message: &str);
    /// Called for debug/verbose messages
    fn on_debug(&self, message: &str);
}

/// No-op progress callback (silent mode)
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_chapter_start(&self, _index: usize, _total: usize, _path: &Path) {}
    fn on_step_start(&self, _step: &str) {}
    fn on_step_complete(&self, _step: &str, _message: &str) {}
    fn on_chapter_error(&self, _path: &Path, _message: &str) {}
    fn on_debug(&self, _message: &str) {}
}

/// Result of processing one chapter.
#[derive(Debug, Clone)]
pub struct ChapterOutcome {
    /// The input container
    pub chapter: PathBuf,
    /// The packed output container, or `None` for an empty chapter
    pub output: Option<PathBuf>,
    /// Pages found in the extracted chapter
    pub pages_in: usize,
    /// Pages in the packed output
    pub pages_out: usize,
    /// Merges performed
    pub merges: usize,
}

/// Removes the extraction directory when dropped, so cleanup runs on every
/// exit path of chapter processing.
struct ExtractionGuard {
    dir: PathBuf,
}

impl Drop for ExtractionGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

/// Assembles stitched chapters from input containers.
pub struct ChapterAssembler {
    title: Option<String>,
    series: Option<String>,
}

/// Marker segment appended to output container names, used to recognize
/// already-stitched files on later runs.
pub const OUTPUT_SUFFIX: &str = "stitched.cbz";

impl ChapterAssembler {
    pub fn new(title: Option<String>, series: Option<String>) -> Self {
        Self { title, series }
    }

    /// Output container path for a chapter: the input filename with the
    /// stitched marker in place of its extension.
    pub fn output_path(&self, chapter: &Path) -> PathBuf {
        chapter.with_extension(OUTPUT_SUFFIX)
    }

    /// Process a single chapter container into a packed stitched output.
    ///
    /// An empty chapter (zero page images after extraction) is a no-op
    /// success and produces no output container.
    pub fn process_chapter<P: ProgressCallback>(
        &self,
        chapter: &Path,
        ordinal: usize,
        progress: &P,
    ) -> Result<ChapterOutcome, ChapterError> {
        progress.on_step_start("Extracting");
        let extraction_dir = archive::extract_chapter(chapter)?;
        let _guard = ExtractionGuard {
            dir: extraction_dir.clone(),
        };

        let pages = sequence::load_page_sequence(&extraction_dir)?;
        progress.on_step_complete("Extracting", &format!("{} pages", pages.len()));

        if pages.is_empty() {
            progress.on_debug(&format!("{}: no pages, skipping", chapter.display()));
            return Ok(ChapterOutcome {
                chapter: chapter.to_path_buf(),
                output: None,
                pages_in: 0,
                pages_out: 0,
                merges: 0,
            });
        }

        progress.on_step_start("Stitching");
        let plan = pairing::plan_pairs(&pages);

        // Pairs write distinct files in this chapter's exclusive working
        // directory, so they can be stitched concurrently. Order is preserved
        // by collecting over the plan entries.
        let outputs = plan
            .entries
            .par_iter()
            .map(|entry| -> Result<OutputPage, StitchError> {
                match *entry {
                    PagePlan::Keep(i) => Ok(OutputPage {
                        path: pages[i].path.clone(),
                        kind: PageKind::Story,
                        width: pages[i].width,
                        height: pages[i].height,
                    }),
                    PagePlan::Stitch { leading, trailing } => {
                        let name =
                            stitch::stitched_page_name(ordinal, trailing, &pages[leading].extension);
                        let out_path = extraction_dir.join(name);
                        let stitched =
                            stitch::stitch_pair(&pages[leading], &pages[trailing], &out_path)?;
                        Ok(OutputPage {
                            path: stitched.path,
                            kind: PageKind::Story,
                            width: stitched.width,
                            height: stitched.height,
                        })
                    }
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        progress.on_step_complete("Stitching", &format!("{} merges", plan.merges()));

        progress.on_step_start("Packing");
        let metadata =
            ChapterMetadata::for_chapter(ordinal, self.title.as_deref(), self.series.as_deref());
        let bytes = archive::pack_cbz(&outputs, &metadata)?;

        let output_path = self.output_path(chapter);
        std::fs::write(&output_path, bytes)?;
        progress.on_step_complete("Packing", &format!("{}", output_path.display()));

        Ok(ChapterOutcome {
            chapter: chapter.to_path_buf(),
            output: Some(output_path),
            pages_in: pages.len(),
            pages_out: outputs.len(),
            merges: plan.merges(),
        })
    }
}
