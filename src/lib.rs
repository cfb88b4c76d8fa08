//! manga-stitch - Batch stitcher for manga chapter archives
//!
//! Many manga releases ship the last page split in two: a full story page
//! followed by a short "tail" image carrying the scanlator's credits or
//! logo. This crate scans a directory of chapter containers, merges each
//! detected tail vertically onto its leading page, and repacks every chapter
//! as a CBZ container with ComicInfo metadata.
//!
//! # Features
//!
//! - **Archive gateway** ([`archive`]) - Extract CBZ/ZIP in-process and
//!   CBR/RAR via `unar`; pack page sequences back into CBZ bytes
//! - **Page sequencing** ([`sequence`]) - Deterministic, lexically ordered
//!   page records from an extracted chapter
//! - **Pairing engine** ([`pairing`]) - Fixed-stride geometric scan deciding
//!   which adjacent pages merge
//! - **Stitching** ([`stitch`]) - Vertical compositing of a page pair into
//!   one taller image
//! - **Chapter assembly** ([`assemble`]) - Orchestration with scoped cleanup
//!   of the extraction directory
//! - **Batch driving** ([`batch`]) - Chapter discovery, idempotent skip
//!   logic, per-chapter failure isolation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use manga_stitch::{ChapterAssembler, SilentProgress};
//! use std::path::Path;
//!
//! let assembler = ChapterAssembler::new(None, None);
//! let outcome = assembler
//!     .process_chapter(Path::new("chapters/ch1.cbz"), 0, &SilentProgress)
//!     .unwrap();
//! println!("{} pages out, {} merges", outcome.pages_out, outcome.merges);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! Chapter container -> Extraction -> Page sequence -> Pairing plan
//!                                                        |
//!                                       Stitching (eligible pairs)
//!                                                        |
//!                              ComicInfo metadata -> CBZ packing -> Cleanup
//! ```

pub mod archive;
pub mod assemble;
pub mod batch;
pub mod cli;
pub mod config;
pub mod metadata;
pub mod pairing;
pub mod sequence;
pub mod stitch;

// Re-exports for convenience
pub use archive::{extract_chapter, pack_cbz, ArchiveError, ChapterFormat};
pub use assemble::{
    ChapterAssembler, ChapterError, ChapterOutcome, ProgressCallback, SilentProgress,
    OUTPUT_SUFFIX,
};
pub use batch::{discover_chapters, is_already_stitched, run_batch, BatchSummary};
pub use cli::{banner, create_chapter_progress_bar, create_spinner, Cli, ExitCode};
pub use config::{Config, ConfigError, RunSettings};
pub use metadata::{ChapterMetadata, OutputPage, PageKind};
pub use pairing::{is_tail_pair, plan_pairs, PagePlan, PairingPlan};
pub use sequence::{load_page_sequence, Page, SequenceError};
pub use stitch::{stitch_pair, stitched_page_name, StitchError, StitchedPage};
