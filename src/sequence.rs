//! Page sequencing module
//!
//! Loads an extracted chapter directory as a strictly ordered sequence of
//! page records. Ordering is lexical on the file name so pairing is
//! deterministic regardless of filesystem enumeration order.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Page sequencing error types
#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("Extraction directory not readable: {path} ({message})")]
    DirectoryUnreadable { path: PathBuf, message: String },

    #[error("Failed to read image header of {path}: {message}")]
    ImageHeader { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, SequenceError>;

/// Image file extensions considered chapter pages.
const PAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// A single page image within a chapter, immutable once loaded.
///
/// The ordinal position is derived from the lexical sort order, not from the
/// image content. The color mode is an attribute of the decoded image and is
/// resolved at stitch time from the leading page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Position within the chapter (0-based, after sorting)
    pub index: usize,
    /// Image file on disk
    pub path: PathBuf,
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
    /// File extension without the leading dot (lowercased)
    pub extension: String,
}

fn page_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    PAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Load the ordered page sequence of an extracted chapter directory.
///
/// Non-image entries and subdirectories are ignored. An empty result is a
/// valid degenerate chapter that produces no output pages. Dimensions come
/// from the image header; a full decode happens only at stitch time.
pub fn load_page_sequence(dir: &Path) -> Result<Vec<Page>> {
    let entries = std::fs::read_dir(dir).map_err(|e| SequenceError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut files: Vec<(String, PathBuf, String)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SequenceError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(extension) = page_extension(&path) else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        files.push((name, path, extension));
    }

    // Lexical ordering on the file name keeps pairing reproducible.
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut pages = Vec::with_capacity(files.len());
    for (index, (_, path, extension)) in files.into_iter().enumerate() {
        let (width, height) =
            image::image_dimensions(&path).map_err(|e| SequenceError::ImageHeader {
                path: path.clone(),
                message: e.to_string(),
            })?;
        pages.push(Page {
            index,
            path,
            width,
            height,
            extension,
        });
    }

    Ok(pages)
}
