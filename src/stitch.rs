//! Stitching module
//!
//! Composites an eligible page pair into a single taller image: the leading
//! page occupies the top band, the tail fragment the bottom band, with no
//! overlap, scaling or cropping.

use image::{imageops, DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::sequence::Page;

/// Stitching error types
#[derive(Debug, Error)]
pub enum StitchError {
    #[error("Failed to decode page image {path}: {message}")]
    ImageDecode { path: PathBuf, message: String },

    #[error("Failed to write stitched image {path}: {message}")]
    ImageWrite { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, StitchError>;

/// A newly created image produced by merging a page pair.
#[derive(Debug, Clone)]
pub struct StitchedPage {
    /// Output file in the chapter working directory
    pub path: PathBuf,
    /// Pixel width (the pair's common width)
    pub width: u32,
    /// Pixel height (sum of both input heights)
    pub height: u32,
}

/// Deterministic output file name for a stitched page.
///
/// Derived from the chapter ordinal and the tail page's position so sibling
/// outputs sort stably and never collide with input filenames.
pub fn stitched_page_name(chapter: usize, tail_index: usize, extension: &str) -> String {
    format!("stitched_{:04}_{:04}.{}", chapter, tail_index, extension)
}

fn decode(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| StitchError::ImageDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Merge an eligible pair into one image written to `out_path`.
///
/// The canvas uses the decoded leading page's color; the tail is composited
/// in that pixel format. Input files are left untouched — cleanup belongs to
/// the chapter assembler.
pub fn stitch_pair(leading: &Page, trailing: &Page, out_path: &Path) -> Result<StitchedPage> {
    let top = decode(&leading.path)?;
    let bottom = decode(&trailing.path)?;

    let (top_w, top_h) = top.dimensions();
    let (bottom_w, bottom_h) = bottom.dimensions();

    let width = top_w.max(bottom_w);
    let height = top_h + bottom_h;

    let mut canvas = DynamicImage::new(width, height, top.color());
    imageops::replace(&mut canvas, &top, 0, 0);
    imageops::replace(&mut canvas, &bottom, 0, i64::from(top_h));

    canvas.save(out_path).map_err(|e| StitchError::ImageWrite {
        path: out_path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(StitchedPage {
        path: out_path.to_path_buf(),
        width,
        height,
    })
}
