//! Archive gateway module
//!
//! Unpacks chapter containers into a working directory and repacks a page
//! sequence plus metadata into CBZ bytes. Format selection is by file
//! extension only — no content sniffing. ZIP-family containers are handled
//! in-process; RAR-family containers shell out to the `unar` tool.

use std::fs::File;
use std::io::{BufReader, Cursor, Write};
use std::path::{Component, Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::metadata::{ChapterMetadata, OutputPage};

/// Archive gateway error types
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Unsupported chapter format: {0} (expected .cbz/.zip/.cbr/.rar)")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to extract {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    #[error("External tool error: {0}")]
    ExternalTool(String),

    #[error("Failed to pack chapter: {0}")]
    Packing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// The two supported container families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterFormat {
    /// `.cbz` / `.zip`
    Zip,
    /// `.cbr` / `.rar`
    Rar,
}

impl ChapterFormat {
    /// Detect the container family from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("cbz") || ext.eq_ignore_ascii_case("zip") {
            Some(ChapterFormat::Zip)
        } else if ext.eq_ignore_ascii_case("cbr") || ext.eq_ignore_ascii_case("rar") {
            Some(ChapterFormat::Rar)
        } else {
            None
        }
    }
}

/// Strip parent references, current-dir references and absolute prefixes from
/// an archive entry name. Malicious archives can carry entries like
/// `../../etc/passwd`; only normal components survive.
fn sanitize_entry_path(name: &str) -> Option<PathBuf> {
    let mut sanitized = PathBuf::new();
    for component in Path::new(name).components() {
        if let Component::Normal(part) = component {
            sanitized.push(part);
        }
    }
    (!sanitized.as_os_str().is_empty()).then_some(sanitized)
}

/// Unpack a chapter container to a sibling directory named after the file
/// stem. Returns the extraction directory.
pub fn extract_chapter(path: &Path) -> Result<PathBuf> {
    let format =
        ChapterFormat::from_path(path).ok_or_else(|| ArchiveError::UnsupportedFormat(path.to_path_buf()))?;

    let extraction_dir = path.with_extension("");
    std::fs::create_dir_all(&extraction_dir)?;

    match format {
        ChapterFormat::Zip => extract_zip(path, &extraction_dir),
        ChapterFormat::Rar => extract_rar(path, &extraction_dir),
    }?;

    Ok(extraction_dir)
}

fn extract_zip(path: &Path, target: &Path) -> Result<()> {
    let extraction_error = |message: String| ArchiveError::Extraction {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| extraction_error(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| extraction_error(e.to_string()))?;
        if entry.is_dir() {
            continue;
        }
        if entry.encrypted() {
            return Err(extraction_error("archive is password-protected".to_string()));
        }

        let Some(entry_path) = sanitize_entry_path(entry.name()) else {
            continue;
        };
        let out_path = target.join(entry_path);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out_file = File::create(&out_path)?;
        std::io::copy(&mut entry, &mut out_file)?;
    }

    Ok(())
}

fn extract_rar(path: &Path, target: &Path) -> Result<()> {
    if which::which("unar").is_err() {
        return Err(ArchiveError::ExternalTool(
            "unar not found; CBR/RAR chapters require the unar tool".to_string(),
        ));
    }

    // -D: no extra subdirectory, -f: overwrite existing files
    let output = Command::new("unar")
        .arg("-o")
        .arg(target)
        .arg("-D")
        .arg("-f")
        .arg(path)
        .output()?;

    if !output.status.success() {
        return Err(ArchiveError::Extraction {
            path: path.to_path_buf(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Pack an ordered page sequence plus chapter metadata into CBZ bytes.
///
/// The container holds one ComicInfo.xml entry followed by the page images in
/// reading order, renamed to zero-padded entry names so any reader sorts them
/// identically. Page images are stored uncompressed.
pub fn pack_cbz(pages: &[OutputPage], metadata: &ChapterMetadata) -> Result<Vec<u8>> {
    let packing_error = |message: String| ArchiveError::Packing(message);

    let xml = metadata
        .to_comic_info_xml(pages)
        .map_err(|e| packing_error(format!("ComicInfo serialization failed: {}", e)))?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    writer
        .start_file("ComicInfo.xml", SimpleFileOptions::default())
        .map_err(|e| packing_error(e.to_string()))?;
    writer.write_all(xml.as_bytes()).map_err(|e| packing_error(e.to_string()))?;

    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (index, page) in pages.iter().enumerate() {
        let extension = page
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg");
        let bytes = std::fs::read(&page.path)
            .map_err(|e| packing_error(format!("cannot read page {}: {}", page.path.display(), e)))?;

        writer
            .start_file(format!("P{:04}.{}", index, extension), stored)
            .map_err(|e| packing_error(e.to_string()))?;
        writer.write_all(&bytes).map_err(|e| packing_error(e.to_string()))?;
    }

    let cursor = writer.finish().map_err(|e| packing_error(e.to_string()))?;
    Ok(cursor.into_inner())
}
