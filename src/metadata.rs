//! Chapter metadata module
//!
//! Provides the metadata record attached to each packed chapter and its
//! ComicInfo.xml rendering.

use serde::Serialize;
use std::path::PathBuf;

/// Fixed metadata policy for packed chapters.
///
/// Everything except title and series is fixed: stitched chapters are packed
/// as chapter 1 of an English web comic, black-and-white, manga, adults-only.
pub const CHAPTER_NUMBER: u32 = 1;
pub const LANGUAGE_ISO: &str = "en";
pub const FORMAT: &str = "Web Comic";
pub const AGE_RATING: &str = "Adults Only 18+";

/// Logical page type recorded in the packed container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Regular story content (every stitched and passthrough page).
    Story,
    /// Cover page.
    FrontCover,
}

impl PageKind {
    /// ComicInfo `Type` attribute value
    pub fn as_comic_info_type(self) -> &'static str {
        match self {
            PageKind::Story => "Story",
            PageKind::FrontCover => "FrontCover",
        }
    }
}

/// One page of the final chapter content, in reading order.
#[derive(Debug, Clone)]
pub struct OutputPage {
    /// Image file to pack
    pub path: PathBuf,
    /// Logical type tag
    pub kind: PageKind,
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
}

/// Metadata attached once per chapter at assembly time.
#[derive(Debug, Clone)]
pub struct ChapterMetadata {
    pub title: String,
    pub series: String,
}

impl ChapterMetadata {
    /// Build chapter metadata from the chapter ordinal and optional overrides.
    ///
    /// The default title is derived from the 1-based chapter number; the
    /// default series is empty.
    pub fn for_chapter(ordinal: usize, title: Option<&str>, series: Option<&str>) -> Self {
        Self {
            title: title
                .map(str::to_string)
                .unwrap_or_else(|| format!("Stitched Manga Chapter {}", ordinal + 1)),
            series: series.unwrap_or("").to_string(),
        }
    }

    /// Render the ComicInfo.xml document for this chapter.
    pub fn to_comic_info_xml(&self, pages: &[OutputPage]) -> Result<String, quick_xml::DeError> {
        let doc = ComicInfoDoc {
            title: &self.title,
            series: &self.series,
            number: CHAPTER_NUMBER,
            language_iso: LANGUAGE_ISO,
            format: FORMAT,
            black_and_white: "Yes",
            manga: "Yes",
            age_rating: AGE_RATING,
            page_count: pages.len(),
            pages: PagesElement {
                page: pages
                    .iter()
                    .enumerate()
                    .map(|(index, page)| PageElement {
                        image: index,
                        kind: page.kind.as_comic_info_type(),
                        image_width: page.width,
                        image_height: page.height,
                    })
                    .collect(),
            },
        };

        let body = quick_xml::se::to_string(&doc)?;
        Ok(format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n{}", body))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename = "ComicInfo")]
struct ComicInfoDoc<'a> {
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Series")]
    series: &'a str,
    #[serde(rename = "Number")]
    number: u32,
    #[serde(rename = "LanguageISO")]
    language_iso: &'a str,
    #[serde(rename = "Format")]
    format: &'a str,
    #[serde(rename = "BlackAndWhite")]
    black_and_white: &'a str,
    #[serde(rename = "Manga")]
    manga: &'a str,
    #[serde(rename = "AgeRating")]
    age_rating: &'a str,
    #[serde(rename = "PageCount")]
    page_count: usize,
    #[serde(rename = "Pages")]
    pages: PagesElement,
}

#[derive(Debug, Serialize)]
struct PagesElement {
    #[serde(rename = "Page")]
    page: Vec<PageElement>,
}

#[derive(Debug, Serialize)]
struct PageElement {
    #[serde(rename = "@Image")]
    image: usize,
    #[serde(rename = "@Type")]
    kind: &'static str,
    #[serde(rename = "@ImageWidth")]
    image_width: u32,
    #[serde(rename = "@ImageHeight")]
    image_height: u32,
}
