//! End-to-end pipeline tests on synthetic chapter archives
//!
//! Builds real CBZ containers from generated bitmaps, runs them through the
//! chapter assembler and batch driver, and verifies the packed output down
//! to the pixel level.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use manga_stitch::{
    discover_chapters, run_batch, ChapterAssembler, SilentProgress,
};

fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let mut img = RgbImage::new(width, height);
    for pixel in img.pixels_mut() {
        *pixel = Rgb(color);
    }
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn make_chapter(path: &Path, pages: &[(u32, u32, [u8; 3])]) {
    let mut zip = ZipWriter::new(std::fs::File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for (i, &(w, h, color)) in pages.iter().enumerate() {
        zip.start_file(format!("{:02}.png", i + 1), options).unwrap();
        zip.write_all(&png_bytes(w, h, color)).unwrap();
    }
    zip.finish().unwrap();
}

fn open_output(path: &Path) -> ZipArchive<Cursor<Vec<u8>>> {
    let bytes = std::fs::read(path).unwrap();
    ZipArchive::new(Cursor::new(bytes)).unwrap()
}

fn entry_image(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> RgbImage {
    let mut bytes = Vec::new();
    archive.by_name(name).unwrap().read_to_end(&mut bytes).unwrap();
    image::load_from_memory(&bytes).unwrap().to_rgb8()
}

const RED: [u8; 3] = [255, 0, 0];
const BLUE: [u8; 3] = [0, 0, 255];
const GREEN: [u8; 3] = [0, 255, 0];
const YELLOW: [u8; 3] = [255, 255, 0];

#[test]
fn test_four_page_reference_chapter() {
    let dir = TempDir::new().unwrap();
    let chapter = dir.path().join("ch1.cbz");
    make_chapter(
        &chapter,
        &[
            (100, 150, RED),
            (100, 50, BLUE),
            (100, 150, GREEN),
            (100, 150, YELLOW),
        ],
    );

    let assembler = ChapterAssembler::new(None, None);
    let outcome = assembler
        .process_chapter(&chapter, 0, &SilentProgress)
        .unwrap();

    assert_eq!(outcome.pages_in, 4);
    assert_eq!(outcome.merges, 1);
    assert_eq!(outcome.pages_out, 3);

    let mut archive = open_output(&outcome.output.unwrap());
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, ["ComicInfo.xml", "P0000.png", "P0001.png", "P0002.png"]);

    // First page is the merged 100x200 image: red band over blue band.
    let merged = entry_image(&mut archive, "P0000.png");
    assert_eq!(merged.dimensions(), (100, 200));
    assert_eq!(merged.get_pixel(50, 0), &Rgb(RED));
    assert_eq!(merged.get_pixel(50, 149), &Rgb(RED));
    assert_eq!(merged.get_pixel(50, 150), &Rgb(BLUE));
    assert_eq!(merged.get_pixel(50, 199), &Rgb(BLUE));

    // Remaining pages pass through in reading order.
    let second = entry_image(&mut archive, "P0001.png");
    assert_eq!(second.dimensions(), (100, 150));
    assert_eq!(second.get_pixel(0, 0), &Rgb(GREEN));
    let third = entry_image(&mut archive, "P0002.png");
    assert_eq!(third.get_pixel(0, 0), &Rgb(YELLOW));
}

#[test]
fn test_comic_info_metadata_in_output() {
    let dir = TempDir::new().unwrap();
    let chapter = dir.path().join("ch7.cbz");
    make_chapter(&chapter, &[(100, 150, RED), (100, 50, BLUE)]);

    let assembler = ChapterAssembler::new(None, None);
    let outcome = assembler
        .process_chapter(&chapter, 6, &SilentProgress)
        .unwrap();

    let mut archive = open_output(&outcome.output.unwrap());
    let mut xml = String::new();
    archive
        .by_name("ComicInfo.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();

    assert!(xml.contains("<Title>Stitched Manga Chapter 7</Title>"));
    assert!(xml.contains("<Series></Series>") || xml.contains("<Series/>"));
    assert!(xml.contains("<Number>1</Number>"));
    assert!(xml.contains("<LanguageISO>en</LanguageISO>"));
    assert!(xml.contains("<Format>Web Comic</Format>"));
    assert!(xml.contains("<BlackAndWhite>Yes</BlackAndWhite>"));
    assert!(xml.contains("<Manga>Yes</Manga>"));
    assert!(xml.contains("<AgeRating>Adults Only 18+</AgeRating>"));
    assert!(xml.contains("<PageCount>1</PageCount>"));
    assert!(xml.contains("Type=\"Story\""));
}

#[test]
fn test_odd_length_chapter_keeps_final_page() {
    let dir = TempDir::new().unwrap();
    let chapter = dir.path().join("ch1.cbz");
    make_chapter(
        &chapter,
        &[
            (100, 150, RED),
            (100, 50, BLUE),
            (100, 150, GREEN),
            (100, 150, YELLOW),
            (100, 10, [9, 9, 9]), // would be a tail, but has no partner
        ],
    );

    let assembler = ChapterAssembler::new(None, None);
    let outcome = assembler
        .process_chapter(&chapter, 0, &SilentProgress)
        .unwrap();

    assert_eq!(outcome.pages_in, 5);
    assert_eq!(outcome.merges, 1);
    assert_eq!(outcome.pages_out, 4);

    let mut archive = open_output(&outcome.output.unwrap());
    let last = entry_image(&mut archive, "P0003.png");
    assert_eq!(last.dimensions(), (100, 10));
}

#[test]
fn test_fixed_stride_chapter_with_no_eligible_pairs() {
    // (P0,P1) and (P2,P3) are ineligible while (P1,P2) would be eligible;
    // the fixed-stride scan must leave everything untouched.
    let dir = TempDir::new().unwrap();
    let chapter = dir.path().join("ch1.cbz");
    make_chapter(
        &chapter,
        &[
            (100, 150, RED),
            (100, 150, BLUE),
            (100, 50, GREEN),
            (100, 50, YELLOW),
        ],
    );

    let assembler = ChapterAssembler::new(None, None);
    let outcome = assembler
        .process_chapter(&chapter, 0, &SilentProgress)
        .unwrap();

    assert_eq!(outcome.merges, 0);
    assert_eq!(outcome.pages_out, 4);
}

#[test]
fn test_batch_run_over_mixed_directory() {
    let dir = TempDir::new().unwrap();
    make_chapter(
        &dir.path().join("ch1.cbz"),
        &[(100, 150, RED), (100, 50, BLUE)],
    );
    make_chapter(&dir.path().join("ch2.zip"), &[(100, 150, GREEN)]);
    std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

    let assembler = ChapterAssembler::new(None, None);
    let chapters = discover_chapters(dir.path(), false).unwrap();
    assert_eq!(chapters.len(), 2);

    let summary = run_batch(&chapters, &assembler, &SilentProgress);
    assert_eq!(summary.stitched, 2);
    assert_eq!(summary.failed, 0);

    assert!(dir.path().join("ch1.stitched.cbz").exists());
    assert!(dir.path().join("ch2.stitched.cbz").exists());
    // Working directories are gone
    assert!(!dir.path().join("ch1").exists());
    assert!(!dir.path().join("ch2").exists());
}

#[test]
fn test_surviving_pages_keep_relative_order() {
    let dir = TempDir::new().unwrap();
    let chapter = dir.path().join("ch1.cbz");
    // Two merges with distinct colors; survivors must appear in reading order.
    make_chapter(
        &chapter,
        &[
            (100, 150, RED),
            (100, 50, BLUE),
            (200, 80, GREEN), // widths differ from next: kept
            (100, 80, YELLOW),
            (100, 150, [1, 1, 1]),
            (100, 40, [2, 2, 2]),
        ],
    );

    let assembler = ChapterAssembler::new(None, None);
    let outcome = assembler
        .process_chapter(&chapter, 0, &SilentProgress)
        .unwrap();

    assert_eq!(outcome.merges, 2);
    assert_eq!(outcome.pages_out, 4);

    let mut archive = open_output(&outcome.output.unwrap());
    // P0000: red+blue merge; P0001: green; P0002: yellow; P0003: merge
    assert_eq!(entry_image(&mut archive, "P0000.png").get_pixel(0, 0), &Rgb(RED));
    assert_eq!(entry_image(&mut archive, "P0001.png").get_pixel(0, 0), &Rgb(GREEN));
    assert_eq!(entry_image(&mut archive, "P0002.png").get_pixel(0, 0), &Rgb(YELLOW));
    let last = entry_image(&mut archive, "P0003.png");
    assert_eq!(last.dimensions(), (100, 190));
}
