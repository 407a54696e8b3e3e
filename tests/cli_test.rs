// ABOUTME: Tests for the openxml-pptx command-line interface
// ABOUTME: Runs the built binary against temporary images and checks the archives it writes

use image::{ImageBuffer, Rgb};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use zip::ZipArchive;

fn create_test_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let img = ImageBuffer::from_fn(8, 6, |_, _| Rgb([0u8, 128u8, 255u8]));
    img.save(&path).expect("Failed to save test image");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_openxml-pptx"))
        .args(args)
        .env_remove("PPTX_TEMPLATE_DIR")
        .env_remove("PPTX_SLIDE_LAYOUT")
        .output()
        .expect("Failed to run openxml-pptx")
}

fn slide_count(path: &Path) -> usize {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut presentation = String::new();
    archive
        .by_name("ppt/presentation.xml")
        .unwrap()
        .read_to_string(&mut presentation)
        .unwrap();
    presentation.matches("<p:sldId ").count()
}

#[test]
fn test_build_title_and_images() {
    let work = TempDir::new().unwrap();
    let first = create_test_png(work.path(), "first.png");
    let second = create_test_png(work.path(), "second.png");
    let output = work.path().join("deck");

    let result = run(&[
        "build",
        "-o",
        output.to_str().unwrap(),
        "--title",
        "Holiday",
        first.to_str().unwrap(),
        second.to_str().unwrap(),
    ]);

    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let saved = work.path().join("deck.pptx");
    assert!(saved.exists());
    assert_eq!(slide_count(&saved), 3);
    assert!(String::from_utf8_lossy(&result.stdout).contains("PPTX generated successfully"));
}

#[test]
fn test_build_from_input_dir() {
    let work = TempDir::new().unwrap();
    let images = work.path().join("images");
    std::fs::create_dir(&images).unwrap();
    create_test_png(&images, "b.png");
    create_test_png(&images, "a.png");
    std::fs::write(images.join("notes.txt"), "ignored").unwrap();
    let output = work.path().join("gallery.pptx");

    let result = run(&[
        "build",
        "-o",
        output.to_str().unwrap(),
        "--input-dir",
        images.to_str().unwrap(),
    ]);

    assert!(result.status.success());
    assert_eq!(slide_count(&output), 2);

    let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
    let mut slide = String::new();
    archive
        .by_name("ppt/slides/slide1.xml")
        .unwrap()
        .read_to_string(&mut slide)
        .unwrap();
    assert!(slide.contains(r#"name="a.png""#));
}

#[test]
fn test_build_with_nothing_fails() {
    let work = TempDir::new().unwrap();
    let output = work.path().join("nothing.pptx");

    let result = run(&["build", "-o", output.to_str().unwrap()]);

    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Nothing to build"));
    assert!(!output.exists());
}

#[test]
fn test_build_rejects_unsupported_image() {
    let work = TempDir::new().unwrap();
    let bitmap = work.path().join("scan.bmp");
    std::fs::write(&bitmap, b"BM").unwrap();
    let output = work.path().join("bad.pptx");

    let result = run(&[
        "build",
        "-o",
        output.to_str().unwrap(),
        bitmap.to_str().unwrap(),
    ]);

    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Unsupported image type"));
    assert!(!output.exists());
}

#[test]
fn test_build_with_missing_template() {
    let work = TempDir::new().unwrap();
    let output = work.path().join("deck.pptx");
    let missing = work.path().join("no-template");

    let result = run(&[
        "build",
        "-o",
        output.to_str().unwrap(),
        "--title",
        "Hi",
        "--template",
        missing.to_str().unwrap(),
    ]);

    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Template directory not found"));
}
