use std::fs;

use bookdocs_engine::{ensure_output_dir, write_document, AtomicFileWriter, WriteOutcome};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("docs").join("chapters");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let (first, outcome) = writer.write("chapter1.md", "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "chapter1.md");
    assert_eq!(outcome, WriteOutcome::Created);
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let (second, outcome) = writer.write("chapter1.md", "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(outcome, WriteOutcome::Replaced);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
}

#[test]
fn write_document_creates_intermediate_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("docs/chapters/chapter-07/chapter7.md");
    let outcome = write_document(&path, "body").unwrap();
    assert_eq!(outcome, WriteOutcome::Created);
    assert_eq!(fs::read_to_string(&path).unwrap(), "body");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("doc.md", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("doc.md").exists());
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "x");
}
