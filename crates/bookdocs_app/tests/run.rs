use std::fs;
use std::path::Path;

use bookdocs_app::{run_convert, run_migrate, run_scaffold, AppConfig, OnError};
use tempfile::TempDir;

fn config_in(root: &Path) -> AppConfig {
    AppConfig {
        content_dir: root.join("src/content"),
        chapters_dir: root.join("docs/chapters"),
        about_dir: Some(root.join("about")),
        about_output_dir: root.join("docs/about"),
        scaffold_root: root.join("docs"),
        image_sources: vec![root.join("imgs")],
        image_target: root.join("docs/assets/images"),
        docs_dir: root.join("docs"),
        ..AppConfig::default()
    }
}

#[test]
fn scaffold_convert_migrate_workflow() {
    docs_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let content = root.join("src/content");
    fs::create_dir_all(&content).unwrap();
    fs::write(
        content.join("chapter1.html"),
        r#"<p>See <img src="../imgs/fig.png" alt="Fig"></p><div class="note">Mind the LOH</div>"#,
    )
    .unwrap();
    fs::write(content.join("navbar.html"), "<a href=\"chapter1.html\">1</a>").unwrap();
    fs::create_dir_all(root.join("imgs")).unwrap();
    fs::write(root.join("imgs/fig.png"), b"png").unwrap();

    let config = config_in(root);
    run_scaffold(&config).unwrap();
    run_convert(&config).unwrap();
    run_migrate(&config).unwrap();

    let chapter = fs::read_to_string(root.join("docs/chapters/chapter-01/chapter1.md")).unwrap();
    assert!(chapter.starts_with("---\ntitle: Chapter1\n"));
    assert!(chapter.contains("!!! note\n    Mind the LOH"));
    assert!(chapter.contains("(/assets/images/fig.png)"), "unexpected chapter: {chapter:?}");
    assert!(root.join("docs/chapters/chapter-01/index.md").is_file());
    assert!(root.join("docs/assets/images/fig.png").is_file());
    assert!(!root.join("docs/navbar.md").exists());
}

#[test]
fn skipped_failures_still_fail_the_run() {
    docs_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let content = root.join("src/content");
    fs::create_dir_all(&content).unwrap();
    fs::write(content.join("chapter1.html"), "<p>One</p>").unwrap();
    fs::write(content.join("chapter2.html"), "<p>Two</p>").unwrap();
    fs::create_dir_all(root.join("docs/chapters")).unwrap();
    fs::write(root.join("docs/chapters/chapter-01"), "blocks the directory").unwrap();

    let config = AppConfig {
        on_error: OnError::Skip,
        ..config_in(root)
    };
    assert!(run_convert(&config).is_err());
    assert!(root.join("docs/chapters/chapter-02/chapter2.md").is_file());
}

#[test]
fn missing_content_dir_fails_convert() {
    docs_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    let err = run_convert(&config_in(temp.path())).unwrap_err();
    assert!(format!("{err:#}").contains("does not exist"));
}
