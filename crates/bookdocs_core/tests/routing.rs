use std::path::{Path, PathBuf};

use bookdocs_core::{chapter_dir_name, classify, DocumentKind, OutputLayout, Route};
use pretty_assertions::assert_eq;

fn layout() -> OutputLayout {
    OutputLayout::new("docs/chapters")
}

#[test]
fn chapter_numbers_are_zero_padded_to_two_digits() {
    assert_eq!(chapter_dir_name("3"), "chapter-03");
    assert_eq!(chapter_dir_name("12"), "chapter-12");
    assert_eq!(chapter_dir_name("105"), "chapter-105");
}

#[test]
fn chapter_sources_route_into_numbered_directory() {
    let route = layout().route("chapter3");
    assert_eq!(
        route,
        Route::Output {
            kind: DocumentKind::Chapter("3".to_string()),
            dir: PathBuf::from("docs/chapters/chapter-03"),
            file_name: "chapter3.md".to_string(),
        }
    );
    assert_eq!(
        route.path(),
        Some(PathBuf::from("docs/chapters/chapter-03/chapter3.md"))
    );
}

#[test]
fn every_chapter_number_lands_in_its_padded_directory() {
    let layout = layout();
    for n in 0..120u32 {
        let stem = format!("chapter{n}");
        let path = layout.route(&stem).path().expect("routed");
        let expected = Path::new("docs/chapters")
            .join(format!("chapter-{n:02}"))
            .join(format!("{stem}.md"));
        assert_eq!(path, expected);
    }
}

#[test]
fn leading_zeros_in_source_are_kept() {
    assert_eq!(classify("chapter03"), DocumentKind::Chapter("03".to_string()));
    assert_eq!(
        layout().route("chapter03").path(),
        Some(PathBuf::from("docs/chapters/chapter-03/chapter03.md"))
    );
    assert_eq!(
        layout().route("chapter007").path(),
        Some(PathBuf::from("docs/chapters/chapter-007/chapter007.md"))
    );
}

#[test]
fn numbers_beyond_machine_integers_still_route_as_chapters() {
    assert_eq!(
        layout().route("chapter99999999999").path(),
        Some(PathBuf::from(
            "docs/chapters/chapter-99999999999/chapter99999999999.md"
        ))
    );
}

#[test]
fn other_sources_land_in_parent_of_chapters_root() {
    for stem in ["index", "preface", "chapters", "my-chapter2"] {
        let path = layout().route(stem).path().expect("routed");
        assert_eq!(path, Path::new("docs").join(format!("{stem}.md")));
    }
}

#[test]
fn navigation_fragment_is_excluded() {
    assert_eq!(layout().route("navbar"), Route::Excluded);
    assert_eq!(Route::Excluded.path(), None);
}

#[test]
fn custom_exclusions_replace_default() {
    let layout = layout().with_excluded(["toc"]);
    assert_eq!(layout.route("toc"), Route::Excluded);
    assert!(layout.route("navbar").path().is_some());
}

#[test]
fn root_without_parent_keeps_pages_beside_chapters() {
    let layout = OutputLayout::new("/");
    assert_eq!(layout.pages_root(), Path::new("/"));
}

#[test]
fn explicit_pages_root_overrides_parent() {
    let layout = layout().with_pages_root("site");
    assert_eq!(
        layout.route("index").path(),
        Some(PathBuf::from("site/index.md"))
    );
}
