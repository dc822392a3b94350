use std::path::{Path, PathBuf};

use crate::document::{classify, DocumentKind, NAVIGATION_STEM};

/// Directory name for a chapter: the digits left-padded with zeros to at
/// least two characters, `3` -> `chapter-03`, `007` -> `chapter-007`.
pub fn chapter_dir_name(digits: &str) -> String {
    format!("chapter-{digits:0>2}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Reserved stem; no output is produced.
    Excluded,
    Output {
        kind: DocumentKind,
        dir: PathBuf,
        file_name: String,
    },
}

impl Route {
    /// Full destination path, `None` for excluded stems.
    pub fn path(&self) -> Option<PathBuf> {
        match self {
            Route::Excluded => None,
            Route::Output { dir, file_name, .. } => Some(dir.join(file_name)),
        }
    }
}

/// Where converted documents land.
///
/// Chapters go to `<chapters_root>/chapter-NN/`, everything else goes flat
/// into `pages_root`, which defaults to the parent of `chapters_root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    chapters_root: PathBuf,
    pages_root: PathBuf,
    excluded: Vec<String>,
}

impl OutputLayout {
    pub fn new(chapters_root: impl Into<PathBuf>) -> Self {
        let chapters_root = chapters_root.into();
        let pages_root = chapters_root
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| chapters_root.clone());
        Self {
            chapters_root,
            pages_root,
            excluded: vec![NAVIGATION_STEM.to_string()],
        }
    }

    pub fn with_pages_root(mut self, pages_root: impl Into<PathBuf>) -> Self {
        self.pages_root = pages_root.into();
        self
    }

    pub fn with_excluded<I, S>(mut self, stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = stems.into_iter().map(Into::into).collect();
        self
    }

    pub fn chapters_root(&self) -> &Path {
        &self.chapters_root
    }

    pub fn pages_root(&self) -> &Path {
        &self.pages_root
    }

    pub fn is_excluded(&self, stem: &str) -> bool {
        self.excluded.iter().any(|e| e == stem)
    }

    pub fn directory_for(&self, kind: &DocumentKind) -> PathBuf {
        match kind {
            DocumentKind::Chapter(digits) => self.chapters_root.join(chapter_dir_name(digits)),
            DocumentKind::Other => self.pages_root.clone(),
        }
    }

    pub fn route(&self, stem: &str) -> Route {
        if self.is_excluded(stem) {
            return Route::Excluded;
        }
        let kind = classify(stem);
        Route::Output {
            dir: self.directory_for(&kind),
            kind,
            file_name: format!("{stem}.md"),
        }
    }
}
