use std::path::{Path, PathBuf};

use docs_logging::docs_info;
use thiserror::Error;

use crate::persist::{write_document, PersistError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    /// Path relative to the docs root, `/`-separated.
    pub path: &'static str,
    pub content: &'static str,
}

macro_rules! placeholder {
    ($path:literal) => {
        Placeholder {
            path: $path,
            content: include_str!(concat!("../templates/", $path)),
        }
    };
}

/// Pages the translated site needs before any chapter has been converted.
pub const SITE_PLACEHOLDERS: &[Placeholder] = &[
    placeholder!("about/index.md"),
    placeholder!("about/authors.md"),
    placeholder!("about/technical-reviewer.md"),
    placeholder!("about/acknowledgments.md"),
    placeholder!("about/foreword.md"),
    placeholder!("about/introduction.md"),
    placeholder!("chapters/index.md"),
    placeholder!("chapters/chapter-01/index.md"),
    placeholder!("chapters/chapter-02/index.md"),
    placeholder!("chapters/chapter-03/index.md"),
    placeholder!("chapters/chapter-04/index.md"),
    placeholder!("appendix/glossary.md"),
    placeholder!("appendix/resources.md"),
    placeholder!("appendix/faq.md"),
];

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("failed to create {path:?}: {source}")]
    Write { path: PathBuf, source: PersistError },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub created: Vec<PathBuf>,
    pub existing: Vec<PathBuf>,
}

/// Write every placeholder under `root` that does not exist yet.
/// Existing files are never touched.
pub fn scaffold(
    root: &Path,
    placeholders: &[Placeholder],
) -> Result<ScaffoldReport, ScaffoldError> {
    let mut report = ScaffoldReport::default();
    for placeholder in placeholders {
        let path = placeholder
            .path
            .split('/')
            .fold(root.to_path_buf(), |acc, part| acc.join(part));

        if path.exists() {
            docs_info!("Already exists, left as is: {}", placeholder.path);
            report.existing.push(path);
            continue;
        }

        write_document(&path, placeholder.content).map_err(|e| ScaffoldError::Write {
            path: path.clone(),
            source: e,
        })?;
        docs_info!("Created {}", placeholder.path);
        report.created.push(path);
    }
    docs_info!(
        "Scaffold finished: {} created, {} already present",
        report.created.len(),
        report.existing.len()
    );
    Ok(report)
}
