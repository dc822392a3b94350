use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use docs_logging::{docs_debug, docs_info};
use regex::Regex;
use sha2::{Digest, Sha256};
use thiserror::Error;
use walkdir::WalkDir;

use crate::persist::{ensure_output_dir, write_document, AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to walk {path:?}: {source}")]
    Walk { path: PathBuf, source: walkdir::Error },
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: PersistError },
}

#[derive(Debug, Clone)]
pub struct AssetSettings {
    /// Old image directories; missing ones are skipped.
    pub sources: Vec<PathBuf>,
    pub target: PathBuf,
    /// Tree whose Markdown files get their image links rewritten.
    pub docs_dir: PathBuf,
    /// Site-absolute prefix the rewritten links point at.
    pub public_prefix: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            sources: vec![
                PathBuf::from("imgs"),
                PathBuf::from("src/imgs"),
                PathBuf::from("src/content/img"),
            ],
            target: PathBuf::from("docs/assets/images"),
            docs_dir: PathBuf::from("docs"),
            public_prefix: "/assets/images".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub copied: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub relinked: Vec<PathBuf>,
}

/// Copy images into the new asset tree, then point Markdown at it.
pub fn migrate_images(settings: &AssetSettings) -> Result<MigrationReport, AssetError> {
    ensure_output_dir(&settings.target).map_err(|e| AssetError::Write {
        path: settings.target.clone(),
        source: e,
    })?;

    let mut report = MigrationReport::default();
    for source in &settings.sources {
        if !source.is_dir() {
            docs_debug!("Image source {:?} not present, skipping", source);
            continue;
        }
        copy_tree(source, &settings.target, &mut report)?;
    }

    report.relinked = relink_markdown(&settings.docs_dir, &settings.public_prefix)?;
    docs_info!(
        "Image migration finished: {} copied, {} unchanged, {} pages relinked",
        report.copied.len(),
        report.unchanged.len(),
        report.relinked.len()
    );
    Ok(report)
}

fn copy_tree(source: &Path, target: &Path, report: &mut MigrationReport) -> Result<(), AssetError> {
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| AssetError::Walk {
            path: source.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let destination = target.join(relative);

        let bytes = read(entry.path())?;
        if destination.is_file() && digest(&read(&destination)?) == digest(&bytes) {
            docs_debug!("Unchanged {:?}", destination);
            report.unchanged.push(destination);
            continue;
        }

        let (writer, file_name) =
            AtomicFileWriter::for_path(&destination).map_err(|e| AssetError::Write {
                path: destination.clone(),
                source: e,
            })?;
        writer
            .write_bytes(&file_name, &bytes)
            .map_err(|e| AssetError::Write {
                path: destination.clone(),
                source: e,
            })?;
        docs_info!("Copied {:?} -> {:?}", entry.path(), destination);
        report.copied.push(destination);
    }
    Ok(())
}

fn relink_markdown(docs_dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, AssetError> {
    let mut relinked = Vec::new();
    if !docs_dir.is_dir() {
        return Ok(relinked);
    }
    for entry in WalkDir::new(docs_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| AssetError::Walk {
            path: docs_dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "md") {
            continue;
        }
        let content = fs::read_to_string(path).map_err(|e| AssetError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        if let Cow::Owned(updated) = rewrite_image_links(&content, prefix) {
            if updated == content {
                continue;
            }
            write_document(path, &updated).map_err(|e| AssetError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
            docs_info!("Updated image paths in {:?}", path);
            relinked.push(path.to_path_buf());
        }
    }
    Ok(relinked)
}

fn image_link() -> &'static Regex {
    static IMAGE_LINK: OnceLock<Regex> = OnceLock::new();
    IMAGE_LINK.get_or_init(|| {
        Regex::new(r"!\[([^\]]*)\]\((?:\.\./)*(?:src/)?imgs/([^)]+)\)").expect("valid regex")
    })
}

/// Point `![alt](../imgs/x.png)` and `![alt](src/imgs/x.png)` style links at
/// `{prefix}/x.png`. Returns `Cow::Borrowed` when nothing matched.
pub fn rewrite_image_links<'a>(markdown: &'a str, prefix: &str) -> Cow<'a, str> {
    let prefix = prefix.trim_end_matches('/');
    image_link().replace_all(markdown, |caps: &regex::Captures| {
        format!("![{}]({}/{})", &caps[1], prefix, &caps[2])
    })
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    fs::read(path).map_err(|e| AssetError::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

fn digest(bytes: &[u8]) -> Vec<u8> {
    Sha256::digest(bytes).to_vec()
}
