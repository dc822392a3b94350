use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bookdocs_core::{ErrorPolicy, OutputLayout};
use docs_logging::{docs_debug, docs_error, docs_info};
use thiserror::Error;

use crate::convert::{Converter, Html2MdConverter};
use crate::decode::{decode_source, DecodeError};
use crate::frontmatter::{build_chapter_document, DEFAULT_DESCRIPTION};
use crate::persist::{write_document, PersistError, WriteOutcome};
use crate::rewrite::PatternRewriter;

const SOURCE_EXTENSION: &str = "html";
const PAGE_EXTENSION: &str = "md";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input directory {0:?} does not exist")]
    MissingInput(PathBuf),
    #[error("failed to list {path:?}: {source}")]
    List { path: PathBuf, source: io::Error },
    #[error("{0:?} has no usable file stem")]
    NoStem(PathBuf),
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to decode {path:?}: {source}")]
    Decode { path: PathBuf, source: DecodeError },
    #[error("failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: PersistError },
}

#[derive(Debug, Clone)]
pub struct ConvertSettings {
    pub content_dir: PathBuf,
    pub layout: OutputLayout,
    /// Hand-written Markdown pages copied verbatim next to the converted ones.
    pub about_dir: Option<PathBuf>,
    pub about_output_dir: PathBuf,
    pub description: String,
    pub policy: ErrorPolicy,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("src/content"),
            layout: OutputLayout::new("docs/chapters"),
            about_dir: Some(PathBuf::from("about")),
            about_output_dir: PathBuf::from("docs/about"),
            description: DEFAULT_DESCRIPTION.to_string(),
            policy: ErrorPolicy::FailFast,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Converted {
        source: PathBuf,
        destination: PathBuf,
        write: WriteOutcome,
    },
    Excluded {
        source: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub source: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub converted: Vec<(PathBuf, PathBuf)>,
    pub excluded: Vec<PathBuf>,
    pub copied: Vec<(PathBuf, PathBuf)>,
    pub failed: Vec<FailedFile>,
}

impl ConversionSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Rewrite -> convert -> front matter -> route, one source file at a time.
pub struct ChapterPipeline<C = Html2MdConverter> {
    converter: C,
    rewriter: PatternRewriter,
    layout: OutputLayout,
    description: String,
}

impl ChapterPipeline<Html2MdConverter> {
    pub fn new(layout: OutputLayout, description: impl Into<String>) -> Self {
        Self::with_converter(Html2MdConverter, layout, description)
    }
}

impl<C: Converter> ChapterPipeline<C> {
    pub fn with_converter(
        converter: C,
        layout: OutputLayout,
        description: impl Into<String>,
    ) -> Self {
        Self {
            converter,
            rewriter: PatternRewriter::new(),
            layout,
            description: description.into(),
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Full document text for one source, without touching the filesystem.
    pub fn render(&self, stem: &str, html: &str) -> String {
        let rewritten = self.rewriter.rewrite(html);
        let markdown = self.converter.to_markdown(&rewritten.html);
        let body = rewritten.finish(&markdown, &self.converter);
        build_chapter_document(stem, &body, &self.description)
    }

    pub fn convert_file(&self, source: &Path) -> Result<FileOutcome, PipelineError> {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PipelineError::NoStem(source.to_path_buf()))?;

        let destination = match self.layout.route(stem).path() {
            Some(path) => path,
            None => {
                docs_debug!("Skipping reserved source {:?}", source);
                return Ok(FileOutcome::Excluded {
                    source: source.to_path_buf(),
                });
            }
        };

        let bytes = fs::read(source).map_err(|e| PipelineError::Read {
            path: source.to_path_buf(),
            source: e,
        })?;
        let decoded = decode_source(&bytes).map_err(|e| PipelineError::Decode {
            path: source.to_path_buf(),
            source: e,
        })?;
        let document = self.render(stem, &decoded.html);

        let write = write_document(&destination, &document).map_err(|e| PipelineError::Write {
            path: destination.clone(),
            source: e,
        })?;
        docs_info!("Converted {:?} -> {:?}", source, destination);

        Ok(FileOutcome::Converted {
            source: source.to_path_buf(),
            destination,
            write,
        })
    }
}

/// Convert every `*.html` in the content directory, then copy the about pages.
pub fn convert_all(settings: &ConvertSettings) -> Result<ConversionSummary, PipelineError> {
    let pipeline = ChapterPipeline::new(settings.layout.clone(), settings.description.clone());
    run_conversion(&pipeline, settings)
}

pub fn run_conversion<C: Converter>(
    pipeline: &ChapterPipeline<C>,
    settings: &ConvertSettings,
) -> Result<ConversionSummary, PipelineError> {
    if !settings.content_dir.is_dir() {
        return Err(PipelineError::MissingInput(settings.content_dir.clone()));
    }

    let mut summary = ConversionSummary::default();
    for source in list_files(&settings.content_dir, SOURCE_EXTENSION)? {
        let result = pipeline.convert_file(&source);
        match settle(settings.policy, &source, result, &mut summary)? {
            Some(FileOutcome::Converted {
                source,
                destination,
                ..
            }) => summary.converted.push((source, destination)),
            Some(FileOutcome::Excluded { source }) => summary.excluded.push(source),
            None => {}
        }
    }

    match &settings.about_dir {
        Some(about_dir) if about_dir.is_dir() => {
            copy_pages(about_dir, &settings.about_output_dir, settings.policy, &mut summary)?;
        }
        Some(about_dir) => docs_info!("No about pages at {:?}; nothing to copy", about_dir),
        None => {}
    }

    docs_info!(
        "Conversion finished: {} converted, {} copied, {} skipped, {} failed",
        summary.converted.len(),
        summary.copied.len(),
        summary.excluded.len(),
        summary.failed.len()
    );
    Ok(summary)
}

fn copy_pages(
    from: &Path,
    to: &Path,
    policy: ErrorPolicy,
    summary: &mut ConversionSummary,
) -> Result<(), PipelineError> {
    for source in list_files(from, PAGE_EXTENSION)? {
        let result = copy_page(&source, to);
        if let Some(destination) = settle(policy, &source, result, summary)? {
            docs_info!("Copied {:?} -> {:?}", source, destination);
            summary.copied.push((source, destination));
        }
    }
    Ok(())
}

fn copy_page(source: &Path, to_dir: &Path) -> Result<PathBuf, PipelineError> {
    let content = fs::read_to_string(source).map_err(|e| PipelineError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;
    let destination = match source.file_name() {
        Some(name) => to_dir.join(name),
        None => return Err(PipelineError::NoStem(source.to_path_buf())),
    };
    write_document(&destination, &content).map_err(|e| PipelineError::Write {
        path: destination.clone(),
        source: e,
    })?;
    Ok(destination)
}

/// Apply the error policy to one file's result.
fn settle<T>(
    policy: ErrorPolicy,
    source: &Path,
    result: Result<T, PipelineError>,
    summary: &mut ConversionSummary,
) -> Result<Option<T>, PipelineError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if policy.is_fail_fast() => Err(err),
        Err(err) => {
            docs_error!("Failed to process {:?}: {}", source, err);
            summary.failed.push(FailedFile {
                source: source.to_path_buf(),
                message: err.to_string(),
            });
            Ok(None)
        }
    }
}

/// Regular files in `dir` (not recursive) with the given extension, by name.
fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, PipelineError> {
    let list_err = |e: io::Error| PipelineError::List {
        path: dir.to_path_buf(),
        source: e,
    };
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(list_err)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some(extension))
        .collect();
    files.sort();
    Ok(files)
}
