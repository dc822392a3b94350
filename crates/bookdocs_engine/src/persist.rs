use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory {path:?} missing or not writable: {message}")]
    OutputDir { path: PathBuf, message: String },
    #[error("destination {0:?} has no file name")]
    NoFileName(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Replaced,
}

/// Ensure `dir` exists as a directory, creating intermediate directories.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let fail = |message: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        message,
    };
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| fail(e.to_string()))?;
        if !meta.is_dir() {
            return Err(fail("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| fail(e.to_string()))?;
    }
    Ok(())
}

/// Writes `{dir}/{file_name}` through a temp file in the same directory and a
/// rename, so a failed write never leaves a truncated document behind.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Writer for the parent directory of `path`.
    pub fn for_path(path: &Path) -> Result<(Self, String), PersistError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| PersistError::NoFileName(path.to_path_buf()))?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok((Self::new(dir), file_name))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(
        &self,
        file_name: &str,
        content: &str,
    ) -> Result<(PathBuf, WriteOutcome), PersistError> {
        self.write_bytes(file_name, content.as_bytes())
    }

    pub fn write_bytes(
        &self,
        file_name: &str,
        content: &[u8],
    ) -> Result<(PathBuf, WriteOutcome), PersistError> {
        let dir = if self.dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            self.dir.as_path()
        };
        ensure_output_dir(dir)?;

        let target = self.dir.join(file_name);
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        let outcome = if target.exists() {
            fs::remove_file(&target)?;
            WriteOutcome::Replaced
        } else {
            WriteOutcome::Created
        };
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok((target, outcome))
    }
}

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_document(path: &Path, content: &str) -> Result<WriteOutcome, PersistError> {
    let (writer, file_name) = AtomicFileWriter::for_path(path)?;
    writer.write(&file_name, content).map(|(_, outcome)| outcome)
}
