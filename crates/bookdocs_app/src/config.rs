//! Run configuration for the maintenance binaries.
//!
//! Read from `bookdocs.ron` in the working directory, or from the file named
//! by `BOOKDOCS_CONFIG`. Every field is optional; missing fields keep the
//! defaults, which match the site's historical directory layout.

use std::fs;
use std::path::{Path, PathBuf};

use bookdocs_core::{ErrorPolicy, OutputLayout};
use bookdocs_engine::{AssetSettings, ConvertSettings};
use docs_logging::LogDestination;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "bookdocs.ron";
pub const CONFIG_ENV: &str = "BOOKDOCS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path:?} named by BOOKDOCS_CONFIG does not exist")]
    Missing { path: PathBuf },
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OnError {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub content_dir: PathBuf,
    pub chapters_dir: PathBuf,
    /// Where non-chapter pages go; the parent of `chapters_dir` when unset.
    pub pages_dir: Option<PathBuf>,
    pub excluded_stems: Vec<String>,
    pub description: String,
    pub about_dir: Option<PathBuf>,
    pub about_output_dir: PathBuf,
    pub on_error: OnError,
    pub scaffold_root: PathBuf,
    pub image_sources: Vec<PathBuf>,
    pub image_target: PathBuf,
    pub image_prefix: String,
    pub docs_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    /// Set to `false` to log only into `log_file`.
    pub log_to_terminal: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let convert = ConvertSettings::default();
        let assets = AssetSettings::default();
        Self {
            content_dir: convert.content_dir,
            chapters_dir: convert.layout.chapters_root().to_path_buf(),
            pages_dir: None,
            excluded_stems: vec![bookdocs_core::NAVIGATION_STEM.to_string()],
            description: convert.description,
            about_dir: convert.about_dir,
            about_output_dir: convert.about_output_dir,
            on_error: OnError::Abort,
            scaffold_root: assets.docs_dir.clone(),
            image_sources: assets.sources,
            image_target: assets.target,
            image_prefix: assets.public_prefix,
            docs_dir: assets.docs_dir,
            log_file: None,
            log_to_terminal: true,
        }
    }
}

impl AppConfig {
    /// Load from `$BOOKDOCS_CONFIG`, else `./bookdocs.ron`, else defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.is_file() {
                    return Err(ConfigError::Missing { path });
                }
                Self::from_file(&path)
            }
            None => {
                let path = Path::new(CONFIG_FILENAME);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_ron_str(&text).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_ron_str(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|e| e.to_string())
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        match self.on_error {
            OnError::Abort => ErrorPolicy::FailFast,
            OnError::Skip => ErrorPolicy::Continue,
        }
    }

    /// Terminal output is kept when no log file is configured.
    pub fn log_destination(&self) -> LogDestination {
        match (&self.log_file, self.log_to_terminal) {
            (Some(path), true) => LogDestination::Both(path.clone()),
            (Some(path), false) => LogDestination::File(path.clone()),
            (None, _) => LogDestination::Terminal,
        }
    }

    pub fn output_layout(&self) -> OutputLayout {
        let layout = OutputLayout::new(&self.chapters_dir)
            .with_excluded(self.excluded_stems.iter().cloned());
        match &self.pages_dir {
            Some(pages) => layout.with_pages_root(pages),
            None => layout,
        }
    }

    pub fn convert_settings(&self) -> ConvertSettings {
        ConvertSettings {
            content_dir: self.content_dir.clone(),
            layout: self.output_layout(),
            about_dir: self.about_dir.clone(),
            about_output_dir: self.about_output_dir.clone(),
            description: self.description.clone(),
            policy: self.error_policy(),
        }
    }

    pub fn asset_settings(&self) -> AssetSettings {
        AssetSettings {
            sources: self.image_sources.clone(),
            target: self.image_target.clone(),
            docs_dir: self.docs_dir.clone(),
            public_prefix: self.image_prefix.clone(),
        }
    }
}
