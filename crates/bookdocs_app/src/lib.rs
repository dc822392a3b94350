//! Entry points shared by the `convert_html`, `scaffold_docs` and
//! `migrate_images` binaries.
pub mod config;

use anyhow::{bail, Context};
use bookdocs_engine::{convert_all, migrate_images, scaffold, SITE_PLACEHOLDERS};
use docs_logging::{docs_error, docs_info};
use log::LevelFilter;

pub use config::{AppConfig, ConfigError, OnError};

/// Load the config and start logging; every binary begins here.
pub fn bootstrap() -> anyhow::Result<AppConfig> {
    let config = AppConfig::load()?;
    docs_logging::initialize(config.log_destination(), LevelFilter::Info);
    Ok(config)
}

pub fn run_convert(config: &AppConfig) -> anyhow::Result<()> {
    let summary = convert_all(&config.convert_settings()).context("conversion aborted")?;
    if summary.has_failures() {
        for failed in &summary.failed {
            docs_error!("{:?}: {}", failed.source, failed.message);
        }
        bail!("{} file(s) failed to convert", summary.failed.len());
    }
    docs_info!("All {} document(s) converted", summary.converted.len());
    Ok(())
}

pub fn run_scaffold(config: &AppConfig) -> anyhow::Result<()> {
    let report = scaffold(&config.scaffold_root, SITE_PLACEHOLDERS)
        .context("failed to create placeholder pages")?;
    docs_info!(
        "All required files are present ({} new)",
        report.created.len()
    );
    Ok(())
}

pub fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    migrate_images(&config.asset_settings()).context("image migration aborted")?;
    Ok(())
}
