//! Configuration module for WhereAmI-RS
//!
//! Handles loading and validating settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Candidate settings locations, in lookup order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/whereami/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("whereami-rs/settings.yml"));
    }
    paths
}

/// Load settings from an explicit path, `WHEREAMI_SETTINGS_PATH`, the
/// default locations, or fall back to defaults. Environment overrides
/// are applied last.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "settings file not found: {}",
                path.display()
            ));
        }
        candidates.push(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("WHEREAMI_SETTINGS_PATH") {
        candidates.push(PathBuf::from(path));
    }
    candidates.extend(default_paths());

    let mut settings = match candidates.iter().find(|p| p.exists()) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}
