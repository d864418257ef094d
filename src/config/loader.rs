// Configuration loader
// Loads settings from a TOML file, then applies environment overrides

use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::Config;
use crate::errors::config_parse_error;

/// Overrides `[artifacts] dir`
pub const ARTIFACT_DIR_ENV: &str = "MATHSCORE_ARTIFACT_DIR";

/// Load configuration
///
/// An explicit path must exist. Otherwise `./mathscore.toml` and then
/// `~/.mathscore/config.toml` are tried, falling back to defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            load_config_from(path)?
        }
        None => match candidate_paths().into_iter().find(|p| p.exists()) {
            Some(path) => load_config_from(&path)?,
            None => {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Parse one TOML config file
pub fn load_config_from(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow!(config_parse_error(&path.display().to_string(), &e.to_string())))?;

    tracing::debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("mathscore.toml")];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".mathscore").join("config.toml"));
    }
    paths
}

fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(dir) = lookup(ARTIFACT_DIR_ENV).filter(|v| !v.is_empty()) {
        config.artifacts.dir = PathBuf::from(dir);
    }
}
