use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::achievements::default_achievements;
use crate::config::{get_config_path, Config};
use crate::scoring::ScoringRules;

/// The config written by `init`: default point values and achievements,
/// spelled out so they are easy to edit.
pub fn default_config() -> Config {
    Config {
        season_file: None,
        scoring: Some(ScoringRules::default()),
        achievements: Some(default_achievements()),
    }
}

/// Write the default config file and return where it went.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let yaml = serde_saphyr::to_string(&default_config())
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(config_path)
}
