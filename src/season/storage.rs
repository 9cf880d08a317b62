use super::types::{SeasonState, SEASON_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default season file path (~/.config/vega-score/season.json)
pub fn get_season_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("season.json"))
}

/// Load the season from a JSON file
///
/// If the file doesn't exist, returns a new empty season.
/// If the file exists but has an unsupported version, or holds a blank name
/// pick, returns an error.
pub fn load_season(path: &Path) -> Result<SeasonState> {
    if !path.exists() {
        return Ok(SeasonState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open season file at {}", path.display()))?;

    let state: SeasonState = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load season from {}", path.display()))?;

    if state.version != SEASON_VERSION {
        anyhow::bail!("Unsupported season file version: {}", state.version);
    }

    for prediction in &state.predictions {
        prediction.forecast.check_picks().with_context(|| {
            format!(
                "Invalid prediction by '{}' for '{}' in {}",
                prediction.participant_id,
                prediction.predictable_id,
                path.display()
            )
        })?;
    }
    for predictable in &state.predictables {
        if let Some(ref outcome) = predictable.outcome {
            outcome.check_picks().with_context(|| {
                format!("Invalid outcome for '{}' in {}", predictable.id, path.display())
            })?;
        }
    }

    Ok(state)
}

/// Save the season to a JSON file atomically
///
/// The file is never left half-written. Creates the parent directory if it
/// doesn't exist.
pub fn save_season(path: &Path, state: &SeasonState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize season")?;

    file.commit().context("Failed to save season")?;

    Ok(())
}
