//! Configuration loading for the binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use attachmail_core::{DeliveryConfig, EnvSource, Layered, MapSource};

/// Default config file location.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("attachmail").join("config.json"))
}

/// Reads the config file. An explicit path must exist; the default path
/// is optional.
pub fn load_file(explicit: Option<&Path>) -> Result<MapSource> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_path() {
            Some(path) if path.is_file() => path,
            _ => return Ok(MapSource::new()),
        },
    };
    debug!(path = %path.display(), "reading config file");
    MapSource::from_json_file(&path)
        .with_context(|| format!("Failed to load config file {}", path.display()))
}

/// Builds the delivery configuration; environment values win over the
/// file.
pub fn load(explicit: Option<&Path>) -> Result<DeliveryConfig> {
    let file = load_file(explicit)?;
    Ok(DeliveryConfig::from_source(&Layered(EnvSource, file)))
}
