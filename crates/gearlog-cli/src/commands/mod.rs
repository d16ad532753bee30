//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::PathBuf;

use gearlog_core::GearlogConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gearlog")
        .join("config.json")
}

/// Load configuration from an explicit path, the default location, or
/// fall back to built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<GearlogConfig> {
    if let Some(path) = config_path {
        return Ok(GearlogConfig::from_file(std::path::Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(GearlogConfig::from_file(&default_path)?)
    } else {
        Ok(GearlogConfig::default())
    }
}
