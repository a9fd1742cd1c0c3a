//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TOML configuration file contents (`~/.config/stillpoint/stillpoint.toml`)
///
/// All fields optional; anything absent falls back to env vars or
/// compiled defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Service data directory (database, work files, media library)
    pub root_folder: Option<String>,
    /// Host:port the HTTP server binds to
    pub bind: Option<String>,
    /// Public base URL used when deriving media links (defaults to http://{bind})
    pub base_url: Option<String>,
    /// Path to the fixed background track mixed under every meditation
    pub background_track: Option<String>,
    /// Generative-text service API key (TOML is the lowest-priority source)
    pub gemini_api_key: Option<String>,
    /// Speech-synthesis service API key (TOML is the lowest-priority source)
    pub tts_api_key: Option<String>,
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    match load_toml_config() {
        Ok(config) => {
            if let Some(root_folder) = config.root_folder {
                return PathBuf::from(root_folder);
            }
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable TOML config: {}", e);
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Default configuration file path for the platform
pub fn config_file_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("stillpoint").join("stillpoint.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Load the TOML config file, if present
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    load_toml_config_from(&path)
}

/// Load a TOML config file from an explicit path
pub fn load_toml_config_from(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Write the TOML config file, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Create config dir failed: {}", e)))?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
    std::fs::write(path, content).map_err(|e| Error::Config(format!("Write TOML failed: {}", e)))
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/stillpoint (or /var/lib/stillpoint for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("stillpoint"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/stillpoint"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/stillpoint
        dirs::data_dir()
            .map(|d| d.join("stillpoint"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/stillpoint"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\stillpoint
        dirs::data_local_dir()
            .map(|d| d.join("stillpoint"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\stillpoint"))
    } else {
        PathBuf::from("./stillpoint_data")
    }
}

/// Ensure the root folder and its standard subdirectories exist
///
/// Creates `<root>/work`, `<root>/media` and `<root>/assets` if missing.
pub fn ensure_root_layout(root: &Path) -> Result<()> {
    for dir in [
        root.to_path_buf(),
        root.join("work"),
        root.join("media"),
        root.join("assets"),
    ] {
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::Config(format!("Create {} failed: {}", dir.display(), e)))?;
    }
    Ok(())
}
