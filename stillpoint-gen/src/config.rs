//! Configuration resolution for stillpoint-gen
//!
//! Provides multi-tier API key resolution with Database → ENV → TOML
//! priority, plus the resolved service configuration (paths, bind
//! address, public base URL).

use sqlx::{Pool, Sqlite};
use std::path::{Path, PathBuf};
use stillpoint_common::config::TomlConfig;
use stillpoint_common::{Error, Result};
use tracing::{info, warn};

/// Default bind address when neither CLI, env nor TOML provide one
pub const DEFAULT_BIND: &str = "127.0.0.1:5750";

/// Resolved service configuration, built once at startup
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service data directory
    pub root_folder: PathBuf,
    /// Host:port the HTTP server binds to
    pub bind: String,
    /// Public base URL used for media links
    pub base_url: String,
    /// Fixed background track mixed under every meditation
    pub background_track: PathBuf,
}

impl ServiceConfig {
    /// Build configuration from the resolved root folder and TOML file
    pub fn new(root_folder: PathBuf, bind_override: Option<String>, toml: &TomlConfig) -> Self {
        let bind = bind_override
            .or_else(|| toml.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let base_url = toml
            .base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", bind));
        let background_track = toml
            .background_track
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| root_folder.join("assets").join("background.mp3"));

        Self {
            root_folder,
            bind,
            base_url,
            background_track,
        }
    }

    /// SQLite database path
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join("stillpoint.db")
    }

    /// Scratch directory for per-meditation intermediate files
    pub fn work_dir(&self) -> PathBuf {
        self.root_folder.join("work")
    }

    /// Media library directory, served under /media
    pub fn media_dir(&self) -> PathBuf {
        self.root_folder.join("media")
    }
}

/// Resolve generative-text service API key from 3-tier configuration
///
/// **Priority:** Database → ENV → TOML
pub async fn resolve_gemini_api_key(db: &Pool<Sqlite>, toml_config: &TomlConfig) -> Result<String> {
    resolve_api_key(
        "Gemini",
        crate::db::settings::get_gemini_api_key(db).await?,
        std::env::var("STILLPOINT_GEMINI_API_KEY").ok(),
        toml_config.gemini_api_key.clone(),
        "STILLPOINT_GEMINI_API_KEY",
        "gemini_api_key",
    )
}

/// Resolve speech-synthesis service API key from 3-tier configuration
///
/// **Priority:** Database → ENV → TOML
pub async fn resolve_tts_api_key(db: &Pool<Sqlite>, toml_config: &TomlConfig) -> Result<String> {
    resolve_api_key(
        "Text-to-speech",
        crate::db::settings::get_tts_api_key(db).await?,
        std::env::var("STILLPOINT_TTS_API_KEY").ok(),
        toml_config.tts_api_key.clone(),
        "STILLPOINT_TTS_API_KEY",
        "tts_api_key",
    )
}

fn resolve_api_key(
    service: &str,
    db_key: Option<String>,
    env_key: Option<String>,
    toml_key: Option<String>,
    env_var: &str,
    toml_field: &str,
) -> Result<String> {
    let mut sources = Vec::new();
    if db_key.as_deref().is_some_and(is_valid_key) {
        sources.push("database");
    }
    if env_key.as_deref().is_some_and(is_valid_key) {
        sources.push("environment");
    }
    if toml_key.as_deref().is_some_and(is_valid_key) {
        sources.push("TOML");
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "{} API key found in multiple sources: {}. Using database (highest priority).",
            service,
            sources.join(", ")
        );
    }

    // Resolution priority
    if let Some(key) = db_key.filter(|k| is_valid_key(k)) {
        info!("{} API key loaded from database", service);
        return Ok(key);
    }
    if let Some(key) = env_key.filter(|k| is_valid_key(k)) {
        info!("{} API key loaded from environment variable", service);
        return Ok(key);
    }
    if let Some(key) = toml_key.filter(|k| is_valid_key(k)) {
        info!("{} API key loaded from TOML config", service);
        return Ok(key);
    }

    Err(Error::Config(format!(
        "{} API key not configured. Please configure using one of:\n\
         1. Web UI: http://{}/settings\n\
         2. Environment: {}=your-key-here\n\
         3. TOML config: ~/.config/stillpoint/stillpoint.toml ({} = \"your-key\")",
        service, DEFAULT_BIND, env_var, toml_field
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Sync API key settings from database to TOML file (best-effort backup)
pub fn sync_key_to_toml(field: &str, value: &str, toml_path: &Path) -> Result<()> {
    let mut config = stillpoint_common::config::load_toml_config_from(toml_path)?;

    match field {
        "gemini_api_key" => config.gemini_api_key = Some(value.to_string()),
        "tts_api_key" => config.tts_api_key = Some(value.to_string()),
        other => {
            return Err(Error::Config(format!("Unknown settings field: {}", other)));
        }
    }

    match stillpoint_common::config::write_toml_config(&config, toml_path) {
        Ok(()) => {
            info!("Settings synced to TOML: {}", toml_path.display());
            Ok(())
        }
        Err(e) => {
            warn!("TOML write failed (database write succeeded): {}", e);
            Ok(()) // Graceful degradation
        }
    }
}
