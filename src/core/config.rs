//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.tulcea/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::models::Language;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GuideConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_language: Option<Language>,
    pub settings_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const CONFIG_DIR: &str = ".tulcea";
const SETTINGS_FILE: &str = "settings.json";

// ============================================================================
// Resolved Config (concrete values where a default exists)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub default_language: Language,
    /// Explicit `--language`, if given. Wins over the persisted choice.
    pub language_override: Option<Language>,
    pub settings_path: PathBuf,
    pub backend_url: Option<String>,
    pub anon_key: Option<String>,
    pub timeout: Duration,
}

/// Backend credentials, present only when both parts are configured.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendCredentials {
    pub url: String,
    pub anon_key: String,
}

impl ResolvedConfig {
    /// Backend credentials, or `ConfigError::Missing` naming what is absent.
    pub fn backend_credentials(&self) -> Result<BackendCredentials, ConfigError> {
        let url = non_blank(self.backend_url.as_deref());
        let key = non_blank(self.anon_key.as_deref());
        match (url, key) {
            (Some(url), Some(anon_key)) => Ok(BackendCredentials {
                url: url.to_string(),
                anon_key: anon_key.to_string(),
            }),
            (None, _) => Err(ConfigError::Missing("SUPABASE_URL")),
            (_, None) => Err(ConfigError::Missing("SUPABASE_ANON_KEY")),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// A required setting has no value in any layer.
    Missing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Missing(name) => write!(
                f,
                "missing backend configuration: set {name} in the environment, .env or ~/{CONFIG_DIR}/config.toml"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.tulcea`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_DIR))
}

/// Returns the path to `~/.tulcea/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.tulcea/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `GuideConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<GuideConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(GuideConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(GuideConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: GuideConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    // The anon key is public but still kept out of the log.
    debug!(
        "Config: language={:?}, url={:?}, timeout={:?}",
        config.general.default_language, config.backend.url, config.backend.timeout_secs
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Tulcea Guide Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_language = "en"            # "en", "ro", "fr" or "de"
# settings_file = "settings.json"    # Path relative to ~/.tulcea/

# [backend]
# url = "https://your-project.supabase.co"   # Or set SUPABASE_URL
# anon_key = "eyJ..."                        # Or set SUPABASE_ANON_KEY
# timeout_secs = 10                          # Or set TULCEA_TIMEOUT_SECS
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &GuideConfig, cli_language: Option<Language>) -> ResolvedConfig {
    resolve_with_env(config, cli_language, |name| std::env::var(name).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env<F>(
    config: &GuideConfig,
    cli_language: Option<Language>,
    env: F,
) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Default language: env → config → en
    let default_language = env("TULCEA_LANGUAGE")
        .and_then(|code| match code.parse::<Language>() {
            Ok(lang) => Some(lang),
            Err(e) => {
                warn!("Ignoring TULCEA_LANGUAGE: {e}");
                None
            }
        })
        .or(config.general.default_language)
        .unwrap_or_default();

    // Backend URL and key: env → config (EXPO_PUBLIC_ names accepted for shared .env files)
    let backend_url = env("SUPABASE_URL")
        .or_else(|| env("EXPO_PUBLIC_SUPABASE_URL"))
        .or_else(|| config.backend.url.clone());
    let anon_key = env("SUPABASE_ANON_KEY")
        .or_else(|| env("EXPO_PUBLIC_SUPABASE_ANON_KEY"))
        .or_else(|| config.backend.anon_key.clone());

    // Timeout: env → config → default
    let timeout_secs = env("TULCEA_TIMEOUT_SECS")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .or(config.backend.timeout_secs)
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let settings_file = config
        .general
        .settings_file
        .clone()
        .unwrap_or_else(|| SETTINGS_FILE.to_string());
    let settings_path = config_dir()
        .map(|d| d.join(&settings_file))
        .unwrap_or_else(|| PathBuf::from(&settings_file));

    ResolvedConfig {
        default_language,
        language_override: cli_language,
        settings_path,
        backend_url,
        anon_key,
        timeout: Duration::from_secs(timeout_secs),
    }
}
