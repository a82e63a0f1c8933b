//! Configuration management for keywheel services
//!
//! Settings come from `KEYWHEEL_*` environment variables (optionally loaded
//! from a `.env` file). The key pool itself is read from a comma-separated
//! variable, falling back to a single-key variable.

use config::Environment;
pub use config::{ConfigError, Map};
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Default variable holding a comma-separated list of keys
pub const DEFAULT_KEYS_VAR: &str = "TAVILY_API_KEYS";

/// Default variable holding a single key
pub const DEFAULT_KEY_VAR: &str = "TAVILY_API_KEY";

const ENV_PREFIX: &str = "KEYWHEEL";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Console,
}

/// Raw `KEYWHEEL_*` settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct Settings {
    log_level: String,
    log_format: LogFormat,
    keys_var: String,
    key_var: String,
    max_attempts: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            keys_var: DEFAULT_KEYS_VAR.to_string(),
            key_var: DEFAULT_KEY_VAR.to_string(),
            max_attempts: None,
        }
    }
}

/// Key pool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPoolConfig {
    /// Variable the key list was read from
    pub keys_var: String,
    /// Single-key fallback variable
    pub key_var: String,
    /// Resolved keys, never empty. `[""]` means nothing was configured.
    pub keys: Vec<String>,
}

impl KeyPoolConfig {
    /// Whether any real credential was found
    pub fn is_configured(&self) -> bool {
        self.keys.iter().any(|k| !k.is_empty())
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub key_pool: KeyPoolConfig,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Upper bound on attempts per outbound call; defaults to the pool size
    pub max_attempts: Option<usize>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_vars(env::vars().collect())
    }

    /// Load configuration from a dotenv-style file only, ignoring the
    /// process environment
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut vars = Map::new();
        let iter = dotenvy::from_path_iter(path.as_ref())
            .map_err(|e| ConfigError::Foreign(Box::new(e)))?;
        for item in iter {
            let (key, value) = item.map_err(|e| ConfigError::Foreign(Box::new(e)))?;
            vars.insert(key, value);
        }

        Self::from_vars(vars)
    }

    /// Build configuration from an explicit variable map
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        let settings: Settings = config::Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            )
            .build()?
            .try_deserialize()?;

        if settings.max_attempts == Some(0) {
            return Err(ConfigError::Message(
                "KEYWHEEL_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        let keys = resolve_keys(&vars, &settings.keys_var, &settings.key_var);

        Ok(Self {
            key_pool: KeyPoolConfig {
                keys_var: settings.keys_var,
                key_var: settings.key_var,
                keys,
            },
            log_level: settings.log_level,
            log_format: settings.log_format,
            max_attempts: settings.max_attempts,
        })
    }

    /// Get log level, defaulting to "info"
    pub fn log_level(&self) -> &str {
        if self.log_level.is_empty() {
            "info"
        } else {
            &self.log_level
        }
    }
}

/// Split a comma-separated key list, dropping blank entries
pub fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve the seed keys: the list variable, then the single-key variable,
/// then a lone empty placeholder.
fn resolve_keys(vars: &Map<String, String>, keys_var: &str, key_var: &str) -> Vec<String> {
    let listed = vars
        .get(keys_var)
        .map(|raw| parse_key_list(raw))
        .unwrap_or_default();
    if !listed.is_empty() {
        return listed;
    }

    let single = vars
        .get(key_var)
        .map(|k| k.trim().to_string())
        .unwrap_or_default();
    vec![single]
}
