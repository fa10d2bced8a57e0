//! Configuration loading and setting resolution
//!
//! Every setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

pub const ENV_INPUT_PATH: &str = "BOOKTAG_INPUT";
pub const ENV_DATABASE_PATH: &str = "BOOKTAG_DATABASE";
pub const ENV_PROVIDER: &str = "BOOKTAG_PROVIDER";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Which text-generation service produces the tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Locally hosted model behind an Ollama-style `/api/generate` endpoint
    Ollama,
    /// Hosted Gemini API (requires an API key)
    Gemini,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" | "local" => Ok(Self::Ollama),
            "gemini" | "hosted" => Ok(Self::Gemini),
            other => Err(format!(
                "unknown provider '{}' (expected 'ollama' or 'gemini')",
                other
            )),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// How books are fanned out to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrchestrationMode {
    /// Bounded concurrent fan-out; failed books keep a sentinel tag
    Concurrent,
    /// One book at a time; failed books are logged and dropped
    Sequential,
}

impl FromStr for OrchestrationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concurrent" => Ok(Self::Concurrent),
            "sequential" => Ok(Self::Sequential),
            other => Err(format!(
                "unknown mode '{}' (expected 'concurrent' or 'sequential')",
                other
            )),
        }
    }
}

impl fmt::Display for OrchestrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concurrent => write!(f, "concurrent"),
            Self::Sequential => write!(f, "sequential"),
        }
    }
}

/// Compiled-in fallbacks used when nothing else supplies a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub input_path: PathBuf,
    pub database_path: PathBuf,
    pub provider: ProviderKind,
    pub mode: OrchestrationMode,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub ollama_timeout_secs: u64,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub gemini_timeout_secs: u64,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/goodreads_library_export.csv"),
            database_path: PathBuf::from("db/taggedbooks.db"),
            provider: ProviderKind::Ollama,
            mode: OrchestrationMode::Concurrent,
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2".to_string(),
            ollama_timeout_secs: 120,
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

/// `[ollama]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OllamaSection {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[gemini]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeminiSection {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[logging]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is not set (e.g. "debug")
    pub level: Option<String>,
}

/// On-disk TOML configuration. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub provider: Option<ProviderKind>,
    pub mode: Option<OrchestrationMode>,
    #[serde(default)]
    pub ollama: OllamaSection,
    #[serde(default)]
    pub gemini: GeminiSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default config file location: `<config_dir>/booktag/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("booktag").join("config.toml"))
}

/// Load TOML configuration.
///
/// A missing file is not an error: a warning is logged and defaults are used.
/// A file that exists but does not parse is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file {} not found, using defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Resolve a path setting: CLI → environment → TOML → default
pub fn resolve_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_value: Option<&Path>,
    default: &Path,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = toml_value {
        return path.to_path_buf();
    }

    default.to_path_buf()
}

/// Resolve the tagging provider: CLI → environment → TOML → default
pub fn resolve_provider(
    cli_arg: Option<ProviderKind>,
    toml_value: Option<ProviderKind>,
    default: ProviderKind,
) -> Result<ProviderKind> {
    if let Some(provider) = cli_arg {
        return Ok(provider);
    }

    if let Ok(value) = std::env::var(ENV_PROVIDER) {
        if !value.trim().is_empty() {
            return value.parse().map_err(Error::Config);
        }
    }

    Ok(toml_value.unwrap_or(default))
}

/// Resolve the hosted API key: environment → TOML.
///
/// Returns `None` when no non-blank key is configured; the hosted client
/// refuses to start in that case.
pub fn resolve_api_key(toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(ENV_GEMINI_API_KEY).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_config.gemini.api_key.clone().filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!("Gemini API key found in both environment and TOML. Using environment.");
    }

    env_key.or(toml_key)
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!("ollama".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_mode_parse_and_display() {
        let mode: OrchestrationMode = "sequential".parse().unwrap();
        assert_eq!(mode, OrchestrationMode::Sequential);
        assert_eq!(mode.to_string(), "sequential");
        assert!("parallel".parse::<OrchestrationMode>().is_err());
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }
}
