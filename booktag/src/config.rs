//! Configuration resolution for booktag
//!
//! Combines command-line overrides, environment variables, the TOML file and
//! compiled defaults into one [`Settings`] value.

use booktag_common::config::{
    resolve_api_key, resolve_path, resolve_provider, CompiledDefaults, OrchestrationMode,
    ProviderKind, TomlConfig, ENV_DATABASE_PATH, ENV_INPUT_PATH,
};
use booktag_common::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Values supplied on the command line (all optional)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub input_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub mode: Option<OrchestrationMode>,
    pub skip_tagged: bool,
}

/// Fully resolved run settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub input_path: PathBuf,
    pub database_path: PathBuf,
    pub provider: ProviderKind,
    /// Model name for the selected provider
    pub model: String,
    pub mode: OrchestrationMode,
    pub skip_tagged: bool,
    pub ollama_base_url: String,
    pub ollama_timeout: Duration,
    pub gemini_base_url: String,
    pub gemini_timeout: Duration,
    pub gemini_api_key: Option<String>,
}

impl Settings {
    /// Resolve every setting: CLI → environment → TOML → compiled default
    pub fn resolve(cli: &CliOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let input_path = resolve_path(
            cli.input_path.as_deref(),
            ENV_INPUT_PATH,
            toml_config.input_path.as_deref(),
            &defaults.input_path,
        );
        let database_path = resolve_path(
            cli.database_path.as_deref(),
            ENV_DATABASE_PATH,
            toml_config.database_path.as_deref(),
            &defaults.database_path,
        );
        let provider = resolve_provider(cli.provider, toml_config.provider, defaults.provider)?;

        let toml_model = match provider {
            ProviderKind::Ollama => toml_config.ollama.model.clone(),
            ProviderKind::Gemini => toml_config.gemini.model.clone(),
        };
        let default_model = match provider {
            ProviderKind::Ollama => defaults.ollama_model.clone(),
            ProviderKind::Gemini => defaults.gemini_model.clone(),
        };
        let model = cli.model.clone().or(toml_model).unwrap_or(default_model);

        let mode = cli.mode.or(toml_config.mode).unwrap_or(defaults.mode);

        let settings = Self {
            input_path,
            database_path,
            provider,
            model,
            mode,
            skip_tagged: cli.skip_tagged,
            ollama_base_url: toml_config
                .ollama
                .base_url
                .clone()
                .unwrap_or(defaults.ollama_base_url),
            ollama_timeout: Duration::from_secs(
                toml_config
                    .ollama
                    .timeout_secs
                    .unwrap_or(defaults.ollama_timeout_secs),
            ),
            gemini_base_url: toml_config
                .gemini
                .base_url
                .clone()
                .unwrap_or(defaults.gemini_base_url),
            gemini_timeout: Duration::from_secs(
                toml_config
                    .gemini
                    .timeout_secs
                    .unwrap_or(defaults.gemini_timeout_secs),
            ),
            gemini_api_key: resolve_api_key(toml_config),
        };

        info!(
            input = %settings.input_path.display(),
            database = %settings.database_path.display(),
            provider = %settings.provider,
            model = %settings.model,
            mode = %settings.mode,
            "Resolved settings"
        );

        Ok(settings)
    }
}
