//! Configuration file management for phasefit.
//!
//! Provides a TOML-based config file at `~/.config/phasefit/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use phasefit_core::model::{DEFAULT_TIMEOUT, ModelConfig, ProviderRegistry};

/// Provider used when nothing else selects one.
pub const DEFAULT_PROVIDER: &str = "openai";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub model: ModelSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ModelSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Stored only if given to `phasefit init`; env vars take precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the phasefit config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/phasefit` or
/// `~/.config/phasefit`, never the macOS `Application Support` path.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("phasefit");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("phasefit")
}

/// Return the path to the phasefit config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse a config file.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))
}

/// Load the config file if it exists. A missing file is not an error; a
/// malformed one is.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    load_config_from(&path).map(Some)
}

/// Serialize and write `config` to `path`, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Model settings given on the command line.
#[derive(Debug, Default, Clone)]
pub struct ModelOverrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub relay_url: Option<String>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct PhasefitConfig {
    pub model: ModelConfig,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl PhasefitConfig {
    /// Resolve configuration from the CLI, the environment, and the config
    /// file on disk.
    pub fn resolve(cli: &ModelOverrides, registry: &ProviderRegistry) -> Result<Self> {
        let file = load_config()?;
        Self::resolve_with(cli, file.as_ref(), registry)
    }

    /// Resolve using the chain: CLI flag > env var > config file > default.
    ///
    /// - provider: `--provider` > `PHASEFIT_PROVIDER` > `model.provider` > `openai`
    /// - model: `--model` > `PHASEFIT_MODEL` > `model.model` > provider default
    /// - relay URL: `--relay-url` > `PHASEFIT_RELAY_URL` > `model.relay_url` > none
    /// - timeout: `PHASEFIT_TIMEOUT_SECS` > `model.timeout_secs` > 60
    /// - API key: provider env var (e.g. `OPENAI_API_KEY`) > `PHASEFIT_API_KEY`
    ///   > `model.api_key`
    pub fn resolve_with(
        cli: &ModelOverrides,
        file: Option<&ConfigFile>,
        registry: &ProviderRegistry,
    ) -> Result<Self> {
        let section = file.map(|f| &f.model);

        let provider = cli
            .provider
            .clone()
            .or_else(|| env_var("PHASEFIT_PROVIDER"))
            .or_else(|| section.and_then(|s| s.provider.clone()))
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

        let model = cli
            .model
            .clone()
            .or_else(|| env_var("PHASEFIT_MODEL"))
            .or_else(|| section.and_then(|s| s.model.clone()));

        let relay_url = cli
            .relay_url
            .clone()
            .or_else(|| env_var("PHASEFIT_RELAY_URL"))
            .or_else(|| section.and_then(|s| s.relay_url.clone()));

        let timeout = match env_var("PHASEFIT_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("PHASEFIT_TIMEOUT_SECS is not a number: {raw}"))?,
            ),
            None => section
                .and_then(|s| s.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        };

        // Unknown providers have no key variable; the model client reports
        // them when it is built.
        let api_key = registry
            .get(&provider)
            .and_then(|target| env_var(&target.api_key_env))
            .or_else(|| env_var("PHASEFIT_API_KEY"))
            .or_else(|| section.and_then(|s| s.api_key.clone()));

        let mut config = ModelConfig::new(provider);
        config.model = model;
        config.relay_url = relay_url;
        config.api_key = api_key;
        config.timeout = timeout;

        Ok(Self { model: config })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
