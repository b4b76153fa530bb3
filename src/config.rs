//! Configuration primitives for the PPC campaign builder.
//!
//! Stored in a machine-readable TOML file located at:
//!   %APPDATA%/PPCBuilder/config/config.toml on Windows
//!   $XDG_DATA_HOME/PPCBuilder/config/config.toml on Linux
//!   ~/Library/Application Support/PPCBuilder/config/config.toml on macOS
//!
//! The config tracks where the knowledge-base tables live, how the
//! generation service is bounded, and which stage table drives the wizard.

use serde::{Deserialize, Serialize};

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Knowledge-base source locations and normalization knobs.
    #[serde(default)]
    pub knowledge: KnowledgeSettings,
    /// Generation service bounds (timeout, output size).
    #[serde(default)]
    pub generation: GenerationSettings,
    /// Wizard stage table override.
    #[serde(default)]
    pub wizard: WizardSettings,
}

/// Where tabular sources are read from and how rows are filtered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeSettings {
    /// Directory holding the aggregate table and the per-role tables.
    #[serde(default)]
    pub sources_dir: Option<PathBuf>,
    /// File name of the table carrying one row per role.
    #[serde(default = "default_aggregate_source")]
    pub aggregate_source: String,
    /// Separator substituted for spaces when mapping a role label to its table name.
    #[serde(default = "default_role_source_separator")]
    pub role_source_separator: String,
    /// Only rows whose `Category_Name` matches this value are kept.
    #[serde(default = "default_product_category")]
    pub product_category: String,
    /// Resolve unknown roles to the general aggregate instead of failing synthesis.
    #[serde(default = "default_fallback_to_general")]
    pub fallback_to_general: bool,
}

impl Default for KnowledgeSettings {
    fn default() -> Self {
        Self {
            sources_dir: None,
            aggregate_source: default_aggregate_source(),
            role_source_separator: default_role_source_separator(),
            product_category: default_product_category(),
            fallback_to_general: default_fallback_to_general(),
        }
    }
}

fn default_aggregate_source() -> String {
    "roles.csv".into()
}

fn default_role_source_separator() -> String {
    "_".into()
}

fn default_product_category() -> String {
    "Help Desk".into()
}

const fn default_fallback_to_general() -> bool {
    false
}

/// Bounds applied to every generation service call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Whether ad synthesis should try the generation service before templating.
    #[serde(default = "default_generation_enabled")]
    pub enabled: bool,
    /// Wall-clock timeout (ms) for a single generation call.
    #[serde(default = "default_generation_timeout_ms")]
    pub timeout_ms: u64,
    /// Upper bound on the size of the generated response.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            enabled: default_generation_enabled(),
            timeout_ms: default_generation_timeout_ms(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl GenerationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

const fn default_generation_enabled() -> bool {
    false
}

const fn default_generation_timeout_ms() -> u64 {
    20_000
}

const fn default_max_output_tokens() -> u32 {
    400
}

/// Wizard stage table selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WizardSettings {
    /// Optional TOML stage table replacing the built-in questionnaire.
    #[serde(default)]
    pub stages_file: Option<PathBuf>,
}

/// Standard relative path to the config file (resolved per OS at runtime).
pub const CONFIG_FILE_NAME: &str = "config.toml";

use anyhow::{Context, Result};
use directories::BaseDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Returns the root directory where the builder keeps its files.
///
/// Order of precedence:
/// 1. `PPCBUILDER_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var("PPCBUILDER_HOME") {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("PPCBuilder"))
}

pub fn config_dir() -> Result<PathBuf> {
    let root = workspace_root()?;
    Ok(root.join("config"))
}

/// Path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default() -> Result<AppConfig> {
    load_from_path(&config_file_path()?)
}

/// Loads the configuration at `path`, falling back to defaults when it is absent.
pub fn load_from_path(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let cfg: AppConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(cfg)
    } else {
        Ok(AppConfig::default())
    }
}

/// Persists the configuration to the default location.
pub fn save(config: &AppConfig) -> Result<()> {
    save_to_path(config, &config_file_path()?)
}

/// Persists the configuration at `path`, creating parent directories.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;
    }
    let data = toml::to_string_pretty(config)?;
    fs::write(path, data).with_context(|| format!("Failed to write config file {:?}", path))?;
    Ok(())
}
