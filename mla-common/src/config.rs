//! Configuration loading and resolution
//!
//! Each setting is resolved independently, first match wins:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The analytics core never reads the environment or the working directory
//! itself; it receives a fully resolved [`AnalyticsConfig`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable overriding the input directory
pub const ENV_DATA_DIR: &str = "MLA_DATA_DIR";
/// Environment variable overriding the output directory
pub const ENV_OUTPUT_DIR: &str = "MLA_OUTPUT_DIR";
/// Environment variable overriding the output format
pub const ENV_FORMAT: &str = "MLA_FORMAT";
/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "MLA_LOG_LEVEL";

/// Report file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Titled, column-aligned plain text
    #[default]
    Text,
    /// One JSON document holding every report
    Json,
}

impl OutputFormat {
    /// File extension written for this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Config(format!(
                "Unknown output format '{}' (expected 'text' or 'json')",
                other
            ))),
        }
    }
}

/// Fully resolved configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Directory holding the four input CSV files
    pub data_dir: PathBuf,
    /// Directory receiving the report file
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Compute the twelve reports on the rayon pool
    pub parallel: bool,
    /// Abort on duplicate dimension keys instead of warning
    pub strict_keys: bool,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Compiled defaults, the last resolution tier
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub parallel: bool,
    pub strict_keys: bool,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            format: OutputFormat::Text,
            parallel: true,
            strict_keys: false,
            log_level: "info".to_string(),
        }
    }
}

/// TOML config file contents; every field optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub parallel: Option<bool>,
    #[serde(default)]
    pub strict_keys: Option<bool>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[logging]` table of the TOML config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: Option<String>,
}

impl TomlConfig {
    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub parallel: Option<bool>,
    pub strict_keys: Option<bool>,
    pub log_level: Option<String>,
}

/// A resolved configuration plus what resolution found along the way
///
/// Resolution usually runs before logging is installed, so the caller logs
/// these once its subscriber is up.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub config: AnalyticsConfig,
    /// Config file whose values took part in resolution
    pub config_file: Option<PathBuf>,
    /// Problems that were skipped over, such as a malformed per-user file
    pub warnings: Vec<String>,
}

/// Resolves [`AnalyticsConfig`] across the four tiers
pub struct ConfigResolver {
    overrides: ConfigOverrides,
    defaults: CompiledDefaults,
}

impl ConfigResolver {
    pub fn new(overrides: ConfigOverrides) -> Self {
        Self {
            overrides,
            defaults: CompiledDefaults::default(),
        }
    }

    /// Resolve every setting
    pub fn resolve(&self) -> Result<AnalyticsConfig> {
        self.resolve_with_diagnostics().map(|resolution| resolution.config)
    }

    /// Resolve every setting, keeping the config file used and any warnings
    ///
    /// An explicit `--config` file must exist and parse. The per-user config
    /// file is optional: absent means defaults, malformed is reported in
    /// [`Resolution::warnings`] and skipped.
    pub fn resolve_with_diagnostics(&self) -> Result<Resolution> {
        let mut warnings = Vec::new();
        let (toml_config, config_file) = self.load_toml(&mut warnings)?;

        let data_dir = self
            .overrides
            .data_dir
            .clone()
            .or_else(|| env_path(ENV_DATA_DIR))
            .or_else(|| toml_config.data_dir.clone())
            .unwrap_or_else(|| self.defaults.data_dir.clone());

        let output_dir = self
            .overrides
            .output_dir
            .clone()
            .or_else(|| env_path(ENV_OUTPUT_DIR))
            .or_else(|| toml_config.output_dir.clone())
            .unwrap_or_else(|| self.defaults.output_dir.clone());

        let env_format = match std::env::var(ENV_FORMAT) {
            Ok(value) => Some(value.parse::<OutputFormat>()?),
            Err(_) => None,
        };
        let format = self
            .overrides
            .format
            .or(env_format)
            .or(toml_config.format)
            .unwrap_or(self.defaults.format);

        let parallel = self
            .overrides
            .parallel
            .or(toml_config.parallel)
            .unwrap_or(self.defaults.parallel);

        let strict_keys = self
            .overrides
            .strict_keys
            .or(toml_config.strict_keys)
            .unwrap_or(self.defaults.strict_keys);

        let log_level = self
            .overrides
            .log_level
            .clone()
            .or_else(|| std::env::var(ENV_LOG_LEVEL).ok())
            .or_else(|| toml_config.logging.level.clone())
            .unwrap_or_else(|| self.defaults.log_level.clone());

        Ok(Resolution {
            config: AnalyticsConfig {
                data_dir,
                output_dir,
                format,
                parallel,
                strict_keys,
                log_level,
            },
            config_file,
            warnings,
        })
    }

    fn load_toml(&self, warnings: &mut Vec<String>) -> Result<(TomlConfig, Option<PathBuf>)> {
        if let Some(path) = &self.overrides.config_file {
            return Ok((TomlConfig::load(path)?, Some(path.clone())));
        }

        let Some(path) = default_config_path() else {
            return Ok((TomlConfig::default(), None));
        };
        if !path.exists() {
            return Ok((TomlConfig::default(), None));
        }

        match TomlConfig::load(&path) {
            Ok(config) => Ok((config, Some(path))),
            Err(e) => {
                warnings.push(format!("Ignoring config file {}: {}", path.display(), e));
                Ok((TomlConfig::default(), None))
            }
        }
    }
}

/// Per-user config file location (`<config dir>/mla/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mla").join("config.toml"))
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
