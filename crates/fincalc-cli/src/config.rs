use anyhow::{Context, Result};
use fincalc_core::ExpressionLimits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "FINCALC_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "fincalc.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Environment {
    pub env_type: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self { env_type: "default".to_string() }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter(), json: false }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Decimal places shown for step and final results
    pub decimals: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { decimals: default_decimals() }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FincalcConfig {
    pub environment: Environment,
    pub logging: LoggingConfig,
    pub expression: ExpressionLimits,
    pub output: OutputConfig,
    /// File the configuration was read from; `None` when defaults were used.
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

impl FincalcConfig {
    /// Path given by `FINCALC_CONFIG_PATH`, or `fincalc.toml`.
    pub fn config_path() -> PathBuf {
        std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()).into()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Reads `path`. A missing file yields the built-in defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read configuration file '{}'", path.display()));
            }
        };

        let mut config: Self = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file '{}'", path.display()))?;
        config.loaded_from = Some(path.to_path_buf());
        Ok(config)
    }

    /// Applies `FINCALC_*` environment variable overrides.
    pub fn apply_profile(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup`. Unparsable values are ignored with a warning.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(filter) = lookup("FINCALC_LOG") {
            self.logging.filter = filter;
        }
        if let Some(json) = parse_override(&lookup, "FINCALC_LOG_JSON") {
            self.logging.json = json;
        }
        if let Some(length) = parse_override(&lookup, "FINCALC_MAX_EXPRESSION_LENGTH") {
            self.expression.max_expression_length = length;
        }
        if let Some(depth) = parse_override(&lookup, "FINCALC_MAX_EXPRESSION_DEPTH") {
            self.expression.max_expression_depth = depth;
        }
        if let Some(decimals) = parse_override(&lookup, "FINCALC_OUTPUT_DECIMALS") {
            self.output.decimals = decimals;
        }
        self
    }

    /// Reports where the configuration came from. Call once logging is up.
    pub fn log_source(&self) {
        match &self.loaded_from {
            Some(path) => info!(
                path = %path.display(),
                env_type = %self.environment.env_type,
                "Loaded configuration"
            ),
            None => warn!(
                "Configuration file '{}' not found. Using default configuration.",
                Self::config_path().display()
            ),
        }
    }
}

fn parse_override<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = key, value = %raw, "Ignoring unparsable configuration override");
            None
        }
    }
}

fn default_log_filter() -> String {
    "fincalc=info".to_string()
}

fn default_decimals() -> usize {
    2
}
