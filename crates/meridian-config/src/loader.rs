//! Layered configuration loading.

use std::env;
use std::fs;
use std::path::Path;

use meridian_telemetry::LogFormat;

use crate::{ConfigError, ConfigResult, MeridianConfig};

/// Configuration loader.
///
/// Layers are applied in order, later layers overriding earlier ones:
/// 1. Defaults (or a preset)
/// 2. Configuration file or inline string (TOML or JSON)
/// 3. Environment variables, `PREFIX__SECTION__KEY`
///
/// A file replaces the whole configuration; sections it omits take their
/// defaults.
///
/// ```no_run
/// use meridian_config::ConfigLoader;
///
/// # fn main() -> Result<(), meridian_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_optional_file("meridian.toml")?
///     .with_dotenv()?
///     .with_env_prefix("MERIDIAN")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: MeridianConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Start from default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MeridianConfig::default(),
            env_prefix: None,
        }
    }

    /// Start from the development preset.
    ///
    /// ```
    /// use meridian_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = MeridianConfig::development();
        self
    }

    /// Start from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = MeridianConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format is chosen by extension (`.toml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed or
    /// contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        self.config = Self::parse_file(&content, path)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(self)
    }

    /// Load configuration from a file if it exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> ConfigResult<Self> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in `"toml"` or `"json"` format.
    ///
    /// ```
    /// use meridian_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[route]\npath_prefix = \"/v2\"", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    /// assert_eq!(config.route.path_prefix, "/v2");
    /// assert_eq!(config.route.default_limit, 20);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> ConfigResult<Self> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::unsupported_format(format))
            }
        };
        Ok(self)
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// With prefix `MERIDIAN`:
    /// - `MERIDIAN__ROUTE__PATH_PREFIX=/v2`
    /// - `MERIDIAN__SWAGGER__OPERATIONS=search,retrieve`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load variables from a `.env` file in the current directory, if any.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if a `.env` file exists but cannot
    /// be parsed.
    pub fn with_dotenv(self) -> ConfigResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "loaded dotenv file");
                Ok(self)
            }
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply environment overrides and validate.
    pub fn load(mut self) -> ConfigResult<MeridianConfig> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }
        self.config.validate()?;
        Ok(self.config)
    }

    /// Finalize without validation.
    #[must_use]
    pub fn load_unvalidated(self) -> MeridianConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> ConfigResult<MeridianConfig> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::unsupported_format(path.display().to_string())),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> ConfigResult<()> {
        let marker = format!("{prefix}__");
        let mut vars: Vec<(String, String)> =
            env::vars().filter(|(k, _)| k.starts_with(&marker)).collect();
        vars.sort();
        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> ConfigResult<()> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_override(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["ROUTE", "PATH_PREFIX"] => config.route.path_prefix = value.to_string(),
            ["ROUTE", "DEFAULT_LIMIT"] => {
                config.route.default_limit = value
                    .parse()
                    .map_err(|_| ConfigError::env_override(key, "expected integer"))?;
            }
            ["ROUTE", "URL_ROOT"] => config.route.url_root = value.to_string(),

            ["DISCOVERY", "NAME"] => config.discovery.name = value.to_string(),
            ["DISCOVERY", "OPERATIONS"] => config.discovery.operations = parse_list(value),

            ["SWAGGER", "NAME"] => config.swagger.name = value.to_string(),
            ["SWAGGER", "VERSION"] => config.swagger.version = value.to_string(),
            ["SWAGGER", "PATH_PREFIX"] => config.swagger.path_prefix = value.to_string(),
            ["SWAGGER", "OPERATIONS"] => config.swagger.operations = parse_list(value),
            ["SWAGGER", "TITLE"] => {
                config.swagger.title = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }

            ["CONTEXT", "INCLUDE_HEADER_PREFIX"] => {
                config.context.include_header_prefix = value.to_string();
            }

            ["LOGGING", "ENABLED"] => {
                config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_override(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_override(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "SPAN_EVENTS"] => {
                config.logging.span_events = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_override(key, "expected boolean"))?;
            }
            ["LOGGING", "ANSI_ENABLED"] => {
                config.logging.ansi_enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_override(key, "expected boolean"))?;
            }

            _ => tracing::warn!(var = key, "ignoring unknown configuration variable"),
        }

        Ok(())
    }
}

/// Comma-separated list, blanks dropped.
fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
