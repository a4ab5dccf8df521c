use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CountdownError, CountdownResult};
use crate::text::fonts::FontOptions;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SCRATCH_DIR: &str = "./tmp";
pub const DEFAULT_LOGGER_LEVEL: &str = "info";

/// Settings of the HTTP service.
///
/// Resolution order: built-in defaults, then an optional JSON file, then `COUNTDOWN_*`
/// environment variables. The binary applies its own flags last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub port: u16,
    pub scratch_dir: PathBuf,
    pub fonts: FontOptions,
    pub logger: LoggerConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            fonts: FontOptions::default(),
            logger: LoggerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// `EnvFilter` directives, e.g. `info,countdown_gif=debug`.
    pub level: String,
    pub format: LoggerFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOGGER_LEVEL.to_owned(),
            format: LoggerFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerFormat {
    Pretty,
    Json,
    Compact,
}

impl FromStr for LoggerFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(LoggerFormat::Json),
            "pretty" => Ok(LoggerFormat::Pretty),
            "compact" => Ok(LoggerFormat::Compact),
            _ => Err("invalid logger format"),
        }
    }
}

impl ServiceConfig {
    /// Defaults, overlaid with `file` when given, overlaid with the process environment.
    pub fn load(file: Option<&Path>) -> CountdownResult<Self> {
        let base = match file {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    pub fn from_json_file(path: &Path) -> CountdownResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CountdownError::filesystem(path, e))?;
        serde_json::from_str(&text).map_err(|e| {
            CountdownError::validation(format!("invalid config file '{}': {e}", path.display()))
        })
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> CountdownResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port_var = ["COUNTDOWN_PORT", "PORT"]
            .into_iter()
            .find_map(|key| lookup(key).map(|v| (key, v)));
        if let Some((key, raw)) = port_var {
            self.port = raw.trim().parse::<u16>().map_err(|_| {
                CountdownError::validation(format!("{key} has to be a valid port number"))
            })?;
        }

        if let Some(dir) = lookup("COUNTDOWN_SCRATCH_DIR") {
            self.scratch_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("COUNTDOWN_FONT_REGULAR") {
            self.fonts.regular = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("COUNTDOWN_FONT_SEMIBOLD") {
            self.fonts.semibold = Some(PathBuf::from(path));
        }
        if let Some(level) = lookup("COUNTDOWN_LOGGER_LEVEL") {
            self.logger.level = level;
        }
        if let Some(format) = lookup("COUNTDOWN_LOGGER_FORMAT") {
            match LoggerFormat::from_str(&format) {
                Ok(format) => self.logger.format = format,
                Err(err) => tracing::warn!(value = %format, "{err}, keeping {:?}", self.logger.format),
            }
        }
        Ok(self)
    }
}
