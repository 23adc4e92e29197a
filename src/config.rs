//! Configuration loading
//!
//! The configuration file is TOML with a `[logger]` section, an optional
//! `[format]` section and any number of `[[handler]]` tables:
//!
//! ```toml
//! [logger]
//! level = "debug"
//!
//! [format]
//! template = "{time} {pid} [{level}] {logger}: {message}"
//! timestamp = "%Y-%m-%d %H:%M:%S"
//!
//! [[handler]]
//! kind = "console"
//! level = "info"
//!
//! [[handler]]
//! kind = "rotating-file"
//! path = "logs/app.log"
//! level = "debug"
//! max_bytes = 10485760
//! backups = 5
//! ```
//!
//! When no file is configured, [`LogConfig::default_config`] supplies the
//! built-in setup: a single console handler at INFO with the default
//! format. An explicitly requested file that is missing, unreadable or
//! malformed is a fatal error; the caller asked for that exact file, so
//! it is never silently downgraded to defaults.

use crate::core::{
    AsyncLogManager, Formatter, LogError, Result, Severity, SharedHandler,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    #[serde(default)]
    pub logger: LoggerSection,
    #[serde(default)]
    pub format: FormatSection,
    #[serde(default, rename = "handler")]
    pub handlers: Vec<HandlerConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerSection {
    /// Logger name; the facade's own name wins when both are given.
    pub name: Option<String>,
    /// Facade-level threshold.
    pub level: Option<Severity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatSection {
    pub template: Option<String>,
    /// strftime timestamp layout.
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum HandlerConfig {
    Console {
        level: Option<Severity>,
    },
    File {
        path: PathBuf,
        level: Option<Severity>,
    },
    RotatingFile {
        path: PathBuf,
        level: Option<Severity>,
        max_bytes: Option<u64>,
        backups: Option<usize>,
        compress: Option<bool>,
    },
}

impl LogConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// [`LogError::ConfigMissing`] when the path does not exist,
    /// [`LogError::ConfigRead`] when it cannot be read and
    /// [`LogError::ConfigParse`] when it is not a valid config document.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LogError::config_missing(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| LogError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let config: LogConfig = toml::from_str(&content).map_err(|e| LogError::ConfigParse {
            path: path.display().to_string(),
            source: e,
        })?;

        if config.handlers.is_empty() {
            return Err(LogError::config(
                "handlers",
                "config file defines no [[handler]] tables",
            ));
        }

        Ok(config)
    }

    /// The built-in default used when no config file is given: one console
    /// handler at INFO with the default format.
    pub fn default_config() -> Self {
        Self {
            logger: LoggerSection::default(),
            format: FormatSection::default(),
            handlers: vec![HandlerConfig::Console {
                level: Some(Severity::Info),
            }],
        }
    }

    /// Formatter described by the `[format]` section.
    pub fn formatter(&self) -> Formatter {
        let mut formatter = Formatter::new();
        if let Some(template) = &self.format.template {
            formatter = formatter.with_template(template.clone());
        }
        if let Some(timestamp) = &self.format.timestamp {
            formatter = formatter.with_custom_timestamp(timestamp);
        }
        formatter
    }

    /// Facade threshold described by the `[logger]` section (INFO if absent).
    pub fn effective_level(&self) -> Severity {
        self.logger.level.unwrap_or(Severity::Info)
    }
}

/// Build (or fetch from the pool) one sink per `[[handler]]` table.
///
/// Sinks are pooled by their configuration key, so two loggers pointing at
/// the same file share one open handle.
pub fn build_handlers(
    config: &LogConfig,
    manager: &AsyncLogManager,
) -> Result<Vec<SharedHandler>> {
    let formatter = config.formatter();
    let mut handlers = Vec::with_capacity(config.handlers.len());

    for handler_config in &config.handlers {
        let handler = match handler_config {
            HandlerConfig::Console { level } => {
                build_console(manager, level.unwrap_or(Severity::Info), &formatter)?
            }
            HandlerConfig::File { path, level } => {
                build_file(manager, path, level.unwrap_or(Severity::Info), &formatter)?
            }
            HandlerConfig::RotatingFile {
                path,
                level,
                max_bytes,
                backups,
                compress,
            } => build_rotating_file(
                manager,
                path,
                level.unwrap_or(Severity::Info),
                &formatter,
                *max_bytes,
                *backups,
                *compress,
            )?,
        };
        handlers.push(handler);
    }

    Ok(handlers)
}

#[cfg(feature = "console")]
fn build_console(
    manager: &AsyncLogManager,
    level: Severity,
    formatter: &Formatter,
) -> Result<SharedHandler> {
    use crate::handlers::{ConsoleHandler, CONSOLE_KEY};

    let formatter = formatter.clone();
    manager.get_or_create_handler(CONSOLE_KEY, move || {
        Ok(Box::new(ConsoleHandler::new(level).with_formatter(formatter)))
    })
}

#[cfg(not(feature = "console"))]
fn build_console(
    _manager: &AsyncLogManager,
    _level: Severity,
    _formatter: &Formatter,
) -> Result<SharedHandler> {
    Err(LogError::config(
        "handler",
        "console handler requires the 'console' feature",
    ))
}

#[cfg(feature = "file")]
fn build_file(
    manager: &AsyncLogManager,
    path: &Path,
    level: Severity,
    formatter: &Formatter,
) -> Result<SharedHandler> {
    use crate::handlers::{file_key, FileHandler};

    let formatter = formatter.clone();
    let path = path.to_path_buf();
    manager.get_or_create_handler(&file_key(&path), move || {
        Ok(Box::new(
            FileHandler::new(path, level)?.with_formatter(formatter),
        ))
    })
}

#[cfg(not(feature = "file"))]
fn build_file(
    _manager: &AsyncLogManager,
    _path: &Path,
    _level: Severity,
    _formatter: &Formatter,
) -> Result<SharedHandler> {
    Err(LogError::config(
        "handler",
        "file handler requires the 'file' feature",
    ))
}

#[cfg(feature = "file")]
#[allow(clippy::too_many_arguments)]
fn build_rotating_file(
    manager: &AsyncLogManager,
    path: &Path,
    level: Severity,
    formatter: &Formatter,
    max_bytes: Option<u64>,
    backups: Option<usize>,
    compress: Option<bool>,
) -> Result<SharedHandler> {
    use crate::handlers::{rotating_key, RotatingFileHandler, RotationPolicy};

    let defaults = RotationPolicy::default();
    let policy = RotationPolicy {
        max_bytes: max_bytes.unwrap_or(defaults.max_bytes),
        max_backups: backups.unwrap_or(defaults.max_backups),
        compress: compress.unwrap_or(defaults.compress),
    };

    let formatter = formatter.clone();
    let path = path.to_path_buf();
    manager.get_or_create_handler(&rotating_key(&path), move || {
        Ok(Box::new(
            RotatingFileHandler::with_policy(path, level, policy)?.with_formatter(formatter),
        ))
    })
}

#[cfg(not(feature = "file"))]
#[allow(clippy::too_many_arguments)]
fn build_rotating_file(
    _manager: &AsyncLogManager,
    _path: &Path,
    _level: Severity,
    _formatter: &Formatter,
    _max_bytes: Option<u64>,
    _backups: Option<usize>,
    _compress: Option<bool>,
) -> Result<SharedHandler> {
    Err(LogError::config(
        "handler",
        "rotating-file handler requires the 'file' feature",
    ))
}
