//! Caller-facing logging facade
//!
//! `HappyLog` is the entry point applications hold on to: leveled log
//! calls, function-trace helpers, level control and configuration loading,
//! all routed through the process-wide [`AsyncLogManager`].
//!
//! The facade is a singleton obtained through [`HappyLog::get`] /
//! [`HappyLog::get_with`]. A `reset` request tears the previous instance
//! down, detaching its handlers and stopping the listener when it was the
//! last user, before a new one is built; it exists so tests can start
//! from a clean slate.

use crate::config::{self, LogConfig};
use crate::core::{AsyncLogManager, LogRecord, Result, Severity};
use crate::shutdown;
use parking_lot::{Mutex, RwLock};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

static INSTANCE: Mutex<Option<Arc<HappyLog>>> = Mutex::new(None);

/// Options accepted by [`HappyLog::get_with`].
#[derive(Debug, Clone)]
pub struct HappyLogOptions {
    /// Path to a configuration file. `None` selects the built-in default
    /// (console handler at INFO).
    pub config_path: Option<PathBuf>,
    /// Logger name records are tagged with.
    pub logger_name: String,
    /// Discard the current instance (tearing it down) before this call.
    pub reset: bool,
}

impl Default for HappyLogOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            logger_name: "root".to_string(),
            reset: false,
        }
    }
}

impl HappyLogOptions {
    #[must_use]
    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_logger_name(mut self, name: impl Into<String>) -> Self {
        self.logger_name = name.into();
        self
    }

    #[must_use]
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }
}

#[derive(Debug)]
pub struct HappyLog {
    logger_name: String,
    config_path: Option<PathBuf>,
    level: RwLock<Severity>,
}

impl HappyLog {
    /// The current facade instance, created with defaults on first use.
    pub fn get() -> Result<Arc<HappyLog>> {
        Self::get_with(HappyLogOptions::default())
    }

    /// The current facade instance, or a new one built from `options`.
    ///
    /// A live instance is returned as-is (its configuration wins); pass
    /// `reset: true` to replace it. Construction failures (a missing or
    /// malformed explicitly-requested config file) leave no instance
    /// behind.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from [`HappyLog::load_config`].
    pub fn get_with(options: HappyLogOptions) -> Result<Arc<HappyLog>> {
        let mut slot = INSTANCE.lock();

        if options.reset {
            if let Some(previous) = slot.take() {
                previous.teardown();
            }
        }

        if let Some(existing) = slot.as_ref() {
            return Ok(Arc::clone(existing));
        }

        let fresh = Arc::new(Self::build(options)?);
        *slot = Some(Arc::clone(&fresh));
        Ok(fresh)
    }

    fn build(options: HappyLogOptions) -> Result<Self> {
        shutdown::install();

        let facade = Self {
            logger_name: options.logger_name,
            config_path: options.config_path,
            level: RwLock::new(Severity::Info),
        };
        facade.load_config()?;
        Ok(facade)
    }

    /// (Re)load configuration: the configured file, or the built-in
    /// default when none was given.
    ///
    /// The previous handler set is fully detached and closed before the
    /// new one is attached, so a reload never double-delivers.
    ///
    /// # Errors
    ///
    /// Fatal on a missing, unreadable or malformed config file.
    pub fn load_config(&self) -> Result<()> {
        let config = match &self.config_path {
            Some(path) => LogConfig::from_file(path)?,
            None => LogConfig::default_config(),
        };

        let manager = AsyncLogManager::global();
        manager.unregister_handlers(&self.logger_name);

        let handlers = config::build_handlers(&config, manager)?;
        manager.register_handlers(self.logger_name.clone(), handlers);

        *self.level.write() = config.effective_level();
        Ok(())
    }

    fn teardown(&self) {
        AsyncLogManager::global().unregister_handlers(&self.logger_name);
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    /// Effective facade threshold.
    pub fn level(&self) -> Severity {
        *self.level.read()
    }

    pub fn set_level(&self, level: Severity) {
        *self.level.write() = level;
    }

    /// Set the threshold from a raw ordinal (0 = CRITICAL .. 5 = TRACE).
    ///
    /// # Errors
    ///
    /// Rejects out-of-range values with [`crate::LogError::InvalidLevel`];
    /// the previous level stays in force.
    pub fn set_level_ordinal(&self, value: i64) -> Result<()> {
        let level = Severity::from_ordinal(value)?;
        self.set_level(level);
        Ok(())
    }

    /// Toggle asynchronous dispatch for the whole process.
    pub fn set_async_enabled(enabled: bool) {
        AsyncLogManager::global().set_async_enabled(enabled);
    }

    /// Route one record through the dispatch manager, if the facade
    /// threshold allows its level.
    pub fn log(&self, level: Severity, message: impl Into<String>) {
        if !self.level.read().allows(level) {
            return;
        }
        AsyncLogManager::global().enqueue(LogRecord::new(
            self.logger_name.clone(),
            level,
            message,
        ));
    }

    #[inline]
    pub fn critical(&self, message: impl Display) {
        self.log(Severity::Critical, message.to_string());
    }

    #[inline]
    pub fn error(&self, message: impl Display) {
        self.log(Severity::Error, message.to_string());
    }

    #[inline]
    pub fn warning(&self, message: impl Display) {
        self.log(Severity::Warning, message.to_string());
    }

    #[inline]
    pub fn info(&self, message: impl Display) {
        self.log(Severity::Info, message.to_string());
    }

    #[inline]
    pub fn debug(&self, message: impl Display) {
        self.log(Severity::Debug, message.to_string());
    }

    #[inline]
    pub fn trace(&self, message: impl Display) {
        self.log(Severity::Trace, message.to_string());
    }

    /// Trace a function entry: `Enter function: <name>`.
    pub fn enter_function(&self, name: &str) {
        self.log(Severity::Trace, format!("Enter function: {}", name));
    }

    /// Trace a function exit: `Exit function: <name>`.
    pub fn exit_function(&self, name: &str) {
        self.log(Severity::Trace, format!("Exit function: {}", name));
    }

    /// Trace a variable value: `var-><name>=<value>`.
    pub fn var(&self, name: &str, value: impl Display) {
        self.log(Severity::Trace, format!("var->{}={}", name, value));
    }

    /// Trace an input value: `input-><name>=<value>`.
    pub fn input(&self, name: &str, value: impl Display) {
        self.log(Severity::Trace, format!("input->{}={}", name, value));
    }

    /// Trace an output value: `output-><name>=<value>`.
    pub fn output(&self, name: &str, value: impl Display) {
        self.log(Severity::Trace, format!("output->{}={}", name, value));
    }
}
