//! Error types for the logging subsystem

pub type Result<T> = std::result::Result<T, LogError>;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Explicitly requested configuration file does not exist
    #[error("log config file not found: {path}")]
    ConfigMissing { path: String },

    /// Configuration file exists but could not be read
    #[error("failed to read log config '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML or has an invalid shape
    #[error("failed to parse log config '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid configuration with details
    #[error("invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Severity ordinal outside the defined range
    #[error("severity ordinal out of range (expected 0..=5): {value}")]
    InvalidLevel { value: i64 },

    /// Unknown severity name
    #[error("unknown severity name: '{name}'")]
    InvalidLevelName { name: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A sink failed while emitting or closing
    #[error("handler '{name}' error: {message}")]
    Handler { name: String, message: String },

    /// File rotation error
    #[error("rotation failed for '{path}': {message}")]
    Rotation { path: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LogError {
    /// Create a config-missing error from a path
    pub fn config_missing(path: impl Into<String>) -> Self {
        LogError::ConfigMissing { path: path.into() }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a handler error
    pub fn handler(name: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::Handler {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a rotation error
    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LogError::Other(msg.into())
    }
}
