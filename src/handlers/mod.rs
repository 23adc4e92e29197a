//! Handler implementations

#[cfg(feature = "console")]
pub mod console;

#[cfg(feature = "file")]
pub mod file;

#[cfg(feature = "file")]
pub mod rotating_file;

#[cfg(feature = "console")]
pub use console::{ConsoleHandler, CONSOLE_KEY};

#[cfg(feature = "file")]
pub use file::{file_key, FileHandler};

#[cfg(feature = "file")]
pub use rotating_file::{rotating_key, RotatingFileHandler, RotationPolicy};

// Re-export the trait for convenience
pub use crate::core::Handler;
