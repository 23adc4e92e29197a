//! File handler implementation

use crate::core::{Formatter, Handler, LogError, LogRecord, Result, Severity};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Pool key for a plain file sink at `path`.
pub fn file_key(path: &Path) -> String {
    format!("file:{}", path.display())
}

pub struct FileHandler {
    path: PathBuf,
    key: String,
    writer: Option<BufWriter<File>>,
    threshold: Severity,
    formatter: Formatter,
}

impl FileHandler {
    /// Open `path` for appending, creating parent directories as needed.
    pub fn new(path: impl Into<PathBuf>, threshold: Severity) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let key = file_key(&path);

        Ok(Self {
            path,
            key,
            writer: Some(BufWriter::new(file)),
            threshold,
            formatter: Formatter::default(),
        })
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Handler for FileHandler {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LogError::handler(&self.key, "handler is closed"))?;

        let mut line = self.formatter.render(record);
        line.push('\n');
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // Taking the writer makes a second close a no-op and releases the
        // file handle immediately.
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn threshold(&self) -> Severity {
        self.threshold
    }

    fn set_threshold(&mut self, level: Severity) {
        self.threshold = level;
    }

    fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for FileHandler {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
