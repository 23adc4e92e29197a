//! Size-rotating file handler
//!
//! Rotates the active log file once it reaches a configured size, keeping a
//! bounded set of numbered backups (`app.log.1` is the newest) and
//! optionally gzip-compressing them.

use crate::core::{Formatter, Handler, LogError, LogRecord, Result, Severity};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Pool key for a rotating file sink at `path`.
pub fn rotating_key(path: &Path) -> String {
    format!("rotating:{}", path.display())
}

/// Rotation settings: size trigger, backup count, compression.
#[derive(Debug, Clone)]
pub struct RotationPolicy {
    /// Rotate once the active file reaches this many bytes.
    pub max_bytes: u64,
    /// Number of rotated backups to keep.
    pub max_backups: usize,
    /// Gzip rotated backups.
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            max_backups: 5,
            compress: false,
        }
    }
}

pub struct RotatingFileHandler {
    path: PathBuf,
    key: String,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    threshold: Severity,
    formatter: Formatter,
}

impl RotatingFileHandler {
    pub fn new(path: impl Into<PathBuf>, threshold: Severity) -> Result<Self> {
        Self::with_policy(path, threshold, RotationPolicy::default())
    }

    pub fn with_policy(
        path: impl Into<PathBuf>,
        threshold: Severity,
        policy: RotationPolicy,
    ) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let current_size = file.metadata()?.len();
        let key = rotating_key(&path);

        Ok(Self {
            path,
            key,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
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

    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log");
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    fn gz_path(path: &Path) -> PathBuf {
        PathBuf::from(format!("{}.gz", path.display()))
    }

    /// Rotate the active file: shift backups up by one index, move the
    /// current file to `.1` (compressing it when configured), open a fresh
    /// active file.
    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LogError::rotation(
                    self.path.display().to_string(),
                    format!("flush before rotation failed: {}", e),
                )
            })?;
        }

        // Drop the backup that falls off the end.
        let oldest = self.backup_path(self.policy.max_backups);
        let oldest_gz = Self::gz_path(&oldest);
        for stale in [&oldest_gz, &oldest] {
            if stale.exists() {
                if let Err(e) = fs::remove_file(stale) {
                    eprintln!(
                        "[HAPPYLOG WARNING] failed to remove stale backup {}: {}",
                        stale.display(),
                        e
                    );
                }
            }
        }

        // Shift surviving backups: .n -> .n+1, newest last to oldest first.
        for i in (1..self.policy.max_backups).rev() {
            let old = self.backup_path(i);
            let new = self.backup_path(i + 1);
            let old_gz = Self::gz_path(&old);
            let new_gz = Self::gz_path(&new);

            if old_gz.exists() {
                let _ = fs::rename(&old_gz, &new_gz);
            } else if old.exists() {
                let _ = fs::rename(&old, &new);
            }
        }

        if self.path.exists() {
            let backup = self.backup_path(1);
            fs::rename(&self.path, &backup).map_err(|e| {
                LogError::rotation(
                    self.path.display().to_string(),
                    format!("failed to move active file aside: {}", e),
                )
            })?;

            if self.policy.compress {
                self.compress_backup(&backup)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                LogError::rotation(
                    self.path.display().to_string(),
                    format!("failed to open fresh file: {}", e),
                )
            })?;

        self.writer = Some(BufWriter::new(file));
        self.current_size = 0;
        Ok(())
    }

    /// Stream-compress a rotated backup, replacing it with `<name>.gz`.
    ///
    /// The original is only removed after the compressed copy is fully
    /// written, so a failure mid-compression never loses data.
    fn compress_backup(&self, path: &Path) -> Result<()> {
        let gz_path = Self::gz_path(path);
        let tmp_path = PathBuf::from(format!("{}.gz.tmp", path.display()));

        let input = File::open(path)?;
        let mut reader = BufReader::with_capacity(64 * 1024, input);

        let output = File::create(&tmp_path)?;
        let mut encoder = flate2::write::GzEncoder::new(
            BufWriter::with_capacity(64 * 1024, output),
            flate2::Compression::default(),
        );

        let mut buffer = vec![0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut buffer).map_err(|e| {
                let _ = fs::remove_file(&tmp_path);
                LogError::rotation(path.display().to_string(), format!("read failed: {}", e))
            })?;
            if n == 0 {
                break;
            }
            encoder.write_all(&buffer[..n]).map_err(|e| {
                let _ = fs::remove_file(&tmp_path);
                LogError::rotation(path.display().to_string(), format!("compress failed: {}", e))
            })?;
        }

        encoder.finish().map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            LogError::rotation(path.display().to_string(), format!("compress failed: {}", e))
        })?;

        fs::rename(&tmp_path, &gz_path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            LogError::rotation(path.display().to_string(), format!("rename failed: {}", e))
        })?;

        if let Err(e) = fs::remove_file(path) {
            eprintln!(
                "[HAPPYLOG WARNING] compressed {} but could not remove the original: {}",
                path.display(),
                e
            );
        }
        Ok(())
    }
}

impl Handler for RotatingFileHandler {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        if self.current_size >= self.policy.max_bytes {
            if let Err(e) = self.rotate() {
                // A failed rotation must not lose records: warn, reopen the
                // active file if needed, and let it grow past the limit.
                eprintln!(
                    "[HAPPYLOG WARNING] rotation failed: {}. Continuing with current file.",
                    e
                );
                if self.writer.is_none() {
                    let file = OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(&self.path)?;
                    self.writer = Some(BufWriter::new(file));
                }
                self.current_size = 0;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LogError::handler(&self.key, "handler is closed"))?;

        let mut line = self.formatter.render(record);
        line.push('\n');
        writer.write_all(line.as_bytes())?;
        self.current_size += line.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
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

impl Drop for RotatingFileHandler {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
