//! File transport: appends `LEVEL: message` lines to a file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{format_line, lock, Sink};
use crate::logger::Level;

#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write(&self, level: Level, message: &str) {
        let line = format_line(level, message);
        let mut file = lock(&self.file);
        if let Err(e) = writeln!(file, "{}", line) {
            tracing::debug!(path = ?self.path, error = %e, "File transport write failed");
        }
    }
}
