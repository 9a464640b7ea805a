// src/output/native.rs

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{AdditionsError, Result};
use crate::output::file::{FileOutput, FileSink};
use crate::types::WriteMode;

/// A file opened directly on the local file system.
#[derive(Debug)]
pub struct NativeFile {
    path: PathBuf,
    file: File,
}

impl NativeFile {
    /// `Append` creates the file if needed and keeps its content; `Reset`
    /// truncates it.
    pub fn open(path: impl AsRef<Path>, mode: WriteMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        match mode {
            WriteMode::Append => options.create(true).append(true),
            WriteMode::Reset => options.create(true).write(true).truncate(true),
        };

        let file = options.open(&path).map_err(|e| AdditionsError::FileOpen {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileSink for NativeFile {
    fn target(&self) -> String {
        self.path.display().to_string()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.file.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}

/// Output writing to a local file.
pub type NativeFileOutput = FileOutput<NativeFile>;

impl FileOutput<NativeFile> {
    pub fn new(path: impl AsRef<Path>, mode: WriteMode) -> Result<Self> {
        Ok(Self::from_sink(NativeFile::open(path, mode)?, mode))
    }

    pub fn path(&self) -> &Path {
        self.sink().path()
    }
}
