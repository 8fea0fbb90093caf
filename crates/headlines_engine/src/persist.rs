use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("data directory unusable: {0}")]
    DataDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("could not encode stored value: {0}")]
    Encode(String),
    #[error("could not decode stored value: {0}")]
    Decode(String),
}

/// Creates `dir` (and parents) unless it already is a directory.
pub fn ensure_data_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::DataDir(format!(
            "{} exists and is not a directory",
            dir.display()
        ))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => fs::create_dir_all(dir)
            .map_err(|err| PersistError::DataDir(format!("{}: {err}", dir.display()))),
        Err(err) => Err(PersistError::DataDir(format!("{}: {err}", dir.display()))),
    }
}

/// Replaces one file wholesale. Content is staged in a sibling temp file and
/// renamed over the target, so a crash leaves either the old or the new file.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    target: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(target: PathBuf) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn replace(&self, content: &[u8]) -> Result<(), PersistError> {
        let dir = match self.target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        ensure_data_dir(dir)?;

        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(content)?;
        staged.as_file().sync_all()?;
        staged
            .persist(&self.target)
            .map_err(|err| PersistError::Io(err.error))?;
        Ok(())
    }
}
