use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use super::{ProgressDocument, ProgressError, parse_progress};

/// Where the progress document lives between launches.
pub trait ProgressStore {
    fn load_progress(&self) -> Result<ProgressDocument, ProgressError>;
    fn save_progress(&mut self, doc: &ProgressDocument) -> Result<(), ProgressError>;
}

/// Pretty-printed JSON on disk. A missing file means first launch.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonFileStore {
    fn load_progress(&self) -> Result<ProgressDocument, ProgressError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => parse_progress(&json),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("no progress at {}, starting fresh", self.path.display());
                Ok(ProgressDocument::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn save_progress(&mut self, doc: &ProgressDocument) -> Result<(), ProgressError> {
        let json = doc.to_json()?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("saved progress to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the serialized document in memory; used by tests and embedders.
#[derive(Default)]
pub struct MemoryStore {
    json: Option<String>,
}

impl MemoryStore {
    pub fn with_json<S: Into<String>>(json: S) -> Self {
        Self {
            json: Some(json.into()),
        }
    }

    pub fn json(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

impl ProgressStore for MemoryStore {
    fn load_progress(&self) -> Result<ProgressDocument, ProgressError> {
        match &self.json {
            Some(json) => parse_progress(json),
            None => Ok(ProgressDocument::new()),
        }
    }

    fn save_progress(&mut self, doc: &ProgressDocument) -> Result<(), ProgressError> {
        self.json = Some(doc.to_json()?);
        Ok(())
    }
}
