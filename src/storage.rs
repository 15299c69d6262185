//! Loading and saving the outline file.
//!
//! A save first copies the existing file to a backup path (when a suffix is
//! configured), then writes the new contents to a temporary file in the same
//! directory and renames it into place, so a crash never leaves a half-written outline.

use crate::codec;
use crate::error::{OutlineError, OutlineResult};
use crate::store::OutlineStore;
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
/// Location of the outline on disk and its backup policy.
pub struct OutlineFile {
    path: PathBuf,
    backup_suffix: Option<String>,
}

impl OutlineFile {
    #[must_use]
    /// Describes an outline file; an empty suffix disables backups.
    pub fn new(path: impl Into<PathBuf>, backup_suffix: &str) -> Self {
        Self {
            path: path.into(),
            backup_suffix: (!backup_suffix.is_empty()).then(|| backup_suffix.to_string()),
        }
    }

    #[must_use]
    /// Path of the outline file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    /// Path the previous version is copied to before a save, if backups are enabled.
    pub fn backup_path(&self) -> Option<PathBuf> {
        self.backup_suffix.as_ref().map(|suffix| {
            let mut name = self.path.clone().into_os_string();
            name.push(suffix);
            PathBuf::from(name)
        })
    }

    fn io_error(&self, source: std::io::Error) -> OutlineError {
        OutlineError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Reads and decodes the outline file into a ready-to-use store.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Io`] if the file cannot be read and
    /// [`OutlineError::Format`] if its contents are malformed.
    pub fn load(&self) -> OutlineResult<OutlineStore> {
        let text = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let store = OutlineStore::from_decoded(codec::decode(&text)?);
        let (count, depth) = store.analyze();
        info!("Loaded {:?} ({count} items, depth {depth}).", self.path);
        Ok(store)
    }

    /// Loads the outline, or starts an empty one when the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns any load error other than the file being absent.
    pub fn load_or_init(&self) -> OutlineResult<OutlineStore> {
        match self.load() {
            Err(err) if err.is_not_found() => {
                info!(
                    "Unable to find {:?}; starting an empty outline instead.",
                    self.path
                );
                Ok(OutlineStore::new())
            }
            other => other,
        }
    }

    /// Writes the outline to disk and clears the store's dirty flag.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Io`] if the backup copy or the write fails; the store
    /// stays dirty in that case.
    pub fn save(&self, store: &mut OutlineStore) -> OutlineResult<()> {
        if let Some(backup) = self.backup_path() {
            if self.path.exists() {
                fs::copy(&self.path, &backup).map_err(|e| self.io_error(e))?;
                debug!("backed up {:?} to {:?}", self.path, backup);
            }
        }

        let text = codec::encode(store);
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(text.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        store.mark_saved();
        info!("Saved to {:?}.", self.path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/storage.rs"]
mod tests;
