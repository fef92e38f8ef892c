//! JSON journal cache.

use std::fs;
use std::path::{Path, PathBuf};

use super::{Journal, JournalSource};
use crate::error::{IndexError, Result};

impl Journal {
    /// Writes the whole journal as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|error| {
            IndexError::JournalUnavailable(format!("failed to read {}: {error}", path.display()))
        })?;
        serde_json::from_str(&data).map_err(|error| {
            IndexError::JournalUnavailable(format!("failed to parse {}: {error}", path.display()))
        })
    }
}

/// Reads a journal previously written with [`Journal::save_json`].
#[derive(Debug, Clone)]
pub struct JsonJournal {
    path: PathBuf,
}

impl JsonJournal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl JournalSource for JsonJournal {
    fn load(&self) -> Result<Journal> {
        Journal::load_json(&self.path)
    }

    fn describe(&self) -> String {
        format!("json journal {}", self.path.display())
    }
}
