//! Configurable set of indexable file extensions.

use std::collections::BTreeMap;

use crate::error::{IndexError, Result};
use crate::types::FileKind;

/// Every extension the index knows how to classify.
pub const KNOWN_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "pdf", "csv", "xlsx", "xls",
];

/// Extensions accepted by one deployment, mapped to their kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedKinds {
    by_extension: BTreeMap<String, FileKind>,
}

impl SupportedKinds {
    /// Builds the set from configured extensions. A leading dot and letter
    /// case are ignored; extensions without a known kind are rejected.
    pub fn from_extensions<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut by_extension = BTreeMap::new();
        for raw in extensions {
            let extension = normalize_extension(raw.as_ref());
            if extension.is_empty() {
                continue;
            }
            let kind = FileKind::from_extension(&extension).ok_or_else(|| {
                IndexError::InvalidInput(format!("unsupported file extension: {extension}"))
            })?;
            by_extension.insert(extension, kind);
        }
        if by_extension.is_empty() {
            return Err(IndexError::InvalidInput(
                "at least one file extension must be supported".to_string(),
            ));
        }
        Ok(Self { by_extension })
    }

    /// Returns the kind for an already lower-cased extension.
    pub fn kind_of(&self, extension: &str) -> Option<FileKind> {
        self.by_extension.get(extension).copied()
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.by_extension.keys().map(String::as_str)
    }
}

impl Default for SupportedKinds {
    fn default() -> Self {
        let by_extension = KNOWN_EXTENSIONS
            .iter()
            .filter_map(|ext| FileKind::from_extension(ext).map(|kind| (ext.to_string(), kind)))
            .collect();
        Self { by_extension }
    }
}

fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}
