//! File collections that feed the index.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{IndexError, Result};
use crate::types::FileEntry;

/// Default URL prefix under which result files are served.
pub const DEFAULT_URL_PREFIX: &str = "/data/";

/// A listable set of result files.
pub trait FileCollection: Send + Sync {
    /// Lists every entry of the collection in scan order.
    ///
    /// Fails only when the collection as a whole cannot be enumerated.
    fn list(&self) -> Result<Vec<FileEntry>>;

    /// Returns the servable location of a listed file.
    fn location_of(&self, entry: &FileEntry) -> String;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// A single directory, listed non-recursively.
///
/// Entries are sorted by name so scan order does not depend on the platform's
/// directory iteration order.
#[derive(Debug, Clone)]
pub struct DirectoryCollection {
    root: PathBuf,
    url_prefix: String,
}

impl DirectoryCollection {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_url_prefix(root, DEFAULT_URL_PREFIX)
    }

    pub fn with_url_prefix(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        let mut url_prefix = url_prefix.into();
        if !url_prefix.ends_with('/') {
            url_prefix.push('/');
        }
        Self {
            root: root.into(),
            url_prefix,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileCollection for DirectoryCollection {
    fn list(&self) -> Result<Vec<FileEntry>> {
        let listing_error = |source| IndexError::Listing {
            path: self.root.clone(),
            source,
        };

        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.root).map_err(listing_error)? {
            let dir_entry = match dir_entry {
                Ok(dir_entry) => dir_entry,
                Err(error) => {
                    tracing::debug!(root = %self.root.display(), %error, "skipping unreadable entry");
                    continue;
                }
            };
            let Some(name) = dir_entry.file_name().to_str().map(str::to_string) else {
                tracing::debug!(path = %dir_entry.path().display(), "skipping non-utf8 entry");
                continue;
            };
            // Follows symlinks so linked result files are indexed like regular ones.
            let metadata = match fs::metadata(dir_entry.path()) {
                Ok(metadata) => metadata,
                Err(error) => {
                    tracing::debug!(name = %name, %error, "skipping entry without metadata");
                    continue;
                }
            };
            entries.push(FileEntry {
                name,
                path: dir_entry.path(),
                is_dir: metadata.is_dir(),
                modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn location_of(&self, entry: &FileEntry) -> String {
        format!("{}{}", self.url_prefix, urlencoding::encode(&entry.name))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lists_entries_sorted_by_name() {
        let dir = tempdir().expect("tempdir");
        for name in ["b.png", "a.png", "c.pdf"] {
            std::fs::write(dir.path().join(name), b"x").expect("write");
        }
        std::fs::create_dir(dir.path().join("nested")).expect("mkdir");

        let entries = DirectoryCollection::new(dir.path()).list().expect("list");
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.pdf", "nested"]);
        assert!(entries[3].is_dir);
        assert!(entries[0].modified_at.is_some());
    }

    #[test]
    fn missing_directory_is_a_listing_failure() {
        let dir = tempdir().expect("tempdir");
        let collection = DirectoryCollection::new(dir.path().join("gone"));
        let err = collection.list().unwrap_err();
        assert!(err.is_listing_failure());
    }

    #[test]
    fn location_is_prefixed_and_encoded() {
        let collection = DirectoryCollection::with_url_prefix("/srv/graphs", "/data/graphs");
        let entry = FileEntry::file("A 001__Main.png", "/srv/graphs/A 001__Main.png");
        assert_eq!(collection.location_of(&entry), "/data/graphs/A%20001__Main.png");
    }

    #[test]
    fn default_prefix_is_data() {
        let collection = DirectoryCollection::new("/srv");
        let entry = FileEntry::file("B_002.jpg", "/srv/B_002.jpg");
        assert_eq!(collection.location_of(&entry), "/data/B_002.jpg");
    }
}
