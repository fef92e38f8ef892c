//! Core record types for the sample index.
//!
//! These are the internal shapes produced by a refresh cycle. The server crate
//! converts them into API payload types for serialization.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label given to files whose name carries no label separator.
pub const MAIN_LABEL: &str = "Main";

/// Project assigned to samples the journal does not know about.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Broad category of an indexed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Vector,
    Document,
    Table,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Vector => "vector",
            Self::Document => "document",
            Self::Table => "table",
        }
    }

    /// Maps a lower-case extension (without the dot) to its kind.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "png" | "jpg" | "jpeg" | "gif" => Some(Self::Image),
            "svg" => Some(Self::Vector),
            "pdf" => Some(Self::Document),
            "csv" | "xlsx" | "xls" => Some(Self::Table),
            _ => None,
        }
    }
}

/// A raw entry returned by a file collection listing.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub modified_at: Option<DateTime<Utc>>,
}

impl FileEntry {
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_dir: false,
            modified_at: None,
        }
    }
}

/// Result of splitting an indexable file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    pub sample_id: String,
    pub label: String,
    pub kind: FileKind,
    pub extension: String,
    /// True when the name carried no label separator.
    pub natural_main: bool,
}

/// A file attached to a sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRef {
    pub label: String,
    pub file_name: String,
    pub location: String,
    pub kind: FileKind,
    pub extension: String,
    pub is_main: bool,
}

/// One sample with all files that belong to it.
///
/// Once `files` is non-empty exactly one entry has `is_main` set, and
/// `has_multiple` is true iff there is more than one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub sample_id: String,
    pub project: String,
    pub description: String,
    pub files: Vec<GraphRef>,
    pub has_multiple: bool,
    pub created_at: DateTime<Utc>,
}

impl SampleRecord {
    pub fn main_file(&self) -> Option<&GraphRef> {
        self.files.iter().find(|file| file.is_main)
    }
}

/// Journal-derived metadata for one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMetadata {
    pub project: String,
    pub description: String,
}

impl Default for SampleMetadata {
    fn default() -> Self {
        Self {
            project: UNCATEGORIZED.to_string(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub description: String,
}

impl ProjectInfo {
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: format!("Project {name}"),
        }
    }

    pub fn uncategorized() -> Self {
        Self {
            name: UNCATEGORIZED.to_string(),
            description: "Samples without project assignment".to_string(),
        }
    }
}
