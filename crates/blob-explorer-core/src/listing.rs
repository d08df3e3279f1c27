//! Directory listing data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::path;

/// One row of a directory view.
///
/// Directories are derived from key prefixes and never carry metadata; their
/// name always ends with `/`. File names never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ListingEntry {
    /// Virtual directory inferred from deeper keys
    Directory {
        /// Full prefix, ending with `/`
        name: String,
    },
    /// Object stored directly at this level
    File {
        /// Full object key
        name: String,
        /// Size in bytes
        size: u64,
        /// Last modified timestamp
        last_modified: DateTime<Utc>,
    },
}

impl ListingEntry {
    /// Full key or prefix of this entry
    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name } | Self::File { name, .. } => name,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    pub fn size(&self) -> Option<u64> {
        match self {
            Self::File { size, .. } => Some(*size),
            Self::Directory { .. } => None,
        }
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::File { last_modified, .. } => Some(*last_modified),
            Self::Directory { .. } => None,
        }
    }

    /// Last path segment, as shown in a file list
    pub fn display_name(&self) -> &str {
        path::display_name(self.name())
    }
}

/// Exactly one level of the virtual tree below `prefix`.
///
/// Directories come first, then files, each in byte order of their full key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryView {
    /// Prefix this view was resolved for
    pub prefix: String,
    /// Navigation view version this listing belongs to (0 if standalone)
    pub version: u64,
    /// Directories followed by files
    pub entries: Vec<ListingEntry>,
}

impl DirectoryView {
    pub fn directories(&self) -> impl Iterator<Item = &ListingEntry> {
        self.entries.iter().filter(|e| e.is_directory())
    }

    pub fn files(&self) -> impl Iterator<Item = &ListingEntry> {
        self.entries.iter().filter(|e| !e.is_directory())
    }

    /// Look up an entry by full key or by its display name
    pub fn find(&self, name: &str) -> Option<&ListingEntry> {
        self.entries
            .iter()
            .find(|e| e.name() == name)
            .or_else(|| {
                let wanted = name.trim_end_matches(path::DELIMITER);
                self.entries.iter().find(|e| e.display_name() == wanted)
            })
    }

    /// Sum of file sizes at this level
    pub fn total_file_bytes(&self) -> u64 {
        self.entries.iter().filter_map(ListingEntry::size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Render a byte count the way the file list shows sizes.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
