//! Virtual directory resolution.
//!
//! Turns the flat, recursive listing of every key under a prefix into one
//! level of a directory tree: the immediate child directories (inferred from
//! deeper keys) and the files stored directly at that level.

use std::collections::{BTreeMap, BTreeSet};

use futures::StreamExt;
use tracing::debug;

use crate::listing::{DirectoryView, ListingEntry};
use crate::path::{normalize_prefix, DELIMITER};
use crate::storage::{RawObject, StorageBackend};
use crate::Result;

/// Partition raw objects below `prefix` into one directory level.
///
/// `prefix` must already be normalized (empty or ending with `/`). Objects
/// that do not start with the prefix are ignored, as is a placeholder object
/// whose key equals the prefix. Keys ending with `/` are directory markers
/// and only ever produce a directory entry.
pub fn resolve<I>(prefix: &str, objects: I) -> DirectoryView
where
    I: IntoIterator<Item = RawObject>,
{
    let mut resolver = LevelResolver::new(prefix);
    for object in objects {
        resolver.push(object);
    }
    resolver.finish()
}

/// List and resolve one level of the tree below `prefix`.
///
/// The prefix is normalized first. A prefix with nothing beneath it yields an
/// empty view rather than an error.
pub async fn list_directory(backend: &dyn StorageBackend, prefix: &str) -> Result<DirectoryView> {
    let prefix = normalize_prefix(prefix);
    let mut resolver = LevelResolver::new(&prefix);

    let mut scanned = 0usize;
    let mut listing = backend.list(&prefix);
    while let Some(object) = listing.next().await {
        resolver.push(object?);
        scanned += 1;
    }

    let view = resolver.finish();
    debug!(
        "Resolved '{}': {} entries from {} objects",
        prefix,
        view.len(),
        scanned
    );
    Ok(view)
}

/// Incremental resolver so listings can be consumed as a stream.
struct LevelResolver {
    prefix: String,
    directories: BTreeSet<String>,
    files: BTreeMap<String, RawObject>,
}

impl LevelResolver {
    fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            directories: BTreeSet::new(),
            files: BTreeMap::new(),
        }
    }

    fn push(&mut self, object: RawObject) {
        let Some(relative) = object.key.strip_prefix(self.prefix.as_str()) else {
            return;
        };
        if relative.is_empty() {
            return;
        }

        match relative.find(DELIMITER) {
            Some(idx) => {
                let dir = format!("{}{}{}", self.prefix, &relative[..idx], DELIMITER);
                self.directories.insert(dir);
            }
            None => {
                self.files.insert(object.key.clone(), object);
            }
        }
    }

    fn finish(self) -> DirectoryView {
        let mut entries = Vec::with_capacity(self.directories.len() + self.files.len());
        entries.extend(
            self.directories
                .into_iter()
                .map(|name| ListingEntry::Directory { name }),
        );
        entries.extend(self.files.into_values().map(|o| ListingEntry::File {
            name: o.key,
            size: o.size,
            last_modified: o.last_modified,
        }));

        DirectoryView {
            prefix: self.prefix,
            version: 0,
            entries,
        }
    }
}
