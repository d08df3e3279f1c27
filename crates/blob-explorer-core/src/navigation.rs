//! Navigation state for one explorer session.
//!
//! Tracks the current virtual directory and two-step delete confirmations.
//! A confirmation is only valid for the directory view it was requested in:
//! every time the view is recomputed the version is bumped and all pending
//! confirmations are dropped, so a stale click can never delete an entry
//! from a refreshed listing.

use std::collections::HashMap;

use tracing::debug;

use crate::listing::ListingEntry;
use crate::path::parent_of;
use crate::{Error, Result};

/// Scoped confirmation token returned by the first delete request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeleteToken {
    /// Key or prefix awaiting confirmation
    pub key: String,
    /// View version the request was made in
    pub view_version: u64,
}

/// Outcome of [`NavigationState::request_delete`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteRequest {
    /// First request: nothing deleted, ask the user again
    ConfirmationRequired(DeleteToken),
    /// Second request in the same view: the caller should delete now
    Confirmed(DeleteToken),
}

/// Current location and pending delete confirmations
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    current_prefix: String,
    view_version: u64,
    pending: HashMap<String, u64>,
}

impl NavigationState {
    /// Start at the container root with nothing pending
    pub fn new() -> Self {
        Self::default()
    }

    /// Current prefix; empty at the root
    pub fn current_prefix(&self) -> &str {
        &self.current_prefix
    }

    pub fn is_root(&self) -> bool {
        self.current_prefix.is_empty()
    }

    /// Version of the most recently computed directory view
    pub fn view_version(&self) -> u64 {
        self.view_version
    }

    /// Record that the directory view was recomputed.
    ///
    /// Invalidates every pending confirmation and returns the new version.
    pub fn begin_view(&mut self) -> u64 {
        self.view_version += 1;
        if !self.pending.is_empty() {
            debug!(
                "Dropping {} pending delete confirmation(s) on view refresh",
                self.pending.len()
            );
            self.pending.clear();
        }
        self.view_version
    }

    /// Move into a directory entry.
    ///
    /// The directory is not checked for existence; a stale entry simply lists
    /// as empty.
    pub fn enter_directory(&mut self, entry: &ListingEntry) -> Result<()> {
        if !entry.is_directory() {
            return Err(Error::InvalidEntry(format!(
                "'{}' is not a directory",
                entry.name()
            )));
        }
        self.current_prefix = entry.name().to_string();
        self.pending.clear();
        Ok(())
    }

    /// Move to the parent directory. Returns `false` (and changes nothing)
    /// at the root.
    pub fn go_back(&mut self) -> bool {
        if self.is_root() {
            return false;
        }
        self.current_prefix = parent_of(&self.current_prefix);
        self.pending.clear();
        true
    }

    /// Two-step delete: the first call marks `entry` pending, the second call
    /// in the same view confirms it.
    pub fn request_delete(&mut self, entry: &ListingEntry) -> DeleteRequest {
        let key = entry.name().to_string();
        let token = DeleteToken {
            key: key.clone(),
            view_version: self.view_version,
        };

        match self.pending.get(&key) {
            Some(&version) if version == self.view_version => DeleteRequest::Confirmed(token),
            _ => {
                self.pending.insert(key, self.view_version);
                DeleteRequest::ConfirmationRequired(token)
            }
        }
    }

    /// Clear the pending flag for a key, after deletion or on cancel.
    pub fn clear_pending(&mut self, key: &str) -> bool {
        self.pending.remove(key).is_some()
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending
            .get(key)
            .is_some_and(|&version| version == self.view_version)
    }

    /// Back to the root with nothing pending
    pub fn reset(&mut self) {
        self.current_prefix.clear();
        self.pending.clear();
        self.view_version = 0;
    }
}
