//! Page-wide store of the last known display state per widget instance.
//!
//! The store outlives the views of the widgets that write to it: when the
//! learner navigates away from a question and back, the new instance reads
//! the entry written by the old one instead of asking the server again.
//! It is a convenience only, the server stays authoritative.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::debug;

use super::contract::CacheEntry;

pub trait ResponseStore {
    fn get(&self, instance_id: &str) -> Option<CacheEntry>;

    /// Overwrites any previous entry for `instance_id`.
    fn put(&self, instance_id: &str, entry: CacheEntry);
}

/// In-memory store for one learning sequence page.
///
/// Single-threaded like the event loop that drives the widgets; share it
/// between instances with `Rc`.
#[derive(Debug, Default)]
pub struct SequenceCache {
    entries: RefCell<HashMap<String, CacheEntry>>,
}

impl SequenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl ResponseStore for SequenceCache {
    fn get(&self, instance_id: &str) -> Option<CacheEntry> {
        self.entries.borrow().get(instance_id).cloned()
    }

    fn put(&self, instance_id: &str, entry: CacheEntry) {
        debug!(instance_id, progress = %entry.problem_progress, "caching response state");
        self.entries.borrow_mut().insert(instance_id.to_string(), entry);
    }
}
