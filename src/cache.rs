//! Session-scoped cache of resolved asset locators.
//!
//! The cache is owned by whoever owns the loader (normally the application
//! root), so its lifetime is the page session rather than the process.
//! Entries are keyed by the logical asset path and only ever hold real
//! locators; placeholders are never cached, so a failed load is retried on
//! the next request.
//!
//! By default the cache is unbounded. With a capacity it evicts the least
//! recently used entry.
//!
//! Loads that are still running are kept next to the entries as shared
//! futures, so every caller asking for the same key awaits one fetch.

use crate::asset::Locator;
use crate::error::AssetError;
use futures::future::{LocalBoxFuture, Shared};
use lru::LruCache;
use std::cell::RefCell;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::rc::Rc;

/// A fetch in progress, awaitable by any number of callers.
pub type PendingLoad = Shared<LocalBoxFuture<'static, Result<Locator, AssetError>>>;

#[derive(Clone)]
pub struct MediaCache {
    entries: Rc<RefCell<LruCache<String, Locator>>>,
    in_flight: Rc<RefCell<HashMap<String, PendingLoad>>>,
}

impl MediaCache {
    pub fn new(capacity: Option<NonZeroUsize>) -> Self {
        let entries = match capacity {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self {
            entries: Rc::new(RefCell::new(entries)),
            in_flight: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Look up a locator, marking it as recently used.
    pub fn get(&self, path: &str) -> Option<Locator> {
        self.entries.borrow_mut().get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.borrow().contains(path)
    }

    /// Store `locator` unless the key is already cached.
    ///
    /// Returns the locator that is cached afterwards, so concurrent loads of
    /// the same key all hand out one shared value.
    pub fn insert_if_absent(&self, path: &str, locator: Locator) -> Locator {
        let mut entries = self.entries.borrow_mut();
        if let Some(existing) = entries.get(path) {
            return existing.clone();
        }
        entries.put(path.to_string(), locator.clone());
        locator
    }

    /// The running load for `path`, if any.
    pub fn pending(&self, path: &str) -> Option<PendingLoad> {
        self.in_flight.borrow().get(path).cloned()
    }

    /// Register `load` as the running load for `path`.
    pub fn begin_load(&self, path: &str, load: PendingLoad) {
        self.in_flight.borrow_mut().insert(path.to_string(), load);
    }

    pub fn finish_load(&self, path: &str) {
        self.in_flight.borrow_mut().remove(path);
    }

    pub fn is_loading(&self, path: &str) -> bool {
        self.in_flight.borrow().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Whether both handles refer to the same underlying cache.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }
}

impl Default for MediaCache {
    fn default() -> Self {
        Self::unbounded()
    }
}
