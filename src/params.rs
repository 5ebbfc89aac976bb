use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A single parameter binding produced at match time.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Param {
    key: Box<str>,
    value: Box<str>,
}

/// An ordered list of parameter bindings, as returned by a lookup.
///
/// Bindings are ordered the way their wildcards occur in the matched
/// pattern. Both keys and values are owned: that's what lets a `Params` be
/// recycled through a [`Pool`] across lookups against unrelated input
/// paths, without borrowing from either the tree or the queried path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<Param>,
}

impl Params {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self {
            entries: Vec::with_capacity(cap),
        }
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value of the first binding registered under `name`, or
    /// `None` if there is no such binding.
    pub fn try_get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|p| &*p.key == name).map(|p| &*p.value)
    }

    /// Returns the value of the first binding registered under `name`, or
    /// the empty string if there is no such binding.
    pub fn get(&self, name: &str) -> &str {
        self.try_get(name).unwrap_or("")
    }

    /// Iterates over `(key, value)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|p| (&*p.key, &*p.value))
    }

    pub(crate) fn push(&mut self, key: &str, value: &str) {
        self.entries.push(Param {
            key: key.into(),
            value: value.into(),
        });
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A process-safe free list of [`Params`] buffers, sized to the matcher's
/// current maximum parameter count.
///
/// `acquire` hands out an empty buffer; on a successful lookup the caller
/// takes ownership of it, and on a miss the caller should `release` it back.
/// A buffer obtained fresh (the free list was empty) is preallocated with
/// capacity for the highest parameter count registered so far; growth past
/// that after more patterns are added is handled by ordinary `Vec` growth.
#[derive(Debug, Default)]
pub(crate) struct Pool {
    free: Mutex<Vec<Params>>,
    max_params: AtomicUsize,
}

impl Pool {
    pub(crate) fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_params: AtomicUsize::new(0),
        }
    }

    /// Raises the high-water mark used to size freshly allocated buffers.
    pub(crate) fn observe_max_params(&self, n: usize) {
        self.max_params.fetch_max(n, Ordering::Relaxed);
    }

    pub(crate) fn acquire(&self) -> Params {
        let mut free = self.free.lock().unwrap();
        free.pop()
            .unwrap_or_else(|| Params::with_capacity(self.max_params.load(Ordering::Relaxed)))
    }

    pub(crate) fn release(&self, mut params: Params) {
        params.clear();
        self.free.lock().unwrap().push(params);
    }
}
