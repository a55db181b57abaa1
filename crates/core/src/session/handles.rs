//! Registry of live output handles.
//!
//! Every converted payload is registered here and addressed by an
//! `OutputHandle`. Handles must be released when their item goes away so that
//! repeated conversions do not accumulate payloads.

use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;

/// Dereferenceable reference to a converted payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputHandle(u64);

impl OutputHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OutputHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "output:{}", self.0)
    }
}

/// Owns the payloads behind output handles. Handles are never reused.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    next: u64,
    live: HashMap<OutputHandle, Bytes>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a payload and returns its handle.
    pub fn register(&mut self, bytes: Bytes) -> OutputHandle {
        self.next += 1;
        let handle = OutputHandle(self.next);
        self.live.insert(handle, bytes);
        handle
    }

    /// Returns the payload for a live handle.
    pub fn resolve(&self, handle: OutputHandle) -> Option<Bytes> {
        self.live.get(&handle).cloned()
    }

    /// Releases a handle. Returns false if it was not live.
    pub fn release(&mut self, handle: OutputHandle) -> bool {
        self.live.remove(&handle).is_some()
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
