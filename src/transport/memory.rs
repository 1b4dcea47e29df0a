//! In-process capture transport.

use std::sync::{Arc, Mutex};

use super::{lock, Sink};
use crate::logger::Level;

/// One captured call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    pub level: Level,
    pub message: String,
}

/// Records every message; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<MemoryEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<MemoryEntry> {
        lock(&self.entries).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}

impl Sink for MemorySink {
    fn write(&self, level: Level, message: &str) {
        lock(&self.entries).push(MemoryEntry {
            level,
            message: message.to_string(),
        });
    }
}
