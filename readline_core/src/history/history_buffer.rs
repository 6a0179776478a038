// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::HistoryStore;
use crate::HISTORY_CAPACITY_DEFAULT;
use std::collections::VecDeque;

/// Bounded, ordered store of submitted lines. Oldest first, newest last.
///
/// This is shared by every read in a session (see [`crate::SafeHistory`]) and is only
/// mutated by [`History::append`] when a line is submitted. Navigating history with
/// Up / Down is read only from the point of view of this struct: the "current position"
/// lives in [`crate::LineState`].
#[derive(Debug)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
    store: Option<Box<dyn HistoryStore>>,
}

impl Default for History {
    fn default() -> Self { Self::new(HISTORY_CAPACITY_DEFAULT) }
}

impl History {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            store: None,
        }
    }

    /// Create a history that can [`restore`](Self::restore) from and
    /// [`persist`](Self::persist) to `store`. Nothing is loaded until `restore` is called.
    #[must_use]
    pub fn with_store(capacity: usize, store: Box<dyn HistoryStore>) -> Self {
        Self {
            store: Some(store),
            ..Self::new(capacity)
        }
    }

    /// Add `line` as the newest entry, evicting the oldest one on overflow. Blank lines
    /// and a repeat of the newest entry are not recorded. Returns whether the line was
    /// added.
    pub fn append(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            return false;
        }
        if self.entries.back().is_some_and(|newest| newest == line) {
            return false;
        }

        self.entries.push_back(line.to_string());
        self.evict_overflow();
        true
    }

    /// The entry `distance` steps away from the newest. `0` is the newest entry.
    #[must_use]
    pub fn get_from_newest(&self, distance: usize) -> Option<&str> {
        let index = self.entries.len().checked_sub(distance + 1)?;
        self.entries.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[must_use]
    pub fn capacity(&self) -> usize { self.capacity }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<String> { self.entries.iter().cloned().collect() }

    /// Change the capacity. Shrinking drops the oldest entries.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.evict_overflow();
    }

    /// Replace the entries with what the store holds. A missing store, or a store that
    /// fails to load, leaves the history empty. This never fails session start.
    pub fn restore(&mut self) {
        self.entries.clear();

        let Some(store) = &self.store else {
            return;
        };

        match store.load() {
            Ok(loaded) => {
                for line in loaded.iter().filter(|it| !it.trim().is_empty()) {
                    self.entries.push_back(line.clone());
                }
                self.evict_overflow();
                tracing::debug!(message = "history restored", count = self.entries.len());
            }
            Err(report) => {
                tracing::warn!(
                    message = "could not restore history, starting empty",
                    error = ?report
                );
            }
        }
    }

    /// Save the entries to the store. A failure is logged and otherwise ignored, the
    /// in memory history stays correct for the rest of the session.
    pub fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };

        if let Err(report) = store.save(&self.to_vec()) {
            tracing::warn!(message = "could not persist history", error = ?report);
        }
    }

    fn evict_overflow(&mut self) {
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }
}
