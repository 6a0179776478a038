// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::HistoryStore;
use std::sync::{Arc,
                atomic::{AtomicUsize, Ordering}};

/// A [`HistoryStore`] whose medium is unavailable: every load and save fails. Counts the
/// save attempts, clones share the count.
#[derive(Debug, Clone, Default)]
pub struct FailingHistoryStore {
    pub save_attempts: Arc<AtomicUsize>,
}

impl FailingHistoryStore {
    #[must_use]
    pub fn save_attempt_count(&self) -> usize { self.save_attempts.load(Ordering::SeqCst) }
}

impl HistoryStore for FailingHistoryStore {
    fn load(&self) -> miette::Result<Vec<String>> {
        Err(miette::miette!("history medium is unavailable"))
    }

    fn save(&self, _entries: &[String]) -> miette::Result<()> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        Err(miette::miette!("history medium is read only"))
    }
}
