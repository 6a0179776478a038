// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{FlushCallback, StdMutex, TerminalGeometry, TerminalSurface, lock_or_recover};
use std::{fmt::{Debug, Formatter},
          sync::Arc};
use strip_ansi_escapes::strip;

/// A [`TerminalSurface`] that records every write.
///
/// By default each write is acknowledged as soon as it is recorded. Call
/// [`Self::with_deferred_acks`] to hold the acknowledgments instead, then release them
/// with [`Self::ack`] (in any order) or [`Self::ack_all`]. This is how tests drive the
/// [`crate::FlowControlWatermark`] across its thresholds.
///
/// Clones share the same recording, so keep a clone after handing one to the engine.
#[derive(Clone, Default)]
pub struct SurfaceMock {
    inner: Arc<StdMutex<SurfaceMockInner>>,
}

#[derive(Default)]
struct SurfaceMockInner {
    geometry: TerminalGeometry,
    writes: Vec<String>,
    defer_acks: bool,
    pending_acks: Vec<Option<FlushCallback>>,
}

impl Debug for SurfaceMock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let inner = lock_or_recover(&self.inner);
        f.debug_struct("SurfaceMock")
            .field("geometry", &inner.geometry)
            .field("write_count", &inner.writes.len())
            .field("defer_acks", &inner.defer_acks)
            .finish_non_exhaustive()
    }
}

impl SurfaceMock {
    #[must_use]
    pub fn new(geometry: TerminalGeometry) -> Self {
        let it = Self::default();
        lock_or_recover(&it.inner).geometry = geometry;
        it
    }

    #[must_use]
    pub fn with_deferred_acks(self) -> Self {
        lock_or_recover(&self.inner).defer_acks = true;
        self
    }

    /// Simulates a resize. Takes effect on the next geometry snapshot.
    pub fn set_geometry(&self, geometry: TerminalGeometry) {
        lock_or_recover(&self.inner).geometry = geometry;
    }

    #[must_use]
    pub fn get_copy_of_writes(&self) -> Vec<String> {
        lock_or_recover(&self.inner).writes.clone()
    }

    /// All writes concatenated, escape sequences included.
    #[must_use]
    pub fn get_copy_of_output(&self) -> String {
        lock_or_recover(&self.inner).writes.concat()
    }

    #[must_use]
    pub fn get_copy_of_output_strip_ansi(&self) -> String {
        let output = self.get_copy_of_output();
        String::from_utf8_lossy(&strip(output.as_bytes())).into_owned()
    }

    #[must_use]
    pub fn write_count(&self) -> usize { lock_or_recover(&self.inner).writes.len() }

    pub fn clear_writes(&self) { lock_or_recover(&self.inner).writes.clear(); }

    /// Number of writes whose acknowledgment is still held back.
    #[must_use]
    pub fn pending_ack_count(&self) -> usize {
        lock_or_recover(&self.inner)
            .pending_acks
            .iter()
            .filter(|it| it.is_some())
            .count()
    }

    /// Acknowledge the write at `write_index` (counting only deferred writes, in the
    /// order they were made). Returns `false` if it was already acknowledged or doesn't
    /// exist.
    pub fn ack(&self, write_index: usize) -> bool {
        // Run the callback after the lock is released.
        let maybe_callback = lock_or_recover(&self.inner)
            .pending_acks
            .get_mut(write_index)
            .and_then(Option::take);
        match maybe_callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    pub fn ack_all(&self) {
        let callbacks: Vec<FlushCallback> = lock_or_recover(&self.inner)
            .pending_acks
            .iter_mut()
            .filter_map(Option::take)
            .collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl TerminalSurface for SurfaceMock {
    fn write(&mut self, text: &str, on_flushed: FlushCallback) {
        let maybe_callback = {
            let mut inner = lock_or_recover(&self.inner);
            inner.writes.push(text.to_string());
            if inner.defer_acks {
                inner.pending_acks.push(Some(on_flushed));
                None
            } else {
                Some(on_flushed)
            }
        };
        if let Some(callback) = maybe_callback {
            callback();
        }
    }

    fn columns(&self) -> u16 { lock_or_recover(&self.inner).geometry.columns }

    fn rows(&self) -> u16 { lock_or_recover(&self.inner).geometry.rows }

    fn tab_stop_width(&self) -> u16 { lock_or_recover(&self.inner).geometry.tab_stop_width }
}
