// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{HIGH_WATERMARK_DEFAULT, LOW_WATERMARK_DEFAULT, ReadlineError};

/// Tracks bytes written to the terminal surface that it has not acknowledged yet.
///
/// The high water flag is set when the outstanding count goes above `high`, and is only
/// cleared when it drops below `low`. The band between the two keeps the flag from
/// flapping under bursts of small writes.
///
/// Only the aggregate is tracked, so acknowledgments may arrive in any order. This is
/// advisory: writes are never refused, [`Self::accepting_input`] just tells a producer
/// to throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowControlWatermark {
    outstanding_bytes: usize,
    high: usize,
    low: usize,
    is_high_water: bool,
}

impl Default for FlowControlWatermark {
    fn default() -> Self {
        Self {
            outstanding_bytes: 0,
            high: HIGH_WATERMARK_DEFAULT,
            low: LOW_WATERMARK_DEFAULT,
            is_high_water: false,
        }
    }
}

impl FlowControlWatermark {
    /// # Errors
    ///
    /// Returns [`ReadlineError::InvalidWatermark`] unless `low < high`.
    pub fn try_new(high: usize, low: usize) -> Result<Self, ReadlineError> {
        if low >= high {
            return Err(ReadlineError::InvalidWatermark { high, low });
        }
        Ok(Self {
            high,
            low,
            ..Self::default()
        })
    }

    pub fn on_write(&mut self, byte_count: usize) {
        self.outstanding_bytes = self.outstanding_bytes.saturating_add(byte_count);
        if !self.is_high_water && self.outstanding_bytes > self.high {
            self.is_high_water = true;
            tracing::debug!(
                message = "high watermark reached, pausing input",
                outstanding_bytes = self.outstanding_bytes
            );
        }
    }

    /// Floored at zero, an extra acknowledgment can't make the count negative.
    pub fn on_flushed(&mut self, byte_count: usize) {
        self.outstanding_bytes = self.outstanding_bytes.saturating_sub(byte_count);
        if self.is_high_water && self.outstanding_bytes < self.low {
            self.is_high_water = false;
            tracing::debug!(
                message = "low watermark reached, resuming input",
                outstanding_bytes = self.outstanding_bytes
            );
        }
    }

    #[must_use]
    pub fn accepting_input(&self) -> bool { !self.is_high_water }

    #[must_use]
    pub fn is_high_water(&self) -> bool { self.is_high_water }

    #[must_use]
    pub fn outstanding_bytes(&self) -> usize { self.outstanding_bytes }

    #[must_use]
    pub fn thresholds(&self) -> (usize, usize) { (self.high, self.low) }
}
