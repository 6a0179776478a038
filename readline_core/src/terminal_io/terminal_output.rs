// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{TerminalGeometry, TerminalSurface};
use crate::{FlowControlWatermark, SafeWatermark, StdMutex, lock_or_recover};
use std::{borrow::Cow,
          fmt::{Debug, Formatter},
          sync::Arc};

/// The only path from the engine to the [`TerminalSurface`].
///
/// Every write is newline normalized, counted against the [`FlowControlWatermark`], and
/// handed to the surface along with a callback that un-counts the same bytes once the
/// surface has flushed them.
pub struct TerminalOutput {
    surface: Box<dyn TerminalSurface>,
    safe_watermark: SafeWatermark,
}

impl Debug for TerminalOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalOutput")
            .field("geometry", &self.geometry())
            .field("watermark", &*lock_or_recover(&self.safe_watermark))
            .finish()
    }
}

impl TerminalOutput {
    #[must_use]
    pub fn new(surface: Box<dyn TerminalSurface>, safe_watermark: SafeWatermark) -> Self {
        Self {
            surface,
            safe_watermark,
        }
    }

    #[must_use]
    pub fn new_with_default_watermark(surface: Box<dyn TerminalSurface>) -> Self {
        Self::new(
            surface,
            Arc::new(StdMutex::new(FlowControlWatermark::default())),
        )
    }

    /// Empty writes don't reach the surface.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let normalized = normalize_newlines(text);
        let byte_count = normalized.len();

        lock_or_recover(&self.safe_watermark).on_write(byte_count);

        let safe_watermark = self.safe_watermark.clone();
        self.surface.write(
            &normalized,
            Box::new(move || {
                lock_or_recover(&safe_watermark).on_flushed(byte_count);
            }),
        );
    }

    /// Fresh snapshot of the surface dimensions.
    #[must_use]
    pub fn geometry(&self) -> TerminalGeometry { TerminalGeometry::from(&*self.surface) }

    #[must_use]
    pub fn accepting_input(&self) -> bool {
        lock_or_recover(&self.safe_watermark).accepting_input()
    }

    #[must_use]
    pub fn safe_watermark(&self) -> SafeWatermark { self.safe_watermark.clone() }

    /// Give the surface back, eg: when detaching. Acknowledgments still in flight keep
    /// updating the watermark.
    #[must_use]
    pub fn into_surface(self) -> Box<dyn TerminalSurface> { self.surface }
}

/// Rewrite every `\n` that isn't already preceded by `\r` into `\r\n`. A bare line feed
/// moves a terminal down one row without returning to column 0.
#[must_use]
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    let needs_rewrite = text
        .char_indices()
        .any(|(index, ch)| ch == '\n' && !text[..index].ends_with('\r'));
    if !needs_rewrite {
        return Cow::Borrowed(text);
    }

    let mut acc = String::with_capacity(text.len() + 8);
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if ch == '\n' && prev != Some('\r') {
            acc.push('\r');
        }
        acc.push(ch);
        prev = Some(ch);
    }
    Cow::Owned(acc)
}
