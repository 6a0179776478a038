// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{CursorPosition, LineLayout};
use crate::{SafeHighlighter, SafeHistory, TerminalGeometry};
use std::fmt::{Debug, Formatter};

/// This struct actually handles the line editing, and rendering. It lives for the
/// duration of one read: [`crate::Readline`] creates a new one for every prompt, and
/// drops it once the line is submitted or the read is aborted.
///
/// The cursor is an offset into [`Self::buffer`] counted in Unicode scalar values, and
/// is always in `0..=char_count`. Its on screen position is never stored, it is derived
/// from a [`LineLayout`] whenever it is needed.
///
/// Every operation that changes the buffer or the cursor takes the
/// [`crate::TerminalOutput`] it renders to. Mutations redraw the prompt and buffer,
/// cursor moves only emit the relative motion needed to get from where the cursor was
/// rendered to where it is now.
pub struct LineState {
    pub(super) prompt: String,
    /// Used for all width math, the prompt itself may contain ANSI styling.
    pub(super) prompt_stripped: String,

    /// Unicode line.
    pub(super) line: String,
    pub(super) cursor: usize,

    pub(super) geometry: TerminalGeometry,

    /// Distance from the newest history entry while navigating with Up / Down. `None`
    /// while editing a fresh line.
    pub(super) history_scroll: Option<usize>,
    /// What was being typed when history navigation started, restored by scrolling
    /// Down past the newest entry.
    pub(super) in_progress_snapshot: Option<String>,

    pub(super) safe_history: SafeHistory,
    pub(super) highlighter: SafeHighlighter,

    /// Where the terminal cursor was left by the last write.
    pub(super) rendered_cursor: CursorPosition,

    /// Text printed above the prompt that didn't end in a newline, and the column it
    /// ended at. The next print continues from there.
    pub(super) partial_print_col: Option<usize>,

    pub(super) is_batching: bool,
    pub(super) needs_render: bool,
}

impl Debug for LineState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineState")
            .field("prompt", &self.prompt)
            .field("line", &self.line)
            .field("cursor", &self.cursor)
            .field("geometry", &self.geometry)
            .field("history_scroll", &self.history_scroll)
            .field("rendered_cursor", &self.rendered_cursor)
            .field("is_batching", &self.is_batching)
            .finish_non_exhaustive()
    }
}

impl LineState {
    /// Nothing is written until the first render, see [`Self::render_and_flush`].
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        geometry: TerminalGeometry,
        safe_history: SafeHistory,
        highlighter: SafeHighlighter,
    ) -> Self {
        let prompt = prompt.into();
        let prompt_stripped = strip_ansi_escapes::strip_str(&prompt);
        Self {
            prompt,
            prompt_stripped,
            line: String::new(),
            cursor: 0,
            geometry,
            history_scroll: None,
            in_progress_snapshot: None,
            safe_history,
            highlighter,
            rendered_cursor: CursorPosition::default(),
            partial_print_col: None,
            is_batching: false,
            needs_render: false,
        }
    }

    /// Read only snapshot of the text being edited.
    #[must_use]
    pub fn buffer(&self) -> &str { &self.line }

    /// Cursor offset in characters.
    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    #[must_use]
    pub fn prompt(&self) -> &str { &self.prompt }

    #[must_use]
    pub fn geometry(&self) -> TerminalGeometry { self.geometry }

    #[must_use]
    pub fn history_scroll(&self) -> Option<usize> { self.history_scroll }

    #[must_use]
    pub fn is_batching(&self) -> bool { self.is_batching }

    #[must_use]
    pub fn char_count(&self) -> usize { self.line.chars().count() }

    #[must_use]
    pub fn layout(&self) -> LineLayout {
        LineLayout::compute(&self.prompt_stripped, &self.line, &self.geometry)
    }

    /// Where the cursor is displayed, relative to the start of the prompt.
    #[must_use]
    pub fn cursor_position(&self) -> CursorPosition {
        self.layout().position_of(self.cursor)
    }

    /// Byte index of the character at `char_offset`, or the end of the line.
    pub(super) fn byte_index(&self, char_offset: usize) -> usize {
        self.line
            .char_indices()
            .nth(char_offset)
            .map_or(self.line.len(), |(index, _)| index)
    }

    /// Typing anything after navigating history makes the recalled entry the new
    /// in-progress line.
    pub(super) fn reset_history_scroll(&mut self) {
        self.history_scroll = None;
        self.in_progress_snapshot = None;
    }
}

/// Line breaks are stored as `\n` only, a `\r` would break the wrap math.
pub(super) fn normalize_line_breaks(text: &str) -> std::borrow::Cow<'_, str> {
    if text.contains('\r') {
        std::borrow::Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        std::borrow::Cow::Borrowed(text)
    }
}
