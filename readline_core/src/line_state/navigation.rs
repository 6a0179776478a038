// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::LineState;
use crate::{ReadlineError, TerminalOutput, lock_or_recover, ok};

impl LineState {
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn move_cursor_back(
        &mut self,
        count: usize,
        term: &mut TerminalOutput,
    ) -> Result<(), ReadlineError> {
        self.cursor = self.cursor.saturating_sub(count);
        self.sync_cursor(term)
    }

    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn move_cursor_forward(
        &mut self,
        count: usize,
        term: &mut TerminalOutput,
    ) -> Result<(), ReadlineError> {
        self.cursor = self.cursor.saturating_add(count).min(self.char_count());
        self.sync_cursor(term)
    }

    /// Start of the visual row the cursor is on. On the first row that is right after
    /// the prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn move_cursor_home(&mut self, term: &mut TerminalOutput) -> Result<(), ReadlineError> {
        let layout = self.layout();
        let row = layout.position_of(self.cursor).row;
        if let Some(offset) = layout.first_offset_on_row(row) {
            self.cursor = offset;
        }
        self.sync_cursor(term)
    }

    /// End of the visual row the cursor is on, ie: before the `\n` that ends it, or
    /// before the last character of a row that wraps.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn move_cursor_end(&mut self, term: &mut TerminalOutput) -> Result<(), ReadlineError> {
        let layout = self.layout();
        let row = layout.position_of(self.cursor).row;
        if let Some(offset) = layout.last_offset_on_row(row) {
            self.cursor = offset;
        }
        self.sync_cursor(term)
    }

    /// End of the whole buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn move_cursor_to_end(&mut self, term: &mut TerminalOutput) -> Result<(), ReadlineError> {
        self.cursor = self.char_count();
        self.sync_cursor(term)
    }

    /// Move up `count` visual rows. Each step taken from the topmost row recalls the
    /// previous (older) history entry instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn move_cursor_up(
        &mut self,
        count: usize,
        term: &mut TerminalOutput,
    ) -> Result<(), ReadlineError> {
        let mut history_changed = false;
        for _ in 0..count {
            let layout = self.layout();
            let current = layout.position_of(self.cursor);
            if current.row == layout.start().row {
                if !self.recall_older_history_entry() {
                    break;
                }
                history_changed = true;
            } else if let Some(offset) =
                layout.offset_on_row_near_col(current.row - 1, current.col)
            {
                self.cursor = offset;
            }
        }
        self.render_after_navigation(history_changed, term)
    }

    /// Move down `count` visual rows. Each step taken from the bottom row recalls the
    /// next (newer) history entry, and past the newest one, the line that was being
    /// typed before history navigation started.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn move_cursor_down(
        &mut self,
        count: usize,
        term: &mut TerminalOutput,
    ) -> Result<(), ReadlineError> {
        let mut history_changed = false;
        for _ in 0..count {
            let layout = self.layout();
            let current = layout.position_of(self.cursor);
            if current.row == layout.end().row {
                if !self.recall_newer_history_entry() {
                    break;
                }
                history_changed = true;
            } else if let Some(offset) =
                layout.offset_on_row_near_col(current.row + 1, current.col)
            {
                self.cursor = offset;
            }
        }
        self.render_after_navigation(history_changed, term)
    }

    fn render_after_navigation(
        &mut self,
        history_changed: bool,
        term: &mut TerminalOutput,
    ) -> Result<(), ReadlineError> {
        if history_changed {
            self.render_and_flush(term)?;
        } else {
            self.sync_cursor(term)?;
        }
        ok!()
    }

    /// Returns `false` when there is no older entry.
    fn recall_older_history_entry(&mut self) -> bool {
        let next_scroll = self.history_scroll.map_or(0, |it| it + 1);
        let Some(entry) = lock_or_recover(&self.safe_history)
            .get_from_newest(next_scroll)
            .map(str::to_string)
        else {
            return false;
        };

        if self.history_scroll.is_none() {
            self.in_progress_snapshot = Some(std::mem::take(&mut self.line));
        }
        self.history_scroll = Some(next_scroll);
        self.replace_line_keep_scroll(entry);
        true
    }

    /// Returns `false` when not navigating history.
    fn recall_newer_history_entry(&mut self) -> bool {
        match self.history_scroll {
            None => false,
            Some(0) => {
                let in_progress = self.in_progress_snapshot.take().unwrap_or_default();
                self.history_scroll = None;
                self.replace_line_keep_scroll(in_progress);
                true
            }
            Some(scroll) => {
                let maybe_entry = lock_or_recover(&self.safe_history)
                    .get_from_newest(scroll - 1)
                    .map(str::to_string);
                match maybe_entry {
                    Some(entry) => {
                        self.history_scroll = Some(scroll - 1);
                        self.replace_line_keep_scroll(entry);
                    }
                    // History shrank underneath us, go back to the in-progress line.
                    None => {
                        self.history_scroll = Some(0);
                        return self.recall_newer_history_entry();
                    }
                }
                true
            }
        }
    }

    fn replace_line_keep_scroll(&mut self, text: String) {
        self.line = text;
        self.cursor = self.char_count();
    }
}
