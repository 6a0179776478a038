// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{CursorPosition, LineState, core::normalize_line_breaks};
use crate::{ReadlineError, TerminalOutput, ok};
use unicode_segmentation::UnicodeSegmentation;

impl LineState {
    /// Splice `text` in at the cursor and move the cursor past it. `\r\n` and `\r` are
    /// stored as `\n`.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn insert_text(&mut self, text: &str, term: &mut TerminalOutput) -> Result<(), ReadlineError> {
        if text.is_empty() {
            return ok!();
        }

        let text = normalize_line_breaks(text);
        let byte_index = self.byte_index(self.cursor);
        self.line.insert_str(byte_index, &text);
        self.cursor += text.chars().count();
        self.reset_history_scroll();

        self.render_and_flush(term)
    }

    /// Remove up to `count` characters before the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn backspace(&mut self, count: usize, term: &mut TerminalOutput) -> Result<(), ReadlineError> {
        let count = count.min(self.cursor);
        if count == 0 {
            return ok!();
        }

        let start = self.byte_index(self.cursor - count);
        let end = self.byte_index(self.cursor);
        self.line.replace_range(start..end, "");
        self.cursor -= count;
        self.reset_history_scroll();

        self.render_and_flush(term)
    }

    /// Remove up to `count` characters after the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn forward_delete(
        &mut self,
        count: usize,
        term: &mut TerminalOutput,
    ) -> Result<(), ReadlineError> {
        let count = count.min(self.char_count() - self.cursor);
        if count == 0 {
            return ok!();
        }

        let start = self.byte_index(self.cursor);
        let end = self.byte_index(self.cursor + count);
        self.line.replace_range(start..end, "");
        self.reset_history_scroll();

        self.render_and_flush(term)
    }

    /// Remove from the cursor up to the next `\n`, or the end of the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn delete_to_end_of_line(
        &mut self,
        term: &mut TerminalOutput,
    ) -> Result<(), ReadlineError> {
        let start = self.byte_index(self.cursor);
        let end = self.line[start..]
            .find('\n')
            .map_or(self.line.len(), |it| start + it);
        if start == end {
            return ok!();
        }

        self.line.replace_range(start..end, "");
        self.reset_history_scroll();

        self.render_and_flush(term)
    }

    /// Remove the word before the cursor, and any whitespace between it and the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn kill_word_backward(
        &mut self,
        term: &mut TerminalOutput,
    ) -> Result<(), ReadlineError> {
        let end = self.byte_index(self.cursor);
        let before_cursor = &self.line[..end];
        let start = before_cursor
            .trim_end()
            .split_word_bound_indices()
            .next_back()
            .map_or(0, |(index, _)| index);
        if start == end {
            return ok!();
        }

        let removed_char_count = self.line[start..end].chars().count();
        self.line.replace_range(start..end, "");
        self.cursor -= removed_char_count;
        self.reset_history_scroll();

        self.render_and_flush(term)
    }

    /// Replace the whole buffer and put the cursor at its end.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn update(&mut self, text: &str, term: &mut TerminalOutput) -> Result<(), ReadlineError> {
        self.line = normalize_line_breaks(text).into_owned();
        self.cursor = self.char_count();
        self.reset_history_scroll();

        self.render_and_flush(term)
    }

    /// Move past the end of the buffer and onto a fresh row, so whatever is written next
    /// doesn't overwrite the submitted line. Returns the submitted text.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn submit_line(&mut self, term: &mut TerminalOutput) -> Result<String, ReadlineError> {
        self.move_cursor_to_end(term)?;
        // A pending wrap was already turned into a new row by the render.
        if !self.layout().ends_in_pending_wrap {
            term.write("\n");
        }
        self.rendered_cursor = CursorPosition::default();
        Ok(std::mem::take(&mut self.line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{History, StdMutex, SurfaceMock, TerminalGeometry, identity_highlighter};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn setup() -> (LineState, TerminalOutput, SurfaceMock) {
        let surface = SurfaceMock::new(TerminalGeometry::new(80, 24));
        let output = TerminalOutput::new_with_default_watermark(Box::new(surface.clone()));
        let line_state = LineState::new(
            "> ",
            output.geometry(),
            Arc::new(StdMutex::new(History::default())),
            identity_highlighter(),
        );
        (line_state, output, surface)
    }

    #[test]
    fn test_insert_in_the_middle() {
        let (mut line_state, mut output, _) = setup();
        line_state.insert_text("held", &mut output).unwrap();
        line_state.move_cursor_back(2, &mut output).unwrap();
        line_state.insert_text("llo wor", &mut output).unwrap();
        assert_eq!(line_state.buffer(), "hello world");
        assert_eq!(line_state.cursor(), 9);
    }

    #[test]
    fn test_insert_multibyte() {
        let (mut line_state, mut output, _) = setup();
        line_state.insert_text("héllo😀", &mut output).unwrap();
        assert_eq!(line_state.cursor(), 6);
        line_state.backspace(1, &mut output).unwrap();
        assert_eq!(line_state.buffer(), "héllo");
        line_state.move_cursor_back(3, &mut output).unwrap();
        line_state.backspace(1, &mut output).unwrap();
        assert_eq!(line_state.buffer(), "hllo");
        assert_eq!(line_state.cursor(), 1);
    }

    #[test]
    fn test_backspace_and_forward_delete_clamp() {
        let (mut line_state, mut output, surface) = setup();
        line_state.insert_text("abc", &mut output).unwrap();

        line_state.backspace(10, &mut output).unwrap();
        assert_eq!(line_state.buffer(), "");
        assert_eq!(line_state.cursor(), 0);

        surface.clear_writes();
        line_state.backspace(1, &mut output).unwrap();
        line_state.forward_delete(1, &mut output).unwrap();
        assert_eq!(surface.write_count(), 0, "no-ops at the boundaries");

        line_state.insert_text("xyz", &mut output).unwrap();
        line_state.move_cursor_back(2, &mut output).unwrap();
        line_state.forward_delete(5, &mut output).unwrap();
        assert_eq!(line_state.buffer(), "x");
        assert_eq!(line_state.cursor(), 1);
    }

    #[test]
    fn test_delete_to_end_of_line_stops_at_newline() {
        let (mut line_state, mut output, _) = setup();
        line_state.insert_text("one two\nthree", &mut output).unwrap();
        line_state.move_cursor_back(10, &mut output).unwrap();
        assert_eq!(line_state.cursor(), 3);

        line_state.delete_to_end_of_line(&mut output).unwrap();
        assert_eq!(line_state.buffer(), "one\nthree");
        assert_eq!(line_state.cursor(), 3);

        line_state.move_cursor_to_end(&mut output).unwrap();
        line_state.move_cursor_back(2, &mut output).unwrap();
        line_state.delete_to_end_of_line(&mut output).unwrap();
        assert_eq!(line_state.buffer(), "one\nthr");
    }

    #[test]
    fn test_kill_word_backward() {
        let (mut line_state, mut output, _) = setup();
        line_state.insert_text("git commit  ", &mut output).unwrap();
        line_state.kill_word_backward(&mut output).unwrap();
        assert_eq!(line_state.buffer(), "git ");
        assert_eq!(line_state.cursor(), 4);

        line_state.kill_word_backward(&mut output).unwrap();
        assert_eq!(line_state.buffer(), "");

        line_state.kill_word_backward(&mut output).unwrap();
        assert_eq!(line_state.buffer(), "");
    }

    #[test]
    fn test_kill_word_backward_keeps_text_after_cursor() {
        let (mut line_state, mut output, _) = setup();
        line_state.insert_text("foo bar baz", &mut output).unwrap();
        line_state.move_cursor_back(4, &mut output).unwrap();
        line_state.kill_word_backward(&mut output).unwrap();
        assert_eq!(line_state.buffer(), "foo  baz");
        assert_eq!(line_state.cursor(), 4);
    }

    #[test]
    fn test_update_replaces_buffer() {
        let (mut line_state, mut output, _) = setup();
        line_state.insert_text("old", &mut output).unwrap();
        line_state.update("brand\r\nnew", &mut output).unwrap();
        assert_eq!(line_state.buffer(), "brand\nnew");
        assert_eq!(line_state.cursor(), 9);

        line_state.update("", &mut output).unwrap();
        assert_eq!(line_state.buffer(), "");
        assert_eq!(line_state.cursor(), 0);
    }

    #[test]
    fn test_submit_line_moves_below() {
        let (mut line_state, mut output, surface) = setup();
        line_state.insert_text("ab\ncd", &mut output).unwrap();
        line_state.move_cursor_back(4, &mut output).unwrap();

        surface.clear_writes();
        let line = line_state.submit_line(&mut output).unwrap();
        assert_eq!(line, "ab\ncd");
        assert_eq!(surface.get_copy_of_output(), "\x1b[1B\x1b[3G\r\n");
    }
}
