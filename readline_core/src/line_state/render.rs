// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{CursorPosition, LineLayout, LineState};
use crate::{ReadlineError, TerminalOutput, ok};
use crossterm::{QueueableCommand, cursor,
                terminal::{Clear, ClearType}};
use std::{borrow::Cow,
          io::{self, Write}};

impl LineState {
    /// Redraw the prompt and the buffer from scratch, then put the cursor where it
    /// belongs. Inside a batch this only marks the line as needing a render.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn render_and_flush(&mut self, term: &mut TerminalOutput) -> Result<(), ReadlineError> {
        if self.is_batching {
            self.needs_render = true;
            return ok!();
        }

        let mut frame: Vec<u8> = vec![];
        self.queue_render(&mut frame)?;
        write_frame(term, &frame);

        ok!()
    }

    /// Force a full redraw. Doesn't change the buffer or the cursor, so calling it
    /// twice is the same as calling it once.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn refresh(&mut self, term: &mut TerminalOutput) -> Result<(), ReadlineError> {
        self.render_and_flush(term)
    }

    /// Clear the whole screen and redraw the prompt and buffer at the top.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn clear_screen(&mut self, term: &mut TerminalOutput) -> Result<(), ReadlineError> {
        let mut frame: Vec<u8> = vec![];
        frame
            .queue(Clear(ClearType::All))?
            .queue(cursor::MoveTo(0, 0))?;
        self.rendered_cursor = CursorPosition::default();
        self.partial_print_col = None;

        if self.is_batching {
            self.needs_render = true;
        } else {
            self.queue_render(&mut frame)?;
        }
        write_frame(term, &frame);

        ok!()
    }

    /// Erase the prompt and buffer from the screen, leaving the cursor in column 0 of the
    /// row the prompt started on.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn clear_rendered(&mut self, term: &mut TerminalOutput) -> Result<(), ReadlineError> {
        let mut frame: Vec<u8> = vec![];
        self.queue_clear(&mut frame)?;
        write_frame(term, &frame);

        ok!()
    }

    /// Print `text` above the prompt, then redraw the prompt and the line being edited
    /// below it. Text that doesn't end in a newline is continued by the next print.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn print_above(
        &mut self,
        text: &str,
        term: &mut TerminalOutput,
    ) -> Result<(), ReadlineError> {
        if text.is_empty() {
            return ok!();
        }

        let mut frame: Vec<u8> = vec![];
        self.queue_clear(&mut frame)?;

        // If the last print didn't end in a newline, go back to where it stopped.
        if let Some(col) = self.partial_print_col {
            frame
                .queue(cursor::MoveUp(1))?
                .queue(cursor::MoveToColumn(to_u16(col)))?;
        }

        frame.write_all(text.as_bytes())?;

        if text.ends_with('\n') {
            self.partial_print_col = None;
        } else {
            let last_row = text.rsplit('\n').next().unwrap_or(text);
            let start_col = if text.contains('\n') {
                0
            } else {
                self.partial_print_col.unwrap_or(0)
            };
            let end = LineLayout::compute(&" ".repeat(start_col), last_row, &self.geometry);
            // A row that was filled exactly is complete, the prompt goes below it.
            self.partial_print_col = if end.ends_in_pending_wrap {
                None
            } else {
                Some(end.end().col)
            };
            frame.write_all(b"\r\n")?;
        }

        self.rendered_cursor = CursorPosition::default();
        if self.is_batching {
            self.needs_render = true;
            write_frame(term, &frame);
            return ok!();
        }
        self.queue_render(&mut frame)?;
        write_frame(term, &frame);

        ok!()
    }

    /// Change the prompt and redraw.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn update_prompt(
        &mut self,
        prompt: &str,
        term: &mut TerminalOutput,
    ) -> Result<(), ReadlineError> {
        self.prompt.clear();
        self.prompt.push_str(prompt);
        self.prompt_stripped = strip_ansi_escapes::strip_str(prompt);
        self.render_and_flush(term)
    }

    /// Start applying a burst of events (eg: a paste). Until [`Self::end_batch`] state
    /// changes are not rendered.
    pub fn begin_batch(&mut self) { self.is_batching = true; }

    /// Render once if anything changed during the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences can't be encoded.
    pub fn end_batch(&mut self, term: &mut TerminalOutput) -> Result<(), ReadlineError> {
        self.is_batching = false;
        if std::mem::take(&mut self.needs_render) {
            self.render_and_flush(term)?;
        }
        ok!()
    }

    /// Move the rendered cursor to the current cursor offset, using relative motion.
    pub(super) fn sync_cursor(&mut self, term: &mut TerminalOutput) -> Result<(), ReadlineError> {
        if self.is_batching {
            self.needs_render = true;
            return ok!();
        }

        let target = self.cursor_position();
        if target == self.rendered_cursor {
            return ok!();
        }

        let mut frame: Vec<u8> = vec![];
        queue_relative_move(&mut frame, self.rendered_cursor, target)?;
        write_frame(term, &frame);
        self.rendered_cursor = target;

        ok!()
    }

    /// Go to column 0 of the row where the prompt starts, and clear everything below.
    fn queue_clear(&mut self, frame: &mut dyn Write) -> io::Result<()> {
        if let Some(rows_up) = nonzero_u16(self.rendered_cursor.row) {
            frame.queue(cursor::MoveUp(rows_up))?;
        }
        frame
            .queue(cursor::MoveToColumn(0))?
            .queue(Clear(ClearType::FromCursorDown))?;
        self.rendered_cursor = CursorPosition::default();
        Ok(())
    }

    fn queue_render(&mut self, frame: &mut dyn Write) -> io::Result<()> {
        self.queue_clear(frame)?;

        let layout = self.layout();
        let (display_line, display_cursor) = expand_tabs(&self.line, self.cursor, &layout);

        write!(
            frame,
            "{}{}",
            self.highlighter.highlight_prompt(&self.prompt),
            self.highlighter.highlight(&display_line, display_cursor)
        )?;

        // Take the terminal out of its pending wrap state so it agrees with the layout.
        if layout.ends_in_pending_wrap {
            frame.write_all(b"\r\n")?;
        }

        let target = layout.position_of(self.cursor);
        queue_relative_move(frame, layout.end(), target)?;
        self.rendered_cursor = target;

        Ok(())
    }
}

/// The terminal surface expects text, and every escape sequence queued above is ASCII.
fn write_frame(term: &mut TerminalOutput, frame: &[u8]) {
    term.write(&String::from_utf8_lossy(frame));
}

/// Emits nothing when already there. Never emits a zero count, since `CSI 0 A` moves
/// one row on most terminals.
fn queue_relative_move(
    frame: &mut dyn Write,
    from: CursorPosition,
    to: CursorPosition,
) -> io::Result<()> {
    if let Some(rows_up) = nonzero_u16(from.row.saturating_sub(to.row)) {
        frame.queue(cursor::MoveUp(rows_up))?;
    }
    if let Some(rows_down) = nonzero_u16(to.row.saturating_sub(from.row)) {
        frame.queue(cursor::MoveDown(rows_down))?;
    }
    if from.col != to.col {
        frame.queue(cursor::MoveToColumn(to_u16(to.col)))?;
    }
    Ok(())
}

fn to_u16(value: usize) -> u16 { u16::try_from(value).unwrap_or(u16::MAX) }

fn nonzero_u16(value: usize) -> Option<u16> {
    match value {
        0 => None,
        it => Some(to_u16(it)),
    }
}

/// Tabs are written as spaces so that the terminal's own tab handling at the margin
/// can't disagree with the layout. Returns the display text and the cursor offset in it.
fn expand_tabs<'a>(line: &'a str, cursor: usize, layout: &LineLayout) -> (Cow<'a, str>, usize) {
    if layout.tab_widths.is_empty() {
        return (Cow::Borrowed(line), cursor);
    }

    let mut acc = String::with_capacity(line.len() + layout.tab_widths.len() * 8);
    let mut tab_widths = layout.tab_widths.iter();
    let mut display_cursor = cursor;
    for (offset, ch) in line.chars().enumerate() {
        if ch == '\t' {
            let width = tab_widths.next().copied().unwrap_or(1);
            acc.extend(std::iter::repeat_n(' ', width));
            if offset < cursor {
                display_cursor += width.saturating_sub(1);
            }
        } else {
            acc.push(ch);
        }
    }
    (Cow::Owned(acc), display_cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{History, Highlighter, StdMutex, SurfaceMock, TerminalGeometry,
                identity_highlighter};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn setup(columns: u16) -> (LineState, TerminalOutput, SurfaceMock) {
        let surface = SurfaceMock::new(TerminalGeometry::new(columns, 24));
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
    fn test_first_render_writes_prompt() {
        let (mut line_state, mut output, surface) = setup(80);
        line_state.render_and_flush(&mut output).unwrap();
        assert_eq!(surface.get_copy_of_output(), "\x1b[1G\x1b[J> ");
        assert_eq!(surface.get_copy_of_output_strip_ansi(), "> ");
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let (mut line_state, mut output, surface) = setup(80);
        line_state.insert_text("hello", &mut output).unwrap();
        line_state.move_cursor_back(2, &mut output).unwrap();

        surface.clear_writes();
        line_state.refresh(&mut output).unwrap();
        let first = surface.get_copy_of_output();
        let (buffer, cursor) = (line_state.buffer().to_string(), line_state.cursor());

        surface.clear_writes();
        line_state.refresh(&mut output).unwrap();
        assert_eq!(surface.get_copy_of_output(), first);
        assert_eq!(line_state.buffer(), buffer);
        assert_eq!(line_state.cursor(), cursor);
    }

    #[test]
    fn test_render_from_second_row_moves_up_first() {
        let (mut line_state, mut output, surface) = setup(5);
        // "> abcdef" wraps onto a second row on a 5 column terminal.
        line_state.insert_text("abcdef", &mut output).unwrap();
        assert_eq!(line_state.cursor_position(), CursorPosition::new(1, 3));

        surface.clear_writes();
        line_state.refresh(&mut output).unwrap();
        assert!(surface.get_copy_of_output().starts_with("\x1b[1A\x1b[1G\x1b[J"));
    }

    #[test]
    fn test_pending_wrap_emits_crlf() {
        let (mut line_state, mut output, surface) = setup(5);
        line_state.insert_text("abc", &mut output).unwrap();
        assert!(surface.get_copy_of_output().ends_with("> abc\r\n"));
        assert_eq!(line_state.cursor_position(), CursorPosition::new(1, 0));
    }

    #[test]
    fn test_cursor_only_move_is_minimal() {
        let (mut line_state, mut output, surface) = setup(80);
        line_state.insert_text("abc", &mut output).unwrap();

        surface.clear_writes();
        line_state.move_cursor_back(1, &mut output).unwrap();
        // Column 4 is the 5th column.
        assert_eq!(surface.get_copy_of_output(), "\x1b[5G");

        surface.clear_writes();
        line_state.move_cursor_back(10, &mut output).unwrap();
        line_state.move_cursor_back(1, &mut output).unwrap();
        assert_eq!(surface.get_copy_of_output(), "\x1b[3G", "no output once at the start");
    }

    #[test]
    fn test_batch_renders_once() {
        let (mut line_state, mut output, surface) = setup(80);
        line_state.begin_batch();
        line_state.insert_text("one", &mut output).unwrap();
        line_state.insert_text("\n", &mut output).unwrap();
        line_state.insert_text("two", &mut output).unwrap();
        assert_eq!(surface.write_count(), 0);

        line_state.end_batch(&mut output).unwrap();
        assert_eq!(surface.write_count(), 1);
        assert_eq!(surface.get_copy_of_output_strip_ansi(), "> one\ntwo");
    }

    #[test]
    fn test_clear_rendered() {
        let (mut line_state, mut output, surface) = setup(5);
        line_state.insert_text("abcdef", &mut output).unwrap();
        surface.clear_writes();
        line_state.clear_rendered(&mut output).unwrap();
        assert_eq!(surface.get_copy_of_output(), "\x1b[1A\x1b[1G\x1b[J");
    }

    #[test]
    fn test_print_above_redraws_prompt() {
        let (mut line_state, mut output, surface) = setup(80);
        line_state.insert_text("wip", &mut output).unwrap();

        surface.clear_writes();
        line_state.print_above("log line\n", &mut output).unwrap();
        assert_eq!(surface.get_copy_of_output_strip_ansi(), "log line\n> wip");
        assert_eq!(line_state.buffer(), "wip");
    }

    #[test]
    fn test_print_above_continues_partial_line() {
        let (mut line_state, mut output, surface) = setup(80);
        line_state.render_and_flush(&mut output).unwrap();

        line_state.print_above("abc", &mut output).unwrap();
        assert_eq!(line_state.partial_print_col, Some(3));

        surface.clear_writes();
        line_state.print_above("def\n", &mut output).unwrap();
        assert!(
            surface
                .get_copy_of_output()
                .starts_with("\x1b[1G\x1b[J\x1b[1A\x1b[4Gdef\r\n")
        );
        assert_eq!(line_state.partial_print_col, None);
    }

    #[test]
    fn test_highlighter_only_changes_display() {
        struct Brackets;
        impl Highlighter for Brackets {
            fn highlight<'a>(&self, line: &'a str, _cursor: usize) -> Cow<'a, str> {
                Cow::Owned(format!("\x1b[1m{line}\x1b[0m"))
            }
        }

        let surface = SurfaceMock::new(TerminalGeometry::new(80, 24));
        let mut output = TerminalOutput::new_with_default_watermark(Box::new(surface.clone()));
        let mut line_state = LineState::new(
            "> ",
            output.geometry(),
            Arc::new(StdMutex::new(History::default())),
            Arc::new(Brackets),
        );
        line_state.insert_text("hi", &mut output).unwrap();
        assert!(surface.get_copy_of_output().contains("\x1b[1mhi\x1b[0m"));
        assert_eq!(line_state.cursor_position(), CursorPosition::new(0, 4));
    }

    #[test]
    fn test_tabs_are_expanded() {
        let (mut line_state, mut output, surface) = setup(80);
        line_state.insert_text("a\tb", &mut output).unwrap();
        assert_eq!(surface.get_copy_of_output_strip_ansi(), "> a     b");
        assert_eq!(line_state.buffer(), "a\tb");
    }

    #[test]
    fn test_clear_screen() {
        let (mut line_state, mut output, surface) = setup(80);
        line_state.insert_text("x", &mut output).unwrap();
        surface.clear_writes();
        line_state.clear_screen(&mut output).unwrap();
        assert!(surface.get_copy_of_output().starts_with("\x1b[2J\x1b[1;1H"));
        assert_eq!(surface.write_count(), 1);
        assert_eq!(line_state.buffer(), "x");
    }
}
