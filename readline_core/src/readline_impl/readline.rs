// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{CheckHandler, PauseHandler, ReadLineFuture, ReadLineResult, ReadlineError,
            UnrecognizedHandler, accept_all_check_handler};
use crate::{CursorMove, DeleteDirection, EditEvent, History, KillScope, LineState,
            PinnedInputStream, ReadlineConfig, SafeHighlighter, SafeHistory, SafeWatermark,
            StdMutex, TerminalOutput, TerminalSurface, decode_chunk, identity_highlighter,
            lock_or_recover, ok};
use futures_util::StreamExt;
use std::{fmt::{Debug, Formatter},
          sync::Arc};
use tokio::sync::oneshot;

/// A line editing session.
///
/// 1. [`Self::attach`] a [`TerminalSurface`].
/// 2. [`Self::read`] with a prompt. This renders the prompt and returns a
///    [`ReadLineFuture`].
/// 3. Feed raw terminal input to [`Self::handle_data`] until the future resolves.
///
/// There is at most one read in flight. Starting a new one aborts the previous one, and
/// so do [`Self::abort`] and [`Self::detach`]. Once a read is resolved no input can
/// reach it again.
///
/// Everything happens on the caller's thread, inside these `&mut self` methods. The
/// only thing that can happen elsewhere is the surface acknowledging a write, which
/// only touches the shared [`SafeWatermark`].
pub struct Readline {
    output: Option<TerminalOutput>,
    safe_watermark: SafeWatermark,
    safe_history: SafeHistory,
    highlighter: SafeHighlighter,
    check_handler: CheckHandler,
    pause_handler: Option<PauseHandler>,
    unrecognized_handler: Option<UnrecognizedHandler>,
    active_read: Option<ActiveRead>,
}

/// The read in flight, and the line being edited for it.
struct ActiveRead {
    line_state: LineState,
    sender: oneshot::Sender<ReadLineResult>,
}

impl Debug for Readline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Readline")
            .field("output", &self.output)
            .field("history_len", &lock_or_recover(&self.safe_history).len())
            .field(
                "line_state",
                &self.active_read.as_ref().map(|it| &it.line_state),
            )
            .finish_non_exhaustive()
    }
}

impl Readline {
    /// History comes from [`ReadlineConfig::history_file`] when it is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn new(config: &ReadlineConfig) -> miette::Result<Self> {
        config.validate()?;
        Self::new_with_history(config, config.create_history())
    }

    /// Use `history` (eg: one backed by an [`crate::InMemoryHistoryStore`]) instead of
    /// the one described by the config.
    ///
    /// # Errors
    ///
    /// Returns an error if the watermark thresholds in the config are invalid.
    pub fn new_with_history(config: &ReadlineConfig, history: History) -> miette::Result<Self> {
        let watermark = config.try_create_watermark()?;
        Ok(Self {
            output: None,
            safe_watermark: Arc::new(StdMutex::new(watermark)),
            safe_history: Arc::new(StdMutex::new(history)),
            highlighter: identity_highlighter(),
            check_handler: accept_all_check_handler(),
            pause_handler: None,
            unrecognized_handler: None,
            active_read: None,
        })
    }

    /// Start rendering to `surface`. Replaces (and detaches) any surface that was
    /// already attached.
    pub fn attach(&mut self, surface: Box<dyn TerminalSurface>) {
        if self.output.is_some() {
            drop(self.detach());
        }
        self.output = Some(TerminalOutput::new(surface, self.safe_watermark.clone()));
        tracing::debug!(message = "readline attached");
    }

    /// Abort the read in flight, if any, and hand back the surface.
    pub fn detach(&mut self) -> Option<Box<dyn TerminalSurface>> {
        self.abort();
        let maybe_surface = self.output.take().map(TerminalOutput::into_surface);
        if maybe_surface.is_some() {
            tracing::debug!(message = "readline detached");
        }
        maybe_surface
    }

    #[must_use]
    pub fn is_attached(&self) -> bool { self.output.is_some() }

    #[must_use]
    pub fn is_reading(&self) -> bool { self.active_read.is_some() }

    /// The line being edited, while a read is in flight.
    #[must_use]
    pub fn buffer(&self) -> Option<&str> {
        self.active_read.as_ref().map(|it| it.line_state.buffer())
    }

    #[must_use]
    pub fn line_state(&self) -> Option<&LineState> {
        self.active_read.as_ref().map(|it| &it.line_state)
    }

    /// Show `prompt` and start editing a fresh line.
    ///
    /// The returned future resolves with [`ReadlineError::NotActive`] right away when no
    /// surface is attached. A read that is already in flight is resolved with
    /// [`ReadlineError::Aborted`] first.
    pub fn read(&mut self, prompt: &str) -> ReadLineFuture {
        if self.output.is_none() {
            tracing::debug!(message = "read requested while not attached");
            return ReadLineFuture::resolved(Err(ReadlineError::NotActive));
        }

        if self.active_read.is_some() {
            tracing::debug!(message = "new read replaces the one in flight");
            self.abort();
        }

        let Some(output) = self.output.as_mut() else {
            return ReadLineFuture::resolved(Err(ReadlineError::NotActive));
        };

        // Fresh geometry snapshot for every read.
        let mut line_state = LineState::new(
            prompt,
            output.geometry(),
            self.safe_history.clone(),
            self.highlighter.clone(),
        );
        report_render_error(line_state.render_and_flush(output));

        let (sender, future) = ReadLineFuture::new();
        self.active_read = Some(ActiveRead { line_state, sender });

        // % is Display, ? is Debug.
        tracing::debug!(message = "read started", prompt = ?prompt);

        future
    }

    /// Cancel the read in flight: erase the prompt and line from the surface and resolve
    /// the read with [`ReadlineError::Aborted`]. Does nothing when there isn't one.
    pub fn abort(&mut self) {
        let Some(mut active) = self.active_read.take() else {
            return;
        };

        if let Some(output) = self.output.as_mut() {
            report_render_error(active.line_state.clear_rendered(output));
        }

        tracing::debug!(message = "read aborted");
        if active.sender.send(Err(ReadlineError::Aborted)).is_err() {
            tracing::debug!(message = "aborted read was no longer awaited");
        }
    }

    /// Process one chunk of raw terminal input.
    ///
    /// A chunk that decodes into a paste has its submits turned into soft newlines, and
    /// is rendered once at the end. Flow control keys and unrecognized input go to their
    /// handlers even when no read is in flight. Editing keys without a read in flight are
    /// dropped. This never fails, render errors are logged.
    pub fn handle_data(&mut self, chunk: &str) {
        let decoded = decode_chunk(chunk);
        if decoded.is_empty() {
            return;
        }

        let is_paste = decoded.is_paste();
        if is_paste && let Some(active) = self.active_read.as_mut() {
            active.line_state.begin_batch();
        }

        for event in decoded.into_consumer_events() {
            self.apply_event(event);
        }

        if is_paste
            && let (Some(active), Some(output)) =
                (self.active_read.as_mut(), self.output.as_mut())
        {
            report_render_error(active.line_state.end_batch(output));
        }
    }

    /// Write host output. While a read is in flight it goes above the prompt, which is
    /// redrawn below it.
    pub fn print(&mut self, text: &str) {
        let Some(output) = self.output.as_mut() else {
            tracing::trace!(message = "print while not attached, dropped");
            return;
        };
        match self.active_read.as_mut() {
            Some(active) => report_render_error(active.line_state.print_above(text, output)),
            None => output.write(text),
        }
    }

    pub fn println(&mut self, text: &str) { self.print(&format!("{text}\n")); }

    /// Clear the screen and redraw the line in flight at the top.
    pub fn clear_screen(&mut self) {
        if let (Some(active), Some(output)) = (self.active_read.as_mut(), self.output.as_mut())
        {
            report_render_error(active.line_state.clear_screen(output));
        }
    }

    /// Change the prompt of the read in flight.
    pub fn update_prompt(&mut self, prompt: &str) {
        if let (Some(active), Some(output)) = (self.active_read.as_mut(), self.output.as_mut())
        {
            report_render_error(active.line_state.update_prompt(prompt, output));
        }
    }

    pub fn set_check_handler(&mut self, handler: impl Fn(&str) -> bool + Send + 'static) {
        self.check_handler = Box::new(handler);
    }

    pub fn set_pause_handler(&mut self, handler: impl FnMut(bool) + Send + 'static) {
        self.pause_handler = Some(Box::new(handler));
    }

    pub fn set_unrecognized_handler(&mut self, handler: impl FnMut(&str) + Send + 'static) {
        self.unrecognized_handler = Some(Box::new(handler));
    }

    /// Takes effect on the next read.
    pub fn set_highlighter(&mut self, highlighter: SafeHighlighter) {
        self.highlighter = highlighter;
    }

    /// `false` while the surface is behind on acknowledging writes. A producer of input
    /// should hold off until this turns `true` again.
    #[must_use]
    pub fn accepting_input(&self) -> bool {
        lock_or_recover(&self.safe_watermark).accepting_input()
    }

    #[must_use]
    pub fn safe_watermark(&self) -> SafeWatermark { self.safe_watermark.clone() }

    #[must_use]
    pub fn safe_history(&self) -> SafeHistory { self.safe_history.clone() }

    /// Add a line to the history without submitting it, and persist.
    pub fn add_history_entry(&mut self, entry: &str) -> bool {
        let mut history = lock_or_recover(&self.safe_history);
        let added = history.append(entry);
        if added {
            history.persist();
        }
        added
    }

    pub fn set_history_capacity(&mut self, capacity: usize) {
        lock_or_recover(&self.safe_history).set_capacity(capacity);
    }

    /// Read one line, pulling raw chunks from `pinned_input_stream` (eg: `stdin` in raw
    /// mode) until it is submitted.
    ///
    /// # Errors
    ///
    /// - [`ReadlineError::NotActive`] when not attached.
    /// - [`ReadlineError::InputClosed`] when the stream ends first. The read is aborted.
    pub async fn read_line_from_stream(
        &mut self,
        prompt: &str,
        pinned_input_stream: &mut PinnedInputStream<String>,
    ) -> Result<String, ReadlineError> {
        let mut pending_read = self.read(prompt);
        loop {
            tokio::select! {
                // Check the read first, so no chunk is consumed after it resolved.
                biased;

                result = &mut pending_read => {
                    return result;
                }

                // This branch is cancel safe, a chunk is only taken out of the stream
                // when it is ready, and it is applied right away.
                maybe_chunk = pinned_input_stream.next() => {
                    match maybe_chunk {
                        Some(chunk) => self.handle_data(&chunk),
                        None => {
                            self.abort();
                            return Err(ReadlineError::InputClosed);
                        }
                    }
                }
            }
        }
    }

    fn apply_event(&mut self, event: EditEvent) {
        match event {
            EditEvent::FlowControl(signal) => match self.pause_handler.as_mut() {
                Some(handler) => handler(signal.is_resume()),
                None => tracing::trace!(message = "no pause handler", signal = %signal),
            },
            EditEvent::Unrecognized(raw) => match self.unrecognized_handler.as_mut() {
                Some(handler) => handler(&raw),
                None => tracing::trace!(message = "no unrecognized handler", raw = ?raw),
            },
            EditEvent::Submit => self.submit(),
            edit_event => {
                let (Some(active), Some(output)) =
                    (self.active_read.as_mut(), self.output.as_mut())
                else {
                    tracing::trace!(message = "no read in flight, dropped", event = ?edit_event);
                    return;
                };
                report_render_error(apply_edit_event(
                    &mut active.line_state,
                    edit_event,
                    output,
                ));
            }
        }
    }

    /// Submit is gated by the check handler. Only a line that passes it is appended to
    /// history and resolves the read.
    fn submit(&mut self) {
        let (Some(active), Some(output)) = (self.active_read.as_mut(), self.output.as_mut())
        else {
            tracing::trace!(message = "no read in flight, submit dropped");
            return;
        };

        if !(self.check_handler)(active.line_state.buffer()) {
            report_render_error(active.line_state.insert_text("\n", output));
            return;
        }

        let Some(mut active) = self.active_read.take() else {
            return;
        };
        let line = match active.line_state.submit_line(output) {
            Ok(line) => line,
            Err(error) => {
                report_render_error::<()>(Err(error));
                active.line_state.buffer().to_string()
            }
        };

        {
            let mut history = lock_or_recover(&self.safe_history);
            if history.append(&line) {
                history.persist();
            }
        }

        tracing::debug!(message = "read completed", line = ?line);
        if active.sender.send(Ok(line)).is_err() {
            tracing::debug!(message = "completed read was no longer awaited");
        }
    }
}

/// Submit, flow control and unrecognized input are handled by the session.
fn apply_edit_event(
    line_state: &mut LineState,
    event: EditEvent,
    term: &mut TerminalOutput,
) -> Result<(), ReadlineError> {
    match event {
        EditEvent::InsertText(text) => line_state.insert_text(&text, term),
        EditEvent::SoftNewline => line_state.insert_text("\n", term),
        EditEvent::Kill(KillScope::WordBackward) => line_state.kill_word_backward(term),
        EditEvent::Kill(KillScope::WholeLine) => line_state.update("", term),
        EditEvent::Kill(KillScope::ToLineEnd) => line_state.delete_to_end_of_line(term),
        EditEvent::MoveCursor(CursorMove::Home) => line_state.move_cursor_home(term),
        EditEvent::MoveCursor(CursorMove::End) => line_state.move_cursor_end(term),
        EditEvent::MoveCursor(CursorMove::Left) => line_state.move_cursor_back(1, term),
        EditEvent::MoveCursor(CursorMove::Right) => line_state.move_cursor_forward(1, term),
        EditEvent::MoveCursor(CursorMove::Up) => line_state.move_cursor_up(1, term),
        EditEvent::MoveCursor(CursorMove::Down) => line_state.move_cursor_down(1, term),
        EditEvent::Delete(DeleteDirection::Backward) => line_state.backspace(1, term),
        EditEvent::Delete(DeleteDirection::Forward) => line_state.forward_delete(1, term),
        EditEvent::ClearScreen => line_state.clear_screen(term),
        EditEvent::Submit | EditEvent::FlowControl(_) | EditEvent::Unrecognized(_) => ok!(),
    }
}

fn report_render_error<T>(result: Result<T, ReadlineError>) {
    if let Err(error) = result {
        tracing::error!(message = "could not render line", error = ?error);
    }
}
