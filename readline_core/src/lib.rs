// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # Line editing engine for interactive terminal sessions
//!
//! `r3bl_readline_core` turns a raw stream of keystrokes (including pasted bursts and
//! escape sequences) into edited, cursor addressable lines of text. It is the engine
//! that sits underneath a readline style prompt: you feed it raw chunks of terminal
//! input, it renders the prompt and the line being edited back to a terminal surface,
//! and it hands you the submitted line.
//!
//! # Table of contents
//!
//! <!-- TOC -->
//!
//! - [Architecture](#architecture)
//! - [Quick start](#quick-start)
//! - [Pasting multi-line text](#pasting-multi-line-text)
//! - [Back pressure](#back-pressure)
//! - [Logging](#logging)
//!
//! <!-- /TOC -->
//!
//! # Architecture
//!
//! | Module              | Responsibility                                               |
//! |---------------------|--------------------------------------------------------------|
//! | [`input_decoder`]   | Classify raw terminal text into [`EditEvent`]s               |
//! | [`history`]         | Bounded [`History`] of submitted lines, [`HistoryStore`]s   |
//! | [`highlight`]       | [`Highlighter`] transform applied before rendering           |
//! | [`line_state`]      | [`LineState`] buffer + cursor state machine and rendering    |
//! | [`flow_control`]    | [`FlowControlWatermark`] high / low water back pressure      |
//! | [`terminal_io`]     | [`TerminalSurface`] contract and [`TerminalOutput`]          |
//! | [`readline_impl`]   | [`Readline`] session that owns the single pending read       |
//! | [`config`]          | [`ReadlineConfig`] loaded from JSON                          |
//! | [`tracing_logging`] | `tracing` subscriber setup for display and file logging      |
//!
//! Control flows in one direction:
//!
//! ```text
//! raw chunk ─► decode_chunk ─► EditEvent ─► LineState ─► TerminalOutput ─► TerminalSurface
//!                                              │                │
//!                                     History, Highlighter   FlowControlWatermark
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use r3bl_readline_core::{Readline, ReadlineConfig, WriterSurface};
//! use std::sync::{Arc, Mutex};
//!
//! # async fn run() -> miette::Result<()> {
//! let mut readline = Readline::new(&ReadlineConfig::default())?;
//! readline.attach(Box::new(WriterSurface::new_with_terminal_size(Arc::new(
//!     Mutex::new(std::io::stdout()),
//! ))));
//!
//! let pending = readline.read("> ");
//! // Feed raw input as it arrives, eg: from stdin in raw mode. One chunk is one read
//! // from the terminal, so Enter arrives on its own.
//! readline.handle_data("hello");
//! readline.handle_data("\r");
//! let line = pending.await?;
//! assert_eq!(line, "hello");
//! # Ok(())
//! # }
//! ```
//!
//! # Pasting multi-line text
//!
//! A chunk that decodes into more than one event, or into a multi character text insert,
//! is a paste. Every submit inside a paste becomes a soft newline, so pasting multi-line
//! text never submits the line on its own. A chunk like `"hello\r"` is a paste too, and
//! leaves `"hello\n"` in the buffer.
//!
//! # Back pressure
//!
//! Every write to the surface is counted by the [`FlowControlWatermark`] until the
//! surface acknowledges the flush. [`Readline::accepting_input`] turns `false` above the
//! high watermark, and only turns `true` again below the low watermark.
//!
//! # Logging
//!
//! The crate logs with [`tracing`]. Use [`tracing_logging::init`] with a
//! [`TracingConfig`] to send those logs to `stdout`, `stderr`, a file, or both.

// Production library code must propagate errors instead of unwrapping. Tests are
// allowed to use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod config;
pub mod flow_control;
pub mod highlight;
pub mod history;
pub mod input_decoder;
pub mod line_state;
pub mod readline_impl;
pub mod terminal_io;
pub mod test_fixtures;
pub mod tracing_logging;

// Re-export the public API.
pub use config::*;
pub use flow_control::*;
pub use highlight::*;
pub use history::*;
pub use input_decoder::*;
pub use line_state::*;
pub use readline_impl::*;
pub use terminal_io::*;
pub use test_fixtures::*;
pub use tracing_logging::*;

// Type aliases.
use futures_core::Stream;
use smallvec::SmallVec;
use std::{pin::Pin,
          sync::{Arc, MutexGuard, PoisonError}};

pub type StdMutex<T> = std::sync::Mutex<T>;

pub type SendRawTerminal = dyn std::io::Write + Send;
pub type SafeRawTerminal = Arc<StdMutex<SendRawTerminal>>;

pub type SafeHistory = Arc<StdMutex<History>>;
pub type SafeWatermark = Arc<StdMutex<FlowControlWatermark>>;
pub type SafeHighlighter = Arc<dyn Highlighter + Send + Sync>;

/// Stack allocated for the common case of a keystroke decoding into a few events.
pub type InlineVec<T> = SmallVec<[T; INLINE_VEC_SIZE]>;

/// Stream of raw input chunks, eg: bytes read from `stdin` in raw mode and converted to
/// text. Tests supply their own with [`gen_input_stream`].
pub type PinnedInputStream<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

// Constants.
pub const INLINE_VEC_SIZE: usize = 4;
pub const HISTORY_CAPACITY_DEFAULT: usize = 50;
pub const HIGH_WATERMARK_DEFAULT: usize = 10_000;
pub const LOW_WATERMARK_DEFAULT: usize = 1_000;
pub const TAB_STOP_WIDTH_DEFAULT: u16 = 8;

/// Shorthand for `Ok(())`, or `Ok(value)`.
#[macro_export]
macro_rules! ok {
    () => {
        Ok(())
    };
    ($value:expr) => {
        Ok($value)
    };
}

/// Lock a [`StdMutex`], recovering the inner value if another holder panicked. Nothing
/// in this crate leaves shared state half updated across a panic, so the data is still
/// usable.
pub fn lock_or_recover<T: ?Sized>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
