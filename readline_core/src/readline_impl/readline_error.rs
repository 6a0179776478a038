// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::{Diagnostic, Report};
use std::io;

/// Failures surfaced by this crate.
///
/// Only [`ReadlineError::NotActive`] and [`ReadlineError::Aborted`] (and
/// [`ReadlineError::InputClosed`] from the stream driver) reach a caller that is awaiting
/// a [`crate::ReadLineFuture`]. Processing an input chunk never fails.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ReadlineError {
    /// A read was requested before a terminal surface was attached.
    #[error("readline is not attached to a terminal surface")]
    #[diagnostic(
        code(r3bl_readline_core::not_active),
        help("call Readline::attach() before Readline::read()")
    )]
    NotActive,

    /// The pending read was cancelled by an abort, a newer read, or a detach.
    #[error("the pending read was aborted")]
    #[diagnostic(code(r3bl_readline_core::aborted))]
    Aborted,

    /// The input stream driving a read ended before a line was submitted.
    #[error("the input stream closed before a line was submitted")]
    #[diagnostic(code(r3bl_readline_core::input_closed))]
    InputClosed,

    #[error("low watermark ({low}) must be less than the high watermark ({high})")]
    #[diagnostic(code(r3bl_readline_core::invalid_watermark))]
    InvalidWatermark { high: usize, low: usize },

    /// An internal I/O error occurred.
    #[error(transparent)]
    #[diagnostic(code(r3bl_readline_core::io))]
    IO(#[from] io::Error),
}

/// For convenience, convert [`Report`] to [`ReadlineError`], so that `into_diagnostic()`
/// works.
impl From<Report> for ReadlineError {
    fn from(report: Report) -> Self { ReadlineError::IO(io::Error::other(format!("{report}"))) }
}

impl PartialEq for ReadlineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotActive, Self::NotActive)
            | (Self::Aborted, Self::Aborted)
            | (Self::InputClosed, Self::InputClosed) => true,
            (
                Self::InvalidWatermark { high, low },
                Self::InvalidWatermark {
                    high: other_high,
                    low: other_low,
                },
            ) => high == other_high && low == other_low,
            (Self::IO(lhs), Self::IO(rhs)) => lhs.kind() == rhs.kind(),
            _ => false,
        }
    }
}
