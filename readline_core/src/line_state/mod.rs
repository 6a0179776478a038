// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Line editing state machine.
//!
//! [`LineState`] owns the prompt, the buffer being edited, and the cursor for the
//! duration of one read. It consumes edit operations, consults the shared
//! [`crate::History`] and [`crate::Highlighter`], and renders to a
//! [`crate::TerminalOutput`].
//!
//! | Module       | Responsibility                                                |
//! |--------------|---------------------------------------------------------------|
//! | `core`       | [`LineState`] struct, accessors                               |
//! | `layout`     | [`LineLayout`] wrap math, [`CursorPosition`]                  |
//! | `edit`       | Insert, delete, kill, replace, submit                         |
//! | `navigation` | Cursor movement, visual row Home / End, history Up / Down     |
//! | `render`     | Full redraws, relative cursor motion, printing above the line |
//!
//! The terminal never does any line wrapping bookkeeping for us: [`LineLayout`] computes
//! every wrap boundary from the prompt width, the buffer, and the column count.

// Private modules organized by functional responsibility.
mod core;
mod edit;
mod layout;
mod navigation;
mod render;

// Public re-exports (expose stable API).
pub use self::core::*;
pub use layout::*;
