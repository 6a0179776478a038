// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The [`Readline`] session: owns at most one pending read, decodes raw input, drives
//! the [`crate::LineState`] for that read, and resolves its [`ReadLineFuture`].

// Attach sources.
pub mod handlers;
pub mod pending_read;
pub mod readline;
pub mod readline_error;

// Re-export.
pub use handlers::*;
pub use pending_read::*;
pub use readline::*;
pub use readline_error::*;
