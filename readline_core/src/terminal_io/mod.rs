// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The terminal surface is the display the engine writes escape sequences to. It is an
//! external collaborator, described by the [`TerminalSurface`] trait. [`WriterSurface`]
//! adapts any [`std::io::Write`] (eg: `stdout`) into one.
//!
//! All writes go through [`TerminalOutput`], which normalizes newlines and keeps the
//! [`crate::FlowControlWatermark`] in sync with what the surface has acknowledged.

// Attach sources.
pub mod terminal_geometry;
pub mod terminal_output;
pub mod terminal_surface;
pub mod writer_surface;

// Re-export.
pub use terminal_geometry::*;
pub use terminal_output::*;
pub use terminal_surface::*;
pub use writer_surface::*;
