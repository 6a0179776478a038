// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Route the crate's `tracing` output to the display, a log file, or both.
//!
//! Logging is off unless the host calls [`init`]. While a raw mode terminal owns the
//! display, prefer [`WriterConfig::File`] so log lines don't tear the prompt apart.

// Attach sources.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use tracing_config::*;
pub use tracing_init::*;
