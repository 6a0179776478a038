// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Fixtures used by the unit tests in this crate and by the integration tests in
//! `tests/`. They are part of the public API so downstream hosts can test their own
//! wiring against the same mocks.

// Attach sources.
pub mod history_store_fixtures;
pub mod input_stream_fixtures;
pub mod stdout_mock;
pub mod surface_mock;
pub mod temp_dir;

// Re-export.
pub use history_store_fixtures::*;
pub use input_stream_fixtures::*;
pub use stdout_mock::*;
pub use surface_mock::*;
pub use temp_dir::*;
