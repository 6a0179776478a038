// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod history_buffer;
pub mod history_store;

// Re-export.
pub use history_buffer::*;
pub use history_store::*;
