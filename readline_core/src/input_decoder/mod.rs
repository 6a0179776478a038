// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Turns raw terminal input into a finite, ordered sequence of [`EditEvent`]s.
//!
//! Decoding never fails. Recognized control and escape sequences come from a fixed
//! lookup table ([`key_table`]) using longest match. Contiguous printable text becomes
//! one [`EditEvent::InsertText`]. Anything else becomes [`EditEvent::Unrecognized`]
//! carrying the raw text, so nothing is dropped silently.
//!
//! A chunk that decodes to more than one event, or to a multi character text insert, is
//! a paste. See [`DecodedChunk::is_paste`] and [`DecodedChunk::into_consumer_events`].

// Attach sources.
pub mod decoder;
pub mod edit_event;
pub mod key_table;
pub mod paste;
pub mod utf8_assembler;

// Re-export.
pub use decoder::*;
pub use edit_event::*;
pub use key_table::*;
pub use paste::*;
pub use utf8_assembler::*;
