// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{CSI_START, ESC, EditEvent, SS3_START, longest_match};
use crate::InlineVec;

/// The events decoded from one raw chunk of input. The chunk boundary matters: it is
/// what [`DecodedChunk::is_paste`] looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedChunk {
    pub events: InlineVec<EditEvent>,
}

impl DecodedChunk {
    #[must_use]
    pub fn len(&self) -> usize { self.events.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.events.is_empty() }
}

/// Classify one chunk of raw terminal input.
///
/// 1. A [`KEY_TABLE`](super::KEY_TABLE) entry at the current position wins (longest
///    match).
/// 2. Otherwise a run of printable characters (tab included) becomes one
///    [`EditEvent::InsertText`].
/// 3. Otherwise the control character or escape sequence at the current position becomes
///    one [`EditEvent::Unrecognized`].
///
/// An empty chunk yields no events.
#[must_use]
pub fn decode_chunk(input: &str) -> DecodedChunk {
    let mut events = InlineVec::new();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some((len, binding)) = longest_match(rest) {
            events.push(binding.into());
            rest = &rest[len..];
            continue;
        }

        let text_len = printable_run_len(rest);
        if text_len > 0 {
            events.push(EditEvent::InsertText(rest[..text_len].to_string()));
            rest = &rest[text_len..];
            continue;
        }

        let raw_len = unrecognized_sequence_len(rest);
        let raw = &rest[..raw_len];
        tracing::trace!(message = "unrecognized input", raw = ?raw);
        events.push(EditEvent::Unrecognized(raw.to_string()));
        rest = &rest[raw_len..];
    }

    DecodedChunk { events }
}

fn is_printable(ch: char) -> bool { ch == '\t' || !ch.is_control() }

/// Byte length of the leading run of printable characters.
fn printable_run_len(input: &str) -> usize {
    input
        .char_indices()
        .find(|(_, ch)| !is_printable(*ch))
        .map_or(input.len(), |(index, _)| index)
}

/// Byte length of the control character or escape sequence at the start of `input`.
/// Always at least one character, so the decoder makes progress.
fn unrecognized_sequence_len(input: &str) -> usize {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return 0;
    };

    if first != ESC {
        return first.len_utf8();
    }

    // CSI: ESC [ <parameter and intermediate bytes 0x20..=0x3F> <final byte 0x40..=0x7E>.
    if input.starts_with(CSI_START) {
        let body = &input[CSI_START.len()..];
        for (index, ch) in body.char_indices() {
            match ch {
                '\x20'..='\x3f' => {}
                '\x40'..='\x7e' => return CSI_START.len() + index + 1,
                // Malformed, stop before the offending character.
                _ => return CSI_START.len() + index,
            }
        }
        // Truncated sequence, take what arrived.
        return input.len();
    }

    // SS3: ESC O <one character>.
    if input.starts_with(SS3_START) {
        let body = &input[SS3_START.len()..];
        return SS3_START.len() + body.chars().next().map_or(0, char::len_utf8);
    }

    // Alt+<char>, or a lone ESC.
    ESC.len_utf8() + chars.next().map_or(0, char::len_utf8)
}
