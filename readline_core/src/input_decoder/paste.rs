// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DecodedChunk, EditEvent};
use crate::InlineVec;

impl DecodedChunk {
    /// A chunk is a paste when it decoded into more than one event, or into a text
    /// insert longer than one character. Detection is purely structural, no timing.
    #[must_use]
    pub fn is_paste(&self) -> bool {
        self.events.len() > 1
            || self.events.iter().any(|event| event.text_char_count() > 1)
    }

    /// The events a consumer should apply. Inside a paste every
    /// [`EditEvent::Submit`] is turned into an [`EditEvent::SoftNewline`], so pasted
    /// multi-line text never submits on its own.
    #[must_use]
    pub fn into_consumer_events(self) -> InlineVec<EditEvent> {
        if self.is_paste() {
            apply_paste_policy(self.events)
        } else {
            self.events
        }
    }
}

/// Replace every submit with a soft newline.
#[must_use]
pub fn apply_paste_policy(events: InlineVec<EditEvent>) -> InlineVec<EditEvent> {
    events
        .into_iter()
        .map(|event| match event {
            EditEvent::Submit => EditEvent::SoftNewline,
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode_chunk;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_keystroke_is_not_a_paste() {
        assert!(!decode_chunk("a").is_paste());
        assert!(!decode_chunk("\r").is_paste());
        assert!(!decode_chunk("é").is_paste());
    }

    #[test]
    fn test_multi_char_text_is_a_paste() {
        assert!(decode_chunk("ab").is_paste());
    }

    #[test]
    fn test_paste_never_submits() {
        let events = decode_chunk("one\rtwo\r\nthree").into_consumer_events();
        assert!(!events.contains(&EditEvent::Submit));
        assert_eq!(
            events
                .iter()
                .filter(|it| **it == EditEvent::SoftNewline)
                .count(),
            2
        );
    }

    #[test]
    fn test_typed_enter_stays_a_submit() {
        let events = decode_chunk("\r").into_consumer_events();
        assert_eq!(events.into_vec(), vec![EditEvent::Submit]);
    }
}
