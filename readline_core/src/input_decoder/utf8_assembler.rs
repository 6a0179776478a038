// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Turns raw bytes read from a terminal into text chunks for
/// [`crate::Readline::handle_data`].
///
/// A multibyte character can be split across two reads. Its leading bytes are held back
/// until the rest arrives, instead of being decoded as U+FFFD. Bytes that can never form
/// valid UTF-8 are still replaced with U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8ChunkAssembler {
    pending: Vec<u8>,
}

impl Utf8ChunkAssembler {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns the text that is complete so far, or `None` if all of `bytes` is held
    /// back as the start of a character.
    pub fn push(&mut self, bytes: &[u8]) -> Option<String> {
        self.pending.extend_from_slice(bytes);
        let tail_len = incomplete_utf8_tail_len(&self.pending);
        let tail = self.pending.split_off(self.pending.len() - tail_len);
        let complete = std::mem::replace(&mut self.pending, tail);
        if complete.is_empty() {
            return None;
        }
        Some(String::from_utf8_lossy(&complete).into_owned())
    }

    /// Whatever is still held back, eg: when the input stream ends mid character.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

/// Length of a trailing character whose leading byte is present but whose continuation
/// bytes are not, or `0`.
fn incomplete_utf8_tail_len(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let byte = bytes[bytes.len() - back];
        let is_continuation = byte & 0b1100_0000 == 0b1000_0000;
        if is_continuation {
            continue;
        }
        let needed = match byte {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return 0,
        };
        return if needed > back { back } else { 0 };
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_ascii_passes_through() {
        let mut assembler = Utf8ChunkAssembler::new();
        assert_eq!(assembler.push(b"ls -la"), Some("ls -la".to_string()));
        assert_eq!(assembler.finish(), None);
    }

    #[test]
    fn test_character_split_across_reads() {
        // "é" is 0xC3 0xA9, "😀" is 0xF0 0x9F 0x98 0x80.
        let mut assembler = Utf8ChunkAssembler::new();
        assert_eq!(assembler.push(b"caf\xC3"), Some("caf".to_string()));
        assert_eq!(assembler.push(b"\xA9 \xF0\x9F"), Some("é ".to_string()));
        assert_eq!(assembler.push(b"\x98"), None);
        assert_eq!(assembler.push(b"\x80!"), Some("😀!".to_string()));
        assert_eq!(assembler.finish(), None);
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let mut assembler = Utf8ChunkAssembler::new();
        assert_eq!(assembler.push(b"a\xFFb"), Some("a\u{FFFD}b".to_string()));
    }

    #[test]
    fn test_finish_flushes_truncated_character() {
        let mut assembler = Utf8ChunkAssembler::new();
        assert_eq!(assembler.push(b"\xE2\x82"), None);
        assert_eq!(assembler.finish(), Some("\u{FFFD}".to_string()));
    }

    #[test_case(b"abc", 0 ; "ascii")]
    #[test_case(b"ab\xC3", 1 ; "two byte lead")]
    #[test_case(b"\xE2\x82", 2 ; "three byte missing one")]
    #[test_case(b"\xE2\x82\xAC", 0 ; "three byte complete")]
    #[test_case(b"\xF0\x9F\x98", 3 ; "four byte missing one")]
    #[test_case(b"\x80\x80", 0 ; "stray continuation")]
    fn test_incomplete_tail_len(bytes: &[u8], expected: usize) {
        assert_eq!(incomplete_utf8_tail_len(bytes), expected);
    }
}
