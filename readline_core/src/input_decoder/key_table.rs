// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{CursorMove, DeleteDirection, EditEvent, FlowControlSignal, KillScope};

/// What a recognized control or escape sequence means. This is the subset of
/// [`EditEvent`] that carries no text, so the [`KEY_TABLE`] can be a `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBinding {
    Submit,
    SoftNewline,
    Kill(KillScope),
    MoveCursor(CursorMove),
    Delete(DeleteDirection),
    ClearScreen,
    FlowControl(FlowControlSignal),
}

impl From<KeyBinding> for EditEvent {
    fn from(binding: KeyBinding) -> Self {
        match binding {
            KeyBinding::Submit => EditEvent::Submit,
            KeyBinding::SoftNewline => EditEvent::SoftNewline,
            KeyBinding::Kill(scope) => EditEvent::Kill(scope),
            KeyBinding::MoveCursor(it) => EditEvent::MoveCursor(it),
            KeyBinding::Delete(direction) => EditEvent::Delete(direction),
            KeyBinding::ClearScreen => EditEvent::ClearScreen,
            KeyBinding::FlowControl(signal) => EditEvent::FlowControl(signal),
        }
    }
}

pub const ESC: char = '\x1b';
pub const CSI_START: &str = "\x1b[";
pub const SS3_START: &str = "\x1bO";

/// Every sequence the decoder recognizes. Order does not matter, [`longest_match`]
/// picks the longest entry that prefixes the input.
pub const KEY_TABLE: &[(&str, KeyBinding)] = &[
    // Enter. Terminals in raw mode send CR, pasted text usually carries LF or CRLF.
    ("\r", KeyBinding::Submit),
    ("\n", KeyBinding::Submit),
    ("\r\n", KeyBinding::Submit),
    // Alt+Enter.
    ("\x1b\r", KeyBinding::SoftNewline),
    ("\x1b\n", KeyBinding::SoftNewline),
    // Shift+Enter, CSI-u (kitty) and xterm modifyOtherKeys encodings.
    ("\x1b[13;2u", KeyBinding::SoftNewline),
    ("\x1b[27;2;13~", KeyBinding::SoftNewline),
    // Deletion.
    ("\x7f", KeyBinding::Delete(DeleteDirection::Backward)),
    ("\x08", KeyBinding::Delete(DeleteDirection::Backward)),
    ("\x1b[3~", KeyBinding::Delete(DeleteDirection::Forward)),
    // Home.
    ("\x1b[H", KeyBinding::MoveCursor(CursorMove::Home)),
    ("\x1bOH", KeyBinding::MoveCursor(CursorMove::Home)),
    ("\x1b[1~", KeyBinding::MoveCursor(CursorMove::Home)),
    ("\x1b[7~", KeyBinding::MoveCursor(CursorMove::Home)),
    ("\x01", KeyBinding::MoveCursor(CursorMove::Home)),
    // End.
    ("\x1b[F", KeyBinding::MoveCursor(CursorMove::End)),
    ("\x1bOF", KeyBinding::MoveCursor(CursorMove::End)),
    ("\x1b[4~", KeyBinding::MoveCursor(CursorMove::End)),
    ("\x1b[8~", KeyBinding::MoveCursor(CursorMove::End)),
    ("\x05", KeyBinding::MoveCursor(CursorMove::End)),
    // Arrows, CSI and SS3 (application cursor mode) forms, plus emacs keys.
    ("\x1b[A", KeyBinding::MoveCursor(CursorMove::Up)),
    ("\x1bOA", KeyBinding::MoveCursor(CursorMove::Up)),
    ("\x10", KeyBinding::MoveCursor(CursorMove::Up)),
    ("\x1b[B", KeyBinding::MoveCursor(CursorMove::Down)),
    ("\x1bOB", KeyBinding::MoveCursor(CursorMove::Down)),
    ("\x0e", KeyBinding::MoveCursor(CursorMove::Down)),
    ("\x1b[C", KeyBinding::MoveCursor(CursorMove::Right)),
    ("\x1bOC", KeyBinding::MoveCursor(CursorMove::Right)),
    ("\x06", KeyBinding::MoveCursor(CursorMove::Right)),
    ("\x1b[D", KeyBinding::MoveCursor(CursorMove::Left)),
    ("\x1bOD", KeyBinding::MoveCursor(CursorMove::Left)),
    ("\x02", KeyBinding::MoveCursor(CursorMove::Left)),
    // Kill.
    ("\x17", KeyBinding::Kill(KillScope::WordBackward)),
    ("\x15", KeyBinding::Kill(KillScope::WholeLine)),
    ("\x0b", KeyBinding::Kill(KillScope::ToLineEnd)),
    // Ctrl+L.
    ("\x0c", KeyBinding::ClearScreen),
    // XOFF / XON.
    ("\x13", KeyBinding::FlowControl(FlowControlSignal::Pause)),
    ("\x11", KeyBinding::FlowControl(FlowControlSignal::Resume)),
];

/// Returns the byte length and binding of the longest [`KEY_TABLE`] entry that is a
/// prefix of `input`.
#[must_use]
pub fn longest_match(input: &str) -> Option<(usize, KeyBinding)> {
    KEY_TABLE
        .iter()
        .filter(|(sequence, _)| input.starts_with(sequence))
        .max_by_key(|(sequence, _)| sequence.len())
        .map(|(sequence, binding)| (sequence.len(), *binding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_beats_cr() {
        assert_eq!(longest_match("\r\nabc"), Some((2, KeyBinding::Submit)));
        assert_eq!(longest_match("\rabc"), Some((1, KeyBinding::Submit)));
    }

    #[test]
    fn test_alt_enter_beats_nothing_for_bare_escape() {
        assert_eq!(longest_match("\x1b\r"), Some((2, KeyBinding::SoftNewline)));
        assert_eq!(longest_match("\x1b"), None);
    }

    #[test]
    fn test_printable_text_has_no_match() {
        assert_eq!(longest_match("abc"), None);
        assert_eq!(longest_match("\tabc"), None);
    }

    #[test]
    fn test_table_has_no_duplicate_sequences() {
        for (index, (lhs, _)) in KEY_TABLE.iter().enumerate() {
            for (rhs, _) in &KEY_TABLE[index + 1..] {
                assert_ne!(lhs, rhs);
            }
        }
    }
}
