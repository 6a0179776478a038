// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use strum_macros::{Display, EnumString};

/// The closed set of logical edit commands that raw terminal input decodes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditEvent {
    /// Literal text. Holds more than one character for pasted bursts.
    InsertText(String),
    /// Enter. Submits the line, unless the submission gate rejects it.
    Submit,
    /// Shift+Enter or Alt+Enter. Inserts a line break without submitting.
    SoftNewline,
    Kill(KillScope),
    MoveCursor(CursorMove),
    Delete(DeleteDirection),
    ClearScreen,
    FlowControl(FlowControlSignal),
    /// Input that is not in the closed set. Carries the raw text for the host.
    Unrecognized(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum KillScope {
    /// Ctrl+W.
    WordBackward,
    /// Ctrl+U, replaces the whole buffer with an empty one.
    WholeLine,
    /// Ctrl+K.
    ToLineEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum CursorMove {
    Home,
    End,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum DeleteDirection {
    /// Backspace, removes the character before the cursor.
    Backward,
    /// Delete, removes the character under the cursor.
    Forward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum FlowControlSignal {
    /// Ctrl+S.
    Pause,
    /// Ctrl+Q.
    Resume,
}

impl FlowControlSignal {
    /// The value handed to the pause handler: `true` means resume.
    #[must_use]
    pub fn is_resume(self) -> bool { matches!(self, FlowControlSignal::Resume) }
}

impl EditEvent {
    /// Number of characters carried by an [`EditEvent::InsertText`], `0` otherwise.
    #[must_use]
    pub fn text_char_count(&self) -> usize {
        match self {
            EditEvent::InsertText(text) => text.chars().count(),
            _ => 0,
        }
    }
}
