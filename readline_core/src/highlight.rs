// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Transform applied to the prompt and the buffer right before they are written to the
//! terminal. The transform only changes what is displayed: cursor math is always done on
//! the untransformed text, so a highlighter may add ANSI styling but must not change the
//! visible width of the text.

use std::{borrow::Cow, sync::Arc};

use crate::SafeHighlighter;

pub trait Highlighter {
    /// Display representation of the buffer. `cursor` is the cursor offset in characters,
    /// for highlighters that want to eg: match brackets around it.
    fn highlight<'a>(&self, line: &'a str, cursor: usize) -> Cow<'a, str>;

    /// Display representation of the prompt.
    fn highlight_prompt<'a>(&self, prompt: &'a str) -> Cow<'a, str> { Cow::Borrowed(prompt) }
}

/// The default, displays text as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityHighlighter;

impl Highlighter for IdentityHighlighter {
    fn highlight<'a>(&self, line: &'a str, _cursor: usize) -> Cow<'a, str> {
        Cow::Borrowed(line)
    }
}

/// Any `Fn(&str) -> String` can be used as a highlighter for the buffer.
impl<F> Highlighter for F
where
    F: Fn(&str) -> String,
{
    fn highlight<'a>(&self, line: &'a str, _cursor: usize) -> Cow<'a, str> {
        Cow::Owned(self(line))
    }
}

#[must_use]
pub fn identity_highlighter() -> SafeHighlighter { Arc::new(IdentityHighlighter) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_borrows() {
        let it = IdentityHighlighter.highlight("abc", 1);
        assert!(matches!(it, Cow::Borrowed("abc")));
        assert!(matches!(
            IdentityHighlighter.highlight_prompt("> "),
            Cow::Borrowed("> ")
        ));
    }

    #[test]
    fn test_closure_highlighter() {
        let shout = |line: &str| line.to_uppercase();
        assert_eq!(shout.highlight("abc", 0), "ABC");
        assert_eq!(shout.highlight_prompt("> "), "> ");
    }
}
