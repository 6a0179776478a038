// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Decides whether the buffer is complete when Enter is pressed. Returning `false`
/// inserts a newline instead of submitting, eg: to continue an unbalanced expression.
pub type CheckHandler = Box<dyn Fn(&str) -> bool + Send>;

/// Called with `true` for resume (Ctrl-Q) and `false` for pause (Ctrl-S).
pub type PauseHandler = Box<dyn FnMut(bool) + Send>;

/// Called with the raw text of any input that isn't a known key, eg: Ctrl-C, Ctrl-D, or
/// function keys.
pub type UnrecognizedHandler = Box<dyn FnMut(&str) + Send>;

/// Every buffer is complete.
#[must_use]
pub fn accept_all_check_handler() -> CheckHandler { Box::new(|_| true) }

/// Complete when every `(` `[` `{` is closed. Quotes are not tracked.
#[must_use]
pub fn balanced_brackets_check_handler() -> CheckHandler {
    Box::new(|buffer| {
        let mut depth: isize = 0;
        for ch in buffer.chars() {
            match ch {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                _ => {}
            }
        }
        depth <= 0
    })
}
