// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::TAB_STOP_WIDTH_DEFAULT;

/// Called by the surface once the text of one write has been flushed to the display.
pub type FlushCallback = Box<dyn FnOnce() + Send + 'static>;

/// The display that the engine renders to.
///
/// Implementations must invoke the `on_flushed` callback exactly once per
/// [`write`](Self::write). It may be invoked synchronously, later, or out of order
/// relative to other writes.
pub trait TerminalSurface: Send {
    fn write(&mut self, text: &str, on_flushed: FlushCallback);

    fn columns(&self) -> u16;

    fn rows(&self) -> u16;

    fn tab_stop_width(&self) -> u16 { TAB_STOP_WIDTH_DEFAULT }
}
