// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{FlushCallback, TerminalGeometry, TerminalSurface};
use crate::{SafeRawTerminal, TAB_STOP_WIDTH_DEFAULT, lock_or_recover};
use std::{fmt::{Debug, Formatter},
          io::Write};

/// Where a [`WriterSurface`] gets its dimensions from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometrySource {
    /// Use these dimensions, eg: in tests, or when the host knows the size.
    Fixed(TerminalGeometry),
    /// Ask the real terminal via [`crossterm::terminal::size`] on every query.
    QueryTerminal { tab_stop_width: u16 },
}

/// Adapts a [`SafeRawTerminal`] (anything that is `dyn Write + Send`, usually `stdout`)
/// into a [`TerminalSurface`].
///
/// Each write is flushed right away and acknowledged synchronously. An I/O error is
/// logged and the write is still acknowledged, so the watermark never leaks bytes.
pub struct WriterSurface {
    pub safe_raw_terminal: SafeRawTerminal,
    pub geometry_source: GeometrySource,
}

impl Debug for WriterSurface {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterSurface")
            .field("geometry_source", &self.geometry_source)
            .finish_non_exhaustive()
    }
}

impl WriterSurface {
    #[must_use]
    pub fn new(safe_raw_terminal: SafeRawTerminal, geometry: TerminalGeometry) -> Self {
        Self {
            safe_raw_terminal,
            geometry_source: GeometrySource::Fixed(geometry),
        }
    }

    #[must_use]
    pub fn new_with_terminal_size(safe_raw_terminal: SafeRawTerminal) -> Self {
        Self {
            safe_raw_terminal,
            geometry_source: GeometrySource::QueryTerminal {
                tab_stop_width: TAB_STOP_WIDTH_DEFAULT,
            },
        }
    }

    #[must_use]
    pub fn with_tab_stop_width(mut self, tab_stop_width: u16) -> Self {
        self.geometry_source = match self.geometry_source {
            GeometrySource::Fixed(geometry) => {
                GeometrySource::Fixed(geometry.with_tab_stop_width(tab_stop_width))
            }
            GeometrySource::QueryTerminal { .. } => {
                GeometrySource::QueryTerminal { tab_stop_width }
            }
        };
        self
    }

    #[must_use]
    pub fn current_geometry(&self) -> TerminalGeometry {
        match self.geometry_source {
            GeometrySource::Fixed(geometry) => geometry,
            GeometrySource::QueryTerminal { tab_stop_width } => {
                match crossterm::terminal::size() {
                    Ok((columns, rows)) => TerminalGeometry::new(columns, rows)
                        .with_tab_stop_width(tab_stop_width),
                    Err(error) => {
                        tracing::warn!(
                            message = "could not query terminal size, using default",
                            error = ?error
                        );
                        TerminalGeometry::default().with_tab_stop_width(tab_stop_width)
                    }
                }
            }
        }
    }
}

impl TerminalSurface for WriterSurface {
    fn write(&mut self, text: &str, on_flushed: FlushCallback) {
        {
            let term = &mut *lock_or_recover(&self.safe_raw_terminal);
            let result = term
                .write_all(text.as_bytes())
                .and_then(|()| term.flush());
            if let Err(error) = result {
                tracing::error!(message = "terminal write failed", error = ?error);
            }
        }
        on_flushed();
    }

    fn columns(&self) -> u16 { self.current_geometry().columns }

    fn rows(&self) -> u16 { self.current_geometry().rows }

    fn tab_stop_width(&self) -> u16 { self.current_geometry().tab_stop_width }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StdMutex, StdoutMock};
    use std::sync::{Arc,
                    atomic::{AtomicUsize, Ordering}};

    #[test]
    fn test_write_reaches_writer_and_acks_once() {
        let stdout_mock = StdoutMock::default();
        let mut surface = WriterSurface::new(
            Arc::new(StdMutex::new(stdout_mock.clone())),
            TerminalGeometry::new(100, 30),
        );

        let ack_count = Arc::new(AtomicUsize::new(0));
        let ack_count_clone = ack_count.clone();
        surface.write(
            "hello",
            Box::new(move || {
                ack_count_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "hello");
        assert_eq!(ack_count.load(Ordering::SeqCst), 1);
        assert_eq!(surface.columns(), 100);
        assert_eq!(surface.rows(), 30);
    }

    #[test]
    fn test_with_tab_stop_width() {
        let surface = WriterSurface::new(
            Arc::new(StdMutex::new(StdoutMock::default())),
            TerminalGeometry::new(40, 10),
        )
        .with_tab_stop_width(4);
        assert_eq!(surface.tab_stop_width(), 4);
        assert_eq!(surface.columns(), 40);

        let surface =
            WriterSurface::new_with_terminal_size(Arc::new(StdMutex::new(StdoutMock::default())))
                .with_tab_stop_width(2);
        assert_eq!(surface.geometry_source, GeometrySource::QueryTerminal {
            tab_stop_width: 2
        });
    }
}
