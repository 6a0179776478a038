// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::TerminalSurface;
use crate::TAB_STOP_WIDTH_DEFAULT;

/// Snapshot of the surface dimensions, taken when a read starts. The caller must take a
/// fresh snapshot for each read, a resize during a read is not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalGeometry {
    pub columns: u16,
    pub rows: u16,
    pub tab_stop_width: u16,
}

impl Default for TerminalGeometry {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 24,
            tab_stop_width: TAB_STOP_WIDTH_DEFAULT,
        }
    }
}

impl TerminalGeometry {
    #[must_use]
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tab_stop_width(self, tab_stop_width: u16) -> Self {
        Self {
            tab_stop_width,
            ..self
        }
    }

    /// Never zero, so wrap math can divide by it.
    #[must_use]
    pub fn column_count(&self) -> usize { usize::from(self.columns.max(1)) }

    /// Never zero.
    #[must_use]
    pub fn tab_stop(&self) -> usize { usize::from(self.tab_stop_width.max(1)) }
}

impl From<&dyn TerminalSurface> for TerminalGeometry {
    fn from(surface: &dyn TerminalSurface) -> Self {
        Self {
            columns: surface.columns(),
            rows: surface.rows(),
            tab_stop_width: surface.tab_stop_width(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SurfaceMock;

    #[test]
    fn test_snapshot_from_surface() {
        let surface = SurfaceMock::new(TerminalGeometry::new(40, 10).with_tab_stop_width(4));
        let geometry = TerminalGeometry::from(&surface as &dyn TerminalSurface);
        assert_eq!(geometry, TerminalGeometry {
            columns: 40,
            rows: 10,
            tab_stop_width: 4
        });
    }

    #[test]
    fn test_zero_columns_are_clamped_for_math() {
        let geometry = TerminalGeometry::new(0, 0).with_tab_stop_width(0);
        assert_eq!(geometry.column_count(), 1);
        assert_eq!(geometry.tab_stop(), 1);
    }
}
