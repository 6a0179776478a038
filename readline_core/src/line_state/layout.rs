// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::TerminalGeometry;
use unicode_width::UnicodeWidthChar;

/// A cell on the terminal, relative to the cell where the prompt starts (row 0,
/// column 0). Rows grow downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CursorPosition {
    pub row: usize,
    pub col: usize,
}

impl CursorPosition {
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self { Self { row, col } }
}

/// Where every cursor offset of the buffer lands on screen, given the prompt and the
/// terminal geometry.
///
/// The prompt and the buffer are laid out as one text starting at column 0. A `\n`
/// starts a new row. A character that doesn't fit in the remaining columns of a row
/// (eg: a wide character in the last column) goes to the next row. A row that is filled
/// exactly leaves the terminal in its "pending wrap" state: the cursor stays in the last
/// column until the next character is printed. Since the cursor can't be displayed past
/// the margin, a position in pending wrap is reported as column 0 of the next row, and
/// the renderer emits `\r\n` to put the real cursor there too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLayout {
    /// `positions[i]` is where the cursor is displayed when it is at offset `i`. There are
    /// `char_count + 1` of them, the last one is [`Self::end`].
    pub positions: Vec<CursorPosition>,
    /// Width of each `\t` in the buffer, in order. Tabs are rendered as this many spaces.
    pub tab_widths: Vec<usize>,
    pub ends_in_pending_wrap: bool,
}

impl LineLayout {
    /// `prompt` must already be stripped of ANSI escape sequences.
    #[must_use]
    pub fn compute(prompt: &str, line: &str, geometry: &TerminalGeometry) -> Self {
        let mut pen = LayoutPen::new(geometry);
        for ch in prompt.chars() {
            pen.advance(ch);
        }

        let mut positions = Vec::with_capacity(line.len() + 1);
        let mut tab_widths = vec![];
        for ch in line.chars() {
            positions.push(pen.position());
            let advanced_by = pen.advance(ch);
            if ch == '\t' {
                tab_widths.push(advanced_by);
            }
        }
        positions.push(pen.position());

        Self {
            positions,
            tab_widths,
            ends_in_pending_wrap: pen.is_pending_wrap(),
        }
    }

    /// Where the cursor ends up after the prompt and the whole buffer are written.
    #[must_use]
    pub fn end(&self) -> CursorPosition { self.positions.last().copied().unwrap_or_default() }

    /// Where the buffer starts, right after the prompt.
    #[must_use]
    pub fn start(&self) -> CursorPosition {
        self.positions.first().copied().unwrap_or_default()
    }

    /// Offsets past the end are clamped to the end.
    #[must_use]
    pub fn position_of(&self, offset: usize) -> CursorPosition {
        self.positions
            .get(offset)
            .copied()
            .unwrap_or_else(|| self.end())
    }

    /// Number of terminal rows the prompt and buffer occupy.
    #[must_use]
    pub fn row_count(&self) -> usize { self.end().row + 1 }

    #[must_use]
    pub fn first_offset_on_row(&self, row: usize) -> Option<usize> {
        self.positions.iter().position(|it| it.row == row)
    }

    #[must_use]
    pub fn last_offset_on_row(&self, row: usize) -> Option<usize> {
        self.positions.iter().rposition(|it| it.row == row)
    }

    /// The offset on `row` whose column is closest to `col` without going past it. When
    /// every offset on the row is right of `col`, the first one on the row.
    #[must_use]
    pub fn offset_on_row_near_col(&self, row: usize, col: usize) -> Option<usize> {
        let first = self.first_offset_on_row(row)?;
        let best = self
            .positions
            .iter()
            .enumerate()
            .skip(first)
            .take_while(|(_, it)| it.row == row)
            .filter(|(_, it)| it.col <= col)
            .map(|(offset, _)| offset)
            .last();
        Some(best.unwrap_or(first))
    }
}

/// Tracks the terminal cursor while characters are "printed".
#[derive(Debug, Clone, Copy)]
struct LayoutPen {
    row: usize,
    /// Equals `columns` in the pending wrap state.
    col: usize,
    columns: usize,
    tab_stop: usize,
}

impl LayoutPen {
    fn new(geometry: &TerminalGeometry) -> Self {
        Self {
            row: 0,
            col: 0,
            columns: geometry.column_count(),
            tab_stop: geometry.tab_stop(),
        }
    }

    fn is_pending_wrap(&self) -> bool { self.col >= self.columns }

    fn position(&self) -> CursorPosition {
        if self.is_pending_wrap() {
            CursorPosition::new(self.row + 1, 0)
        } else {
            CursorPosition::new(self.row, self.col)
        }
    }

    fn wrap(&mut self) {
        self.row += 1;
        self.col = 0;
    }

    /// Returns the number of columns `ch` occupies.
    fn advance(&mut self, ch: char) -> usize {
        match ch {
            '\n' => {
                self.wrap();
                0
            }
            '\t' => {
                if self.is_pending_wrap() {
                    self.wrap();
                }
                let to_next_stop = self.tab_stop - self.col % self.tab_stop;
                let width = to_next_stop.min(self.columns - self.col);
                self.col += width;
                width
            }
            _ => {
                let width = ch.width().unwrap_or(0);
                if self.col + width > self.columns {
                    self.wrap();
                }
                self.col += width;
                width
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn geometry(columns: u16) -> TerminalGeometry {
        TerminalGeometry::new(columns, 24).with_tab_stop_width(4)
    }

    #[test]
    fn test_prompt_offsets_the_first_row() {
        let layout = LineLayout::compute("> ", "abc", &geometry(80));
        assert_eq!(layout.start(), CursorPosition::new(0, 2));
        assert_eq!(layout.end(), CursorPosition::new(0, 5));
        assert_eq!(layout.positions.len(), 4);
        assert!(!layout.ends_in_pending_wrap);
    }

    #[test]
    fn test_soft_wrap() {
        // 2 + 10 chars on a 5 column terminal: "> abc" "defgh" "ij".
        let layout = LineLayout::compute("> ", "abcdefghij", &geometry(5));
        assert_eq!(layout.position_of(3), CursorPosition::new(1, 0));
        assert_eq!(layout.position_of(8), CursorPosition::new(2, 0));
        assert_eq!(layout.end(), CursorPosition::new(2, 2));
        assert_eq!(layout.row_count(), 3);
    }

    #[test]
    fn test_exactly_full_row_is_pending_wrap() {
        let layout = LineLayout::compute("> ", "abc", &geometry(5));
        assert!(layout.ends_in_pending_wrap);
        assert_eq!(layout.end(), CursorPosition::new(1, 0));
    }

    #[test]
    fn test_embedded_newlines() {
        let layout = LineLayout::compute("> ", "ab\ncd", &geometry(80));
        assert_eq!(layout.position_of(2), CursorPosition::new(0, 4));
        assert_eq!(layout.position_of(3), CursorPosition::new(1, 0));
        assert_eq!(layout.end(), CursorPosition::new(1, 2));
    }

    #[test]
    fn test_newline_from_pending_wrap_moves_one_row() {
        let layout = LineLayout::compute("", "abcde\nf", &geometry(5));
        assert_eq!(layout.position_of(5), CursorPosition::new(1, 0));
        assert_eq!(layout.position_of(6), CursorPosition::new(1, 0));
        assert_eq!(layout.end(), CursorPosition::new(1, 1));
    }

    #[test]
    fn test_wide_char_that_does_not_fit_wraps() {
        // "abcd" leaves one column, the wide char needs two.
        let layout = LineLayout::compute("", "abcd😀", &geometry(5));
        assert_eq!(layout.position_of(4), CursorPosition::new(0, 4));
        assert_eq!(layout.end(), CursorPosition::new(1, 2));
    }

    #[test]
    fn test_tab_stops() {
        let layout = LineLayout::compute("> ", "\tx\t", &geometry(80));
        // Prompt ends at col 2, next stop is 4. Then x at 4, next stop is 8.
        assert_eq!(layout.tab_widths, vec![2, 3]);
        assert_eq!(layout.end(), CursorPosition::new(0, 8));
    }

    #[test]
    fn test_tab_is_clamped_at_the_margin() {
        let layout = LineLayout::compute("", "abcd\tz", &geometry(6));
        assert_eq!(layout.tab_widths, vec![2]);
        assert_eq!(layout.position_of(5), CursorPosition::new(1, 0));
    }

    #[test]
    fn test_row_queries() {
        let layout = LineLayout::compute("> ", "ab\ncdef", &geometry(80));
        assert_eq!(layout.first_offset_on_row(0), Some(0));
        assert_eq!(layout.last_offset_on_row(0), Some(2));
        assert_eq!(layout.first_offset_on_row(1), Some(3));
        assert_eq!(layout.last_offset_on_row(1), Some(7));
        assert_eq!(layout.first_offset_on_row(2), None);

        // Row 0 starts at col 2 because of the prompt.
        assert_eq!(layout.offset_on_row_near_col(0, 0), Some(0));
        assert_eq!(layout.offset_on_row_near_col(0, 3), Some(1));
        assert_eq!(layout.offset_on_row_near_col(1, 3), Some(6));
        assert_eq!(layout.offset_on_row_near_col(1, 50), Some(7));
    }
}
