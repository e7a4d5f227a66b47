//! Fixed-size cell grids styled with range-based commands.
//!
//! Cells are addressed as `(column, row)` with row 0 at the top.  Negative
//! indices count from the end, so `(-1, -1)` is the bottom-right cell.  Style
//! commands apply to the rectangular range between two such cells.

use genpdf::style::Color;

use crate::error::{Result, ShowcaseError};
use crate::fonts::DEFAULT_FONT;
use crate::surface::{Paint, Surface};

const CELL_FONT_SIZE: f64 = 10.0;
const HORIZONTAL_PADDING: f64 = 6.0;
const VERTICAL_PADDING: f64 = 3.0;
/// Cap height of the cell font as a fraction of its size, used for vertical centering.
const CAP_HEIGHT_EM: f64 = 0.7;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Middle,
    #[default]
    Bottom,
}

/// A rectangular range of cells between two `(column, row)` corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub start: (i32, i32),
    pub end: (i32, i32),
}

impl CellRange {
    pub fn new(start: (i32, i32), end: (i32, i32)) -> Self {
        Self { start, end }
    }

    /// The whole table.
    pub fn all() -> Self {
        Self::new((0, 0), (-1, -1))
    }

    /// Resolves negative indices against a `columns` x `rows` grid.
    ///
    /// Returns inclusive `(first_col, first_row, last_col, last_row)`.
    pub fn resolve(&self, columns: usize, rows: usize) -> Result<(usize, usize, usize, usize)> {
        let col = |index: i32| normalize(index, columns, "column");
        let row = |index: i32| normalize(index, rows, "row");
        let (c0, c1) = (col(self.start.0)?, col(self.end.0)?);
        let (r0, r1) = (row(self.start.1)?, row(self.end.1)?);
        Ok((c0.min(c1), r0.min(r1), c0.max(c1), r0.max(r1)))
    }
}

fn normalize(index: i32, len: usize, axis: &str) -> Result<usize> {
    let len_i = len as i64;
    let resolved = if index < 0 {
        len_i + i64::from(index)
    } else {
        i64::from(index)
    };
    if (0..len_i).contains(&resolved) {
        Ok(resolved as usize)
    } else {
        Err(ShowcaseError::Table(format!(
            "{} index {} out of range for {} {}s",
            axis, index, len, axis
        )))
    }
}

/// A styling instruction applied to a cell range.
#[derive(Clone, Debug, PartialEq)]
pub enum TableStyle {
    /// Outer box plus every inner line.
    Grid {
        range: CellRange,
        width: f64,
        color: Color,
    },
    /// Outline of the range.
    Box {
        range: CellRange,
        width: f64,
        color: Color,
    },
    /// Top edge of every row in the range.
    LineAbove {
        range: CellRange,
        width: f64,
        color: Color,
    },
    /// Left edge of every column in the range.
    LineBefore {
        range: CellRange,
        width: f64,
        color: Color,
    },
    Background { range: CellRange, color: Color },
    Align {
        range: CellRange,
        align: HorizontalAlign,
    },
    VAlign {
        range: CellRange,
        align: VerticalAlign,
    },
}

/// A grid of text cells with fixed column widths and row heights.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    data: Vec<Vec<String>>,
    col_widths: Vec<f64>,
    row_heights: Vec<f64>,
    style: Vec<TableStyle>,
}

impl Table {
    /// Creates a table from rows of displayable values.
    pub fn new<R, T>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = T>,
        T: ToString,
    {
        Self {
            data: rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| cell.to_string()).collect())
                .collect(),
            col_widths: Vec::new(),
            row_heights: Vec::new(),
            style: Vec::new(),
        }
    }

    pub fn with_col_widths(mut self, widths: impl Into<Vec<f64>>) -> Self {
        self.col_widths = widths.into();
        self
    }

    pub fn with_row_heights(mut self, heights: impl Into<Vec<f64>>) -> Self {
        self.row_heights = heights.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<Vec<TableStyle>>) -> Self {
        self.style = style.into();
        self
    }

    pub fn columns(&self) -> usize {
        self.col_widths.len()
    }

    pub fn rows(&self) -> usize {
        self.row_heights.len()
    }

    fn validate(&self) -> Result<()> {
        if self.data.len() != self.row_heights.len() {
            return Err(ShowcaseError::Table(format!(
                "{} rows of data but {} row heights",
                self.data.len(),
                self.row_heights.len()
            )));
        }
        if let Some((index, row)) = self
            .data
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.col_widths.len())
        {
            return Err(ShowcaseError::Table(format!(
                "row {} has {} cells but {} column widths are set",
                index,
                row.len(),
                self.col_widths.len()
            )));
        }
        Ok(())
    }

    /// Total width and height of the grid.
    pub fn wrap(&self) -> Result<(f64, f64)> {
        self.validate()?;
        let width = self.col_widths.iter().sum();
        let height = self.row_heights.iter().sum();
        Ok((width, height))
    }

    fn cell_alignment(&self, col: usize, row: usize) -> Result<(HorizontalAlign, VerticalAlign)> {
        let mut alignment = (HorizontalAlign::default(), VerticalAlign::default());
        for command in &self.style {
            match command {
                TableStyle::Align { range, align } if self.contains(range, col, row)? => {
                    alignment.0 = *align;
                }
                TableStyle::VAlign { range, align } if self.contains(range, col, row)? => {
                    alignment.1 = *align;
                }
                _ => {}
            }
        }
        Ok(alignment)
    }

    fn contains(&self, range: &CellRange, col: usize, row: usize) -> Result<bool> {
        let (c0, r0, c1, r1) = range.resolve(self.columns(), self.rows())?;
        Ok((c0..=c1).contains(&col) && (r0..=r1).contains(&row))
    }

    /// Draws the table with its lower-left corner at `(x, y)`.
    ///
    /// Backgrounds are painted first, then cell text, then lines in command order.
    pub fn draw_on<S>(&self, surface: &mut S, x: f64, y: f64) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        let (_, height) = self.wrap()?;
        let grid = Grid::new(x, y + height, &self.col_widths, &self.row_heights);

        surface.save_state();

        for command in &self.style {
            if let TableStyle::Background { range, color } = command {
                let (c0, r0, c1, r1) = range.resolve(self.columns(), self.rows())?;
                surface.set_fill_color(*color);
                let (left, bottom, right, top) = grid.bounds(c0, r0, c1, r1);
                surface.rect(left, bottom, right - left, top - bottom, Paint::FILL)?;
            }
        }

        surface.set_fill_color(crate::color::BLACK);
        surface.set_font(DEFAULT_FONT, CELL_FONT_SIZE)?;
        for (row, cells) in self.data.iter().enumerate() {
            for (col, text) in cells.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                self.draw_cell(surface, &grid, col, row, text)?;
            }
        }

        for command in &self.style {
            self.draw_lines(surface, &grid, command)?;
        }

        surface.restore_state();
        Ok(())
    }

    fn draw_cell<S>(
        &self,
        surface: &mut S,
        grid: &Grid,
        col: usize,
        row: usize,
        text: &str,
    ) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        let (halign, valign) = self.cell_alignment(col, row)?;
        let (left, bottom, right, top) = grid.bounds(col, row, col, row);
        let baseline = match valign {
            VerticalAlign::Top => top - VERTICAL_PADDING - CELL_FONT_SIZE,
            VerticalAlign::Middle => (top + bottom) / 2.0 - CELL_FONT_SIZE * CAP_HEIGHT_EM / 2.0,
            VerticalAlign::Bottom => bottom + VERTICAL_PADDING,
        };
        let x = match halign {
            HorizontalAlign::Left => left + HORIZONTAL_PADDING,
            HorizontalAlign::Center => {
                let width = surface.current_string_width(text)?;
                (left + right - width) / 2.0
            }
            HorizontalAlign::Right => {
                let width = surface.current_string_width(text)?;
                right - HORIZONTAL_PADDING - width
            }
        };
        surface.draw_string(x, baseline, text)
    }

    fn draw_lines<S>(&self, surface: &mut S, grid: &Grid, command: &TableStyle) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        let (range, width, color) = match command {
            TableStyle::Grid {
                range,
                width,
                color,
            }
            | TableStyle::Box {
                range,
                width,
                color,
            }
            | TableStyle::LineAbove {
                range,
                width,
                color,
            }
            | TableStyle::LineBefore {
                range,
                width,
                color,
            } => (range, *width, *color),
            TableStyle::Background { .. }
            | TableStyle::Align { .. }
            | TableStyle::VAlign { .. } => return Ok(()),
        };
        let (c0, r0, c1, r1) = range.resolve(self.columns(), self.rows())?;
        surface.set_stroke_color(color);
        surface.set_line_width(width);

        let horizontal = |surface: &mut S, row_edge: usize| {
            let y = grid.ys[row_edge];
            surface.line(grid.xs[c0], y, grid.xs[c1 + 1], y)
        };
        let vertical = |surface: &mut S, col_edge: usize| {
            let x = grid.xs[col_edge];
            surface.line(x, grid.ys[r0], x, grid.ys[r1 + 1])
        };

        match command {
            TableStyle::Box { .. } => {
                let (left, bottom, right, top) = grid.bounds(c0, r0, c1, r1);
                surface.rect(left, bottom, right - left, top - bottom, Paint::STROKE)?;
            }
            TableStyle::Grid { .. } => {
                for edge in r0..=r1 + 1 {
                    horizontal(surface, edge)?;
                }
                for edge in c0..=c1 + 1 {
                    vertical(surface, edge)?;
                }
            }
            TableStyle::LineAbove { .. } => {
                for edge in r0..=r1 {
                    horizontal(surface, edge)?;
                }
            }
            TableStyle::LineBefore { .. } => {
                for edge in c0..=c1 {
                    vertical(surface, edge)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Column and row edge positions; `ys[0]` is the top edge.
struct Grid {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Grid {
    fn new(left: f64, top: f64, col_widths: &[f64], row_heights: &[f64]) -> Self {
        let xs = std::iter::once(left)
            .chain(col_widths.iter().scan(left, |edge, width| {
                *edge += width;
                Some(*edge)
            }))
            .collect();
        let ys = std::iter::once(top)
            .chain(row_heights.iter().scan(top, |edge, height| {
                *edge -= height;
                Some(*edge)
            }))
            .collect();
        Self { xs, ys }
    }

    /// `(left, bottom, right, top)` of the cell range.
    fn bounds(&self, c0: usize, r0: usize, c1: usize, r1: usize) -> (f64, f64, f64, f64) {
        (self.xs[c0], self.ys[r1 + 1], self.xs[c1 + 1], self.ys[r0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::recording::{Operation, RecordingSurface};

    fn three_by_three() -> Table {
        Table::new([[0, 1, 2], [3, 4, 5], [6, 7, 8]])
            .with_col_widths([20.0; 3])
            .with_row_heights([16.0; 3])
    }

    #[test]
    fn negative_indices_resolve_from_the_end() {
        let range = CellRange::new((1, 1), (-2, -2));
        assert_eq!(range.resolve(5, 5).expect("resolve"), (1, 1, 3, 3));
        assert!(CellRange::new((0, 0), (5, 0)).resolve(5, 5).is_err());
    }

    #[test]
    fn wrap_sums_dimensions() {
        assert_eq!(three_by_three().wrap().expect("wrap"), (60.0, 48.0));
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let table = Table::new([["a", "b"], ["c", "d"]])
            .with_col_widths([10.0])
            .with_row_heights([10.0, 10.0]);
        assert!(matches!(table.wrap(), Err(ShowcaseError::Table(_))));
    }

    #[test]
    fn grid_draws_every_edge() {
        let table = three_by_three().with_style([TableStyle::Grid {
            range: CellRange::all(),
            width: 0.5,
            color: color::GREY,
        }]);
        let mut surface = RecordingSurface::new();
        table.draw_on(&mut surface, 10.0, 10.0).expect("draw");

        let lines = surface
            .current_operations()
            .iter()
            .filter(|op| matches!(op, Operation::Line { .. }))
            .count();
        assert_eq!(lines, 8);
    }

    #[test]
    fn line_above_spans_selected_columns() {
        let table = three_by_three().with_style([TableStyle::LineAbove {
            range: CellRange::new((1, 2), (-1, 2)),
            width: 1.0,
            color: color::BLUE,
        }]);
        let mut surface = RecordingSurface::new();
        table.draw_on(&mut surface, 0.0, 0.0).expect("draw");

        let line = surface
            .current_operations()
            .iter()
            .find(|op| matches!(op, Operation::Line { .. }))
            .expect("line drawn");
        assert_eq!(
            line,
            &Operation::Line {
                x1: 20.0,
                y1: 16.0,
                x2: 60.0,
                y2: 16.0,
                stroke_color: color::BLUE,
                line_width: 1.0,
            }
        );
    }

    #[test]
    fn centered_cells_are_centered_in_their_column() {
        let table = Table::new([["ab"]])
            .with_col_widths([40.0])
            .with_row_heights([32.0])
            .with_style([
                TableStyle::Align {
                    range: CellRange::all(),
                    align: HorizontalAlign::Center,
                },
                TableStyle::VAlign {
                    range: CellRange::all(),
                    align: VerticalAlign::Middle,
                },
            ]);
        let mut surface = RecordingSurface::new();
        table.draw_on(&mut surface, 0.0, 0.0).expect("draw");

        // "ab" in Helvetica 10 is 11.12pt wide.
        assert!(matches!(
            &surface.current_operations()[0],
            Operation::Text { x, y, .. }
                if (*x - (20.0 - 5.56)).abs() < 1e-9 && (*y - 12.5).abs() < 1e-9
        ));
    }

    #[test]
    fn background_precedes_text() {
        let table = three_by_three().with_style([TableStyle::Background {
            range: CellRange::new((0, 0), (0, 1)),
            color: color::PINK,
        }]);
        let mut surface = RecordingSurface::new();
        table.draw_on(&mut surface, 0.0, 0.0).expect("draw");

        assert!(matches!(
            surface.current_operations()[0],
            Operation::Rect { x, y, width, height, fill_color, .. }
                if x == 0.0 && y == 16.0 && width == 20.0 && height == 32.0
                    && fill_color == color::PINK
        ));
    }
}
