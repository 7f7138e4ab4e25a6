//! Grid layout: a header band plus `rows` × `cols` uniform cells.
//!
//! No cell content is retained, setting a cell draws it immediately and
//! redrawing means supplying the text again.

use embedded_graphics_core::pixelcolor::Rgb565;

use crate::color::{BLACK, BLUE, GREEN, WHITE};
use crate::font::{CHAR_ADVANCE, LINE_ADVANCE, Text};
use crate::graphics::{Canvas, extent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
    pub rows: u8,
    pub cols: u8,
    pub grid_color: Rgb565,
    pub header_bg_color: Rgb565,
    pub header_text_color: Rgb565,
    pub cell_text_color: Rgb565,
}

/// Interior of one cell, inside the grid lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Cell {
    /// Origin that centers `text` in size 1 font, never left of the cell.
    fn text_origin(&self, text: &str) -> (i32, i32) {
        let chars = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
        let text_width = chars.saturating_mul(i32::from(CHAR_ADVANCE));
        let text_height = i32::from(LINE_ADVANCE);

        let x = self
            .x
            .saturating_add(self.width.saturating_sub(text_width) / 2)
            .max(self.x);
        let y = self.y.saturating_add((self.height - text_height) / 2);
        (x, y)
    }
}

impl Table {
    /// Store the geometry with the default palette. Draws nothing.
    pub fn new(x: i32, y: i32, width: u16, height: u16, rows: u8, cols: u8) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rows,
            cols,
            grid_color: WHITE,
            header_bg_color: BLUE,
            header_text_color: WHITE,
            cell_text_color: GREEN,
        }
    }

    /// Height of every band; the header takes one of `rows + 1`.
    pub fn row_height(&self) -> u16 {
        self.height / (u16::from(self.rows) + 1)
    }

    pub fn col_width(&self) -> u16 {
        self.width.checked_div(u16::from(self.cols)).unwrap_or(0)
    }

    fn cell(&self, band: u8, col: u8) -> Cell {
        let row_h = i32::from(self.row_height());
        let col_w = i32::from(self.col_width());
        Cell {
            x: self.x.saturating_add(i32::from(col) * col_w + 1),
            y: self.y.saturating_add(i32::from(band) * row_h + 1),
            width: col_w - 2,
            height: row_h - 2,
        }
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Table",),
    async(feature = "async", keep_self)
)]
impl Table {
    /// Outer border, `rows` horizontal and `cols - 1` vertical separators.
    /// Spacing is truncated, leftover pixels end up in the last row/column.
    pub async fn draw_grid<C: Canvas>(&self, canvas: &mut C) -> Result<(), C::Error> {
        let row_h = i32::from(self.row_height());
        let col_w = i32::from(self.col_width());

        canvas
            .rect(self.x, self.y, self.width, self.height, self.grid_color)
            .await?;

        for i in 1..=i32::from(self.rows) {
            canvas
                .hline(self.x, self.y.saturating_add(i * row_h), self.width, self.grid_color)
                .await?;
        }

        for i in 1..i32::from(self.cols) {
            canvas
                .vline(self.x.saturating_add(i * col_w), self.y, self.height, self.grid_color)
                .await?;
        }
        Ok(())
    }

    /// Fill a header cell with the header background and center `text` in it.
    /// Out of range columns are ignored.
    pub async fn set_header<C: Canvas>(
        &self,
        canvas: &mut C,
        col: u8,
        text: &str,
    ) -> Result<(), C::Error> {
        if col >= self.cols {
            return Ok(());
        }
        let cell = self.cell(0, col);
        canvas
            .fill_rect(
                cell.x,
                cell.y,
                extent(cell.width),
                extent(cell.height),
                self.header_bg_color,
            )
            .await?;

        let (x, y) = cell.text_origin(text);
        canvas
            .draw_string(x, y, text, self.header_text_color, self.header_bg_color, 1)
            .await
    }

    /// Clear a data cell to black and center `text` in it. Out of range
    /// rows or columns are ignored. Long text runs past the right edge.
    pub async fn set_cell<C: Canvas>(
        &self,
        canvas: &mut C,
        row: u8,
        col: u8,
        text: &str,
    ) -> Result<(), C::Error> {
        if row >= self.rows || col >= self.cols {
            return Ok(());
        }
        let cell = self.cell(row + 1, col);
        canvas
            .fill_rect(cell.x, cell.y, extent(cell.width), extent(cell.height), BLACK)
            .await?;

        let (x, y) = cell.text_origin(text);
        canvas
            .draw_string(x, y, text, self.cell_text_color, BLACK, 1)
            .await
    }
}
