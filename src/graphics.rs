use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, SetBackgroundColor, SetForegroundColor};
use std::io::{self, Write};

/// A single character cell of the terminal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub symbol: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        symbol: ' ',
        fg: Color::Reset,
        bg: Color::Reset,
    };
}

/// Character-cell frame buffer.
///
/// Keeps the last frame written to the terminal so `flush` only emits the
/// cells that changed since.
pub struct Canvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    previous: Option<Vec<Cell>>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Canvas {
            cols,
            rows,
            cells: vec![Cell::BLANK; usize::from(cols) * usize::from(rows)],
            previous: None,
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Resizes the buffer; the next flush repaints every cell
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::BLANK; usize::from(cols) * usize::from(rows)];
        self.previous = None;
    }

    pub fn get(&self, col: i32, row: i32) -> Option<Cell> {
        self.index(col, row).map(|offset| self.cells[offset])
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        if col < usize::from(self.cols) && row < usize::from(self.rows) {
            Some(row * usize::from(self.cols) + col)
        } else {
            None
        }
    }

    /// Sets a cell, ignoring positions outside the canvas
    pub fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if let Some(offset) = self.index(col, row) {
            self.cells[offset] = cell;
        }
    }

    /// Fills whole rows `top..top + rows` with `cell`
    pub fn fill_rows(&mut self, top: u16, rows: u16, cell: Cell) {
        for row in top..top.saturating_add(rows) {
            for col in 0..self.cols {
                self.put(i32::from(col), i32::from(row), cell);
            }
        }
    }

    /// Writes `text` starting at (col, row), clipped to the canvas
    pub fn draw_text(&mut self, col: i32, row: i32, text: &str, fg: Color, bg: Color) {
        for (i, symbol) in text.chars().enumerate() {
            let Ok(i) = i32::try_from(i) else { break };
            self.put(col + i, row, Cell { symbol, fg, bg });
        }
    }

    /// Draws a line between two cells using Bresenham's algorithm.
    ///
    /// `thickness` widens the brush to a square of that many cells; with
    /// `dotted` only every other cell along the line is painted.
    pub fn draw_line(
        &mut self,
        from: (i32, i32),
        to: (i32, i32),
        cell: Cell,
        thickness: u16,
        dotted: bool,
    ) {
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy
        let brush = i32::from(thickness.max(1));
        let mut painted = true;

        loop {
            if painted {
                for oy in 0..brush {
                    for ox in 0..brush {
                        self.put(x0 + ox, y0 + oy, cell);
                    }
                }
            }
            if dotted {
                painted = !painted;
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Draws a closed path through `points`
    pub fn draw_polygon(&mut self, points: &[(i32, i32)], cell: Cell, thickness: u16) {
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.draw_line(from, to, cell, thickness, false);
        }
    }

    /// Writes the cells that changed since the last flush
    pub fn flush<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let mut colors: Option<(Color, Color)> = None;

        for (offset, cell) in self.cells.iter().enumerate() {
            if let Some(previous) = &self.previous {
                if previous[offset] == *cell {
                    continue;
                }
            }
            let col = (offset % usize::from(self.cols)) as u16;
            let row = (offset / usize::from(self.cols)) as u16;
            queue!(out, MoveTo(col, row))?;
            if colors != Some((cell.fg, cell.bg)) {
                queue!(out, SetForegroundColor(cell.fg), SetBackgroundColor(cell.bg))?;
                colors = Some((cell.fg, cell.bg));
            }
            queue!(out, Print(cell.symbol))?;
        }
        out.flush()?;

        self.previous = Some(self.cells.clone());
        Ok(())
    }
}
