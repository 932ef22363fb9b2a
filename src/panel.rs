use crate::graphics::{Canvas, Cell};
use crate::state::Mode;
use crossterm::style::Color;

/// Rows taken by the panel at the top of the screen
pub const PANEL_ROWS: u16 = 2;

const TITLE: &str = "Mode Selection";
const GAP: usize = 3;

/// Radio button strip for picking the movement mode
#[derive(Debug, Default)]
pub struct OptionPanel {
    selected: Mode,
}

impl OptionPanel {
    pub fn new(selected: Mode) -> Self {
        OptionPanel { selected }
    }

    pub fn selected(&self) -> Mode {
        self.selected
    }

    pub fn select(&mut self, mode: Mode) {
        self.selected = mode;
    }

    fn button_text(&self, mode: Mode) -> String {
        let mark = if mode == self.selected { '•' } else { ' ' };
        format!("({mark}) {}", mode.label())
    }

    /// Column span `[start, end)` of each button for a screen `cols` wide
    fn layout(&self, cols: u16) -> [(Mode, i32, i32); 3] {
        let widths = Mode::ALL.map(|mode| self.button_text(mode).chars().count());
        let total = widths.iter().sum::<usize>() + GAP * (widths.len() - 1);
        let mut start = (usize::from(cols).saturating_sub(total) / 2) as i32;

        let mut spans = [(Mode::Bounce, 0, 0); 3];
        for (i, mode) in Mode::ALL.into_iter().enumerate() {
            let end = start + widths[i] as i32;
            spans[i] = (mode, start, end);
            start = end + GAP as i32;
        }
        spans
    }

    /// Mode whose button covers the given cell, if any
    pub fn hit_test(&self, col: u16, row: u16, cols: u16) -> Option<Mode> {
        if row != PANEL_ROWS - 1 {
            return None;
        }
        let col = i32::from(col);
        self.layout(cols)
            .into_iter()
            .find(|&(_, start, end)| col >= start && col < end)
            .map(|(mode, _, _)| mode)
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        let cols = canvas.cols();
        canvas.fill_rows(0, PANEL_ROWS, Cell::BLANK);

        let title_col = (usize::from(cols).saturating_sub(TITLE.len()) / 2) as i32;
        canvas.draw_text(title_col, 0, TITLE, Color::White, Color::Reset);

        for (mode, start, _) in self.layout(cols) {
            let fg = if mode == self.selected {
                Color::Yellow
            } else {
                Color::Grey
            };
            canvas.draw_text(
                start,
                i32::from(PANEL_ROWS - 1),
                &self.button_text(mode),
                fg,
                Color::Reset,
            );
        }
    }
}
