use crate::cube::Cube;
use crate::graphics::{Canvas, Cell};
use crate::panel::{OptionPanel, PANEL_ROWS};
use crate::scene::Scene;
use crate::state::{AppState, Mode};
use crate::vertex::Vertex;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::style::Color;
use std::time::Instant;
use tracing::{info, warn};

const BACKGROUND: Color = Color::White;
const GUIDE_COLOR: Color = Color::Red;

/// Cube dimensions and the size of one terminal cell in logical units
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    pub side_length: i32,
    pub offset_scale: f64,
    pub speed: i32,
    pub cell_width: i32,
    pub cell_height: i32,
}

/// Terminal front end for the bouncing cube scene
pub struct CubeWidget {
    scene: Scene,
    panel: OptionPanel,
    state: AppState,
    settings: Settings,
    cols: u16,
    rows: u16,
    /// A press that landed on the panel; its drag and release go nowhere
    panel_press: bool,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl CubeWidget {
    pub fn new(settings: Settings, state: AppState, cols: u16, rows: u16) -> Self {
        let mut widget = CubeWidget {
            scene: Scene::new(Cube::default()),
            panel: OptionPanel::new(state.mode),
            state,
            settings,
            cols,
            rows,
            panel_press: false,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        };
        widget.resize(cols, rows);
        let cube = widget.fresh_cube();
        widget.scene.reset(cube);
        let mode = widget.state.mode;
        widget.select_mode(mode);
        widget
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.state.quit
    }

    /// A new cube with its local origin at the middle of the viewport
    fn fresh_cube(&self) -> Cube {
        let (width, height) = self.scene.viewport();
        Cube::new(
            self.settings.side_length,
            self.settings.offset_scale,
            self.settings.speed,
            Vertex::new(width / 2, height / 2),
        )
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        let width = i32::from(cols) * self.settings.cell_width;
        let height = i32::from(rows.saturating_sub(PANEL_ROWS)) * self.settings.cell_height;
        self.scene.set_viewport(width, height);
    }

    pub fn select_mode(&mut self, mode: Mode) {
        self.state.mode = mode;
        self.panel.select(mode);
        self.scene.set_mode(mode.bounces(), mode.translates());
    }

    /// Processes one timer tick
    pub fn tick(&mut self) {
        if !self.state.paused {
            self.scene.tick();
        }
    }

    /// Centre of a terminal cell in scene coordinates
    pub fn to_logical(&self, col: u16, row: u16) -> (i32, i32) {
        let Settings {
            cell_width,
            cell_height,
            ..
        } = self.settings;
        let x = i32::from(col) * cell_width + cell_width / 2;
        let y = (i32::from(row) - i32::from(PANEL_ROWS)) * cell_height + cell_height / 2;
        (x, y)
    }

    /// Terminal cell holding a scene point
    pub fn to_cell(&self, point: Vertex) -> (i32, i32) {
        (
            point.x.div_euclid(self.settings.cell_width),
            point.y.div_euclid(self.settings.cell_height) + i32::from(PANEL_ROWS),
        )
    }

    /// Handle a terminal event
    pub fn event(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.key(key),
            Event::Mouse(mouse) => self.mouse(mouse),
            Event::Resize(cols, rows) => self.resize(*cols, *rows),
            _ => {}
        }
    }

    fn key(&mut self, key: &KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q' | 'Q') => self.state.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.quit = true;
            }
            KeyCode::Char('d' | 'D') => self.state.debug = !self.state.debug,
            KeyCode::Char('p' | 'P') => {
                self.state.paused = !self.state.paused;
                // Reset any drag that was in progress
                self.panel_press = false;
                self.scene.cancel_drag();
            }
            KeyCode::Char('r' | 'R') => {
                if !self.state.paused {
                    info!("cube reset");
                    let cube = self.fresh_cube();
                    self.scene.reset(cube);
                }
            }
            KeyCode::Char('1') => self.select_mode(Mode::Bounce),
            KeyCode::Char('2') => self.select_mode(Mode::Translate),
            KeyCode::Char('3') => self.select_mode(Mode::Both),
            _ => {}
        }
    }

    fn mouse(&mut self, mouse: &MouseEvent) {
        let (x, y) = self.to_logical(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(_) if mouse.row < PANEL_ROWS => {
                self.panel_press = true;
                if let Some(mode) = self.panel.hit_test(mouse.column, mouse.row, self.cols) {
                    self.select_mode(mode);
                }
            }
            MouseEventKind::Down(_) => {
                self.panel_press = false;
                if !self.state.paused {
                    self.scene.pointer_down(x, y);
                }
            }
            MouseEventKind::Drag(_) if !self.panel_press && !self.state.paused => {
                self.scene.pointer_drag(x, y);
            }
            MouseEventKind::Up(_) => {
                if std::mem::take(&mut self.panel_press) || self.state.paused {
                    return;
                }
                if let Err(err) = self.scene.pointer_up(x, y) {
                    warn!(%err, "failed to drop cube");
                }
            }
            _ => {}
        }
    }

    /// Paint the scene, panel and overlays into the canvas
    pub fn paint(&mut self, canvas: &mut Canvas) {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        if (canvas.cols(), canvas.rows()) != (self.cols, self.rows) {
            canvas.resize(self.cols, self.rows);
        }

        let background = Cell {
            symbol: ' ',
            fg: Color::Black,
            bg: BACKGROUND,
        };
        canvas.fill_rows(PANEL_ROWS, self.rows.saturating_sub(PANEL_ROWS), background);

        let snapshot = self.scene.snapshot();
        let outline: Vec<(i32, i32)> = snapshot
            .outline
            .iter()
            .map(|&point| self.to_cell(point))
            .collect();
        let cell_width = self.settings.cell_width.max(1);
        let stroke_cells = (i32::from(snapshot.stroke.width) + cell_width - 1) / cell_width;
        let thickness = u16::try_from(stroke_cells).unwrap_or(1).max(1);
        canvas.draw_polygon(
            &outline,
            Cell {
                symbol: '█',
                fg: snapshot.stroke.color,
                bg: BACKGROUND,
            },
            thickness,
        );

        if let Some(line) = snapshot.guide_line {
            canvas.draw_line(
                self.to_cell(line.from),
                self.to_cell(line.to),
                Cell {
                    symbol: '•',
                    fg: GUIDE_COLOR,
                    bg: BACKGROUND,
                },
                1,
                true,
            );
        }

        // The panel goes on top so a cube dragged above the scene stays under it
        self.panel.draw(canvas);

        if self.state.debug {
            self.paint_debug(canvas);
        }

        if self.state.paused {
            let text = " Paused ";
            let col = (i32::from(self.cols) - text.len() as i32) / 2;
            let row = (i32::from(self.rows) + i32::from(PANEL_ROWS)) / 2;
            canvas.draw_text(col, row, text, Color::White, Color::DarkGrey);
        }
    }

    fn paint_debug(&self, canvas: &mut Canvas) {
        let rect = self.scene.cube().bounding_box();
        let [dx, dy] = self.scene.cube().velocity();
        let (width, height) = self.scene.viewport();
        let lines = [
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!(
                "Side: {} Offset: {}",
                self.scene.cube().side_length(),
                self.scene.cube().offset()
            ),
            format!("Bounds: x {} y {} w {} h {}", rect.x, rect.y, rect.width, rect.height),
            format!("Velocity: ({dx}, {dy})"),
            format!("Viewport: {width}x{height}"),
            format!(
                "Mode: {} (bounce {}, translate {})",
                self.state.mode.label(),
                self.scene.bounce_enabled(),
                self.scene.translate_enabled()
            ),
            format!("Dragging: {}", self.scene.is_dragging()),
            format!("FPS: {:.2}", self.fps),
        ];
        for (i, line) in lines.iter().enumerate() {
            let row = i32::from(PANEL_ROWS) + i as i32;
            canvas.draw_text(1, row, line, Color::DarkBlue, BACKGROUND);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::MouseButton;

    const SETTINGS: Settings = Settings {
        side_length: 100,
        offset_scale: 0.33,
        speed: 1,
        cell_width: 8,
        cell_height: 16,
    };

    fn widget_in(mode: Mode) -> CubeWidget {
        let state = AppState {
            mode,
            ..AppState::default()
        };
        CubeWidget::new(SETTINGS, state, 100, 39)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn canvas_text(canvas: &Canvas) -> String {
        let mut text = String::new();
        for row in 0..i32::from(canvas.rows()) {
            for col in 0..i32::from(canvas.cols()) {
                if let Some(cell) = canvas.get(col, row) {
                    text.push(cell.symbol);
                }
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn viewport_follows_terminal_size() {
        let mut widget = widget_in(Mode::Bounce);
        assert_eq!(widget.scene().viewport(), (800, 592));

        widget.event(&Event::Resize(120, 42));
        assert_eq!(widget.scene().viewport(), (960, 640));
    }

    #[test]
    fn cube_starts_at_viewport_centre() {
        let widget = widget_in(Mode::Bounce);
        let rect = widget.scene().cube().bounding_box();
        assert_eq!((rect.x, rect.y), (400, 296));
    }

    #[test]
    fn cells_map_to_their_centres() {
        let widget = widget_in(Mode::Bounce);
        assert_eq!(widget.to_logical(10, 5), (84, 56));
        assert_eq!(widget.to_cell(Vertex::new(84, 56)), (10, 5));
        assert_eq!(widget.to_cell(Vertex::new(-1, -1)), (-1, 1));
    }

    #[test]
    fn mouse_drag_translates_cube() {
        let mut widget = widget_in(Mode::Translate);

        // vertex 0 sits at (433, 296), inside cell (54, 20)
        widget.event(&mouse(MouseEventKind::Down(MouseButton::Left), 54, 20));
        assert!(widget.scene().is_dragging());
        widget.event(&mouse(MouseEventKind::Drag(MouseButton::Left), 58, 22));
        assert!(widget.scene().snapshot().guide_line.is_some());
        widget.event(&mouse(MouseEventKind::Up(MouseButton::Left), 60, 25));

        assert!(!widget.scene().is_dragging());
        assert_eq!(widget.scene().cube().point_at(0), Ok(Vertex::new(484, 376)));
    }

    #[test]
    fn mouse_ignored_in_bounce_mode() {
        let mut widget = widget_in(Mode::Bounce);
        let before = *widget.scene().cube().points();
        widget.event(&mouse(MouseEventKind::Down(MouseButton::Left), 54, 20));
        widget.event(&mouse(MouseEventKind::Up(MouseButton::Left), 10, 10));
        assert_eq!(widget.scene().cube().points(), &before);
    }

    #[test]
    fn panel_click_selects_mode_and_swallows_release() {
        let mut widget = widget_in(Mode::Translate);
        let before = *widget.scene().cube().points();

        // buttons are centred: "Bounce + Translate" spans columns 53..75 on a 100 column screen
        widget.event(&mouse(MouseEventKind::Down(MouseButton::Left), 60, 1));
        assert_eq!(widget.state().mode, Mode::Both);
        assert!(widget.scene().bounce_enabled() && widget.scene().translate_enabled());

        widget.event(&mouse(MouseEventKind::Up(MouseButton::Left), 30, 20));
        assert_eq!(widget.scene().cube().points(), &before);
    }

    #[test]
    fn number_keys_select_modes() {
        let mut widget = widget_in(Mode::Bounce);
        widget.event(&key(KeyCode::Char('2')));
        assert!(!widget.scene().bounce_enabled() && widget.scene().translate_enabled());
        widget.event(&key(KeyCode::Char('3')));
        assert_eq!(widget.state().mode, Mode::Both);
        widget.event(&key(KeyCode::Char('1')));
        assert!(widget.scene().bounce_enabled() && !widget.scene().translate_enabled());
    }

    #[test]
    fn pause_cancels_drag() {
        let mut widget = widget_in(Mode::Translate);
        let before = *widget.scene().cube().points();
        widget.event(&mouse(MouseEventKind::Down(MouseButton::Left), 54, 20));
        assert!(widget.scene().is_dragging());

        widget.event(&key(KeyCode::Char('p')));
        widget.event(&mouse(MouseEventKind::Up(MouseButton::Left), 60, 25));
        widget.event(&key(KeyCode::Char('p')));

        assert!(!widget.scene().is_dragging());
        assert_eq!(widget.scene().snapshot().guide_line, None);
        assert_eq!(widget.scene().cube().points(), &before);
    }

    #[test]
    fn pause_stops_ticks() {
        let mut widget = widget_in(Mode::Bounce);
        widget.event(&key(KeyCode::Char('p')));
        let before = widget.scene().cube().bounding_box();
        widget.tick();
        assert_eq!(widget.scene().cube().bounding_box(), before);

        widget.event(&key(KeyCode::Char('p')));
        widget.tick();
        assert_eq!(widget.scene().cube().bounding_box().x, before.x - 1);
    }

    #[test]
    fn reset_recentres_cube() {
        let mut widget = widget_in(Mode::Bounce);
        for _ in 0..25 {
            widget.tick();
        }
        widget.event(&key(KeyCode::Char('r')));
        let rect = widget.scene().cube().bounding_box();
        assert_eq!((rect.x, rect.y), (400, 296));
    }

    #[test]
    fn quit_keys() {
        let mut widget = widget_in(Mode::Bounce);
        assert!(!widget.should_quit());
        widget.event(&key(KeyCode::Char('q')));
        assert!(widget.should_quit());

        let mut widget = widget_in(Mode::Bounce);
        widget.event(&Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(widget.should_quit());
    }

    #[test]
    fn paint_draws_cube_panel_and_guide() {
        let mut widget = widget_in(Mode::Translate);
        let mut canvas = Canvas::new(1, 1);
        widget.event(&mouse(MouseEventKind::Down(MouseButton::Left), 54, 20));
        widget.event(&mouse(MouseEventKind::Drag(MouseButton::Left), 10, 30));
        widget.paint(&mut canvas);

        assert_eq!((canvas.cols(), canvas.rows()), (100, 39));
        let text = canvas_text(&canvas);
        assert!(text.contains("Mode Selection"));
        assert!(text.contains('█'));
        // vertex 1 at (533, 296), away from the guide line
        assert_eq!(canvas.get(66, 20).map(|cell| cell.fg), Some(Color::Black));
        assert_eq!(canvas.get(10, 30).map(|cell| cell.fg), Some(GUIDE_COLOR));
    }

    #[test]
    fn debug_overlay_shows_state() {
        let mut widget = widget_in(Mode::Bounce);
        widget.event(&key(KeyCode::Char('d')));
        let mut canvas = Canvas::new(100, 39);
        widget.paint(&mut canvas);
        let text = canvas_text(&canvas);
        assert!(text.contains(env!("CARGO_PKG_NAME")));
        assert!(text.contains("Bounds: x 400 y 296 w 133 h 133"));
        assert!(text.contains("Velocity: (-1, -1)"));
    }
}
