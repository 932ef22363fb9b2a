mod cube;
mod graphics;
mod math;
mod panel;
mod scene;
mod state;
mod vertex;
mod widget;

use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::style::ResetColor;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use graphics::Canvas;
use panel::PANEL_ROWS;
use state::{AppState, Mode};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, Level};
use widget::{CubeWidget, Settings};

/// Viewport used when the terminal size cannot be queried
const DEFAULT_WIDTH: i32 = 800;
const DEFAULT_HEIGHT: i32 = 600;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
    #[error("cannot open log file {path}: {source}")]
    LogFile { path: PathBuf, source: io::Error },
}

/// Bouncing wireframe cube in the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Edge length of the cube's front face
    #[arg(
        long,
        default_value_t = cube::DEFAULT_SIDE_LENGTH,
        value_parser = clap::value_parser!(i32).range(1..=100_000)
    )]
    side_length: i32,

    /// Depth offset as a fraction of the side length (0 to 1)
    #[arg(long, default_value_t = cube::DEFAULT_OFFSET_SCALE, value_parser = parse_offset_scale)]
    offset_scale: f64,

    /// Distance moved per tick along each axis
    #[arg(
        long,
        default_value_t = cube::DEFAULT_SPEED,
        value_parser = clap::value_parser!(i32).range(1..=10_000)
    )]
    speed: i32,

    /// Milliseconds between ticks
    #[arg(long, default_value_t = 10)]
    tick_ms: u64,

    /// Logical width of one terminal cell
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(i32).range(1..))]
    cell_width: i32,

    /// Logical height of one terminal cell
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(i32).range(1..))]
    cell_height: i32,

    /// Initial movement mode
    #[arg(long, value_enum, default_value_t = Mode::Bounce)]
    mode: Mode,

    /// Start with the debug overlay shown
    #[arg(long)]
    debug: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Maximum level written to the log file
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn parse_offset_scale(value: &str) -> Result<f64, String> {
    let scale: f64 = value.parse().map_err(|err| format!("{err}"))?;
    if (0.0..=1.0).contains(&scale) {
        Ok(scale)
    } else {
        Err(format!("{scale} is not in 0..=1"))
    }
}

/// Puts the terminal into raw mode on the alternate screen and restores it on drop
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            ResetColor,
            Show,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = disable_raw_mode();
    }
}

fn init_logging(cli: &Cli) -> Result<(), AppError> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path).map_err(|source| AppError::LogFile {
        path: path.clone(),
        source,
    })?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(cli.log_level)
        .init();
    Ok(())
}

/// Terminal size in cells, sized for the default viewport when unknown
fn terminal_size(cli: &Cli) -> (u16, u16) {
    match termsize::get() {
        Some(size) => (size.cols, size.rows),
        None => {
            let cols = DEFAULT_WIDTH / cli.cell_width;
            let rows = DEFAULT_HEIGHT / cli.cell_height + i32::from(PANEL_ROWS);
            (
                u16::try_from(cols).unwrap_or(u16::MAX),
                u16::try_from(rows).unwrap_or(u16::MAX),
            )
        }
    }
}

/// Runs the fixed-interval tick loop until the widget asks to quit
fn run<W: Write>(out: &mut W, widget: &mut CubeWidget, interval: Duration) -> io::Result<()> {
    let mut canvas = Canvas::new(0, 0);
    let mut next_tick = Instant::now() + interval;

    widget.paint(&mut canvas);
    canvas.flush(out)?;

    while !widget.should_quit() {
        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            widget.event(&event::read()?);
        }
        if Instant::now() < next_tick {
            continue;
        }

        widget.tick();
        widget.paint(&mut canvas);
        canvas.flush(out)?;

        // Coalesce missed ticks instead of replaying them
        let now = Instant::now();
        next_tick = (next_tick + interval).max(now);
    }

    Ok(())
}

/// Main function
fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let settings = Settings {
        side_length: cli.side_length,
        offset_scale: cli.offset_scale,
        speed: cli.speed,
        cell_width: cli.cell_width,
        cell_height: cli.cell_height,
    };
    let state = AppState {
        mode: cli.mode,
        debug: cli.debug,
        ..AppState::default()
    };
    let (cols, rows) = terminal_size(&cli);
    let mut widget = CubeWidget::new(settings, state, cols, rows);
    info!(cols, rows, mode = ?cli.mode, "starting");

    let guard = TerminalGuard::enter()?;
    let mut stdout = io::stdout();
    let result = run(&mut stdout, &mut widget, Duration::from_millis(cli.tick_ms.max(1)));
    drop(guard);

    info!("exiting");
    result.map_err(AppError::from)
}
