use clap::ValueEnum;

/// Movement mode offered by the mode selection panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// The cube bounces around the viewport
    #[default]
    Bounce,
    /// The cube stays put and can be dragged to a new spot
    Translate,
    /// Bouncing and dragging at the same time
    Both,
}

impl Mode {
    /// Panel order
    pub const ALL: [Mode; 3] = [Mode::Bounce, Mode::Translate, Mode::Both];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Bounce => "Bounce",
            Mode::Translate => "Translate",
            Mode::Both => "Bounce + Translate",
        }
    }

    pub fn bounces(self) -> bool {
        matches!(self, Mode::Bounce | Mode::Both)
    }

    pub fn translates(self) -> bool {
        matches!(self, Mode::Translate | Mode::Both)
    }
}

/// Application state that lives outside the scene
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Selected movement mode
    pub mode: Mode,
    /// Enable debug overlay
    pub debug: bool,
    /// Simulation paused
    pub paused: bool,
    /// Set once the user asked to leave
    pub quit: bool,
}
