use crate::config::DEFAULT_TICK_MS;

/// Top-level screen the state manager dispatches to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum TopState {
    #[default]
    Menu,
    Game,
    Score,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Insane,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Insane,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Insane => "insane",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|d| *d == self).unwrap_or(0)
    }

    pub fn next(self) -> Self { Self::ALL[(self.index() + 1) % Self::ALL.len()] }

    pub fn prev(self) -> Self { Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()] }
}

/// Process-wide mutable record, owned by the application root and lent to
/// whichever component is running this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub top_state: TopState,
    pub accumulated_ms: f64,
    pub tick_ms: f64,
    pub fps: f64,
    pub score: u32,
    pub difficulty: Difficulty,
    pub paused: bool,
    pub exit_requested: bool,
}

impl Default for Session {
    fn default() -> Self { Self::new(DEFAULT_TICK_MS) }
}

impl Session {
    pub fn new(tick_ms: f64) -> Self {
        Self {
            top_state: TopState::Menu,
            accumulated_ms: 0.0,
            tick_ms: if tick_ms > 0.0 { tick_ms } else { DEFAULT_TICK_MS },
            fps: 0.0,
            score: 0,
            difficulty: Difficulty::default(),
            paused: false,
            exit_requested: false,
        }
    }

    /// Enter a fresh game with the currently chosen difficulty.
    pub fn start_game(&mut self) {
        self.score = 0;
        self.paused = false;
        self.top_state = TopState::Game;
    }

    pub fn end_game(&mut self) {
        self.paused = false;
        self.top_state = TopState::Score;
    }

    pub fn return_to_menu(&mut self) {
        self.paused = false;
        self.top_state = TopState::Menu;
    }

    pub fn record_frame_rate(&mut self, frame_ms: f64) {
        if frame_ms > 0.0 {
            self.fps = self.fps * 0.9 + (1000.0 / frame_ms) * 0.1;
        }
    }
}
