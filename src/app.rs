use tracing::info;

use crate::config::ClientConfig;
use crate::input::InputTracker;
use crate::main_loop::{Frame, FrameReport, MainLoop};
use crate::menu::{Cue, MenuNav, MenuRegistry};
use crate::scores::{ScoreCache, ScoreSource};
use crate::session::Session;
use crate::settings::{SettingsStore, Storage};
use crate::state_manager::{Context, StateManager};
use crate::surface::Surface;

/// Application root. Owns every piece of mutable state and lends it out
/// one frame at a time.
pub struct App {
    pub ctx: Context,
    pub manager: StateManager,
    main_loop: MainLoop,
}

impl App {
    pub fn new(config: &ClientConfig, storage: Box<dyn Storage>, scores: Box<dyn ScoreSource>) -> Self {
        let settings = SettingsStore::load(storage);
        info!(tick_ms = config.tick_ms, scores_url = %config.scores_url, "client starting");
        Self {
            ctx: Context {
                session: Session::new(config.tick_ms),
                settings,
                input: InputTracker::new(),
                nav: MenuNav::default(),
                scores: ScoreCache::new(scores),
            },
            manager: StateManager::new(MenuRegistry::standard()),
            main_loop: MainLoop::new(),
        }
    }

    /// Runs one display frame at time `t` (ms) and returns the sound cues
    /// raised by the updates it ran.
    pub fn frame(&mut self, t: f64, surface: &mut dyn Surface) -> (FrameReport, Vec<Cue>) {
        let mut stage = Stage { ctx: &mut self.ctx, manager: &mut self.manager, surface, cues: Vec::new() };
        let report = self.main_loop.frame(t, &mut stage);
        (report, stage.cues)
    }

    pub fn exit_requested(&self) -> bool { self.ctx.session.exit_requested }
}

struct Stage<'a> {
    ctx: &'a mut Context,
    manager: &'a mut StateManager,
    surface: &'a mut dyn Surface,
    cues: Vec<Cue>,
}

impl Frame for Stage<'_> {
    fn session(&mut self) -> &mut Session { &mut self.ctx.session }

    fn update(&mut self) {
        let cues = self.manager.update(self.ctx);
        self.cues.extend(cues);
    }

    fn poll_paused(&mut self) {
        let cues = self.manager.poll_paused(self.ctx);
        self.cues.extend(cues);
    }

    fn render(&mut self, t: f64) { self.manager.render(self.ctx, t, self.surface); }
}
