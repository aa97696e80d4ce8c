use macroquad::color::Color;

use crate::config::FPS_REFRESH_MS;
use crate::draw::{self, Align, TextStyle};
use crate::input::InputTracker;
use crate::menu::{Cue, MenuContext, MenuNav, MenuRegistry};
use crate::scores::ScoreCache;
use crate::session::{Session, TopState};
use crate::settings::SettingsStore;
use crate::states;
use crate::surface::Surface;

const FPS_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.8);

/// Mutable state lent to whichever screen is active.
pub struct Context {
    pub session: Session,
    pub settings: SettingsStore,
    pub input: InputTracker,
    pub nav: MenuNav,
    pub scores: ScoreCache,
}

/// Dispatches update/render to the active top-level state and overlays the
/// frame-rate readout.
pub struct StateManager {
    menus: MenuRegistry,
    fps_text: String,
    last_fps_refresh: Option<f64>,
}

impl StateManager {
    pub fn new(menus: MenuRegistry) -> Self {
        Self { menus, fps_text: "0.0".to_string(), last_fps_refresh: None }
    }

    pub fn update(&mut self, ctx: &mut Context) -> Vec<Cue> {
        match ctx.session.top_state {
            TopState::Menu => {
                let mut menu_ctx = MenuContext {
                    session: &mut ctx.session,
                    settings: &mut ctx.settings,
                    nav: &mut ctx.nav,
                };
                self.menus.update(&mut ctx.input, &mut menu_ctx)
            }
            TopState::Game => states::update_game(&mut ctx.input, &mut ctx.session),
            TopState::Score => states::update_score(&mut ctx.input, &mut ctx.session),
        }
    }

    /// Called once per frame instead of `update` while the session is paused.
    pub fn poll_paused(&mut self, ctx: &mut Context) -> Vec<Cue> {
        match ctx.session.top_state {
            TopState::Game => states::poll_paused(&mut ctx.input, &mut ctx.session),
            TopState::Menu | TopState::Score => {
                // only a running game can be paused
                ctx.session.paused = false;
                Vec::new()
            }
        }
    }

    pub fn render(&mut self, ctx: &mut Context, t: f64, surface: &mut dyn Surface) {
        match ctx.session.top_state {
            TopState::Menu => self.menus.render(
                surface,
                &ctx.nav,
                &ctx.session,
                ctx.settings.current(),
                &mut ctx.scores,
                t,
            ),
            TopState::Game => states::render_game(surface, &ctx.session, ctx.settings.current()),
            TopState::Score => states::render_score(surface, &ctx.session, ctx.settings.current()),
        }

        if ctx.settings.current().show_fps {
            self.draw_fps(ctx.session.fps, t, surface);
        }
    }

    fn draw_fps(&mut self, fps: f64, t: f64, surface: &mut dyn Surface) {
        let due = self.last_fps_refresh.is_none_or(|last| t - last >= FPS_REFRESH_MS);
        if due {
            self.fps_text = format!("{fps:.1}");
            self.last_fps_refresh = Some(t);
        }
        let style = TextStyle { color: FPS_COLOR, size: 16.0, align: Align::Left };
        draw::text(surface, &format!("FPS: {}", self.fps_text), 8.0, 16.0, style);
    }
}
