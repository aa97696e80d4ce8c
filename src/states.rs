//! Update/render pairs for the Game and Score screens. Snake movement and
//! collisions are not wired in yet; the board shows a resting snake.

use macroquad::color::Color;

use crate::config::{GRID_COLS, GRID_ROWS, TILE_SIZE};
use crate::draw::{self, Align, SELECTED_COLOR, TEXT_COLOR, TextStyle};
use crate::input::{InputTracker, Key};
use crate::menu::Cue;
use crate::session::Session;
use crate::settings::Settings;
use crate::surface::Surface;

const START_LENGTH: i32 = 3;
const PAUSE_SHADE: Color = Color::new(0.0, 0.0, 0.0, 0.4);

pub fn update_game(input: &mut InputTracker, session: &mut Session) -> Vec<Cue> {
    let mut cues = Vec::new();
    if input.consume(Key::Pause) {
        session.paused = true;
        cues.push(Cue::Select);
    }
    if input.consume(Key::Escape) {
        session.end_game();
        cues.push(Cue::Back);
    }
    cues
}

/// Runs once per frame while paused, in place of the update ticks.
pub fn poll_paused(input: &mut InputTracker, session: &mut Session) -> Vec<Cue> {
    let mut cues = Vec::new();
    if input.consume(Key::Pause) {
        session.paused = false;
        cues.push(Cue::Select);
    }
    if input.consume(Key::Escape) {
        session.end_game();
        cues.push(Cue::Back);
    }
    cues
}

pub fn render_game(surface: &mut dyn Surface, session: &Session, settings: &Settings) {
    surface.clear();
    if settings.grid_lines {
        draw::grid(surface, TILE_SIZE as f32);
    }
    let (w, h) = surface.size();

    // resting snake, head first, facing right
    let tile = TILE_SIZE as f32;
    let head_x = GRID_COLS / 2;
    let head_y = GRID_ROWS / 2;
    for i in 0..START_LENGTH {
        let x = (head_x - i) as f32 * tile;
        let y = head_y as f32 * tile;
        surface.fill_rect(x, y, tile, tile, settings.snake_color.color());
    }

    draw::text(surface, "Playing - Enjoy!!!", w * 0.5, 50.0, TextStyle::default());
    let hud = format!("Score: {}   Difficulty: {}", session.score, session.difficulty.label());
    let hud_style = TextStyle { color: TEXT_COLOR, size: 20.0, align: Align::Left };
    draw::text(surface, &hud, 8.0, h - 20.0, hud_style);

    if session.paused {
        surface.fill_rect(0.0, 0.0, w, h, PAUSE_SHADE);
        let title = TextStyle { color: SELECTED_COLOR, size: 48.0, align: Align::Center };
        draw::text(surface, "PAUSED", w * 0.5, h * 0.4, title);
        draw::text(surface, "P: resume   Esc: end run", w * 0.5, h * 0.4 + 56.0, TextStyle::default());
    }
}

pub fn update_score(input: &mut InputTracker, session: &mut Session) -> Vec<Cue> {
    let mut leave = false;
    for key in [Key::Enter, Key::Space, Key::Escape] {
        leave |= input.consume(key);
    }
    if leave {
        session.return_to_menu();
        vec![Cue::Back]
    } else {
        Vec::new()
    }
}

pub fn render_score(surface: &mut dyn Surface, session: &Session, settings: &Settings) {
    surface.clear();
    if settings.grid_lines {
        draw::grid(surface, TILE_SIZE as f32);
    }
    let (w, h) = surface.size();
    let title = TextStyle { color: SELECTED_COLOR, size: 48.0, align: Align::Center };
    draw::text(surface, "GAME OVER", w * 0.5, h * 0.35, title);
    draw::text(surface, &format!("Score: {}", session.score), w * 0.5, h * 0.35 + 64.0, TextStyle::default());
    draw::text(surface, "Enter: back to menu", w * 0.5, h * 0.35 + 112.0, TextStyle::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TopState;
    use crate::surface::{DrawCall, RecordingSurface};

    fn in_game() -> Session {
        let mut session = Session::default();
        session.start_game();
        session
    }

    #[test]
    fn pause_key_pauses_and_resumes() {
        let mut session = in_game();
        let mut input = InputTracker::new();

        input.key_down(Key::Pause);
        update_game(&mut input, &mut session);
        assert!(session.paused);
        assert!(input.is_empty());

        input.key_down(Key::Pause);
        poll_paused(&mut input, &mut session);
        assert!(!session.paused);
    }

    #[test]
    fn escape_ends_the_run() {
        let mut session = in_game();
        let mut input = InputTracker::new();
        input.key_down(Key::Escape);

        assert_eq!(update_game(&mut input, &mut session), vec![Cue::Back]);
        assert_eq!(session.top_state, TopState::Score);
    }

    #[test]
    fn score_screen_returns_to_menu() {
        let mut session = in_game();
        session.end_game();
        let mut input = InputTracker::new();

        assert!(update_score(&mut input, &mut session).is_empty());
        input.key_down(Key::Enter);
        update_score(&mut input, &mut session);
        assert_eq!(session.top_state, TopState::Menu);
    }

    #[test]
    fn game_renders_snake_in_chosen_color() {
        let session = in_game();
        let settings = Settings { snake_color: crate::settings::SnakeColor::Red, grid_lines: false, ..Settings::default() };
        let mut surface = RecordingSurface::new(800.0, 600.0);

        render_game(&mut surface, &session, &settings);

        let cells: Vec<_> = surface
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Rect { x, y, color, .. } => Some((*x, *y, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0], (400.0, 300.0, macroquad::color::RED));
        assert!(surface.find_text("PAUSED").is_none());
    }

    #[test]
    fn paused_game_draws_overlay() {
        let mut session = in_game();
        session.paused = true;
        let mut surface = RecordingSurface::new(800.0, 600.0);

        render_game(&mut surface, &session, &Settings::default());

        assert!(surface.find_text("PAUSED").is_some());
    }

    #[test]
    fn score_screen_shows_score() {
        let mut session = in_game();
        session.score = 12;
        session.end_game();
        let mut surface = RecordingSurface::new(800.0, 600.0);

        render_score(&mut surface, &session, &Settings::default());

        assert!(surface.texts().contains(&"Score: 12"));
    }
}
