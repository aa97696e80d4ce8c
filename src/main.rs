use std::env;

use macroquad::prelude::*;
use tracing::info;

use snake_arcade::app::App;
use snake_arcade::audio::Sfx;
use snake_arcade::config::{CANVAS_HEIGHT, CANVAS_WIDTH, ClientConfig};
use snake_arcade::input::{InputTracker, Key};
use snake_arcade::scores::HttpScoreSource;
use snake_arcade::settings::FileStorage;
use snake_arcade::surface::MacroquadSurface;

fn window_conf() -> Conf {
    Conf {
        window_title: "Snake".to_owned(),
        window_width: CANVAS_WIDTH,
        window_height: CANVAS_HEIGHT,
        window_resizable: false,
        high_dpi: true,
        ..Default::default()
    }
}

/// Releases codes the tracker still holds but macroquad no longer lists as
/// down, e.g. a release event that was never delivered to us. Clears all
/// when no game key is down at all. Keys that macroquad itself still
/// believes are held after a focus loss are not detected here.
fn reconcile_held(input: &mut InputTracker) {
    let held = input.held_codes();
    if held.is_empty() {
        return;
    }
    let down = get_keys_down();
    if !down.iter().any(|code| Key::from_keycode(*code).is_some()) {
        input.blur();
        return;
    }
    for code in held.into_iter().filter(|code| !down.contains(code)) {
        input.release(code);
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    snake_arcade::init_tracing("snake_arcade=info");

    let config = ClientConfig::from_env(|key| env::var(key).ok());
    let storage = FileStorage::new(config.settings_dir.clone());
    let scores = HttpScoreSource::new(config.scores_url.clone());
    let mut app = App::new(&config, Box::new(storage), Box::new(scores));
    let sfx = Sfx::load().await;
    let mut surface = MacroquadSurface;

    loop {
        reconcile_held(&mut app.ctx.input);
        for code in get_keys_pressed() {
            app.ctx.input.press(code);
        }

        let (_, cues) = app.frame(get_time() * 1000.0, &mut surface);
        for cue in cues {
            sfx.play(cue, app.ctx.settings.current());
        }

        // releases land after the updates so a tap inside one frame is seen
        for code in get_keys_released() {
            app.ctx.input.release(code);
        }

        if app.exit_requested() {
            info!("exit requested");
            break;
        }
        next_frame().await;
    }
}
