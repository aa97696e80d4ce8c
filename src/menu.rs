//! Data-driven menus: a registry of named item lists plus the navigation
//! state that walks them.

use std::collections::HashMap;

use tracing::debug;

use crate::config::TILE_SIZE;
use crate::draw::{self, Align, Column, SELECTED_COLOR, TEXT_COLOR, TextStyle};
use crate::input::{InputTracker, Key};
use crate::scores::{ScoreCache, ScoreEntry};
use crate::session::{Difficulty, Session, TopState};
use crate::settings::{Settings, SettingsStore, SnakeColor};
use crate::surface::Surface;

const ITEM_SPACING: f32 = 48.0;
const TITLE_SIZE: f32 = 48.0;
const VOLUME_STEP: i32 = 5;

const SCORE_COLUMNS: [Column; 3] = [
    Column { label: "#", width: 4, align: Align::Right },
    Column { label: "Name", width: 20, align: Align::Left },
    Column { label: "Score", width: 8, align: Align::Right },
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MenuId {
    Main,
    Play,
    Settings,
    Audio,
    Highscores,
}

impl MenuId {
    pub fn title(self) -> &'static str {
        match self {
            MenuId::Main => "SNAKE",
            MenuId::Play => "PLAY",
            MenuId::Settings => "SETTINGS",
            MenuId::Audio => "AUDIO",
            MenuId::Highscores => "HIGHSCORES",
        }
    }

    pub fn parent(self) -> Option<MenuId> {
        match self {
            MenuId::Main => None,
            MenuId::Audio => Some(MenuId::Settings),
            MenuId::Play | MenuId::Settings | MenuId::Highscores => Some(MenuId::Main),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DialStep {
    Increment,
    Decrement,
    None,
}

/// Feedback for the host, e.g. to play a sound.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Cue {
    Move,
    Select,
    Adjust,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNav {
    pub current: MenuId,
    pub selected: usize,
}

impl Default for MenuNav {
    fn default() -> Self { Self { current: MenuId::Main, selected: 0 } }
}

impl MenuNav {
    pub fn open(&mut self, id: MenuId) {
        debug!(from = ?self.current, to = ?id, "menu navigation");
        self.current = id;
        self.selected = 0;
    }
}

/// Everything a menu action may change.
pub struct MenuContext<'a> {
    pub session: &'a mut Session,
    pub settings: &'a mut SettingsStore,
    pub nav: &'a mut MenuNav,
}

pub type Action = fn(&mut MenuContext<'_>);
pub type DialAction = fn(&mut MenuContext<'_>, DialStep);
pub type ReadFlag = fn(&Session, &Settings) -> bool;
pub type ReadValue = fn(&Session, &Settings) -> String;

pub enum MenuItem {
    Button { label: &'static str, action: Action },
    Checkbox { label: &'static str, value: ReadFlag, action: Action },
    Dial { label: &'static str, value: ReadValue, action: DialAction },
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Button { label, .. }
            | MenuItem::Checkbox { label, .. }
            | MenuItem::Dial { label, .. } => *label,
        }
    }
}

fn step_volume(volume: u8, step: DialStep) -> u8 {
    let delta = match step {
        DialStep::Increment => VOLUME_STEP,
        DialStep::Decrement => -VOLUME_STEP,
        DialStep::None => 0,
    };
    (volume as i32 + delta).clamp(0, 100) as u8
}

fn cycle<T>(value: T, step: DialStep, next: fn(T) -> T, prev: fn(T) -> T) -> T {
    match step {
        DialStep::Increment => next(value),
        DialStep::Decrement => prev(value),
        DialStep::None => value,
    }
}

fn main_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::Button { label: "Play", action: |ctx| ctx.nav.open(MenuId::Play) },
        MenuItem::Button { label: "Highscores", action: |ctx| ctx.nav.open(MenuId::Highscores) },
        MenuItem::Button { label: "Settings", action: |ctx| ctx.nav.open(MenuId::Settings) },
        MenuItem::Button { label: "Quit", action: |ctx| ctx.session.exit_requested = true },
    ]
}

fn play_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::Dial {
            label: "Difficulty",
            value: |session, _| session.difficulty.label().to_string(),
            action: |ctx, step| {
                ctx.session.difficulty = cycle(ctx.session.difficulty, step, Difficulty::next, Difficulty::prev);
                ctx.settings.commit();
            },
        },
        MenuItem::Button {
            label: "Start",
            action: |ctx| {
                ctx.nav.open(MenuId::Main);
                ctx.session.start_game();
            },
        },
        MenuItem::Button { label: "Back", action: |ctx| ctx.nav.open(MenuId::Main) },
    ]
}

fn settings_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::Dial {
            label: "Snake color",
            value: |_, settings| settings.snake_color.label().to_string(),
            action: |ctx, step| {
                ctx.settings.update(|s| s.snake_color = cycle(s.snake_color, step, SnakeColor::next, SnakeColor::prev))
            },
        },
        MenuItem::Checkbox {
            label: "Grid lines",
            value: |_, settings| settings.grid_lines,
            action: |ctx| ctx.settings.update(|s| s.grid_lines = !s.grid_lines),
        },
        MenuItem::Checkbox {
            label: "Warp walls",
            value: |_, settings| settings.warp_walls,
            action: |ctx| ctx.settings.update(|s| s.warp_walls = !s.warp_walls),
        },
        MenuItem::Checkbox {
            label: "Show FPS",
            value: |_, settings| settings.show_fps,
            action: |ctx| ctx.settings.update(|s| s.show_fps = !s.show_fps),
        },
        MenuItem::Button { label: "Audio", action: |ctx| ctx.nav.open(MenuId::Audio) },
        MenuItem::Button { label: "Back", action: |ctx| ctx.nav.open(MenuId::Main) },
    ]
}

fn audio_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::Dial {
            label: "Sound volume",
            value: |_, settings| settings.sound_volume.to_string(),
            action: |ctx, step| ctx.settings.update(|s| s.sound_volume = step_volume(s.sound_volume, step)),
        },
        MenuItem::Checkbox {
            label: "Mute sound",
            value: |_, settings| settings.sound_mute,
            action: |ctx| ctx.settings.update(|s| s.sound_mute = !s.sound_mute),
        },
        MenuItem::Dial {
            label: "Music volume",
            value: |_, settings| settings.music_volume.to_string(),
            action: |ctx, step| ctx.settings.update(|s| s.music_volume = step_volume(s.music_volume, step)),
        },
        MenuItem::Checkbox {
            label: "Mute music",
            value: |_, settings| settings.music_mute,
            action: |ctx| ctx.settings.update(|s| s.music_mute = !s.music_mute),
        },
        MenuItem::Button { label: "Back", action: |ctx| ctx.nav.open(MenuId::Settings) },
    ]
}

fn highscores_menu() -> Vec<MenuItem> {
    vec![MenuItem::Button { label: "Back", action: |ctx| ctx.nav.open(MenuId::Main) }]
}

pub struct MenuRegistry {
    menus: HashMap<MenuId, Vec<MenuItem>>,
}

impl Default for MenuRegistry {
    fn default() -> Self { Self::standard() }
}

impl MenuRegistry {
    pub fn standard() -> Self {
        let mut menus = HashMap::new();
        menus.insert(MenuId::Main, main_menu());
        menus.insert(MenuId::Play, play_menu());
        menus.insert(MenuId::Settings, settings_menu());
        menus.insert(MenuId::Audio, audio_menu());
        menus.insert(MenuId::Highscores, highscores_menu());
        Self { menus }
    }

    pub fn items(&self, id: MenuId) -> &[MenuItem] {
        self.menus.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Handle every held navigation key once, then consume it so holding a
    /// key does not repeat the action on the next tick.
    pub fn update(&self, input: &mut InputTracker, ctx: &mut MenuContext<'_>) -> Vec<Cue> {
        let mut cues = Vec::new();

        for key in input.snapshot() {
            let items = self.items(ctx.nav.current);
            if items.is_empty() {
                break;
            }
            let len = items.len();
            let selected = ctx.nav.selected.min(len - 1);

            let cue = match key {
                Key::Up => {
                    ctx.nav.selected = (selected + len - 1) % len;
                    Some(Cue::Move)
                }
                Key::Down => {
                    ctx.nav.selected = (selected + 1) % len;
                    Some(Cue::Move)
                }
                Key::Left | Key::Right => match &items[selected] {
                    MenuItem::Dial { action, .. } => {
                        let step = if key == Key::Left { DialStep::Decrement } else { DialStep::Increment };
                        action(ctx, step);
                        Some(Cue::Adjust)
                    }
                    _ => None,
                },
                Key::Enter | Key::Space => match &items[selected] {
                    MenuItem::Button { action, .. } | MenuItem::Checkbox { action, .. } => {
                        action(ctx);
                        Some(Cue::Select)
                    }
                    MenuItem::Dial { .. } => None,
                },
                Key::Escape => ctx.nav.current.parent().map(|parent| {
                    ctx.nav.open(parent);
                    Cue::Back
                }),
                Key::Pause => continue,
            };

            input.consume(key);
            cues.extend(cue);

            // an action left the menu; remaining keys belong to the next state
            if ctx.session.exit_requested || ctx.session.top_state != TopState::Menu {
                break;
            }
        }

        cues
    }

    pub fn render(
        &self,
        surface: &mut dyn Surface,
        nav: &MenuNav,
        session: &Session,
        settings: &Settings,
        scores: &mut ScoreCache,
        now: f64,
    ) {
        surface.clear();
        if settings.grid_lines {
            draw::grid(surface, TILE_SIZE as f32);
        }

        let (w, h) = surface.size();
        let cx = w * 0.5;
        let items = self.items(nav.current);

        if nav.current == MenuId::Highscores {
            scores.refresh(now);
            let top = render_score_table(surface, scores.entries(), scores.is_loading());
            for (i, item) in items.iter().enumerate() {
                let y = top + ITEM_SPACING * i as f32;
                render_item(surface, item, cx, y, i == nav.selected, session, settings);
            }
            return;
        }

        let total = ITEM_SPACING * items.len() as f32;
        let first = (h - total) * 0.5 + ITEM_SPACING * 0.5;

        let title_style = TextStyle { color: SELECTED_COLOR, size: TITLE_SIZE, align: Align::Center };
        draw::text(surface, nav.current.title(), cx, first - ITEM_SPACING * 1.5, title_style);

        for (i, item) in items.iter().enumerate() {
            let y = first + ITEM_SPACING * i as f32;
            render_item(surface, item, cx, y, i == nav.selected, session, settings);
        }
    }
}

fn render_item(
    surface: &mut dyn Surface,
    item: &MenuItem,
    x: f32,
    y: f32,
    selected: bool,
    session: &Session,
    settings: &Settings,
) {
    match item {
        MenuItem::Button { label, .. } => draw::button(surface, label, x, y, selected),
        MenuItem::Checkbox { label, value, .. } => {
            draw::checkbox(surface, label, x, y, selected, value(session, settings))
        }
        MenuItem::Dial { label, value, .. } => {
            draw::dial(surface, label, &value(session, settings), x, y, selected)
        }
    }
}

/// Draws title and table; returns the y at which items below it start.
fn render_score_table(surface: &mut dyn Surface, entries: &[ScoreEntry], loading: bool) -> f32 {
    let (w, h) = surface.size();
    let cx = w * 0.5;
    let title_y = 60.0;
    let table_top = 120.0;
    let reserved_below = 120.0;

    let title_style = TextStyle { color: SELECTED_COLOR, size: TITLE_SIZE, align: Align::Center };
    draw::text(surface, MenuId::Highscores.title(), cx, title_y, title_style);

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.rank.map(|r| r.to_string()).unwrap_or_default(),
                e.name.clone(),
                e.score.to_string(),
            ]
        })
        .collect();

    let layout = draw::table_layout(rows.len(), h - table_top - reserved_below);
    let header = draw::table_header(&SCORE_COLUMNS);
    let x = cx - surface.measure_text(&header, layout.font_size) * 0.5;
    draw::table(surface, &rows, &SCORE_COLUMNS, x, table_top, layout);

    let mut bottom = table_top + layout.row_height * (rows.len() as f32 + 2.0);
    if rows.is_empty() {
        let note = if loading { "Loading..." } else { "No scores yet" };
        let style = TextStyle { color: TEXT_COLOR, size: layout.font_size, align: Align::Center };
        draw::text(surface, note, cx, bottom, style);
        bottom += layout.row_height;
    }

    bottom + ITEM_SPACING
}
