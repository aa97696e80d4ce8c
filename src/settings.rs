use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use macroquad::color::{BLUE, Color, GREEN, RED, WHITE, YELLOW};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::SETTINGS_KEY;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnakeColor {
    #[default]
    Green,
    Red,
    Blue,
    Yellow,
    White,
}

const COLOR_LABELS: &[&str] = &["green", "red", "blue", "yellow", "white"];

impl SnakeColor {
    pub const ALL: [SnakeColor; 5] = [
        SnakeColor::Green,
        SnakeColor::Red,
        SnakeColor::Blue,
        SnakeColor::Yellow,
        SnakeColor::White,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    pub fn label(self) -> &'static str { COLOR_LABELS[self.index()] }

    pub fn next(self) -> Self { Self::ALL[(self.index() + 1) % Self::ALL.len()] }

    pub fn prev(self) -> Self { Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()] }

    pub fn color(self) -> Color {
        match self {
            SnakeColor::Green => GREEN,
            SnakeColor::Red => RED,
            SnakeColor::Blue => BLUE,
            SnakeColor::Yellow => YELLOW,
            SnakeColor::White => WHITE,
        }
    }
}

/// User preferences. Persisted as one JSON blob with camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub snake_color: SnakeColor,
    pub grid_lines: bool,
    pub warp_walls: bool,
    pub sound_volume: u8,
    pub sound_mute: bool,
    pub music_volume: u8,
    pub music_mute: bool,
    #[serde(rename = "showFPS")]
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snake_color: SnakeColor::Green,
            grid_lines: true,
            warp_walls: false,
            sound_volume: 80,
            sound_mute: false,
            music_volume: 80,
            music_mute: false,
            show_fps: true,
        }
    }
}

impl Settings {
    /// Re-run validation over an already typed record.
    pub fn validated(&self) -> Settings {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => validate(&map),
            _ => Settings::default(),
        }
    }

    /// Effective sound effect gain in `0.0..=1.0`.
    pub fn sfx_gain(&self) -> f32 {
        if self.sound_mute { 0.0 } else { self.sound_volume as f32 / 100.0 }
    }
}

enum Rule {
    OneOf(&'static [&'static str]),
    Range { min: f64, max: f64 },
}

fn rule_for(key: &str) -> Option<Rule> {
    match key {
        "snakeColor" => Some(Rule::OneOf(COLOR_LABELS)),
        "soundVolume" | "musicVolume" => Some(Rule::Range { min: 0.0, max: 100.0 }),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Build a settings record from untrusted key/value pairs.
///
/// Starts from the defaults and takes each recognized key whose JSON type
/// matches the default's. Enum values outside their option list keep the
/// default; numbers outside their range are clamped (and rounded to whole
/// numbers). Unknown keys are ignored.
pub fn validate(candidate: &Map<String, Value>) -> Settings {
    let defaults = Settings::default();
    let Ok(Value::Object(mut result)) = serde_json::to_value(&defaults) else {
        return defaults;
    };

    let keys: Vec<String> = result.keys().cloned().collect();
    for key in keys {
        let Some(value) = candidate.get(&key) else { continue };
        let Some(default) = result.get(&key) else { continue };

        if kind(value) != kind(default) {
            warn!(setting = %key, found = kind(value), "invalid type for setting, using default");
            continue;
        }

        let accepted = match rule_for(&key) {
            Some(Rule::OneOf(options)) => match value.as_str() {
                Some(s) if options.contains(&s) => value.clone(),
                _ => {
                    warn!(setting = %key, value = %value, "invalid value for setting, using default");
                    continue;
                }
            },
            Some(Rule::Range { min, max }) => {
                let Some(n) = value.as_f64() else { continue };
                Value::from(n.clamp(min, max).round() as u64)
            }
            None => value.clone(),
        };
        result.insert(key, accepted);
    }

    serde_json::from_value(Value::Object(result)).unwrap_or_else(|err| {
        warn!(%err, "validated settings did not decode, using defaults");
        Settings::default()
    })
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key/value blob storage for durable preferences.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

    fn path_for(&self, key: &str) -> PathBuf { self.dir.join(format!("{key}.json")) }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if !self.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;
        }
        fs::write(&path, value).map_err(|source| StorageError::Write { path, source })
    }
}

/// In-memory storage; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.entries.borrow_mut().insert(key.to_string(), value.to_string());
        storage
    }

    pub fn get(&self, key: &str) -> Option<String> { self.entries.borrow().get(key).cloned() }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> { Ok(self.get(key)) }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Live settings plus the storage they persist to.
pub struct SettingsStore {
    storage: Box<dyn Storage>,
    current: Settings,
}

impl SettingsStore {
    /// Never fails: missing data is seeded with defaults, unreadable or
    /// malformed data falls back to defaults in memory only.
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let mut store = Self { storage, current: Settings::default() };

        match store.storage.read(SETTINGS_KEY) {
            Ok(Some(raw)) if !raw.trim().is_empty() => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => store.current = validate(&map),
                Ok(other) => warn!(found = kind(&other), "saved settings are not an object, using defaults"),
                Err(err) => warn!(%err, "failed to parse settings, using defaults"),
            },
            Ok(_) => {
                info!("no saved settings, persisting defaults");
                if let Err(err) = store.save() {
                    warn!(%err, "failed to persist default settings");
                }
            }
            Err(err) => warn!(%err, "failed to read settings, using defaults"),
        }

        store
    }

    pub fn current(&self) -> &Settings { &self.current }

    /// Revalidate the live record and write it out.
    pub fn save(&mut self) -> Result<(), StorageError> {
        self.current = self.current.validated();
        let text = serde_json::to_string(&self.current)?;
        self.storage.write(SETTINGS_KEY, &text)
    }

    /// Mutate, then revalidate and persist. Write failures are logged and the
    /// in-memory record is kept.
    pub fn update<F: FnOnce(&mut Settings)>(&mut self, f: F) {
        f(&mut self.current);
        self.commit();
    }

    pub fn commit(&mut self) {
        if let Err(err) = self.save() {
            warn!(%err, "failed to persist settings");
        }
    }
}
