use std::collections::HashSet;

use macroquad::input::KeyCode;

/// Keys the game reacts to. Everything else is dropped at the host boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Escape,
    Pause,
}

impl Key {
    pub fn from_keycode(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::Up | KeyCode::W => Some(Key::Up),
            KeyCode::Down | KeyCode::S => Some(Key::Down),
            KeyCode::Left | KeyCode::A => Some(Key::Left),
            KeyCode::Right | KeyCode::D => Some(Key::Right),
            KeyCode::Enter | KeyCode::KpEnter => Some(Key::Enter),
            KeyCode::Space => Some(Key::Space),
            KeyCode::Escape => Some(Key::Escape),
            KeyCode::P => Some(Key::Pause),
            _ => None,
        }
    }
}

/// Set of keys currently held. Consumers that want one action per press
/// remove the key themselves with [`InputTracker::consume`].
///
/// The host feeds raw codes through [`press`](Self::press) and
/// [`release`](Self::release); a game key stays down while any of its
/// aliases (arrow or WASD) is physically held.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    keys: HashSet<Key>,
    codes: HashSet<KeyCode>,
}

impl InputTracker {
    pub fn new() -> Self { Self::default() }

    pub fn key_down(&mut self, key: Key) { self.keys.insert(key); }

    pub fn key_up(&mut self, key: Key) { self.keys.remove(&key); }

    pub fn press(&mut self, code: KeyCode) {
        if let Some(key) = Key::from_keycode(code) {
            self.codes.insert(code);
            self.key_down(key);
        }
    }

    pub fn release(&mut self, code: KeyCode) {
        let Some(key) = Key::from_keycode(code) else { return };
        self.codes.remove(&code);
        let alias_held = self.codes.iter().any(|c| Key::from_keycode(*c) == Some(key));
        if !alias_held {
            self.key_up(key);
        }
    }

    /// Physical codes pressed and not yet released.
    pub fn held_codes(&self) -> Vec<KeyCode> { self.codes.iter().copied().collect() }

    /// Focus loss: nothing can be considered held any more.
    pub fn blur(&mut self) {
        self.clear();
        self.codes.clear();
    }

    pub fn is_down(&self, key: Key) -> bool { self.keys.contains(&key) }

    pub fn consume(&mut self, key: Key) -> bool { self.keys.remove(&key) }

    pub fn clear(&mut self) { self.keys.clear(); }

    pub fn is_empty(&self) -> bool { self.keys.is_empty() }

    /// Held keys in a stable order, detached from the live set.
    pub fn snapshot(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.keys.iter().copied().collect();
        keys.sort();
        keys
    }
}
