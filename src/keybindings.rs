//! Tag hot keys.
//!
//! Digit keys apply the tag at a position in the project's tag list; the
//! lock modifier plus a digit toggles that tag's lock instead.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_TAG_HOTKEYS;

/// Keys that can be bound to tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
}

impl KeyCode {
    /// Key for a digit character.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '0' => KeyCode::Key0,
            '1' => KeyCode::Key1,
            '2' => KeyCode::Key2,
            '3' => KeyCode::Key3,
            '4' => KeyCode::Key4,
            '5' => KeyCode::Key5,
            '6' => KeyCode::Key6,
            '7' => KeyCode::Key7,
            '8' => KeyCode::Key8,
            '9' => KeyCode::Key9,
            _ => return None,
        })
    }
}

/// Modifier held together with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Modifier {
    #[default]
    Ctrl,
    Shift,
    Alt,
}

/// Modifier state of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn only(modifier: Modifier) -> Self {
        let mut m = Self::default();
        match modifier {
            Modifier::Ctrl => m.ctrl = true,
            Modifier::Shift => m.shift = true,
            Modifier::Alt => m.alt = true,
        }
        m
    }

    pub fn holds(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Ctrl => self.ctrl,
            Modifier::Shift => self.shift,
            Modifier::Alt => self.alt,
        }
    }
}

/// What a tag hot key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotKeyAction {
    /// Apply the tag at this index to the selected regions.
    ApplyTag(usize),
    /// Toggle the lock on the tag at this index.
    ToggleLock(usize),
}

/// Hot key configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Hotkeys for tags (indices 0-9 map to tags 1-10)
    /// None means no hotkey assigned for that slot
    pub tag_hotkeys: [Option<KeyCode>; MAX_TAG_HOTKEYS],

    /// Modifier that turns a tag hot key into a lock toggle.
    pub lock_modifier: Modifier,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            // 1-9 then 0 for the tenth tag
            tag_hotkeys: [
                Some(KeyCode::Key1),
                Some(KeyCode::Key2),
                Some(KeyCode::Key3),
                Some(KeyCode::Key4),
                Some(KeyCode::Key5),
                Some(KeyCode::Key6),
                Some(KeyCode::Key7),
                Some(KeyCode::Key8),
                Some(KeyCode::Key9),
                Some(KeyCode::Key0),
            ],
            lock_modifier: Modifier::Ctrl,
        }
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the tag index (0-based) bound to a key, if any.
    pub fn tag_index_for_key(&self, key: KeyCode) -> Option<usize> {
        self.tag_hotkeys
            .iter()
            .position(|hotkey| *hotkey == Some(key))
    }

    pub fn key_for_tag_index(&self, index: usize) -> Option<KeyCode> {
        self.tag_hotkeys.get(index).copied().flatten()
    }

    /// Set the hotkey for a tag index. Out of range indices are ignored.
    pub fn set_tag_key(&mut self, index: usize, key: Option<KeyCode>) {
        if index < MAX_TAG_HOTKEYS {
            self.tag_hotkeys[index] = key;
        }
    }

    /// Resolve a key event against a project with `tag_count` tags.
    ///
    /// Returns None when the key is unbound or its tag does not exist.
    pub fn action_for(&self, key: KeyCode, modifiers: Modifiers, tag_count: usize) -> Option<HotKeyAction> {
        let index = self.tag_index_for_key(key)?;
        if index >= tag_count {
            return None;
        }
        if modifiers.holds(self.lock_modifier) {
            Some(HotKeyAction::ToggleLock(index))
        } else {
            Some(HotKeyAction::ApplyTag(index))
        }
    }

    /// Returns which tag slot already uses a key, if any.
    pub fn key_conflict(&self, key: KeyCode, exclude_index: Option<usize>) -> Option<String> {
        self.tag_hotkeys
            .iter()
            .enumerate()
            .find(|(i, hotkey)| Some(*i) != exclude_index && **hotkey == Some(key))
            .map(|(i, _)| format!("Tag {}", i + 1))
    }
}

/// Convert a KeyCode to a display string.
pub fn key_to_string(key: KeyCode) -> &'static str {
    match key {
        KeyCode::Key0 => "0",
        KeyCode::Key1 => "1",
        KeyCode::Key2 => "2",
        KeyCode::Key3 => "3",
        KeyCode::Key4 => "4",
        KeyCode::Key5 => "5",
        KeyCode::Key6 => "6",
        KeyCode::Key7 => "7",
        KeyCode::Key8 => "8",
        KeyCode::Key9 => "9",
    }
}
