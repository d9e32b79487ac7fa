//! Game settings and preferences
//!
//! Persisted separately from game saves.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SIZE, MAX_SIZE, MIN_SIZE};
use crate::platform::{KeyValueStore, default_store};

/// Board size presets offered by the front-ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoardPreset {
    Small,
    #[default]
    Classic,
    Large,
}

impl BoardPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardPreset::Small => "Small",
            BoardPreset::Classic => "Classic",
            BoardPreset::Large => "Large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" | "3" => Some(BoardPreset::Small),
            "classic" | "4" => Some(BoardPreset::Classic),
            "large" | "5" => Some(BoardPreset::Large),
            _ => None,
        }
    }

    /// Edge length for this preset
    pub fn size(&self) -> usize {
        match self {
            BoardPreset::Small => 3,
            BoardPreset::Classic => DEFAULT_SIZE,
            BoardPreset::Large => 5,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Board edge length for new games
    pub board_size: usize,
    /// Name submitted with leaderboard entries
    pub player_name: String,
    /// Resume the saved game on launch instead of starting fresh
    pub auto_continue: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_SIZE,
            player_name: "Player".to_string(),
            auto_continue: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "merge2048_settings";

    /// Longest accepted player name
    pub const MAX_NAME_LEN: usize = 16;

    /// Use a preset's board size for new games
    pub fn apply_preset(&mut self, preset: BoardPreset) {
        self.board_size = preset.size();
    }

    /// Board size clamped to what the engine accepts
    pub fn effective_board_size(&self) -> usize {
        self.board_size.clamp(MIN_SIZE, MAX_SIZE)
    }

    /// Player name trimmed and capped, falling back to the default
    pub fn display_name(&self) -> String {
        let name: String = self
            .player_name
            .trim()
            .chars()
            .take(Self::MAX_NAME_LEN)
            .collect();
        if name.is_empty() {
            Self::default().player_name
        } else {
            name
        }
    }

    /// Load settings, falling back to defaults on missing or unreadable data
    pub fn load_from(store: &impl KeyValueStore) -> Self {
        match store.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Settings storage unavailable: {e}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save_to(&self, store: &impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {e}"),
            },
            Err(e) => log::warn!("Failed to encode settings: {e}"),
        }
    }

    /// Load from the platform's default store
    pub fn load() -> Self {
        Self::load_from(&default_store())
    }

    pub fn save(&self) {
        self.save_to(&default_store());
    }
}
