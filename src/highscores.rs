//! High score leaderboard system
//!
//! Keeps the top 10 finished games, persisted through the platform store.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES;
use crate::platform::{KeyValueStore, default_store};
use crate::sim::GameState;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Display name submitted with the score
    pub name: String,
    /// Final score
    pub score: u64,
    /// Largest tile reached
    pub max_tile: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    /// Sorted by score, descending
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    const STORAGE_KEY: &'static str = "merge2048_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Must beat the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a finished game to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_score(
        &mut self,
        name: &str,
        score: u64,
        max_tile: u32,
        timestamp: f64,
    ) -> Option<usize> {
        let rank = self.potential_rank(score)?;

        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                name: name.to_string(),
                score,
                max_tile,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);

        log::info!("{name} placed #{rank} with {score}");
        Some(rank)
    }

    /// Record a game's score and best tile, whether it finished or was abandoned
    pub fn submit_game(&mut self, name: &str, state: &GameState, timestamp: f64) -> Option<usize> {
        self.add_score(name, state.score(), state.max_tile(), timestamp)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores, starting fresh on missing or unreadable data
    pub fn load_from(store: &impl KeyValueStore) -> Self {
        match store.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<HighScores>(&json) {
                Ok(mut scores) => {
                    scores.normalize();
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
                Err(e) => log::warn!("Ignoring unreadable high scores: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("High score storage unavailable: {e}"),
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    pub fn save_to(&self, store: &impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
                Err(e) => log::warn!("Failed to save high scores: {e}"),
            },
            Err(e) => log::warn!("Failed to encode high scores: {e}"),
        }
    }

    /// Load from the platform's default store
    pub fn load() -> Self {
        Self::load_from(&default_store())
    }

    pub fn save(&self) {
        self.save_to(&default_store());
    }

    /// Restore ordering and length after loading hand-edited or older data
    fn normalize(&mut self) {
        self.entries.retain(|e| e.score > 0);
        // Stable sort keeps earlier entries ahead on ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }
}
