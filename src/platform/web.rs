//! JS bindings for the web front-end
//!
//! The JS side owns drawing, animation and input capture. It calls `play`
//! once per accepted key/swipe and animates the returned trace.

use wasm_bindgen::prelude::*;

use super::storage::LocalStore;
use super::time::now_ms;
use crate::consts::{MAX_SIZE, MIN_SIZE};
use crate::highscores::HighScores;
use crate::persistence;
use crate::settings::Settings;
use crate::sim::{Direction, GamePhase, GameState, new_game, play_turn};

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One game session driven from JavaScript
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    high_scores: HighScores,
    submitted: bool,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a fresh game. `size` of 0 uses the saved settings.
    #[wasm_bindgen(constructor)]
    pub fn new(size: usize) -> WebGame {
        let size = if size == 0 {
            Settings::load_from(&LocalStore).effective_board_size()
        } else {
            size
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Started new {size}x{size} game with seed: {seed}");
        WebGame {
            state: GameState::new(size, seed),
            high_scores: HighScores::load_from(&LocalStore),
            submitted: false,
        }
    }

    /// Resume the saved game, or start one with the saved settings
    pub fn restore() -> WebGame {
        let settings = Settings::load_from(&LocalStore);
        let saved = if settings.auto_continue {
            persistence::load_game(&LocalStore)
        } else {
            None
        };
        let state = saved.unwrap_or_else(|| new_game(settings.effective_board_size()));

        WebGame {
            state,
            high_scores: HighScores::load_from(&LocalStore),
            submitted: false,
        }
    }

    /// Apply one direction ("up", "ArrowLeft", "d", ...) and return the turn as JSON
    pub fn play(&mut self, direction: &str) -> Result<String, JsValue> {
        let direction: Direction = direction.parse().map_err(to_js_error)?;
        let outcome = play_turn(&mut self.state, direction);
        if outcome.game_over {
            // Finished games are not resumable
            persistence::discard_saved_game(&LocalStore);
        }
        serde_json::to_string(&outcome).map_err(to_js_error)
    }

    /// Row-major cell values (0 = empty)
    pub fn cells(&self) -> Vec<u32> {
        self.state.grid().cells().to_vec()
    }

    pub fn rows(&self) -> usize {
        self.state.grid().rows()
    }

    pub fn cols(&self) -> usize {
        self.state.grid().cols()
    }

    /// Score as f64 (JS numbers)
    pub fn score(&self) -> f64 {
        self.state.score() as f64
    }

    pub fn max_tile(&self) -> u32 {
        self.state.max_tile()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.phase() == GamePhase::GameOver
    }

    /// Submit the final score once per finished game. Returns the rank achieved.
    pub fn submit_score(&mut self, name: &str) -> Option<usize> {
        if !self.is_game_over() {
            return None;
        }
        self.record_score(name)
    }

    /// Start over on the same board size. A game abandoned with points is
    /// still submitted. Returns the rank it achieved.
    pub fn reset(&mut self, name: &str) -> Option<usize> {
        let rank = self.record_score(name);
        let size = self.state.grid().rows().clamp(MIN_SIZE, MAX_SIZE);
        self.state = GameState::new(size, js_sys::Date::now() as u64);
        self.submitted = false;
        persistence::discard_saved_game(&LocalStore);
        log::info!("Reset to a new {size}x{size} game");
        rank
    }

    /// Leaderboard as JSON
    pub fn high_scores(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.high_scores).map_err(to_js_error)
    }

    /// Persist the in-progress game (call on tab hide / unload)
    pub fn save(&self) -> Result<(), JsValue> {
        persistence::save_game(&LocalStore, &self.state).map_err(to_js_error)
    }
}

impl WebGame {
    fn record_score(&mut self, name: &str) -> Option<usize> {
        if self.submitted {
            return None;
        }
        self.submitted = true;

        let mut settings = Settings::load_from(&LocalStore);
        settings.player_name = name.to_string();
        let name = settings.display_name();
        settings.save_to(&LocalStore);

        let rank = self.high_scores.submit_game(&name, &self.state, now_ms());
        if rank.is_some() {
            self.high_scores.save_to(&LocalStore);
        }
        rank
    }
}

/// Module start hook: logging and panic reporting
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("Merge 2048 engine loaded");
}
