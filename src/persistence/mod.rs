//! Save/continue for an in-progress game
//!
//! Features:
//! - Versioned JSON envelope
//! - Grid invariants re-checked on load
//! - Finished games are never resumed

use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::platform::{KeyValueStore, now_ms};
use crate::sim::{GamePhase, GameState};

/// Current envelope format
pub const SAVE_VERSION: u32 = 1;

/// Storage key for the in-progress game
pub const SAVE_KEY: &str = "merge2048_save";

/// Versioned wrapper around a saved session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    /// Unix timestamp (ms) when saved
    pub saved_at: f64,
    pub state: GameState,
}

/// Serialize a session into a save envelope
pub fn encode(state: &GameState) -> Result<String, PersistError> {
    let envelope = SaveEnvelope {
        version: SAVE_VERSION,
        saved_at: now_ms(),
        state: state.clone(),
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parse and validate a save envelope
pub fn decode(json: &str) -> Result<GameState, PersistError> {
    let envelope: SaveEnvelope = serde_json::from_str(json)?;
    if envelope.version != SAVE_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: envelope.version,
            expected: SAVE_VERSION,
        });
    }
    envelope.state.grid().validate()?;
    Ok(envelope.state)
}

/// Save the session. A finished game clears the save instead.
pub fn save_game(store: &impl KeyValueStore, state: &GameState) -> Result<(), PersistError> {
    if state.phase() == GamePhase::GameOver {
        return clear_saved_game(store);
    }
    store.set_item(SAVE_KEY, &encode(state)?)?;
    log::info!(
        "Game saved (turn {}, score {})",
        state.turns(),
        state.score()
    );
    Ok(())
}

/// Load the saved session, if there is a resumable one.
///
/// Corrupt or finished saves are discarded so the caller starts fresh.
pub fn load_game(store: &impl KeyValueStore) -> Option<GameState> {
    let json = match store.get_item(SAVE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Save storage unavailable: {e}");
            return None;
        }
    };

    match decode(&json) {
        Ok(state) if state.phase() == GamePhase::Playing => {
            log::info!("Loaded saved game (score {})", state.score());
            Some(state)
        }
        Ok(_) => {
            log::info!("Saved game already finished, discarding");
            discard_saved_game(store);
            None
        }
        Err(e) => {
            log::warn!("Discarding unreadable save: {e}");
            discard_saved_game(store);
            None
        }
    }
}

pub fn clear_saved_game(store: &impl KeyValueStore) -> Result<(), PersistError> {
    store.remove_item(SAVE_KEY)?;
    log::info!("Saved game cleared");
    Ok(())
}

/// Clear the save where the caller has no error path; failures are logged
pub fn discard_saved_game(store: &impl KeyValueStore) {
    if let Err(e) = clear_saved_game(store) {
        log::warn!("Failed to clear saved game: {e}");
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::error::{GridError, StorageError};
    use crate::platform::storage::FileStore;
    use crate::sim::{Direction, Grid, play_turn};

    #[test]
    fn test_encode_decode() {
        let mut state = GameState::new(4, 77);
        play_turn(&mut state, Direction::Left);
        play_turn(&mut state, Direction::Up);

        let mut restored = decode(&encode(&state).unwrap()).unwrap();
        assert_eq!(restored.grid(), state.grid());
        assert_eq!(restored.score(), state.score());
        assert_eq!(restored.turns(), state.turns());
        assert_eq!(restored.seed(), 77);
        assert_eq!(
            play_turn(&mut restored, Direction::Down),
            play_turn(&mut state, Direction::Down)
        );
    }

    #[test]
    fn test_decode_rejects_other_versions() {
        let json = encode(&GameState::new(4, 1)).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["version"] = serde_json::json!(99);

        let err = decode(&value.to_string()).unwrap_err();
        assert!(matches!(
            err,
            PersistError::UnsupportedVersion {
                found: 99,
                expected: SAVE_VERSION
            }
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_tiles() {
        let json = encode(&GameState::from_grid(Grid::new(2), 1)).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["state"]["grid"]["cells"] = serde_json::json!([3, 0, 0, 0]);
        assert!(matches!(
            decode(&value.to_string()),
            Err(PersistError::InvalidGrid(_))
        ));

        value["state"]["grid"]["cells"] = serde_json::json!([2, 0]);
        assert!(matches!(
            decode(&value.to_string()),
            Err(PersistError::InvalidGrid(_))
        ));

        assert!(matches!(decode("{"), Err(PersistError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_tiles_above_max() {
        let json = encode(&GameState::from_grid(Grid::new(2), 1)).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["state"]["grid"]["cells"] = serde_json::json!([1u32 << 31, 1u32 << 31, 0, 0]);
        assert!(matches!(
            decode(&value.to_string()),
            Err(PersistError::InvalidGrid(GridError::InvalidTile {
                row: 0,
                col: 0,
                ..
            }))
        ));
    }

    #[test]
    fn test_store_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(load_game(&store).is_none());

        let state = GameState::new(4, 5);
        save_game(&store, &state).unwrap();
        let loaded = load_game(&store).unwrap();
        assert_eq!(loaded.grid(), state.grid());

        clear_saved_game(&store).unwrap();
        assert!(load_game(&store).is_none());
    }

    #[test]
    fn test_finished_game_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let mut state = GameState::new(4, 9);
        save_game(&store, &state).unwrap();
        while state.phase() == GamePhase::Playing {
            if !Direction::ALL
                .into_iter()
                .any(|d| play_turn(&mut state, d).moved)
            {
                break;
            }
        }
        assert_eq!(state.phase(), GamePhase::GameOver);

        save_game(&store, &state).unwrap();
        assert!(load_game(&store).is_none());
    }

    #[test]
    fn test_corrupt_save_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set_item(SAVE_KEY, "garbage").unwrap();

        assert!(load_game(&store).is_none());
        assert!(store.get_item(SAVE_KEY).unwrap().is_none());
    }

    /// Read-only store holding a corrupt save
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(Some("garbage".to_string()))
        }

        fn set_item(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteRejected(key.to_string()))
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteRejected(key.to_string()))
        }
    }

    #[test]
    fn test_failed_discard_still_starts_fresh() {
        assert!(clear_saved_game(&ReadOnlyStore).is_err());
        discard_saved_game(&ReadOnlyStore);
        assert!(load_game(&ReadOnlyStore).is_none());
    }
}
