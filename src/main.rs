//! Merge 2048 entry point
//!
//! Native builds run a line-oriented terminal game. The web build is driven
//! from JavaScript through `merge_2048::platform::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Merge 2048 (native) starting...");

    if let Err(e) = terminal::run() {
        log::error!("Terminal I/O failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{self, BufRead, Write};

    use merge_2048::persistence;
    use merge_2048::platform::{default_store, now_ms};
    use merge_2048::settings::BoardPreset;
    use merge_2048::sim::{Direction, GameState, new_game, play_turn};
    use merge_2048::{HighScores, Settings};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum Command {
        Move(Direction),
        NewGame,
        Size(BoardPreset),
        Scores,
        Help,
        Quit,
    }

    pub(crate) fn parse_command(line: &str) -> Option<Command> {
        let line = line.trim().to_lowercase();
        if let Some(preset) = line.strip_prefix("size ") {
            return BoardPreset::from_str(preset.trim()).map(Command::Size);
        }
        match line.as_str() {
            "n" | "new" => Some(Command::NewGame),
            "h" | "scores" => Some(Command::Scores),
            "?" | "help" => Some(Command::Help),
            "q" | "quit" | "exit" => Some(Command::Quit),
            other => other.parse().ok().map(Command::Move),
        }
    }

    /// Submit the current game once, finished or abandoned. Returns the rank if it placed.
    pub(crate) fn submit_once(
        high_scores: &mut HighScores,
        submitted: &mut bool,
        name: &str,
        state: &GameState,
    ) -> Option<usize> {
        if std::mem::replace(submitted, true) {
            return None;
        }
        high_scores.submit_game(name, state, now_ms())
    }

    fn draw(out: &mut impl Write, state: &GameState) -> io::Result<()> {
        writeln!(out)?;
        write!(out, "{}", state.grid())?;
        writeln!(out, "Score: {}  Turn: {}", state.score(), state.turns())
    }

    fn print_help(out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Moves: w/a/s/d or up/down/left/right")?;
        writeln!(out, "n = new game, size small|classic|large = change board")?;
        writeln!(out, "h = high scores, ? = help, q = save and quit")
    }

    fn print_scores(out: &mut impl Write, high_scores: &HighScores) -> io::Result<()> {
        if high_scores.is_empty() {
            return writeln!(out, "No scores yet");
        }
        for (i, entry) in high_scores.entries.iter().enumerate() {
            writeln!(
                out,
                "{:>2}. {:<16} {:>8}  (best tile {})",
                i + 1,
                entry.name,
                entry.score,
                entry.max_tile
            )?;
        }
        Ok(())
    }

    pub fn run() -> io::Result<()> {
        let store = default_store();
        let mut settings = Settings::load();
        let mut size = settings.effective_board_size();
        let mut high_scores = HighScores::load();
        let mut submitted = false;

        let saved = if settings.auto_continue {
            persistence::load_game(&store)
        } else {
            None
        };
        let mut state = saved.unwrap_or_else(|| new_game(size));

        let stdin = io::stdin();
        let mut out = io::stdout().lock();
        print_help(&mut out)?;
        draw(&mut out, &state)?;

        for line in stdin.lock().lines() {
            let line = line?;
            match parse_command(&line) {
                Some(Command::Move(direction)) => {
                    let outcome = play_turn(&mut state, direction);
                    if !outcome.moved {
                        writeln!(out, "Nothing moves {direction}.")?;
                        continue;
                    }
                    draw(&mut out, &state)?;

                    if outcome.game_over {
                        writeln!(out, "Game over! Final score: {}", state.score())?;
                        let name = settings.display_name();
                        if let Some(rank) =
                            submit_once(&mut high_scores, &mut submitted, &name, &state)
                        {
                            high_scores.save();
                            writeln!(out, "New high score, rank #{rank}!")?;
                        }
                        print_scores(&mut out, &high_scores)?;
                        writeln!(out, "Press n for a new game or q to quit.")?;
                    }
                }
                Some(command @ (Command::NewGame | Command::Size(_))) => {
                    if let Command::Size(preset) = command {
                        settings.apply_preset(preset);
                        settings.save();
                        size = settings.effective_board_size();
                        writeln!(out, "Board size: {} ({size}x{size})", preset.as_str())?;
                    }
                    // An abandoned game still counts for the leaderboard
                    let name = settings.display_name();
                    if let Some(rank) = submit_once(&mut high_scores, &mut submitted, &name, &state)
                    {
                        high_scores.save();
                        writeln!(out, "Abandoned game placed #{rank}.")?;
                    }
                    state = new_game(size);
                    submitted = false;
                    draw(&mut out, &state)?;
                }
                Some(Command::Scores) => print_scores(&mut out, &high_scores)?,
                Some(Command::Help) => print_help(&mut out)?,
                Some(Command::Quit) => break,
                None => writeln!(out, "Unknown command {:?}, ? for help", line.trim())?,
            }
            out.flush()?;
        }

        if let Err(e) = persistence::save_game(&store, &state) {
            log::warn!("Could not save game: {e}");
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_command() {
            assert_eq!(parse_command("w"), Some(Command::Move(Direction::Up)));
            assert_eq!(parse_command(" LEFT "), Some(Command::Move(Direction::Left)));
            assert_eq!(parse_command("n"), Some(Command::NewGame));
            assert_eq!(parse_command("q"), Some(Command::Quit));
            assert_eq!(parse_command("jump"), None);
            assert_eq!(
                parse_command("size Large"),
                Some(Command::Size(BoardPreset::Large))
            );
            assert_eq!(
                parse_command(" size 3 "),
                Some(Command::Size(BoardPreset::Small))
            );
            assert_eq!(parse_command("size huge"), None);
        }

        #[test]
        fn test_abandoned_game_submitted_once() {
            use merge_2048::sim::Grid;

            let mut board = HighScores::new();
            let mut submitted = false;
            let mut state =
                GameState::from_grid(Grid::from_rows(&[[4, 4], [0, 2]]).unwrap(), 11);
            play_turn(&mut state, Direction::Right);
            assert_eq!(state.score(), 8);

            assert_eq!(
                submit_once(&mut board, &mut submitted, "ada", &state),
                Some(1)
            );
            assert!(submitted);
            // Game over followed by "n" must not record the same game twice
            assert_eq!(submit_once(&mut board, &mut submitted, "ada", &state), None);
            assert_eq!(board.entries.len(), 1);
        }

        #[test]
        fn test_scoreless_game_not_recorded() {
            let mut board = HighScores::new();
            let mut submitted = false;
            let state = GameState::new(4, 2);
            assert_eq!(submit_once(&mut board, &mut submitted, "ada", &state), None);
            assert!(board.is_empty());
        }

        #[test]
        fn test_print_scores() {
            let mut out = Vec::new();
            print_scores(&mut out, &HighScores::new()).unwrap();
            assert_eq!(String::from_utf8(out).unwrap(), "No scores yet\n");

            let mut board = HighScores::new();
            board.add_score("ada", 2048, 256, 0.0);
            let mut out = Vec::new();
            print_scores(&mut out, &board).unwrap();
            let text = String::from_utf8(out).unwrap();
            assert!(text.starts_with(" 1. ada"));
            assert!(text.contains("2048"));
        }
    }
}
