use crate::catalog::{CatalogError, WordCatalog};
use crate::language::Language;
use crate::ranking::GameRecord;
use crate::scramble::scramble;
use crate::settings::{Settings, SCORE_INCREASE};
use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// Errors surfaced on the state snapshot instead of terminating the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserMessage {
    ErrorAccessingSettings,
    ErrorWritingSettings,
    ErrorGettingWords,
}

/// Immutable snapshot of one game session.
///
/// Every transition replaces the snapshot wholesale; collections are
/// cloned, never mutated in place while an older snapshot could still
/// reference them.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// The unscrambled answer. Never shown to the player.
    pub current_word: String,
    /// Permutation of `current_word`, distinct from it whenever the word
    /// has two distinct characters.
    pub scrambled_word: String,
    /// Words presented so far this session, in order. No duplicates;
    /// `used_words.len() == word_index`.
    pub used_words: Vec<String>,
    /// Words queued for the session, consumed strictly front to back.
    pub remaining_words: VecDeque<String>,
    pub score: u32,
    pub word_index: usize,
    pub is_guess_wrong: bool,
    pub is_game_over: bool,
    pub is_loading: bool,
    pub language: Language,
    pub word_count: usize,
    pub right_words: Vec<String>,
    pub wrong_words: Vec<String>,
    pub finished_at: Option<DateTime<Local>>,
    pub user_message: Option<UserMessage>,
}

impl GameState {
    fn loading(settings: &Settings) -> Self {
        Self {
            current_word: String::new(),
            scrambled_word: String::new(),
            used_words: Vec::new(),
            remaining_words: VecDeque::new(),
            score: 0,
            word_index: 0,
            is_guess_wrong: false,
            is_game_over: false,
            is_loading: true,
            language: settings.language,
            word_count: settings.word_count,
            right_words: Vec::new(),
            wrong_words: Vec::new(),
            finished_at: None,
            user_message: None,
        }
    }

    /// True when a word is on screen and guesses are accepted.
    pub fn is_active(&self) -> bool {
        !self.is_loading
            && !self.is_game_over
            && self.user_message.is_none()
            && !self.current_word.is_empty()
    }
}

/// Handle for an in-flight word draw. A newer settings change makes older
/// tickets stale; completing a stale load is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    epoch: u64,
}

/// The session state machine: Loading -> Active -> GameOver -> Loading.
///
/// Single owner, serialized transitions. Collaborators are passed in by
/// the caller; the session holds no connection handles of its own.
#[derive(Debug)]
pub struct GameSession {
    state: GameState,
    epoch: u64,
}

impl GameSession {
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: GameState::loading(settings),
            epoch: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Begin (re)loading the word queue for `settings`.
    ///
    /// Any load started earlier becomes stale: last write wins on the
    /// settings stream.
    pub fn begin_load(&mut self, settings: &Settings) -> LoadTicket {
        self.epoch += 1;
        self.state = GameState::loading(settings);
        LoadTicket { epoch: self.epoch }
    }

    /// Install a finished word draw. Returns false when the ticket is
    /// stale and the draw was discarded without touching the state.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<String>, CatalogError>,
    ) -> bool {
        if ticket.epoch != self.epoch {
            return false;
        }

        let words = match result {
            Ok(words) if !words.is_empty() => words,
            _ => {
                self.state = GameState {
                    is_loading: false,
                    user_message: Some(UserMessage::ErrorGettingWords),
                    ..GameState::loading(&Settings {
                        language: self.state.language,
                        word_count: self.state.word_count,
                    })
                };
                return true;
            }
        };

        let mut remaining: VecDeque<String> = words.into();
        let first = remaining.pop_front().unwrap_or_default();
        self.state = GameState {
            scrambled_word: scramble(&first),
            used_words: vec![first.clone()],
            current_word: first,
            remaining_words: remaining,
            word_index: 1,
            is_loading: false,
            ..GameState::loading(&Settings {
                language: self.state.language,
                word_count: self.state.word_count,
            })
        };
        true
    }

    /// Draw the queue synchronously and start playing.
    pub fn start(&mut self, settings: &Settings, catalog: &WordCatalog) {
        let ticket = self.begin_load(settings);
        let result = catalog.draw_words(settings.language, settings.word_count);
        self.complete_load(ticket, result);
    }

    /// Check a guess against the current word (case-insensitive).
    ///
    /// A match scores and advances; a miss only raises `is_guess_wrong`.
    /// Returns whether the guess matched.
    pub fn submit_guess(&mut self, guess: &str) -> bool {
        if !self.state.is_active() {
            return false;
        }

        if guess.trim().to_lowercase() == self.state.current_word.to_lowercase() {
            self.advance(true);
            true
        } else {
            self.state = GameState {
                is_guess_wrong: true,
                ..self.state.clone()
            };
            false
        }
    }

    /// Give up on the current word; counts it as wrong and advances.
    pub fn skip(&mut self) {
        if !self.state.is_active() {
            return;
        }
        self.advance(false);
    }

    fn advance(&mut self, guessed_right: bool) {
        // Build the successor snapshot on a deep clone so no collection is
        // shared with the snapshot being replaced.
        let mut state = self.state.clone();

        if guessed_right {
            state.right_words.push(state.current_word.clone());
            state.score += SCORE_INCREASE;
        } else {
            state.wrong_words.push(state.current_word.clone());
        }
        state.is_guess_wrong = false;

        match state.remaining_words.pop_front() {
            None => {
                state.is_game_over = true;
                state.finished_at = Some(Local::now());
            }
            Some(next) => {
                state.scrambled_word = scramble(&next);
                state.used_words.push(next.clone());
                state.current_word = next;
                state.word_index += 1;
            }
        }

        self.state = state;
    }

    /// Build the completed-session record once the game is over.
    pub fn complete(&self, name: &str) -> Option<GameRecord> {
        if !self.state.is_game_over {
            return None;
        }
        Some(GameRecord {
            name: name.to_string(),
            date: self.state.finished_at.unwrap_or_else(Local::now),
            score: self.state.score,
            right_words: self.state.right_words.clone(),
            wrong_words: self.state.wrong_words.clone(),
        })
    }

    /// Attach an error message without disturbing the rest of the state.
    pub fn set_user_message(&mut self, message: UserMessage) {
        self.state = GameState {
            user_message: Some(message),
            ..self.state.clone()
        };
    }

    pub fn clear_user_message(&mut self) {
        self.state = GameState {
            user_message: None,
            ..self.state.clone()
        };
    }
}
