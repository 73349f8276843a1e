// src/game.rs
// The game session: consumes card selections, enforces the alternating sequence, and
// drives level progression, the stopwatch and the feedback pulses.
//
// Everything runs on one task. Delayed effects (pulse clears, the level advance) are kept
// as deadlines; the event loop sleeps until `next_deadline()` and then calls `on_deadline()`.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::board::{Board, BoardGenerator};
use crate::card::Card;
use crate::config::GameConfig;
use crate::defs::{Color, FIRSTNUMBER, Number};
use crate::logging::{log_error, log_info};
use crate::pulse::{Pulse, Scheduled};
use crate::timer::Stopwatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Board dealt, nothing selected yet.
    Idle,
    InProgress,
    /// Sequence finished; waiting for the next level.
    LevelComplete,
}

/// Why a selection broke the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidSelection {
    /// The sequence must start on a 1.
    NotAStart { got: Number },
    /// A second 1 while a 1 is the only selected card.
    RepeatedStart,
    WrongNumber { expected: Number, got: Number },
    SameColor { color: Color },
}

impl fmt::Display for InvalidSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidSelection::NotAStart { got } => write!(f, "sequence must start at {FIRSTNUMBER}, got {got}"),
            InvalidSelection::RepeatedStart => write!(f, "{FIRSTNUMBER} already selected"),
            InvalidSelection::WrongNumber { expected, got } => write!(f, "expected {expected}, got {got}"),
            InvalidSelection::SameColor { color } => write!(f, "two {color} cards in a row"),
        }
    }
}

impl std::error::Error for InvalidSelection {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelScore {
    pub level: u32,
    pub pairs: Number,
    pub seconds: u64,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Started,
    Advanced,
    LevelComplete(LevelScore),
    Rejected(InvalidSelection),
    /// Not on this board, the level is already complete, or the session is shut down.
    Ignored,
}

/// Read-only snapshot of everything the UI renders.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub state: SessionState,
    pub level: u32,
    pub pairs: Number,
    pub cards: Vec<Card>,
    pub progress: Vec<usize>,
    pub error: bool,
    pub error_generation: u64,
    pub correct: bool,
    pub correct_generation: u64,
    pub time: String,
    pub level_score: Option<LevelScore>,
    pub best_number: Number,
    pub show_instructions: bool,
}

pub struct GameSession<R: Rng = StdRng> {
    config: GameConfig,
    generator: BoardGenerator,
    rng: R,
    board: Board,
    progress: Vec<Card>,
    level: u32,
    error: Pulse,
    correct: Pulse,
    pending_advance: Scheduled<()>,
    stopwatch: Stopwatch,
    level_score: Option<LevelScore>,
    history: Vec<LevelScore>,
    best_number: Number,
    show_instructions: bool,
    shut_down: bool,
}

impl GameSession<StdRng> {
    /// Session with a reproducible sequence of boards.
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::new(config, BoardGenerator::default(), StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSession<R> {
    /// Deal the first board and start the clock. Must be called inside a tokio runtime.
    pub fn new(config: GameConfig, generator: BoardGenerator, mut rng: R) -> Self {
        let pairs = config.initial_pairs.max(1);
        let board = generator.generate(pairs, &mut rng);
        let mut stopwatch = Stopwatch::new();
        stopwatch.reset();

        let session = Self {
            error: Pulse::new(config.pulse_duration()),
            correct: Pulse::new(config.pulse_duration()),
            config,
            generator,
            rng,
            board,
            progress: Vec::new(),
            level: 1,
            pending_advance: Scheduled::new(),
            stopwatch,
            level_score: None,
            history: Vec::new(),
            best_number: 0,
            show_instructions: false,
            shut_down: false,
        };
        session.check_board();
        log_info(&format!("Level 1 started with {pairs} pairs"));
        session
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn progress(&self) -> &[Card] {
        &self.progress
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn pairs(&self) -> Number {
        self.board.pairs()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_active()
    }

    pub fn is_correct(&self) -> bool {
        self.correct.is_active()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.stopwatch.seconds()
    }

    pub fn time(&self) -> String {
        self.stopwatch.display()
    }

    pub fn level_score(&self) -> Option<&LevelScore> {
        self.level_score.as_ref()
    }

    /// Scores of every level cleared in this session, oldest first.
    pub fn history(&self) -> &[LevelScore] {
        &self.history
    }

    /// Highest number reached in the current attempt.
    pub fn best_number(&self) -> Number {
        self.best_number
    }

    pub fn show_instructions(&self) -> bool {
        self.show_instructions
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn state(&self) -> SessionState {
        if self.level_score.is_some() {
            SessionState::LevelComplete
        } else if self.progress.is_empty() {
            SessionState::Idle
        } else {
            SessionState::InProgress
        }
    }

    pub fn is_touched(&self, id: usize) -> bool {
        self.progress.iter().any(|card| card.id == id)
    }

    /// Handle a click on the card with generation index `id`.
    pub fn select_card(&mut self, id: usize) -> SelectionOutcome {
        if self.shut_down || self.state() == SessionState::LevelComplete {
            return SelectionOutcome::Ignored;
        }
        let Some(card) = self.board.get(id).copied() else {
            return SelectionOutcome::Ignored;
        };
        let now = Instant::now();

        if let Err(reason) = self.check_selection(&card) {
            // The whole attempt is discarded; the board stays as it is.
            self.progress.clear();
            self.best_number = 0;
            self.error.fire(now);
            log_info(&format!("Level {}: {} rejected ({reason})", self.level, card.label()));
            return SelectionOutcome::Rejected(reason);
        }

        let started = self.progress.is_empty();
        self.progress.push(card);
        self.best_number = self.best_number.max(card.number);
        self.correct.fire(now);

        if self.progress.len() == self.board.required_length() {
            return SelectionOutcome::LevelComplete(self.complete_level(now));
        }

        if started {
            SelectionOutcome::Started
        } else {
            SelectionOutcome::Advanced
        }
    }

    fn check_selection(&self, card: &Card) -> Result<(), InvalidSelection> {
        let Some(last) = self.progress.last() else {
            return if card.is_start() {
                Ok(())
            } else {
                Err(InvalidSelection::NotAStart { got: card.number })
            };
        };

        if card.is_start() && self.progress.len() == 1 {
            return Err(InvalidSelection::RepeatedStart);
        }
        if card.number != last.number + 1 {
            return Err(InvalidSelection::WrongNumber {
                expected: last.number + 1,
                got: card.number,
            });
        }
        if card.color == last.color {
            return Err(InvalidSelection::SameColor { color: card.color });
        }
        Ok(())
    }

    fn complete_level(&mut self, now: Instant) -> LevelScore {
        self.stopwatch.stop();
        let score = LevelScore {
            level: self.level,
            pairs: self.board.pairs(),
            seconds: self.stopwatch.seconds(),
            time: self.stopwatch.display(),
        };
        self.level_score = Some(score.clone());
        self.history.push(score.clone());

        if self.config.auto_advance {
            self.pending_advance.schedule(now + self.config.advance_delay(), ());
        }
        log_info(&format!("Level {} completed in {}", score.level, score.time));
        score
    }

    /// Explicit "play again": only valid once the current level is complete.
    pub fn play_again(&mut self) -> bool {
        if self.shut_down || self.state() != SessionState::LevelComplete {
            return false;
        }
        self.advance_level();
        true
    }

    /// Deal the next, larger board and restart the clock.
    pub fn advance_level(&mut self) {
        if self.shut_down {
            return;
        }
        self.pending_advance.cancel();

        let pairs = self.board.pairs().saturating_add(self.config.pairs_increment);
        self.level += 1;
        self.board = self.generator.generate(pairs, &mut self.rng);
        self.progress.clear();
        self.best_number = 0;
        self.level_score = None;
        self.error.cancel();
        self.correct.cancel();
        self.stopwatch.reset();

        self.check_board();
        log_info(&format!("Level {} started with {pairs} pairs", self.level));
    }

    /// Earliest pending pulse clear or scheduled advance.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.error.deadline(),
            self.correct.deadline(),
            self.pending_advance.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Apply every delayed effect that is due. Returns true if anything changed.
    pub fn on_deadline(&mut self) -> bool {
        if self.shut_down {
            return false;
        }
        let now = Instant::now();
        let error_cleared = self.error.expire(now);
        let correct_cleared = self.correct.expire(now);
        let advanced = self.pending_advance.take_due(now).is_some();
        if advanced {
            self.advance_level();
        }
        error_cleared || correct_cleared || advanced
    }

    /// Show or hide the instructions panel. Does not touch the sequence.
    pub fn toggle_instructions(&mut self) -> bool {
        self.show_instructions = !self.show_instructions;
        self.show_instructions
    }

    /// Cancel every pending timer and stop the clock. Further input is ignored.
    pub fn shutdown(&mut self) {
        self.error.cancel();
        self.correct.cancel();
        self.pending_advance.cancel();
        self.stopwatch.stop();
        self.shut_down = true;
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            state: self.state(),
            level: self.level,
            pairs: self.board.pairs(),
            cards: self.board.cards().to_vec(),
            progress: self.progress.iter().map(|card| card.id).collect(),
            error: self.error.is_active(),
            error_generation: self.error.generation(),
            correct: self.correct.is_active(),
            correct_generation: self.correct.generation(),
            time: self.time(),
            level_score: self.level_score.clone(),
            best_number: self.best_number,
            show_instructions: self.show_instructions,
        }
    }

    fn check_board(&self) {
        if let Err(e) = self.board.validate() {
            log_error(&format!("Level {} dealt an invalid board: {e}", self.level));
        }
    }
}
