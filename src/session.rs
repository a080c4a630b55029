//! Anytime solving session: an unbounded loop of independent trials.
//!
//! Each trial restarts the search from the initial configuration with a
//! fresh visited set. Whenever a trial succeeds, its sequence becomes
//! the best known solution and the depth bound tightens to that length,
//! so later trials can only match or improve it.

use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::Instant;

use crate::moves::Move;
use crate::pieces::{Board, ConfigError, Piece, PieceId, Pos, Puzzle};
use crate::report::{Report, Reporter};
use crate::solver::Trial;

/// Default ceiling on moves per trial.
pub const MAX_DEPTH: u32 = 1000;

/// A validated puzzle plus the state carried across trials.
pub struct Session<R: Rng> {
    board: Board,
    pieces: Vec<Piece>,
    goal: Pos,
    target: PieceId,
    max_depth: u32,
    best: Option<Vec<Move>>,
    trials: u64,
    rng: R,
    reporter: Reporter,
}

impl<R: Rng> Session<R> {
    /// Validates the configuration and prepares a session. Reports go
    /// out through `tx`.
    pub fn start(
        puzzle: Puzzle,
        max_depth: Option<u32>,
        rng: R,
        tx: Sender<Report>,
    ) -> Result<Self, ConfigError> {
        puzzle.validate()?;
        let target = puzzle.target().ok_or(ConfigError::MissingTarget)?.id;
        Ok(Self {
            board: puzzle.board,
            goal: puzzle.goal,
            pieces: puzzle.pieces,
            target,
            max_depth: max_depth.unwrap_or(MAX_DEPTH),
            best: None,
            trials: 0,
            rng,
            reporter: Reporter::new(tx),
        })
    }

    /// Shortest sequence found so far.
    pub fn best(&self) -> Option<&[Move]> {
        self.best.as_deref()
    }

    /// Trials completed so far.
    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Current per-trial depth bound.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Runs trials until `stop` is raised. The flag is observed between
    /// trials only; a trial in flight always runs to completion.
    pub fn run(&mut self, stop: &AtomicBool) {
        while !stop.load(Ordering::SeqCst) {
            self.run_trial();
        }
    }

    /// Runs one trial and reports its outcome.
    ///
    /// A successful sequence is never longer than the current bound, so
    /// every success is a new best: it is recorded and the bound
    /// tightens to its length.
    pub fn run_trial(&mut self) -> Option<Vec<Move>> {
        self.trials += 1;
        let started = Instant::now();

        let mut trial = Trial::new(
            self.board,
            self.goal,
            self.target,
            self.max_depth,
            self.trials,
            &mut self.rng,
            &mut self.reporter,
        );
        let sequence = trial.run(&self.pieces);
        let rounds = trial.rounds();
        let duration = started.elapsed();

        if let Some(sequence) = &sequence {
            self.max_depth = sequence.len() as u32;
            self.best = Some(sequence.clone());
        }
        self.reporter
            .result(self.trials, rounds, duration, sequence.clone());
        sequence
    }
}
