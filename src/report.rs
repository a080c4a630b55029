//! Progress and result reporting over a channel.
//!
//! The search thread owns a `Reporter` and the host holds the matching
//! receiver. Sends are fire-and-forget so a host that stopped listening
//! never stalls the search.

use crate::moves::Move;
use crate::pieces::Piece;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

/// Ceiling on tick reports per second.
const REFRESH_RATE: u64 = 8;

/// Messages emitted by a running session.
#[derive(Debug, Clone)]
pub enum Report {
    /// Periodic progress snapshot from inside a trial.
    Tick {
        trial: u64,
        rounds: u64,
        visited: usize,
        depth: u32,
        pieces: Vec<Piece>,
    },
    /// Outcome of one finished trial. `sequence` is present only when
    /// the trial found a new best solution.
    Result {
        trial: u64,
        rounds: u64,
        duration: Duration,
        sequence: Option<Vec<Move>>,
    },
}

/// Rate-limited sender for `Report` values.
pub struct Reporter {
    tx: Sender<Report>,
    min_interval: Duration,
    last_tick: Option<Instant>,
}

impl Reporter {
    pub fn new(tx: Sender<Report>) -> Self {
        Self {
            tx,
            min_interval: Duration::from_millis(1000 / REFRESH_RATE),
            last_tick: None,
        }
    }

    /// Sends a progress tick unless one was sent within the rate window.
    pub fn tick(&mut self, trial: u64, rounds: u64, visited: usize, depth: u32, pieces: &[Piece]) {
        let now = Instant::now();
        if let Some(last) = self.last_tick {
            if now.duration_since(last) < self.min_interval {
                return;
            }
        }
        self.last_tick = Some(now);
        let _ = self.tx.send(Report::Tick {
            trial,
            rounds,
            visited,
            depth,
            pieces: pieces.to_vec(),
        });
    }

    /// Sends a trial outcome. Results are never rate-limited.
    pub fn result(&mut self, trial: u64, rounds: u64, duration: Duration, sequence: Option<Vec<Move>>) {
        let _ = self.tx.send(Report::Result {
            trial,
            rounds,
            duration,
            sequence,
        });
    }
}
