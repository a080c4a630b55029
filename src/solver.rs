//! Randomized depth-bounded backtracking search.
//!
//! One `Trial` explores the move tree iteratively with an explicit
//! frame stack, so search depth is bounded by `max_depth` rather than
//! the call stack. States are deduplicated within the trial by their
//! canonical key, and candidate order is randomized so repeated trials
//! explore different parts of the tree.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::grid::{canonical_key, map_cells};
use crate::moves::{apply, legal_moves, Move};
use crate::pieces::{Board, Piece, PieceId, Pos};
use crate::report::Reporter;

/// One node on the search stack: a configuration plus its remaining
/// untried candidates.
struct Frame {
    pieces: Vec<Piece>,
    applied: Option<Move>,
    depth: u32,
    candidates: Vec<Move>,
    next: usize,
}

enum Expansion {
    Dead,
    Won,
    Open(Frame),
}

/// A single depth-bounded search attempt.
pub struct Trial<'a, R: Rng> {
    board: Board,
    goal: Pos,
    target: PieceId,
    max_depth: u32,
    trial: u64,
    rng: &'a mut R,
    reporter: &'a mut Reporter,
    visited: FxHashSet<Vec<u8>>,
    rounds: u64,
}

impl<'a, R: Rng> Trial<'a, R> {
    pub fn new(
        board: Board,
        goal: Pos,
        target: PieceId,
        max_depth: u32,
        trial: u64,
        rng: &'a mut R,
        reporter: &'a mut Reporter,
    ) -> Self {
        Self {
            board,
            goal,
            target,
            max_depth,
            trial,
            rng,
            reporter,
            visited: FxHashSet::default(),
            rounds: 0,
        }
    }

    /// Nodes expanded by this trial so far.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Runs the trial from `start` to completion.
    ///
    /// Returns the move sequence on success, in application order. An
    /// already-solved start yields an empty sequence.
    pub fn run(&mut self, start: &[Piece]) -> Option<Vec<Move>> {
        let mut stack: Vec<Frame> = Vec::new();
        match self.expand(start.to_vec(), None, 0) {
            Expansion::Won => return Some(Vec::new()),
            Expansion::Dead => return None,
            Expansion::Open(root) => stack.push(root),
        }

        while let Some(frame) = stack.last_mut() {
            if frame.next >= frame.candidates.len() {
                stack.pop();
                continue;
            }
            let mv = frame.candidates[frame.next];
            frame.next += 1;

            let mut child_pieces = frame.pieces.clone();
            let child_depth = frame.depth + 1;
            apply(&mut child_pieces, mv);

            match self.expand(child_pieces, Some(mv), child_depth) {
                Expansion::Won => {
                    let mut sequence: Vec<Move> =
                        stack.iter().filter_map(|f| f.applied).collect();
                    sequence.push(mv);
                    return Some(sequence);
                }
                Expansion::Dead => {}
                Expansion::Open(child) => stack.push(child),
            }
        }

        None
    }

    /// Classifies one node: dead, won, or open with ordered candidates.
    fn expand(&mut self, pieces: Vec<Piece>, applied: Option<Move>, depth: u32) -> Expansion {
        if depth > self.max_depth {
            return Expansion::Dead;
        }
        self.rounds += 1;

        // the start configuration is never fingerprinted, so a path may
        // revisit it and is then pruned one level deeper
        if applied.is_some() && !self.visited.insert(canonical_key(&pieces)) {
            return Expansion::Dead;
        }

        if self.solved(&pieces) {
            return Expansion::Won;
        }

        self.reporter
            .tick(self.trial, self.rounds, self.visited.len(), depth, &pieces);

        let grid = map_cells(self.board, &pieces);
        let mut candidates = legal_moves(self.board, &pieces, &grid, applied);
        if candidates.is_empty() {
            return Expansion::Dead;
        }

        if let Some(winner) = candidates.iter().copied().find(|mv| self.wins(mv)) {
            // a move that wins outright is the only one worth trying
            candidates = vec![winner];
        } else {
            self.order(&mut candidates);
        }

        Expansion::Open(Frame {
            pieces,
            applied,
            depth,
            candidates,
            next: 0,
        })
    }

    fn solved(&self, pieces: &[Piece]) -> bool {
        pieces
            .iter()
            .any(|p| p.id == self.target && (p.x, p.y) == self.goal)
    }

    fn wins(&self, mv: &Move) -> bool {
        mv.piece == self.target && mv.to == self.goal
    }

    /// Target moves first, shuffled within each group.
    fn order(&mut self, candidates: &mut [Move]) {
        candidates.sort_unstable_by_key(|mv| mv.piece != self.target);
        let split = candidates
            .iter()
            .position(|mv| mv.piece != self.target)
            .unwrap_or(candidates.len());
        let (target_moves, rest) = candidates.split_at_mut(split);
        target_moves.shuffle(&mut *self.rng);
        rest.shuffle(&mut *self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{Board, Piece, PieceKind, Puzzle};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::mpsc::channel;

    fn run_trial(puzzle: &Puzzle, max_depth: u32, seed: u64) -> (Option<Vec<Move>>, u64) {
        assert_eq!(puzzle.validate(), Ok(()));
        let target = puzzle.target().unwrap().id;
        let (tx, _rx) = channel();
        let mut reporter = Reporter::new(tx);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut trial = Trial::new(
            puzzle.board,
            puzzle.goal,
            target,
            max_depth,
            1,
            &mut rng,
            &mut reporter,
        );
        let sequence = trial.run(&puzzle.pieces);
        let rounds = trial.rounds();
        (sequence, rounds)
    }

    fn lone_target_puzzle() -> Puzzle {
        let pieces = vec![Piece::new(0, 0, 0, 2, 2, PieceKind::Target)];
        Puzzle::new(Board::new(3, 3), pieces, (1, 1))
    }

    #[test]
    fn already_solved_start_yields_empty_sequence() {
        let pieces = vec![Piece::new(0, 0, 0, 2, 2, PieceKind::Target)];
        let puzzle = Puzzle::new(Board::new(2, 2), pieces, (0, 0));
        let (sequence, rounds) = run_trial(&puzzle, 1000, 0);
        assert_eq!(sequence, Some(Vec::new()));
        assert_eq!(rounds, 1);
    }

    #[test]
    fn winning_move_is_taken_greedily() {
        let pieces = vec![
            Piece::new(0, 0, 0, 1, 1, PieceKind::Target),
            Piece::new(1, 1, 1, 1, 1, PieceKind::Square),
        ];
        let puzzle = Puzzle::new(Board::new(2, 2), pieces, (0, 1));
        let (sequence, _) = run_trial(&puzzle, 1000, 42);
        assert_eq!(
            sequence,
            Some(vec![Move {
                piece: PieceId(0),
                from: (0, 0),
                to: (0, 1),
            }])
        );
    }

    #[test]
    fn unsolvable_configuration_terminates_without_a_sequence() {
        // 3x1 corridor: the square sits on the goal and can only swap
        // places with the free middle cell, never clearing the exit
        let pieces = vec![
            Piece::new(0, 0, 0, 1, 1, PieceKind::Target),
            Piece::new(1, 2, 0, 1, 1, PieceKind::Square),
        ];
        let puzzle = Puzzle::new(Board::new(3, 1), pieces, (2, 0));
        let (sequence, rounds) = run_trial(&puzzle, 1000, 7);
        assert_eq!(sequence, None);
        assert!(rounds < 50, "tiny state space took {rounds} rounds");
    }

    #[test]
    fn found_sequence_replays_legally_to_the_goal() {
        let puzzle = lone_target_puzzle();
        let (sequence, _) = run_trial(&puzzle, 1000, 3);
        let sequence = sequence.expect("lone target always reaches the goal");
        assert_eq!(sequence.len(), 2);

        let mut replay = puzzle.clone();
        for mv in &sequence {
            apply(&mut replay.pieces, *mv);
            assert_eq!(replay.validate(), Ok(()), "move {mv} broke the board");
        }
        let target = replay.target().unwrap();
        assert_eq!((target.x, target.y), puzzle.goal);
    }

    #[test]
    fn depth_bound_is_respected() {
        let puzzle = lone_target_puzzle();
        let (too_shallow, _) = run_trial(&puzzle, 1, 5);
        assert_eq!(too_shallow, None);
        let (deep_enough, _) = run_trial(&puzzle, 2, 5);
        assert_eq!(deep_enough.map(|s| s.len()), Some(2));
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let puzzle = lone_target_puzzle();
        let (first, first_rounds) = run_trial(&puzzle, 1000, 99);
        let (second, second_rounds) = run_trial(&puzzle, 1000, 99);
        assert_eq!(first, second);
        assert_eq!(first_rounds, second_rounds);
    }
}
