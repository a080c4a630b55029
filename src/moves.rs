//! Move representation and legal-move enumeration.
//!
//! A move slides one piece a single cell in an orthogonal direction.
//! Enumeration scans pieces in configuration order and directions in a
//! fixed order, so candidate lists are deterministic before shuffling.

use crate::grid::coord_to_idx;
use crate::pieces::{Board, Piece, PieceId, Pos};
use std::fmt;

/// The four slide directions, in enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit offset for this direction; y grows downward.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

/// A single-cell slide of one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub piece: PieceId,
    pub from: Pos,
    pub to: Pos,
}

impl Move {
    pub fn new(piece: &Piece, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            piece: piece.id,
            from: (piece.x, piece.y),
            to: (piece.x + dx, piece.y + dy),
        }
    }

    /// True if this move exactly undoes `other`.
    pub fn is_reverse_of(&self, other: &Move) -> bool {
        self.piece == other.piece && self.from == other.to && self.to == other.from
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{},{}->{},{}",
            self.piece, self.from.0, self.from.1, self.to.0, self.to.1
        )
    }
}

/// Applies a move to the configuration in place.
pub fn apply(pieces: &mut [Piece], mv: Move) {
    for piece in pieces.iter_mut() {
        if piece.id == mv.piece {
            debug_assert_eq!((piece.x, piece.y), mv.from);
            piece.x = mv.to.0;
            piece.y = mv.to.1;
            return;
        }
    }
    debug_assert!(false, "move names a piece missing from the configuration");
}

/// Enumerates every legal single-cell slide, minus the immediate
/// reversal of `last`.
///
/// A slide is legal when the piece's leading edge stays on the board
/// and every leading-edge cell is free. Only the one-step reversal is
/// filtered here; longer cycles are handled by the visited set.
pub fn legal_moves(
    board: Board,
    pieces: &[Piece],
    grid: &[u8],
    last: Option<Move>,
) -> Vec<Move> {
    let mut moves = Vec::new();

    for piece in pieces {
        for direction in Direction::ALL {
            let mv = Move::new(piece, direction);
            if let Some(previous) = last {
                if mv.is_reverse_of(&previous) {
                    continue;
                }
            }
            if can_slide(board, piece, direction, grid) {
                moves.push(mv);
            }
        }
    }

    moves
}

/// Checks the leading-edge cells of a one-cell slide.
fn can_slide(board: Board, piece: &Piece, direction: Direction, grid: &[u8]) -> bool {
    let free = |cell: Pos| board.contains(cell) && grid[coord_to_idx(board, cell)] == 0;
    match direction {
        Direction::Up => (piece.x..piece.x + piece.w).all(|x| free((x, piece.y - 1))),
        Direction::Down => (piece.x..piece.x + piece.w).all(|x| free((x, piece.y + piece.h))),
        Direction::Left => (piece.y..piece.y + piece.h).all(|y| free((piece.x - 1, y))),
        Direction::Right => (piece.y..piece.y + piece.h).all(|y| free((piece.x + piece.w, y))),
    }
}
