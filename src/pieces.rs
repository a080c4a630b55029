//! Puzzle piece definitions and board model.
//!
//! A puzzle is a rectangular board, a set of axis-aligned rectangular
//! pieces, and a goal coordinate for the single target piece. Pieces are
//! addressed by a stable `PieceId`; positions use the piece's top-left
//! corner with x growing right and y growing down.

use std::error::Error;
use std::fmt;

/// A 2D board coordinate (x, y).
pub type Pos = (i32, i32);

/// Maximum board extent per axis. Coordinates must fit in a single byte
/// so state keys can encode them directly.
pub const MAX_BOARD_DIM: i32 = 255;

/// Maximum number of pieces. Occupancy cells hold 1-based piece numbers
/// in a `u8`, so 254 pieces is the ceiling.
pub const MAX_PIECES: usize = 254;

/// The rectangular playing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
}

impl Board {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Total cell count.
    pub fn area(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn contains(&self, (x, y): Pos) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }
}

/// Piece classification driving both the goal condition and state-key
/// bucketing.
///
/// `VRect` and `Square` pieces are interchangeable within their kind:
/// swapping two of them yields a board that plays identically, so the
/// canonical key treats them as unordered. `HRect` and `Target` keep
/// their identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    VRect,
    HRect,
    Square,
    Target,
}

impl PieceKind {
    /// Whether same-kind pieces are interchangeable for state identity.
    pub fn is_fungible(&self) -> bool {
        matches!(self, PieceKind::VRect | PieceKind::Square)
    }
}

/// Stable per-configuration piece identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u8);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One rectangular piece at a position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(id: u8, x: i32, y: i32, w: i32, h: i32, kind: PieceKind) -> Self {
        Self {
            id: PieceId(id),
            x,
            y,
            w,
            h,
            kind,
        }
    }

    /// True if this piece occupies the cell at (x, y).
    pub fn covers(&self, (x, y): Pos) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

/// A complete puzzle: board, starting pieces, and the goal position for
/// the target piece's top-left corner.
#[derive(Debug, Clone)]
pub struct Puzzle {
    pub board: Board,
    pub pieces: Vec<Piece>,
    pub goal: Pos,
}

impl Puzzle {
    pub fn new(board: Board, pieces: Vec<Piece>, goal: Pos) -> Self {
        Self {
            board,
            pieces,
            goal,
        }
    }

    /// The classic 4x5 Klotski layout. The 2x2 target starts at the top
    /// center and must reach (1, 3), the bottom-center exit.
    pub fn klotski() -> Self {
        let pieces = vec![
            Piece::new(0, 0, 0, 1, 2, PieceKind::VRect),
            Piece::new(1, 0, 3, 1, 2, PieceKind::VRect),
            Piece::new(2, 3, 0, 1, 2, PieceKind::VRect),
            Piece::new(3, 3, 3, 1, 2, PieceKind::VRect),
            Piece::new(4, 1, 2, 2, 1, PieceKind::HRect),
            Piece::new(5, 1, 0, 2, 2, PieceKind::Target),
            Piece::new(6, 1, 3, 1, 1, PieceKind::Square),
            Piece::new(7, 1, 4, 1, 1, PieceKind::Square),
            Piece::new(8, 2, 3, 1, 1, PieceKind::Square),
            Piece::new(9, 2, 4, 1, 1, PieceKind::Square),
        ];
        Self::new(Board::new(4, 5), pieces, (1, 3))
    }

    /// The unique target piece, if exactly one exists.
    pub fn target(&self) -> Option<&Piece> {
        let mut found = None;
        for piece in &self.pieces {
            if piece.kind == PieceKind::Target {
                if found.is_some() {
                    return None;
                }
                found = Some(piece);
            }
        }
        found
    }

    /// Checks every structural invariant the solver depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let board = self.board;
        if board.width < 1
            || board.height < 1
            || board.width > MAX_BOARD_DIM
            || board.height > MAX_BOARD_DIM
        {
            return Err(ConfigError::BadBoard {
                width: board.width,
                height: board.height,
            });
        }
        if self.pieces.len() > MAX_PIECES {
            return Err(ConfigError::TooManyPieces(self.pieces.len()));
        }

        // owners holds the 1-based piece number per cell, 0 = free
        let mut owners = vec![0u8; board.area()];
        let mut targets = 0usize;
        for (index, piece) in self.pieces.iter().enumerate() {
            for earlier in &self.pieces[..index] {
                if earlier.id == piece.id {
                    return Err(ConfigError::DuplicateId(piece.id));
                }
            }
            if piece.w < 1 || piece.h < 1 {
                return Err(ConfigError::EmptyPiece(piece.id));
            }
            if piece.x < 0
                || piece.y < 0
                || piece.x + piece.w > board.width
                || piece.y + piece.h > board.height
            {
                return Err(ConfigError::OutOfBounds(piece.id));
            }
            if piece.kind == PieceKind::Target {
                targets += 1;
            }
            let number = (index + 1) as u8;
            for x in piece.x..piece.x + piece.w {
                for y in piece.y..piece.y + piece.h {
                    let cell = &mut owners[(x as usize) * (board.height as usize) + y as usize];
                    if *cell != 0 {
                        let other = self.pieces[(*cell - 1) as usize].id;
                        return Err(ConfigError::Overlap(other, piece.id));
                    }
                    *cell = number;
                }
            }
        }

        match targets {
            0 => return Err(ConfigError::MissingTarget),
            1 => {}
            _ => return Err(ConfigError::MultipleTargets),
        }

        // fungible pieces must share dimensions or swapping them would
        // identify genuinely different boards
        for kind in [PieceKind::VRect, PieceKind::Square] {
            let mut dims = None;
            for piece in self.pieces.iter().filter(|p| p.kind == kind) {
                match dims {
                    None => dims = Some((piece.w, piece.h)),
                    Some(d) if d != (piece.w, piece.h) => {
                        return Err(ConfigError::MismatchedFungibleSize(kind));
                    }
                    Some(_) => {}
                }
            }
        }

        if let Some(target) = self.target() {
            let (gx, gy) = self.goal;
            if gx < 0 || gy < 0 || gx + target.w > board.width || gy + target.h > board.height {
                return Err(ConfigError::GoalOutOfBounds { x: gx, y: gy });
            }
        }

        Ok(())
    }
}

/// Rejection reasons for a puzzle configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    BadBoard { width: i32, height: i32 },
    TooManyPieces(usize),
    DuplicateId(PieceId),
    EmptyPiece(PieceId),
    OutOfBounds(PieceId),
    Overlap(PieceId, PieceId),
    MissingTarget,
    MultipleTargets,
    MismatchedFungibleSize(PieceKind),
    GoalOutOfBounds { x: i32, y: i32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BadBoard { width, height } => {
                write!(f, "board {width}x{height} is outside 1..={MAX_BOARD_DIM} per axis")
            }
            ConfigError::TooManyPieces(count) => {
                write!(f, "{count} pieces exceeds the limit of {MAX_PIECES}")
            }
            ConfigError::DuplicateId(id) => write!(f, "piece id {id} used more than once"),
            ConfigError::EmptyPiece(id) => write!(f, "piece {id} has a zero-sized dimension"),
            ConfigError::OutOfBounds(id) => write!(f, "piece {id} does not fit on the board"),
            ConfigError::Overlap(a, b) => write!(f, "pieces {a} and {b} overlap"),
            ConfigError::MissingTarget => write!(f, "no target piece in configuration"),
            ConfigError::MultipleTargets => write!(f, "more than one target piece"),
            ConfigError::MismatchedFungibleSize(kind) => {
                write!(f, "{kind:?} pieces must all share the same dimensions")
            }
            ConfigError::GoalOutOfBounds { x, y } => {
                write!(f, "goal ({x}, {y}) leaves the target outside the board")
            }
        }
    }
}

impl Error for ConfigError {}
