//! A chess rules engine that stores the board as an 8x8 array of squares
//!
//! The [`Game`] type drives a whole game one ply at a time. The lower-level queries (move shapes,
//! attacked squares, legality, checkmate) are all methods on [`Mailbox`] so they can be asked
//! about any hypothetical position.

use core::fmt;

use board::{BoardSquare, Color, ParseDirectiveError, PieceKind};

mod check;
mod detailed_move;
mod game;
mod path;
mod piece;
mod resolve;
#[cfg(test)]
mod testing;
mod validate;

pub use crate::detailed_move::{DetailedMove, MoveKind};
pub use crate::game::{
    CheckStatus, Game, GameConfig, GameStatus, PlyReport, StatusFlags, TurnState,
};
pub use crate::path::{trace_path, Path};
pub use crate::piece::{ChessPiece, Role};

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Why a requested move can't be played
///
/// These are only told apart in logs; players are shown one generic rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("no piece at move source")]
    EmptySource,
    #[error("piece at move source belongs to the opponent")]
    NotYourPiece,
    #[error("moving side already occupies the target")]
    OwnPieceOnTarget,
    #[error("kings can't be captured")]
    CapturesKing,
    #[error("piece can't move that way")]
    NeverLegal,
    #[error("attempted move puts moving side's king in check")]
    MovingIntoCheck,
    #[error("no draw was offered")]
    NoDrawOffered,
}

/// Everything that can stop a directive from being played
///
/// Nothing here ends the game. The same player can try again after any of these, except once the
/// game is over. Acting for the wrong side isn't representable: [`Game::submit`] always plays for
/// the side to move.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInputShape(#[from] ParseDirectiveError),
    #[error("illegal move")]
    IllegalMove(#[from] IllegalMove),
    #[error("the game is already over")]
    GameAlreadyTerminal,
}

/// The position of every piece, stored square by square
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mailbox {
    /// Indexed by row (rank 8 first), then file
    squares: [[Option<ChessPiece>; 8]; 8],
}

impl Mailbox {
    /// A board with no pieces on it
    pub const EMPTY: Self = Self {
        squares: [[None; 8]; 8],
    };

    /// The position at the start of a chess game
    pub fn initial_state() -> Self {
        const BACK_ROW: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::EMPTY;
        for color in [Color::White, Color::Black] {
            for (file, kind) in (0..).zip(BACK_ROW) {
                board.set(
                    BoardSquare::from_rank_file(color.back_rank(), file),
                    Some(ChessPiece::new(kind, color)),
                );
                board.set(
                    BoardSquare::from_rank_file(color.pawn_rank(), file),
                    Some(ChessPiece::new(PieceKind::Pawn, color)),
                );
            }
        }
        board
    }

    /// Find the piece, if any, at the given square
    ///
    /// Returns `None` if the given square is invalid.
    pub fn get(&self, square: BoardSquare) -> Option<ChessPiece> {
        let (rank, file) = square.to_rank_file()?;
        self.squares[rank as usize][file as usize]
    }

    pub fn get_mut(&mut self, square: BoardSquare) -> Option<&mut ChessPiece> {
        let (rank, file) = square.to_rank_file()?;
        self.squares[rank as usize][file as usize].as_mut()
    }

    /// Put `piece` on `square`, returning whatever was there before
    pub fn set(&mut self, square: BoardSquare, piece: Option<ChessPiece>) -> Option<ChessPiece> {
        let Some((rank, file)) = square.to_rank_file() else {
            debug_assert!(false, "placing a piece on invalid square {square:?}");
            return None;
        };
        core::mem::replace(&mut self.squares[rank as usize][file as usize], piece)
    }

    /// Every occupied square, rank 8 first
    pub fn pieces(&self) -> impl Iterator<Item = (BoardSquare, ChessPiece)> + '_ {
        BoardSquare::all_squares().filter_map(|square| Some((square, self.get(square)?)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (BoardSquare, ChessPiece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Where the given side's king is, if it has one
    pub fn king_square(&self, color: Color) -> Option<BoardSquare> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.is_king())
            .map(|(square, _)| square)
    }

    /// Make every pawn of `color` ineligible to be captured en passant
    pub fn clear_double_step_flags(&mut self, color: Color) {
        for piece in self.squares.iter_mut().flatten().flatten() {
            if piece.color == color {
                piece.set_just_advanced_two(false);
            }
        }
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::initial_state()
    }
}

/// Draws the board from white's side, with `##` marking empty dark squares
impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in 0..8u8 {
            for file in 0..8 {
                let square = BoardSquare::from_rank_file(rank, file);
                match self.get(square) {
                    Some(piece) => write!(f, "{}", piece.piece())?,
                    None if square.is_dark() => f.write_str("##")?,
                    None => f.write_str("  ")?,
                }
                f.write_str(" ")?;
            }
            writeln!(f, "{}", 8 - rank)?;
        }
        f.write_str(" a  b  c  d  e  f  g  h")
    }
}
