use core::fmt;

use board::{BoardSquare, Piece, PieceKind};

use crate::{ChessPiece, Mailbox};

/// How a move affects the board beyond moving one piece
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// Onto an empty square
    Quiet,
    /// A pawn's first move, two squares forward
    DoubleStep,
    /// Onto a square held by the opponent
    Capture,
    /// A pawn capture where the captured pawn isn't on the target square
    EnPassant { victim: BoardSquare },
    /// The king's two-square move, which also carries the rook across it
    Castle {
        rook_source: BoardSquare,
        rook_target: BoardSquare,
    },
}

/// All the details of a move figured out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetailedMove {
    pub piece: Piece,
    pub source: BoardSquare,
    pub target: BoardSquare,
    pub kind: MoveKind,
    pub promotion_into: Option<PieceKind>,
}

impl DetailedMove {
    pub const fn is_capture(&self) -> bool {
        matches!(self.kind, MoveKind::Capture | MoveKind::EnPassant { .. })
    }

    pub const fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::Castle { .. })
    }

    pub const fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassant { .. })
    }
}

impl fmt::Display for DetailedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source, self.target)?;
        if let Some(kind) = self.promotion_into {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

impl Mailbox {
    /// Do the move without checking if it's legal
    ///
    /// Returns the captured piece, if any.
    pub fn apply(&mut self, mv: &DetailedMove) -> Option<ChessPiece> {
        let Some(mut mover) = self.set(mv.source, None) else {
            debug_assert!(false, "applying {mv} with nothing at the source");
            return None;
        };
        let captured = match mv.kind {
            MoveKind::EnPassant { victim } => self.set(victim, None),
            MoveKind::Castle {
                rook_source,
                rook_target,
            } => {
                let mut rook = self.set(rook_source, None);
                if let Some(rook) = &mut rook {
                    rook.mark_moved();
                }
                self.set(rook_target, rook);
                None
            }
            MoveKind::Quiet | MoveKind::DoubleStep | MoveKind::Capture => None,
        };
        mover.mark_moved();
        mover.set_just_advanced_two(mv.kind == MoveKind::DoubleStep);
        if let Some(kind) = mv.promotion_into {
            mover = ChessPiece::new(kind, mover.color);
        }
        let displaced = self.set(mv.target, Some(mover));
        captured.or(displaced)
    }

    /// The board as it would be after the move
    pub fn after(&self, mv: &DetailedMove) -> Self {
        let mut board = self.clone();
        board.apply(mv);
        board
    }
}
