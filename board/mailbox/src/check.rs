use board::{BoardSquare, Color, PieceKind};

use crate::{ChessPiece, Mailbox};

impl Mailbox {
    /// All pieces of color `by` which could move onto `square`, ignoring their own king's safety
    ///
    /// The square is treated as holding a piece of the other color, so an empty square counts as
    /// attacked by a pawn only along the pawn's diagonals.
    pub fn attackers(
        &self,
        square: BoardSquare,
        by: Color,
    ) -> impl Iterator<Item = (BoardSquare, ChessPiece)> + '_ {
        let occupant = match self.get(square) {
            Some(piece) if piece.color != by => piece,
            _ => ChessPiece::new(PieceKind::King, by.other()),
        };
        self.pieces_of(by).filter(move |&(source, piece)| {
            piece.is_legal_shape(source, square, Some(occupant), self)
        })
    }

    /// Whether any piece of color `by` attacks `square`
    pub fn is_attacked(&self, square: BoardSquare, by: Color) -> bool {
        self.attackers(square, by).next().is_some()
    }

    /// Whether `color`'s king is attacked
    ///
    /// A side without a king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_attacked(king, color.other()))
    }
}
