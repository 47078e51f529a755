use board::{Color, MoveRequest, PieceKind};

use crate::{DetailedMove, IllegalMove, Mailbox};

impl Mailbox {
    /// Check if `color` may play this move right now.
    ///
    /// Returns the fully worked-out move if it's legal, otherwise why it's illegal. The checks run
    /// cheapest first: who owns the pieces involved, then how the piece moves, and last whether
    /// the move would leave the mover's own king attacked. That last test is asked of a copy of
    /// the board with the move played, so `self` is never modified.
    pub fn validate(&self, request: MoveRequest, color: Color) -> Result<DetailedMove, IllegalMove> {
        let MoveRequest { source, target, .. } = request;
        let piece = self.get(source).ok_or(IllegalMove::EmptySource)?;
        if piece.color != color {
            return Err(IllegalMove::NotYourPiece);
        }
        let occupant = self.get(target);
        match occupant {
            Some(other) if other.color == color => return Err(IllegalMove::OwnPieceOnTarget),
            Some(other) if other.is_king() => return Err(IllegalMove::CapturesKing),
            _ => {}
        }
        let kind = piece
            .shape(source, target, occupant, self)
            .ok_or(IllegalMove::NeverLegal)?;
        let promotes = piece.kind() == PieceKind::Pawn
            && target
                .to_rank_file()
                .is_some_and(|(rank, _)| rank == color.promotion_rank());
        let mv = DetailedMove {
            piece: piece.piece(),
            source,
            target,
            kind,
            promotion_into: promotes.then(|| request.promotion_choice()),
        };
        if self.after(&mv).is_in_check(color) {
            return Err(IllegalMove::MovingIntoCheck);
        }
        Ok(mv)
    }

    pub fn is_legal(&self, request: MoveRequest, color: Color) -> bool {
        self.validate(request, color).is_ok()
    }
}
