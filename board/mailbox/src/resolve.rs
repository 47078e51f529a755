use board::{BoardSquare, Color, MoveRequest, PieceKind, SquareDelta};
use tracing::{debug, instrument};

use crate::{path::trace_path, Mailbox};

impl Mailbox {
    /// Whether `color` is in check with no way out
    ///
    /// A check can be answered by moving the king, by taking the checking piece, or by putting
    /// something in the way of a rook, bishop, or queen. Each answer is only tried as a move that
    /// passes [`Mailbox::validate`], so an answer that leaves another check standing doesn't
    /// count. Against two checking pieces at once only a king move can help.
    #[instrument(level = "debug", skip(self))]
    pub fn is_checkmate(&self, color: Color) -> bool {
        let Some(king) = self.king_square(color) else {
            return false;
        };
        let attackers: Vec<_> = self.attackers(king, color.other()).collect();
        if attackers.is_empty() {
            return false;
        }
        let escape = SquareDelta::KING_STEPS
            .into_iter()
            .map(|step| king.step(step))
            .filter(|target| target.is_valid())
            .find(|&target| self.is_legal(MoveRequest::new(king, target), color));
        if let Some(target) = escape {
            debug!(%target, "king can escape");
            return false;
        }
        let &[(attacker_square, attacker)] = attackers.as_slice() else {
            debug!(attackers = attackers.len(), "double check");
            return true;
        };

        let mut targets = vec![attacker_square];
        if attacker.just_advanced_two() {
            // the square it skipped, for an en passant capture
            targets.push(attacker_square.offset(-attacker.color.forward(), 0));
        }
        let blockable =
            attacker.kind().is_slider() && !attacker_square.delta_to(king).is_king_step();
        if blockable {
            if let Some(path) = trace_path(attacker_square, king, self) {
                targets.extend(path.iter().copied());
            }
        }

        let defence = self
            .pieces_of(color)
            .filter(|(_, piece)| !piece.is_king())
            .find_map(|(source, _)| {
                targets
                    .iter()
                    .find(|&&target| self.is_legal(MoveRequest::new(source, target), color))
                    .map(|&target| (source, target))
            });
        match defence {
            Some((source, target)) => {
                debug!(%source, %target, %attacker_square, "check can be answered");
                false
            }
            None => true,
        }
    }

    /// Whether `color` could make any move at all
    pub fn has_any_legal_move(&self, color: Color) -> bool {
        self.pieces_of(color).any(|(source, piece)| {
            candidate_targets(source, piece.kind())
                .any(|target| self.is_legal(MoveRequest::new(source, target), color))
        })
    }
}

/// Squares a piece of this kind could possibly reach from `source` on an empty board, plus the
/// castling squares for kings. A pruning step for exhaustive searches, never a legality test.
fn candidate_targets(source: BoardSquare, kind: PieceKind) -> impl Iterator<Item = BoardSquare> {
    BoardSquare::all_squares().filter(move |&target| {
        let delta = source.delta_to(target);
        match kind {
            PieceKind::Knight => delta.is_knight_jump(),
            PieceKind::Bishop => delta.is_diagonal(),
            PieceKind::Rook => delta.is_straight(),
            PieceKind::Queen => delta.is_straight() || delta.is_diagonal(),
            PieceKind::Pawn => delta.file.abs() <= 1 && (1..=2).contains(&delta.rank.abs()),
            PieceKind::King => delta.is_king_step() || (delta.rank == 0 && delta.file.abs() == 2),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::diagram;

    #[test]
    fn test_back_rank_mate() {
        let board = diagram(
            "
            . . . . . . k .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . P P P
            r . . . . . K .
            ",
        );
        assert!(board.is_in_check(Color::White));
        assert!(board.is_checkmate(Color::White));
        assert!(!board.is_checkmate(Color::Black));
    }

    #[test]
    fn test_check_answered_by_block() {
        let board = diagram(
            "
            . . . . . . k .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . R . . . .
            . . . . . P P P
            r . . . . . K .
            ",
        );
        assert!(board.is_in_check(Color::White));
        assert!(!board.is_checkmate(Color::White));
    }

    #[test]
    fn test_check_answered_by_capture() {
        let board = diagram(
            "
            . . . . . . k .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . B . . . .
            . . . . . . . .
            . . . . . P P P
            r . . . . . K .
            ",
        );
        assert!(board.is_in_check(Color::White));
        assert!(!board.is_checkmate(Color::White));
    }

    #[test]
    fn test_check_answered_by_king_step() {
        let board = diagram(
            "
            . . . . . . k .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . P . P
            r . . . . . K .
            ",
        );
        assert!(board.is_in_check(Color::White));
        assert!(!board.is_checkmate(Color::White));
    }

    #[test]
    fn test_double_check_needs_king_move() {
        let board = diagram(
            "
            . . . . r . k .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . n . .
            . . . P . P . .
            . . . R K R . .
            ",
        );
        assert_eq!(
            board.attackers(BoardSquare::E1, Color::Black).count(),
            2
        );
        assert!(board.is_checkmate(Color::White));
    }

    #[test]
    fn test_check_answered_by_en_passant() {
        let mut board = diagram(
            "
            . . . . . . . .
            . . . . . . . .
            . . . . b k . .
            . . . . . . p P
            . . . . . . . K
            r . . . . . . .
            . . . . . . . .
            . . . . . . . .
            ",
        );
        assert!(board.is_in_check(Color::White));
        assert!(board.is_checkmate(Color::White));
        // as if black had just played g7g5
        if let Some(pawn) = board.get_mut(BoardSquare::G5) {
            pawn.set_just_advanced_two(true);
        }
        assert!(!board.is_checkmate(Color::White));
    }

    #[test]
    fn test_any_legal_move() {
        assert!(Mailbox::initial_state().has_any_legal_move(Color::White));
        assert!(Mailbox::initial_state().has_any_legal_move(Color::Black));
        let stalemate = diagram(
            "
            . . . . . . . k
            . . . . . . . .
            . . . . . . Q .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            K . . . . . . .
            ",
        );
        assert!(!stalemate.is_in_check(Color::Black));
        assert!(!stalemate.has_any_legal_move(Color::Black));
        assert!(stalemate.has_any_legal_move(Color::White));
    }
}
