use board::{BoardSquare, Color, Piece, PieceKind, SquareDelta};

use crate::{path::is_line_clear, Mailbox, MoveKind};

/// What a piece is, along with the history it needs to remember for special moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Pawn {
        /// Set only during the opponent's reply to this pawn's double step
        just_advanced_two: bool,
    },
    Knight,
    Bishop,
    Rook {
        has_moved: bool,
    },
    Queen,
    King {
        has_moved: bool,
    },
}

/// A piece on a [`Mailbox`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChessPiece {
    pub color: Color,
    pub role: Role,
}

impl ChessPiece {
    /// A piece that hasn't moved yet
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        let role = match kind {
            PieceKind::Pawn => Role::Pawn {
                just_advanced_two: false,
            },
            PieceKind::Knight => Role::Knight,
            PieceKind::Bishop => Role::Bishop,
            PieceKind::Rook => Role::Rook { has_moved: false },
            PieceKind::Queen => Role::Queen,
            PieceKind::King => Role::King { has_moved: false },
        };
        Self { color, role }
    }

    pub const fn kind(self) -> PieceKind {
        match self.role {
            Role::Pawn { .. } => PieceKind::Pawn,
            Role::Knight => PieceKind::Knight,
            Role::Bishop => PieceKind::Bishop,
            Role::Rook { .. } => PieceKind::Rook,
            Role::Queen => PieceKind::Queen,
            Role::King { .. } => PieceKind::King,
        }
    }

    /// The piece without any of its history
    pub const fn piece(self) -> Piece {
        Piece::new(self.kind(), self.color)
    }

    pub const fn is_king(self) -> bool {
        matches!(self.role, Role::King { .. })
    }

    /// Whether this king or rook has lost its right to castle
    ///
    /// Always `false` for other pieces.
    pub const fn has_moved(self) -> bool {
        match self.role {
            Role::Rook { has_moved } | Role::King { has_moved } => has_moved,
            _ => false,
        }
    }

    pub const fn just_advanced_two(self) -> bool {
        matches!(
            self.role,
            Role::Pawn {
                just_advanced_two: true
            }
        )
    }

    pub fn mark_moved(&mut self) {
        if let Role::Rook { has_moved } | Role::King { has_moved } = &mut self.role {
            *has_moved = true;
        }
    }

    pub fn set_just_advanced_two(&mut self, value: bool) {
        if let Role::Pawn { just_advanced_two } = &mut self.role {
            *just_advanced_two = value;
        }
    }

    /// Decide whether this piece, standing on `source`, can move to `target` according to the
    /// way it moves.
    ///
    /// `occupant` stands for whatever is on `target`; it's usually `board.get(target)`, but attack
    /// queries pass a stand-in so that pawns are asked about captures. Whether the move exposes
    /// the mover's own king isn't considered here.
    ///
    /// Returns what kind of move it would be, or `None` if the piece can't move there.
    pub fn shape(
        self,
        source: BoardSquare,
        target: BoardSquare,
        occupant: Option<ChessPiece>,
        board: &Mailbox,
    ) -> Option<MoveKind> {
        if !source.is_valid() || !target.is_valid() || source == target {
            return None;
        }
        let plain = match occupant {
            Some(other) if other.color == self.color => return None,
            Some(_) => MoveKind::Capture,
            None => MoveKind::Quiet,
        };
        let delta = source.delta_to(target);
        match self.role {
            Role::Knight => delta.is_knight_jump().then_some(plain),
            Role::Bishop => {
                (delta.is_diagonal() && is_line_clear(source, target, board)).then_some(plain)
            }
            Role::Rook { .. } => {
                (delta.is_straight() && is_line_clear(source, target, board)).then_some(plain)
            }
            Role::Queen => is_line_clear(source, target, board).then_some(plain),
            Role::Pawn { .. } => self.pawn_shape(source, delta, occupant, board),
            Role::King { has_moved } => {
                if delta.is_king_step() {
                    Some(plain)
                } else if !has_moved && occupant.is_none() {
                    self.castle_shape(source, target, board)
                } else {
                    None
                }
            }
        }
    }

    /// Whether [`Self::shape`] allows the move at all
    pub fn is_legal_shape(
        self,
        source: BoardSquare,
        target: BoardSquare,
        occupant: Option<ChessPiece>,
        board: &Mailbox,
    ) -> bool {
        self.shape(source, target, occupant, board).is_some()
    }

    fn pawn_shape(
        self,
        source: BoardSquare,
        delta: SquareDelta,
        occupant: Option<ChessPiece>,
        board: &Mailbox,
    ) -> Option<MoveKind> {
        let forward = self.color.forward();
        match (delta.rank, delta.file.unsigned_abs(), occupant) {
            (rank, 0, None) if rank == forward => Some(MoveKind::Quiet),
            (rank, 0, None) if rank == 2 * forward => {
                let (row, _) = source.to_rank_file()?;
                let skipped = source.offset(forward, 0);
                (row == self.color.pawn_rank() && board.get(skipped).is_none())
                    .then_some(MoveKind::DoubleStep)
            }
            (rank, 1, Some(_)) if rank == forward => Some(MoveKind::Capture),
            (rank, 1, None) if rank == forward => {
                let victim = source.offset(0, delta.file);
                match board.get(victim) {
                    Some(pawn)
                        if pawn.color != self.color
                            && pawn.kind() == PieceKind::Pawn
                            && pawn.just_advanced_two() =>
                    {
                        Some(MoveKind::EnPassant { victim })
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Castling, for a king that hasn't moved and a target that's empty
    ///
    /// The king's final square being attacked is left for the self-check test, like any other
    /// king move.
    fn castle_shape(
        self,
        source: BoardSquare,
        target: BoardSquare,
        board: &Mailbox,
    ) -> Option<MoveKind> {
        let home = self.color.back_rank();
        if source != BoardSquare::from_rank_file(home, 4) {
            return None;
        }
        let (rook_file, transit_file) = match target.to_rank_file()? {
            (rank, 6) if rank == home => (7, 5),
            (rank, 2) if rank == home => (0, 3),
            _ => return None,
        };
        let rook_source = BoardSquare::from_rank_file(home, rook_file);
        match board.get(rook_source) {
            Some(rook)
                if rook.color == self.color
                    && rook.kind() == PieceKind::Rook
                    && !rook.has_moved() => {}
            _ => return None,
        }
        if !is_line_clear(source, rook_source, board) {
            return None;
        }
        let opponent = self.color.other();
        if board.is_attacked(source, opponent) {
            return None;
        }
        let transit = BoardSquare::from_rank_file(home, transit_file);
        let mut passing = board.clone();
        passing.set(source, None);
        passing.set(transit, Some(self));
        if passing.is_attacked(transit, opponent) {
            return None;
        }
        Some(MoveKind::Castle {
            rook_source,
            rook_target: transit,
        })
    }
}
