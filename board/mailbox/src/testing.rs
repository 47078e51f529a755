//! Helpers for building positions in tests

use board::{BoardSquare, Color, PieceKind};
use quickcheck::{Arbitrary, Gen};

use crate::{ChessPiece, Mailbox, MoveKind};

/// Build a board from eight rows of squares, rank 8 first
///
/// Each square is `.` for empty or a piece letter, uppercase for white. Whitespace is ignored.
/// Kings and rooks count as unmoved only on their starting squares.
#[track_caller]
pub fn diagram(rows: &str) -> Mailbox {
    let squares: Vec<char> = rows.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(squares.len(), 64, "a diagram needs 64 squares");
    let mut board = Mailbox::EMPTY;
    for (square, &c) in BoardSquare::all_squares().zip(&squares) {
        if c == '.' {
            continue;
        }
        let kind = PieceKind::from_letter(c.to_ascii_uppercase())
            .unwrap_or_else(|| panic!("unknown piece {c:?}"));
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let mut piece = ChessPiece::new(kind, color);
        let home = color.back_rank();
        let at_start = match kind {
            PieceKind::King => square == BoardSquare::from_rank_file(home, 4),
            PieceKind::Rook => {
                square == BoardSquare::from_rank_file(home, 0)
                    || square == BoardSquare::from_rank_file(home, 7)
            }
            _ => true,
        };
        if !at_start {
            piece.mark_moved();
        }
        board.set(square, Some(piece));
    }
    board
}

/// The same position with the board turned around and the colors swapped
pub fn mirrored(board: &Mailbox) -> Mailbox {
    let mut flipped = Mailbox::EMPTY;
    for (square, piece) in board.pieces() {
        flipped.set(
            square.mirrored(),
            Some(ChessPiece {
                color: piece.color.other(),
                ..piece
            }),
        );
    }
    flipped
}

impl MoveKind {
    pub fn mirrored(self) -> Self {
        match self {
            Self::EnPassant { victim } => Self::EnPassant {
                victim: victim.mirrored(),
            },
            Self::Castle {
                rook_source,
                rook_target,
            } => Self::Castle {
                rook_source: rook_source.mirrored(),
                rook_target: rook_target.mirrored(),
            },
            kind => kind,
        }
    }
}

/// A random sparse position with one king per side
#[derive(Clone, Debug)]
pub struct Position(pub Mailbox);

fn take_square(g: &mut Gen, free: &mut Vec<BoardSquare>) -> BoardSquare {
    let idx = usize::arbitrary(g) % free.len();
    free.swap_remove(idx)
}

impl Arbitrary for Position {
    fn arbitrary(g: &mut Gen) -> Self {
        const OTHERS: [PieceKind; 5] = [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ];
        let mut board = Mailbox::EMPTY;
        let mut free: Vec<BoardSquare> = BoardSquare::all_squares().collect();
        for color in [Color::White, Color::Black] {
            let mut king = ChessPiece::new(PieceKind::King, color);
            if bool::arbitrary(g) {
                king.mark_moved();
            }
            let home = BoardSquare::from_rank_file(color.back_rank(), 4);
            let square = if free.contains(&home) && bool::arbitrary(g) {
                free.retain(|&square| square != home);
                home
            } else {
                take_square(g, &mut free)
            };
            board.set(square, Some(king));
        }
        let count = usize::arbitrary(g) % 12;
        for _ in 0..count {
            let kind = *g.choose(&OTHERS).unwrap();
            let color = if bool::arbitrary(g) {
                Color::White
            } else {
                Color::Black
            };
            let mut piece = ChessPiece::new(kind, color);
            if bool::arbitrary(g) {
                piece.mark_moved();
                piece.set_just_advanced_two(true);
            }
            board.set(take_square(g, &mut free), Some(piece));
        }
        Self(board)
    }
}
