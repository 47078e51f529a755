use core::{fmt, str::FromStr};

mod notation;

pub use notation::{Directive, MoveRequest, ParseDirectiveError};

/// The types of pieces there are
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}
impl PieceKind {
    /// All the kinds of pieces there are
    pub const KINDS: [PieceKind; 6] = [
        Self::Pawn,
        Self::Rook,
        Self::Knight,
        Self::Bishop,
        Self::Queen,
        Self::King,
    ];

    /// The capitalized letter used for this piece in move input
    pub const fn letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// The inverse of [`Self::letter`]
    pub const fn from_letter(c: char) -> Option<Self> {
        match c {
            'P' => Some(Self::Pawn),
            'R' => Some(Self::Rook),
            'N' => Some(Self::Knight),
            'B' => Some(Self::Bishop),
            'Q' => Some(Self::Queen),
            'K' => Some(Self::King),
            _ => None,
        }
    }

    /// Whether a pawn can promote into this kind of piece
    pub const fn is_promotable(self) -> bool {
        match self {
            PieceKind::Pawn | PieceKind::King => false,
            PieceKind::Rook | PieceKind::Queen | PieceKind::Knight | PieceKind::Bishop => true,
        }
    }

    /// Whether this piece moves along lines that other pieces can block
    pub const fn is_slider(self) -> bool {
        matches!(self, Self::Rook | Self::Bishop | Self::Queen)
    }
}

/// The colors a piece can have
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const fn other(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub const fn is_black(self) -> bool {
        match self {
            Color::White => false,
            Color::Black => true,
        }
    }

    pub const fn is_white(self) -> bool {
        match self {
            Color::White => true,
            Color::Black => false,
        }
    }

    /// The row this color's king and rooks start on
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// The row this color's pawns start on
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// The row this color's pawns promote on
    pub const fn promotion_rank(self) -> u8 {
        self.other().back_rank()
    }

    /// The row offset of a single pawn step
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// The lowercase letter used when drawing this color's pieces
    pub const fn letter(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "White",
            Color::Black => "Black",
        })
    }
}

/// A piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}
impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// Returns an iterator of all pieces that exist
    pub fn all_pieces() -> impl Iterator<Item = Self> {
        [Color::White, Color::Black]
            .into_iter()
            .flat_map(|color| PieceKind::KINDS.into_iter().map(move |kind| Self { kind, color }))
    }
}
/// Drawn as the color letter followed by the piece letter, with pawns in lowercase (`wp`, `bK`)
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self.kind {
            PieceKind::Pawn => 'p',
            kind => kind.letter(),
        };
        write!(f, "{}{}", self.color.letter(), letter)
    }
}

/// Why a game stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    Checkmate,
    Resignation,
    /// Both players agreed to a draw
    Draw,
    /// The side to move wasn't in check but couldn't move
    Stalemate,
}

/// The outcome of a finished game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameEnd {
    /// `None` for a drawn game
    pub winner: Option<Color>,
    pub reason: EndReason,
}
impl GameEnd {
    pub const fn checkmate(winner: Color) -> Self {
        Self {
            winner: Some(winner),
            reason: EndReason::Checkmate,
        }
    }

    pub const fn resignation(loser: Color) -> Self {
        Self {
            winner: Some(loser.other()),
            reason: EndReason::Resignation,
        }
    }

    pub const fn draw(reason: EndReason) -> Self {
        Self {
            winner: None,
            reason,
        }
    }
}
impl fmt::Display for GameEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reason == EndReason::Checkmate {
            writeln!(f, "Checkmate")?;
        }
        match self.winner {
            Some(color) => write!(f, "{color} wins"),
            None => f.write_str("Draw"),
        }
    }
}

/// An index on the board
///
/// Stored in 0x88 method:
/// ```text
/// 0b12345678
///        +-+ File
///    +-+ Row, where row 0 is rank 8
///   +   + Must be zero, invalid position if 1
/// ```
///
/// Rows count down the board from black's back rank, so a white pawn advances towards row 0.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardSquare(pub u8);

macro_rules! row_constants {
    ($($row:literal => $a:ident $b:ident $c:ident $d:ident $e:ident $f:ident $g:ident $h:ident;)*) => {$(
        pub const $a: Self = Self($row << 4);
        pub const $b: Self = Self($row << 4 | 1);
        pub const $c: Self = Self($row << 4 | 2);
        pub const $d: Self = Self($row << 4 | 3);
        pub const $e: Self = Self($row << 4 | 4);
        pub const $f: Self = Self($row << 4 | 5);
        pub const $g: Self = Self($row << 4 | 6);
        pub const $h: Self = Self($row << 4 | 7);
    )*};
}

impl BoardSquare {
    /// An invalid square
    ///
    /// Please use this instead of making your own so it's obvious if a deliberately-invalid square
    /// appeared.
    pub const INVALID: Self = Self(0xee);

    row_constants! {
        0 => A8 B8 C8 D8 E8 F8 G8 H8;
        1 => A7 B7 C7 D7 E7 F7 G7 H7;
        2 => A6 B6 C6 D6 E6 F6 G6 H6;
        3 => A5 B5 C5 D5 E5 F5 G5 H5;
        4 => A4 B4 C4 D4 E4 F4 G4 H4;
        5 => A3 B3 C3 D3 E3 F3 G3 H3;
        6 => A2 B2 C2 D2 E2 F2 G2 H2;
        7 => A1 B1 C1 D1 E1 F1 G1 H1;
    }

    /// Returns if this square is valid
    ///
    /// ```
    /// # use board::BoardSquare;
    /// assert!(!BoardSquare::INVALID.is_valid());
    /// assert!(BoardSquare::E4.is_valid());
    /// ```
    pub const fn is_valid(self) -> bool {
        self.0 & 0x88 == 0
    }

    /// Produce a board square from the row and file, returning [`Self::INVALID`] if the row and
    /// file are not a valid square.
    pub const fn from_rank_file(rank: u8, file: u8) -> Self {
        if rank < 8 && file < 8 {
            Self(rank << 4 | file)
        } else {
            Self::INVALID
        }
    }

    /// Returns the `(row, file)` tuple if this position is valid
    pub const fn to_rank_file(self) -> Option<(u8, u8)> {
        if self.is_valid() {
            Some((self.0 >> 4, self.0 & 0x07))
        } else {
            None
        }
    }

    /// Offset the given number of rows and files.
    ///
    /// Positive rank moves towards rank 1, while positive file moves towards the h file.
    ///
    /// ```rust
    /// use board::BoardSquare;
    /// assert_eq!(BoardSquare::D2, BoardSquare::A1.offset(-1, 3));
    /// assert_eq!(BoardSquare::A1, BoardSquare::D2.offset(1, -3));
    /// assert_eq!(BoardSquare::F7, BoardSquare::F7.offset(0, 0));
    /// assert!(!BoardSquare::D1.offset(1, 0).is_valid());
    /// assert!(!BoardSquare::D8.offset(-1, 0).is_valid());
    /// assert!(!BoardSquare::A4.offset(0, -1).is_valid());
    /// assert!(!BoardSquare::H4.offset(0, 1).is_valid());
    /// ```
    pub const fn offset(self, rank: i8, file: i8) -> Self {
        let Some((row, col)) = self.to_rank_file() else {
            return Self::INVALID;
        };
        let row = row as i16 + rank as i16;
        let col = col as i16 + file as i16;
        if row < 0 || col < 0 {
            return Self::INVALID;
        }
        Self::from_rank_file(row as u8, col as u8)
    }

    /// Offset by a [`SquareDelta`]
    pub const fn step(self, delta: SquareDelta) -> Self {
        self.offset(delta.rank, delta.file)
    }

    /// An iterator over all valid squares on the board, row by row from a8
    ///
    /// ```
    /// assert_eq!(board::BoardSquare::all_squares().count(), 64);
    /// ```
    pub fn all_squares() -> impl Iterator<Item = Self> {
        (0..64u8).map(|idx| Self((idx >> 3) << 4 | idx & 0x07))
    }

    /// The same square seen from the other side of the board
    ///
    /// ```
    /// # use board::BoardSquare;
    /// assert_eq!(BoardSquare::E2.mirrored(), BoardSquare::E7);
    /// ```
    pub const fn mirrored(self) -> Self {
        match self.to_rank_file() {
            Some((rank, file)) => Self::from_rank_file(7 - rank, file),
            None => Self::INVALID,
        }
    }

    /// Gets the offset from this square to the given target
    ///
    /// If either input is invalid, then the resulting delta might make no sense.
    pub const fn delta_to(self, target: Self) -> SquareDelta {
        let (Some((self_rank, self_file)), Some((other_rank, other_file))) =
            (self.to_rank_file(), target.to_rank_file())
        else {
            return SquareDelta::INVALID;
        };
        SquareDelta::new(
            other_rank as i8 - self_rank as i8,
            other_file as i8 - self_file as i8,
        )
    }

    /// Whether this is a dark square, counting a8 as light
    pub const fn is_dark(self) -> bool {
        match self.to_rank_file() {
            Some((rank, file)) => (rank + file) % 2 == 1,
            None => false,
        }
    }
}
impl fmt::Debug for BoardSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardSquare")
            .field("repr", &format_args!("{:X}", self.0))
            .field("readable", &format_args!("{self}"))
            .finish()
    }
}
/// Converts self to the string name for this position, or `"XX"` if illegal
impl fmt::Display for BoardSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rank_file() {
            Some((rank, file)) => write!(f, "{}{}", (b'a' + file) as char, (b'8' - rank) as char),
            None => f.write_str("XX"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("board position string was invalid")]
pub struct BoardSquareFromStrErr;

impl FromStr for BoardSquare {
    type Err = BoardSquareFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let &[file @ b'a'..=b'h', rank @ b'1'..=b'8'] = s.as_bytes() else {
            return Err(BoardSquareFromStrErr);
        };
        Ok(Self::from_rank_file(b'8' - rank, file - b'a'))
    }
}

/// The signed distance between two squares, in rows and files
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SquareDelta {
    pub rank: i8,
    pub file: i8,
}
impl SquareDelta {
    /// The offsets corresponding to all possible king steps
    pub const KING_STEPS: [SquareDelta; 8] = [
        Self::new(1, 1),
        Self::new(1, 0),
        Self::new(1, -1),
        Self::new(0, 1),
        Self::new(0, -1),
        Self::new(-1, 1),
        Self::new(-1, 0),
        Self::new(-1, -1),
    ];

    /// Larger than any distance on the board, so it never matches a piece's movement
    pub const INVALID: Self = Self::new(i8::MAX, i8::MAX);

    pub const fn new(rank: i8, file: i8) -> Self {
        Self { rank, file }
    }

    /// A move along a single row or file
    pub const fn is_straight(self) -> bool {
        (self.rank == 0) != (self.file == 0)
    }

    /// A move with equal non-zero row and file distance
    pub const fn is_diagonal(self) -> bool {
        self.rank != 0 && self.rank.unsigned_abs() == self.file.unsigned_abs()
    }

    pub const fn is_knight_jump(self) -> bool {
        matches!(
            (self.rank.unsigned_abs(), self.file.unsigned_abs()),
            (1, 2) | (2, 1)
        )
    }

    pub const fn is_king_step(self) -> bool {
        self.chebyshev_distance() == 1
    }

    /// The single step in the direction of this delta
    pub const fn unit(self) -> Self {
        Self::new(self.rank.signum(), self.file.signum())
    }

    /// Gets the Chebyshev distance for this offset
    ///
    /// This is the number of squares moved in one direction, for whichever direction is larger.
    pub const fn chebyshev_distance(self) -> u8 {
        let rank = self.rank.unsigned_abs();
        let file = self.file.unsigned_abs();
        if rank > file {
            rank
        } else {
            file
        }
    }
}
