//! Text form of the directives a player can give on their turn

use core::{fmt, str::FromStr};

use crate::{BoardSquare, PieceKind};

/// A request to move whatever is on `source` to `target`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    pub source: BoardSquare,
    pub target: BoardSquare,
    /// What a pawn reaching the far row should become, if the player said
    pub promotion: Option<PieceKind>,
}
impl MoveRequest {
    pub const fn new(source: BoardSquare, target: BoardSquare) -> Self {
        Self {
            source,
            target,
            promotion: None,
        }
    }

    pub const fn promoting(self, kind: PieceKind) -> Self {
        Self {
            promotion: Some(kind),
            ..self
        }
    }

    /// The piece a promoting pawn turns into
    ///
    /// Anything that isn't a rook, knight, bishop, or queen becomes a queen.
    pub const fn promotion_choice(self) -> PieceKind {
        match self.promotion {
            Some(kind) if kind.is_promotable() => kind,
            _ => PieceKind::Queen,
        }
    }
}
impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source, self.target)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

/// Everything a player can do with their turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    Move(MoveRequest),
    /// Make the move and offer a draw to the opponent
    OfferDraw(MoveRequest),
    Resign,
    /// Take the draw the opponent offered with their last move
    AcceptDraw,
}
impl Directive {
    /// The move carried by this directive, if any
    pub const fn request(self) -> Option<MoveRequest> {
        match self {
            Self::Move(request) | Self::OfferDraw(request) => Some(request),
            Self::Resign | Self::AcceptDraw => None,
        }
    }
}
impl From<MoveRequest> for Directive {
    fn from(request: MoveRequest) -> Self {
        Self::Move(request)
    }
}
impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(request) => request.fmt(f),
            Self::OfferDraw(request) => write!(f, "{request} draw?"),
            Self::Resign => f.write_str("resign"),
            Self::AcceptDraw => f.write_str("draw"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseDirectiveError {
    #[error("a move must be two squares and an optional promotion")]
    WrongLength,
    #[error("invalid square in move")]
    InvalidSquare(#[from] crate::BoardSquareFromStrErr),
    #[error("invalid promotion piece {0:?}")]
    InvalidPromotion(char),
    #[error("a piece can't move to the square it's on")]
    SameSquare,
}

const OFFER_SUFFIX: &str = "draw?";

impl FromStr for Directive {
    type Err = ParseDirectiveError;

    /// Parses input like `e2e4`, `e7e8N`, `g1f3 draw?`, `resign`, or `draw`
    ///
    /// Whitespace anywhere in the input is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.as_str() {
            "resign" => return Ok(Self::Resign),
            "draw" => return Ok(Self::AcceptDraw),
            _ => {}
        }
        Ok(match compact.strip_suffix(OFFER_SUFFIX) {
            Some(body) => Self::OfferDraw(body.parse()?),
            None => Self::Move(compact.parse()?),
        })
    }
}

impl FromStr for MoveRequest {
    type Err = ParseDirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(ParseDirectiveError::WrongLength);
        }
        let source: BoardSquare = s[0..2].parse()?;
        let target: BoardSquare = s[2..4].parse()?;
        if source == target {
            return Err(ParseDirectiveError::SameSquare);
        }
        let promotion = match s[4..].chars().next() {
            Some(c) => Some(PieceKind::from_letter(c).ok_or(ParseDirectiveError::InvalidPromotion(c))?),
            None => None,
        };
        Ok(Self {
            source,
            target,
            promotion,
        })
    }
}
