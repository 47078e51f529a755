use core::{fmt, slice};

use board::BoardSquare;

use crate::Mailbox;

/// The squares strictly between the two ends of a straight or diagonal line
///
/// The longest line on a board has six squares in between, so this never allocates.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Path {
    squares: [BoardSquare; 6],
    len: u8,
}

impl Path {
    const EMPTY: Self = Self {
        squares: [BoardSquare::INVALID; 6],
        len: 0,
    };

    fn push(&mut self, square: BoardSquare) {
        self.squares[self.len as usize] = square;
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The squares in order, starting next to the source
    pub fn squares(&self) -> &[BoardSquare] {
        &self.squares[..self.len()]
    }

    pub fn iter(&self) -> slice::Iter<'_, BoardSquare> {
        self.squares().iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a BoardSquare;
    type IntoIter = slice::Iter<'a, BoardSquare>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(ToString::to_string))
            .finish()
    }
}

/// Follow the straight or diagonal line from `source` to `target`
///
/// Returns the squares in between if they're all empty. Returns `None` if the two squares don't
/// share a rank, file, or diagonal, or if something is in the way. Neighboring squares give an
/// empty path.
pub fn trace_path(source: BoardSquare, target: BoardSquare, board: &Mailbox) -> Option<Path> {
    let delta = source.delta_to(target);
    if !delta.is_straight() && !delta.is_diagonal() {
        return None;
    }
    let step = delta.unit();
    let mut path = Path::EMPTY;
    let mut square = source.step(step);
    while square != target {
        if !square.is_valid() || board.get(square).is_some() {
            return None;
        }
        path.push(square);
        square = square.step(step);
    }
    Some(path)
}

/// Whether a sliding piece could travel from `source` to `target`
pub fn is_line_clear(source: BoardSquare, target: BoardSquare, board: &Mailbox) -> bool {
    trace_path(source, target, board).is_some()
}
