//! Traits for an arbitrary player

use board::{Color, Directive};
use mailbox::{Error, Mailbox, PlyReport};

/// A player in a game
///
/// This trait is generic over how the player decides what to do, so people at a terminal and
/// scripted move lists can both implement this.
pub trait Player {
    /// Decide what to do as `side`, looking at the current board
    ///
    /// Returning `None` means the player has walked away and the game can't go on.
    fn choose(&mut self, side: Color, board: &Mailbox) -> Option<Directive>;

    /// Hear that the last directive was refused
    ///
    /// [`Player::choose`] will be asked again for the same side.
    fn rejected(&mut self, _err: &Error) {}

    /// See the result of a ply, made by either side
    fn observe(&mut self, _report: &PlyReport) {}
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn choose(&mut self, side: Color, board: &Mailbox) -> Option<Directive> {
        (**self).choose(side, board)
    }

    fn rejected(&mut self, err: &Error) {
        (**self).rejected(err)
    }

    fn observe(&mut self, report: &PlyReport) {
        (**self).observe(report)
    }
}
