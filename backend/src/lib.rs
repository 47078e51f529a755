use board::{Color, GameEnd};
use mailbox::{Error, Game, GameConfig, PlyReport, Result};
use players::Player;
use tracing::{debug, info, instrument};

/// A backend which queries moves from the two players until the game is done
pub struct Backend<White, Black> {
    /// The rules and the current state of the game
    game: Game,
    /// The white player
    white_player: White,
    /// The black player
    black_player: Black,
}

impl<White: Player, Black: Player> Backend<White, Black> {
    /// Create a new instance with the chess starting board
    pub fn new(white_player: White, black_player: Black, config: GameConfig) -> Self {
        Self {
            game: Game::with_config(config),
            white_player,
            black_player,
        }
    }

    /// Query whoever's turn it is for what to do
    ///
    /// Returns the report if the directive was accepted, which both players also get to see, or
    /// `None` if the player walked away instead. A refused directive is handed back to the
    /// player that gave it as well as returned, and that side is still to move.
    #[instrument(skip(self), fields(to_move = %self.game.to_move()))]
    pub fn play_half_move(&mut self) -> Result<Option<PlyReport>> {
        if self.game.outcome().is_some() {
            return Err(Error::GameAlreadyTerminal);
        }
        let side = self.game.to_move();
        let choice = match side {
            Color::White => self.white_player.choose(side, self.game.board()),
            Color::Black => self.black_player.choose(side, self.game.board()),
        };
        let Some(directive) = choice else {
            info!(%side, "player abandoned the game");
            return Ok(None);
        };
        match self.game.submit(directive) {
            Ok(report) => {
                debug!(%directive, "accepted");
                self.white_player.observe(&report);
                self.black_player.observe(&report);
                Ok(Some(report))
            }
            Err(err) => {
                match side {
                    Color::White => self.white_player.rejected(&err),
                    Color::Black => self.black_player.rejected(&err),
                }
                Err(err)
            }
        }
    }

    /// Play the game until it ends
    ///
    /// Returns how the game ended, or `None` if a player abandoned it first.
    pub fn play_game(&mut self) -> Option<GameEnd> {
        loop {
            match self.play_half_move() {
                Ok(Some(report)) => {
                    if let Some(end) = report.game_end {
                        return Some(end);
                    }
                }
                Ok(None) => return None,
                Err(Error::GameAlreadyTerminal) => return self.game.outcome(),
                Err(_) => {}
            }
        }
    }

    /// Get the state of the game right now
    pub fn game(&self) -> &Game {
        &self.game
    }
}
