use board::{Color, Directive, EndReason, GameEnd, MoveRequest};
use tracing::{debug, info, instrument};

use crate::{DetailedMove, Error, IllegalMove, Mailbox, Result};

bitflags::bitflags! {
    /// What has happened to one side over the game
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const InCheck = 0b0000_0001;
        const WonByCheckmate = 0b0000_0010;
        const Resigned = 0b0000_0100;
        /// Set by the move that offered, cleared by the next move
        const OfferedDraw = 0b0000_1000;
        const AcceptedDraw = 0b0001_0000;
    }
}

/// Whose turn it is, and the flags for each side
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameStatus {
    pub to_move: Color,
    pub white: StatusFlags,
    pub black: StatusFlags,
}

impl GameStatus {
    const fn new() -> Self {
        Self {
            to_move: Color::White,
            white: StatusFlags::empty(),
            black: StatusFlags::empty(),
        }
    }

    pub const fn flags(&self, color: Color) -> StatusFlags {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub fn flags_mut(&mut self, color: Color) -> &mut StatusFlags {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    pub fn in_check(&self, color: Color) -> bool {
        self.flags(color).contains(StatusFlags::InCheck)
    }

    pub fn check_status(&self) -> CheckStatus {
        CheckStatus {
            white_in_check: self.in_check(Color::White),
            black_in_check: self.in_check(Color::Black),
        }
    }
}

/// Which kings are attacked
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheckStatus {
    pub white_in_check: bool,
    pub black_in_check: bool,
}

impl CheckStatus {
    pub const fn any(self) -> bool {
        self.white_in_check || self.black_in_check
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnState {
    AwaitingMove(Color),
    Terminal(GameEnd),
}

/// Rules that differ between ways of running a game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// End the game as a draw when the side to move isn't in check and can't move
    ///
    /// Without this, such a game never ends: every move the stuck side tries is rejected.
    pub detect_stalemate: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            detect_stalemate: true,
        }
    }
}

/// The result of one accepted directive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlyReport {
    /// `None` when the directive was a resignation or an accepted draw
    pub played: Option<DetailedMove>,
    pub check: CheckStatus,
    pub game_end: Option<GameEnd>,
}

/// A game of chess in progress
#[derive(Clone, Debug)]
pub struct Game {
    board: Mailbox,
    status: GameStatus,
    state: TurnState,
    config: GameConfig,
}

impl Game {
    /// Start a game from the usual starting position
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self::from_position(Mailbox::initial_state(), Color::White, config)
    }

    /// Start a game from any position
    ///
    /// The side to move may already be checkmated or stalemated, in which case the game is over
    /// before it starts.
    pub fn from_position(board: Mailbox, to_move: Color, config: GameConfig) -> Self {
        let mut game = Self {
            board,
            status: GameStatus {
                to_move,
                ..GameStatus::new()
            },
            state: TurnState::AwaitingMove(to_move),
            config,
        };
        game.start_turn();
        game
    }

    pub fn board(&self) -> &Mailbox {
        &self.board
    }

    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn to_move(&self) -> Color {
        self.status.to_move
    }

    pub fn check_status(&self) -> CheckStatus {
        self.status.check_status()
    }

    /// How the game ended, if it has
    pub fn outcome(&self) -> Option<GameEnd> {
        match self.state {
            TurnState::AwaitingMove(_) => None,
            TurnState::Terminal(end) => Some(end),
        }
    }

    /// Parse and submit a directive written the way a player types it
    pub fn submit_str(&mut self, input: &str) -> Result<PlyReport> {
        let directive: Directive = input.parse()?;
        self.submit(directive)
    }

    /// Play a directive for the side to move
    ///
    /// On an error nothing changes, and the same side is still to move.
    #[instrument(skip(self), fields(to_move = %self.status.to_move))]
    pub fn submit(&mut self, directive: Directive) -> Result<PlyReport> {
        let TurnState::AwaitingMove(color) = self.state else {
            debug!("game already over");
            return Err(Error::GameAlreadyTerminal);
        };
        match directive {
            Directive::Resign => {
                self.status.flags_mut(color).insert(StatusFlags::Resigned);
                Ok(self.finish(GameEnd::resignation(color)))
            }
            Directive::AcceptDraw => {
                if !self
                    .status
                    .flags(color.other())
                    .contains(StatusFlags::OfferedDraw)
                {
                    debug!("no draw to accept");
                    return Err(IllegalMove::NoDrawOffered.into());
                }
                self.status.flags_mut(color).insert(StatusFlags::AcceptedDraw);
                Ok(self.finish(GameEnd::draw(EndReason::Draw)))
            }
            Directive::Move(request) => self.play(color, request, false),
            Directive::OfferDraw(request) => self.play(color, request, true),
        }
    }

    fn play(&mut self, color: Color, request: MoveRequest, offer_draw: bool) -> Result<PlyReport> {
        let mv = self.board.validate(request, color).map_err(|reason| {
            debug!(%request, %reason, "rejected move");
            reason
        })?;
        self.board.apply(&mv);
        self.status.white.remove(StatusFlags::OfferedDraw);
        self.status.black.remove(StatusFlags::OfferedDraw);
        if offer_draw {
            self.status.flags_mut(color).insert(StatusFlags::OfferedDraw);
        }
        self.status.to_move = color.other();
        self.state = TurnState::AwaitingMove(color.other());
        self.start_turn();
        Ok(PlyReport {
            played: Some(mv),
            check: self.check_status(),
            game_end: self.outcome(),
        })
    }

    /// Get the side to move ready to play, or end the game if they can't
    fn start_turn(&mut self) {
        let color = self.status.to_move;
        self.board.clear_double_step_flags(color);
        for side in [Color::White, Color::Black] {
            let in_check = self.board.is_in_check(side);
            self.status
                .flags_mut(side)
                .set(StatusFlags::InCheck, in_check);
        }
        if self.status.in_check(color) {
            debug!(%color, "in check");
            if self.board.is_checkmate(color) {
                self.status
                    .flags_mut(color.other())
                    .insert(StatusFlags::WonByCheckmate);
                self.finish(GameEnd::checkmate(color.other()));
            }
        } else if self.config.detect_stalemate && !self.board.has_any_legal_move(color) {
            self.finish(GameEnd::draw(EndReason::Stalemate));
        }
    }

    fn finish(&mut self, end: GameEnd) -> PlyReport {
        info!(winner = ?end.winner, reason = ?end.reason, "game over");
        self.state = TurnState::Terminal(end);
        PlyReport {
            played: None,
            check: self.check_status(),
            game_end: Some(end),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use board::{BoardSquare, PieceKind};

    use super::*;
    use crate::{testing::diagram, ChessPiece, MoveKind};

    #[track_caller]
    fn play_all(game: &mut Game, moves: &[&str]) -> PlyReport {
        let mut last = None;
        for mv in moves {
            last = Some(
                game.submit_str(mv)
                    .unwrap_or_else(|e| panic!("{mv} was rejected: {e:?}")),
            );
        }
        last.expect("no moves given")
    }

    #[test]
    fn test_open_king_pawns() {
        let mut game = Game::new();
        let report = game.submit_str("e2e4").unwrap();
        assert_eq!(report.check, CheckStatus::default());
        assert_eq!(report.game_end, None);
        assert_eq!(game.to_move(), Color::Black);
        let report = game.submit_str("e7e5").unwrap();
        assert!(!report.check.any());
        assert_eq!(
            report.played.map(|mv| mv.kind),
            Some(MoveKind::DoubleStep)
        );
        assert_eq!(game.state(), TurnState::AwaitingMove(Color::White));
    }

    #[test]
    fn test_rejection_keeps_turn() {
        let mut game = Game::new();
        assert_eq!(
            game.submit_str("e7e5"),
            Err(Error::IllegalMove(IllegalMove::NotYourPiece))
        );
        assert_eq!(
            game.submit_str("e2"),
            Err(Error::InvalidInputShape(
                board::ParseDirectiveError::WrongLength
            ))
        );
        assert_eq!(game.to_move(), Color::White);
        assert_eq!(game.board(), &Mailbox::initial_state());
        play_all(&mut game, &["e2e4", "e7e5"]);
        // the king can't walk into the bishop's diagonal
        play_all(&mut game, &["d2d3", "f8b4"]);
        assert_eq!(
            game.submit_str("e1d2"),
            Err(Error::IllegalMove(IllegalMove::MovingIntoCheck))
        );
        assert!(game.check_status().white_in_check);
    }

    #[test]
    fn test_fools_mate() {
        let mut game = Game::new();
        let report = play_all(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(report.check.white_in_check);
        assert_eq!(report.game_end, Some(GameEnd::checkmate(Color::Black)));
        assert!(game
            .status()
            .flags(Color::Black)
            .contains(StatusFlags::WonByCheckmate));
        assert_eq!(game.submit_str("a2a3"), Err(Error::GameAlreadyTerminal));
        assert_eq!(game.submit(Directive::Resign), Err(Error::GameAlreadyTerminal));
    }

    #[test]
    fn test_scholars_mate() {
        let mut game = Game::new();
        let report = play_all(
            &mut game,
            &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"],
        );
        assert_eq!(
            report.game_end,
            Some(GameEnd {
                winner: Some(Color::White),
                reason: EndReason::Checkmate,
            })
        );
        assert_eq!(game.outcome().map(|end| end.to_string()).as_deref(), Some("Checkmate\nWhite wins"));
    }

    #[test]
    fn test_check_that_can_be_blocked() {
        let mut game = Game::new();
        let report = play_all(&mut game, &["e2e4", "d7d5", "f1b5"]);
        assert!(report.check.black_in_check);
        assert_eq!(report.game_end, None);
        let report = play_all(&mut game, &["c7c6"]);
        assert!(!report.check.any());
    }

    #[test]
    fn test_en_passant_only_on_immediate_reply() {
        let mut game = Game::new();
        play_all(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);
        let report = play_all(&mut game, &["e5d6"]);
        assert_eq!(
            report.played.map(|mv| mv.kind),
            Some(MoveKind::EnPassant {
                victim: BoardSquare::D5
            })
        );
        assert_eq!(game.board().get(BoardSquare::D5), None);

        let mut game = Game::new();
        play_all(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5", "h2h3", "h7h6"]);
        assert_eq!(
            game.submit_str("e5d6"),
            Err(Error::IllegalMove(IllegalMove::NeverLegal))
        );
    }

    #[test]
    fn test_kingside_castle() {
        let mut game = Game::new();
        let report = play_all(
            &mut game,
            &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1"],
        );
        assert_eq!(
            report.played.map(|mv| mv.kind),
            Some(MoveKind::Castle {
                rook_source: BoardSquare::H1,
                rook_target: BoardSquare::F1,
            })
        );
        let rook = game.board().get(BoardSquare::F1);
        assert_eq!(rook.map(ChessPiece::kind), Some(PieceKind::Rook));
        assert_eq!(
            game.board().get(BoardSquare::G1).map(ChessPiece::kind),
            Some(PieceKind::King)
        );
    }

    const PROMOTION: &str = "
        . . . . . . . k
        P . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . K . . .
    ";

    #[test]
    fn test_promotion_choices() {
        for (input, kind) in [
            ("a7a8N", PieceKind::Knight),
            ("a7a8", PieceKind::Queen),
            ("a7a8K", PieceKind::Queen),
            ("a7a8B", PieceKind::Bishop),
        ] {
            let mut game = Game::from_position(diagram(PROMOTION), Color::White, GameConfig::default());
            game.submit_str(input).unwrap();
            assert_eq!(
                game.board().get(BoardSquare::A8).map(ChessPiece::piece),
                Some(board::Piece::new(kind, Color::White)),
                "{input}"
            );
        }
    }

    #[test]
    fn test_promotion_gives_check() {
        let mut game = Game::from_position(diagram(PROMOTION), Color::White, GameConfig::default());
        let report = game.submit_str("a7a8R").unwrap();
        assert!(report.check.black_in_check);
        assert_eq!(report.game_end, None);
        let mut game = Game::from_position(diagram(PROMOTION), Color::White, GameConfig::default());
        let report = game.submit_str("a7a8N").unwrap();
        assert!(!report.check.black_in_check);
    }

    #[test]
    fn test_draw_offer_and_accept() {
        let mut game = Game::new();
        game.submit_str("e2e4 draw?").unwrap();
        assert!(game
            .status()
            .flags(Color::White)
            .contains(StatusFlags::OfferedDraw));
        let report = game.submit(Directive::AcceptDraw).unwrap();
        assert_eq!(report.played, None);
        assert_eq!(report.game_end, Some(GameEnd::draw(EndReason::Draw)));
        assert_eq!(game.outcome().map(|end| end.to_string()).as_deref(), Some("Draw"));
    }

    #[test]
    fn test_draw_offer_expires() {
        let mut game = Game::new();
        assert_eq!(
            game.submit_str("draw"),
            Err(Error::IllegalMove(IllegalMove::NoDrawOffered))
        );
        play_all(&mut game, &["e2e4 draw?", "e7e5"]);
        assert_eq!(game.status().flags(Color::White), StatusFlags::empty());
        // the offer was declined by playing on
        assert_eq!(
            game.submit_str("draw"),
            Err(Error::IllegalMove(IllegalMove::NoDrawOffered))
        );
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn test_resign() {
        let mut game = Game::new();
        play_all(&mut game, &["e2e4"]);
        let report = game.submit_str("resign").unwrap();
        assert_eq!(report.game_end, Some(GameEnd::resignation(Color::Black)));
        assert!(game.status().flags(Color::Black).contains(StatusFlags::Resigned));
        assert_eq!(game.outcome().map(|end| end.to_string()).as_deref(), Some("White wins"));
    }

    const STALEMATE: &str = "
        . . . . . . . k
        . . . . . . . .
        . . . . . . Q .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        K . . . . . . .
    ";

    #[test]
    fn test_stalemate_detected() {
        let game = Game::from_position(diagram(STALEMATE), Color::Black, GameConfig::default());
        assert_eq!(game.outcome(), Some(GameEnd::draw(EndReason::Stalemate)));
    }

    #[test]
    fn test_stalemate_undetected_when_disabled() {
        let config = GameConfig {
            detect_stalemate: false,
        };
        let mut game = Game::from_position(diagram(STALEMATE), Color::Black, config);
        assert!(!game.config().detect_stalemate);
        assert_eq!(game.outcome(), None);
        for mv in ["h8g8", "h8h7", "h8g7"] {
            assert_eq!(
                game.submit_str(mv),
                Err(Error::IllegalMove(IllegalMove::MovingIntoCheck))
            );
        }
        assert_eq!(game.state(), TurnState::AwaitingMove(Color::Black));
    }

    #[test]
    fn test_starting_in_checkmate() {
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
        let game = Game::from_position(board, Color::White, GameConfig::default());
        assert_eq!(game.outcome(), Some(GameEnd::checkmate(Color::Black)));
        assert!(game.check_status().white_in_check);
    }
}
