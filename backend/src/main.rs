//! Play a game of chess in the terminal

use std::{fs, io, path::PathBuf, process::ExitCode};

use backend::Backend;
use clap::{Parser, ValueEnum};
use mailbox::{GameConfig, Mailbox};
use players::Player;
use scripted::{ScriptError, ScriptedPlayer};
use terminal_ui::TerminalUIPlayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Who sits at one side of the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Seat {
    /// Someone typing moves at the terminal
    Human,
    /// That side's moves from the --script file
    Script,
}

/// Two-player chess at the terminal
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Who plays white
    #[arg(long, value_enum, default_value_t = Seat::Human)]
    white: Seat,
    /// Who plays black
    #[arg(long, value_enum, default_value_t = Seat::Human)]
    black: Seat,
    /// A game to replay, one directive per line, alternating white and black
    ///
    /// Blank lines and lines starting with `#` are ignored.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Keep going when the side to move can't move but isn't in check
    #[arg(long)]
    no_stalemate: bool,
}

#[derive(Debug, thiserror::Error)]
enum SetupError {
    #[error("a scripted player needs --script")]
    MissingScript,
    #[error("couldn't read {}: {source}", path.display())]
    ReadScript { path: PathBuf, source: io::Error },
    #[error("bad script, {0}")]
    Script(#[from] ScriptError),
}

fn seat_players(args: &Args) -> Result<(Box<dyn Player>, Box<dyn Player>), SetupError> {
    let needs_script = args.white == Seat::Script || args.black == Seat::Script;
    let (white_script, black_script) = match (&args.script, needs_script) {
        (Some(path), true) => {
            let text = fs::read_to_string(path).map_err(|source| SetupError::ReadScript {
                path: path.clone(),
                source,
            })?;
            ScriptedPlayer::pair_from_script(&text)?
        }
        (None, true) => return Err(SetupError::MissingScript),
        (_, false) => Default::default(),
    };
    let seat = |seat: Seat, script: ScriptedPlayer| -> Box<dyn Player> {
        match seat {
            Seat::Human => Box::new(TerminalUIPlayer::new()),
            Seat::Script => Box::new(script),
        }
    };
    Ok((seat(args.white, white_script), seat(args.black, black_script)))
}

fn draw_board(board: &Mailbox) {
    println!("{board}");
    println!();
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let (white, black) = match seat_players(&args) {
        Ok(players) => players,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let config = GameConfig {
        detect_stalemate: !args.no_stalemate,
    };
    info!(?args, "starting game");
    let mut backend = Backend::new(white, black, config);

    draw_board(backend.game().board());
    loop {
        match backend.play_half_move() {
            Ok(Some(report)) => {
                if report.played.is_some() {
                    draw_board(backend.game().board());
                }
                if report.game_end.is_some() {
                    break;
                }
                if report.check.any() {
                    println!("Check");
                }
            }
            Ok(None) => break,
            // the player has already been told
            Err(_) => {}
        }
    }

    match backend.game().outcome() {
        Some(end) => println!("{end}"),
        None => println!("Game abandoned"),
    }
    ExitCode::SUCCESS
}
