//! A player for a human typing in the terminal

use std::io::{self, BufRead, Cursor, Write};

use board::{Color, Directive};
use mailbox::{Error, Mailbox};
use tracing::warn;

const RETRY: &str = "Illegal move, try again";

/// Somewhere typed lines come from
///
/// Stdin is only locked for the length of one read, so two players can share it.
pub trait LineSource {
    /// Append the next line to `buf`, returning how many bytes were read
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl LineSource for io::Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        io::Stdin::read_line(self, buf)
    }
}

impl<T: AsRef<[u8]>> LineSource for Cursor<T> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// An input for a human typing in the terminal
///
/// Each line read is one directive, with any whitespace in it ignored. Lines that don't parse
/// are answered with a retry message and the prompt comes back.
pub struct TerminalUIPlayer<R = io::Stdin, W = io::Stdout> {
    input: R,
    output: W,
}

impl TerminalUIPlayer {
    /// Create a new player reading from stdin and prompting on stdout
    pub fn new() -> Self {
        Self::with_io(io::stdin(), io::stdout())
    }
}

impl<R: LineSource, W: Write> TerminalUIPlayer<R, W> {
    pub fn with_io(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// The next line of input, or `None` once there isn't any
    fn read_line(&mut self, side: Color) -> Option<String> {
        let _ = write!(self.output, "{side}'s move: ");
        let _ = self.output.flush();
        let mut buffer = String::new();
        match self.input.read_line(&mut buffer) {
            Ok(0) => None,
            Ok(_) => Some(buffer),
            Err(err) => {
                warn!(%err, "failed to read a move");
                None
            }
        }
    }

    fn retry(&mut self) {
        let _ = writeln!(self.output, "{RETRY}");
    }
}

impl Default for TerminalUIPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: LineSource, W: Write> players::Player for TerminalUIPlayer<R, W> {
    fn choose(&mut self, side: Color, _board: &Mailbox) -> Option<Directive> {
        loop {
            let line = self.read_line(side)?;
            match line.parse::<Directive>() {
                Ok(directive) => return Some(directive),
                Err(_) => self.retry(),
            }
        }
    }

    fn rejected(&mut self, _err: &Error) {
        self.retry();
    }
}
