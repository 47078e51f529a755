//! A player which replays a fixed list of directives

use std::collections::VecDeque;

use board::{Color, Directive, ParseDirectiveError};
use mailbox::{Error, Mailbox};
use tracing::debug;

/// A line of a script that isn't a directive
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    /// Counting from 1
    pub line: usize,
    pub source: ParseDirectiveError,
}

/// The lines of a script that hold directives, numbered from 1
///
/// Blank lines and lines starting with `#` are skipped.
fn script_lines(script: &str) -> impl Iterator<Item = Result<Directive, ScriptError>> + '_ {
    script
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            text.parse()
                .map_err(|source| ScriptError { line, source })
        })
}

/// A player which plays the directives it was given, in order
///
/// A script can't change its mind, so once one of its directives is refused, or it runs out, it
/// gives up the game.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPlayer {
    queue: VecDeque<Directive>,
    stopped: bool,
}

impl ScriptedPlayer {
    pub fn new(directives: impl IntoIterator<Item = Directive>) -> Self {
        Self {
            queue: directives.into_iter().collect(),
            stopped: false,
        }
    }

    /// Read a script holding one player's directives, one per line
    pub fn from_script(script: &str) -> Result<Self, ScriptError> {
        script_lines(script).collect::<Result<VecDeque<_>, _>>().map(Self::new)
    }

    /// Read a script of a whole game, which alternates between white and black
    ///
    /// Returns the white player first.
    pub fn pair_from_script(script: &str) -> Result<(Self, Self), ScriptError> {
        let mut white = Vec::new();
        let mut black = Vec::new();
        for (idx, directive) in script_lines(script).enumerate() {
            if idx % 2 == 0 {
                white.push(directive?);
            } else {
                black.push(directive?);
            }
        }
        Ok((Self::new(white), Self::new(black)))
    }

    /// How many directives haven't been played yet
    pub fn remaining(&self) -> usize {
        if self.stopped {
            0
        } else {
            self.queue.len()
        }
    }
}

impl players::Player for ScriptedPlayer {
    fn choose(&mut self, side: Color, _board: &Mailbox) -> Option<Directive> {
        if self.stopped {
            return None;
        }
        let directive = self.queue.pop_front();
        if directive.is_none() {
            debug!(%side, "script exhausted");
        }
        directive
    }

    fn rejected(&mut self, err: &Error) {
        debug!(%err, "scripted directive refused, stopping");
        self.stopped = true;
    }
}
