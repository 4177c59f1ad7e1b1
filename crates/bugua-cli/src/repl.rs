//! Line input for the interactive commands.

use anyhow::Result;
use colored::Colorize;
use rustyline::Context;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};

pub const CMD_EXIT: &str = "/exit";
pub const CMD_NEW: &str = "/new";
pub const CMD_HISTORY: &str = "/history";
pub const CMD_HELP: &str = "/help";

/// rustyline helper completing and hinting the chat slash commands.
#[derive(Clone)]
struct BuguaHelper {
    commands: Vec<&'static str>,
}

impl BuguaHelper {
    fn new() -> Self {
        Self {
            commands: vec![CMD_EXIT, CMD_NEW, CMD_HISTORY, CMD_HELP],
        }
    }
}

impl Helper for BuguaHelper {}

impl Completer for BuguaHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for BuguaHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for BuguaHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        self.commands
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for BuguaHelper {}

/// Reads trimmed lines; `None` means the player pressed Ctrl-C or Ctrl-D.
pub struct Prompter {
    editor: Editor<BuguaHelper, DefaultHistory>,
}

impl Prompter {
    pub fn new() -> Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(BuguaHelper::new()));
        Ok(Self { editor })
    }

    pub fn read(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim().to_string();
                if !trimmed.is_empty() {
                    let _ = self.editor.add_history_entry(trimmed.as_str());
                }
                Ok(Some(trimmed))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
