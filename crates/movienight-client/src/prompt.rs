//! Yes/no confirmation.

use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::ClientResult;

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> ClientResult<bool>;
}

/// Interactive prompt, defaulting to "no".
///
/// Falls back to reading one line from stdin when either end is not a
/// terminal, so `echo y | movienight` works.
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> ClientResult<bool> {
        if io::stdin().is_terminal() && io::stderr().is_terminal() {
            return Ok(dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()?);
        }

        let mut stderr = io::stderr();
        write!(stderr, "{} (y/n): ", prompt)?;
        stderr.flush()?;
        read_answer(&mut io::stdin().lock())
    }
}

/// Reads one line; only `y` or `Y` is yes. End of input is no.
pub fn read_answer<R: BufRead>(reader: &mut R) -> ClientResult<bool> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

/// Answers every question with a fixed value (`--yes`, tests).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, _prompt: &str) -> ClientResult<bool> {
        Ok(self.0)
    }
}
