use std::io::{self, BufRead, Write};

use crate::error::Error;

/// Line-oriented conversation with the user.
///
/// Generic over its ends so that a session can be scripted from a byte
/// buffer instead of a terminal.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Console::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    /// Print `prompt` without a newline and read the answer, trimmed.
    pub fn ask(&mut self, prompt: &str) -> Result<String, Error> {
        write!(self.output, "{}", prompt).map_err(console_error)?;
        self.output.flush().map_err(console_error)?;

        let mut line = String::new();
        match self.input.read_line(&mut line).map_err(console_error)? {
            0 => Err(Error::EndOfInput),
            _ => Ok(line.trim().to_string()),
        }
    }

    pub fn say(&mut self, text: impl std::fmt::Display) -> Result<(), Error> {
        writeln!(self.output, "{}", text).map_err(console_error)
    }

    /// Keep a drag-and-drop console window open until ENTER is pressed.
    /// A closed input counts as ENTER.
    pub fn pause(&mut self, prompt: &str) -> Result<(), Error> {
        match self.ask(prompt) {
            Ok(_) | Err(Error::EndOfInput) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Raw access for output that is not line-oriented, like progress counters.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

pub(crate) fn console_error(e: io::Error) -> Error {
    Error::Io {
        path: "<console>".to_string(),
        reason: e.to_string(),
    }
}
