//! Numbered-menu prompts on a line-oriented terminal.
//!
//! Generic over reader and writer so menus can be driven from a byte buffer.

use crate::error::{Result, SetupError};
use std::fmt::Display;
use std::io::{BufRead, Write};

const INVALID_CHOICE: &str = "Invalid choice. Pick the number.";

/// Interactive selector.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Show `question` with a 1-based list of `options` and return the chosen one.
    ///
    /// Re-prompts until a line parses as a number in `1..=options.len()`.
    /// There is no timeout; closed input is reported as [`SetupError::Cancelled`].
    pub fn ask<T: Display + Clone>(&mut self, question: &str, options: &[T]) -> Result<T> {
        if options.is_empty() {
            return Err(SetupError::validation(format!(
                "menu '{}' has no options",
                question
            )));
        }

        writeln!(self.output)?;
        writeln!(self.output, "{}", question)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, option)?;
        }

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let line = self.read_line()?;
            if let Some(index) = parse_choice(&line, options.len()) {
                return Ok(options[index].clone());
            }
            writeln!(self.output, "{}", INVALID_CHOICE)?;
        }
    }

    /// Print `message` and wait for the user to press ENTER.
    pub fn confirm(&mut self, message: &str) -> Result<()> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        self.read_line().map(|_| ())
    }

    /// Write one line of plain text to the terminal.
    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Next input line. Bytes that are not UTF-8 are replaced, so a garbled
    /// line is rejected like any other bad answer.
    fn read_line(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Err(SetupError::Cancelled);
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Give back the reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

/// Zero-based index for a 1-based menu answer, if it is valid.
///
/// Only plain decimal digits are accepted; signs and other characters are rejected.
pub fn parse_choice(input: &str, option_count: usize) -> Option<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let choice: usize = trimmed.parse().ok()?;
    (1..=option_count).contains(&choice).then(|| choice - 1)
}
