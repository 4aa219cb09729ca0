//! Bounded input acquisition.
//!
//! Interactive callers read values through a [`Prompter`], which re-asks on
//! invalid input at most `max_attempts` times. Running out of attempts, or
//! reaching end of input, is a [`RecordError::Cancelled`] so nothing invalid
//! ever reaches the operations layer.

use crate::error::{RecordError, Result};
use crate::validation::ValidationError;
use std::io::{BufRead, Write};

pub struct Prompter<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    max_attempts: u32,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W, max_attempts: u32) -> Self {
        Self {
            reader,
            writer,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Ask until `validate` accepts the answer or the attempts run out.
    pub fn ask<T>(
        &mut self,
        prompt: &str,
        validate: impl Fn(&str) -> std::result::Result<T, ValidationError>,
    ) -> Result<T> {
        for attempt in 1..=self.max_attempts {
            let line = self.read_line(prompt)?;
            match validate(&line) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    let left = self.max_attempts - attempt;
                    writeln!(self.writer, "Invalid input: {} ({} attempts left)", e, left)?;
                }
            }
        }
        Err(RecordError::Cancelled(format!(
            "no valid input after {} attempts",
            self.max_attempts
        )))
    }

    /// Numbered menu; returns the index of the chosen option.
    pub fn choose(&mut self, prompt: &str, options: &[&str]) -> Result<usize> {
        for (i, option) in options.iter().enumerate() {
            writeln!(self.writer, "  {}. {}", i + 1, option)?;
        }
        let count = options.len();
        self.ask(prompt, |s| match s.trim().parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
            _ => Err(ValidationError::InvalidChoice(s.trim().to_string())),
        })
    }

    /// Yes/no question; anything but `y`/`yes` is a no.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let line = self.read_line(prompt)?;
        Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(RecordError::Cancelled("end of input".to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
