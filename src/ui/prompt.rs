use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::PromptError;

const RETRY_YES_NO: &str = "The information you introduced is incorrect. Enter yes or no";

// ---------------------------------------------------------------------------
// Prompter – line-oriented question / answer over any reader and writer
// ---------------------------------------------------------------------------

/// Asks questions on `output` and reads answers from `input`.
///
/// Answers outside the accepted set are never propagated: the prompt
/// repeats until a valid answer arrives or input closes.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Writer shared with the reports.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Ask `question`, re-asking with `retry` until the answer parses as `T`.
    pub fn choose<T: FromStr>(&mut self, question: &str, retry: &str) -> Result<T, PromptError> {
        let mut text = question;
        loop {
            writeln!(self.output, "{text}")?;
            self.output.flush()?;
            if let Ok(value) = self.read_answer()?.parse::<T>() {
                return Ok(value);
            }
            text = retry;
        }
    }

    /// Ask a yes / no question. Matching is case-insensitive.
    pub fn yes_no(&mut self, question: &str) -> Result<bool, PromptError> {
        self.choose::<YesNo>(question, RETRY_YES_NO)
            .map(|answer| answer == YesNo::Yes)
    }

    fn read_answer(&mut self) -> Result<String, PromptError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::InputClosed);
        }
        Ok(line.trim().to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YesNo {
    Yes,
    No,
}

impl FromStr for YesNo {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(YesNo::Yes),
            "no" => Ok(YesNo::No),
            _ => Err(()),
        }
    }
}
