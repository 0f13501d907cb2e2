//! Line-oriented input prompts

use std::io::{self, BufRead, Write};

/// Reads answers from `input` after writing a label to `output`
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Trimmed answer, or `None` once input is exhausted
    pub fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask until a positive integer is given
    pub fn ask_positive(&mut self, label: &str) -> io::Result<Option<i64>> {
        loop {
            let Some(answer) = self.ask(label)? else {
                return Ok(None);
            };
            match answer.parse::<i64>() {
                Ok(n) if n > 0 => return Ok(Some(n)),
                Ok(_) => writeln!(self.output, "Quantity must be a positive number.")?,
                Err(_) => writeln!(
                    self.output,
                    "Invalid input. Please enter a number for quantity."
                )?,
            }
        }
    }
}
