//! # Console Prompt
//!
//! The session talks to the customer only through [`Prompt`]. The binary
//! wires it to stdin/stdout; tests feed it scripted input.

use std::io::{self, BufRead, Write};

/// Line-oriented conversation with the customer.
pub trait Prompt {
    /// Shows `text` followed by a newline.
    fn show(&mut self, text: &str) -> io::Result<()>;

    /// Reads one line without its terminator; `None` once input is closed.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// [`Prompt`] over any reader/writer pair.
///
/// ## Example
/// ```rust
/// use std::io::Cursor;
/// use till_checkout::console::{ConsolePrompt, Prompt};
///
/// let mut prompt = ConsolePrompt::new(Cursor::new("[cola-2]\n"), Vec::new());
/// prompt.show("What would you like?").unwrap();
/// assert_eq!(prompt.read_line().unwrap().as_deref(), Some("[cola-2]"));
/// assert_eq!(prompt.read_line().unwrap(), None);
/// ```
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsolePrompt { input, output }
    }

    /// Everything written so far.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn show(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
