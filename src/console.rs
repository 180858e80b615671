//! Console port used for interactive prompts and out-of-band notices.
//!
//! Commands never read stdin directly: confirmation prompts, the pager and
//! interactive `cat` all go through [`Console`], so tests can script the
//! answers with [`ScriptedConsole`].

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

pub trait Console {
    /// Show `prompt` and read one line without its terminator.
    /// `Ok(None)` means end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Display text to the user (not captured by the pipeline).
    fn write(&mut self, text: &str);

    /// Display a non-fatal warning.
    fn warn(&mut self, text: &str);
}

/// [`Console`] bound to the process's stdin/stdout/stderr.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    fn write(&mut self, text: &str) {
        println!("{text}");
    }

    fn warn(&mut self, text: &str) {
        eprintln!("{text}");
    }
}

/// [`Console`] that replays canned input lines and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    /// Prompts shown, in order.
    pub prompts: Vec<String>,
    /// Text written with [`Console::write`], in order.
    pub written: Vec<String>,
    /// Warnings, in order.
    pub warnings: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: input.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Everything written, joined with newlines.
    pub fn output(&self) -> String {
        self.written.join("\n")
    }

    /// Input lines not yet consumed.
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.input.pop_front())
    }

    fn write(&mut self, text: &str) {
        self.written.push(text.to_string());
    }

    fn warn(&mut self, text: &str) {
        self.warnings.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_replays_then_ends() {
        let mut console = ScriptedConsole::new(["y", ""]);
        assert_eq!(console.read_line("? ").unwrap().as_deref(), Some("y"));
        assert_eq!(console.read_line("? ").unwrap().as_deref(), Some(""));
        assert_eq!(console.read_line("? ").unwrap(), None);
        assert_eq!(console.prompts.len(), 3);
    }

    #[test]
    fn scripted_records_output() {
        let mut console = ScriptedConsole::default();
        console.write("a");
        console.write("b");
        console.warn("careful");
        assert_eq!(console.output(), "a\nb");
        assert_eq!(console.warnings, vec!["careful"]);
    }
}
