use log::debug;

use super::{ArgumentContract, Call, CommandSpec, Requirement, display_name, io_failure};
use crate::console::Console;
use crate::error::{Result, ShellError, display_arg};
use crate::eval::CommandContext;
use crate::fs::EntryKind;

/// One keypress at the pager prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerKey {
    /// Enter: one more line.
    Line,
    /// Space: one more page.
    Page,
    /// `b`: back two pages, then one page.
    Back,
    /// `q`
    Quit,
}

impl PagerKey {
    pub fn parse(input: &str) -> Result<Self> {
        match input {
            "" => Ok(PagerKey::Line),
            " " => Ok(PagerKey::Page),
            "b" => Ok(PagerKey::Back),
            "q" => Ok(PagerKey::Quit),
            other => Err(ShellError::argument(format!(
                "more: unsupported input {}; use Enter, Space, b or q",
                display_arg(other)
            ))),
        }
    }
}

/// Paging state over a fixed set of lines.
///
/// `offset` is the number of lines already shown from the top. It only ever
/// moves within `0..=lines.len()`.
#[derive(Debug)]
pub struct Pager {
    lines: Vec<String>,
    offset: usize,
    page_size: usize,
}

impl Pager {
    pub fn new(lines: Vec<String>, page_size: usize) -> Self {
        Self {
            lines,
            offset: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_done(&self) -> bool {
        self.offset >= self.lines.len()
    }

    /// Share of the text shown so far, in percent.
    pub fn percent_shown(&self) -> f64 {
        if self.lines.is_empty() {
            return 100.0;
        }
        self.offset as f64 / self.lines.len() as f64 * 100.0
    }

    pub fn first_page(&mut self) -> &[String] {
        self.advance(self.page_size)
    }

    /// Apply a key. `None` means the user quit.
    pub fn apply(&mut self, key: PagerKey) -> Option<&[String]> {
        match key {
            PagerKey::Line => Some(self.advance(1)),
            PagerKey::Page => Some(self.advance(self.page_size)),
            PagerKey::Back => {
                self.offset = self.offset.saturating_sub(self.page_size * 2);
                Some(self.advance(self.page_size))
            }
            PagerKey::Quit => None,
        }
    }

    fn advance(&mut self, count: usize) -> &[String] {
        let start = self.offset;
        let end = (start + count).min(self.lines.len());
        self.offset = end;
        &self.lines[start..end]
    }
}

fn show(console: &mut dyn Console, lines: &[String]) {
    for line in lines {
        console.write(line);
    }
}

pub struct MoreSpec;

impl CommandSpec for MoreSpec {
    fn name(&self) -> &'static str {
        "more"
    }

    fn usage(&self) -> &'static str {
        "more [PATH]"
    }

    fn summary(&self) -> &'static str {
        "Page through a file or piped input. Enter: line, Space: page, b: back, q: quit."
    }

    fn contract(&self) -> ArgumentContract {
        ArgumentContract::uniform(0, Some(1), Requirement::MustBeSingleton)
    }

    fn run(&self, call: &Call, ctx: &mut CommandContext<'_>) -> Result<String> {
        let lines = match call.paths().first() {
            Some(path) => {
                if ctx.fs().stat(path) == EntryKind::Dir {
                    return Err(ShellError::execution(format!(
                        "more: {}: Is a directory",
                        display_name(path)
                    )));
                }
                ctx.fs()
                    .read_lines(path)
                    .map_err(|e| io_failure("more", "read", path, e))?
            }
            None => call
                .piped
                .as_deref()
                .unwrap_or_default()
                .lines()
                .map(String::from)
                .collect(),
        };
        debug!("more: {} line(s)", lines.len());

        let mut pager = Pager::new(lines, ctx.settings.page_size);
        show(&mut *ctx.console, pager.first_page());

        while !pager.is_done() {
            let prompt = format!(
                "Displayed {:.2}% of text, Space: next page, Enter: next line, b: previous page, q: exit : ",
                pager.percent_shown()
            );
            let input = ctx
                .console
                .read_line(&prompt)
                .map_err(|e| ShellError::execution(format!("more: cannot read input: {e}")))?;
            let Some(input) = input else {
                break;
            };
            match pager.apply(PagerKey::parse(&input)?) {
                Some(lines) => show(&mut *ctx.console, lines),
                None => break,
            }
        }
        Ok(String::new())
    }
}
