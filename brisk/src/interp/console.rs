//! Console capability used by `print`, `inputi` and `inputs`.
//!
//! Output can be directed to different destinations:
//! - Native: stdout/stdin ([`StdConsole`])
//! - Tests and embedders: in-memory buffers ([`BufferConsole`])

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Line-oriented I/O for a running program
pub trait Console {
    /// Write one line of output
    fn output(&mut self, line: &str);

    /// Read one line of input, without its line terminator.
    /// `None` once input is exhausted.
    fn get_input(&mut self) -> Option<String>;
}

/// Console backed by the process's stdout and stdin
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn output(&mut self, line: &str) {
        let mut stdout = io::stdout().lock();
        // A closed stdout gives the program nowhere to report to
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.flush();
    }

    fn get_input(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let trimmed = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(trimmed);
                Some(line)
            }
        }
    }
}

/// Console that captures output and serves queued input lines
#[derive(Debug, Clone, Default)]
pub struct BufferConsole {
    lines: Vec<String>,
    input: VecDeque<String>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Console whose input is the given lines, in order
    pub fn with_input<I, S>(input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BufferConsole {
            lines: Vec::new(),
            input: input.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push_input(&mut self, line: impl Into<String>) {
        self.input.push_back(line.into());
    }

    /// Everything written so far, one entry per line
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Console for BufferConsole {
    fn output(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn get_input(&mut self) -> Option<String> {
        self.input.pop_front()
    }
}
