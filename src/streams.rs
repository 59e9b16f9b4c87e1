//! Injectable input and output streams.
//!
//! Every byte the shell and its commands read or write goes through a
//! [`Streams`] value, so tests and embedders can swap the process streams
//! for scripted input and in-memory buffers.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use console::{Term, style};

/// Result of one blocking read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line, without its trailing newline
    Line(String),
    /// The user pressed Ctrl-C
    Interrupted,
    /// End of input (Ctrl-D or a closed pipe)
    Eof,
}

/// A source of input lines.
pub trait LineSource {
    fn read_line(&mut self) -> io::Result<ReadOutcome>;
}

/// Reads from the terminal when attached to one, otherwise from buffered stdin.
#[derive(Debug)]
pub struct TermInput {
    term: Term,
}

impl TermInput {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for TermInput {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for TermInput {
    fn read_line(&mut self) -> io::Result<ReadOutcome> {
        if self.term.is_term() {
            return match self.term.read_line() {
                Ok(line) => Ok(ReadOutcome::Line(line)),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(ReadOutcome::Interrupted),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(ReadOutcome::Eof),
                Err(e) => Err(e),
            };
        }

        let mut buf = String::new();
        match io::stdin().lock().read_line(&mut buf) {
            Ok(0) => Ok(ReadOutcome::Eof),
            Ok(_) => {
                let line = buf.trim_end_matches(['\r', '\n']).to_string();
                Ok(ReadOutcome::Line(line))
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(ReadOutcome::Interrupted),
            Err(e) => Err(e),
        }
    }
}

/// Replays a fixed list of read outcomes, then reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    queue: VecDeque<ReadOutcome>,
}

impl ScriptedInput {
    pub fn new(outcomes: impl IntoIterator<Item = ReadOutcome>) -> Self {
        Self {
            queue: outcomes.into_iter().collect(),
        }
    }

    /// Convenience for a script made only of lines.
    pub fn lines<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self::new(lines.into_iter().map(|l| ReadOutcome::Line(l.into())))
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self) -> io::Result<ReadOutcome> {
        Ok(self.queue.pop_front().unwrap_or(ReadOutcome::Eof))
    }
}

/// A cloneable in-memory sink; every clone writes into the same buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Input source plus output and error sinks.
pub struct Streams {
    input: Box<dyn LineSource>,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    /// Whether `out` is an interactive terminal (enables screen clearing)
    tty: bool,
    /// Whether progress drawn on the process stderr would reach a terminal
    err_tty: bool,
}

impl Streams {
    pub fn new(input: Box<dyn LineSource>, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            input,
            out,
            err,
            tty: false,
            err_tty: false,
        }
    }

    /// The process standard streams.
    pub fn stdio() -> Self {
        Self {
            input: Box::new(TermInput::new()),
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
            tty: Term::stdout().is_term(),
            err_tty: Term::stderr().is_term(),
        }
    }

    /// No input and both sinks discarded. Stands in while the real streams are lent out.
    pub fn detached() -> Self {
        Self::new(
            Box::new(ScriptedInput::default()),
            Box::new(io::sink()),
            Box::new(io::sink()),
        )
    }

    /// Scripted input with both sinks captured in one buffer.
    pub fn capture(input: ScriptedInput) -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let streams = Self::new(
            Box::new(input),
            Box::new(buffer.clone()),
            Box::new(buffer.clone()),
        );
        (streams, buffer)
    }

    pub fn is_tty(&self) -> bool {
        self.tty
    }

    pub fn is_err_tty(&self) -> bool {
        self.err_tty
    }

    /// Block for one line of input.
    pub fn read_line(&mut self) -> io::Result<ReadOutcome> {
        self.input.read_line()
    }

    /// Print a prompt without a newline, then read a line.
    pub fn ask(&mut self, prompt: &str) -> io::Result<ReadOutcome> {
        self.write(prompt)?;
        self.read_line()
    }

    /// Write text to the output sink as is.
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    /// Write a line to the output sink.
    pub fn output(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }

    /// Write a green informational line to the error sink.
    pub fn info(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.err, "{}", style(text).for_stderr().green())?;
        self.err.flush()
    }

    /// Write a yellow warning line to the error sink.
    pub fn warning(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.err, "{}", style(text).for_stderr().yellow())?;
        self.err.flush()
    }

    /// Write an unstyled line to the error sink.
    pub fn error_line(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.err, "{}", text)?;
        self.err.flush()
    }

    /// Clear the screen when writing to a terminal.
    pub fn clear(&mut self) -> io::Result<()> {
        if self.tty {
            self.out.write_all(b"\x1b[2J\x1b[3J\x1b[1;1H")?;
            self.out.flush()?;
        }
        Ok(())
    }
}
