//! Interactive step debugger.
//!
//! Commands are read from a [`CommandSource`]: a `reedline` editor when stdin
//! is a TTY, or plain lines otherwise (pipes, tests).

use std::io::{self, BufRead, IsTerminal, Write};

use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

use crate::error::InterpreterError;
use crate::interpreter::{Interpreter, StepOutcome};

/// Cells shown by the `m` command.
pub const MEMORY_VIEW_CELLS: usize = 30;

/// Where debugger commands come from.
pub trait CommandSource {
    /// Next command line, or `None` once the user is gone.
    fn next_command(&mut self) -> io::Result<Option<String>>;
}

/// Reads one command per line from any buffered reader.
pub struct LineSource<R> {
    reader: R,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> CommandSource for LineSource<R> {
    fn next_command(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        match self.reader.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }
}

/// Interactive prompt with history.
pub struct EditorSource {
    editor: Reedline,
    prompt: DefaultPrompt,
}

impl EditorSource {
    pub fn new() -> Self {
        Self {
            editor: Reedline::create(),
            prompt: DefaultPrompt::new(
                DefaultPromptSegment::Basic("debug".to_string()),
                DefaultPromptSegment::Empty,
            ),
        }
    }
}

impl Default for EditorSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandSource for EditorSource {
    fn next_command(&mut self) -> io::Result<Option<String>> {
        match self.editor.read_line(&self.prompt)? {
            Signal::Success(line) => Ok(Some(line)),
            Signal::CtrlC | Signal::CtrlD => Ok(None),
        }
    }
}

/// Editor on a TTY, plain lines otherwise.
pub fn default_source() -> Box<dyn CommandSource> {
    if io::stdin().is_terminal() {
        Box::new(EditorSource::new())
    } else {
        Box::new(LineSource::new(io::BufReader::new(io::stdin())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Next,
    Memory,
    Skip,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "" | "n" | "next" => Some(Command::Next),
            "m" | "memory" => Some(Command::Memory),
            "s" | "skip" => Some(Command::Skip),
            "q" | "quit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// How a debugging session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugEnd {
    Finished { output: String },
    Quit,
    Failed(InterpreterError),
}

pub struct Debugger<'a> {
    interpreter: &'a mut Interpreter,
    code: &'a str,
    step: usize,
}

impl<'a> Debugger<'a> {
    pub fn new(interpreter: &'a mut Interpreter, code: &'a str) -> Self {
        interpreter.reset();
        Self { interpreter, code, step: 0 }
    }

    /// Drive the session until the program ends or the user quits. An
    /// exhausted command source counts as quitting.
    pub fn run<S, W>(&mut self, source: &mut S, out: &mut W) -> io::Result<DebugEnd>
    where
        S: CommandSource + ?Sized,
        W: Write,
    {
        writeln!(out, "Starting debugger... Use commands: n (next), m (memory), s (skip to end), q (quit)")?;
        let mut skipping = false;

        loop {
            let limit = self.interpreter.config().max_iterations;
            if self.interpreter.iterations() >= limit {
                return self.fail(out, InterpreterError::IterationLimit { limit });
            }

            let state = match self.interpreter.step(self.code) {
                Ok(StepOutcome::Stepped(state)) => state,
                Ok(StepOutcome::Done { output }) => {
                    writeln!(out, "Program finished")?;
                    writeln!(out, "Output: {output}")?;
                    return Ok(DebugEnd::Finished { output });
                }
                Err(error) => return self.fail(out, error),
            };

            let n = self.step;
            self.step += 1;
            if skipping {
                continue;
            }
            writeln!(out, "Step {n}: {} at position {}", state.instruction, state.instruction_pointer)?;
            writeln!(out, "Memory[{}] = {}", state.pointer, state.value)?;

            loop {
                write!(out, "> ")?;
                out.flush()?;
                let Some(line) = source.next_command()? else {
                    writeln!(out)?;
                    return Ok(DebugEnd::Quit);
                };
                match Command::parse(&line) {
                    Some(Command::Next) => break,
                    Some(Command::Memory) => {
                        writeln!(out, "Memory snapshot:")?;
                        writeln!(out, "{:?}", self.interpreter.memory_snapshot(0, MEMORY_VIEW_CELLS))?;
                    }
                    Some(Command::Skip) => {
                        skipping = true;
                        break;
                    }
                    Some(Command::Quit) => {
                        writeln!(out, "Debugging stopped")?;
                        return Ok(DebugEnd::Quit);
                    }
                    None => writeln!(out, "Unknown command '{}'. Use n, m, s or q", line.trim())?,
                }
            }
        }
    }

    fn fail<W: Write>(&self, out: &mut W, error: InterpreterError) -> io::Result<DebugEnd> {
        writeln!(out, "Error: {error}")?;
        if !self.interpreter.output().is_empty() {
            writeln!(out, "Partial output: {}", self.interpreter.output())?;
        }
        Ok(DebugEnd::Failed(error))
    }
}
