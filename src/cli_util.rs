use std::env;
use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Style;

use crate::config::Colors;
use crate::error::{ErrorCategory, ExecutionFailure, InterpreterError};
use crate::interpreter::StepRecord;
use crate::program::{strip_comments, Instruction, Program};

/// Styling is used only when stdout is a terminal and `NO_COLOR` is unset.
pub fn color_enabled() -> bool {
    io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none()
}

/// Paint `text` with `style` when `enabled`.
pub fn paint(enabled: bool, style: Style, text: &str) -> String {
    if enabled {
        style.paint(text).to_string()
    } else {
        text.to_string()
    }
}

/// Pretty-print an interpreter error with caret positioning into the cleaned
/// program. If `program` is `Some("bf")`, messages are prefixed with "bf: ...".
pub fn print_interpreter_error(program: Option<&str>, source: &str, err: &InterpreterError, colors: &Colors) {
    let kind = match err.category() {
        ErrorCategory::Syntax => "Syntax error",
        ErrorCategory::Bounds => "Runtime error",
        ErrorCategory::ResourceLimit => "Execution aborted",
        ErrorCategory::Internal => "Internal error",
    };
    let mut msg = format!("{} {kind}: {err}", paint(io::stderr().is_terminal(), Style::new().fg(colors.error).bold(), "✗"));
    if let Some(p) = program {
        msg = format!("{p}: {msg}");
    }

    match (err.category(), err.position()) {
        // Syntax messages already name the position.
        (ErrorCategory::Syntax, Some(pos)) => {
            eprintln!("{msg}");
            print_context(&strip_comments(source), pos);
        }
        (_, Some(pos)) => print_error_with_context(&msg, &strip_comments(source), pos),
        (_, None) => {
            eprintln!("{msg}");
            let _ = io::stderr().flush();
        }
    }
}

/// Error report for a failed run, then any partial output on stdout.
pub fn print_failure(program: Option<&str>, source: &str, failure: &ExecutionFailure, colors: &Colors) {
    print_interpreter_error(program, source, &failure.error, colors);
    if !failure.output.is_empty() {
        println!("{} {}", paint(color_enabled(), Style::new().fg(colors.ascii), "Partial output:"), failure.output);
        let _ = io::stdout().flush();
    }
}

/// Print a concise error with instruction index and a caret context window,
/// working with UTF-8 by slicing using char indices.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    eprintln!("{prefix} at instruction {pos}");
    print_context(code, pos);
}

fn print_context(code: &str, pos: usize) {
    let (slice, underline) = context_window(code, pos);
    eprintln!("  {slice}");
    eprintln!("  {underline}");
    let _ = io::stderr().flush();
}

/// A short window of `code` around `pos` and a caret line under it.
fn context_window(code: &str, pos: usize) -> (&str, String) {
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);

    let mut underline = " ".repeat(pos.saturating_sub(start_char));
    underline.push('^');
    (&code[start_byte..end_byte], underline)
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// Step-by-step table of a captured history.
///
/// Records hold the state before each instruction, so effects are derived
/// from the pre-state and the jump table.
pub fn trace_table(program: &Program, history: &[StepRecord]) -> String {
    let mut out = String::new();
    out.push_str("STEP | IP  | PTR | CELL | INSTR | ACTION\n");
    out.push_str("-----+-----+-----+------+-------+------------------------------------------------\n");

    for (step, record) in history.iter().enumerate() {
        let StepRecord { instruction, pointer, value, instruction_pointer: ip } = *record;
        let target = program.jumps().target(ip).unwrap_or(ip);
        let action = match instruction {
            Instruction::Right => format!("Moved pointer head to index {}", pointer + 1),
            Instruction::Left => format!("Moved pointer head to index {}", pointer.saturating_sub(1)),
            Instruction::Increment => {
                format!("Increment cell[{pointer}] from {value} to {}", value.wrapping_add(1))
            }
            Instruction::Decrement => {
                format!("Decrement cell[{pointer}] from {value} to {}", value.wrapping_sub(1))
            }
            Instruction::Output => format!("Output byte {value} ({:?})", char::from(value)),
            Instruction::Input => format!("Read input byte into cell[{pointer}]"),
            Instruction::LoopStart if value == 0 => {
                format!("Cell is 0; jump forward to matching ']' at IP {target}")
            }
            Instruction::LoopStart => "Cell != 0; enter loop".to_string(),
            Instruction::LoopEnd if value != 0 => {
                format!("Cell != 0; jump back to matching '[' at IP {target}")
            }
            Instruction::LoopEnd => "Cell is 0; exit loop".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
            step, ip, pointer, value, instruction, action
        );
    }
    out
}
