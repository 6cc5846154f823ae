//! Text rendering of the tape and an animated, step-driven execution view.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crossterm::{cursor, terminal, QueueableCommand};
use nu_ansi_term::Style;

use crate::config::{Colors, DEFAULT_VISIBLE_CELLS};
use crate::error::InterpreterError;
use crate::interpreter::{Interpreter, StepOutcome, StepRecord};
use crate::program::{Instruction, Program};
use crate::theme;

const CELL_WIDTH: usize = 5;
const CODE_WINDOW: usize = 60;
const HEAT_MAP_COLUMNS: usize = 20;
const HEAT_MAP_ROWS: usize = 10;

/// How an animation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationEnd {
    Completed { output: String },
    Failed { error: InterpreterError, output: String },
    Interrupted { output: String },
}

pub struct Visualizer {
    colors: Colors,
    visible_cells: usize,
    color: bool,
    clear_screen: bool,
}

impl Visualizer {
    pub fn new(colors: Colors, visible_cells: usize) -> Self {
        Self {
            colors,
            visible_cells: visible_cells.max(1),
            color: true,
            clear_screen: true,
        }
    }

    /// No ANSI styling and no screen clearing; used for pipes and tests.
    pub fn plain() -> Self {
        Self {
            colors: Colors::default(),
            visible_cells: DEFAULT_VISIBLE_CELLS,
            color: false,
            clear_screen: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.color {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Boxed window of `visible_cells` cells starting at `start`: values,
    /// printable ASCII, indices, and a marker under `pointer`.
    pub fn render_memory(&self, memory: &[u8], pointer: usize, start: usize) -> String {
        let c = &self.colors;
        let width = self.visible_cells * (CELL_WIDTH + 1);
        let border = Style::new().fg(c.border);

        let mut values = String::from("│");
        let mut ascii = String::from("│");
        let mut indices = String::from("│");
        let mut marker = String::from(" ");

        for i in start..start + self.visible_cells {
            let value = memory.get(i).copied().unwrap_or(0);
            let cell_style = Style::new().fg(if value == 0 { c.cell_zero } else { c.cell_nonzero });
            values.push_str(&self.paint(cell_style, &format!("{value:>4}")));
            values.push('│');

            let ch = if (32..=126).contains(&value) { char::from(value) } else { '.' };
            ascii.push_str(&self.paint(Style::new().fg(c.ascii), &format!("{ch:>4}")));
            ascii.push('│');

            indices.push_str(&self.paint(Style::new().fg(c.index).dimmed(), &format!("{i:>4}")));
            indices.push('│');

            if i == pointer {
                marker.push_str(&" ".repeat(CELL_WIDTH / 2));
                marker.push_str(&self.paint(Style::new().fg(c.pointer), "▲"));
                marker.push_str(&" ".repeat(CELL_WIDTH.div_ceil(2)));
            } else {
                marker.push_str(&" ".repeat(CELL_WIDTH + 1));
            }
        }

        let rule = self.paint(border, &"─".repeat(width + 1));
        let divider = self.paint(border, &format!("├{}┤", "─".repeat(width - 1)));
        let non_zero = memory.iter().filter(|&&v| v != 0).count();

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.paint(theme::heading_style(), "Memory Visualization:"));
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{values}");
        let _ = writeln!(out, "{divider}");
        let _ = writeln!(out, "{ascii}");
        let _ = writeln!(out, "{divider}");
        let _ = writeln!(out, "{indices}");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{}", marker.trim_end());
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.paint(Style::new().fg(c.border), &format!("Non-zero cells: {non_zero}")));
        let _ = writeln!(out, "{}", self.paint(Style::new().fg(c.border), &format!("Pointer position: {pointer}")));
        out
    }

    /// The first 200 cells as shaded blocks, twenty to a row: `░` zero,
    /// `▒` control bytes, `▓` printable ASCII range, `█` values from 128.
    pub fn render_heat_map(&self, memory: &[u8]) -> String {
        let c = &self.colors;
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.paint(theme::heading_style(), "Memory Heat Map:"));
        let _ = writeln!(
            out,
            "{}",
            self.paint(Style::new().fg(c.border), "(Gray=0, Blue=Control, Green=ASCII, Red=Extended)")
        );

        let shown = &memory[..memory.len().min(HEAT_MAP_COLUMNS * HEAT_MAP_ROWS)];
        for row in shown.chunks(HEAT_MAP_COLUMNS) {
            let blocks: Vec<String> = row
                .iter()
                .map(|&value| {
                    let (color, glyph) = match value {
                        0 => (c.cell_zero, "░░░"),
                        1..=31 => (c.info, "▒▒▒"),
                        32..=127 => (c.success, "▓▓▓"),
                        _ => (c.error, "███"),
                    };
                    self.paint(Style::new().fg(color), glyph)
                })
                .collect();
            let _ = writeln!(out, "{}", blocks.join(" "));
        }
        out
    }

    /// Up to 60 instructions around `position`, the current one highlighted.
    pub fn render_code(&self, program: &Program, position: usize) -> String {
        let instructions = program.instructions();
        let start = position.saturating_sub(CODE_WINDOW / 2);
        let end = (start + CODE_WINDOW).min(instructions.len());

        let mut out = String::new();
        if start > 0 {
            out.push_str("...");
        }
        for (i, instr) in instructions.iter().enumerate().take(end).skip(start) {
            let text = instr.to_string();
            if i == position {
                let current = Style::new().on(self.colors.success).fg(nu_ansi_term::Color::Black);
                if self.color {
                    out.push_str(&current.paint(text).to_string());
                } else {
                    let _ = write!(out, "({text})");
                }
            } else {
                out.push_str(&self.paint(theme::instruction_style(*instr), &text));
            }
        }
        if end < instructions.len() {
            out.push_str("...");
        }
        out
    }

    /// Instruction counts and the most visited cells of a captured history.
    pub fn render_stats(&self, history: &[StepRecord]) -> String {
        let mut commands: BTreeMap<char, usize> = BTreeMap::new();
        let mut cells: BTreeMap<usize, usize> = BTreeMap::new();
        for record in history {
            *commands.entry(record.instruction.as_char()).or_default() += 1;
            *cells.entry(record.pointer).or_default() += 1;
        }

        let bar = |count: usize| "█".repeat((count / 10).min(50));
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.paint(theme::heading_style(), "Execution Statistics:"));
        let _ = writeln!(out, "Command usage:");
        for (cmd, count) in &commands {
            let _ = writeln!(out, "  {cmd}: {count:>6} {}", self.paint(Style::new().fg(self.colors.success), &bar(*count)));
        }

        let mut top: Vec<(usize, usize)> = cells.iter().map(|(&c, &n)| (c, n)).collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let _ = writeln!(out, "Most accessed cells:");
        for (cell, count) in top.iter().take(5) {
            let _ = writeln!(out, "  Cell {cell:>3}: {count:>6} {}", self.paint(Style::new().fg(self.colors.info), &bar(*count)));
        }

        let _ = writeln!(out, "Total steps: {}", history.len());
        let _ = writeln!(out, "Unique cells accessed: {}", cells.len());
        out
    }

    /// Every loop with its span, nesting, and a termination heuristic.
    pub fn render_loops(&self, program: &Program) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.paint(theme::heading_style(), "Loop Structure:"));

        let mut loops: Vec<(usize, usize, usize)> = Vec::new();
        for (open, close) in program.jumps().pairs() {
            let depth = loops.iter().filter(|&&(o, c, _)| o < open && close < c).count();
            loops.push((open, close, depth));
        }
        // Innermost loops close first.
        loops.sort_by_key(|&(_, close, _)| close);

        if loops.is_empty() {
            let _ = writeln!(out, "No loops found");
            return out;
        }

        let text = program.to_string();
        for (n, &(open, close, depth)) in loops.iter().enumerate() {
            let indent = "  ".repeat(depth);
            let body = &text[open..=close];
            let preview = if body.len() > 40 { format!("{}...", &body[..37]) } else { body.to_string() };
            let _ = writeln!(out, "{indent}Loop {}: [{open}-{close}]", n + 1);
            let _ = writeln!(out, "{indent}  {preview}");

            let mut shift = 0i64;
            let mut decrements = 0usize;
            for instr in &program.instructions()[open..=close] {
                match instr {
                    Instruction::Right => shift += 1,
                    Instruction::Left => shift -= 1,
                    Instruction::Decrement => decrements += 1,
                    _ => {}
                }
            }
            let verdict = if shift == 0 && decrements > 0 {
                self.paint(Style::new().fg(self.colors.success), "Balanced loop (likely terminates)")
            } else if shift != 0 {
                format!("{} ({shift:+})", self.paint(Style::new().fg(self.colors.ascii), "Pointer moves"))
            } else {
                self.paint(Style::new().fg(self.colors.error), "Potential infinite loop")
            };
            let _ = writeln!(out, "{indent}  {verdict}");
        }
        out
    }

    /// Step `code` to completion, drawing a frame per instruction.
    ///
    /// A zero `delay` skips drawing entirely. The interpreter's iteration
    /// ceiling applies; `stop` is polled before every step.
    pub fn animate<W: Write>(
        &self,
        out: &mut W,
        interpreter: &mut Interpreter,
        code: &str,
        delay: Duration,
        stop: &AtomicBool,
    ) -> io::Result<AnimationEnd> {
        let limit = interpreter.config().max_iterations;
        loop {
            if stop.load(Ordering::Relaxed) {
                log::debug!("animation interrupted after {} step(s)", interpreter.iterations());
                return Ok(AnimationEnd::Interrupted { output: interpreter.output().to_string() });
            }
            if interpreter.iterations() >= limit {
                return Ok(AnimationEnd::Failed {
                    error: InterpreterError::IterationLimit { limit },
                    output: interpreter.output().to_string(),
                });
            }

            let state = match interpreter.step(code) {
                Ok(StepOutcome::Stepped(state)) => state,
                Ok(StepOutcome::Done { output }) => return Ok(AnimationEnd::Completed { output }),
                Err(error) => {
                    return Ok(AnimationEnd::Failed { error, output: interpreter.output().to_string() });
                }
            };

            if delay.is_zero() {
                continue;
            }

            if self.clear_screen {
                out.queue(terminal::Clear(terminal::ClearType::All))?;
                out.queue(cursor::MoveTo(0, 0))?;
            }
            writeln!(out, "{}", self.paint(theme::heading_style(), "Brainfuck Execution Visualizer"))?;
            writeln!(out)?;
            if let Some(program) = interpreter.current_program() {
                writeln!(out, "Code:")?;
                writeln!(out, "{}", self.render_code(program, state.instruction_pointer))?;
            }
            writeln!(
                out,
                "Current instruction: {}",
                self.paint(theme::instruction_style(state.instruction), &state.instruction.to_string())
            )?;
            writeln!(out, "Position: {}", state.instruction_pointer)?;
            let pointer = interpreter.data_pointer();
            let start = pointer.saturating_sub(self.visible_cells / 2);
            write!(out, "{}", self.render_memory(interpreter.memory(), pointer, start))?;
            if !interpreter.output().is_empty() {
                writeln!(out, "Output so far: {}", interpreter.output())?;
            }
            out.flush()?;

            thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpreterConfig;

    #[test]
    fn memory_window_shows_values_ascii_and_marker() {
        let mut memory = vec![0u8; 30];
        memory[0] = 72;
        memory[1] = 7;
        let out = Visualizer::plain().render_memory(&memory, 1, 0);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Memory Visualization:");
        assert!(lines[2].starts_with("│  72│   7│   0│"));
        assert!(lines[4].starts_with("│   H│   .│   .│"));
        assert!(lines[6].starts_with("│   0│   1│   2│"));
        // One leading space, one 6-wide blank cell, then the marker two columns in.
        assert_eq!(lines[8], format!("{}▲", " ".repeat(1 + 6 + 2)));
        assert!(out.contains("Non-zero cells: 2"));
        assert!(out.contains("Pointer position: 1"));
    }

    #[test]
    fn window_past_the_tape_reads_as_zero() {
        let out = Visualizer::plain().render_memory(&[5, 5], 0, 0);
        assert!(out.lines().nth(6).unwrap().contains("  19│"));
        assert!(out.contains("Non-zero cells: 2"));
    }

    #[test]
    fn heat_map_shades_cells_by_value_class() {
        let mut memory = vec![0u8; 30_000];
        memory[1] = 10;
        memory[2] = b'A';
        memory[3] = 200;
        let out = Visualizer::plain().render_heat_map(&memory);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Memory Heat Map:");
        assert_eq!(lines[1], "(Gray=0, Blue=Control, Green=ASCII, Red=Extended)");
        assert!(lines[2].starts_with("░░░ ▒▒▒ ▓▓▓ ███ ░░░"));
        assert_eq!(lines[2].split(' ').count(), 20);
        // Ten rows of twenty cells cover the first 200 cells only.
        assert_eq!(lines.len(), 2 + 10);
    }

    #[test]
    fn heat_map_of_a_short_tape_ends_with_a_partial_row() {
        let out = Visualizer::plain().render_heat_map(&[0; 25]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "░░░ ░░░ ░░░ ░░░ ░░░");
    }

    #[test]
    fn code_window_marks_the_current_instruction() {
        let program = Program::parse("+[->+<]").unwrap();
        assert_eq!(Visualizer::plain().render_code(&program, 2), "+[(-)>+<]");
    }

    #[test]
    fn long_programs_are_elided() {
        let program = Program::parse(&"+".repeat(100)).unwrap();
        let out = Visualizer::plain().render_code(&program, 50);
        assert!(out.starts_with("..."));
        assert!(out.ends_with("..."));
    }

    #[test]
    fn loop_structure_flags_each_loop() {
        let program = Program::parse("+[->+<][>]+[+]").unwrap();
        let out = Visualizer::plain().render_loops(&program);
        assert!(out.contains("Loop 1: [1-6]"));
        assert!(out.contains("Balanced loop (likely terminates)"));
        assert!(out.contains("Pointer moves (+1)"));
        assert!(out.contains("Potential infinite loop"));
    }

    #[test]
    fn nested_loops_are_indented() {
        let program = Program::parse("[[-]]").unwrap();
        let out = Visualizer::plain().render_loops(&program);
        assert!(out.contains("  Loop 1: [1-3]"));
        assert!(out.contains("\nLoop 2: [0-4]"));
    }

    #[test]
    fn stats_count_instructions_and_cells() {
        let config = InterpreterConfig::default().with_debug_capture(true);
        let done = Interpreter::new(config).unwrap().execute("++>+").unwrap();
        let out = Visualizer::plain().render_stats(&done.history.unwrap());
        assert!(out.contains("  +:      3"));
        assert!(out.contains("Cell   0:      3"));
        assert!(out.contains("Total steps: 4"));
        assert!(out.contains("Unique cells accessed: 2"));
    }

    #[test]
    fn animation_draws_frames_and_completes() {
        let mut bf = Interpreter::default();
        let mut out = Vec::new();
        let stop = AtomicBool::new(false);
        let end = Visualizer::plain()
            .animate(&mut out, &mut bf, "+.", Duration::from_millis(1), &stop)
            .unwrap();
        assert_eq!(end, AnimationEnd::Completed { output: "\u{1}".to_string() });
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Brainfuck Execution Visualizer").count(), 2);
        assert!(text.contains("Current instruction: ."));
    }

    #[test]
    fn zero_delay_runs_without_frames() {
        let mut bf = Interpreter::default();
        let mut out = Vec::new();
        let stop = AtomicBool::new(false);
        let end = Visualizer::plain()
            .animate(&mut out, &mut bf, "+++", Duration::ZERO, &stop)
            .unwrap();
        assert!(matches!(end, AnimationEnd::Completed { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn stop_flag_interrupts_before_the_next_step() {
        let mut bf = Interpreter::default();
        let stop = AtomicBool::new(true);
        let end = Visualizer::plain()
            .animate(&mut io::sink(), &mut bf, "+[]", Duration::ZERO, &stop)
            .unwrap();
        assert_eq!(end, AnimationEnd::Interrupted { output: String::new() });
        assert_eq!(bf.iterations(), 0);
    }

    #[test]
    fn animation_honours_the_iteration_ceiling() {
        let config = InterpreterConfig::default().with_max_iterations(10);
        let mut bf = Interpreter::new(config).unwrap();
        let stop = AtomicBool::new(false);
        let end = Visualizer::plain()
            .animate(&mut io::sink(), &mut bf, "+[]", Duration::ZERO, &stop)
            .unwrap();
        assert!(matches!(end, AnimationEnd::Failed { error: InterpreterError::IterationLimit { limit: 10 }, .. }));
    }

    #[test]
    fn animation_reports_bounds_errors() {
        let mut bf = Interpreter::default();
        let stop = AtomicBool::new(false);
        let end = Visualizer::plain()
            .animate(&mut io::sink(), &mut bf, "+.<", Duration::ZERO, &stop)
            .unwrap();
        assert_eq!(
            end,
            AnimationEnd::Failed { error: InterpreterError::MemoryUnderflow { ip: 2 }, output: "\u{1}".to_string() }
        );
    }
}
