//! The tape interpreter.
//!
//! An [`Interpreter`] owns its memory tape, both pointers, the input cursor and
//! the output accumulated so far. Two entry points share one step primitive:
//!
//! - [`Interpreter::execute`] resets, preprocesses and runs a program to
//!   completion (or to the first fatal error, keeping partial output).
//! - [`Interpreter::step`] advances one instruction per call, preprocessing
//!   lazily on the first call; debuggers and animators drive it.
//!
//! ```
//! use bf::{Interpreter, InterpreterConfig};
//!
//! let mut bf = Interpreter::new(InterpreterConfig::default()).unwrap();
//! let done = bf.execute("++++++++[>++++++++<-]>+.").unwrap();
//! assert_eq!(done.output, "A");
//! ```

use serde::Serialize;

use crate::config::InterpreterConfig;
use crate::error::{ConfigError, ExecutionFailure, InterpreterError};
use crate::program::{Instruction, Program};

/// Number of leading cells captured in [`Completion::final_memory`].
pub const FINAL_MEMORY_CELLS: usize = 100;

/// Machine state observed just before an instruction executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub instruction: Instruction,
    pub pointer: usize,
    pub value: u8,
    pub instruction_pointer: usize,
}

/// What one call to [`Interpreter::step`] observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepState {
    pub instruction: Instruction,
    pub pointer: usize,
    pub value: u8,
    pub instruction_pointer: usize,
    /// Output produced before this instruction ran.
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum StepOutcome {
    Stepped(StepState),
    Done { output: String },
}

impl StepOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, StepOutcome::Done { .. })
    }
}

/// A successful `execute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub output: String,
    pub iterations: usize,
    /// First [`FINAL_MEMORY_CELLS`] cells; only with debug capture.
    pub final_memory: Option<Vec<u8>>,
    /// Every executed instruction in order; only with debug capture.
    pub history: Option<Vec<StepRecord>>,
}

pub type ExecutionResult = Result<Completion, ExecutionFailure>;

/// Flat, serializable view of an [`ExecutionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSummary {
    pub success: bool,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub iterations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_memory: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<StepRecord>>,
}

impl From<&ExecutionResult> for ExecutionSummary {
    fn from(result: &ExecutionResult) -> Self {
        match result {
            Ok(done) => Self {
                success: true,
                output: done.output.clone(),
                error: None,
                iterations: done.iterations,
                final_memory: done.final_memory.clone(),
                history: done.history.clone(),
            },
            Err(failure) => Self {
                success: false,
                output: failure.output.clone(),
                error: Some(failure.to_string()),
                iterations: failure.iterations,
                final_memory: None,
                history: None,
            },
        }
    }
}

/// Where a `step` session stands.
#[derive(Debug, Clone)]
enum Session {
    NotStarted,
    Running(Program),
    Done,
}

/// Tape, pointers, input cursor, output and iteration counter.
#[derive(Debug, Clone)]
struct Machine {
    memory: Vec<u8>,
    pointer: usize,
    ip: usize,
    input_cursor: usize,
    output: String,
    iterations: usize,
}

impl Machine {
    fn new(memory_size: usize) -> Self {
        Self {
            memory: vec![0; memory_size],
            pointer: 0,
            ip: 0,
            input_cursor: 0,
            output: String::new(),
            iterations: 0,
        }
    }

    fn reset(&mut self) {
        self.memory.fill(0);
        self.pointer = 0;
        self.ip = 0;
        self.input_cursor = 0;
        self.output.clear();
        self.iterations = 0;
    }

    /// Execute the instruction at `ip`. `Ok(None)` once `ip` is past the end.
    fn step(&mut self, program: &Program, input: &[u8]) -> Result<Option<StepRecord>, InterpreterError> {
        let Some(instr) = program.get(self.ip) else {
            return Ok(None);
        };
        let record = StepRecord {
            instruction: instr,
            pointer: self.pointer,
            value: self.memory[self.pointer],
            instruction_pointer: self.ip,
        };

        match instr {
            Instruction::Right => {
                if self.pointer + 1 >= self.memory.len() {
                    return Err(InterpreterError::MemoryOverflow { ip: self.ip, pointer: self.pointer });
                }
                self.pointer += 1;
            }
            Instruction::Left => {
                if self.pointer == 0 {
                    return Err(InterpreterError::MemoryUnderflow { ip: self.ip });
                }
                self.pointer -= 1;
            }
            Instruction::Increment => {
                self.memory[self.pointer] = self.memory[self.pointer].wrapping_add(1);
            }
            Instruction::Decrement => {
                self.memory[self.pointer] = self.memory[self.pointer].wrapping_sub(1);
            }
            Instruction::Output => {
                self.output.push(char::from(self.memory[self.pointer]));
            }
            Instruction::Input => {
                // Exhausted input reads as 0 and leaves the cursor where it is.
                self.memory[self.pointer] = match input.get(self.input_cursor) {
                    Some(&b) => {
                        self.input_cursor += 1;
                        b
                    }
                    None => 0,
                };
            }
            Instruction::LoopStart => {
                if self.memory[self.pointer] == 0 {
                    self.ip = self.jump_target(program)?;
                }
            }
            Instruction::LoopEnd => {
                if self.memory[self.pointer] != 0 {
                    self.ip = self.jump_target(program)?;
                }
            }
        }

        // Jumps land on the matching bracket; this advance moves past it.
        self.ip += 1;
        self.iterations += 1;
        log::trace!(
            "ip={} instr={} ptr={} cell={}",
            record.instruction_pointer,
            record.instruction,
            self.pointer,
            self.memory[self.pointer]
        );
        Ok(Some(record))
    }

    fn jump_target(&self, program: &Program) -> Result<usize, InterpreterError> {
        program
            .jumps()
            .target(self.ip)
            .ok_or(InterpreterError::BrokenJump { ip: self.ip })
    }
}

/// A single-tape interpreter instance.
///
/// Instances share nothing; run one per concurrent program.
#[derive(Debug, Clone)]
pub struct Interpreter {
    config: InterpreterConfig,
    machine: Machine,
    history: Vec<StepRecord>,
    session: Session,
}

impl Default for Interpreter {
    fn default() -> Self {
        let config = InterpreterConfig::default();
        Self {
            machine: Machine::new(config.memory_size),
            config,
            history: Vec::new(),
            session: Session::NotStarted,
        }
    }
}

impl Interpreter {
    /// Create an interpreter with a zeroed tape of `config.memory_size` cells.
    pub fn new(config: InterpreterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            machine: Machine::new(config.memory_size),
            config,
            history: Vec::new(),
            session: Session::NotStarted,
        })
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Zero the tape, rewind pointers and input, clear output, counters,
    /// history, and any `step` session.
    pub fn reset(&mut self) {
        self.machine.reset();
        self.history.clear();
        self.session = Session::NotStarted;
    }

    /// Run `source` to completion.
    ///
    /// Always starts from a reset state. On failure the returned
    /// [`ExecutionFailure`] carries the output produced before the error; the
    /// tape stays as the failing instruction left it and can be inspected.
    pub fn execute(&mut self, source: &str) -> ExecutionResult {
        self.reset();

        let program = match Program::parse(source) {
            Ok(program) => program,
            Err(error) => return Err(self.failure(error)),
        };

        let limit = self.config.max_iterations;
        loop {
            if self.machine.ip >= program.len() {
                break;
            }
            if self.machine.iterations >= limit {
                return Err(self.failure(InterpreterError::IterationLimit { limit }));
            }
            match self.machine.step(&program, &self.config.input) {
                Ok(Some(record)) => {
                    if self.config.debug_capture {
                        self.history.push(record);
                    }
                }
                Ok(None) => break,
                Err(error) => return Err(self.failure(error)),
            }
        }

        log::debug!(
            "program finished after {} instruction(s), {} character(s) of output",
            self.machine.iterations,
            self.machine.output.chars().count()
        );

        let (final_memory, history) = if self.config.debug_capture {
            (
                Some(self.memory_snapshot(0, FINAL_MEMORY_CELLS)),
                Some(self.history.clone()),
            )
        } else {
            (None, None)
        };

        Ok(Completion {
            output: self.machine.output.clone(),
            iterations: self.machine.iterations,
            final_memory,
            history,
        })
    }

    /// Execute one instruction of `source`.
    ///
    /// The first call after construction or [`reset`](Self::reset) resets the
    /// tape and preprocesses `source`; later calls keep running that program
    /// and ignore the argument. Once the program has finished (or failed)
    /// every call returns [`StepOutcome::Done`] until the next reset. The
    /// iteration ceiling is not applied here; the caller decides when to stop.
    pub fn step(&mut self, source: &str) -> Result<StepOutcome, InterpreterError> {
        if matches!(self.session, Session::NotStarted) {
            self.reset();
            self.session = Session::Running(Program::parse(source)?);
        }

        let Session::Running(program) = &self.session else {
            return Ok(StepOutcome::Done { output: self.machine.output.clone() });
        };

        let output = self.machine.output.clone();
        match self.machine.step(program, &self.config.input) {
            Ok(Some(record)) => Ok(StepOutcome::Stepped(StepState {
                instruction: record.instruction,
                pointer: record.pointer,
                value: record.value,
                instruction_pointer: record.instruction_pointer,
                output,
            })),
            Ok(None) => {
                self.session = Session::Done;
                Ok(StepOutcome::Done { output: self.machine.output.clone() })
            }
            Err(error) => {
                log::warn!("step failed: {error}");
                self.session = Session::Done;
                Err(error)
            }
        }
    }

    /// Copy of `len` cells starting at `start`, clamped to the tape.
    pub fn memory_snapshot(&self, start: usize, len: usize) -> Vec<u8> {
        let memory = &self.machine.memory;
        let start = start.min(memory.len());
        let end = start.saturating_add(len).min(memory.len());
        memory[start..end].to_vec()
    }

    pub fn memory(&self) -> &[u8] {
        &self.machine.memory
    }

    pub fn data_pointer(&self) -> usize {
        self.machine.pointer
    }

    pub fn instruction_pointer(&self) -> usize {
        self.machine.ip
    }

    pub fn output(&self) -> &str {
        &self.machine.output
    }

    pub fn iterations(&self) -> usize {
        self.machine.iterations
    }

    /// The cleaned program of the running `step` session, if one is active.
    pub fn current_program(&self) -> Option<&Program> {
        match &self.session {
            Session::Running(program) => Some(program),
            _ => None,
        }
    }

    fn failure(&self, error: InterpreterError) -> ExecutionFailure {
        log::warn!("execution failed: {error}");
        ExecutionFailure {
            error,
            output: self.machine.output.clone(),
            iterations: self.machine.iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BracketKind, ErrorCategory};

    fn interpreter(memory_size: usize) -> Interpreter {
        Interpreter::new(InterpreterConfig::default().with_memory_size(memory_size)).unwrap()
    }

    fn with_input(input: &[u8]) -> Interpreter {
        Interpreter::new(InterpreterConfig::default().with_input(input)).unwrap()
    }

    #[test]
    fn increments_accumulate() {
        let mut bf = interpreter(10);
        bf.execute("+++").unwrap();
        assert_eq!(bf.memory_snapshot(0, 1), vec![3]);
    }

    #[test]
    fn clear_loop_zeroes_the_cell() {
        let mut bf = interpreter(10);
        bf.execute("+++++[-]").unwrap();
        assert_eq!(bf.memory_snapshot(0, 1), vec![0]);
    }

    #[test]
    fn multiplication_loop_prints_a() {
        let mut bf = Interpreter::default();
        let done = bf.execute("++++++++[>++++++++<-]>+.").unwrap();
        assert_eq!(done.output, "A");
    }

    #[test]
    fn hello_world() {
        let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
        let done = Interpreter::default().execute(code).unwrap();
        assert_eq!(done.output, "Hello World!\n");
    }

    #[test]
    fn cat_stops_at_nul() {
        let mut bf = with_input(b"test\0");
        let done = bf.execute(",[.,]").unwrap();
        assert_eq!(done.output, "test");
    }

    #[test]
    fn latin1_text_survives_a_cat_round_trip() {
        let config = InterpreterConfig::default().with_text_input("café ÿ");
        let done = Interpreter::new(config).unwrap().execute(",[.,]").unwrap();
        assert_eq!(done.output, "café ÿ");
    }

    #[test]
    fn exhausted_input_reads_zero() {
        let mut bf = with_input(b"A");
        bf.execute(",>,>+,").unwrap();
        assert_eq!(bf.memory_snapshot(0, 3), vec![65, 0, 0]);
    }

    #[test]
    fn unmatched_open_bracket_fails_before_running() {
        let mut bf = interpreter(10);
        let failure = bf.execute("[+").unwrap_err();
        assert!(matches!(
            failure.error,
            InterpreterError::UnmatchedBracket { kind: BracketKind::Open, position: 0 }
        ));
        assert_eq!(failure.error.category(), ErrorCategory::Syntax);
        assert!(failure.output.is_empty());
        assert_eq!(failure.iterations, 0);
    }

    #[test]
    fn unmatched_close_bracket_names_its_position() {
        let failure = interpreter(10).execute("+.]").unwrap_err();
        assert_eq!(failure.to_string(), "Unmatched ] at position 2");
        assert!(failure.output.is_empty());
    }

    #[test]
    fn left_pointer_out_of_bounds_errors() {
        let failure = interpreter(10).execute("<").unwrap_err();
        assert!(matches!(failure.error, InterpreterError::MemoryUnderflow { ip: 0 }));
        assert_eq!(failure.to_string(), "Memory underflow");
        assert!(failure.output.is_empty());
    }

    #[test]
    fn right_pointer_out_of_bounds_errors() {
        // With 3 cells (0..=2), the 3rd '>' attempts to move beyond index 2.
        let memory_size = 3;
        let mut bf = interpreter(memory_size);
        let failure = bf.execute(&">".repeat(memory_size)).unwrap_err();
        assert!(matches!(failure.error, InterpreterError::MemoryOverflow { ip: 2, pointer: 2 }));
        assert_eq!(failure.error.category(), ErrorCategory::Bounds);
        assert_eq!(bf.data_pointer(), 2);
    }

    #[test]
    fn bounds_error_keeps_partial_output() {
        let failure = interpreter(10).execute("+++++++++++++++++++++++++++++++++.<").unwrap_err();
        assert_eq!(failure.output, "!");
    }

    #[test]
    fn iteration_ceiling_keeps_partial_output() {
        let config = InterpreterConfig::default().with_max_iterations(50);
        let mut bf = Interpreter::new(config).unwrap();
        let failure = bf.execute("+++++++++++++++++++++++++++++++++.+[]").unwrap_err();
        assert_eq!(failure.error, InterpreterError::IterationLimit { limit: 50 });
        assert_eq!(failure.to_string(), "Maximum iterations (50) exceeded");
        assert_eq!(failure.output, "!");
        assert_eq!(failure.iterations, 50);
    }

    #[test]
    fn ceiling_admits_exactly_max_iterations() {
        let config = InterpreterConfig::default().with_max_iterations(3);
        let mut bf = Interpreter::new(config).unwrap();
        assert_eq!(bf.execute("+++").unwrap().iterations, 3);
        assert!(bf.execute("++++").is_err());
    }

    #[test]
    fn empty_loop_on_zero_cell_is_skipped() {
        let done = interpreter(10).execute("[]").unwrap();
        assert_eq!(done.iterations, 1);
    }

    #[test]
    fn skipped_loop_lands_after_matching_bracket() {
        // '[' jumps to index 4 (']'), the advance moves to 5 ('+').
        let mut bf = interpreter(10);
        let done = bf.execute("[+++]+").unwrap();
        assert_eq!(done.iterations, 2);
        assert_eq!(bf.memory_snapshot(0, 1), vec![1]);
    }

    #[test]
    fn wrapping_subtraction() {
        let mut bf = interpreter(1);
        bf.execute("-").unwrap();
        assert_eq!(bf.memory_snapshot(0, 1), vec![255]);
    }

    #[test]
    fn wrapping_addition() {
        let mut bf = interpreter(1);
        bf.execute(&"+".repeat(256)).unwrap();
        assert_eq!(bf.memory_snapshot(0, 1), vec![0]);
    }

    #[test]
    fn comments_do_not_count_as_iterations() {
        let done = interpreter(10).execute("add two: ++ done").unwrap();
        assert_eq!(done.iterations, 2);
    }

    #[test]
    fn debug_capture_records_history_and_memory() {
        let config = InterpreterConfig::default().with_debug_capture(true);
        let mut bf = Interpreter::new(config).unwrap();
        let done = bf.execute("+>++").unwrap();

        let memory = done.final_memory.expect("captured");
        assert_eq!(memory.len(), FINAL_MEMORY_CELLS);
        assert_eq!(&memory[..3], &[1, 2, 0]);

        let history = done.history.expect("captured");
        assert_eq!(history.len(), 4);
        assert_eq!(
            history[1],
            StepRecord { instruction: Instruction::Right, pointer: 0, value: 1, instruction_pointer: 1 }
        );
        assert_eq!(history[3].value, 1);
    }

    #[test]
    fn no_capture_without_debug() {
        let done = Interpreter::default().execute("+").unwrap();
        assert!(done.final_memory.is_none());
        assert!(done.history.is_none());
    }

    #[test]
    fn final_memory_is_clamped_to_small_tapes() {
        let config = InterpreterConfig::default().with_memory_size(4).with_debug_capture(true);
        let done = Interpreter::new(config).unwrap().execute("+").unwrap();
        assert_eq!(done.final_memory, Some(vec![1, 0, 0, 0]));
    }

    #[test]
    fn repeated_execution_is_idempotent() {
        let mut bf = with_input(b"hi");
        let first = bf.execute(",>,[<+>-]<.").unwrap();
        let first_memory = bf.memory_snapshot(0, 10);
        bf.reset();
        let second = bf.execute(",>,[<+>-]<.").unwrap();
        assert_eq!(first, second);
        assert_eq!(first_memory, bf.memory_snapshot(0, 10));
    }

    #[test]
    fn step_walks_the_program_then_reports_done() {
        let mut bf = interpreter(10);
        let first = bf.step("+.").unwrap();
        assert_eq!(
            first,
            StepOutcome::Stepped(StepState {
                instruction: Instruction::Increment,
                pointer: 0,
                value: 0,
                instruction_pointer: 0,
                output: String::new(),
            })
        );
        let StepOutcome::Stepped(second) = bf.step("+.").unwrap() else {
            panic!("expected a second step");
        };
        assert_eq!(second.instruction, Instruction::Output);
        assert_eq!(second.value, 1);
        assert_eq!(bf.step("+.").unwrap(), StepOutcome::Done { output: "\u{1}".to_string() });
        assert!(bf.step("+.").unwrap().is_done());
    }

    #[test]
    fn step_preprocesses_only_once() {
        let mut bf = interpreter(10);
        bf.step("++").unwrap();
        // The argument is ignored once a session is running.
        bf.step("[").unwrap();
        assert!(bf.step("").unwrap().is_done());
        assert_eq!(bf.memory_snapshot(0, 1), vec![2]);
    }

    #[test]
    fn step_surfaces_syntax_errors() {
        let mut bf = interpreter(10);
        let err = bf.step("]").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Syntax);
        assert!(bf.current_program().is_none());
    }

    #[test]
    fn step_reports_bounds_errors_then_finishes() {
        let mut bf = interpreter(10);
        let err = bf.step("<+").unwrap_err();
        assert_eq!(err, InterpreterError::MemoryUnderflow { ip: 0 });
        assert!(bf.step("<+").unwrap().is_done());
    }

    #[test]
    fn reset_starts_a_new_step_session() {
        let mut bf = interpreter(10);
        while !bf.step("+++").unwrap().is_done() {}
        bf.reset();
        assert_eq!(bf.memory_snapshot(0, 1), vec![0]);
        bf.step(">").unwrap();
        assert_eq!(bf.data_pointer(), 1);
    }

    #[test]
    fn step_and_execute_agree() {
        let code = "++[->+++<]>.";
        let mut stepped = interpreter(10);
        while !stepped.step(code).unwrap().is_done() {}
        let mut executed = interpreter(10);
        let done = executed.execute(code).unwrap();
        assert_eq!(stepped.output(), done.output);
        assert_eq!(stepped.iterations(), done.iterations);
        assert_eq!(stepped.memory_snapshot(0, 4), executed.memory_snapshot(0, 4));
    }

    #[test]
    fn snapshot_is_clamped() {
        let bf = interpreter(5);
        assert_eq!(bf.memory_snapshot(3, 10).len(), 2);
        assert!(bf.memory_snapshot(10, 3).is_empty());
        assert_eq!(bf.memory_snapshot(0, usize::MAX).len(), 5);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(Interpreter::new(InterpreterConfig::default().with_memory_size(0)).is_err());
    }

    #[test]
    fn step_outcome_serializes_with_a_status_tag() {
        let mut bf = interpreter(10);
        let json = serde_json::to_value(bf.step("+.").unwrap()).unwrap();
        assert_eq!(json["status"], "stepped");
        assert_eq!(json["instruction"], "+");
        assert_eq!(json["instructionPointer"], 0);
        assert_eq!(json["value"], 0);
        assert_eq!(json["output"], "");

        bf.step("+.").unwrap();
        let json = serde_json::to_value(bf.step("+.").unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "done", "output": "\u{1}" }));
    }

    #[test]
    fn summary_serializes_like_the_external_interface() {
        let config = InterpreterConfig::default().with_debug_capture(true).with_memory_size(2);
        let result = Interpreter::new(config).unwrap().execute("+.");
        let json = serde_json::to_value(ExecutionSummary::from(&result)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["iterations"], 2);
        assert_eq!(json["finalMemory"], serde_json::json!([1, 0]));
        assert_eq!(json["history"][1]["instruction"], ".");
        assert_eq!(json["history"][1]["instructionPointer"], 1);
        assert!(json.get("error").is_none());

        let failed = Interpreter::default().execute("<");
        let json = serde_json::to_value(ExecutionSummary::from(&failed)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Memory underflow");
    }
}
