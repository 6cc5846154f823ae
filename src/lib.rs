//! A learning-oriented Brainfuck interpreter library.
//!
//! The interpreter operates on a bounded tape of wrapping 8-bit cells
//! (30,000 by default) with a single data pointer.
//!
//! Features and behaviors:
//! - Characters outside `><+-.,[]` are comments and are stripped before
//!   brackets are matched; reported positions refer to the cleaned program.
//! - Strict pointer bounds: moving left of cell 0 or past the last cell ends
//!   the run with an error, keeping the output produced so far.
//! - Input `,` reads from a byte buffer given up front; once exhausted the
//!   current cell is set to 0.
//! - A configurable iteration ceiling stops runaway loops.
//! - Programs run to completion with [`Interpreter::execute`] or one
//!   instruction at a time with [`Interpreter::step`].
//!
//! Quick start:
//!
//! ```
//! use bf::Interpreter;
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let done = Interpreter::default().execute(code).expect("program should run");
//! assert_eq!(done.output, "Hello World!\n");
//! ```

pub mod catalog;
pub mod cli_util;
pub mod config;
pub mod debugger;
pub mod error;
pub mod generator;
pub mod grader;
pub mod interpreter;
pub mod program;
pub mod theme;
pub mod visualizer;

pub use config::{InterpreterConfig, Settings};
pub use error::{BracketKind, ConfigError, ErrorCategory, ExecutionFailure, InterpreterError};
pub use generator::{Generator, GeneratorOptions};
pub use grader::{compare_programs, grade, GradeFailure, TestCase, Verdict};
pub use interpreter::{
    Completion, ExecutionResult, ExecutionSummary, Interpreter, StepOutcome, StepRecord, StepState,
};
pub use program::{strip_comments, Instruction, JumpTable, Program};
