//! Validation mode: check a program against test cases, or compare two
//! programs' observable behavior.
//!
//! Every run gets its own [`Interpreter`], so test cases execute in parallel
//! without sharing any state.

use std::thread;

use crate::config::InterpreterConfig;
use crate::error::{ConfigError, ExecutionFailure};
use crate::interpreter::{ExecutionResult, Interpreter};
use crate::program::strip_comments;

/// Leading cells compared by [`compare_programs`].
pub const COMPARED_CELLS: usize = 10;

/// One input and the behavior expected for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCase {
    pub input: Vec<u8>,
    pub expected_output: Option<String>,
    /// Expected values of the leading cells; only that many are compared.
    pub expected_memory: Option<Vec<u8>>,
}

impl TestCase {
    pub fn output(input: impl Into<Vec<u8>>, expected: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: Some(expected.into()),
            expected_memory: None,
        }
    }

    pub fn memory(expected: impl Into<Vec<u8>>) -> Self {
        Self {
            input: Vec::new(),
            expected_output: None,
            expected_memory: Some(expected.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GradeFailure {
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionFailure),

    #[error("Output mismatch. Expected: {expected:?}, Got: {actual:?}")]
    OutputMismatch { expected: String, actual: String },

    #[error("Memory mismatch. Expected: {expected:?}, Got: {actual:?}")]
    MemoryMismatch { expected: Vec<u8>, actual: Vec<u8> },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Run `code` once per test case and report the first failing case, in
/// test order.
pub fn grade(code: &str, tests: &[TestCase], config: &InterpreterConfig) -> Result<(), GradeFailure> {
    config.validate()?;

    let results: Vec<Result<(), GradeFailure>> = thread::scope(|scope| {
        let handles: Vec<_> = tests
            .iter()
            .map(|test| scope.spawn(move || run_case(code, test, config)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    for (i, result) in results.into_iter().enumerate() {
        if let Err(failure) = result {
            log::debug!("test case {i} failed: {failure}");
            return Err(failure);
        }
    }
    Ok(())
}

fn run_case(code: &str, test: &TestCase, config: &InterpreterConfig) -> Result<(), GradeFailure> {
    let config = config.clone().with_input(test.input.clone());
    let mut interpreter = Interpreter::new(config)?;
    let done = interpreter.execute(code)?;

    if let Some(expected) = &test.expected_output {
        if &done.output != expected {
            return Err(GradeFailure::OutputMismatch {
                expected: expected.clone(),
                actual: done.output,
            });
        }
    }

    if let Some(expected) = &test.expected_memory {
        let actual = interpreter.memory_snapshot(0, expected.len());
        if &actual != expected {
            return Err(GradeFailure::MemoryMismatch {
                expected: expected.clone(),
                actual,
            });
        }
    }

    Ok(())
}

/// Both programs' results, side by side.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub attempt: ExecutionResult,
    pub reference: ExecutionResult,
    pub attempt_memory: Vec<u8>,
    pub reference_memory: Vec<u8>,
}

impl Verdict {
    /// Both succeeded with equal output and equal leading memory.
    pub fn matches(&self) -> bool {
        match (&self.attempt, &self.reference) {
            (Ok(a), Ok(r)) => a.output == r.output && self.attempt_memory == self.reference_memory,
            _ => false,
        }
    }
}

/// Run `attempt` and `reference` on independent interpreters.
pub fn compare_programs(
    attempt: &str,
    reference: &str,
    config: &InterpreterConfig,
) -> Result<Verdict, ConfigError> {
    let mut attempt_bf = Interpreter::new(config.clone())?;
    let mut reference_bf = Interpreter::new(config.clone())?;

    let attempt_result = attempt_bf.execute(&strip_comments(attempt));
    let reference_result = reference_bf.execute(&strip_comments(reference));

    Ok(Verdict {
        attempt: attempt_result,
        reference: reference_result,
        attempt_memory: attempt_bf.memory_snapshot(0, COMPARED_CELLS),
        reference_memory: reference_bf.memory_snapshot(0, COMPARED_CELLS),
    })
}
