use std::fmt;

/// Errors that end a run. None of them is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpreterError {
    /// Loops were not balanced; `position` is an index into the cleaned program.
    #[error("Unmatched {kind} at position {position}")]
    UnmatchedBracket { kind: BracketKind, position: usize },

    /// `>` would move the data pointer past the last cell.
    #[error("Memory overflow")]
    MemoryOverflow { ip: usize, pointer: usize },

    /// `<` would move the data pointer left of cell 0.
    #[error("Memory underflow")]
    MemoryUnderflow { ip: usize },

    /// Execution ran more instructions than the configured ceiling.
    #[error("Maximum iterations ({limit}) exceeded")]
    IterationLimit { limit: usize },

    /// A bracket without a jump target. Unreachable once preprocessing succeeded.
    #[error("Malformed jump table: no match for bracket at position {ip}")]
    BrokenJump { ip: usize },
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "["),
            BracketKind::Close => write!(f, "]"),
        }
    }
}

/// Coarse classification used by callers that only care about the failure family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Bounds,
    ResourceLimit,
    Internal,
}

impl InterpreterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            InterpreterError::UnmatchedBracket { .. } => ErrorCategory::Syntax,
            InterpreterError::MemoryOverflow { .. } | InterpreterError::MemoryUnderflow { .. } => {
                ErrorCategory::Bounds
            }
            InterpreterError::IterationLimit { .. } => ErrorCategory::ResourceLimit,
            InterpreterError::BrokenJump { .. } => ErrorCategory::Internal,
        }
    }

    /// Cleaned-program index the error points at, if it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            InterpreterError::UnmatchedBracket { position, .. } => Some(*position),
            InterpreterError::MemoryOverflow { ip, .. }
            | InterpreterError::MemoryUnderflow { ip }
            | InterpreterError::BrokenJump { ip } => Some(*ip),
            InterpreterError::IterationLimit { .. } => None,
        }
    }
}

/// A failed `execute`: the error plus everything produced before it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct ExecutionFailure {
    #[source]
    pub error: InterpreterError,
    pub output: String,
    pub iterations: usize,
}

/// Invalid configuration values, whether from code, the config file or the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("memory size must be at least 1 cell")]
    ZeroMemory,

    #[error("maximum iterations must be at least 1")]
    ZeroIterations,

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
