//! Program preprocessing: comment stripping and bracket matching.
//!
//! Every character outside `><+-.,[]` is a comment and is dropped before any
//! index is computed, so positions reported here (and instruction pointers
//! everywhere else) refer to the cleaned program, not the raw source.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{BracketKind, InterpreterError};

/// One of the eight tape instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Right,
    Left,
    Increment,
    Decrement,
    Output,
    Input,
    LoopStart,
    LoopEnd,
}

impl Instruction {
    /// Decode a source character; anything else is a comment.
    pub fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            '>' => Instruction::Right,
            '<' => Instruction::Left,
            '+' => Instruction::Increment,
            '-' => Instruction::Decrement,
            '.' => Instruction::Output,
            ',' => Instruction::Input,
            '[' => Instruction::LoopStart,
            ']' => Instruction::LoopEnd,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Instruction::Right => '>',
            Instruction::Left => '<',
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::Output => '.',
            Instruction::Input => ',',
            Instruction::LoopStart => '[',
            Instruction::LoopEnd => ']',
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for Instruction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.as_char())
    }
}

/// Keep only instruction characters.
pub fn strip_comments(source: &str) -> String {
    source
        .chars()
        .filter(|&c| Instruction::from_char(c).is_some())
        .collect()
}

/// Bidirectional bracket map over cleaned positions.
///
/// `targets[i]` holds the matching index for a `[` or `]` at `i`; every other
/// position is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JumpTable {
    targets: Vec<Option<usize>>,
}

impl JumpTable {
    /// Position of the bracket matching the one at `ip`.
    pub fn target(&self, ip: usize) -> Option<usize> {
        self.targets.get(ip).copied().flatten()
    }

    /// Every `(open, close)` pair, ordered by the opener.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.targets
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.filter(|&j| j > i).map(|j| (i, j)))
    }

    pub fn len(&self) -> usize {
        self.pairs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().next().is_none()
    }
}

/// A cleaned program together with its jump table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    jumps: JumpTable,
}

impl Program {
    /// Strip comments and match brackets.
    ///
    /// Fails with [`InterpreterError::UnmatchedBracket`] on the first `]` that
    /// has no opener, or, after the scan, on the earliest `[` left open. No
    /// partial table escapes on failure.
    pub fn parse(source: &str) -> Result<Self, InterpreterError> {
        let instructions: Vec<Instruction> =
            source.chars().filter_map(Instruction::from_char).collect();

        let mut targets: Vec<Option<usize>> = vec![None; instructions.len()];
        let mut stack: Vec<usize> = Vec::new();
        for (i, &instr) in instructions.iter().enumerate() {
            match instr {
                Instruction::LoopStart => stack.push(i),
                Instruction::LoopEnd => {
                    let Some(open) = stack.pop() else {
                        return Err(InterpreterError::UnmatchedBracket {
                            kind: BracketKind::Close,
                            position: i,
                        });
                    };
                    targets[open] = Some(i);
                    targets[i] = Some(open);
                }
                _ => {}
            }
        }

        // The bottom of the stack is the earliest opener still pending.
        if let Some(&open) = stack.first() {
            return Err(InterpreterError::UnmatchedBracket {
                kind: BracketKind::Open,
                position: open,
            });
        }

        log::debug!(
            "preprocessed {} instructions, {} loop(s)",
            instructions.len(),
            targets.iter().flatten().count() / 2
        );

        Ok(Self {
            instructions,
            jumps: JumpTable { targets },
        })
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn get(&self, ip: usize) -> Option<Instruction> {
        self.instructions.get(ip).copied()
    }

    pub fn jumps(&self) -> &JumpTable {
        &self.jumps
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instr in &self.instructions {
            write!(f, "{instr}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_are_dropped_before_indexing() {
        let program = Program::parse("a+b [c-d] e").unwrap();
        assert_eq!(program.to_string(), "+[-]");
        assert_eq!(program.jumps().target(1), Some(3));
        assert_eq!(program.jumps().target(3), Some(1));
    }

    #[test]
    fn jump_table_is_an_involution() {
        let program = Program::parse("++[>+[->++<]<-]>>[[]]").unwrap();
        assert_eq!(program.jumps().len(), 4);
        for (i, instr) in program.instructions().iter().enumerate() {
            match instr {
                Instruction::LoopStart | Instruction::LoopEnd => {
                    let j = program.jumps().target(i).expect("bracket has a match");
                    assert_eq!(program.jumps().target(j), Some(i));
                }
                _ => assert_eq!(program.jumps().target(i), None),
            }
        }
    }

    #[test]
    fn nested_pairs_match_innermost_first() {
        let program = Program::parse("[[]]").unwrap();
        let pairs: Vec<_> = program.jumps().pairs().collect();
        assert_eq!(pairs, vec![(0, 3), (1, 2)]);
    }

    #[test]
    fn unmatched_close_reports_cleaned_position() {
        // The comment characters must not shift the reported index.
        let err = Program::parse("xx+ yy]").unwrap_err();
        assert!(matches!(
            err,
            InterpreterError::UnmatchedBracket { kind: BracketKind::Close, position: 1 }
        ));
        assert_eq!(err.to_string(), "Unmatched ] at position 1");
    }

    #[test]
    fn unmatched_open_reports_earliest_opener() {
        let err = Program::parse("+[[+]").unwrap_err();
        assert!(matches!(
            err,
            InterpreterError::UnmatchedBracket { kind: BracketKind::Open, position: 1 }
        ));
        assert_eq!(err.to_string(), "Unmatched [ at position 1");
    }

    #[test]
    fn strip_comments_keeps_only_instructions() {
        assert_eq!(strip_comments("hello, world!\n[-]"), ",[-]");
    }

    #[test]
    fn empty_source_is_an_empty_program() {
        let program = Program::parse("just words").unwrap();
        assert!(program.is_empty());
        assert!(program.jumps().is_empty());
    }
}
