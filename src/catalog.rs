//! Built-in example programs and graded exercises.

use std::fmt;
use std::iter;

use crate::grader::TestCase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Beginner => write!(f, "beginner"),
            Level::Intermediate => write!(f, "intermediate"),
            Level::Advanced => write!(f, "advanced"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub name: &'static str,
    pub level: Level,
    pub description: &'static str,
    pub code: &'static str,
    /// Input used when the caller does not supply one.
    pub sample_input: &'static str,
}

pub const EXAMPLES: &[Example] = &[
    Example {
        name: "hello-world",
        level: Level::Beginner,
        description: "Classic Hello World program",
        code: "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.",
        sample_input: "",
    },
    Example {
        name: "cat",
        level: Level::Beginner,
        description: "Echoes input until it runs out",
        code: ",[.,]",
        sample_input: "Hello!",
    },
    Example {
        name: "clear-cell",
        level: Level::Beginner,
        description: "Sets a cell to five, then clears it",
        code: "+++++[-]",
        sample_input: "",
    },
    Example {
        name: "move-right",
        level: Level::Beginner,
        description: "Moves a value two cells to the right",
        code: "+++[->>+<<]",
        sample_input: "",
    },
    Example {
        name: "add-inputs",
        level: Level::Intermediate,
        description: "Adds two input bytes and prints the sum",
        code: ",>,<[->+<]>.",
        sample_input: "!!",
    },
    Example {
        name: "copy-value",
        level: Level::Intermediate,
        description: "Copies cell 0 to cell 2 through a temporary cell",
        code: "+++++[->>+>+<<<]>>>[-<<<+>>>]",
        sample_input: "",
    },
    Example {
        name: "find-zero",
        level: Level::Intermediate,
        description: "Scans right to the first zero cell",
        code: "+>+>+>>+<<<<[>]",
        sample_input: "",
    },
    Example {
        name: "uppercase",
        level: Level::Advanced,
        description: "Converts lowercase input to uppercase",
        code: ",[--------------------------------.,]",
        sample_input: "hello",
    },
    Example {
        name: "countdown",
        level: Level::Advanced,
        description: "Counts down from 5 to 1",
        code: "+++++++[>+++++++<-]>++++>+++++[<.->-]",
        sample_input: "",
    },
];

pub fn find_example(name: &str) -> Option<&'static Example> {
    EXAMPLES.iter().find(|e| e.name.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Copy)]
struct TestSpec {
    input: &'static [u8],
    output: Option<&'static str>,
    memory: Option<&'static [u8]>,
}

const fn memory(expected: &'static [u8]) -> TestSpec {
    TestSpec { input: b"", output: None, memory: Some(expected) }
}

const fn output(input: &'static [u8], expected: &'static str) -> TestSpec {
    TestSpec { input, output: Some(expected), memory: None }
}

#[derive(Debug, Clone, Copy)]
pub struct Exercise {
    pub title: &'static str,
    pub description: &'static str,
    /// Code run before the learner's solution.
    pub setup: &'static str,
    tests: &'static [TestSpec],
    pub hint: &'static str,
    /// Reference solution, without the setup.
    pub solution: &'static str,
}

impl Exercise {
    pub fn test_cases(&self) -> Vec<TestCase> {
        self.tests
            .iter()
            .map(|t| TestCase {
                input: t.input.to_vec(),
                expected_output: t.output.map(str::to_string),
                expected_memory: t.memory.map(<[u8]>::to_vec),
            })
            .collect()
    }

    /// Setup followed by `solution`, as graded.
    pub fn full_program(&self, solution: &str) -> String {
        format!("{}{}", self.setup, solution)
    }
}

const BEGINNER: &[Exercise] = &[
    Exercise {
        title: "Set Cell Value",
        description: "Set the current cell to the value 10",
        setup: "",
        tests: &[memory(&[10])],
        hint: "Use the + command 10 times",
        solution: "++++++++++",
    },
    Exercise {
        title: "Clear Cell",
        description: "Clear a cell that contains the value 5",
        setup: "+++++",
        tests: &[memory(&[0])],
        hint: "Use a loop with the - command",
        solution: "[-]",
    },
    Exercise {
        title: "Move Value",
        description: "Move the value 3 from cell 0 to cell 1",
        setup: "+++",
        tests: &[memory(&[0, 3])],
        hint: "Decrement source while incrementing destination",
        solution: "[->+<]",
    },
    Exercise {
        title: "Output Character",
        description: "Output the letter \"A\" (ASCII 65)",
        setup: "",
        tests: &[output(b"", "A")],
        hint: "Set cell to 65 then use the . command",
        solution: "++++++++[>++++++++<-]>+.",
    },
    Exercise {
        title: "Simple Loop",
        description: "Output \"AAA\" (three A's)",
        setup: "",
        tests: &[output(b"", "AAA")],
        hint: "Set up the ASCII value, then use a counter loop",
        solution: "+++[>++++++++[>++++++++<-]>+.[-]<<-]",
    },
];

const INTERMEDIATE: &[Exercise] = &[
    Exercise {
        title: "Add Two Cells",
        description: "Add cell 0 (value 3) to cell 1 (value 5); the pointer starts on cell 1",
        setup: "+++>+++++",
        tests: &[memory(&[0, 8])],
        hint: "Move back and add the first cell to the second",
        solution: "<[->+<]",
    },
    Exercise {
        title: "Copy Value",
        description: "Copy the value 4 from cell 0 to cell 1 (preserve original)",
        setup: "++++",
        tests: &[memory(&[4, 4])],
        hint: "Use a temporary cell to preserve the original",
        solution: "[->+>+<<]>>[-<<+>>]",
    },
    Exercise {
        title: "Input Echo",
        description: "Read a character and output it twice",
        setup: "",
        tests: &[output(b"X", "XX"), output(b"z", "zz")],
        hint: "Read, output, output again",
        solution: ",..",
    },
    Exercise {
        title: "Multiplication",
        description: "Multiply cell 0 (3) by cell 1 (4) into cell 2, leaving cells 0 and 1 empty",
        setup: "+++>++++",
        tests: &[memory(&[0, 0, 12])],
        hint: "For each unit of cell 0, add cell 1 to cell 2 and restore cell 1 from a temporary",
        solution: "<[->[->+>+<<]>>[-<<+>>]<<<]>[-]",
    },
    Exercise {
        title: "Count to Five",
        description: "Output the digits 1 through 5",
        setup: "",
        tests: &[output(b"", "12345")],
        hint: "Build ASCII 49 ('1'), then print and increment five times",
        solution: "+++++[>++++++++++<-]>->+++++[<.+>-]",
    },
];

const ADVANCED: &[Exercise] = &[
    Exercise {
        title: "Reverse Input",
        description: "Read three characters and output them in reverse order",
        setup: "",
        tests: &[output(b"ABC", "CBA"), output(b"xyz", "zyx")],
        hint: "Store in different cells, then output backwards",
        solution: ",>,>,.<.<.",
    },
    Exercise {
        title: "Uppercase Converter",
        description: "Convert one lowercase letter to uppercase",
        setup: "",
        tests: &[output(b"a", "A"), output(b"q", "Q")],
        hint: "Subtract 32 from the ASCII value",
        solution: ",--------------------------------.",
    },
    Exercise {
        title: "Number Comparison",
        description: "Read two bytes and output \">\" if the first is greater, \"=\" if equal, \"<\" if less",
        setup: "",
        tests: &[output(&[5, 3], ">"), output(&[3, 3], "="), output(&[2, 5], "<"), output(&[9, 0], ">")],
        hint: "Decrement both while the second is non-zero; whatever is left over decides",
        solution: ",>,<[->>>+<<[-[->>>+<<<]>>-<<]>>>[-<<<+>>>]<[-<+>]<<<]>>>+<[[-]>->>>++++++[<++++++++++>-]<++.[-]<<<]<[[-]>>->>>++++++[<++++++++++>-]<.[-]<<<<]>>[->>>++++++[<++++++++++>-]<+.[-]<<]",
    },
    Exercise {
        title: "Fibonacci Sequence",
        description: "Output the first 5 Fibonacci numbers as raw byte values",
        setup: "",
        tests: &[output(b"", "\u{1}\u{1}\u{2}\u{3}\u{5}")],
        hint: "Each output only needs the difference from the previous one",
        solution: "+..+.+.++.",
    },
    Exercise {
        title: "Division",
        description: "Divide 12 by 3, leaving the quotient in cell 2 and cells 0 and 1 empty",
        setup: "++++++++++++>+++",
        tests: &[memory(&[0, 0, 4])],
        hint: "Subtract the divisor from cell 0 repeatedly and count the rounds",
        solution: "<[>[-<->>>+<<]>>[-<<+>>]<+<<]>[-]",
    },
];

pub fn exercises(level: Level) -> &'static [Exercise] {
    match level {
        Level::Beginner => BEGINNER,
        Level::Intermediate => INTERMEDIATE,
        Level::Advanced => ADVANCED,
    }
}

/// Exercise `number` (1-based) of `level`.
pub fn exercise(level: Level, number: usize) -> Option<&'static Exercise> {
    number.checked_sub(1).and_then(|i| exercises(level).get(i))
}

/// A parameterised exercise built at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedExercise {
    pub title: String,
    pub description: String,
    pub setup: String,
    pub tests: Vec<TestCase>,
    pub hint: String,
    pub solution: String,
}

impl GeneratedExercise {
    pub fn set_value(value: u8) -> Self {
        Self {
            title: format!("Set cell to {value}"),
            description: format!("Set the current cell to the value {value}"),
            setup: String::new(),
            tests: vec![TestCase::memory(vec![value])],
            hint: format!("Use {value} plus signs"),
            solution: "+".repeat(value.into()),
        }
    }

    pub fn move_value(value: u8, distance: usize) -> Self {
        let expected: Vec<u8> = iter::repeat_n(0, distance).chain([value]).collect();
        Self {
            title: format!("Move {value} right {distance} cells"),
            description: format!("Move the value {value} from cell 0 to cell {distance}"),
            setup: "+".repeat(value.into()),
            tests: vec![TestCase::memory(expected)],
            hint: "Use a loop to move the value".to_string(),
            solution: format!("[-{}+{}]", ">".repeat(distance), "<".repeat(distance)),
        }
    }

    /// `a * b` must fit in a cell.
    pub fn multiply(a: u8, b: u8) -> Self {
        Self {
            title: format!("Multiply {a} * {b}"),
            description: format!("Calculate {a} * {b} and store in cell 1"),
            setup: String::new(),
            tests: vec![TestCase::memory(vec![0, a.wrapping_mul(b)])],
            hint: "Use nested loops".to_string(),
            solution: format!("{}[->{}<]", "+".repeat(a.into()), "+".repeat(b.into())),
        }
    }

    /// Pick a template and its parameters from `seed`. The same seed always
    /// yields the same exercise; advanced has no templates.
    pub fn from_seed(level: Level, seed: u64) -> Option<Self> {
        let mut rng = SplitMix64(seed);
        match level {
            Level::Beginner => Some(if rng.below(2) == 0 {
                Self::set_value(1 + rng.below(20) as u8)
            } else {
                let value = 1 + rng.below(10) as u8;
                Self::move_value(value, 1 + rng.below(3) as usize)
            }),
            Level::Intermediate => {
                let a = 2 + rng.below(5) as u8;
                Some(Self::multiply(a, 2 + rng.below(5) as u8))
            }
            Level::Advanced => None,
        }
    }

    pub fn full_program(&self, solution: &str) -> String {
        format!("{}{}", self.setup, solution)
    }
}

struct SplitMix64(u64);

impl SplitMix64 {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

/// A lesson's practice task, graded by comparing against `solution`.
#[derive(Debug, Clone, Copy)]
pub struct Practice {
    pub lesson: &'static str,
    pub task: &'static str,
    pub solution: &'static str,
    pub hint: &'static str,
    /// Input fed to both programs during the comparison.
    pub input: &'static str,
}

pub const PRACTICE: &[Practice] = &[
    Practice {
        lesson: "The Eight Commands",
        task: "Write a program that sets the first cell to 5",
        solution: "+++++",
        hint: "Use the + command five times",
        input: "",
    },
    Practice {
        lesson: "Memory and Pointer Movement",
        task: "Set the first three cells to 1, 2, 3",
        solution: "+>++>+++",
        hint: "Add values then move right with >",
        input: "",
    },
    Practice {
        lesson: "Input and Output",
        task: "Output the letter \"H\" (ASCII 72)",
        solution: "+++++++++[>++++++++<-]>.",
        hint: "Try 9*8=72, use a loop for efficiency",
        input: "",
    },
    Practice {
        lesson: "Loops",
        task: "Set a cell to 5, clear it with a loop, then add 2",
        solution: "+++++[-]++",
        hint: "[-] keeps decrementing until zero",
        input: "",
    },
    Practice {
        lesson: "Your First Real Program: Cat",
        task: "Write the cat program",
        solution: ",[.,]",
        hint: "Read, loop while outputting and reading",
        input: "meow",
    },
    Practice {
        lesson: "Moving and Copying Values",
        task: "Set cell 0 to 3, then move it two cells to the right",
        solution: "+++[->>+<<]",
        hint: "Similar to [->+<] but move two cells",
        input: "",
    },
    Practice {
        lesson: "Hello World Explained",
        task: "Output \"Hi\" using the loop technique",
        solution: "+++++++++[>++++++++>++++++++++++<<-]>.>---.",
        hint: "Set up base values with one loop, then adjust each",
        input: "",
    },
    Practice {
        lesson: "Conditional Execution (If-Then)",
        task: "Create an if-not-zero that prints \"1\"",
        solution: "+[>+++++++[>+++++++<-]>.[-]<<[-]]",
        hint: "Check if cell is not zero, then output ASCII 49",
        input: "",
    },
    Practice {
        lesson: "Advanced Techniques",
        task: "Multiply 4*3 using loops",
        solution: "++++[->+++<]>",
        hint: "Add 3 to next cell, 4 times",
        input: "",
    },
];

/// Practice task `number` (1-based).
pub fn practice(number: usize) -> Option<&'static Practice> {
    number.checked_sub(1).and_then(|i| PRACTICE.get(i))
}
