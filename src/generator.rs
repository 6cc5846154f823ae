//! Generate programs that print a given byte string.
//!
//! ```
//! use bf::{Generator, Interpreter};
//!
//! let code = Generator::new(b"Hi!").generate();
//! let done = Interpreter::default().execute(&code).unwrap();
//! assert_eq!(done.output, "Hi!");
//! ```

use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Use loop-based multiplication when building from zero.
    pub use_loops: bool,
    /// Largest outer loop counter to try.
    pub max_loop_factor: u8,
    /// Assume cells wrap, so a delta may go the short way round 256.
    pub assume_wrapping_u8: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            use_loops: true,
            max_loop_factor: 16,
            assume_wrapping_u8: true,
        }
    }
}

impl GeneratorOptions {
    /// Plain `+`/`-` runs from the previous byte, no loops and no wrapping.
    pub fn simple() -> Self {
        Self {
            use_loops: false,
            max_loop_factor: 0,
            assume_wrapping_u8: false,
        }
    }
}

pub struct Generator<'a> {
    input: &'a [u8],
    options: GeneratorOptions,
}

impl<'a> Generator<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, options: GeneratorOptions::default() }
    }

    pub fn with_options(input: &'a [u8], options: GeneratorOptions) -> Self {
        Self { input, options }
    }

    /// Emit code that, run on a fresh tape, outputs exactly the input bytes.
    pub fn generate(&self) -> String {
        let mut output = String::new();
        let mut cursor = 0u8;

        for &b in self.input {
            let delta_sequence = self.encode_delta(cursor, b);

            let best_sequence = if self.options.use_loops {
                // Clear and rebuild from zero; keep it only if it is shorter.
                let from_zero_sequence = self.encode_from_zero(b);
                if delta_sequence.len() <= from_zero_sequence.len() {
                    delta_sequence
                } else {
                    from_zero_sequence
                }
            } else {
                delta_sequence
            };

            output.push_str(&best_sequence);
            output.push('.');
            cursor = b;
        }

        log::debug!("generated {} instruction(s) for {} byte(s)", output.len(), self.input.len());
        output
    }

    /// Shortest `+`/`-` run from `cursor` to `target`.
    fn encode_delta(&self, cursor: u8, target: u8) -> String {
        if self.options.assume_wrapping_u8 {
            let forward = target.wrapping_sub(cursor);
            let backward = cursor.wrapping_sub(target);
            if forward <= backward {
                "+".repeat(forward as usize)
            } else {
                "-".repeat(backward as usize)
            }
        } else {
            match target.cmp(&cursor) {
                Ordering::Greater => "+".repeat((target - cursor) as usize),
                Ordering::Less => "-".repeat((cursor - target) as usize),
                Ordering::Equal => String::new(),
            }
        }
    }

    /// Build `target` in the current cell regardless of its prior value.
    ///
    /// Loop form: clear current and temp, set current to `a`, add `b` to temp
    /// `a` times, adjust the remainder on temp, then move temp back. Leaves the
    /// temp cell at zero and the pointer on the current cell.
    fn encode_from_zero(&self, target: u8) -> String {
        let mut best = String::from("[-]");
        best.push_str(&"+".repeat(target as usize));

        if !self.options.use_loops || target == 0 {
            return best;
        }

        for a in 1..=self.options.max_loop_factor {
            let b = ((f32::from(target) / f32::from(a)).round() as i32).clamp(1, 255);
            let r = i32::from(target) - i32::from(a) * b;

            let mut seq = String::from("[-]>[-]<");
            seq.push_str(&"+".repeat(a as usize));
            seq.push_str("[>");
            seq.push_str(&"+".repeat(b as usize));
            seq.push_str("<-]>");
            if r > 0 {
                seq.push_str(&"+".repeat(r as usize));
            } else if r < 0 {
                seq.push_str(&"-".repeat((-r) as usize));
            }
            seq.push_str("[<+>-]<");

            if seq.len() < best.len() {
                best = seq;
            }
        }

        best
    }
}
