use std::io::{self, Write};

use clap::{ArgGroup, Args};

use bf::catalog::{self, GeneratedExercise, Level};
use bf::{grade, TestCase};

use super::Context;

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("pick").args(["number", "generate"])))]
pub struct ExerciseArgs {
    /// Difficulty level
    #[arg(value_enum, default_value_t = Level::Beginner)]
    pub level: Level,

    /// Exercise number within the level (1-based)
    #[arg(short = 'n', long = "number", value_name = "N")]
    pub number: Option<usize>,

    /// Build a generated exercise for the level from SEED
    #[arg(short = 'g', long = "generate", value_name = "SEED")]
    pub generate: Option<u64>,

    /// Solution to grade; the exercise's setup code runs first
    #[arg(short = 's', long = "solution", value_name = "CODE", requires = "pick", allow_hyphen_values = true)]
    pub solution: Option<String>,

    /// Show the hint
    #[arg(long = "hint", requires = "pick")]
    pub hint: bool,

    /// Show the reference solution
    #[arg(long = "show-solution", requires = "pick")]
    pub show_solution: bool,
}

/// The fields shown and graded, whichever way the exercise was picked.
struct Selected {
    title: String,
    description: String,
    setup: String,
    hint: String,
    solution: String,
    tests: Vec<TestCase>,
}

impl From<GeneratedExercise> for Selected {
    fn from(ex: GeneratedExercise) -> Self {
        Self {
            title: ex.title,
            description: ex.description,
            setup: ex.setup,
            hint: ex.hint,
            solution: ex.solution,
            tests: ex.tests,
        }
    }
}

fn select(ctx: &Context, args: &ExerciseArgs) -> Result<Option<Selected>, i32> {
    if let Some(seed) = args.generate {
        return match GeneratedExercise::from_seed(args.level, seed) {
            Some(ex) => Ok(Some(ex.into())),
            None => {
                eprintln!("{}: no generated exercises at level {}", ctx.program, args.level);
                let _ = io::stderr().flush();
                Err(2)
            }
        };
    }

    let Some(number) = args.number else {
        return Ok(None);
    };
    match catalog::exercise(args.level, number) {
        Some(ex) => Ok(Some(Selected {
            title: ex.title.to_string(),
            description: ex.description.to_string(),
            setup: ex.setup.to_string(),
            hint: ex.hint.to_string(),
            solution: ex.solution.to_string(),
            tests: ex.test_cases(),
        })),
        None => {
            eprintln!(
                "{}: no exercise {number} at level {} ({} available)",
                ctx.program,
                args.level,
                catalog::exercises(args.level).len()
            );
            let _ = io::stderr().flush();
            Err(2)
        }
    }
}

pub fn run(ctx: &Context, args: ExerciseArgs) -> i32 {
    let exercise = match select(ctx, &args) {
        Ok(Some(exercise)) => exercise,
        Ok(None) => {
            println!("{} ({})", ctx.cyan("Exercises"), args.level);
            for (i, ex) in catalog::exercises(args.level).iter().enumerate() {
                println!("  {}. {}: {}", i + 1, ex.title, ex.description);
            }
            return 0;
        }
        Err(code) => return code,
    };

    println!("{} {}", ctx.cyan("Exercise:"), exercise.title);
    println!("{}", exercise.description);
    if !exercise.setup.is_empty() {
        println!("{} {}", ctx.cyan("Setup (runs before your code):"), exercise.setup);
    }
    if args.hint {
        println!("{} {}", ctx.yellow("Hint:"), exercise.hint);
    }
    if args.show_solution {
        println!("{} {}", ctx.yellow("Solution:"), exercise.solution);
    }

    let Some(solution) = args.solution else {
        return 0;
    };

    let program = format!("{}{}", exercise.setup, solution);
    match grade(&program, &exercise.tests, &ctx.settings.interpreter_config()) {
        Ok(()) => {
            println!("{}", ctx.green("✓ Correct! Well done!"));
            0
        }
        Err(failure) => {
            println!("{} {failure}", ctx.red("✗ Incorrect:"));
            1
        }
    }
}
