use std::io::{self, Write};

use clap::Args;

use bf::catalog::{self, PRACTICE};
use bf::compare_programs;

use super::Context;

#[derive(Args, Debug)]
pub struct PracticeArgs {
    /// Practice task number (1-based); lists all tasks when omitted
    #[arg(value_name = "N")]
    pub number: Option<usize>,

    /// Attempt to check against the task's reference program
    #[arg(short = 's', long = "solution", value_name = "CODE", requires = "number", allow_hyphen_values = true)]
    pub solution: Option<String>,

    /// Show the hint
    #[arg(long = "hint", requires = "number")]
    pub hint: bool,

    /// Show the reference solution
    #[arg(long = "show-solution", requires = "number")]
    pub show_solution: bool,
}

pub fn run(ctx: &Context, args: PracticeArgs) -> i32 {
    let Some(number) = args.number else {
        println!("{}", ctx.cyan("Practice tasks"));
        for (i, task) in PRACTICE.iter().enumerate() {
            println!("  {}. {}: {}", i + 1, task.lesson, task.task);
        }
        return 0;
    };

    let Some(task) = catalog::practice(number) else {
        eprintln!("{}: no practice task {number} ({} available)", ctx.program, PRACTICE.len());
        let _ = io::stderr().flush();
        return 2;
    };

    println!("{} {}", ctx.cyan("Lesson:"), task.lesson);
    println!("{}", task.task);
    if !task.input.is_empty() {
        println!("{} {}", ctx.cyan("Input:"), task.input);
    }
    if args.hint {
        println!("{} {}", ctx.yellow("Hint:"), task.hint);
    }
    if args.show_solution {
        println!("{} {}", ctx.yellow("Solution:"), task.solution);
    }

    let Some(attempt) = args.solution else {
        return 0;
    };

    let config = ctx.settings.interpreter_config().with_text_input(task.input);
    let verdict = match compare_programs(&attempt, task.solution, &config) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}: {e}", ctx.program);
            let _ = io::stderr().flush();
            return 2;
        }
    };

    if verdict.matches() {
        println!("{}", ctx.green("✓ Correct! Well done!"));
        if let Ok(done) = &verdict.attempt {
            if !done.output.is_empty() {
                println!("{} {}", ctx.yellow("Output:"), done.output);
            }
        }
        return 0;
    }

    println!("{}", ctx.red("✗ Not quite right."));
    match &verdict.attempt {
        Ok(done) => println!("{} output {:?}, cells {:?}", ctx.yellow("Yours:"), done.output, verdict.attempt_memory),
        Err(failure) => println!("{} {} {failure}", ctx.yellow("Yours:"), ctx.red("error:")),
    }
    if let Ok(done) = &verdict.reference {
        println!("{} output {:?}, cells {:?}", ctx.yellow("Expected:"), done.output, verdict.reference_memory);
    }
    1
}
