use std::io::{self, Write};

use clap::Args;

use bf::compare_programs;
use bf::grader::COMPARED_CELLS;

use super::Context;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Program under test
    #[arg(value_name = "ATTEMPT", allow_hyphen_values = true)]
    pub attempt: String,

    /// Program whose behavior the attempt must match
    #[arg(value_name = "REFERENCE", allow_hyphen_values = true)]
    pub reference: String,

    /// Input given to both programs
    #[arg(short = 'i', long = "input", value_name = "INPUT")]
    pub input: Option<String>,
}

pub fn run(ctx: &Context, args: CheckArgs) -> i32 {
    let config = ctx
        .settings
        .interpreter_config()
        .with_text_input(args.input.as_deref().unwrap_or_default());
    let verdict = match compare_programs(&args.attempt, &args.reference, &config) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}: {e}", ctx.program);
            let _ = io::stderr().flush();
            return 2;
        }
    };

    if verdict.matches() {
        println!("{}", ctx.green("✓ Programs match"));
        return 0;
    }

    println!("{}", ctx.red("✗ Programs differ"));
    for (label, result, memory) in [
        ("Attempt", &verdict.attempt, &verdict.attempt_memory),
        ("Reference", &verdict.reference, &verdict.reference_memory),
    ] {
        match result {
            Ok(done) => println!("{} output {:?}", ctx.yellow(&format!("{label}:")), done.output),
            Err(failure) => println!("{} {} {failure}", ctx.yellow(&format!("{label}:")), ctx.red("error:")),
        }
        println!("  first {COMPARED_CELLS} cells: {memory:?}");
    }
    1
}
