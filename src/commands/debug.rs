use std::io::{self, Write};

use clap::Args;

use bf::debugger::{self, DebugEnd, Debugger};

use super::Context;

#[derive(Args, Debug)]
pub struct DebugArgs {
    /// Path to a program file
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Input bytes consumed by `,`
    #[arg(short = 'i', long = "input", value_name = "INPUT")]
    pub input: Option<String>,
}

pub fn run(ctx: &Context, args: DebugArgs) -> i32 {
    let Some(code) = ctx.read_code(&args.file) else {
        return 1;
    };
    let Some(mut bf) = ctx.interpreter(args.input.as_deref(), false) else {
        return 2;
    };

    let mut source = debugger::default_source();
    let mut stdout = io::stdout().lock();
    let end = Debugger::new(&mut bf, &code).run(source.as_mut(), &mut stdout);
    let _ = stdout.flush();

    match end {
        Ok(DebugEnd::Finished { .. }) | Ok(DebugEnd::Quit) => 0,
        Ok(DebugEnd::Failed(_)) => 1,
        Err(e) => {
            eprintln!("{}: debugger error: {e}", ctx.program);
            let _ = io::stderr().flush();
            1
        }
    }
}
