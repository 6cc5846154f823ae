use std::fs;
use std::io::{self, Read, Write};

use clap::Args;

use bf::{Generator, GeneratorOptions};

use super::Context;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Read input from file at PATH (otherwise reads from TEXT or STDIN)
    #[arg(short = 'f', long = "file", conflicts_with = "text")]
    pub file: Option<String>,

    /// Print only the plain `+`/`-` version
    #[arg(long = "simple", conflicts_with = "compact")]
    pub simple: bool,

    /// Print only the loop-optimized version
    #[arg(long = "compact")]
    pub compact: bool,

    /// Text to print (args are joined with spaces). If omitted, reads STDIN.
    #[arg(value_name = "TEXT", trailing_var_arg = true)]
    pub text: Vec<String>,
}

pub fn run(ctx: &Context, args: GenerateArgs) -> i32 {
    let input: Vec<u8> = match (&args.file, args.text.is_empty()) {
        (Some(path), _) => match fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("{}: failed to read file: {e}", ctx.program);
                let _ = io::stderr().flush();
                return 1;
            }
        },
        (None, false) => args.text.join(" ").into_bytes(),
        (None, true) => {
            let mut buf = Vec::new();
            if let Err(e) = io::stdin().lock().read_to_end(&mut buf) {
                eprintln!("{}: failed reading stdin: {e}", ctx.program);
                let _ = io::stderr().flush();
                return 1;
            }
            buf
        }
    };

    let simple = Generator::with_options(&input, GeneratorOptions::simple()).generate();
    let compact = Generator::new(&input).generate();

    if args.simple {
        println!("{simple}");
    } else if args.compact {
        println!("{compact}");
    } else {
        println!("{}", ctx.green("Generated Brainfuck code:"));
        println!("{simple}");
        println!();
        println!("{}", ctx.cyan("Optimized version:"));
        println!("{compact}");
    }
    let _ = io::stdout().flush();
    0
}
