use clap::Args;

use bf::catalog::{self, EXAMPLES};

use super::{report, Context, ReportOptions};

#[derive(Args, Debug)]
pub struct ExamplesArgs {
    /// Example to run; lists the library when omitted
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Input bytes consumed by `,` (defaults to the example's sample input)
    #[arg(short = 'i', long = "input", value_name = "INPUT")]
    pub input: Option<String>,

    /// Draw the final memory window
    #[arg(short = 'V', long = "visualize")]
    pub visualize: bool,
}

pub fn run(ctx: &Context, args: ExamplesArgs) -> i32 {
    let Some(name) = args.name else {
        println!("{}", ctx.cyan("Available examples:"));
        for ex in EXAMPLES {
            println!("  {:<12} [{}] {}", ex.name, ex.level, ex.description);
        }
        return 0;
    };

    let Some(example) = catalog::find_example(&name) else {
        eprintln!("{}: unknown example '{name}'", ctx.program);
        return 2;
    };

    let input = args.input.as_deref().unwrap_or(example.sample_input);
    let Some(mut bf) = ctx.interpreter(Some(input), false) else {
        return 2;
    };

    println!("{} {}", ctx.cyan("Example:"), example.description);
    println!("{} {}", ctx.cyan("Code:"), example.code);
    if !input.is_empty() {
        println!("{} {input}", ctx.cyan("Input:"));
    }

    let result = bf.execute(example.code);
    let opts = ReportOptions { visualize: args.visualize, ..ReportOptions::default() };
    report(ctx, example.code, &bf, &result, opts)
}
