use clap::Args;

use super::{report, Context, ReportOptions};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to a program file; non-instruction characters are comments
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Input bytes consumed by `,`
    #[arg(short = 'i', long = "input", value_name = "INPUT")]
    pub input: Option<String>,

    /// Print iterations and the first 20 memory cells
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Draw the final memory window
    #[arg(short = 'V', long = "visualize")]
    pub visualize: bool,

    /// Print a step-by-step table of executed instructions
    #[arg(short = 't', long = "trace")]
    pub trace: bool,

    /// Print instruction counts, busiest cells, loop structure and a memory heat map
    #[arg(long = "stats")]
    pub stats: bool,

    /// Print the result as JSON
    #[arg(long = "json", conflicts_with_all = ["debug", "visualize", "trace", "stats"])]
    pub json: bool,
}

pub fn run(ctx: &Context, args: RunArgs) -> i32 {
    let Some(code) = ctx.read_code(&args.file) else {
        return 1;
    };

    let opts = ReportOptions {
        debug: args.debug,
        visualize: args.visualize,
        trace: args.trace,
        stats: args.stats,
        json: args.json,
    };
    let Some(mut bf) = ctx.interpreter(args.input.as_deref(), opts.needs_capture()) else {
        return 2;
    };

    log::debug!("running {} ({} bytes of source)", args.file, code.len());
    let result = bf.execute(&code);
    report(ctx, &code, &bf, &result, opts)
}
