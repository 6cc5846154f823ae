use clap::Args;

use super::{report, Context, ReportOptions};

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Program text; quote it when it contains spaces
    #[arg(value_name = "CODE", allow_hyphen_values = true)]
    pub code: String,

    /// Input bytes consumed by `,`
    #[arg(short = 'i', long = "input", value_name = "INPUT")]
    pub input: Option<String>,

    /// Print iterations and the first 20 memory cells
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Print a step-by-step table of executed instructions
    #[arg(short = 't', long = "trace")]
    pub trace: bool,

    /// Print the result as JSON
    #[arg(long = "json", conflicts_with_all = ["debug", "trace"])]
    pub json: bool,
}

pub fn run(ctx: &Context, args: ExecArgs) -> i32 {
    let code = args.code;
    let opts = ReportOptions {
        debug: args.debug,
        trace: args.trace,
        json: args.json,
        ..ReportOptions::default()
    };
    let Some(mut bf) = ctx.interpreter(args.input.as_deref(), opts.needs_capture()) else {
        return 2;
    };

    let result = bf.execute(&code);
    report(ctx, &code, &bf, &result, opts)
}
