use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;

use bf::visualizer::AnimationEnd;

use super::Context;

#[derive(Args, Debug)]
pub struct VisualizeArgs {
    /// Program text; quote it when it contains spaces
    #[arg(value_name = "CODE", allow_hyphen_values = true)]
    pub code: String,

    /// Input bytes consumed by `,`
    #[arg(short = 'i', long = "input", value_name = "INPUT")]
    pub input: Option<String>,

    /// Delay between frames in milliseconds; 0 runs without drawing
    #[arg(short = 's', long = "speed", value_name = "MS")]
    pub speed: Option<u64>,
}

pub fn run(ctx: &Context, args: VisualizeArgs) -> i32 {
    let code = args.code;
    let Some(mut bf) = ctx.interpreter(args.input.as_deref(), false) else {
        return 2;
    };
    let delay = Duration::from_millis(args.speed.unwrap_or(ctx.settings.animation_ms));

    // Ctrl+C stops the animation after the current frame.
    let stop = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&stop);
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        eprintln!("{}: failed to set ctrl+c handler: {e}", ctx.program);
        let _ = io::stderr().flush();
        return 1;
    }

    let visualizer = ctx.visualizer().with_clear_screen(io::stdout().is_terminal());
    let mut stdout = io::stdout().lock();
    let end = visualizer.animate(&mut stdout, &mut bf, &code, delay, &stop);
    drop(stdout);

    match end {
        Ok(AnimationEnd::Completed { output }) => {
            println!();
            println!("{}", ctx.green("✓ Program completed successfully"));
            if !output.is_empty() {
                println!("{} {output}", ctx.yellow("Final output:"));
            }
            0
        }
        Ok(AnimationEnd::Failed { error, output }) => {
            println!();
            println!("{} {error}", ctx.red("✗ Error:"));
            if !output.is_empty() {
                println!("{} {output}", ctx.yellow("Partial output:"));
            }
            1
        }
        Ok(AnimationEnd::Interrupted { output }) => {
            println!();
            println!("{}", ctx.yellow("Stopped"));
            if !output.is_empty() {
                println!("{} {output}", ctx.yellow("Output so far:"));
            }
            130
        }
        Err(e) => {
            eprintln!("{}: visualizer error: {e}", ctx.program);
            let _ = io::stderr().flush();
            1
        }
    }
}
