mod commands;

use std::env;
use std::io::{self, Write};

use bf::cli_util;
use bf::config::Settings;
use clap::{Parser, Subcommand};

use crate::commands::check::CheckArgs;
use crate::commands::debug::DebugArgs;
use crate::commands::examples::ExamplesArgs;
use crate::commands::exec::ExecArgs;
use crate::commands::exercise::ExerciseArgs;
use crate::commands::generate::GenerateArgs;
use crate::commands::practice::PracticeArgs;
use crate::commands::run::RunArgs;
use crate::commands::visualize::VisualizeArgs;
use crate::commands::Context;

fn print_top_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run <FILE> [-i INPUT] [-d] [-V] [-t] [--stats] [--json]  # Run a program file
  {0} exec <CODE> [-i INPUT] [-d] [-t] [--json]                # Run code given inline
  {0} debug <FILE> [-i INPUT]                                  # Step through a program
  {0} visualize <CODE> [-i INPUT] [-s MS]                      # Animate execution
  {0} generate [--simple|--compact] [TEXT...]                  # Generate code that prints TEXT
  {0} examples [NAME] [-i INPUT]                               # List or run built-in examples
  {0} exercise [LEVEL] [-n N|-g SEED] [-s CODE] [--hint]       # Graded exercises
  {0} practice [N] [-s CODE] [--hint] [--show-solution]        # Lesson practice tasks
  {0} check <ATTEMPT> <REFERENCE> [-i INPUT]                   # Compare two programs

Global options:
  --memory-size <N>     Tape length in cells (fallback BF_MEMORY_SIZE; default 30000)
  --max-iterations <N>  Instruction ceiling (fallback BF_MAX_ITERATIONS; default 1000000)
  --verbose, -v         Enable debug logging (RUST_LOG is honoured)
  --help,    -h         Show this help

Settings are also read from $XDG_CONFIG_HOME/bf-learn.toml.
Run "{0} <subcommand> --help" for more info.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bf", version, disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Tape length in cells
    #[arg(long = "memory-size", value_name = "N", global = true)]
    memory_size: Option<usize>,

    /// Instruction ceiling for a run
    #[arg(long = "max-iterations", value_name = "N", global = true)]
    max_iterations: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a program file
    Run(RunArgs),
    /// Run code given on the command line
    Exec(ExecArgs),
    /// Step through a program interactively
    Debug(DebugArgs),
    /// Animate execution one instruction at a time
    Visualize(VisualizeArgs),
    /// Generate code that prints the given text
    Generate(GenerateArgs),
    /// List or run built-in example programs
    Examples(ExamplesArgs),
    /// List, show or grade exercises
    Exercise(ExerciseArgs),
    /// List, show or check lesson practice tasks
    Practice(PracticeArgs),
    /// Check that two programs behave the same
    Check(CheckArgs),
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "off" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bf"));

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        print_top_usage_and_exit(&program, if cli.help { 0 } else { 2 });
    };
    if cli.help {
        print_top_usage_and_exit(&program, 0);
    }

    // Resolve settings: defaults -> config file -> env -> flags
    let mut settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            std::process::exit(2);
        }
    };
    if let Some(n) = cli.memory_size {
        settings.memory_size = n;
    }
    if let Some(n) = cli.max_iterations {
        settings.max_iterations = n;
    }
    log::debug!("settings: memory_size={} max_iterations={}", settings.memory_size, settings.max_iterations);

    let ctx = Context {
        program,
        settings,
        color: cli_util::color_enabled(),
    };

    let code = match command {
        Command::Run(args) => commands::run::run(&ctx, args),
        Command::Exec(args) => commands::exec::run(&ctx, args),
        Command::Debug(args) => commands::debug::run(&ctx, args),
        Command::Visualize(args) => commands::visualize::run(&ctx, args),
        Command::Generate(args) => commands::generate::run(&ctx, args),
        Command::Examples(args) => commands::examples::run(&ctx, args),
        Command::Exercise(args) => commands::exercise::run(&ctx, args),
        Command::Practice(args) => commands::practice::run(&ctx, args),
        Command::Check(args) => commands::check::run(&ctx, args),
    };

    std::process::exit(code);
}
