pub mod check;
pub mod debug;
pub mod examples;
pub mod exec;
pub mod exercise;
pub mod generate;
pub mod practice;
pub mod run;
pub mod visualize;

use std::fs;
use std::io::{self, Write};

use bf::cli_util::{self, paint};
use bf::config::Settings;
use bf::visualizer::Visualizer;
use bf::{ExecutionResult, ExecutionSummary, Interpreter, InterpreterConfig, Program};
use nu_ansi_term::Style;

/// Shared state handed to every subcommand.
pub struct Context {
    /// Binary name used to prefix error messages.
    pub program: String,
    pub settings: Settings,
    pub color: bool,
}

impl Context {
    pub fn green(&self, text: &str) -> String {
        paint(self.color, Style::new().fg(self.settings.colors.success), text)
    }

    pub fn red(&self, text: &str) -> String {
        paint(self.color, Style::new().fg(self.settings.colors.error), text)
    }

    pub fn yellow(&self, text: &str) -> String {
        paint(self.color, Style::new().fg(self.settings.colors.ascii), text)
    }

    pub fn cyan(&self, text: &str) -> String {
        paint(self.color, Style::new().fg(self.settings.colors.info), text)
    }

    pub fn visualizer(&self) -> Visualizer {
        Visualizer::new(self.settings.colors.clone(), self.settings.visible_cells).with_color(self.color)
    }

    /// Interpreter built from settings plus per-run input and capture flag.
    /// Reports invalid settings and returns `None`.
    pub fn interpreter(&self, input: Option<&str>, debug_capture: bool) -> Option<Interpreter> {
        let config: InterpreterConfig = self
            .settings
            .interpreter_config()
            .with_text_input(input.unwrap_or_default())
            .with_debug_capture(debug_capture);
        match Interpreter::new(config) {
            Ok(bf) => Some(bf),
            Err(e) => {
                eprintln!("{}: {e}", self.program);
                let _ = io::stderr().flush();
                None
            }
        }
    }

    pub fn read_code(&self, path: &str) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(s) => Some(s),
            Err(e) => {
                eprintln!("{}: failed to read code file as UTF-8: {e}", self.program);
                let _ = io::stderr().flush();
                None
            }
        }
    }
}

/// What `run`/`exec` print besides the program output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub debug: bool,
    pub visualize: bool,
    pub trace: bool,
    pub stats: bool,
    pub json: bool,
}

impl ReportOptions {
    pub fn needs_capture(&self) -> bool {
        self.debug || self.trace || self.stats
    }
}

/// Print the outcome of `execute` and return the exit code.
pub fn report(ctx: &Context, source: &str, bf: &Interpreter, result: &ExecutionResult, opts: ReportOptions) -> i32 {
    if opts.json {
        let summary = ExecutionSummary::from(result);
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("{}: failed to encode result: {e}", ctx.program);
                return 1;
            }
        }
        let _ = io::stdout().flush();
        return if result.is_ok() { 0 } else { 1 };
    }

    let done = match result {
        Ok(done) => done,
        Err(failure) => {
            cli_util::print_failure(Some(ctx.program.as_str()), source, failure, &ctx.settings.colors);
            return 1;
        }
    };

    if opts.trace {
        if let (Ok(program), Some(history)) = (Program::parse(source), &done.history) {
            print!("{}", cli_util::trace_table(&program, history));
        }
    }

    println!("{}", ctx.green("✓ Program executed successfully"));
    println!("{} {}", ctx.yellow("Output:"), done.output);

    if opts.debug {
        println!("{} {}", ctx.cyan("Iterations:"), done.iterations);
        println!("{}", ctx.cyan("Final memory (first 20 cells):"));
        println!("{:?}", bf.memory_snapshot(0, 20));
    }

    if opts.visualize {
        println!();
        print!("{}", ctx.visualizer().render_memory(bf.memory(), bf.data_pointer(), 0));
    }

    if opts.stats {
        if let Some(history) = &done.history {
            println!();
            print!("{}", ctx.visualizer().render_stats(history));
        }
        if let Ok(program) = Program::parse(source) {
            println!();
            print!("{}", ctx.visualizer().render_loops(&program));
        }
        println!();
        print!("{}", ctx.visualizer().render_heat_map(bf.memory()));
    }

    let _ = io::stdout().flush();
    0
}
