#![deny(unused_crate_dependencies)]


pub mod repl;
pub mod run;
pub mod version;

use clap::Parser;
use run::{run_interpreter, Config, InterpreterError};
use std::io;
use tidy_diagnostic::Diagnostic;
use version::VERSION;

fn report_interpreter_error(err: InterpreterError) -> io::Result<()> {
    let mut diagnostic = Diagnostic::new();
    err.report(&mut diagnostic);
    diagnostic.report_all(&mut io::stderr())
}

#[derive(Parser)]
#[command(name = "tidy", disable_version_flag = true)]
struct Cli {
    /// The script to run. Starts a REPL if omitted.
    filename: Option<String>,

    /// Evaluate a program given on the command line.
    #[arg(short = 'e', long, conflicts_with = "filename")]
    expr: Option<String>,

    /// Print the current version.
    #[arg(long)]
    version: bool,
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert()
}

/// The entrypoint to the CLI.
///
/// It's defined in this library to avoid false positives associated with the
/// [`#![deny(unused_crate_dependencies)]` attribute](https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html#unused-crate-dependencies).
pub fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.version {
        println!("tidy {}", VERSION);
        return Ok(());
    }

    if cli.filename.is_none() && cli.expr.is_none() {
        return repl::run();
    }

    let config = Config {
        filename: cli.filename,
        expr: cli.expr,
        stdout: None,
    };
    match run_interpreter(config) {
        Ok(()) => Ok(()),
        Err(err) => {
            log::debug!("run failed: {:?}", err);
            report_interpreter_error(err)?;
            std::process::exit(1)
        }
    }
}
