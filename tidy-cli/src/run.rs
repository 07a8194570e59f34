use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};
use tidy_diagnostic::{Diagnostic, Message, Source};
use tidy_eval::{self as eval, Env, Interpreter};
use tidy_parse as parse;

pub struct Config {
    /// A script to run.
    pub filename: Option<String>,
    /// Program text given on the command line. Takes priority over `filename`.
    pub expr: Option<String>,
    pub stdout: Option<Box<dyn Write>>,
}

#[derive(Debug)]
pub enum InterpreterError {
    ParseError { error: parse::ParseError, input: String },
    EvalError { error: eval::Error, source: Source },
    FileDoesNotExist(PathBuf),
    NothingToRun,
    Io(io::Error),
}

impl From<io::Error> for InterpreterError {
    fn from(err: io::Error) -> Self {
        InterpreterError::Io(err)
    }
}

impl InterpreterError {
    pub fn report(&self, diagnostic: &mut Diagnostic) {
        match self {
            InterpreterError::ParseError { error, input } => {
                diagnostic.input(error.source(), input);
                error.report(diagnostic)
            }
            InterpreterError::EvalError { error, source } => error.report(diagnostic, source),
            InterpreterError::FileDoesNotExist(path) => diagnostic.item(
                None,
                Message::new(format!("file {} does not exist", path.display())),
            ),
            InterpreterError::NothingToRun => diagnostic.item(
                None,
                Message::new(String::from("nothing to run: pass a file or --expr")),
            ),
            InterpreterError::Io(err) => diagnostic.item(None, Message::new(err.to_string())),
        }
    }
}

/// Parse and evaluate a whole program in a fresh global environment, printing
/// the value of the last expression unless it's invisible.
pub fn run_interpreter(config: Config) -> Result<(), InterpreterError> {
    let (source, input) = match (config.expr, config.filename) {
        (Some(expr), _) => (Source::interactive("<expr>"), expr),
        (None, Some(filename)) => {
            let path = PathBuf::from(filename);
            if !path.exists() {
                return Err(InterpreterError::FileDoesNotExist(path));
            }
            let input = fs::read_to_string(&path)?;
            (Source::File { path }, input)
        }
        (None, None) => return Err(InterpreterError::NothingToRun),
    };

    let program = match parse::capture_program_at(source.clone(), &input) {
        Ok(program) => program,
        Err(error) => return Err(InterpreterError::ParseError { error, input }),
    };
    log::debug!("parsed {} top-level expression(s) from {}", program.len(), source.to_str());

    let mut stdout = config.stdout.unwrap_or_else(|| Box::new(io::stdout()));
    let value = {
        let mut interpreter = Interpreter::new(&mut stdout, Env::global());
        let global = interpreter.global().clone();
        interpreter.eval_program(&program, &global)
    };
    match value {
        Ok(value) => {
            if program.last().map_or(false, eval::is_visible) {
                writeln!(stdout, "{}", value.render())?;
            }
            stdout.flush()?;
            Ok(())
        }
        Err(error) => {
            stdout.flush()?;
            Err(InterpreterError::EvalError { error, source })
        }
    }
}
