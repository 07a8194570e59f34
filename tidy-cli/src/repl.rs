use crate::version::VERSION;
use std::io::{self, BufRead, Write};
use tidy_diagnostic::{Diagnostic, Source};
use tidy_eval::{self as eval, Env, Interpreter};
use tidy_parse as parse;
use tidy_syntax::Node;

const HELP: &str = "\
:help        show this message
:quit        exit the REPL
:ast EXPR    show the captured expression tree of EXPR
EXPR         evaluate EXPR and print its value";

/// The outcome of one line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Quit,
}

pub struct Repl {
    global: Env,
    source: Source,
}

impl Default for Repl {
    fn default() -> Self {
        Repl::new()
    }
}

impl Repl {
    pub fn new() -> Self {
        Repl {
            global: Env::global(),
            source: Source::interactive("repl"),
        }
    }

    fn report(
        &self,
        output: &mut dyn Write,
        input: &str,
        report: impl FnOnce(&mut Diagnostic),
    ) -> io::Result<()> {
        let mut diagnostic = Diagnostic::new();
        diagnostic.input(self.source.clone(), input);
        report(&mut diagnostic);
        diagnostic.report_all(output)
    }

    fn show_ast(&self, output: &mut dyn Write, input: &str) -> io::Result<()> {
        match parse::capture_at(self.source.clone(), input) {
            Ok(node) => write_ast(output, &node),
            Err(err) => self.report(output, input, |diagnostic| err.report(diagnostic)),
        }
    }

    /// Run one line of input. Bindings persist between lines.
    pub fn step(&mut self, output: &mut dyn Write, line: &str) -> io::Result<Step> {
        let line = line.trim();
        if line == ":quit" {
            return Ok(Step::Quit);
        }
        if line == ":help" {
            writeln!(output, "{}", HELP)?;
            return Ok(Step::Continue);
        }
        if let Some(input) = line.strip_prefix(":ast") {
            self.show_ast(output, input.trim())?;
            return Ok(Step::Continue);
        }
        if line.is_empty() {
            return Ok(Step::Continue);
        }

        let program = match parse::capture_program_at(self.source.clone(), line) {
            Ok(program) => program,
            Err(err) => {
                self.report(output, line, |diagnostic| err.report(diagnostic))?;
                return Ok(Step::Continue);
            }
        };
        let global = self.global.clone();
        let result = {
            let mut interpreter = Interpreter::new(output, global.clone());
            interpreter.eval_program(&program, &global)
        };
        match result {
            Ok(value) => {
                if program.last().map_or(false, eval::is_visible) {
                    writeln!(output, "{}", value.render())?;
                }
            }
            Err(err) => {
                let source = self.source.clone();
                self.report(output, line, |diagnostic| err.report(diagnostic, &source))?;
            }
        }
        Ok(Step::Continue)
    }
}

fn write_ast(output: &mut dyn Write, node: &Node) -> io::Result<()> {
    writeln!(output, "{:#?}", node)
}

/// Read lines from `input` until it ends or `:quit` is entered.
pub fn run_with(input: &mut dyn BufRead, output: &mut dyn Write) -> io::Result<()> {
    let mut repl = Repl::new();
    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }
        if repl.step(output, &line)? == Step::Quit {
            return Ok(());
        }
    }
}

pub fn run() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(
        stdout,
        "tidy {}\n\nType :quit<ENTER> to quit.\nType :help<ENTER> to view all commands.\n",
        VERSION
    )?;
    run_with(&mut stdin.lock(), &mut stdout)
}
