use std::rc::Rc;
use tidy_diagnostic::{Diagnostic, Location, Message, Source};
use tidy_syntax::{print, Node};

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// `enexpr`/`enquo` named something that isn't a supplied, unforced argument.
    UnboundArgument {
        name: Rc<str>,
    },
    UnresolvedSymbol {
        name: Rc<str>,
    },
    NotCallable {
        callee: Node,
    },
    ArityOrBinding {
        callee: Rc<str>,
        reason: String,
    },
    /// A pronoun was used where it has nothing to refer to.
    AmbiguousReference {
        pronoun: Rc<str>,
        name: Rc<str>,
    },
    NotRepresentable {
        what: String,
    },
    TypeMismatch {
        callee: Rc<str>,
        expected: &'static str,
        actual: &'static str,
    },
    /// Evaluation nested past the interpreter's limit.
    TooDeep {
        limit: usize,
    },
    Io {
        message: String,
    },
}

impl Error {
    pub fn arity(callee: &str, reason: String) -> Self {
        Error::ArityOrBinding {
            callee: Rc::from(callee),
            reason,
        }
    }

    pub fn type_mismatch(callee: &str, expected: &'static str, actual: &'static str) -> Self {
        Error::TypeMismatch {
            callee: Rc::from(callee),
            expected,
            actual,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Error::UnboundArgument { name } => format!(
                "can't capture `{}`: it isn't a supplied argument of the current function",
                name
            ),
            Error::UnresolvedSymbol { name } => format!("object '{}' not found", name),
            Error::NotCallable { callee } => {
                format!("attempt to apply non-function: {}", callee.render())
            }
            Error::ArityOrBinding { callee, reason } => {
                format!("in {}: {}", print::render_name(callee), reason)
            }
            Error::AmbiguousReference { pronoun, name } => format!(
                "can't use `{}${}` outside of a data mask",
                pronoun,
                print::render_name(name)
            ),
            Error::NotRepresentable { what } => format!("can't represent {}", what),
            Error::TypeMismatch {
                callee,
                expected,
                actual,
            } => format!(
                "in {}: expected {}, got {}",
                print::render_name(callee),
                expected,
                actual
            ),
            Error::TooDeep { limit } => format!(
                "evaluation nested too deeply: more than {} levels",
                limit
            ),
            Error::Io { message } => format!("failed to write output: {}", message),
        }
    }

    pub fn report(&self, diagnostic: &mut Diagnostic, source: &Source) {
        diagnostic.item(
            Some(Location {
                source: source.clone(),
                offset: None,
            }),
            Message::new(self.message()),
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
        }
    }
}
