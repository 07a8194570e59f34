
use std::{
    collections::HashMap,
    fmt::Write as FmtWrite,
    fs,
    io::{self, Write as IoWrite},
    path::PathBuf,
};

#[derive(PartialEq, Eq, Debug, Hash, Clone)]
pub enum Source {
    File { path: PathBuf },
    Interactive { label: String },
}

impl Source {
    pub fn interactive(label: &str) -> Self {
        Source::Interactive {
            label: String::from(label),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Source::File { path } => path.to_str().unwrap_or("<non-utf8 path>"),
            Source::Interactive { label } => label,
        }
    }
}

#[derive(PartialEq, Eq, Debug, Hash, Clone)]
pub struct Location {
    pub source: Source,

    /// Offset in characters from the start of the input.
    pub offset: Option<usize>,
}

#[derive(PartialEq, Eq, Debug, Hash, Clone)]
pub struct Message {
    pub content: String,
    pub addendum: Option<String>,
}

impl Message {
    pub fn new(content: String) -> Self {
        Message {
            content,
            addendum: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A collection of error messages, rendered together once a run has failed.
#[derive(Default)]
pub struct Diagnostic {
    items: Vec<Message>,
    located_items: Vec<(Location, Message)>,
    inputs: HashMap<Source, String>,
}

impl Diagnostic {
    pub fn new() -> Self {
        Diagnostic {
            items: Vec::new(),
            located_items: Vec::new(),
            inputs: HashMap::new(),
        }
    }

    /// Register the text of a source that can't be re-read from disk, such as a REPL line.
    pub fn input(&mut self, source: Source, text: &str) {
        self.inputs.insert(source, String::from(text));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.located_items.is_empty()
    }

    pub fn item(&mut self, location: Option<Location>, message: Message) {
        match location {
            None => self.items.push(message),
            Some(location) => {
                match self
                    .located_items
                    .binary_search_by_key(&location.offset, |i| i.0.offset)
                {
                    Err(ix) => self.located_items.insert(ix, (location, message)),
                    Ok(ix) => self.located_items.insert(ix + 1, (location, message)),
                }
            }
        }
    }

    pub fn report_error_heading(path: &str, position: Option<Position>, message: &str) -> String {
        let mut str = String::from(path);
        str.push(':');
        if let Some(position) = position {
            let _ = write!(str, "{}:{}:", position.line, position.column);
        }
        str.push(' ');
        str.push_str("error: ");
        str.push_str(message);
        str
    }

    pub fn report_located_message(
        line: usize,
        column: usize,
        path: &str,
        line_str: &str,
        message: &Message,
    ) -> String {
        let caret: String = {
            let mut caret: String = " ".repeat(column - 1);
            caret.push('^');
            caret
        };
        let heading =
            Self::report_error_heading(path, Some(Position { line, column }), &message.content);
        let padding: String = " ".repeat(line.to_string().len());

        let mut result = heading;
        let _ = write!(result, "\n{} |", padding);
        let _ = write!(result, "\n{} | {}", line, line_str);
        let _ = write!(result, "\n{} | {}", padding, caret);
        if let Some(addendum) = &message.addendum {
            result.push('\n');
            result.push_str(addendum);
        }
        result
    }

    /// Find the 1-based line and column of a character offset, along with the text of that line.
    pub fn locate(text: &str, offset: usize) -> Option<(Position, &str)> {
        let mut chars_before_line = 0;
        for (line_ix, line_str) in text.split('\n').enumerate() {
            let line_len = line_str.chars().count();
            // The newline itself belongs to the line it terminates.
            if offset <= chars_before_line + line_len {
                let column = offset - chars_before_line + 1;
                return Some((
                    Position {
                        line: line_ix + 1,
                        column,
                    },
                    line_str.trim_end_matches('\r'),
                ));
            }
            chars_before_line += line_len + 1;
        }
        None
    }

    fn render_located(&self, location: &Location, message: &Message) -> String {
        let path = location.source.to_str();
        let offset = match location.offset {
            None => return Self::report_error_heading(path, None, &message.content),
            Some(offset) => offset,
        };

        let text = match self.inputs.get(&location.source) {
            Some(text) => Some(text.clone()),
            None => match &location.source {
                Source::File { path } => fs::read_to_string(path).ok(),
                Source::Interactive { .. } => None,
            },
        };

        match text.as_deref().and_then(|text| Self::locate(text, offset)) {
            Some((position, line_str)) => Self::report_located_message(
                position.line,
                position.column,
                path,
                line_str,
                message,
            ),
            None => Self::report_error_heading(
                path,
                Some(Position {
                    line: 1,
                    column: offset + 1,
                }),
                &message.content,
            ),
        }
    }

    pub fn render(&self) -> Vec<String> {
        let mut rendered = Vec::with_capacity(self.items.len() + self.located_items.len());
        for message in &self.items {
            rendered.push(format!("error: {}", message.content));
        }
        for (location, message) in &self.located_items {
            rendered.push(self.render_located(location, message));
        }
        rendered
    }

    pub fn report_all(self, out: &mut dyn IoWrite) -> io::Result<()> {
        for item in self.render() {
            out.write_all(item.as_bytes())?;
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}
