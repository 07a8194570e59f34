#[cfg(test)]
mod test;

pub mod grammar;
pub mod operator;

use fixedbitset::FixedBitSet;
use std::{collections::BTreeSet, path::PathBuf};
use tidy_diagnostic::{Diagnostic, Location, Message, Source};
use tidy_lex::{
    token::{self, Token},
    Lexer,
};
use tidy_syntax::{Binop, Node};

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    Unexpected {
        source: Source,
        pos: usize,
        expecting: BTreeSet<token::Name>,
    },
    AmbiguousUseOf {
        source: Source,
        pos: usize,
        binop: Binop,
    },
    TooDeep {
        source: Source,
        pos: usize,
        limit: usize,
    },
}

impl ParseError {
    pub fn source(&self) -> Source {
        match self {
            ParseError::Unexpected { source, .. }
            | ParseError::AmbiguousUseOf { source, .. }
            | ParseError::TooDeep { source, .. } => source.clone(),
        }
    }

    pub fn position(&self) -> usize {
        match self {
            ParseError::Unexpected { pos, .. }
            | ParseError::AmbiguousUseOf { pos, .. }
            | ParseError::TooDeep { pos, .. } => *pos,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParseError::Unexpected { expecting, .. } => {
                let mut iter = expecting.iter();
                match iter.next() {
                    None => String::from("unexpected input"),
                    Some(token) => {
                        let mut str = String::from("expected one of: ");
                        str.push_str(token.render().as_str());
                        for token in iter {
                            str.push_str(", ");
                            str.push_str(token.render().as_str());
                        }
                        str
                    }
                }
            }
            ParseError::AmbiguousUseOf { binop, .. } => {
                format!("ambiguous use of operator '{}'", binop.render())
            }
            ParseError::TooDeep { limit, .. } => {
                format!("expression nested too deeply: more than {} levels", limit)
            }
        }
    }

    pub fn report(&self, diagnostic: &mut Diagnostic) {
        diagnostic.item(
            Some(Location {
                source: self.source(),
                offset: Some(self.position()),
            }),
            Message {
                content: self.message(),
                addendum: None,
            },
        )
    }
}

struct Expecting {
    bitset: FixedBitSet,
}

impl Expecting {
    fn new() -> Self {
        Expecting {
            bitset: FixedBitSet::with_capacity(token::Name::num_variants()),
        }
    }

    fn clear(&mut self) {
        self.bitset.clear();
    }

    fn insert(&mut self, t: token::Name) {
        self.bitset.insert(t.to_int());
    }

    fn to_btreeset(&self) -> BTreeSet<token::Name> {
        self.bitset.ones().filter_map(token::Name::from_int).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nesting {
    /// Inside `(...)`, where newlines are insignificant.
    Paren,
    /// Inside `{...}`, where newlines separate expressions.
    Brace,
}

/// How deeply operator chains may nest, through parentheses, braces, arguments
/// and prefix operators.
pub const MAX_NESTING: usize = 128;

pub struct Parser {
    source: Source,
    tokens: Vec<Token>,
    ix: usize,
    nesting: Vec<Nesting>,
    depth: usize,
    expecting: Expecting,
}

impl Parser {
    pub fn new(source: Source, input: Lexer) -> Self {
        let tokens: Vec<Token> = input.collect();
        Parser {
            source,
            tokens,
            ix: 0,
            nesting: Vec::new(),
            depth: 0,
            expecting: Expecting::new(),
        }
    }

    fn ignores_newlines(&self) -> bool {
        self.nesting.last() == Some(&Nesting::Paren)
    }

    fn is_nested(&self) -> bool {
        !self.nesting.is_empty()
    }

    /// The lexer always ends its output with [`token::Data::Eof`], which is never consumed.
    fn token_at(&self, ix: usize) -> &Token {
        &self.tokens[ix.min(self.tokens.len() - 1)]
    }

    fn peek(&mut self) -> &Token {
        if self.ignores_newlines() {
            self.skip_newlines();
        }
        self.token_at(self.ix)
    }

    fn peek_name(&mut self) -> token::Name {
        self.peek().data.name()
    }

    /// The name of the token after the current one.
    fn lookahead_name(&mut self) -> token::Name {
        self.peek();
        let mut ix = self.ix + 1;
        while self.ignores_newlines() && self.token_at(ix).data.name() == token::Name::Newline {
            ix += 1;
        }
        self.token_at(ix).data.name()
    }

    fn consume(&mut self) -> Token {
        let token = self.peek().clone();
        if token.data.name() != token::Name::Eof {
            self.ix += 1;
        }
        self.expecting.clear();
        token
    }

    fn skip_newlines(&mut self) {
        while self.token_at(self.ix).data.name() == token::Name::Newline {
            self.ix += 1;
        }
    }

    fn unexpected<A>(&mut self) -> Result<A, ParseError> {
        let pos = self.peek().pos;
        Err(ParseError::Unexpected {
            source: self.source.clone(),
            pos,
            expecting: self.expecting.to_btreeset(),
        })
    }

    fn expect(&mut self, expected: token::Name) -> Result<Token, ParseError> {
        self.expecting.insert(expected);
        if self.peek_name() == expected {
            Ok(self.consume())
        } else {
            self.unexpected()
        }
    }

    fn with_nesting<A, F>(&mut self, nesting: Nesting, f: F) -> Result<A, ParseError>
    where
        F: FnOnce(&mut Self) -> Result<A, ParseError>,
    {
        self.nesting.push(nesting);
        let result = f(self);
        self.nesting.pop();
        result
    }

    fn too_deep<A>(&mut self) -> Result<A, ParseError> {
        let pos = self.peek().pos;
        Err(ParseError::TooDeep {
            source: self.source.clone(),
            pos,
            limit: MAX_NESTING,
        })
    }

    fn ambiguous_use_of(&self, use_: operator::AmbiguousUse) -> ParseError {
        ParseError::AmbiguousUseOf {
            source: self.source.clone(),
            pos: use_.pos,
            binop: use_.binop,
        }
    }
}

/// Parse a single expression without evaluating it.
pub fn capture_at(source: Source, input: &str) -> Result<Node, ParseError> {
    let mut parser = Parser::new(source, Lexer::new(input));
    parser.skip_newlines();
    let node = parser.expr()?;
    parser.skip_newlines();
    parser.expect(token::Name::Eof)?;
    Ok(node)
}

pub fn capture(input: &str) -> Result<Node, ParseError> {
    capture_at(Source::interactive("(string)"), input)
}

/// Parse a sequence of expressions separated by newlines or `;`.
pub fn capture_program_at(source: Source, input: &str) -> Result<Vec<Node>, ParseError> {
    let mut parser = Parser::new(source, Lexer::new(input));
    let nodes = parser.program()?;
    parser.expect(token::Name::Eof)?;
    Ok(nodes)
}

pub fn capture_program(input: &str) -> Result<Vec<Node>, ParseError> {
    capture_program_at(Source::interactive("(string)"), input)
}

pub fn capture_file(path: PathBuf, input: &str) -> Result<Vec<Node>, ParseError> {
    capture_program_at(Source::File { path }, input)
}
