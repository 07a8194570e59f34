
use quickcheck::Arbitrary;
use std::rc::Rc;
use tidy_syntax::{Binop, Keyword};

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub enum Name {
    Unexpected,
    Ident,
    Keyword(Keyword),
    Number,
    String,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Newline,
    Dollar,
    Caret,
    Asterisk,
    Slash,
    Plus,
    Minus,
    EqEq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    AndAnd,
    Pipe,
    PipePipe,
    Tilde,
    LeftArrow,
    Walrus,
    Equals,
    Bang,
    BangBang,
    BangBangBang,
    Eof,
}

impl Name {
    pub const ALL: [Name; 41] = [
        Name::Unexpected,
        Name::Ident,
        Name::Keyword(Keyword::If),
        Name::Keyword(Keyword::Else),
        Name::Keyword(Keyword::Function),
        Name::Keyword(Keyword::True),
        Name::Keyword(Keyword::False),
        Name::Keyword(Keyword::Null),
        Name::Number,
        Name::String,
        Name::LParen,
        Name::RParen,
        Name::LBrace,
        Name::RBrace,
        Name::Comma,
        Name::Semicolon,
        Name::Newline,
        Name::Dollar,
        Name::Caret,
        Name::Asterisk,
        Name::Slash,
        Name::Plus,
        Name::Minus,
        Name::EqEq,
        Name::Neq,
        Name::Lt,
        Name::Gt,
        Name::Lte,
        Name::Gte,
        Name::And,
        Name::AndAnd,
        Name::Pipe,
        Name::PipePipe,
        Name::Tilde,
        Name::LeftArrow,
        Name::Walrus,
        Name::Equals,
        Name::Bang,
        Name::BangBang,
        Name::BangBangBang,
        Name::Eof,
    ];

    pub fn num_variants() -> usize {
        Name::ALL.len()
    }

    pub fn from_int(ix: usize) -> Option<Self> {
        Name::ALL.get(ix).copied()
    }

    pub fn to_int(&self) -> usize {
        match self {
            Name::Unexpected => 0,
            Name::Ident => 1,
            Name::Keyword(Keyword::If) => 2,
            Name::Keyword(Keyword::Else) => 3,
            Name::Keyword(Keyword::Function) => 4,
            Name::Keyword(Keyword::True) => 5,
            Name::Keyword(Keyword::False) => 6,
            Name::Keyword(Keyword::Null) => 7,
            Name::Number => 8,
            Name::String => 9,
            Name::LParen => 10,
            Name::RParen => 11,
            Name::LBrace => 12,
            Name::RBrace => 13,
            Name::Comma => 14,
            Name::Semicolon => 15,
            Name::Newline => 16,
            Name::Dollar => 17,
            Name::Caret => 18,
            Name::Asterisk => 19,
            Name::Slash => 20,
            Name::Plus => 21,
            Name::Minus => 22,
            Name::EqEq => 23,
            Name::Neq => 24,
            Name::Lt => 25,
            Name::Gt => 26,
            Name::Lte => 27,
            Name::Gte => 28,
            Name::And => 29,
            Name::AndAnd => 30,
            Name::Pipe => 31,
            Name::PipePipe => 32,
            Name::Tilde => 33,
            Name::LeftArrow => 34,
            Name::Walrus => 35,
            Name::Equals => 36,
            Name::Bang => 37,
            Name::BangBang => 38,
            Name::BangBangBang => 39,
            Name::Eof => 40,
        }
    }

    /// The binary operator this token stands for, if any.
    pub fn binop(&self) -> Option<Binop> {
        match self {
            Name::Dollar => Some(Binop::Dollar),
            Name::Caret => Some(Binop::Pow),
            Name::Asterisk => Some(Binop::Multiply),
            Name::Slash => Some(Binop::Divide),
            Name::Plus => Some(Binop::Add),
            Name::Minus => Some(Binop::Subtract),
            Name::EqEq => Some(Binop::Eq),
            Name::Neq => Some(Binop::Neq),
            Name::Lt => Some(Binop::Lt),
            Name::Gt => Some(Binop::Gt),
            Name::Lte => Some(Binop::Lte),
            Name::Gte => Some(Binop::Gte),
            Name::And => Some(Binop::And),
            Name::AndAnd => Some(Binop::AndAnd),
            Name::Pipe => Some(Binop::Or),
            Name::PipePipe => Some(Binop::OrOr),
            Name::Tilde => Some(Binop::Tilde),
            Name::LeftArrow => Some(Binop::LeftAssign),
            Name::Walrus => Some(Binop::Walrus),
            Name::Equals => Some(Binop::EqAssign),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Name::Unexpected => String::from("unexpected"),
            Name::Ident => String::from("identifier"),
            Name::Keyword(keyword) => String::from(keyword.to_string()),
            Name::Number => String::from("number"),
            Name::String => String::from("string"),
            Name::LParen => String::from("'('"),
            Name::RParen => String::from("')'"),
            Name::LBrace => String::from("'{'"),
            Name::RBrace => String::from("'}'"),
            Name::Comma => String::from("','"),
            Name::Semicolon => String::from("';'"),
            Name::Newline => String::from("newline"),
            Name::Dollar => String::from("'$'"),
            Name::Caret => String::from("'^'"),
            Name::Asterisk => String::from("'*'"),
            Name::Slash => String::from("'/'"),
            Name::Plus => String::from("'+'"),
            Name::Minus => String::from("'-'"),
            Name::EqEq => String::from("'=='"),
            Name::Neq => String::from("'!='"),
            Name::Lt => String::from("'<'"),
            Name::Gt => String::from("'>'"),
            Name::Lte => String::from("'<='"),
            Name::Gte => String::from("'>='"),
            Name::And => String::from("'&'"),
            Name::AndAnd => String::from("'&&'"),
            Name::Pipe => String::from("'|'"),
            Name::PipePipe => String::from("'||'"),
            Name::Tilde => String::from("'~'"),
            Name::LeftArrow => String::from("'<-'"),
            Name::Walrus => String::from("':='"),
            Name::Equals => String::from("'='"),
            Name::Bang => String::from("'!'"),
            Name::BangBang => String::from("'!!'"),
            Name::BangBangBang => String::from("'!!!'"),
            Name::Eof => String::from("end of input"),
        }
    }
}

impl Arbitrary for Name {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&Name::ALL).unwrap()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Data {
    Unexpected(char),

    Ident { value: Rc<str>, length: usize },
    Keyword(Keyword),
    Number { value: f64, length: usize },
    String { value: Rc<str>, length: usize },

    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Newline,

    Dollar,
    Caret,
    Asterisk,
    Slash,
    Plus,
    Minus,
    EqEq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    AndAnd,
    Pipe,
    PipePipe,
    Tilde,
    LeftArrow,
    Walrus,
    Equals,

    Bang,
    BangBang,
    BangBangBang,

    Eof,
}

impl Data {
    pub fn ident(value: &str) -> Self {
        Data::Ident {
            value: Rc::from(value),
            length: value.chars().count(),
        }
    }

    pub fn render(&self) -> String {
        match self {
            Data::Unexpected(c) => format!("{:?}", c),
            Data::Ident { value, .. } => format!("\"{}\"", value),
            Data::Number { value, .. } => tidy_syntax::print::render_number(*value),
            Data::String { value, .. } => tidy_syntax::print::render_string(value),
            _ => self.name().render(),
        }
    }

    /// The number of characters this token spans.
    pub fn length(&self) -> usize {
        match self {
            Data::Unexpected(_) => 1,
            Data::Ident { length, .. } => *length,
            Data::Keyword(keyword) => keyword.to_string().len(),
            Data::Number { length, .. } => *length,
            Data::String { length, .. } => *length,
            Data::LParen
            | Data::RParen
            | Data::LBrace
            | Data::RBrace
            | Data::Comma
            | Data::Semicolon
            | Data::Newline
            | Data::Dollar
            | Data::Caret
            | Data::Asterisk
            | Data::Slash
            | Data::Plus
            | Data::Minus
            | Data::Lt
            | Data::Gt
            | Data::And
            | Data::Pipe
            | Data::Tilde
            | Data::Equals
            | Data::Bang => 1,
            Data::EqEq
            | Data::Neq
            | Data::Lte
            | Data::Gte
            | Data::AndAnd
            | Data::PipePipe
            | Data::LeftArrow
            | Data::Walrus
            | Data::BangBang => 2,
            Data::BangBangBang => 3,
            Data::Eof => 0,
        }
    }

    pub fn name(&self) -> Name {
        match self {
            Data::Unexpected(_) => Name::Unexpected,
            Data::Ident { .. } => Name::Ident,
            Data::Keyword(keyword) => Name::Keyword(*keyword),
            Data::Number { .. } => Name::Number,
            Data::String { .. } => Name::String,
            Data::LParen => Name::LParen,
            Data::RParen => Name::RParen,
            Data::LBrace => Name::LBrace,
            Data::RBrace => Name::RBrace,
            Data::Comma => Name::Comma,
            Data::Semicolon => Name::Semicolon,
            Data::Newline => Name::Newline,
            Data::Dollar => Name::Dollar,
            Data::Caret => Name::Caret,
            Data::Asterisk => Name::Asterisk,
            Data::Slash => Name::Slash,
            Data::Plus => Name::Plus,
            Data::Minus => Name::Minus,
            Data::EqEq => Name::EqEq,
            Data::Neq => Name::Neq,
            Data::Lt => Name::Lt,
            Data::Gt => Name::Gt,
            Data::Lte => Name::Lte,
            Data::Gte => Name::Gte,
            Data::And => Name::And,
            Data::AndAnd => Name::AndAnd,
            Data::Pipe => Name::Pipe,
            Data::PipePipe => Name::PipePipe,
            Data::Tilde => Name::Tilde,
            Data::LeftArrow => Name::LeftArrow,
            Data::Walrus => Name::Walrus,
            Data::Equals => Name::Equals,
            Data::Bang => Name::Bang,
            Data::BangBang => Name::BangBang,
            Data::BangBangBang => Name::BangBangBang,
            Data::Eof => Name::Eof,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub data: Data,

    /// Offset in characters from the start of the input.
    pub pos: usize,
}
