#![deny(unused_crate_dependencies)]

#[cfg(test)]
mod test;

pub mod token;

use std::{iter::Peekable, rc::Rc, str::Chars};
use tidy_syntax::Keyword;
use token::{Data, Token};

pub struct Lexer<'input> {
    pos: usize,
    current: Option<char>,
    input: Peekable<Chars<'input>>,
    is_eof: bool,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '.'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_'
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        let mut input = input.chars().peekable();
        Lexer {
            pos: 0,
            current: input.next(),
            input,
            is_eof: false,
        }
    }

    fn consume(&mut self) {
        self.current = self.input.next();
        self.pos += 1;
    }

    fn lookahead(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn token(&self, data: Data, pos: usize) -> Option<Token> {
        Some(Token { data, pos })
    }

    /// Consume `c` if it's the current character.
    fn consume_if(&mut self, c: char) -> bool {
        if self.current == Some(c) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn consume_digits(&mut self, text: &mut String) {
        while let Some(c) = self.current {
            if c.is_ascii_digit() {
                text.push(c);
                self.consume();
            } else {
                break;
            }
        }
    }

    fn number(&mut self, pos: usize) -> Option<Token> {
        let mut text = String::new();
        self.consume_digits(&mut text);
        if self.current == Some('.') {
            text.push('.');
            self.consume();
            self.consume_digits(&mut text);
        }
        if let Some(e @ ('e' | 'E')) = self.current {
            if matches!(self.lookahead(), Some(c) if c.is_ascii_digit() || c == '+' || c == '-') {
                text.push(e);
                self.consume();
                if let Some(sign @ ('+' | '-')) = self.current {
                    text.push(sign);
                    self.consume();
                }
                let before = text.len();
                self.consume_digits(&mut text);
                if text.len() == before {
                    return self.token(Data::Unexpected(e), self.pos);
                }
            }
        }
        let mut length = text.chars().count();
        // Integer literals are read as doubles.
        if self.consume_if('L') {
            length += 1;
        }
        match text.parse::<f64>() {
            Ok(value) => self.token(Data::Number { value, length }, pos),
            Err(_) => self.token(Data::Unexpected('.'), pos),
        }
    }

    fn ident(&mut self, pos: usize) -> Option<Token> {
        let mut ident = String::new();
        while let Some(c) = self.current {
            if is_ident_continue(c) {
                ident.push(c);
                self.consume();
            } else {
                break;
            }
        }
        let data = match Keyword::from_string(&ident) {
            Some(keyword) => Data::Keyword(keyword),
            None => Data::Ident {
                length: ident.chars().count(),
                value: Rc::from(ident),
            },
        };
        self.token(data, pos)
    }

    /// Read the contents of a string or backtick-quoted name, starting at the opening quote.
    fn quoted(&mut self, quote: char, pos: usize) -> Result<(String, usize), Token> {
        self.consume();
        let mut value = String::new();
        loop {
            match self.current {
                None => {
                    return Err(Token {
                        data: Data::Unexpected(quote),
                        pos,
                    })
                }
                Some(c) if c == quote => {
                    self.consume();
                    break;
                }
                Some('\\') => {
                    let escape_pos = self.pos;
                    self.consume();
                    let escaped = match self.current {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some(c @ ('\\' | '"' | '\'' | '`')) => c,
                        _ => {
                            return Err(Token {
                                data: Data::Unexpected('\\'),
                                pos: escape_pos,
                            })
                        }
                    };
                    self.consume();
                    value.push(escaped);
                }
                Some(c) => {
                    self.consume();
                    value.push(c);
                }
            }
        }
        // Both quotes are part of the token.
        Ok((value, self.pos - pos))
    }

    fn string(&mut self, quote: char, pos: usize) -> Option<Token> {
        match self.quoted(quote, pos) {
            Ok((value, length)) => self.token(
                Data::String {
                    value: Rc::from(value),
                    length,
                },
                pos,
            ),
            Err(token) => Some(token),
        }
    }

    fn backtick(&mut self, pos: usize) -> Option<Token> {
        match self.quoted('`', pos) {
            Ok((value, length)) => self.token(
                Data::Ident {
                    value: Rc::from(value),
                    length,
                },
                pos,
            ),
            Err(token) => Some(token),
        }
    }

    fn bangs(&mut self, pos: usize) -> Option<Token> {
        self.consume();
        if self.consume_if('=') {
            return self.token(Data::Neq, pos);
        }
        if !self.consume_if('!') {
            return self.token(Data::Bang, pos);
        }
        if !self.consume_if('!') {
            return self.token(Data::BangBang, pos);
        }
        self.token(Data::BangBangBang, pos)
    }

    /// Skip spaces and comments, stopping at a newline.
    fn skip_blanks(&mut self) {
        loop {
            match self.current {
                Some(' ' | '\t' | '\r') => self.consume(),
                Some('#') => {
                    while !matches!(self.current, None | Some('\n')) {
                        self.consume();
                    }
                }
                _ => break,
            }
        }
    }

    /// Lex a one or two character operator. `second` is the optional second character
    /// and the token it produces.
    fn operator(&mut self, pos: usize, single: Data, second: &[(char, Data)]) -> Option<Token> {
        self.consume();
        for (c, data) in second {
            if self.consume_if(*c) {
                return self.token(data.clone(), pos);
            }
        }
        self.token(single, pos)
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.skip_blanks();
        let pos = self.pos;

        let c = match self.current {
            None => {
                return if self.is_eof {
                    None
                } else {
                    self.is_eof = true;
                    self.token(Data::Eof, pos)
                };
            }
            Some(c) => c,
        };

        match c {
            '\n' => {
                self.consume();
                self.token(Data::Newline, pos)
            }
            '0'..='9' => self.number(pos),
            '.' if matches!(self.lookahead(), Some(c) if c.is_ascii_digit()) => self.number(pos),
            c if is_ident_start(c) => self.ident(pos),
            '"' | '\'' => self.string(c, pos),
            '`' => self.backtick(pos),
            '(' => self.operator(pos, Data::LParen, &[]),
            ')' => self.operator(pos, Data::RParen, &[]),
            '{' => self.operator(pos, Data::LBrace, &[]),
            '}' => self.operator(pos, Data::RBrace, &[]),
            ',' => self.operator(pos, Data::Comma, &[]),
            ';' => self.operator(pos, Data::Semicolon, &[]),
            '$' => self.operator(pos, Data::Dollar, &[]),
            '^' => self.operator(pos, Data::Caret, &[]),
            '*' => self.operator(pos, Data::Asterisk, &[]),
            '/' => self.operator(pos, Data::Slash, &[]),
            '+' => self.operator(pos, Data::Plus, &[]),
            '-' => self.operator(pos, Data::Minus, &[]),
            '~' => self.operator(pos, Data::Tilde, &[]),
            '=' => self.operator(pos, Data::Equals, &[('=', Data::EqEq)]),
            '<' => self.operator(
                pos,
                Data::Lt,
                &[('=', Data::Lte), ('-', Data::LeftArrow)],
            ),
            '>' => self.operator(pos, Data::Gt, &[('=', Data::Gte)]),
            '&' => self.operator(pos, Data::And, &[('&', Data::AndAnd)]),
            '|' => self.operator(pos, Data::Pipe, &[('|', Data::PipePipe)]),
            ':' => {
                self.consume();
                if self.consume_if('=') {
                    self.token(Data::Walrus, pos)
                } else {
                    self.token(Data::Unexpected(':'), pos)
                }
            }
            '!' => self.bangs(pos),
            c => {
                self.consume();
                self.token(Data::Unexpected(c), pos)
            }
        }
    }
}
