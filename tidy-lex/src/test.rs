use crate::{
    token::{Data, Token},
    Lexer,
};
use pretty_assertions::assert_eq;
use std::rc::Rc;
use tidy_syntax::Keyword;

fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

fn lex_data(input: &str) -> Vec<Data> {
    Lexer::new(input).map(|token| token.data).collect()
}

#[test]
fn lex_assignment() {
    assert_eq!(
        lex("x <- 1"),
        vec![
            Token {
                data: Data::ident("x"),
                pos: 0
            },
            Token {
                data: Data::LeftArrow,
                pos: 2
            },
            Token {
                data: Data::Number {
                    value: 1.0,
                    length: 1
                },
                pos: 5
            },
            Token {
                data: Data::Eof,
                pos: 6
            }
        ]
    )
}

#[test]
fn lex_idents() {
    assert_eq!(
        lex_data(".data my_var x.1 ."),
        vec![
            Data::ident(".data"),
            Data::ident("my_var"),
            Data::ident("x.1"),
            Data::ident("."),
            Data::Eof
        ]
    )
}

#[test]
fn lex_keywords() {
    assert_eq!(
        lex_data("if else function TRUE FALSE NULL"),
        vec![
            Data::Keyword(Keyword::If),
            Data::Keyword(Keyword::Else),
            Data::Keyword(Keyword::Function),
            Data::Keyword(Keyword::True),
            Data::Keyword(Keyword::False),
            Data::Keyword(Keyword::Null),
            Data::Eof
        ]
    )
}

#[test]
fn lex_backtick_name() {
    assert_eq!(
        lex_data("`my var` `if` `)`"),
        vec![
            Data::Ident {
                value: Rc::from("my var"),
                length: 8
            },
            Data::Ident {
                value: Rc::from("if"),
                length: 4
            },
            Data::Ident {
                value: Rc::from(")"),
                length: 3
            },
            Data::Eof
        ]
    )
}

#[test]
fn lex_numbers() {
    assert_eq!(
        lex_data("12 0.5 .5 1e3 2.5e-1 10L"),
        vec![
            Data::Number {
                value: 12.0,
                length: 2
            },
            Data::Number {
                value: 0.5,
                length: 3
            },
            Data::Number {
                value: 0.5,
                length: 2
            },
            Data::Number {
                value: 1000.0,
                length: 3
            },
            Data::Number {
                value: 0.25,
                length: 6
            },
            Data::Number {
                value: 10.0,
                length: 3
            },
            Data::Eof
        ]
    )
}

#[test]
fn lex_strings() {
    assert_eq!(
        lex_data(r#""a\"b" 'c\n'"#),
        vec![
            Data::String {
                value: Rc::from("a\"b"),
                length: 6
            },
            Data::String {
                value: Rc::from("c\n"),
                length: 5
            },
            Data::Eof
        ]
    )
}

#[test]
fn lex_unterminated_string() {
    assert_eq!(
        lex("f(\"abc"),
        vec![
            Token {
                data: Data::ident("f"),
                pos: 0
            },
            Token {
                data: Data::LParen,
                pos: 1
            },
            Token {
                data: Data::Unexpected('"'),
                pos: 2
            },
            Token {
                data: Data::Eof,
                pos: 6
            }
        ]
    )
}

#[test]
fn lex_bangs() {
    assert_eq!(
        lex_data("!x !!x !!!x a != b"),
        vec![
            Data::Bang,
            Data::ident("x"),
            Data::BangBang,
            Data::ident("x"),
            Data::BangBangBang,
            Data::ident("x"),
            Data::ident("a"),
            Data::Neq,
            Data::ident("b"),
            Data::Eof
        ]
    )
}

#[test]
fn lex_operators() {
    assert_eq!(
        lex_data("= == < <= > >= & && | || ~ := $ ^ * / + -"),
        vec![
            Data::Equals,
            Data::EqEq,
            Data::Lt,
            Data::Lte,
            Data::Gt,
            Data::Gte,
            Data::And,
            Data::AndAnd,
            Data::Pipe,
            Data::PipePipe,
            Data::Tilde,
            Data::Walrus,
            Data::Dollar,
            Data::Caret,
            Data::Asterisk,
            Data::Slash,
            Data::Plus,
            Data::Minus,
            Data::Eof
        ]
    )
}

#[test]
fn lex_comments_and_newlines() {
    assert_eq!(
        lex_data("a # comment\n{b; c}"),
        vec![
            Data::ident("a"),
            Data::Newline,
            Data::LBrace,
            Data::ident("b"),
            Data::Semicolon,
            Data::ident("c"),
            Data::RBrace,
            Data::Eof
        ]
    )
}

#[test]
fn lex_lone_colon() {
    assert_eq!(
        lex_data("a : b"),
        vec![
            Data::ident("a"),
            Data::Unexpected(':'),
            Data::ident("b"),
            Data::Eof
        ]
    )
}

#[test]
fn lex_long_blank_run() {
    let input = format!("1{}+ 2", " ".repeat(300_000));
    assert_eq!(
        lex(&input),
        vec![
            Token {
                data: Data::Number {
                    value: 1.0,
                    length: 1
                },
                pos: 0
            },
            Token {
                data: Data::Plus,
                pos: 300_001
            },
            Token {
                data: Data::Number {
                    value: 2.0,
                    length: 1
                },
                pos: 300_003
            },
            Token {
                data: Data::Eof,
                pos: 300_004
            }
        ]
    )
}

#[test]
fn lex_trailing_comment() {
    assert_eq!(
        lex_data("a  # one\n  # two"),
        vec![Data::ident("a"), Data::Newline, Data::Eof]
    )
}
