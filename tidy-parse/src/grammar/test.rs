use crate::{capture, capture_program, ParseError, MAX_NESTING};
use pretty_assertions::assert_eq;
use tidy_diagnostic::Source;
use tidy_lex::token::Name;
use tidy_syntax::{Arg, Binop, Node, Unop};

fn parse_expr(input: &str) -> Node {
    match capture(input) {
        Ok(node) => node,
        Err(err) => panic!("failed to parse {:?}: {}", input, err.message()),
    }
}

#[test]
fn parse_precedence() {
    assert_eq!(
        parse_expr("1 + 2 * 3"),
        Node::mk_binop(
            Binop::Add,
            Node::num(1.0),
            Node::mk_binop(Binop::Multiply, Node::num(2.0), Node::num(3.0))
        )
    )
}

#[test]
fn parse_unary_minus_below_pow() {
    assert_eq!(
        parse_expr("-2^2"),
        Node::mk_unop(
            Unop::Minus,
            Node::mk_binop(Binop::Pow, Node::num(2.0), Node::num(2.0))
        )
    )
}

#[test]
fn parse_not_binds_loosely() {
    assert_eq!(
        parse_expr("!a == b & c"),
        Node::mk_binop(
            Binop::And,
            Node::mk_unop(
                Unop::Not,
                Node::mk_binop(Binop::Eq, Node::sym("a"), Node::sym("b"))
            ),
            Node::sym("c")
        )
    )
}

#[test]
fn parse_unquote_binds_tightly() {
    assert_eq!(
        parse_expr("!!a / !!b"),
        Node::mk_binop(
            Binop::Divide,
            Node::mk_unquote(Node::sym("a")),
            Node::mk_unquote(Node::sym("b"))
        )
    )
}

#[test]
fn parse_splice() {
    assert_eq!(
        parse_expr("f(!!!args)"),
        Node::call2("f", vec![Arg::positional(Node::mk_splice(Node::sym("args")))])
    )
}

#[test]
fn parse_separated_bangs() {
    assert_eq!(
        parse_expr("! !x"),
        Node::mk_unop(Unop::Not, Node::mk_unop(Unop::Not, Node::sym("x")))
    )
}

#[test]
fn parse_walrus() {
    assert_eq!(
        parse_expr("list(!!nm := 1)"),
        Node::call2(
            "list",
            vec![Arg::positional(Node::mk_binop(
                Binop::Walrus,
                Node::mk_unquote(Node::sym("nm")),
                Node::num(1.0)
            ))]
        )
    )
}

#[test]
fn parse_named_args() {
    assert_eq!(
        parse_expr("mean(x, na.rm = TRUE, \"sep\" = 1)"),
        Node::call2(
            "mean",
            vec![
                Arg::positional(Node::sym("x")),
                Arg::named("na.rm", Node::bool(true)),
                Arg::named("sep", Node::num(1.0)),
            ]
        )
    )
}

#[test]
fn parse_empty_args() {
    assert_eq!(parse_expr("f()"), Node::call2("f", vec![]));
    assert_eq!(
        parse_expr("f(x, )"),
        Node::call2(
            "f",
            vec![Arg::positional(Node::sym("x")), Arg::positional(Node::Missing)]
        )
    );
    assert_eq!(
        parse_expr("f(x = )"),
        Node::call2("f", vec![Arg::named("x", Node::Missing)])
    )
}

#[test]
fn parse_paren_is_a_call() {
    assert_eq!(
        parse_expr("(a + b) * c"),
        Node::mk_binop(
            Binop::Multiply,
            Node::mk_paren(Node::mk_binop(Binop::Add, Node::sym("a"), Node::sym("b"))),
            Node::sym("c")
        )
    )
}

#[test]
fn parse_dollar() {
    assert_eq!(
        parse_expr(".data$x + .env$y"),
        Node::mk_binop(
            Binop::Add,
            Node::mk_binop(Binop::Dollar, Node::sym(".data"), Node::sym("x")),
            Node::mk_binop(Binop::Dollar, Node::sym(".env"), Node::sym("y"))
        )
    )
}

#[test]
fn parse_call_of_call() {
    assert_eq!(
        parse_expr("f(1)(2)"),
        Node::call(
            Node::call2("f", vec![Arg::positional(Node::num(1.0))]),
            vec![Arg::positional(Node::num(2.0))]
        )
    )
}

#[test]
fn parse_function() {
    assert_eq!(
        parse_expr("function(x, y = 2) x + y"),
        Node::mk_function(
            vec![Arg::named("x", Node::Missing), Arg::named("y", Node::num(2.0))],
            Node::mk_binop(Binop::Add, Node::sym("x"), Node::sym("y"))
        )
    )
}

#[test]
fn parse_assignment_of_function() {
    assert_eq!(
        parse_expr("f <- function(x) x"),
        Node::mk_binop(
            Binop::LeftAssign,
            Node::sym("f"),
            Node::mk_function(vec![Arg::named("x", Node::Missing)], Node::sym("x"))
        )
    )
}

#[test]
fn parse_block() {
    assert_eq!(
        parse_expr("{\n  a <- 1; b <- 2\n\n  a + b\n}"),
        Node::mk_block(vec![
            Node::mk_binop(Binop::LeftAssign, Node::sym("a"), Node::num(1.0)),
            Node::mk_binop(Binop::LeftAssign, Node::sym("b"), Node::num(2.0)),
            Node::mk_binop(Binop::Add, Node::sym("a"), Node::sym("b")),
        ])
    )
}

#[test]
fn parse_newlines_in_parens() {
    assert_eq!(
        parse_expr("f(a,\n  b\n)"),
        Node::call2(
            "f",
            vec![Arg::positional(Node::sym("a")), Arg::positional(Node::sym("b"))]
        )
    )
}

#[test]
fn parse_if_else_in_block() {
    assert_eq!(
        parse_expr("{\n  if (x) 1\n  else 2\n}"),
        Node::mk_block(vec![Node::mk_if(
            Node::sym("x"),
            Node::num(1.0),
            Some(Node::num(2.0))
        )])
    )
}

#[test]
fn parse_continuation_after_operator() {
    assert_eq!(
        capture_program("a <- 1 +\n  2\nb"),
        Ok(vec![
            Node::mk_binop(
                Binop::LeftAssign,
                Node::sym("a"),
                Node::mk_binop(Binop::Add, Node::num(1.0), Node::num(2.0))
            ),
            Node::sym("b")
        ])
    )
}

#[test]
fn parse_top_level_else_on_new_line() {
    assert_eq!(
        capture_program("if (x) 1\nelse 2"),
        Err(ParseError::Unexpected {
            source: Source::interactive("(string)"),
            pos: 9,
            expecting: vec![
                Name::Eof,
                Name::Ident,
                Name::Number,
                Name::String,
                Name::LParen,
                Name::LBrace
            ]
            .into_iter()
            .collect()
        })
    )
}

#[test]
fn parse_missing_close_paren() {
    assert_eq!(
        capture("f(x y)"),
        Err(ParseError::Unexpected {
            source: Source::interactive("(string)"),
            pos: 4,
            expecting: vec![Name::Comma, Name::RParen].into_iter().collect()
        })
    )
}

#[test]
fn parse_chained_comparison() {
    assert_eq!(
        capture("a == b == c"),
        Err(ParseError::AmbiguousUseOf {
            source: Source::interactive("(string)"),
            pos: 7,
            binop: Binop::Eq
        })
    )
}

#[test]
fn parse_deep_parens() {
    let input = format!("{}x{}", "(".repeat(127), ")".repeat(127));
    assert!(capture(&input).is_ok());

    let input = format!("{}x{}", "(".repeat(2000), ")".repeat(2000));
    assert_eq!(
        capture(&input),
        Err(ParseError::TooDeep {
            source: Source::interactive("(string)"),
            pos: 128,
            limit: MAX_NESTING
        })
    )
}

#[test]
fn parse_deep_prefix_operators() {
    let input = format!("{}1", "-".repeat(5000));
    assert!(matches!(capture(&input), Err(ParseError::TooDeep { .. })));

    let input = format!("{}1{}", "{".repeat(1000), "}".repeat(1000));
    assert_eq!(
        capture(&input).map_err(|err| err.message()),
        Err(String::from("expression nested too deeply: more than 128 levels"))
    )
}

#[test]
fn parse_backtick_callee() {
    assert_eq!(
        parse_expr("`+`(1, 2)"),
        Node::mk_binop(Binop::Add, Node::num(1.0), Node::num(2.0))
    )
}
