use crate::{capture, capture_file, capture_program, ParseError};
use pretty_assertions::assert_eq;
use quickcheck_macros::quickcheck;
use std::path::PathBuf;
use tidy_diagnostic::{Diagnostic, Source};
use tidy_lex::token::Name;
use tidy_syntax::{Arg, Binop, Node};

#[quickcheck]
fn prop_print_capture_round_trip(node: Node) -> bool {
    let printed = node.render();
    match capture(&printed) {
        Ok(captured) => captured.render() == printed,
        Err(err) => panic!("failed to capture {:?}: {}", printed, err.message()),
    }
}

fn assert_round_trip(input: &str) {
    match capture(input) {
        Ok(node) => assert_eq!(node.render(), input),
        Err(err) => panic!("failed to capture {:?}: {}", input, err.message()),
    }
}

#[test]
fn round_trip_fixed_cases() {
    assert_round_trip("x + y * z");
    assert_round_trip("(x + y) * z");
    assert_round_trip("-x^2");
    assert_round_trip("f(x, na.rm = TRUE)");
    assert_round_trip("quo(mean(!!x))");
    assert_round_trip("list(!!!args, !!nm := 1)");
    assert_round_trip(".data$x + .env$y");
    assert_round_trip("`my var` + 1");
    assert_round_trip("paste(\"a\\\"b\", \")\")");
    assert_round_trip("function(x, y = 1) x + y");
    assert_round_trip("if (x > 1) \"big\" else \"small\"");
    assert_round_trip("x ~ y + z");
}

#[test]
fn round_trip_block() {
    assert_round_trip(&["function(x) {", "    y <- x * 2", "    y + 1", "}"].join("\n"))
}

#[test]
fn capture_does_not_evaluate() {
    assert_eq!(
        capture("undefined_function(undefined_variable)"),
        Ok(Node::call2(
            "undefined_function",
            vec![Arg::positional(Node::sym("undefined_variable"))]
        ))
    )
}

#[test]
fn capture_surrounding_newlines() {
    assert_eq!(capture("\n\nx\n"), Ok(Node::sym("x")))
}

#[test]
fn capture_rejects_two_expressions() {
    assert_eq!(
        capture("x\ny"),
        Err(ParseError::Unexpected {
            source: Source::interactive("(string)"),
            pos: 2,
            expecting: vec![Name::Eof].into_iter().collect()
        })
    )
}

#[test]
fn capture_program_statements() {
    assert_eq!(
        capture_program("a <- 10; b <- 20\n\na + b\n"),
        Ok(vec![
            Node::mk_binop(Binop::LeftAssign, Node::sym("a"), Node::num(10.0)),
            Node::mk_binop(Binop::LeftAssign, Node::sym("b"), Node::num(20.0)),
            Node::mk_binop(Binop::Add, Node::sym("a"), Node::sym("b")),
        ])
    )
}

#[test]
fn capture_empty_program() {
    assert_eq!(capture_program("# nothing here\n"), Ok(vec![]))
}

#[test]
fn unexpected_message() {
    let err = capture("f(x y)").unwrap_err();
    assert_eq!(err.message(), "expected one of: ')', ','")
}

#[test]
fn ambiguous_message() {
    let err = capture("a == b == c").unwrap_err();
    assert_eq!(err.message(), "ambiguous use of operator '=='")
}

#[test]
fn report_unterminated_string() {
    let input = "x <- \"abc";
    let err = capture_file(PathBuf::from("script.R"), input).unwrap_err();
    let mut diagnostic = Diagnostic::new();
    diagnostic.input(
        Source::File {
            path: PathBuf::from("script.R"),
        },
        input,
    );
    err.report(&mut diagnostic);
    assert_eq!(
        diagnostic.render(),
        vec![[
            "script.R:1:6: error: expected one of: identifier, number, string, '(', '{'",
            "  |",
            "1 | x <- \"abc",
            "  |      ^",
        ]
        .join("\n")]
    )
}
