use crate::{
    capture_argument, capture_argument_with_env, quasiquote, Binding, DataMask, Env, Error,
    Interpreter, Promise, PromiseOrigin, Quosure, Value, MAX_EVAL_DEPTH,
};
use pretty_assertions::assert_eq;
use std::{io, rc::Rc};
use tidy_parse::{capture, capture_program};
use tidy_syntax::Node;

fn run_with_output(source: &str) -> (Result<Value, Error>, String) {
    let program = capture_program(source).unwrap();
    let mut stdout = Vec::new();
    let result = {
        let mut interpreter = Interpreter::new(&mut stdout, Env::global());
        let global = interpreter.global().clone();
        interpreter.eval_program(&program, &global)
    };
    (result, String::from_utf8(stdout).unwrap())
}

fn run(source: &str) -> Result<Value, Error> {
    run_with_output(source).0
}

fn run_rendered(source: &str) -> String {
    run(source).unwrap().render()
}

#[test]
fn eval_constants() {
    assert_eq!(run("1"), Ok(Value::num(1.0)));
    assert_eq!(run("\"a\""), Ok(Value::str("a")));
    assert_eq!(run("TRUE"), Ok(Value::Bool(true)));
    assert_eq!(run("NULL"), Ok(Value::Null));
}

#[test]
fn eval_arithmetic() {
    assert_eq!(run("1 + 2 * 3"), Ok(Value::num(7.0)));
    assert_eq!(run("-2^2"), Ok(Value::num(-4.0)));
    assert_eq!(run("c(1, 2, 3) * 2"), Ok(Value::nums(vec![2.0, 4.0, 6.0])));
    assert_eq!(run("TRUE + TRUE"), Ok(Value::num(2.0)));
    assert_eq!(run("sum(c(1, 2), 3)"), Ok(Value::num(6.0)));
    assert_eq!(run("mean(c(1, 2, 3, 4))"), Ok(Value::num(2.5)));
}

#[test]
fn eval_arithmetic_named_operands() {
    assert_eq!(run("`-`(e2 = 1, e1 = 5)"), Ok(Value::num(4.0)));
    assert_eq!(run("`+`(e2 = 1, 5)"), Ok(Value::num(6.0)));
    assert_eq!(run("`-`(e1 = 3)"), Ok(Value::num(-3.0)));
    assert_eq!(
        run("`-`(x = 1, 2)"),
        Err(Error::ArityOrBinding {
            callee: Rc::from("-"),
            reason: String::from("unused argument (x = ...)"),
        })
    );
}

#[test]
fn eval_comparison_and_logic() {
    assert_eq!(run("1 < 2 && 2 < 3"), Ok(Value::Bool(true)));
    assert_eq!(run("\"a\" == \"b\""), Ok(Value::Bool(false)));
    assert_eq!(run("!(1 == 1) | TRUE"), Ok(Value::Bool(true)));
    // The right operand is never evaluated.
    assert_eq!(run("FALSE && undefined"), Ok(Value::Bool(false)));
    assert_eq!(run("TRUE || undefined"), Ok(Value::Bool(true)));
}

#[test]
fn eval_type_mismatch() {
    assert_eq!(
        run("\"a\" + 1"),
        Err(Error::TypeMismatch {
            callee: Rc::from("+"),
            expected: "a number",
            actual: "character",
        })
    );
}

#[test]
fn eval_if() {
    assert_eq!(run("if (1 > 2) \"yes\" else \"no\""), Ok(Value::str("no")));
    assert_eq!(run("if (FALSE) 1"), Ok(Value::Null));
}

#[test]
fn eval_paste() {
    assert_eq!(run("paste(\"a\", 1, TRUE)"), Ok(Value::str("a 1 TRUE")));
    assert_eq!(run("paste(\"a\", \"b\", sep = \"-\")"), Ok(Value::str("a-b")));
    assert_eq!(run("paste0(\"x\", 2)"), Ok(Value::str("x2")));
}

#[test]
fn eval_lists() {
    assert_eq!(run_rendered("list(a = 1, 2)"), "list(a = 1, 2)");
    assert_eq!(run_rendered("names(list(a = 1, b = 2))"), "list(\"a\", \"b\")");
    assert_eq!(run("names(list(1, 2))"), Ok(Value::Null));
    assert_eq!(run("list(a = 1, b = 2)$b"), Ok(Value::num(2.0)));
    assert_eq!(run("list(a = 1)$z"), Ok(Value::Null));
    assert_eq!(run("length(list(1, 2, 3))"), Ok(Value::num(3.0)));
}

#[test]
fn eval_nearest_binding() {
    assert_eq!(
        run("x <- 1\nf <- function() {\n  x <- 2\n  g <- function() x\n  g()\n}\nc(f(), x)"),
        Ok(Value::nums(vec![2.0, 1.0]))
    );
}

#[test]
fn eval_closure_argument_matching() {
    assert_eq!(
        run("f <- function(a, b) a - b; f(b = 1, 10)"),
        Ok(Value::num(9.0))
    );
    assert_eq!(
        run("f <- function(x, y = x * 2) y; f(3)"),
        Ok(Value::num(6.0))
    );
}

#[test]
fn eval_closure_arity_errors() {
    assert_eq!(
        run("f <- function(x) x; f(1, 2)"),
        Err(Error::ArityOrBinding {
            callee: Rc::from("f"),
            reason: String::from("unused argument at position 2"),
        })
    );
    assert_eq!(
        run("f <- function(x) x; f(y = 1)"),
        Err(Error::ArityOrBinding {
            callee: Rc::from("f"),
            reason: String::from("unused argument (y = ...)"),
        })
    );
    assert_eq!(
        run("f <- function(x) x; f(x = 1, x = 2)"),
        Err(Error::ArityOrBinding {
            callee: Rc::from("f"),
            reason: String::from("formal argument \"x\" matched by multiple actual arguments"),
        })
    );
    assert_eq!(
        run("f <- function(x) x; f()"),
        Err(Error::ArityOrBinding {
            callee: Rc::from("x"),
            reason: String::from("argument is missing, with no default"),
        })
    );
}

#[test]
fn eval_arguments_are_lazy() {
    assert_eq!(
        run("f <- function(x, y) x; f(1, undefined)"),
        Ok(Value::num(1.0))
    );
}

#[test]
fn eval_recursion() {
    assert_eq!(
        run("f <- function(n) if (n == 0) 0 else f(n - 1) + 1; f(30)"),
        Ok(Value::num(30.0))
    );
}

#[test]
fn eval_runaway_recursion() {
    let result = run("f <- function(n) if (n == 0) 0 else f(n - 1) + 1; f(200)");
    assert_eq!(
        result,
        Err(Error::TooDeep {
            limit: MAX_EVAL_DEPTH
        })
    );
    assert_eq!(
        run("f <- function(n) f(n + 1); f(1)"),
        Err(Error::TooDeep {
            limit: MAX_EVAL_DEPTH
        })
    );
    assert_eq!(
        run("f <- function() eval(quote(f())); f()"),
        Err(Error::TooDeep {
            limit: MAX_EVAL_DEPTH
        })
    );
}

#[test]
fn eval_depth_resets_after_error() {
    let program = capture_program("f <- function(n) f(n + 1)").unwrap();
    let mut stdout = Vec::new();
    let mut interpreter = Interpreter::new(&mut stdout, Env::global());
    let global = interpreter.global().clone();
    interpreter.eval_program(&program, &global).unwrap();
    assert!(matches!(
        interpreter.eval(&capture("f(1)").unwrap(), &global, None),
        Err(Error::TooDeep { .. })
    ));
    assert_eq!(
        interpreter.eval(&capture("1 + 1").unwrap(), &global, None),
        Ok(Value::num(2.0))
    );
}

struct FailingWriter;

impl io::Write for FailingWriter {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn eval_print_write_failure() {
    let program = capture_program("print(1)").unwrap();
    let mut stdout = FailingWriter;
    let mut interpreter = Interpreter::new(&mut stdout, Env::global());
    let global = interpreter.global().clone();
    assert_eq!(
        interpreter.eval_program(&program, &global),
        Err(Error::Io {
            message: String::from("disk full")
        })
    );
}

#[test]
fn eval_unresolved_symbol() {
    let result = run("y_unknown");
    assert_eq!(
        result,
        Err(Error::UnresolvedSymbol {
            name: Rc::from("y_unknown")
        })
    );
    assert_eq!(result.unwrap_err().message(), "object 'y_unknown' not found");
}

#[test]
fn eval_not_callable() {
    assert_eq!(
        run("x <- 1; x(2)"),
        Err(Error::NotCallable {
            callee: Node::sym("x")
        })
    );
}

#[test]
fn eval_operator_rebinding_is_lexical() {
    assert_eq!(
        run("e <- env(`+` = function(a, b) a * b)\neval(quote(2 + 3), e)"),
        Ok(Value::num(6.0))
    );
    assert_eq!(run("2 + 3"), Ok(Value::num(5.0)));
}

#[test]
fn eval_mask_does_not_rebind_callees() {
    assert_eq!(
        run("eval_tidy(quote(x + 1), list(x = 1, `+` = 5))"),
        Ok(Value::num(2.0))
    );
}

#[test]
fn eval_mask_shadows_lexical_bindings() {
    assert_eq!(
        run("x <- 100; eval_tidy(quote(x * 2), list(x = 1))"),
        Ok(Value::num(2.0))
    );
}

#[test]
fn eval_pronouns() {
    assert_eq!(
        run("eval_tidy(quote(.data$x), list(x = 5))"),
        Ok(Value::num(5.0))
    );
    assert_eq!(
        run("x <- 1; eval_tidy(quote(.env$x + x), list(x = 5))"),
        Ok(Value::num(6.0))
    );
    assert_eq!(
        run("eval_tidy(quote(.data$y), list(x = 5))"),
        Err(Error::UnresolvedSymbol {
            name: Rc::from("y")
        })
    );
}

#[test]
fn eval_data_pronoun_without_mask() {
    let result = run("x <- 1; .data$x");
    assert_eq!(
        result,
        Err(Error::AmbiguousReference {
            pronoun: Rc::from(".data"),
            name: Rc::from("x"),
        })
    );
    assert_eq!(
        result.unwrap_err().message(),
        "can't use `.data$x` outside of a data mask"
    );
}

#[test]
fn quote_does_not_unquote() {
    assert_eq!(run_rendered("quote(f(!!x))"), "f(!!x)");
}

#[test]
fn expr_unquotes_structurally() {
    assert_eq!(
        run_rendered("a <- quote(x + x)\nb <- quote(y + y)\nexpr(!!a / !!b)"),
        "(x + x) / (y + y)"
    );
}

#[test]
fn expr_leaves_nested_quote_alone() {
    assert_eq!(
        run_rendered("a <- 1; expr(f(!!a, quote(!!a)))"),
        "f(1, quote(!!a))"
    );
}

#[test]
fn unquoted_string_stays_a_constant() {
    assert_eq!(run_rendered("s <- \")\"; expr(f(!!s))"), "f(\")\")");
    assert_eq!(run("s <- \")\"; eval(expr(!!s))"), Ok(Value::str(")")));
    assert_eq!(run_rendered("sym(\")\")"), "`)`");
}

#[test]
fn unquoted_vectors_and_lists() {
    assert_eq!(run_rendered("v <- c(1, 2); expr(f(!!v))"), "f(c(1, 2))");
    assert_eq!(
        run_rendered("l <- list(a = 1, \"b\"); expr(f(!!l))"),
        "f(list(a = 1, \"b\"))"
    );
}

#[test]
fn unquote_closure_is_not_representable() {
    assert_eq!(
        run("g <- function() 1; expr(f(!!g))"),
        Err(Error::NotRepresentable {
            what: String::from("a closure as an expression"),
        })
    );
}

#[test]
fn splice_arguments() {
    assert_eq!(
        run_rendered("args <- list(1, b = quote(x)); expr(f(!!!args, z))"),
        "f(1, b = x, z)"
    );
    assert_eq!(run_rendered("expr(f(!!!NULL))"), "f()");
    assert_eq!(
        run_rendered("xs <- exprs(a, b + 1); expr(g(!!!xs))"),
        "g(a, b + 1)"
    );
}

#[test]
fn splice_outside_arguments() {
    assert_eq!(
        run("xs <- list(1); expr(!!!xs)"),
        Err(Error::NotRepresentable {
            what: String::from("`!!!xs` outside of an argument list"),
        })
    );
}

#[test]
fn walrus_names_arguments() {
    assert_eq!(
        run_rendered("nm <- \"col\"; expr(mutate(df, !!nm := x + 1))"),
        "mutate(df, col = x + 1)"
    );
    assert_eq!(
        run_rendered("nm <- sym(\"my col\"); expr(f(!!nm := 1))"),
        "f(`my col` = 1)"
    );
}

#[test]
fn call2_builds_calls() {
    assert_eq!(run_rendered("call2(\"f\", 1, b = quote(x))"), "f(1, b = x)");
    assert_eq!(run("eval(call2(\"+\", 1, 2))"), Ok(Value::num(3.0)));
}

#[test]
fn enexpr_captures_caller_code() {
    assert_eq!(
        run_rendered("f <- function(arg) enexpr(arg); f(x + y * 2)"),
        "x + y * 2"
    );
    assert_eq!(
        run_rendered("n <- 5; f <- function(arg) enexpr(arg); f(g(!!n))"),
        "g(5)"
    );
}

#[test]
fn enexpr_unbound_argument() {
    assert_eq!(
        run("f <- function(x) enexpr(x); f()"),
        Err(Error::UnboundArgument {
            name: Rc::from("x")
        })
    );
    assert_eq!(
        run("f <- function(x) enexpr(z); f(1)"),
        Err(Error::UnboundArgument {
            name: Rc::from("z")
        })
    );
}

#[test]
fn enexpr_after_forcing() {
    assert_eq!(
        run("f <- function(x) { x; enexpr(x) }; f(1 + 1)"),
        Err(Error::UnboundArgument {
            name: Rc::from("x")
        })
    );
}

#[test]
fn quosure_late_binding() {
    let source = "a <- 10
df <- list(x = c(1, 2, 3))
f <- function(q) {
  a <- 1000
  eval_tidy(q, df)
}
f(quo(x + a))";
    assert_eq!(run(source), Ok(Value::nums(vec![11.0, 12.0, 13.0])));
}

#[test]
fn enquo_keeps_the_caller_environment() {
    let source = "a <- 10
df <- list(x = c(1, 2, 3))
f <- function(e) {
  a <- 1000
  eval_tidy(enquo(e), df)
}
f(x + a)";
    assert_eq!(run(source), Ok(Value::nums(vec![11.0, 12.0, 13.0])));
}

#[test]
fn enexpr_loses_the_caller_environment() {
    let source = "a <- 10
df <- list(x = c(1, 2, 3))
f <- function(e) {
  a <- 1000
  eval_tidy(enexpr(e), df)
}
f(x + a)";
    assert_eq!(run(source), Ok(Value::nums(vec![1001.0, 1002.0, 1003.0])));
}

#[test]
fn quosure_accessors() {
    assert_eq!(run_rendered("quo(x + 1)"), "<quosure: ^x + 1>");
    assert_eq!(run_rendered("quo_get_expr(quo(f(y)))"), "f(y)");
    assert_eq!(
        run("identical(quo_get_env(quo(x)), global_env())"),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        run("e <- env(x = 2); q <- new_quosure(quote(x * 3), e); eval_tidy(q)"),
        Ok(Value::num(6.0))
    );
    assert_eq!(run("is_quosure(quo(x))"), Ok(Value::Bool(true)));
    assert_eq!(run("as_label(quo(my_var))"), Ok(Value::str("my_var")));
    assert_eq!(run("expr_text(quote(f(x, 1)))"), Ok(Value::str("f(x, 1)")));
}

#[test]
fn environments() {
    assert_eq!(run("e <- env(a = 1); e$a"), Ok(Value::num(1.0)));
    assert_eq!(
        run("e <- new_environment(list(a = 1)); eval(quote(a + 1), e)"),
        Ok(Value::num(2.0))
    );
    assert_eq!(
        run("f <- function() current_env(); identical(env_parent(f()), global_env())"),
        Ok(Value::Bool(true))
    );
}

#[test]
fn print_writes_to_the_interpreter_output() {
    let (result, output) = run_with_output("print(c(1, 2, 3))\nprint(quote(a + b))");
    assert_eq!(result, Ok(Value::Lang(capture("a + b").unwrap())));
    assert_eq!(output, "1 2 3\na + b\n");
}

#[test]
fn quasiquote_from_rust() {
    let env = Env::new(
        Some(&Env::global()),
        vec![(Rc::<str>::from("a"), Value::Lang(capture("x + x").unwrap()))],
    );
    let template = capture("!!a * 2").unwrap();
    let mut stdout = Vec::new();
    let mut interpreter = Interpreter::new(&mut stdout, Env::global());
    let result = quasiquote(&mut interpreter, &template, &env, None).unwrap();
    assert_eq!(result.render(), "(x + x) * 2");
}

#[test]
fn eval_with_mask_from_rust() {
    let mask: DataMask = vec![(Rc::<str>::from("x"), Value::num(2.0))].into_iter().collect();
    let mut stdout = Vec::new();
    let mut interpreter = Interpreter::new(&mut stdout, Env::global());
    let global = interpreter.global().clone();
    let node = capture("x * 10").unwrap();
    assert_eq!(
        interpreter.eval(&node, &global, Some(&mask)),
        Ok(Value::num(20.0))
    );
    let quosure = Quosure::new(node, global.clone());
    assert_eq!(interpreter.eval_quosure(&quosure, Some(&mask)), Ok(Value::num(20.0)));
}

#[test]
fn capture_argument_from_rust() {
    let caller = Env::global();
    let frame = caller.child("f");
    let expr = capture("x + 1").unwrap();
    frame.bind(
        Rc::from("arg"),
        Binding::Promise(Rc::new(Promise::new(
            expr.clone(),
            caller.clone(),
            None,
            PromiseOrigin::Argument,
        ))),
    );
    frame.bind(Rc::from("missing"), Binding::Missing);

    assert_eq!(capture_argument(&frame, "arg"), Ok(expr.clone()));
    assert_eq!(
        capture_argument_with_env(&frame, "arg"),
        Ok(Quosure::new(expr, caller))
    );
    assert_eq!(
        capture_argument(&frame, "missing"),
        Err(Error::UnboundArgument {
            name: Rc::from("missing")
        })
    );
    assert_eq!(
        capture_argument(&frame, "other"),
        Err(Error::UnboundArgument {
            name: Rc::from("other")
        })
    );
}
