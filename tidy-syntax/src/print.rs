//! Render a [`Node`] as source text that parses back to the same tree.

use crate::{is_reserved, Arg, Assoc, Binop, Literal, Node, Unop, UNQUOTE_PRECEDENCE};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SYNTACTIC_NAME: Regex =
        Regex::new(r"^(?:[A-Za-z]|\.(?:[A-Za-z._]|$))[A-Za-z0-9._]*$").unwrap();
}

/// Whether `name` can be written without backticks.
pub fn is_syntactic(name: &str) -> bool {
    SYNTACTIC_NAME.is_match(name) && !is_reserved(name)
}

/// The way a call node is printed when it isn't printed as `f(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Binary(Binop),
    Prefix(Unop),
    /// `!!` or `!!!`
    Bang(usize),
    /// A negative numeric constant, which prints like unary minus.
    Negative,
    /// `if` and `function`, which extend as far to the right as possible.
    Keyword,
}

impl Operator {
    fn precedence(&self) -> u16 {
        match self {
            Operator::Binary(op) => op.precedence(),
            Operator::Prefix(op) => op.precedence(),
            Operator::Bang(_) | Operator::Negative => UNQUOTE_PRECEDENCE,
            Operator::Keyword => 0,
        }
    }

    fn is_prefix(&self) -> bool {
        !matches!(self, Operator::Binary(_))
    }
}

fn bang_count(node: &Node) -> (usize, &Node) {
    let mut count = 0;
    let mut current = node;
    while count < 3 {
        match current.bang_operand() {
            Some(operand) => {
                count += 1;
                current = operand;
            }
            None => break,
        }
    }
    (count, current)
}

fn operator(node: &Node) -> Option<Operator> {
    match node {
        Node::Constant(Literal::Num(value)) if value.is_sign_negative() && *value != 0.0 => {
            Some(Operator::Negative)
        }
        Node::Call(call) => {
            if let Some((op, _, rhs)) = node.binop_operands() {
                if op == Binop::Dollar
                    && !matches!(rhs, Node::Symbol(_) | Node::Constant(Literal::Str(_)))
                {
                    return None;
                }
                return Some(Operator::Binary(op));
            }
            let name = node.callee_name()?;
            match call.args.as_slice() {
                [Arg { name: None, .. }] => {
                    if name == "!" {
                        let (count, _) = bang_count(node);
                        if count >= 2 {
                            return Some(Operator::Bang(count));
                        }
                    }
                    Unop::from_name(name).map(Operator::Prefix)
                }
                _ => match name {
                    "if" if is_if(node) => Some(Operator::Keyword),
                    "function" if is_function(node) => Some(Operator::Keyword),
                    _ => None,
                },
            }
        }
        _ => None,
    }
}

fn positional(args: &[Arg]) -> bool {
    args.iter().all(|arg| arg.name.is_none())
}

fn is_if(node: &Node) -> bool {
    match node.as_call() {
        Some(call) => matches!(call.args.len(), 2 | 3) && positional(&call.args),
        None => false,
    }
}

fn is_function(node: &Node) -> bool {
    match node.as_call() {
        Some(call) => {
            positional(&call.args)
                && matches!(
                    call.args.as_slice(),
                    [Arg {
                        value: Node::PairList(_),
                        ..
                    }, _]
                )
        }
        None => false,
    }
}

pub fn render(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

pub fn render_name(name: &str) -> String {
    let mut out = String::new();
    write_name(&mut out, name);
    out
}

/// Numbers print the shortest way that reads back as the same value.
pub fn render_number(value: f64) -> String {
    if value.is_nan() {
        String::from("NaN")
    } else if value.is_infinite() {
        String::from(if value > 0.0 { "Inf" } else { "-Inf" })
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

pub fn render_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn write_name(out: &mut String, name: &str) {
    if is_syntactic(name) {
        out.push_str(name);
    } else {
        out.push('`');
        for c in name.chars() {
            match c {
                '`' => out.push_str("\\`"),
                '\\' => out.push_str("\\\\"),
                c => out.push(c),
            }
        }
        out.push('`');
    }
}

fn write_literal(out: &mut String, literal: &Literal) {
    match literal {
        Literal::Null => out.push_str("NULL"),
        Literal::Bool(true) => out.push_str("TRUE"),
        Literal::Bool(false) => out.push_str("FALSE"),
        Literal::Num(value) => out.push_str(&render_number(*value)),
        Literal::Str(value) => out.push_str(&render_string(value)),
    }
}

fn write_parenthesised(out: &mut String, node: &Node, parens: bool) {
    if parens {
        out.push('(');
        write_node(out, node);
        out.push(')');
    } else {
        write_node(out, node);
    }
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Constant(literal) => write_literal(out, literal),
        Node::Symbol(name) => write_name(out, name),
        Node::Missing => {}
        Node::PairList(args) => {
            out.push_str("pairlist(");
            write_args(out, args);
            out.push(')');
        }
        Node::Call(call) => match operator(node) {
            Some(Operator::Binary(op)) => {
                write_binop(out, op, &call.args[0].value, &call.args[1].value)
            }
            Some(Operator::Prefix(op)) => {
                let operand = &call.args[0].value;
                out.push_str(op.render());
                let parens =
                    operator(operand).map_or(false, |child| child.precedence() < op.precedence());
                write_parenthesised(out, operand, parens);
            }
            Some(Operator::Bang(_)) => {
                let (count, operand) = bang_count(node);
                out.push_str(&"!".repeat(count));
                let parens = operator(operand)
                    .map_or(false, |child| child.precedence() < UNQUOTE_PRECEDENCE);
                write_parenthesised(out, operand, parens);
            }
            Some(Operator::Negative) => unreachable!("negative constants aren't calls"),
            Some(Operator::Keyword) => {
                if node.is_call_to("if") {
                    write_if(out, &call.args)
                } else {
                    write_function(out, &call.args)
                }
            }
            None => write_call(out, &call.callee, &call.args),
        },
    }
}

fn write_binop(out: &mut String, op: Binop, lhs: &Node, rhs: &Node) {
    let precedence = op.precedence();
    let lhs_parens = match operator(lhs) {
        Some(child) if child.is_prefix() => child.precedence() <= precedence,
        Some(child) => {
            child.precedence() < precedence
                || (child.precedence() == precedence && op.assoc() != Assoc::Left)
        }
        None => false,
    };
    let rhs_parens = match operator(rhs) {
        Some(child) => {
            child.precedence() < precedence
                || (child.precedence() == precedence && op.assoc() != Assoc::Right)
        }
        None => false,
    };

    write_parenthesised(out, lhs, lhs_parens);
    if op.is_spaced() {
        out.push(' ');
        out.push_str(op.render());
        out.push(' ');
    } else {
        out.push_str(op.render());
    }
    if op == Binop::Dollar {
        write_node(out, rhs)
    } else {
        write_parenthesised(out, rhs, rhs_parens)
    }
}

fn write_if(out: &mut String, args: &[Arg]) {
    out.push_str("if (");
    write_node(out, &args[0].value);
    out.push_str(") ");
    // A dangling `else` would attach to the inner `if`.
    let then = &args[1].value;
    let then_parens = args.len() == 3
        && then.is_call_to("if")
        && is_if(then)
        && then.as_call().map_or(false, |call| call.args.len() == 2);
    write_parenthesised(out, then, then_parens);
    if let Some(else_) = args.get(2) {
        out.push_str(" else ");
        write_node(out, &else_.value);
    }
}

fn write_function(out: &mut String, args: &[Arg]) {
    out.push_str("function(");
    if let Node::PairList(formals) = &args[0].value {
        for (ix, formal) in formals.iter().enumerate() {
            if ix > 0 {
                out.push_str(", ");
            }
            if let Some(name) = &formal.name {
                write_name(out, name);
            }
            if !formal.value.is_missing() {
                out.push_str(" = ");
                write_node(out, &formal.value);
            }
        }
    }
    out.push_str(") ");
    write_node(out, &args[1].value);
}

fn write_block(out: &mut String, args: &[Arg]) {
    if args.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    for arg in args {
        for line in render(&arg.value).lines() {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push('}');
}

fn write_call(out: &mut String, callee: &Node, args: &[Arg]) {
    if let Node::Symbol(name) = callee {
        match &**name {
            "(" if args.len() == 1 && positional(args) => {
                out.push('(');
                write_node(out, &args[0].value);
                out.push(')');
                return;
            }
            "{" if positional(args) => {
                write_block(out, args);
                return;
            }
            _ => {}
        }
    }

    let callee_parens = operator(callee).is_some();
    write_parenthesised(out, callee, callee_parens);
    out.push('(');
    write_args(out, args);
    out.push(')');
}

fn write_args(out: &mut String, args: &[Arg]) {
    for (ix, arg) in args.iter().enumerate() {
        if ix > 0 {
            out.push_str(", ");
        }
        match &arg.name {
            Some(name) => {
                write_name(out, name);
                out.push_str(" = ");
                write_node(out, &arg.value);
            }
            None => {
                let parens = operator(&arg.value) == Some(Operator::Binary(Binop::EqAssign));
                write_parenthesised(out, &arg.value, parens);
            }
        }
    }
}
