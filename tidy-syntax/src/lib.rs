#![deny(unused_crate_dependencies)]


pub mod print;

use quickcheck::{Arbitrary, Gen};
use std::{cmp::Ordering, rc::Rc};

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub enum Keyword {
    If,
    Else,
    Function,
    True,
    False,
    Null,
}

impl Arbitrary for Keyword {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&[
            Keyword::If,
            Keyword::Else,
            Keyword::Function,
            Keyword::True,
            Keyword::False,
            Keyword::Null,
        ])
        .unwrap()
    }
}

impl Keyword {
    pub fn num_variants() -> usize {
        6
    }

    pub fn to_string(&self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::Function => "function",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
            Keyword::Null => "NULL",
        }
    }

    pub fn from_string(str: &str) -> Option<Self> {
        match str {
            "if" => Some(Keyword::If),
            "else" => Some(Keyword::Else),
            "function" => Some(Keyword::Function),
            "TRUE" => Some(Keyword::True),
            "FALSE" => Some(Keyword::False),
            "NULL" => Some(Keyword::Null),
            _ => None,
        }
    }
}

/// Words that can only be used as names when quoted with backticks.
pub const RESERVED: &[&str] = &[
    "if", "else", "repeat", "while", "function", "for", "next", "break", "in", "TRUE", "FALSE",
    "NULL", "Inf", "NaN", "NA",
];

pub fn is_reserved(val: &str) -> bool {
    RESERVED.contains(&val)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Assoc {
    None,
    Left,
    Right,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Binop {
    Dollar,
    Pow,

    Multiply,
    Divide,
    Add,
    Subtract,

    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,

    And,
    AndAnd,
    Or,
    OrOr,

    Tilde,
    LeftAssign,
    Walrus,
    EqAssign,
}

impl Binop {
    pub const ALL: [Binop; 20] = [
        Binop::Dollar,
        Binop::Pow,
        Binop::Multiply,
        Binop::Divide,
        Binop::Add,
        Binop::Subtract,
        Binop::Eq,
        Binop::Neq,
        Binop::Lt,
        Binop::Gt,
        Binop::Lte,
        Binop::Gte,
        Binop::And,
        Binop::AndAnd,
        Binop::Or,
        Binop::OrOr,
        Binop::Tilde,
        Binop::LeftAssign,
        Binop::Walrus,
        Binop::EqAssign,
    ];

    pub fn assoc(&self) -> Assoc {
        match self {
            Binop::Pow | Binop::LeftAssign | Binop::EqAssign => Assoc::Right,
            Binop::Eq
            | Binop::Neq
            | Binop::Lt
            | Binop::Gt
            | Binop::Lte
            | Binop::Gte
            | Binop::Walrus => Assoc::None,
            Binop::Dollar
            | Binop::Multiply
            | Binop::Divide
            | Binop::Add
            | Binop::Subtract
            | Binop::And
            | Binop::AndAnd
            | Binop::Or
            | Binop::OrOr
            | Binop::Tilde => Assoc::Left,
        }
    }

    pub fn precedence(&self) -> u16 {
        match self {
            Binop::Dollar => 16,
            Binop::Pow => 14,

            Binop::Multiply => 11,
            Binop::Divide => 11,

            Binop::Add => 10,
            Binop::Subtract => 10,

            Binop::Eq => 9,
            Binop::Neq => 9,
            Binop::Lt => 9,
            Binop::Gt => 9,
            Binop::Lte => 9,
            Binop::Gte => 9,

            Binop::And => 7,
            Binop::AndAnd => 7,

            Binop::Or => 6,
            Binop::OrOr => 6,

            Binop::Tilde => 5,
            Binop::LeftAssign => 3,
            Binop::Walrus => 2,
            Binop::EqAssign => 1,
        }
    }

    pub fn compare_precedence(&self, other: &Binop) -> Ordering {
        self.precedence().cmp(&other.precedence())
    }

    /// Whether the operator is printed with a space on either side.
    pub fn is_spaced(&self) -> bool {
        !matches!(self, Binop::Dollar | Binop::Pow)
    }

    pub fn render(&self) -> &'static str {
        match self {
            Binop::Dollar => "$",
            Binop::Pow => "^",
            Binop::Multiply => "*",
            Binop::Divide => "/",
            Binop::Add => "+",
            Binop::Subtract => "-",
            Binop::Eq => "==",
            Binop::Neq => "!=",
            Binop::Lt => "<",
            Binop::Gt => ">",
            Binop::Lte => "<=",
            Binop::Gte => ">=",
            Binop::And => "&",
            Binop::AndAnd => "&&",
            Binop::Or => "|",
            Binop::OrOr => "||",
            Binop::Tilde => "~",
            Binop::LeftAssign => "<-",
            Binop::Walrus => ":=",
            Binop::EqAssign => "=",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Binop::ALL.iter().copied().find(|op| op.render() == name)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Unop {
    Minus,
    Plus,
    Not,
    Tilde,
}

impl Unop {
    pub fn precedence(&self) -> u16 {
        match self {
            Unop::Minus | Unop::Plus => 13,
            Unop::Not => 8,
            Unop::Tilde => 5,
        }
    }

    pub fn render(&self) -> &'static str {
        match self {
            Unop::Minus => "-",
            Unop::Plus => "+",
            Unop::Not => "!",
            Unop::Tilde => "~",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "-" => Some(Unop::Minus),
            "+" => Some(Unop::Plus),
            "!" => Some(Unop::Not),
            "~" => Some(Unop::Tilde),
            _ => None,
        }
    }
}

/// `!!` and `!!!` bind as tightly as unary minus, unlike a single `!`.
pub const UNQUOTE_PRECEDENCE: u16 = 13;

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Null,
    Bool(bool),
    Num(f64),
    Str(Rc<str>),
}

#[derive(Debug, PartialEq, Clone)]
pub struct Arg {
    pub name: Option<Rc<str>>,
    pub value: Node,
}

impl Arg {
    pub fn positional(value: Node) -> Self {
        Arg { name: None, value }
    }

    pub fn named(name: &str, value: Node) -> Self {
        Arg {
            name: Some(Rc::from(name)),
            value,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Call {
    pub callee: Node,
    pub args: Vec<Arg>,
}

/// Code as data.
#[derive(Debug, PartialEq, Clone)]
pub enum Node {
    Constant(Literal),
    Symbol(Rc<str>),
    Call(Rc<Call>),

    /// The formal arguments of a `function` definition.
    PairList(Rc<[Arg]>),

    /// An empty argument, e.g. a formal without a default.
    Missing,
}

impl Node {
    pub fn sym(name: &str) -> Node {
        Node::Symbol(Rc::from(name))
    }

    pub fn num(value: f64) -> Node {
        Node::Constant(Literal::Num(value))
    }

    pub fn str(value: &str) -> Node {
        Node::Constant(Literal::Str(Rc::from(value)))
    }

    pub fn bool(value: bool) -> Node {
        Node::Constant(Literal::Bool(value))
    }

    pub fn null() -> Node {
        Node::Constant(Literal::Null)
    }

    pub fn call(callee: Node, args: Vec<Arg>) -> Node {
        Node::Call(Rc::new(Call { callee, args }))
    }

    /// Build a call to the function named `name`.
    pub fn call2(name: &str, args: Vec<Arg>) -> Node {
        Node::call(Node::sym(name), args)
    }

    pub fn mk_binop(op: Binop, lhs: Node, rhs: Node) -> Node {
        Node::call2(op.render(), vec![Arg::positional(lhs), Arg::positional(rhs)])
    }

    pub fn mk_unop(op: Unop, operand: Node) -> Node {
        Node::call2(op.render(), vec![Arg::positional(operand)])
    }

    /// `!!operand`
    pub fn mk_unquote(operand: Node) -> Node {
        Node::mk_unop(Unop::Not, Node::mk_unop(Unop::Not, operand))
    }

    /// `!!!operand`
    pub fn mk_splice(operand: Node) -> Node {
        Node::mk_unop(Unop::Not, Node::mk_unquote(operand))
    }

    pub fn mk_paren(inner: Node) -> Node {
        Node::call2("(", vec![Arg::positional(inner)])
    }

    pub fn mk_block(statements: Vec<Node>) -> Node {
        Node::call2("{", statements.into_iter().map(Arg::positional).collect())
    }

    pub fn mk_function(formals: Vec<Arg>, body: Node) -> Node {
        Node::call2(
            "function",
            vec![
                Arg::positional(Node::PairList(Rc::from(formals))),
                Arg::positional(body),
            ],
        )
    }

    pub fn mk_if(cond: Node, then: Node, else_: Option<Node>) -> Node {
        let mut args = vec![Arg::positional(cond), Arg::positional(then)];
        if let Some(else_) = else_ {
            args.push(Arg::positional(else_));
        }
        Node::call2("if", args)
    }

    pub fn as_symbol(&self) -> Option<&Rc<str>> {
        match self {
            Node::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Node::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn callee_name(&self) -> Option<&str> {
        self.as_call()
            .and_then(|call| call.callee.as_symbol())
            .map(|name| name.as_ref())
    }

    pub fn is_call_to(&self, name: &str) -> bool {
        self.callee_name() == Some(name)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Node::Missing)
    }

    /// The operand of a call to `!` with a single positional argument.
    pub fn bang_operand(&self) -> Option<&Node> {
        match self.as_call() {
            Some(call) if self.is_call_to("!") => match call.args.as_slice() {
                [Arg { name: None, value }] => Some(value),
                _ => None,
            },
            _ => None,
        }
    }

    /// The operand of `!!operand`.
    pub fn unquote_operand(&self) -> Option<&Node> {
        self.bang_operand().and_then(Node::bang_operand)
    }

    /// The operand of `!!!operand`.
    pub fn splice_operand(&self) -> Option<&Node> {
        self.bang_operand().and_then(Node::unquote_operand)
    }

    /// The arguments of a binary operator call, if this is one.
    pub fn binop_operands(&self) -> Option<(Binop, &Node, &Node)> {
        let call = self.as_call()?;
        let op = Binop::from_name(self.callee_name()?)?;
        match call.args.as_slice() {
            [Arg {
                name: None,
                value: lhs,
            }, Arg {
                name: None,
                value: rhs,
            }] => Some((op, lhs, rhs)),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        print::render(self)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&print::render(self))
    }
}

const ARBITRARY_NAMES: &[&str] = &[
    "x", "y", "a", "b", "df", ".data", "my_var", "x.1", "my var", ")",
];
const ARBITRARY_FUNCTIONS: &[&str] = &["f", "g", "mean", "paste"];
const ARBITRARY_STRINGS: &[&str] = &["", "a", "hello world", ")", "quote\"d", "line\nbreak"];

fn arbitrary_leaf(g: &mut Gen) -> Node {
    match usize::arbitrary(g) % 5 {
        0 | 1 => Node::sym(g.choose(ARBITRARY_NAMES).unwrap()),
        2 => Node::num((u16::arbitrary(g) % 1000) as f64),
        3 => Node::num((u16::arbitrary(g) % 100) as f64 / 4.0),
        _ => match usize::arbitrary(g) % 3 {
            0 => Node::str(g.choose(ARBITRARY_STRINGS).unwrap()),
            1 => Node::bool(bool::arbitrary(g)),
            _ => Node::null(),
        },
    }
}

fn arbitrary_node(g: &mut Gen, depth: usize) -> Node {
    if depth == 0 {
        return arbitrary_leaf(g);
    }
    match usize::arbitrary(g) % 6 {
        0 => arbitrary_leaf(g),
        1 | 2 => {
            // Assignments are left out: `f(a = b)` would read back as a named argument.
            let op = *g.choose(&Binop::ALL[1..17]).unwrap();
            Node::mk_binop(
                op,
                arbitrary_node(g, depth - 1),
                arbitrary_node(g, depth - 1),
            )
        }
        3 => {
            let op = *g.choose(&[Unop::Minus, Unop::Plus, Unop::Tilde]).unwrap();
            Node::mk_unop(op, arbitrary_node(g, depth - 1))
        }
        4 => Node::mk_binop(
            Binop::Dollar,
            arbitrary_node(g, depth - 1),
            Node::sym(g.choose(ARBITRARY_NAMES).unwrap()),
        ),
        _ => {
            let arity = usize::arbitrary(g) % 3;
            let args = (0..arity)
                .map(|ix| {
                    let value = arbitrary_node(g, depth - 1);
                    if ix == 1 && bool::arbitrary(g) {
                        Arg::named("na.rm", value)
                    } else {
                        Arg::positional(value)
                    }
                })
                .collect();
            Node::call2(g.choose(ARBITRARY_FUNCTIONS).unwrap(), args)
        }
    }
}

impl Arbitrary for Node {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 4;
        arbitrary_node(g, depth)
    }
}
