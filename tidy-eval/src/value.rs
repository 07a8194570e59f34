use crate::{builtins::Builtin, env::Env, error::Error, quosure::Quosure};
use std::rc::Rc;
use tidy_syntax::{print, Arg, Literal, Node};

#[derive(Debug)]
pub struct Closure {
    pub formals: Rc<[Arg]>,
    pub body: Node,
    pub env: Env,
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    /// A double vector. Scalars have length one.
    Num(Rc<[f64]>),
    Str(Rc<str>),
    List(Rc<[(Option<Rc<str>>, Value)]>),
    /// A captured symbol or call.
    Lang(Node),
    Quosure(Quosure),
    Closure(Rc<Closure>),
    Builtin(Builtin),
    Env(Env),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Lang(a), Value::Lang(b)) => a == b,
            (Value::Quosure(a), Value::Quosure(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Env(a), Value::Env(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Value {
    pub fn num(value: f64) -> Self {
        Value::Num(Rc::from(&[value][..]))
    }

    pub fn nums(values: Vec<f64>) -> Self {
        Value::Num(Rc::from(values))
    }

    pub fn str(value: &str) -> Self {
        Value::Str(Rc::from(value))
    }

    pub fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Null => Value::Null,
            Literal::Bool(value) => Value::Bool(*value),
            Literal::Num(value) => Value::num(*value),
            Literal::Str(value) => Value::Str(value.clone()),
        }
    }

    /// The value of a quoted expression. Constants quote to themselves.
    pub fn from_node(node: Node) -> Self {
        match node {
            Node::Constant(literal) => Value::from_literal(&literal),
            node => Value::Lang(node),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "logical",
            Value::Num(_) => "double",
            Value::Str(_) => "character",
            Value::List(_) => "list",
            Value::Lang(Node::Symbol(_)) => "symbol",
            Value::Lang(_) => "language",
            Value::Quosure(_) => "quosure",
            Value::Closure(_) => "closure",
            Value::Builtin(_) => "builtin",
            Value::Env(_) => "environment",
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Closure(_) | Value::Builtin(_))
    }

    /// Turn a value back into code. Scalars become constants holding exactly that
    /// value; vectors and lists become the calls that would rebuild them.
    pub fn to_node(&self) -> Result<Node, Error> {
        match self {
            Value::Null => Ok(Node::null()),
            Value::Bool(value) => Ok(Node::bool(*value)),
            Value::Num(values) => match &values[..] {
                [value] => Ok(Node::num(*value)),
                values => Ok(Node::call2(
                    "c",
                    values
                        .iter()
                        .map(|value| Arg::positional(Node::num(*value)))
                        .collect(),
                )),
            },
            Value::Str(value) => Ok(Node::Constant(Literal::Str(value.clone()))),
            Value::List(items) => {
                let args = items
                    .iter()
                    .map(|(name, value)| {
                        value.to_node().map(|value| Arg {
                            name: name.clone(),
                            value,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Node::call2("list", args))
            }
            Value::Lang(node) => Ok(node.clone()),
            Value::Quosure(quosure) => {
                log::debug!("inlining quosure expression {}", quosure.expr());
                Ok(quosure.expr().clone())
            }
            Value::Closure(_) | Value::Builtin(_) | Value::Env(_) => Err(Error::NotRepresentable {
                what: format!("a {} as an expression", self.type_name()),
            }),
        }
    }

    pub fn render(&self) -> String {
        match self {
            Value::Null => String::from("NULL"),
            Value::Bool(true) => String::from("TRUE"),
            Value::Bool(false) => String::from("FALSE"),
            Value::Num(values) => {
                if values.is_empty() {
                    String::from("numeric(0)")
                } else {
                    values
                        .iter()
                        .map(|value| print::render_number(*value))
                        .collect::<Vec<_>>()
                        .join(" ")
                }
            }
            Value::Str(value) => print::render_string(value),
            Value::List(items) => {
                let items: Vec<String> = items
                    .iter()
                    .map(|(name, value)| match name {
                        Some(name) => format!("{} = {}", print::render_name(name), value.render()),
                        None => value.render(),
                    })
                    .collect();
                format!("list({})", items.join(", "))
            }
            Value::Lang(node) => node.render(),
            Value::Quosure(quosure) => quosure.render(),
            Value::Closure(closure) => {
                Node::mk_function(closure.formals.to_vec(), closure.body.clone()).render()
            }
            Value::Builtin(builtin) => format!("<builtin: {}>", builtin.name()),
            Value::Env(env) => format!("<environment: {}>", env.label()),
        }
    }
}
