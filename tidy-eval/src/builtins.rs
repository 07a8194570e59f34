use crate::{
    env::Env,
    error::Error,
    mask::DataMask,
    quosure::Quosure,
    value::Value,
    Interpreter,
};
use std::rc::Rc;
use tidy_syntax::{print, Arg, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    // Special forms. These receive their arguments unevaluated.
    Quote,
    Expr,
    Exprs,
    Quo,
    Enexpr,
    Enquo,
    Function,
    If,
    Brace,
    Paren,
    LeftAssign,
    EqAssign,
    AndAnd,
    OrOr,
    Dollar,

    Add,
    Subtract,
    Multiply,
    Divide,
    Pow,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    Not,
    And,
    Or,

    C,
    Length,
    Sum,
    Mean,
    Paste,
    Paste0,
    List,
    Names,
    Identical,

    Sym,
    Call2,
    Eval,
    EvalTidy,
    NewQuosure,
    QuoGetExpr,
    QuoGetEnv,
    AsLabel,
    ExprText,
    IsCall,
    IsSymbol,
    IsQuosure,

    CurrentEnv,
    GlobalEnv,
    EnvNew,
    NewEnvironment,
    EnvParent,

    Identity,
    Print,
}

impl Builtin {
    pub const ALL: [Builtin; 57] = [
        Builtin::Quote,
        Builtin::Expr,
        Builtin::Exprs,
        Builtin::Quo,
        Builtin::Enexpr,
        Builtin::Enquo,
        Builtin::Function,
        Builtin::If,
        Builtin::Brace,
        Builtin::Paren,
        Builtin::LeftAssign,
        Builtin::EqAssign,
        Builtin::AndAnd,
        Builtin::OrOr,
        Builtin::Dollar,
        Builtin::Add,
        Builtin::Subtract,
        Builtin::Multiply,
        Builtin::Divide,
        Builtin::Pow,
        Builtin::Eq,
        Builtin::Neq,
        Builtin::Lt,
        Builtin::Gt,
        Builtin::Lte,
        Builtin::Gte,
        Builtin::Not,
        Builtin::And,
        Builtin::Or,
        Builtin::C,
        Builtin::Length,
        Builtin::Sum,
        Builtin::Mean,
        Builtin::Paste,
        Builtin::Paste0,
        Builtin::List,
        Builtin::Names,
        Builtin::Identical,
        Builtin::Sym,
        Builtin::Call2,
        Builtin::Eval,
        Builtin::EvalTidy,
        Builtin::NewQuosure,
        Builtin::QuoGetExpr,
        Builtin::QuoGetEnv,
        Builtin::AsLabel,
        Builtin::ExprText,
        Builtin::IsCall,
        Builtin::IsSymbol,
        Builtin::IsQuosure,
        Builtin::CurrentEnv,
        Builtin::GlobalEnv,
        Builtin::EnvNew,
        Builtin::NewEnvironment,
        Builtin::EnvParent,
        Builtin::Identity,
        Builtin::Print,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Quote => "quote",
            Builtin::Expr => "expr",
            Builtin::Exprs => "exprs",
            Builtin::Quo => "quo",
            Builtin::Enexpr => "enexpr",
            Builtin::Enquo => "enquo",
            Builtin::Function => "function",
            Builtin::If => "if",
            Builtin::Brace => "{",
            Builtin::Paren => "(",
            Builtin::LeftAssign => "<-",
            Builtin::EqAssign => "=",
            Builtin::AndAnd => "&&",
            Builtin::OrOr => "||",
            Builtin::Dollar => "$",
            Builtin::Add => "+",
            Builtin::Subtract => "-",
            Builtin::Multiply => "*",
            Builtin::Divide => "/",
            Builtin::Pow => "^",
            Builtin::Eq => "==",
            Builtin::Neq => "!=",
            Builtin::Lt => "<",
            Builtin::Gt => ">",
            Builtin::Lte => "<=",
            Builtin::Gte => ">=",
            Builtin::Not => "!",
            Builtin::And => "&",
            Builtin::Or => "|",
            Builtin::C => "c",
            Builtin::Length => "length",
            Builtin::Sum => "sum",
            Builtin::Mean => "mean",
            Builtin::Paste => "paste",
            Builtin::Paste0 => "paste0",
            Builtin::List => "list",
            Builtin::Names => "names",
            Builtin::Identical => "identical",
            Builtin::Sym => "sym",
            Builtin::Call2 => "call2",
            Builtin::Eval => "eval",
            Builtin::EvalTidy => "eval_tidy",
            Builtin::NewQuosure => "new_quosure",
            Builtin::QuoGetExpr => "quo_get_expr",
            Builtin::QuoGetEnv => "quo_get_env",
            Builtin::AsLabel => "as_label",
            Builtin::ExprText => "expr_text",
            Builtin::IsCall => "is_call",
            Builtin::IsSymbol => "is_symbol",
            Builtin::IsQuosure => "is_quosure",
            Builtin::CurrentEnv => "current_env",
            Builtin::GlobalEnv => "global_env",
            Builtin::EnvNew => "env",
            Builtin::NewEnvironment => "new_environment",
            Builtin::EnvParent => "env_parent",
            Builtin::Identity => "identity",
            Builtin::Print => "print",
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(
            self,
            Builtin::Quote
                | Builtin::Expr
                | Builtin::Exprs
                | Builtin::Quo
                | Builtin::Enexpr
                | Builtin::Enquo
                | Builtin::Function
                | Builtin::If
                | Builtin::Brace
                | Builtin::Paren
                | Builtin::LeftAssign
                | Builtin::EqAssign
                | Builtin::AndAnd
                | Builtin::OrOr
                | Builtin::Dollar
        )
    }
}

/// An evaluated argument and the name it was supplied under.
pub type ArgValue = (Option<Rc<str>>, Value);

/// The environment every global environment is a child of.
pub fn base_env() -> Env {
    let builtins = Builtin::ALL
        .iter()
        .map(|builtin| (Rc::<str>::from(builtin.name()), Value::Builtin(*builtin)));
    let constants: [(Rc<str>, Value); 3] = [
        (Rc::from("Inf"), Value::num(f64::INFINITY)),
        (Rc::from("NaN"), Value::num(f64::NAN)),
        (Rc::from("pi"), Value::num(std::f64::consts::PI)),
    ];
    Env::with_label("base", None, builtins.chain(constants))
}

/// Match supplied arguments to formals: exact names first, then the remaining
/// positional arguments in order. The result holds, for each formal, the index
/// of the argument it was matched to.
pub fn match_args(
    callee: &str,
    formals: &[&str],
    supplied: &[Option<&str>],
) -> Result<Vec<Option<usize>>, Error> {
    let mut matched: Vec<Option<usize>> = vec![None; formals.len()];

    for (ix, name) in supplied.iter().enumerate() {
        if let Some(name) = name {
            match formals.iter().position(|formal| formal == name) {
                None => {
                    return Err(Error::arity(
                        callee,
                        format!("unused argument ({} = ...)", print::render_name(name)),
                    ))
                }
                Some(formal_ix) => {
                    if matched[formal_ix].is_some() {
                        return Err(Error::arity(
                            callee,
                            format!(
                                "formal argument \"{}\" matched by multiple actual arguments",
                                name
                            ),
                        ));
                    }
                    matched[formal_ix] = Some(ix);
                }
            }
        }
    }

    let mut next_formal = 0;
    for (ix, name) in supplied.iter().enumerate() {
        if name.is_some() {
            continue;
        }
        while next_formal < formals.len() && matched[next_formal].is_some() {
            next_formal += 1;
        }
        if next_formal == formals.len() {
            return Err(Error::arity(
                callee,
                format!("unused argument at position {}", ix + 1),
            ));
        }
        matched[next_formal] = Some(ix);
        next_formal += 1;
    }

    Ok(matched)
}

/// Match evaluated arguments against a builtin's formals.
fn bind_args<'a>(
    builtin: Builtin,
    formals: &[&str],
    args: &'a [ArgValue],
) -> Result<Vec<Option<&'a Value>>, Error> {
    let supplied: Vec<Option<&str>> = args.iter().map(|(name, _)| name.as_deref()).collect();
    let matched = match_args(builtin.name(), formals, &supplied)?;
    Ok(matched
        .into_iter()
        .map(|ix| ix.map(|ix| &args[ix].1))
        .collect())
}

fn required<'a>(
    builtin: Builtin,
    formal: &str,
    value: Option<&'a Value>,
) -> Result<&'a Value, Error> {
    value.ok_or_else(|| {
        Error::arity(
            builtin.name(),
            format!("argument \"{}\" is missing, with no default", formal),
        )
    })
}

/// Bind exactly one required argument.
fn unary_arg<'a>(builtin: Builtin, formal: &str, args: &'a [ArgValue]) -> Result<&'a Value, Error> {
    let bound = bind_args(builtin, &[formal], args)?;
    required(builtin, formal, bound[0])
}

fn unpack_numbers(builtin: Builtin, value: &Value) -> Result<Rc<[f64]>, Error> {
    match value {
        Value::Num(values) => Ok(values.clone()),
        Value::Bool(value) => Ok(Rc::from(&[if *value { 1.0 } else { 0.0 }][..])),
        other => Err(Error::type_mismatch(
            builtin.name(),
            "a number",
            other.type_name(),
        )),
    }
}

fn unpack_scalar(builtin: Builtin, value: &Value) -> Result<f64, Error> {
    let values = unpack_numbers(builtin, value)?;
    match &values[..] {
        [value] => Ok(*value),
        _ => Err(Error::type_mismatch(
            builtin.name(),
            "a length-one number",
            "a vector",
        )),
    }
}

pub(crate) fn unpack_flag(builtin: Builtin, value: &Value) -> Result<bool, Error> {
    match value {
        Value::Bool(value) => Ok(*value),
        Value::Num(values) => match &values[..] {
            [value] if !value.is_nan() => Ok(*value != 0.0),
            _ => Err(Error::type_mismatch(
                builtin.name(),
                "a single TRUE or FALSE",
                "a vector",
            )),
        },
        other => Err(Error::type_mismatch(
            builtin.name(),
            "a single TRUE or FALSE",
            other.type_name(),
        )),
    }
}

fn unpack_env(builtin: Builtin, value: &Value) -> Result<Env, Error> {
    match value {
        Value::Env(env) => Ok(env.clone()),
        Value::Quosure(quosure) => Ok(quosure.env().clone()),
        other => Err(Error::type_mismatch(
            builtin.name(),
            "an environment",
            other.type_name(),
        )),
    }
}

fn unpack_mask(builtin: Builtin, value: Option<&Value>) -> Result<Option<DataMask>, Error> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => DataMask::from_list(builtin.name(), value).map(Some),
    }
}

/// Element-wise arithmetic, recycling the shorter operand.
fn arithmetic(
    builtin: Builtin,
    lhs: &Value,
    rhs: &Value,
    op: fn(f64, f64) -> f64,
) -> Result<Value, Error> {
    let lhs = unpack_numbers(builtin, lhs)?;
    let rhs = unpack_numbers(builtin, rhs)?;
    if lhs.is_empty() || rhs.is_empty() {
        return Ok(Value::nums(Vec::new()));
    }
    let len = lhs.len().max(rhs.len());
    Ok(Value::nums(
        (0..len)
            .map(|ix| op(lhs[ix % lhs.len()], rhs[ix % rhs.len()]))
            .collect(),
    ))
}

fn compare_with<T: PartialOrd + ?Sized>(builtin: Builtin, lhs: &T, rhs: &T) -> bool {
    match builtin {
        Builtin::Eq => lhs == rhs,
        Builtin::Neq => lhs != rhs,
        Builtin::Lt => lhs < rhs,
        Builtin::Gt => lhs > rhs,
        Builtin::Lte => lhs <= rhs,
        Builtin::Gte => lhs >= rhs,
        _ => false,
    }
}

fn compare(builtin: Builtin, lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    let result = match (lhs, rhs) {
        (Value::Str(lhs), Value::Str(rhs)) => compare_with(builtin, &**lhs, &**rhs),
        _ => {
            let lhs = unpack_scalar(builtin, lhs)?;
            let rhs = unpack_scalar(builtin, rhs)?;
            compare_with(builtin, &lhs, &rhs)
        }
    };
    Ok(Value::Bool(result))
}

/// The text a value contributes to `paste`. Empty values contribute nothing.
fn paste_text(builtin: Builtin, value: &Value) -> Result<Option<String>, Error> {
    match value {
        Value::Null => Ok(None),
        Value::Str(value) => Ok(Some(value.to_string())),
        Value::Bool(true) => Ok(Some(String::from("TRUE"))),
        Value::Bool(false) => Ok(Some(String::from("FALSE"))),
        Value::Num(values) => match &values[..] {
            [] => Ok(None),
            [value] => Ok(Some(print::render_number(*value))),
            _ => Err(Error::type_mismatch(
                builtin.name(),
                "a length-one value",
                "a vector",
            )),
        },
        Value::Lang(Node::Symbol(name)) => Ok(Some(name.to_string())),
        Value::Lang(node) => Ok(Some(node.render())),
        other => Err(Error::type_mismatch(
            builtin.name(),
            "a string",
            other.type_name(),
        )),
    }
}

fn paste(builtin: Builtin, args: &[ArgValue], default_sep: &str) -> Result<Value, Error> {
    let mut sep = String::from(default_sep);
    let mut parts = Vec::new();
    for (name, value) in args {
        match name.as_deref() {
            Some("sep") => match value {
                Value::Str(value) => sep = value.to_string(),
                other => {
                    return Err(Error::type_mismatch(
                        builtin.name(),
                        "a string",
                        other.type_name(),
                    ))
                }
            },
            _ => {
                if let Some(text) = paste_text(builtin, value)? {
                    parts.push(text)
                }
            }
        }
    }
    Ok(Value::str(&parts.join(&sep)))
}

fn combine(builtin: Builtin, args: &[ArgValue]) -> Result<Value, Error> {
    if args.is_empty() {
        return Ok(Value::Null);
    }
    if let [(_, Value::Str(value))] = args {
        return Ok(Value::Str(value.clone()));
    }
    let mut values = Vec::new();
    for (_, value) in args {
        match value {
            Value::Null => {}
            Value::Num(_) | Value::Bool(_) => values.extend(unpack_numbers(builtin, value)?.iter()),
            other => {
                return Err(Error::type_mismatch(
                    builtin.name(),
                    "numbers",
                    other.type_name(),
                ))
            }
        }
    }
    Ok(Value::nums(values))
}

fn length(value: &Value) -> usize {
    match value {
        Value::Null => 0,
        Value::Num(values) => values.len(),
        Value::List(items) => items.len(),
        Value::Env(env) => env.len(),
        Value::Lang(node) => match node {
            Node::Call(call) => call.args.len() + 1,
            _ => 1,
        },
        _ => 1,
    }
}

/// The callee of a call built by `call2`.
fn callee_node(builtin: Builtin, value: &Value) -> Result<Node, Error> {
    match value {
        Value::Str(name) => Ok(Node::Symbol(name.clone())),
        Value::Lang(node) => Ok(node.clone()),
        Value::Builtin(callee) => Ok(Node::sym(callee.name())),
        other => Err(Error::type_mismatch(
            builtin.name(),
            "a function name or call",
            other.type_name(),
        )),
    }
}

/// The expression a value stands for when it is labelled.
fn label_node(value: &Value) -> Result<Node, Error> {
    match value {
        Value::Quosure(quosure) => Ok(quosure.expr().clone()),
        other => other.to_node(),
    }
}

impl Builtin {
    /// Apply a builtin that takes evaluated arguments. `env` is the calling environment.
    pub fn apply(
        self,
        interpreter: &mut Interpreter,
        env: &Env,
        args: &[ArgValue],
    ) -> Result<Value, Error> {
        match self {
            Builtin::Add | Builtin::Subtract => {
                if !matches!(args.len(), 1 | 2) {
                    return Err(Error::arity(
                        self.name(),
                        format!("expected 1 or 2 arguments, got {}", args.len()),
                    ));
                }
                let bound = bind_args(self, &["e1", "e2"], args)?;
                let lhs = required(self, "e1", bound[0])?;
                match (self, bound[1]) {
                    (_, None) => {
                        let sign = if self == Builtin::Subtract { -1.0 } else { 1.0 };
                        let values = unpack_numbers(self, lhs)?;
                        Ok(Value::nums(values.iter().map(|value| sign * value).collect()))
                    }
                    (Builtin::Add, Some(rhs)) => arithmetic(self, lhs, rhs, |a, b| a + b),
                    (_, Some(rhs)) => arithmetic(self, lhs, rhs, |a, b| a - b),
                }
            }
            Builtin::Multiply | Builtin::Divide | Builtin::Pow => {
                let bound = bind_args(self, &["e1", "e2"], args)?;
                let lhs = required(self, "e1", bound[0])?;
                let rhs = required(self, "e2", bound[1])?;
                match self {
                    Builtin::Multiply => arithmetic(self, lhs, rhs, |a, b| a * b),
                    Builtin::Divide => arithmetic(self, lhs, rhs, |a, b| a / b),
                    _ => arithmetic(self, lhs, rhs, f64::powf),
                }
            }
            Builtin::Eq
            | Builtin::Neq
            | Builtin::Lt
            | Builtin::Gt
            | Builtin::Lte
            | Builtin::Gte => {
                let bound = bind_args(self, &["e1", "e2"], args)?;
                let lhs = required(self, "e1", bound[0])?;
                let rhs = required(self, "e2", bound[1])?;
                compare(self, lhs, rhs)
            }
            Builtin::Not => {
                let operand = unary_arg(self, "x", args)?;
                Ok(Value::Bool(!unpack_flag(self, operand)?))
            }
            Builtin::And | Builtin::Or => {
                let bound = bind_args(self, &["e1", "e2"], args)?;
                let lhs = unpack_flag(self, required(self, "e1", bound[0])?)?;
                let rhs = unpack_flag(self, required(self, "e2", bound[1])?)?;
                Ok(Value::Bool(if self == Builtin::And {
                    lhs && rhs
                } else {
                    lhs || rhs
                }))
            }

            Builtin::C => combine(self, args),
            Builtin::Length => {
                let value = unary_arg(self, "x", args)?;
                Ok(Value::num(length(value) as f64))
            }
            Builtin::Sum => {
                let mut total = 0.0;
                for (name, value) in args {
                    if name.as_deref() == Some("na.rm") {
                        continue;
                    }
                    total += unpack_numbers(self, value)?.iter().sum::<f64>();
                }
                Ok(Value::num(total))
            }
            Builtin::Mean => {
                let bound = bind_args(self, &["x", "na.rm"], args)?;
                let values = unpack_numbers(self, required(self, "x", bound[0])?)?;
                let na_rm = match bound[1] {
                    Some(value) => unpack_flag(self, value)?,
                    None => false,
                };
                let values: Vec<f64> = values
                    .iter()
                    .copied()
                    .filter(|value| !(na_rm && value.is_nan()))
                    .collect();
                if values.is_empty() {
                    Ok(Value::num(f64::NAN))
                } else {
                    Ok(Value::num(
                        values.iter().sum::<f64>() / values.len() as f64,
                    ))
                }
            }
            Builtin::Paste => paste(self, args, " "),
            Builtin::Paste0 => paste(self, args, ""),
            Builtin::List => Ok(Value::List(args.iter().cloned().collect())),
            Builtin::Names => match unary_arg(self, "x", args)? {
                Value::List(items) if items.iter().any(|(name, _)| name.is_some()) => {
                    Ok(Value::List(
                        items
                            .iter()
                            .map(|(name, _)| {
                                (None, Value::Str(name.clone().unwrap_or_else(|| Rc::from(""))))
                            })
                            .collect(),
                    ))
                }
                Value::Env(env) => Ok(Value::List(
                    env.names().into_iter().map(|name| (None, Value::Str(name))).collect(),
                )),
                _ => Ok(Value::Null),
            },
            Builtin::Identical => {
                let bound = bind_args(self, &["x", "y"], args)?;
                let x = required(self, "x", bound[0])?;
                let y = required(self, "y", bound[1])?;
                Ok(Value::Bool(x == y))
            }

            Builtin::Sym => match unary_arg(self, "x", args)? {
                Value::Str(name) => Ok(Value::Lang(Node::Symbol(name.clone()))),
                Value::Lang(Node::Symbol(name)) => Ok(Value::Lang(Node::Symbol(name.clone()))),
                other => Err(Error::type_mismatch(
                    self.name(),
                    "a string",
                    other.type_name(),
                )),
            },
            Builtin::Call2 => {
                let (callee_ix, callee) = args
                    .iter()
                    .enumerate()
                    .find(|(_, (name, _))| name.as_deref() == Some(".fn"))
                    .or_else(|| {
                        args.iter()
                            .enumerate()
                            .find(|(_, (name, _))| name.is_none())
                    })
                    .map(|(ix, (_, value))| (ix, value))
                    .ok_or_else(|| {
                        Error::arity(
                            self.name(),
                            String::from("argument \".fn\" is missing, with no default"),
                        )
                    })?;
                let callee = callee_node(self, callee)?;
                let call_args = args
                    .iter()
                    .enumerate()
                    .filter(|(ix, _)| *ix != callee_ix)
                    .map(|(_, (name, value))| {
                        value.to_node().map(|value| Arg {
                            name: name.clone(),
                            value,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Lang(Node::call(callee, call_args)))
            }
            Builtin::Eval => {
                let bound = bind_args(self, &["expr", "envir"], args)?;
                let expr = required(self, "expr", bound[0])?;
                let (env, mask) = match bound[1] {
                    None => (env.clone(), None),
                    Some(Value::List(_)) => (env.clone(), unpack_mask(self, bound[1])?),
                    Some(value) => (unpack_env(self, value)?, None),
                };
                match expr {
                    Value::Quosure(quosure) => interpreter.eval_quosure(quosure, mask.as_ref()),
                    Value::Lang(node) => interpreter.eval(node, &env, mask.as_ref()),
                    other => Ok(other.clone()),
                }
            }
            Builtin::EvalTidy => {
                let bound = bind_args(self, &["expr", "data", "env"], args)?;
                let expr = required(self, "expr", bound[0])?;
                let mask = unpack_mask(self, bound[1])?;
                let env = match bound[2] {
                    Some(value) => unpack_env(self, value)?,
                    None => env.clone(),
                };
                if let Some(mask) = &mask {
                    log::debug!(
                        "eval_tidy with data mask [{}]",
                        mask.names().map(|name| name.to_string()).collect::<Vec<_>>().join(", ")
                    );
                }
                match expr {
                    Value::Quosure(quosure) => interpreter.eval_quosure(quosure, mask.as_ref()),
                    Value::Lang(node) => interpreter.eval(node, &env, mask.as_ref()),
                    other => Ok(other.clone()),
                }
            }
            Builtin::NewQuosure => {
                let bound = bind_args(self, &["expr", "env"], args)?;
                let expr = match required(self, "expr", bound[0])? {
                    Value::Quosure(quosure) => return Ok(Value::Quosure(quosure.clone())),
                    other => other.to_node()?,
                };
                let env = match bound[1] {
                    Some(value) => unpack_env(self, value)?,
                    None => env.clone(),
                };
                Ok(Value::Quosure(Quosure::new(expr, env)))
            }
            Builtin::QuoGetExpr => match unary_arg(self, "quo", args)? {
                Value::Quosure(quosure) => Ok(Value::from_node(quosure.expr().clone())),
                other => Err(Error::type_mismatch(
                    self.name(),
                    "a quosure",
                    other.type_name(),
                )),
            },
            Builtin::QuoGetEnv => match unary_arg(self, "quo", args)? {
                Value::Quosure(quosure) => Ok(Value::Env(quosure.env().clone())),
                other => Err(Error::type_mismatch(
                    self.name(),
                    "a quosure",
                    other.type_name(),
                )),
            },
            Builtin::AsLabel => match label_node(unary_arg(self, "x", args)?)? {
                Node::Symbol(name) => Ok(Value::Str(name)),
                node => Ok(Value::str(&node.render())),
            },
            Builtin::ExprText => {
                let node = label_node(unary_arg(self, "expr", args)?)?;
                Ok(Value::str(&node.render()))
            }
            Builtin::IsCall => Ok(Value::Bool(matches!(
                unary_arg(self, "x", args)?,
                Value::Lang(Node::Call(_))
            ))),
            Builtin::IsSymbol => Ok(Value::Bool(matches!(
                unary_arg(self, "x", args)?,
                Value::Lang(Node::Symbol(_))
            ))),
            Builtin::IsQuosure => Ok(Value::Bool(matches!(
                unary_arg(self, "x", args)?,
                Value::Quosure(_)
            ))),

            Builtin::CurrentEnv => {
                bind_args(self, &[], args)?;
                Ok(Value::Env(env.clone()))
            }
            Builtin::GlobalEnv => {
                bind_args(self, &[], args)?;
                Ok(Value::Env(interpreter.global().clone()))
            }
            Builtin::EnvNew => {
                let mut parent = env.clone();
                let mut bindings = Vec::new();
                for (ix, (name, value)) in args.iter().enumerate() {
                    match (name, value) {
                        (Some(name), value) => bindings.push((name.clone(), value.clone())),
                        (None, Value::Env(env)) if ix == 0 => parent = env.clone(),
                        (None, _) => {
                            return Err(Error::arity(
                                self.name(),
                                String::from("bindings must be named"),
                            ))
                        }
                    }
                }
                Ok(Value::Env(Env::new(Some(&parent), bindings)))
            }
            Builtin::NewEnvironment => {
                let bound = bind_args(self, &["data", "parent"], args)?;
                let bindings = match bound[0] {
                    None | Some(Value::Null) => Vec::new(),
                    Some(value) => {
                        let mask = DataMask::from_list(self.name(), value)?;
                        mask.names()
                            .filter_map(|name| {
                                mask.get(name).map(|value| (name.clone(), value.clone()))
                            })
                            .collect()
                    }
                };
                let parent = match bound[1] {
                    Some(value) => unpack_env(self, value)?,
                    None => interpreter.base(),
                };
                Ok(Value::Env(Env::new(Some(&parent), bindings)))
            }
            Builtin::EnvParent => {
                let bound = bind_args(self, &["env"], args)?;
                let env = match bound[0] {
                    Some(value) => unpack_env(self, value)?,
                    None => env.clone(),
                };
                Ok(env.parent().map_or(Value::Null, Value::Env))
            }

            Builtin::Identity => unary_arg(self, "x", args).cloned(),
            Builtin::Print => {
                let value = unary_arg(self, "x", args)?;
                writeln!(interpreter.stdout, "{}", value.render())?;
                Ok(value.clone())
            }

            Builtin::Quote
            | Builtin::Expr
            | Builtin::Exprs
            | Builtin::Quo
            | Builtin::Enexpr
            | Builtin::Enquo
            | Builtin::Function
            | Builtin::If
            | Builtin::Brace
            | Builtin::Paren
            | Builtin::LeftAssign
            | Builtin::EqAssign
            | Builtin::AndAnd
            | Builtin::OrOr
            | Builtin::Dollar => Err(Error::arity(
                self.name(),
                String::from("special forms can't be applied to evaluated arguments"),
            )),
        }
    }
}
