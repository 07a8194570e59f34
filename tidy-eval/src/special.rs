use crate::{
    builtins::{unpack_flag, Builtin},
    capture::capture_argument_with_env,
    env::{Binding, Env},
    error::Error,
    mask::DataMask,
    quasi::{quasiquote, quasiquote_args},
    quosure::Quosure,
    value::{Closure, Value},
    Interpreter,
};
use std::rc::Rc;
use tidy_syntax::{Arg, Literal, Node};

fn node_kind(node: &Node) -> &'static str {
    match node {
        Node::Constant(_) => "constant",
        Node::Symbol(_) => "symbol",
        Node::Call(_) => "call",
        Node::PairList(_) => "pairlist",
        Node::Missing => "missing argument",
    }
}

fn single_arg<'a>(builtin: Builtin, args: &'a [Arg]) -> Result<&'a Node, Error> {
    match args {
        [arg] if !arg.value.is_missing() => Ok(&arg.value),
        _ => Err(Error::arity(
            builtin.name(),
            format!("expected 1 argument, got {}", args.len()),
        )),
    }
}

fn two_args<'a>(builtin: Builtin, args: &'a [Arg]) -> Result<(&'a Node, &'a Node), Error> {
    match args {
        [lhs, rhs] => Ok((&lhs.value, &rhs.value)),
        _ => Err(Error::arity(
            builtin.name(),
            format!("expected 2 arguments, got {}", args.len()),
        )),
    }
}

/// A name written as a symbol or a string.
fn name_of(node: &Node) -> Option<Rc<str>> {
    match node {
        Node::Symbol(name) | Node::Constant(Literal::Str(name)) => Some(name.clone()),
        _ => None,
    }
}

impl<'io> Interpreter<'io> {
    /// Evaluate a call to a special form, whose arguments arrive unevaluated.
    pub(crate) fn eval_special(
        &mut self,
        builtin: Builtin,
        args: &[Arg],
        env: &Env,
        mask: Option<&DataMask>,
    ) -> Result<Value, Error> {
        match builtin {
            Builtin::Quote => Ok(Value::from_node(single_arg(builtin, args)?.clone())),
            Builtin::Expr => {
                let template = single_arg(builtin, args)?;
                Ok(Value::from_node(quasiquote(self, template, env, mask)?))
            }
            Builtin::Exprs => {
                let args = quasiquote_args(self, args, env, mask)?;
                Ok(Value::List(
                    args.into_iter()
                        .map(|arg| (arg.name, Value::from_node(arg.value)))
                        .collect(),
                ))
            }
            Builtin::Quo => {
                let template = single_arg(builtin, args)?;
                let expr = quasiquote(self, template, env, mask)?;
                Ok(Value::Quosure(Quosure::new(expr, env.clone())))
            }
            Builtin::Enexpr | Builtin::Enquo => {
                let arg = single_arg(builtin, args)?;
                let name = arg.as_symbol().ok_or_else(|| {
                    Error::type_mismatch(builtin.name(), "an argument name", node_kind(arg))
                })?;
                let captured = capture_argument_with_env(env, name)?;
                // Unquoting in a captured argument happens in the caller's environment.
                let expr = quasiquote(self, captured.expr(), captured.env(), None)?;
                log::debug!("captured argument `{}` as {}", name, expr);
                if builtin == Builtin::Enexpr {
                    Ok(Value::from_node(expr))
                } else {
                    Ok(Value::Quosure(Quosure::new(expr, captured.env().clone())))
                }
            }
            Builtin::Function => match args {
                [Arg {
                    name: None,
                    value: Node::PairList(formals),
                }, Arg {
                    name: None,
                    value: body,
                }] => {
                    for (ix, formal) in formals.iter().enumerate() {
                        if formals[..ix].iter().any(|other| other.name == formal.name) {
                            return Err(Error::arity(
                                builtin.name(),
                                format!(
                                    "repeated formal argument `{}`",
                                    formal.name.as_deref().unwrap_or("")
                                ),
                            ));
                        }
                    }
                    Ok(Value::Closure(Rc::new(Closure {
                        formals: formals.clone(),
                        body: body.clone(),
                        env: env.clone(),
                    })))
                }
                _ => Err(Error::arity(
                    builtin.name(),
                    String::from("expected a formals list and a body"),
                )),
            },
            Builtin::If => {
                let (cond, then, else_) = match args {
                    [cond, then] => (cond, then, None),
                    [cond, then, else_] => (cond, then, Some(else_)),
                    _ => {
                        return Err(Error::arity(
                            builtin.name(),
                            format!("expected 2 or 3 arguments, got {}", args.len()),
                        ))
                    }
                };
                let cond = self.eval(&cond.value, env, mask)?;
                if unpack_flag(builtin, &cond)? {
                    self.eval(&then.value, env, mask)
                } else {
                    match else_ {
                        Some(else_) => self.eval(&else_.value, env, mask),
                        None => Ok(Value::Null),
                    }
                }
            }
            Builtin::Brace => {
                let mut result = Value::Null;
                for arg in args {
                    result = self.eval(&arg.value, env, mask)?;
                }
                Ok(result)
            }
            Builtin::Paren => {
                let inner = single_arg(builtin, args)?;
                self.eval(inner, env, mask)
            }
            Builtin::LeftAssign | Builtin::EqAssign => {
                let (target, value) = two_args(builtin, args)?;
                let name = name_of(target).ok_or_else(|| {
                    Error::arity(
                        builtin.name(),
                        format!("invalid assignment target {}", target),
                    )
                })?;
                let value = self.eval(value, env, mask)?;
                log::trace!("assigning `{}` in {:?}", name, env);
                env.bind(name, Binding::Value(value.clone()));
                Ok(value)
            }
            Builtin::AndAnd | Builtin::OrOr => {
                let (lhs, rhs) = two_args(builtin, args)?;
                let lhs = unpack_flag(builtin, &self.eval(lhs, env, mask)?)?;
                // Short-circuit: the right operand is only evaluated when it decides the result.
                if lhs == (builtin == Builtin::OrOr) {
                    return Ok(Value::Bool(lhs));
                }
                let rhs = unpack_flag(builtin, &self.eval(rhs, env, mask)?)?;
                Ok(Value::Bool(rhs))
            }
            Builtin::Dollar => {
                let (lhs, rhs) = two_args(builtin, args)?;
                let name = name_of(rhs).ok_or_else(|| {
                    Error::type_mismatch(builtin.name(), "a name", node_kind(rhs))
                })?;
                match lhs.as_symbol().map(|pronoun| &**pronoun) {
                    Some(".data") => match mask {
                        None => Err(Error::AmbiguousReference {
                            pronoun: Rc::from(".data"),
                            name,
                        }),
                        Some(mask) => mask
                            .get(&name)
                            .cloned()
                            .ok_or(Error::UnresolvedSymbol { name }),
                    },
                    Some(".env") => self.lookup_lexical(&name, env),
                    _ => {
                        let value = self.eval(lhs, env, mask)?;
                        self.select(&value, &name)
                    }
                }
            }
            _ => {
                let args = self.eval_args(builtin.name(), args, env, mask)?;
                builtin.apply(self, env, &args)
            }
        }
    }

    /// `value$name` for a list or environment.
    fn select(&mut self, value: &Value, name: &Rc<str>) -> Result<Value, Error> {
        match value {
            Value::List(items) => Ok(items
                .iter()
                .find(|(key, _)| key.as_ref() == Some(name))
                .map_or(Value::Null, |(_, item)| item.clone())),
            Value::Env(env) => match env.get_local(name) {
                Some(binding) => self.force_binding(name, binding),
                None => Ok(Value::Null),
            },
            other => Err(Error::type_mismatch(
                "$",
                "a list or environment",
                other.type_name(),
            )),
        }
    }
}
