#![deny(unused_crate_dependencies)]

#[cfg(test)]
mod test;

pub mod builtins;
mod capture;
pub mod env;
pub mod error;
pub mod mask;
mod quasi;
pub mod quosure;
mod special;
pub mod value;

pub use builtins::Builtin;
pub use capture::{capture_argument, capture_argument_with_env};
pub use env::{Binding, Env, Promise, PromiseOrigin};
pub use error::Error;
pub use mask::DataMask;
pub use quasi::quasiquote;
pub use quosure::Quosure;
pub use value::{Closure, Value};

use builtins::ArgValue;
use std::{io, rc::Rc};
use tidy_syntax::{Arg, Call, Literal, Node};

/// How many evaluations may be nested at once. A closure call nests two or three
/// deep, and this stays inside a 2 MiB thread stack in a debug build.
pub const MAX_EVAL_DEPTH: usize = 128;

pub struct Interpreter<'io> {
    stdout: &'io mut dyn io::Write,
    global: Env,
    depth: usize,
}

impl<'io> Interpreter<'io> {
    pub fn new(stdout: &'io mut dyn io::Write, global: Env) -> Self {
        Interpreter {
            stdout,
            global,
            depth: 0,
        }
    }

    pub fn global(&self) -> &Env {
        &self.global
    }

    /// The environment holding the builtins.
    pub fn base(&self) -> Env {
        self.global.parent().unwrap_or_else(|| self.global.clone())
    }

    pub fn eval_program(&mut self, program: &[Node], env: &Env) -> Result<Value, Error> {
        let mut result = Value::Null;
        for statement in program {
            result = self.eval(statement, env, None)?;
        }
        Ok(result)
    }

    /// Evaluate a quosure's expression in its own environment. `mask` applies
    /// to this evaluation only.
    pub fn eval_quosure(
        &mut self,
        quosure: &Quosure,
        mask: Option<&DataMask>,
    ) -> Result<Value, Error> {
        log::debug!(
            "evaluating {} in {:?}{}",
            quosure.render(),
            quosure.env(),
            if mask.is_some() { " under a data mask" } else { "" }
        );
        self.eval(quosure.expr(), quosure.env(), mask)
    }

    pub fn eval(
        &mut self,
        node: &Node,
        env: &Env,
        mask: Option<&DataMask>,
    ) -> Result<Value, Error> {
        if self.depth >= MAX_EVAL_DEPTH {
            return Err(Error::TooDeep {
                limit: MAX_EVAL_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.eval_node(node, env, mask);
        self.depth -= 1;
        result
    }

    fn eval_node(
        &mut self,
        node: &Node,
        env: &Env,
        mask: Option<&DataMask>,
    ) -> Result<Value, Error> {
        match node {
            Node::Constant(literal) => Ok(Value::from_literal(literal)),
            Node::Symbol(name) => {
                if let Some(value) = mask.and_then(|mask| mask.get(name)) {
                    return Ok(value.clone());
                }
                self.lookup_lexical(name, env)
            }
            Node::Call(call) => self.eval_call(call, env, mask),
            Node::PairList(_) => Ok(Value::Lang(node.clone())),
            Node::Missing => Err(Error::arity(
                "eval",
                String::from("argument is missing, with no default"),
            )),
        }
    }

    /// Look `name` up in the environment chain, skipping any data mask.
    pub(crate) fn lookup_lexical(&mut self, name: &Rc<str>, env: &Env) -> Result<Value, Error> {
        match env.lookup(name) {
            Some(binding) => self.force_binding(name, binding),
            None => Err(Error::UnresolvedSymbol { name: name.clone() }),
        }
    }

    pub(crate) fn force_binding(
        &mut self,
        name: &Rc<str>,
        binding: Binding,
    ) -> Result<Value, Error> {
        match binding {
            Binding::Value(value) => Ok(value),
            Binding::Promise(promise) => self.force(name, &promise),
            Binding::Missing => Err(Error::ArityOrBinding {
                callee: name.clone(),
                reason: String::from("argument is missing, with no default"),
            }),
        }
    }

    fn force(&mut self, name: &Rc<str>, promise: &Promise) -> Result<Value, Error> {
        if let Some(value) = promise.value() {
            return Ok(value);
        }
        if !promise.start_forcing() {
            return Err(Error::ArityOrBinding {
                callee: name.clone(),
                reason: String::from(
                    "promise already under evaluation: recursive default argument reference",
                ),
            });
        }
        log::trace!("forcing `{}` = {}", name, promise.expr);
        let result = self.eval(&promise.expr, &promise.env, promise.mask.as_ref());
        promise.finish_forcing(result.as_ref().ok().cloned());
        result
    }

    /// Callees are found through the environment chain only: a data mask can't
    /// redefine a function.
    fn resolve_callee(&mut self, callee: &Node, env: &Env) -> Result<Value, Error> {
        match callee {
            Node::Symbol(name) | Node::Constant(Literal::Str(name)) => {
                self.lookup_lexical(name, env)
            }
            _ => self.eval(callee, env, None),
        }
    }

    fn eval_call(
        &mut self,
        call: &Call,
        env: &Env,
        mask: Option<&DataMask>,
    ) -> Result<Value, Error> {
        match self.resolve_callee(&call.callee, env)? {
            Value::Builtin(builtin) if builtin.is_special() => {
                self.eval_special(builtin, &call.args, env, mask)
            }
            Value::Builtin(builtin) => {
                let args = self.eval_args(builtin.name(), &call.args, env, mask)?;
                builtin.apply(self, env, &args)
            }
            Value::Closure(closure) => {
                let name: &str = match &call.callee {
                    Node::Symbol(name) | Node::Constant(Literal::Str(name)) => name.as_ref(),
                    _ => "anonymous",
                };
                self.apply_closure(name, &closure, &call.args, env, mask)
            }
            _ => Err(Error::NotCallable {
                callee: call.callee.clone(),
            }),
        }
    }

    /// Evaluate arguments left to right.
    pub(crate) fn eval_args(
        &mut self,
        callee: &str,
        args: &[Arg],
        env: &Env,
        mask: Option<&DataMask>,
    ) -> Result<Vec<ArgValue>, Error> {
        args.iter()
            .enumerate()
            .map(|(ix, arg)| {
                if arg.value.is_missing() {
                    return Err(Error::arity(callee, format!("argument {} is empty", ix + 1)));
                }
                let value = self.eval(&arg.value, env, mask)?;
                Ok((arg.name.clone(), value))
            })
            .collect()
    }

    /// Call a closure. Supplied arguments become promises over the caller's
    /// environment (and mask); defaults become promises over the new frame.
    pub fn apply_closure(
        &mut self,
        name: &str,
        closure: &Closure,
        args: &[Arg],
        env: &Env,
        mask: Option<&DataMask>,
    ) -> Result<Value, Error> {
        let formals: Vec<(&Rc<str>, &Node)> = closure
            .formals
            .iter()
            .filter_map(|formal| formal.name.as_ref().map(|name| (name, &formal.value)))
            .collect();
        let formal_names: Vec<&str> = formals.iter().map(|(name, _)| &***name).collect();
        let supplied: Vec<Option<&str>> = args.iter().map(|arg| arg.name.as_deref()).collect();
        let matched = builtins::match_args(name, &formal_names, &supplied)?;

        let frame = closure.env.child(name);
        for ((formal, default), ix) in formals.into_iter().zip(matched) {
            let binding = match ix {
                Some(ix) if !args[ix].value.is_missing() => Binding::Promise(Rc::new(Promise::new(
                    args[ix].value.clone(),
                    env.clone(),
                    mask.cloned(),
                    PromiseOrigin::Argument,
                ))),
                _ if !default.is_missing() => Binding::Promise(Rc::new(Promise::new(
                    default.clone(),
                    frame.clone(),
                    None,
                    PromiseOrigin::Default,
                ))),
                _ => Binding::Missing,
            };
            frame.bind(formal.clone(), binding);
        }

        log::debug!("calling {} with {} argument(s)", name, args.len());
        self.eval(&closure.body, &frame, None)
    }
}

/// Whether the CLI should print the value of a top-level expression.
pub fn is_visible(node: &Node) -> bool {
    !matches!(node.callee_name(), Some("<-" | "=" | "print"))
}
