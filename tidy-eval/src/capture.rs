use crate::{
    env::{Binding, Env, PromiseOrigin},
    error::Error,
    quosure::Quosure,
};
use std::rc::Rc;
use tidy_syntax::Node;

/// The expression the caller supplied for parameter `name` of the frame `env`,
/// paired with the caller's environment.
///
/// Only a supplied argument whose promise hasn't been forced can be captured.
pub fn capture_argument_with_env(env: &Env, name: &str) -> Result<Quosure, Error> {
    match env.get_local(name) {
        Some(Binding::Promise(promise))
            if promise.origin == PromiseOrigin::Argument && !promise.is_forced() =>
        {
            Ok(Quosure::new(promise.expr.clone(), promise.env.clone()))
        }
        _ => Err(Error::UnboundArgument {
            name: Rc::from(name),
        }),
    }
}

pub fn capture_argument(env: &Env, name: &str) -> Result<Node, Error> {
    capture_argument_with_env(env, name).map(|quosure| quosure.expr().clone())
}
