use crate::env::Env;
use std::fmt;
use tidy_syntax::Node;

/// An expression together with the environment it should be evaluated in.
#[derive(Clone)]
pub struct Quosure {
    expr: Node,
    env: Env,
}

impl Quosure {
    pub fn new(expr: Node, env: Env) -> Self {
        Quosure { expr, env }
    }

    pub fn expr(&self) -> &Node {
        &self.expr
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn render(&self) -> String {
        format!("<quosure: ^{}>", self.expr.render())
    }
}

/// Two quosures are equal when their expressions match and they share an environment.
impl PartialEq for Quosure {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr && self.env.ptr_eq(&other.env)
    }
}

impl fmt::Debug for Quosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quosure")
            .field("expr", &self.expr)
            .field("env", &self.env)
            .finish()
    }
}
