use crate::{mask::DataMask, value::Value};
use fnv::FnvHashMap;
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};
use tidy_syntax::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseOrigin {
    /// An expression supplied by the caller.
    Argument,
    /// A formal's default expression, evaluated in the function's own frame.
    Default,
}

/// A lazily evaluated argument.
pub struct Promise {
    pub expr: Node,
    pub env: Env,
    pub mask: Option<DataMask>,
    pub origin: PromiseOrigin,
    forcing: Cell<bool>,
    value: RefCell<Option<Value>>,
}

impl Promise {
    pub fn new(expr: Node, env: Env, mask: Option<DataMask>, origin: PromiseOrigin) -> Self {
        Promise {
            expr,
            env,
            mask,
            origin,
            forcing: Cell::new(false),
            value: RefCell::new(None),
        }
    }

    pub fn value(&self) -> Option<Value> {
        self.value.borrow().clone()
    }

    pub fn is_forced(&self) -> bool {
        self.value.borrow().is_some()
    }

    /// Marks the promise as being evaluated. Returns `false` if it already was.
    pub(crate) fn start_forcing(&self) -> bool {
        !self.forcing.replace(true)
    }

    pub(crate) fn finish_forcing(&self, value: Option<Value>) {
        self.forcing.set(false);
        if value.is_some() {
            *self.value.borrow_mut() = value;
        }
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("expr", &self.expr)
            .field("env", &self.env)
            .field("origin", &self.origin)
            .field("forced", &self.is_forced())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Binding {
    Value(Value),
    Promise(Rc<Promise>),
    /// A formal that was neither supplied nor given a default.
    Missing,
}

struct Frame {
    label: Rc<str>,
    bindings: FnvHashMap<Rc<str>, Binding>,
    parent: Option<Env>,
}

/// A shared, mutable scope.
#[derive(Clone)]
pub struct Env(Rc<RefCell<Frame>>);

impl Env {
    pub fn with_label<I>(label: &str, parent: Option<&Env>, bindings: I) -> Self
    where
        I: IntoIterator<Item = (Rc<str>, Value)>,
    {
        let bindings = bindings
            .into_iter()
            .map(|(name, value)| (name, Binding::Value(value)))
            .collect();
        Env(Rc::new(RefCell::new(Frame {
            label: Rc::from(label),
            bindings,
            parent: parent.cloned(),
        })))
    }

    pub fn new<I>(parent: Option<&Env>, bindings: I) -> Self
    where
        I: IntoIterator<Item = (Rc<str>, Value)>,
    {
        Env::with_label("anonymous", parent, bindings)
    }

    /// A fresh global environment, whose parent holds the builtins.
    pub fn global() -> Self {
        Env::with_label("global", Some(&crate::builtins::base_env()), Vec::new())
    }

    pub fn child(&self, label: &str) -> Self {
        Env::with_label(label, Some(self), Vec::new())
    }

    pub fn label(&self) -> Rc<str> {
        self.0.borrow().label.clone()
    }

    pub fn parent(&self) -> Option<Env> {
        self.0.borrow().parent.clone()
    }

    pub fn ptr_eq(&self, other: &Env) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn define(&self, name: &str, value: Value) {
        self.bind(Rc::from(name), Binding::Value(value))
    }

    pub fn bind(&self, name: Rc<str>, binding: Binding) {
        self.0.borrow_mut().bindings.insert(name, binding);
    }

    /// A binding in this frame only.
    pub fn get_local(&self, name: &str) -> Option<Binding> {
        self.0.borrow().bindings.get(name).cloned()
    }

    /// The nearest binding of `name`, walking outward through the parents.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        let mut current = self.clone();
        loop {
            if let Some(binding) = current.get_local(name) {
                return Some(binding);
            }
            let parent = current.parent()?;
            current = parent;
        }
    }

    /// Bound names in this frame, sorted.
    pub fn names(&self) -> Vec<Rc<str>> {
        let mut names: Vec<Rc<str>> = self.0.borrow().bindings.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<environment: {}>", self.label())
    }
}
