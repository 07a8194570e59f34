use crate::{error::Error, value::Value};
use std::rc::Rc;

/// Read-only bindings consulted before the lexical environment when looking up
/// bare symbols. Callee lookups never see it.
#[derive(Debug, Clone, PartialEq)]
pub struct DataMask(Rc<[(Rc<str>, Value)]>);

impl DataMask {
    /// Every element of the list must be named.
    pub fn from_list(callee: &str, value: &Value) -> Result<Self, Error> {
        match value {
            Value::List(items) => items
                .iter()
                .map(|(name, value)| match name {
                    Some(name) => Ok((name.clone(), value.clone())),
                    None => Err(Error::ArityOrBinding {
                        callee: Rc::from(callee),
                        reason: String::from("all elements of a data mask must be named"),
                    }),
                })
                .collect(),
            other => Err(Error::TypeMismatch {
                callee: Rc::from(callee),
                expected: "a named list",
                actual: other.type_name(),
            }),
        }
    }

    /// The first binding of `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(key, _)| &**key == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &Rc<str>> {
        self.0.iter().map(|(name, _)| name)
    }
}

impl FromIterator<(Rc<str>, Value)> for DataMask {
    fn from_iter<T: IntoIterator<Item = (Rc<str>, Value)>>(iter: T) -> Self {
        DataMask(iter.into_iter().collect())
    }
}
