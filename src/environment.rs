use crate::types::{Symbol, Value};
use std::collections::HashMap;

/// The single binding table shared by a whole session. There are no nested
/// scopes: `def`, `defn` and closure parameters all write here, and a write
/// is visible to every later lookup, including inside running closures.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<Symbol, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `key`, returning whatever it was bound to before.
    pub fn set<T>(&mut self, key: T, value: Value) -> Option<Value>
    where
        T: Into<Symbol>,
    {
        self.bindings.insert(key.into(), value)
    }

    pub fn get(&self, key: &Symbol) -> Option<&Value> {
        self.bindings.get(key)
    }
}
