use crate::evaluator::{self, Context};
use derive_more::{Deref, From};
use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

pub type Int = i64;

#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.into())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Deref, From, Debug)]
pub struct List(pub Vec<Value>);

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    name: String,
    expected: Arity,
    got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "when evaluating {} expected {} arguments, but received {}",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name: name.to_string(),
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

/// A built-in operator. Primitives are not bound in the environment: an
/// unbound symbol whose name matches a primitive is callable as that
/// primitive.
pub struct PrimitiveFn {
    pub name: &'static str,
    pub arity: Arity,
    /// Apply `strip_array` to the operands before checking arity.
    pub normalizes: bool,
    pub fn_ptr: fn(&[Value], &mut Context) -> evaluator::Result,
}

impl fmt::Debug for PrimitiveFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "primitive function #<{}>", self.name)
    }
}

/// A user-defined function: parameter names plus an unevaluated body.
/// Closures capture nothing; their body runs against the one shared
/// environment.
#[derive(Debug)]
pub struct Closure {
    pub parameters: Vec<Symbol>,
    pub body: Value,
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#<fn ({})>", self.parameters.iter().join(" "))
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Symbol(Symbol),
    Integer(Int),
    Float(f64),
    Boolean(bool),
    Text(String),
    List(Rc<List>),
    Closure(Rc<Closure>),
}

pub(crate) fn truthy(value: &Value) -> bool {
    use Value::*;
    match value {
        Nil => false,
        Boolean(b) => *b,
        Symbol(_) | Integer(_) | Float(_) | Text(_) | List(_) | Closure(_) => true,
    }
}

/// Unwraps single-element lists whose only element is itself a list, until
/// the slice is a "logical list". The reader wraps nested call forms this way.
pub fn strip_array(mut items: &[Value]) -> &[Value] {
    while let [Value::List(inner)] = items {
        items = inner.as_slice();
    }
    items
}

impl Value {
    pub fn new_list() -> Self {
        Self::List(Rc::new(List(Vec::new())))
    }

    pub fn wrap_list(elements: Vec<Value>) -> Self {
        Self::List(Rc::new(List(elements)))
    }

    pub fn new_symbol(name: &str) -> Self {
        Self::Symbol(Symbol::from(name))
    }

    pub fn new_closure(parameters: Vec<Symbol>, body: Value) -> Self {
        Self::Closure(Rc::new(Closure { parameters, body }))
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Ordering used by `<`. Numbers compare across integer and float,
    /// texts and symbols compare lexicographically.
    pub(crate) fn partial_compare(&self, other: &Self) -> Option<Ordering> {
        use Value::*;
        match (self, other) {
            (Integer(x), Integer(y)) => Some(x.cmp(y)),
            (Text(x), Text(y)) => Some(x.cmp(y)),
            (Symbol(x), Symbol(y)) => Some(x.0.cmp(&y.0)),
            _ => match (self.as_float(), other.as_float()) {
                (Some(x), Some(y)) => x.partial_cmp(&y),
                _ => None,
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Nil, Nil) => true,
            (Symbol(x), Symbol(y)) => x == y,
            (Integer(x), Integer(y)) => x == y,
            (Boolean(x), Boolean(y)) => x == y,
            (Text(x), Text(y)) => x == y,
            (List(x), List(y)) => x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| a == b),
            (Closure(x), Closure(y)) => Rc::ptr_eq(x, y),
            (Integer(_), Float(_)) | (Float(_), Integer(_)) | (Float(_), Float(_)) => {
                self.as_float() == other.as_float()
            }
            _ => false,
        }
    }
}
