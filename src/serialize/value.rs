//! Log call arguments.
//!
//! Arrays and objects are shared nodes, so cloning a [`Value`] shares the
//! node and a caller can build reference cycles (`a.self = a`). Anything that
//! walks a `Value` must go through [`super::SafeSerializer`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::{Number, Value as JsonValue};

/// Shared, mutable node of an argument graph.
pub type Node<T> = Rc<RefCell<T>>;

/// One argument of a logging call.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// An error, rendered by its message chain.
    Error(String),
    Array(Node<Vec<Value>>),
    /// Insertion-ordered fields.
    Object(Node<Vec<(String, Value)>>),
}

impl Value {
    /// A new empty object node.
    pub fn object() -> Self {
        Value::Object(Rc::new(RefCell::new(Vec::new())))
    }

    /// A new empty array node.
    pub fn array() -> Self {
        Value::Array(Rc::new(RefCell::new(Vec::new())))
    }

    /// Capture an error and its `source()` chain.
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut text = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            text.push_str("\n  caused by: ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        Value::Error(text)
    }

    /// Set a field on an object, replacing an existing field of the same
    /// name. No-op on anything that is not an object.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        if let Value::Object(node) = self {
            let key = key.into();
            let value = value.into();
            let mut fields = node.borrow_mut();
            match fields.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => fields.push((key, value)),
            }
        }
        self
    }

    /// Append to an array. No-op on anything that is not an array.
    pub fn push(&self, value: impl Into<Value>) -> &Self {
        if let Value::Array(node) = self {
            node.borrow_mut().push(value.into());
        }
        self
    }

    /// Field of an object, by name.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(node) => node
                .borrow()
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Address of the shared node, for cycle detection.
    pub(crate) fn node_addr(&self) -> Option<usize> {
        match self {
            Value::Array(node) => Some(Rc::as_ptr(node) as *const () as usize),
            Value::Object(node) => Some(Rc::as_ptr(node) as *const () as usize),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Derived Debug would recurse forever on a cycle.
        write!(f, "{}", super::SafeSerializer::default().to_json(self))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::from(f64::from(n))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => {
                Value::Array(Rc::new(RefCell::new(items.into_iter().map(Value::from).collect())))
            }
            JsonValue::Object(fields) => Value::Object(Rc::new(RefCell::new(
                fields.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ))),
        }
    }
}

/// Build a `Vec<Value>` from heterogeneous expressions.
///
/// ```
/// let args = cedar::args!["user", 42, true];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::Value::from($arg)),+]
    };
}
