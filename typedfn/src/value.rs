//! Dynamic runtime values tested by type predicates.
//!
//! A [`Value`] is what a dispatcher receives as an argument and what an
//! implementation returns. Functions are values too: [`Callable`] is either a
//! native Rust closure or a dispatcher produced by [`crate::Typed::build`].

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::time::SystemTime;

use indexmap::IndexMap;

use crate::dispatch::TypedFunction;
use crate::error::Result;

/// A native implementation: receives the (possibly regrouped) argument list.
pub type NativeFn = Rc<dyn Fn(Vec<Value>) -> Result<Value>>;

/// A dynamically typed value.
#[derive(Clone)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    Function(Callable),
    Array(Vec<Value>),
    Date(SystemTime),
    /// A regular expression, kept as its pattern source.
    RegExp(String),
    /// A plain object with ordered fields.
    Object(IndexMap<String, Value>),
    Null,
    Undefined,
    /// A host value of any Rust type, matched by user-registered predicates.
    Opaque(Rc<dyn Any>),
}

impl Value {
    /// Wrap a host value so user-registered types can test it.
    pub fn opaque<T: Any>(value: T) -> Self {
        Value::Opaque(Rc::new(value))
    }

    /// Wrap a native closure as a function value.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value> + 'static,
    {
        Value::Function(Callable::native(f))
    }

    /// Borrow the host value if this is an `Opaque` holding a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Opaque(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Function(callable) => Some(callable),
            _ => None,
        }
    }

    /// Short variant name used in debug output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Boolean(_) => "Boolean",
            Value::Function(_) => "Function",
            Value::Array(_) => "Array",
            Value::Date(_) => "Date",
            Value::RegExp(_) => "RegExp",
            Value::Object(_) => "Object",
            Value::Null => "Null",
            Value::Undefined => "Undefined",
            Value::Opaque(_) => "Opaque",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Boolean(b) => write!(f, "Boolean({})", b),
            Value::Function(callable) => write!(f, "Function({:?})", callable),
            Value::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Value::Date(time) => write!(f, "Date({:?})", time),
            Value::RegExp(source) => write!(f, "RegExp(/{}/)", source),
            Value::Object(fields) => f.debug_tuple("Object").field(fields).finish(),
            Value::Null => write!(f, "Null"),
            Value::Undefined => write!(f, "Undefined"),
            Value::Opaque(_) => write!(f, "Opaque(..)"),
        }
    }
}

/// Structural equality; functions and opaque values compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::RegExp(a), Value::RegExp(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Undefined, Value::Undefined) => true,
            (Value::Opaque(a), Value::Opaque(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
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

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<SystemTime> for Value {
    fn from(time: SystemTime) -> Self {
        Value::Date(time)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Function(callable)
    }
}

impl From<TypedFunction> for Value {
    fn from(function: TypedFunction) -> Self {
        Value::Function(Callable::Typed(function))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Something that can be invoked with an argument list.
///
/// `Typed` is the explicit marker for "this callable is itself a dispatcher";
/// the factory uses it to inherit a nested dispatcher's name.
#[derive(Clone)]
pub enum Callable {
    Native(NativeFn),
    Typed(TypedFunction),
}

impl Callable {
    pub fn native<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value> + 'static,
    {
        Callable::Native(Rc::new(f))
    }

    /// Invoke with the given arguments. Errors are returned unchanged.
    pub fn call(&self, args: Vec<Value>) -> Result<Value> {
        match self {
            Callable::Native(f) => f(args),
            Callable::Typed(function) => function.call(args),
        }
    }

    /// The nested dispatcher, if this callable is one.
    pub fn as_typed(&self) -> Option<&TypedFunction> {
        match self {
            Callable::Typed(function) => Some(function),
            Callable::Native(_) => None,
        }
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => Rc::ptr_eq(a, b),
            (Callable::Typed(a), Callable::Typed(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(_) => write!(f, "<native>"),
            Callable::Typed(function) => write!(f, "<typed {:?}>", function.name()),
        }
    }
}

impl From<TypedFunction> for Callable {
    fn from(function: TypedFunction) -> Self {
        Callable::Typed(function)
    }
}
