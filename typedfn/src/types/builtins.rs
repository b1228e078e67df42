//! The standard type set every new instance starts with.

use crate::value::Value;

use super::TypeEntry;

/// Built-in types in registration order. `any` comes last so that
/// diagnostics report the most descriptive name for a value.
pub fn builtin_types() -> Vec<TypeEntry> {
    vec![
        TypeEntry::new("number", |v| matches!(v, Value::Number(_))),
        TypeEntry::new("string", |v| matches!(v, Value::String(_))),
        TypeEntry::new("boolean", |v| matches!(v, Value::Boolean(_))),
        TypeEntry::new("Function", |v| matches!(v, Value::Function(_))),
        TypeEntry::new("Array", |v| matches!(v, Value::Array(_))),
        TypeEntry::new("Date", |v| matches!(v, Value::Date(_))),
        TypeEntry::new("RegExp", |v| matches!(v, Value::RegExp(_))),
        TypeEntry::new("Object", |v| matches!(v, Value::Object(_))),
        TypeEntry::new("null", |v| matches!(v, Value::Null)),
        TypeEntry::new("undefined", |v| matches!(v, Value::Undefined)),
        TypeEntry::new("any", |_| true),
    ]
}
