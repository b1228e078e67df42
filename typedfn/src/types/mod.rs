//! The type registry: named predicates over runtime values.
//!
//! Types are kept in registration order. Lookup is a linear scan that returns
//! the first entry with a matching name, so re-registering a name appends a
//! shadowed duplicate rather than replacing the earlier entry.
//!
//! The registry also owns the ignore set: type names that the signature
//! parser drops from unions before resolving them.

mod builtins;

use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::{Result, TypedError};
use crate::value::Value;

pub use builtins::builtin_types;

/// A pure, total predicate over a single value.
pub type TypeTest = Rc<dyn Fn(&Value) -> bool>;

/// A named type predicate.
#[derive(Clone)]
pub struct TypeEntry {
    pub name: String,
    pub test: TypeTest,
}

impl TypeEntry {
    pub fn new<F>(name: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        Self {
            name: name.into(),
            test: Rc::new(test),
        }
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry").field("name", &self.name).finish()
    }
}

/// Build a type entry from a dynamic `{name, test}` object.
///
/// `test` must be a function value; it is called with the tested value as its
/// single argument and the type matches when it returns `true`.
impl TryFrom<&Value> for TypeEntry {
    type Error = TypedError;

    fn try_from(value: &Value) -> Result<Self> {
        let fields = value.as_object().ok_or_else(|| {
            TypedError::invalid_argument(format!(
                "type entry must be an object, got {}",
                value.kind_name()
            ))
        })?;

        let name = fields
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| TypedError::invalid_argument("type entry field \"name\" must be a string"))?;

        let test = fields
            .get("test")
            .and_then(Value::as_callable)
            .cloned()
            .ok_or_else(|| TypedError::invalid_argument("type entry field \"test\" must be a function"))?;

        Ok(TypeEntry::new(name, move |v: &Value| {
            matches!(test.call(vec![v.clone()]), Ok(Value::Boolean(true)))
        }))
    }
}

/// Check that `name` can appear in signature text.
pub(crate) fn validate_type_name(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(TypedError::invalid_argument(format!("{} must not be empty", what)));
    }
    if let Some(c) = name
        .chars()
        .find(|c| matches!(c, ',' | '|' | '.') || c.is_whitespace())
    {
        return Err(TypedError::invalid_argument(format!(
            "{} \"{}\" contains reserved character {:?}",
            what, name, c
        )));
    }
    Ok(())
}

/// Ordered registry of named type predicates plus the ignore set.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    entries: Vec<TypeEntry>,
    ignore: Vec<String>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the standard built-in types.
    pub fn with_builtins() -> Self {
        Self {
            entries: builtin_types(),
            ignore: Vec::new(),
        }
    }

    /// Append a type. Earlier entries with the same name keep winning lookups.
    pub fn register(&mut self, entry: TypeEntry) -> Result<()> {
        validate_type_name(&entry.name, "type name")?;

        if self.contains(&entry.name) {
            warn!(name = %entry.name, "type registered twice; the earlier entry shadows it");
        } else {
            debug!(name = %entry.name, "registered type");
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Resolve a type name to its predicate.
    pub fn lookup(&self, name: &str) -> Result<TypeTest> {
        if let Some(entry) = self.entries.iter().find(|e| e.name == name) {
            return Ok(Rc::clone(&entry.test));
        }

        let lower = name.to_lowercase();
        let suggestion = self
            .entries
            .iter()
            .find(|e| e.name.to_lowercase() == lower)
            .map(|e| e.name.clone());

        Err(TypedError::UnknownType {
            name: name.to_string(),
            suggestion,
        })
    }

    /// Whether some entry is registered under exactly `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Name of the first registered type whose predicate accepts `value`.
    ///
    /// This is a full scan and is only used to build diagnostics.
    pub fn type_of(&self, value: &Value) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| (e.test)(value))
            .map(|e| e.name.as_str())
    }

    /// Registered names in registration order, duplicates included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn entries(&self) -> &[TypeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a name to the ignore set.
    pub fn ignore(&mut self, name: impl Into<String>) {
        let name = name.into();
        debug!(name = %name, "ignoring type in signatures");
        self.ignore.push(name);
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|ignored| ignored == name)
    }

    pub fn ignored(&self) -> &[String] {
        &self.ignore
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names().collect::<Vec<_>>())
            .field("ignore", &self.ignore)
            .finish()
    }
}
