//! Runtime multiple dispatch over dynamically typed argument lists.
//!
//! A dispatcher is built from several signatures, each an ordered list of
//! accepted parameter types, paired with an implementation. Every call picks
//! the first signature (in registration order) whose types accept the actual
//! arguments and forwards the call to its implementation.
//!
//! ```text
//! Typed ──build──► TypedFunction ──call(args)──► first matching signature ──► implementation
//!   │                   │
//!   ├ TypeRegistry      └ snapshot of the registry for diagnostics
//!   └ ConversionRegistry
//! ```
//!
//! # Example
//!
//! ```
//! use typedfn::{Signatures, Typed, Value};
//!
//! let typed = Typed::create();
//! let describe = typed
//!     .build((
//!         "describe",
//!         Signatures::new()
//!             .with("number", |_| Ok(Value::from("a number")))
//!             .with("string, any...", |args| Ok(Value::from(args[1].as_array().map_or(0, |a| a.len())))),
//!     ))
//!     .unwrap();
//!
//! assert_eq!(describe.call(vec![Value::from(1)]).unwrap(), Value::from("a number"));
//! assert_eq!(describe.call(vec![Value::from("x"), Value::Null, Value::Null]).unwrap(), Value::from(2));
//! assert!(describe.call(vec![Value::Boolean(true)]).is_err());
//! ```

pub mod config;
pub mod conversion;
pub mod dispatch;
pub mod error;
pub mod signature;
pub mod types;
pub mod value;

use tracing::debug;

pub use config::Config;
pub use conversion::{Conversion, ConversionRegistry};
pub use dispatch::{Signatures, TypedFunction};
pub use error::{Result, TypedError};
pub use types::{TypeEntry, TypeRegistry};
pub use value::{Callable, Value};

/// Arguments accepted by [`Typed::build`]: signatures with or without a name.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    name: Option<String>,
    signatures: Signatures,
}

impl From<Signatures> for FunctionDef {
    fn from(signatures: Signatures) -> Self {
        Self {
            name: None,
            signatures,
        }
    }
}

impl<N: Into<String>> From<(N, Signatures)> for FunctionDef {
    fn from((name, signatures): (N, Signatures)) -> Self {
        Self {
            name: Some(name.into()),
            signatures,
        }
    }
}

/// One independent instance of the dispatch system.
///
/// Each instance owns its type registry, ignore set and conversion registry.
/// Registries are read when a dispatcher is built; mutating them afterwards
/// does not affect dispatchers that already exist.
#[derive(Debug, Clone)]
pub struct Typed {
    types: TypeRegistry,
    conversions: ConversionRegistry,
}

impl Default for Typed {
    fn default() -> Self {
        Self::create()
    }
}

impl Typed {
    /// A fresh instance with the standard built-in types.
    pub fn create() -> Self {
        Self::with_config(&Config::default())
    }

    /// A fresh instance configured by `config`.
    pub fn with_config(config: &Config) -> Self {
        let mut types = if config.builtin_types {
            TypeRegistry::with_builtins()
        } else {
            TypeRegistry::new()
        };
        for name in &config.ignore {
            types.ignore(name.clone());
        }

        debug!(types = types.len(), ignored = config.ignore.len(), "created typed instance");
        Self {
            types,
            conversions: ConversionRegistry::new(),
        }
    }

    /// Build a dispatcher from `signatures` or `(name, signatures)`.
    ///
    /// Without an explicit name, the name of the first nested dispatcher
    /// among the implementations is used, or the empty name if there is none.
    pub fn build(&self, def: impl Into<FunctionDef>) -> Result<TypedFunction> {
        let FunctionDef { name, signatures } = def.into();
        let name = match name {
            Some(name) => name,
            None => signatures.inherited_name().unwrap_or_default().to_string(),
        };
        dispatch::build(&self.types, name, signatures)
    }

    /// Register a type for use in signatures built from now on.
    pub fn add_type(&mut self, entry: TypeEntry) -> Result<()> {
        self.types.register(entry)
    }

    /// Register a type described by a dynamic `{name, test}` object.
    pub fn add_type_value(&mut self, entry: &Value) -> Result<()> {
        self.add_type(TypeEntry::try_from(entry)?)
    }

    /// Declare a conversion. Dispatch does not apply conversions.
    pub fn add_conversion(&mut self, conversion: Conversion) -> Result<()> {
        self.conversions.register(conversion)
    }

    /// Declare a conversion described by a dynamic `{from, to, convert}` object.
    pub fn add_conversion_value(&mut self, conversion: &Value) -> Result<()> {
        self.add_conversion(Conversion::try_from(conversion)?)
    }

    /// Drop `name` from unions in signatures built from now on.
    pub fn ignore(&mut self, name: impl Into<String>) {
        self.types.ignore(name);
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn conversions(&self) -> &ConversionRegistry {
        &self.conversions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_named() {
        let typed = Typed::create();
        let f = typed
            .build(("square", Signatures::new().with("number", |args| {
                let n = args[0].as_number().unwrap_or_default();
                Ok(Value::Number(n * n))
            })))
            .unwrap();

        assert_eq!(f.name(), "square");
        assert_eq!(f.call(vec![Value::from(3)]).unwrap(), Value::Number(9.0));
    }

    #[test]
    fn test_build_unnamed_is_empty() {
        let typed = Typed::create();
        let f = typed
            .build(Signatures::new().with("number", |_| Ok(Value::Null)))
            .unwrap();
        assert_eq!(f.name(), "");
    }

    #[test]
    fn test_build_inherits_nested_name() {
        let typed = Typed::create();
        let inner = typed
            .build(("inner", Signatures::new().with("number", |_| Ok(Value::from("n")))))
            .unwrap();
        let other = typed
            .build(("other", Signatures::new().with("string", |_| Ok(Value::from("s")))))
            .unwrap();

        let outer = typed
            .build(
                Signatures::new()
                    .with("boolean", |_| Ok(Value::from("b")))
                    .with_callable("number", inner)
                    .with_callable("string", other),
            )
            .unwrap();

        assert_eq!(outer.name(), "inner");
        assert_eq!(outer.call(vec![Value::from(1)]).unwrap(), Value::from("n"));
        assert_eq!(outer.call(vec![Value::from("x")]).unwrap(), Value::from("s"));
    }

    #[test]
    fn test_explicit_name_overrides_nested() {
        let typed = Typed::create();
        let inner = typed
            .build(("inner", Signatures::new().with("number", |_| Ok(Value::Null))))
            .unwrap();
        let outer = typed
            .build(("outer", Signatures::new().with_callable("number", inner)))
            .unwrap();
        assert_eq!(outer.name(), "outer");
    }

    #[test]
    fn test_add_type_affects_later_builds_only() {
        struct Meters(f64);

        let mut typed = Typed::create();
        assert!(matches!(
            typed.build(Signatures::new().with("Meters", |_| Ok(Value::Null))),
            Err(TypedError::UnknownType { .. })
        ));

        let before = typed
            .build(Signatures::new().with("any", |_| Ok(Value::from("any"))))
            .unwrap();
        typed
            .add_type(TypeEntry::new("Meters", |v| v.downcast_ref::<Meters>().is_some()))
            .unwrap();

        let after = typed
            .build(Signatures::new().with("Meters", |args| {
                let meters = args[0].downcast_ref::<Meters>().map_or(0.0, |m| m.0);
                Ok(Value::Number(meters))
            }))
            .unwrap();

        assert_eq!(after.call(vec![Value::opaque(Meters(2.5))]).unwrap(), Value::Number(2.5));
        assert_eq!(before.call(vec![Value::opaque(Meters(2.5))]).unwrap(), Value::from("any"));
    }

    #[test]
    fn test_add_type_value_validates_shape() {
        let mut typed = Typed::create();
        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), Value::from("positive"));
        fields.insert("test".to_string(), Value::Null);

        let result = typed.add_type_value(&Value::Object(fields));
        assert!(matches!(result, Err(TypedError::InvalidArgument { .. })));
        assert!(!typed.types().contains("positive"));
    }

    #[test]
    fn test_add_conversion_is_not_used_for_matching() {
        let mut typed = Typed::create();
        typed
            .add_conversion(Conversion::new("string", "number", |v| {
                v.as_str()
                    .and_then(|s| s.parse::<f64>().ok())
                    .map_or(Value::Undefined, Value::Number)
            }))
            .unwrap();

        let f = typed
            .build(("f", Signatures::new().with("number", |_| Ok(Value::Null))))
            .unwrap();
        assert!(matches!(
            f.call(vec![Value::from("42")]),
            Err(TypedError::NoMatchingSignature { .. })
        ));
        assert_eq!(typed.conversions().len(), 1);
    }

    #[test]
    fn test_with_config() {
        let config = Config {
            builtin_types: false,
            ignore: vec!["Date".to_string()],
        };
        let typed = Typed::with_config(&config);
        assert!(typed.types().is_empty());
        assert!(typed.types().is_ignored("Date"));

        // Only ignored names: the parameter accepts anything.
        let f = typed
            .build(Signatures::new().with("Date", |_| Ok(Value::from("ok"))))
            .unwrap();
        assert_eq!(f.call(vec![Value::Null]).unwrap(), Value::from("ok"));
    }

    #[test]
    fn test_instances_are_independent() {
        let mut first = Typed::create();
        let second = Typed::create();

        first.add_type(TypeEntry::new("Custom", |_| false)).unwrap();
        first.ignore("Date");

        assert!(first.types().contains("Custom"));
        assert!(!second.types().contains("Custom"));
        assert!(!second.types().is_ignored("Date"));
    }
}
