//! Declared conversions between named types.
//!
//! Conversions are metadata: they are validated and stored in registration
//! order, and callers may look them up and apply them, but dispatch never
//! consults them when matching arguments against signatures.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::error::{Result, TypedError};
use crate::types::validate_type_name;
use crate::value::Value;

/// Converts a value of one type into a value of another.
pub type ConvertFn = Rc<dyn Fn(&Value) -> Value>;

/// A declared conversion from `from` to `to`.
#[derive(Clone)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub convert: ConvertFn,
}

impl Conversion {
    pub fn new<F>(from: impl Into<String>, to: impl Into<String>, convert: F) -> Self
    where
        F: Fn(&Value) -> Value + 'static,
    {
        Self {
            from: from.into(),
            to: to.into(),
            convert: Rc::new(convert),
        }
    }

    pub fn apply(&self, value: &Value) -> Value {
        (self.convert)(value)
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversion")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

/// Build a conversion from a dynamic `{from, to, convert}` object.
///
/// A `convert` call that fails yields `undefined`.
impl TryFrom<&Value> for Conversion {
    type Error = TypedError;

    fn try_from(value: &Value) -> Result<Self> {
        let fields = value.as_object().ok_or_else(|| {
            TypedError::invalid_argument(format!(
                "conversion must be an object, got {}",
                value.kind_name()
            ))
        })?;

        let string_field = |key: &str| {
            fields.get(key).and_then(Value::as_str).ok_or_else(|| {
                TypedError::invalid_argument(format!("conversion field \"{}\" must be a string", key))
            })
        };
        let from = string_field("from")?;
        let to = string_field("to")?;

        let convert = fields
            .get("convert")
            .and_then(Value::as_callable)
            .cloned()
            .ok_or_else(|| TypedError::invalid_argument("conversion field \"convert\" must be a function"))?;

        Ok(Conversion::new(from, to, move |v: &Value| {
            convert.call(vec![v.clone()]).unwrap_or(Value::Undefined)
        }))
    }
}

/// Ordered list of declared conversions.
#[derive(Clone, Default)]
pub struct ConversionRegistry {
    conversions: Vec<Conversion>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a conversion. Type names are not checked against the type registry.
    pub fn register(&mut self, conversion: Conversion) -> Result<()> {
        validate_type_name(&conversion.from, "conversion source type")?;
        validate_type_name(&conversion.to, "conversion target type")?;

        debug!(from = %conversion.from, to = %conversion.to, "registered conversion");
        self.conversions.push(conversion);
        Ok(())
    }

    /// First conversion declared from `from` to `to`.
    pub fn find(&self, from: &str, to: &str) -> Option<&Conversion> {
        self.conversions.iter().find(|c| c.from == from && c.to == to)
    }

    /// All conversions declared with source type `from`, in order.
    pub fn from_type<'a>(&'a self, from: &'a str) -> impl Iterator<Item = &'a Conversion> + 'a {
        self.conversions.iter().filter(move |c| c.from == from)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conversion> {
        self.conversions.iter()
    }

    pub fn len(&self) -> usize {
        self.conversions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversions.is_empty()
    }
}

impl fmt::Debug for ConversionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.conversions).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn number_to_string() -> Conversion {
        Conversion::new("number", "string", |v| match v {
            Value::Number(n) => Value::String(n.to_string()),
            other => other.clone(),
        })
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = ConversionRegistry::new();
        registry.register(number_to_string()).unwrap();
        registry
            .register(Conversion::new("boolean", "number", |v| {
                Value::Number(if v.as_bool() == Some(true) { 1.0 } else { 0.0 })
            }))
            .unwrap();

        assert_eq!(registry.len(), 2);
        let conversion = registry.find("number", "string").expect("conversion");
        assert_eq!(conversion.apply(&Value::from(4)), Value::from("4"));
        assert!(registry.find("string", "number").is_none());
        assert_eq!(registry.from_type("boolean").count(), 1);
    }

    #[test]
    fn test_unregistered_type_names_are_accepted() {
        let mut registry = ConversionRegistry::new();
        registry
            .register(Conversion::new("Celsius", "Fahrenheit", |v| v.clone()))
            .unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_rejects_empty_names() {
        let mut registry = ConversionRegistry::new();
        let result = registry.register(Conversion::new("", "string", |v| v.clone()));
        assert!(matches!(result, Err(TypedError::InvalidArgument { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_conversion_from_dynamic_object() {
        let mut fields = IndexMap::new();
        fields.insert("from".to_string(), Value::from("string"));
        fields.insert("to".to_string(), Value::from("number"));
        fields.insert(
            "convert".to_string(),
            Value::function(|args| {
                let parsed = args[0].as_str().and_then(|s| s.parse::<f64>().ok());
                Ok(parsed.map(Value::Number).unwrap_or(Value::Undefined))
            }),
        );

        let conversion = Conversion::try_from(&Value::Object(fields)).unwrap();
        assert_eq!(conversion.from, "string");
        assert_eq!(conversion.to, "number");
        assert_eq!(conversion.apply(&Value::from("2.5")), Value::Number(2.5));
    }

    #[test]
    fn test_conversion_from_malformed_object() {
        let mut fields = IndexMap::new();
        fields.insert("from".to_string(), Value::from("string"));
        fields.insert("convert".to_string(), Value::function(|_| Ok(Value::Null)));
        assert!(matches!(
            Conversion::try_from(&Value::Object(fields)),
            Err(TypedError::InvalidArgument { .. })
        ));

        let mut fields = IndexMap::new();
        fields.insert("from".to_string(), Value::from("string"));
        fields.insert("to".to_string(), Value::from("number"));
        fields.insert("convert".to_string(), Value::Boolean(true));
        assert!(matches!(
            Conversion::try_from(&Value::Object(fields)),
            Err(TypedError::InvalidArgument { .. })
        ));
    }
}
