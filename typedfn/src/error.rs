//! Error types for signature compilation, registry mutation and dispatch.

use std::fmt;

use thiserror::Error;

/// Name reported for dispatchers built without a name.
pub const UNNAMED: &str = "unnamed";

/// Errors raised by the type registry, the signature parser and dispatchers.
#[derive(Debug, Error)]
pub enum TypedError {
    /// A signature referenced a type name that is not registered.
    #[error("unknown type \"{name}\"{}", DidYouMean(.suggestion))]
    UnknownType {
        name: String,
        suggestion: Option<String>,
    },

    /// Signature text does not follow the signature grammar.
    #[error("invalid signature \"{signature}\": {message}")]
    Syntax { signature: String, message: String },

    /// A registry mutator was given a malformed entry.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// No declared signature accepts the actual arguments.
    #[error(
        "function {} does not support arguments of type ({})",
        display_name(.name),
        .actual_types.join(", ")
    )]
    NoMatchingSignature {
        /// Dispatcher name (empty when unnamed).
        name: String,
        /// For each actual argument, the first registered type accepting it.
        actual_types: Vec<String>,
        /// Normalized texts of the signatures that were tried, in order.
        signatures: Vec<String>,
    },

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// An error raised by implementation code, passed through dispatch as is.
    #[error(transparent)]
    Implementation(Box<dyn std::error::Error + Send + Sync>),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, TypedError>;

impl TypedError {
    /// Wrap an arbitrary error raised from implementation code.
    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        TypedError::Implementation(err.into())
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        TypedError::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn syntax(signature: &str, message: impl Into<String>) -> Self {
        TypedError::Syntax {
            signature: signature.to_string(),
            message: message.into(),
        }
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        UNNAMED
    } else {
        name
    }
}

struct DidYouMean<'a>(&'a Option<String>);

impl fmt::Display for DidYouMean<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(suggestion) => write!(f, "; did you mean \"{}\"?", suggestion),
            None => Ok(()),
        }
    }
}
