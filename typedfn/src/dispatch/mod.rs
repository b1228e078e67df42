//! Runtime dispatch over compiled signatures.
//!
//! A [`TypedFunction`] owns an ordered list of compiled signatures. A call
//! scans that list front to back and invokes the implementation of the first
//! signature whose test accepts the arguments:
//!
//! 1. **Scan**: evaluate signature tests in registration order
//! 2. **Stop**: the first accepting signature is selected; later ones are never tested
//! 3. **Regroup**: variadic signatures collect trailing arguments into one `Array`
//! 4. **Invoke**: the implementation's result or error is returned as is
//!
//! When nothing matches, the call fails with
//! [`TypedError::NoMatchingSignature`], naming the first registered type of
//! each actual argument. That lookup only runs on the failure path.

mod table;


use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{Result, TypedError};
use crate::signature::SignatureDefinition;
use crate::types::TypeRegistry;
use crate::value::{Callable, Value};

pub use table::{build, Signatures};

/// Type name reported for arguments no registered type accepts.
pub const UNKNOWN_TYPE: &str = "unknown";

pub(crate) struct DispatchTable {
    name: String,
    definitions: Vec<SignatureDefinition>,
    /// Normalized signature text to implementation.
    index: IndexMap<String, Callable>,
    /// Registry snapshot the signatures were compiled against.
    types: TypeRegistry,
}

/// A dispatcher: one callable over several typed signatures.
///
/// Cloning is cheap and clones share the same table.
#[derive(Clone)]
pub struct TypedFunction {
    inner: Rc<DispatchTable>,
}

impl TypedFunction {
    /// The dispatcher's name; empty when built without one.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Normalized signature text to implementation, in registration order.
    pub fn signatures(&self) -> &IndexMap<String, Callable> {
        &self.inner.index
    }

    /// Normalized signature texts, in registration order.
    pub fn signature_texts(&self) -> impl Iterator<Item = &str> {
        self.inner.definitions.iter().map(|d| d.signature.as_str())
    }

    /// Implementation registered for `signature`, whitespace insensitive.
    pub fn find(&self, signature: &str) -> Option<&Callable> {
        self.inner.index.get(&crate::signature::normalize(signature))
    }

    /// The compiled definitions, in dispatch order.
    pub fn definitions(&self) -> &[SignatureDefinition] {
        &self.inner.definitions
    }

    /// First signature accepting `args`, if any.
    pub fn select(&self, args: &[Value]) -> Option<&SignatureDefinition> {
        self.inner.definitions.iter().find(|d| d.accepts(args))
    }

    /// Dispatch a call.
    pub fn call(&self, args: Vec<Value>) -> Result<Value> {
        let Some(definition) = self.select(&args) else {
            let err = self.no_match(&args);
            debug!(name = %self.inner.name, error = %err, "no matching signature");
            return Err(err);
        };

        trace!(name = %self.inner.name, signature = %definition.signature, "dispatching");
        definition.implementation.call(definition.prepare(args))
    }

    /// Whether both handles refer to the same dispatcher.
    pub fn ptr_eq(&self, other: &TypedFunction) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn no_match(&self, args: &[Value]) -> TypedError {
        let actual_types = args
            .iter()
            .map(|arg| {
                self.inner
                    .types
                    .type_of(arg)
                    .unwrap_or(UNKNOWN_TYPE)
                    .to_string()
            })
            .collect();

        TypedError::NoMatchingSignature {
            name: self.inner.name.clone(),
            actual_types,
            signatures: self.signature_texts().map(str::to_string).collect(),
        }
    }
}

impl fmt::Debug for TypedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedFunction")
            .field("name", &self.inner.name)
            .field("signatures", &self.signature_texts().collect::<Vec<_>>())
            .finish()
    }
}
