//! Ordered signature maps and the dispatch table builder.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::Result;
use crate::signature::SignatureDefinition;
use crate::types::TypeRegistry;
use crate::value::{Callable, Value};

use super::{DispatchTable, TypedFunction};

/// Signature texts paired with implementations, in dispatch priority order.
///
/// Order is preserved exactly as pushed; the first signature accepting a
/// call wins, however specific later signatures are.
#[derive(Clone, Debug, Default)]
pub struct Signatures {
    entries: Vec<(String, Callable)>,
}

impl Signatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a native implementation.
    pub fn with<F>(mut self, signature: impl Into<String>, implementation: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value> + 'static,
    {
        self.push(signature, Callable::native(implementation));
        self
    }

    /// Add any callable, a nested dispatcher included.
    pub fn with_callable(mut self, signature: impl Into<String>, implementation: impl Into<Callable>) -> Self {
        self.push(signature, implementation.into());
        self
    }

    pub fn push(&mut self, signature: impl Into<String>, implementation: Callable) {
        self.entries.push((signature.into(), implementation));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Callable)> {
        self.entries.iter().map(|(text, callable)| (text.as_str(), callable))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the first nested dispatcher among the implementations.
    pub(crate) fn inherited_name(&self) -> Option<&str> {
        self.entries
            .iter()
            .find_map(|(_, callable)| callable.as_typed())
            .map(TypedFunction::name)
    }
}

impl<S: Into<String>> FromIterator<(S, Callable)> for Signatures {
    fn from_iter<I: IntoIterator<Item = (S, Callable)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(text, callable)| (text.into(), callable))
                .collect(),
        }
    }
}

impl IntoIterator for Signatures {
    type Item = (String, Callable);
    type IntoIter = std::vec::IntoIter<(String, Callable)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Compile every signature against `registry` and assemble a dispatcher.
///
/// The first malformed signature aborts the build and its error is returned
/// unchanged. No deduplication happens: definitions keep input order, and
/// the introspection index keeps the last implementation for signature texts
/// that normalize identically.
pub fn build(registry: &TypeRegistry, name: impl Into<String>, signatures: Signatures) -> Result<TypedFunction> {
    let name = name.into();

    let mut definitions = Vec::with_capacity(signatures.len());
    let mut index = IndexMap::with_capacity(signatures.len());
    for (text, implementation) in signatures {
        let definition = SignatureDefinition::compile(registry, &text, implementation)?;
        index.insert(definition.signature.clone(), definition.implementation.clone());
        definitions.push(definition);
    }

    debug!(name = %name, signatures = definitions.len(), "built typed function");

    Ok(TypedFunction {
        inner: Rc::new(DispatchTable {
            name,
            definitions,
            index,
            types: registry.clone(),
        }),
    })
}
