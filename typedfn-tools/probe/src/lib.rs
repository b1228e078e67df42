//! Dry-run signature matching.
//!
//! Builds a dispatcher whose implementations only report which signature was
//! selected and what arguments it received, then feeds it JSON argument
//! lists. Useful for checking signature order and union/variadic behavior
//! before wiring real implementations.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use typedfn::{Config, Signatures, Typed, TypedError, TypedFunction, Value};

/// Errors reported by the probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid probe file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid argument list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("argument list must be a JSON array, got `{0}`")]
    NotAList(String),

    #[error(transparent)]
    Typed(#[from] TypedError),
}

pub type ProbeResult<T> = Result<T, ProbeError>;

/// A probe description: instance config plus the signatures to try.
///
/// ```toml
/// name = "area"
/// ignore = ["Date"]
/// signatures = ["number, number", "Object", "any..."]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeFile {
    pub name: Option<String>,
    pub signatures: Vec<String>,
    #[serde(flatten)]
    pub config: Config,
}

impl ProbeFile {
    pub fn load(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let source = fs::read_to_string(path)?;
        Ok(toml::from_str(&source)?)
    }
}

/// Outcome of probing one argument list.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Matched {
        /// Position of the selected signature, starting at zero.
        index: usize,
        signature: String,
        /// Arguments as the implementation received them.
        forwarded: serde_json::Value,
    },
    NoMatch {
        message: String,
    },
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Matched { index, signature, forwarded } => {
                write!(f, "matched #{} `{}` with {}", index, signature, forwarded)
            }
            Outcome::NoMatch { message } => write!(f, "no match: {}", message),
        }
    }
}

/// A dispatcher built from a probe file.
pub struct Probe {
    function: TypedFunction,
}

impl Probe {
    pub fn new(file: &ProbeFile) -> ProbeResult<Self> {
        let typed = Typed::with_config(&file.config);

        let mut signatures = Signatures::new();
        for (index, text) in file.signatures.iter().enumerate() {
            let signature = typedfn::signature::normalize(text);
            signatures = signatures.with(text.as_str(), move |args| {
                let mut report = indexmap::IndexMap::new();
                report.insert("index".to_string(), Value::from(index));
                report.insert("signature".to_string(), Value::from(signature.as_str()));
                report.insert("args".to_string(), Value::Array(args));
                Ok(Value::Object(report))
            });
        }

        let function = match &file.name {
            Some(name) => typed.build((name.as_str(), signatures))?,
            None => typed.build(signatures)?,
        };
        Ok(Self { function })
    }

    pub fn function(&self) -> &TypedFunction {
        &self.function
    }

    /// Probe a JSON argument list such as `["a", 1, 2]`.
    pub fn probe_json(&self, args: &str) -> ProbeResult<Outcome> {
        match serde_json::from_str::<serde_json::Value>(args)? {
            serde_json::Value::Array(items) => self.probe(items.into_iter().map(Value::from).collect()),
            other => Err(ProbeError::NotAList(other.to_string())),
        }
    }

    pub fn probe(&self, args: Vec<Value>) -> ProbeResult<Outcome> {
        match self.function.call(args) {
            Ok(report) => Ok(outcome_from_report(&report)),
            Err(err @ TypedError::NoMatchingSignature { .. }) => Ok(Outcome::NoMatch {
                message: err.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }
}

fn outcome_from_report(report: &Value) -> Outcome {
    let fields = report.as_object();
    let field = |key: &str| fields.and_then(|f| f.get(key));

    Outcome::Matched {
        index: field("index").and_then(Value::as_number).unwrap_or_default() as usize,
        signature: field("signature")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        forwarded: field("args").map(to_json).unwrap_or(serde_json::Value::Null),
    }
}

/// Render a value as JSON for display. Non-data values become tagged strings.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(n.to_string())),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Object(fields) => serde_json::Value::Object(
            fields.iter().map(|(k, v)| (k.clone(), to_json(v))).collect(),
        ),
        Value::Null => serde_json::Value::Null,
        Value::RegExp(source) => serde_json::Value::String(format!("/{}/", source)),
        other => serde_json::Value::String(format!("<{}>", other.kind_name())),
    }
}
