//! Compilation of signature text into argument-list predicates.
//!
//! # Grammar
//!
//! ```text
//! params := param (',' param)*
//! param  := union ('...')?        -- '...' only on the last param
//! union  := typeName ('|' typeName)*
//! ```
//!
//! Whitespace around tokens is insignificant and an empty string declares a
//! zero-argument signature. Every type name is resolved against the
//! [`TypeRegistry`] when the signature is compiled, so unknown names fail
//! here and never at call time.

use std::fmt;
use std::rc::Rc;

use crate::error::{Result, TypedError};
use crate::types::{TypeRegistry, TypeTest};
use crate::value::{Callable, Value};

/// Marker for a variable-arity trailing parameter.
pub const VARARGS_MARKER: &str = "...";

/// A predicate over a whole argument list.
pub type ArgsTest = Rc<dyn Fn(&[Value]) -> bool>;

/// Regroups trailing arguments of a variadic call into one `Array`.
pub type PreProcess = Rc<dyn Fn(Vec<Value>) -> Vec<Value>>;

/// One compiled signature of a dispatcher.
#[derive(Clone)]
pub struct SignatureDefinition {
    /// Signature text with all whitespace removed.
    pub signature: String,
    pub is_variadic: bool,
    pub test: ArgsTest,
    /// Present exactly when `is_variadic` is set.
    pub preprocess: Option<PreProcess>,
    pub implementation: Callable,
}

impl SignatureDefinition {
    /// Compile `text` and pair it with its implementation.
    pub fn compile(registry: &TypeRegistry, text: &str, implementation: Callable) -> Result<Self> {
        let test = compile_signature(registry, text)?;
        let is_variadic = text.contains(VARARGS_MARKER);
        let preprocess = if is_variadic {
            Some(create_var_arg_preprocess(text))
        } else {
            None
        };

        Ok(Self {
            signature: normalize(text),
            is_variadic,
            test,
            preprocess,
            implementation,
        })
    }

    /// Whether this signature accepts `args`.
    pub fn accepts(&self, args: &[Value]) -> bool {
        (self.test)(args)
    }

    /// Shape `args` the way the implementation expects them.
    pub fn prepare(&self, args: Vec<Value>) -> Vec<Value> {
        match &self.preprocess {
            Some(preprocess) => preprocess(args),
            None => args,
        }
    }
}

impl fmt::Debug for SignatureDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureDefinition")
            .field("signature", &self.signature)
            .field("is_variadic", &self.is_variadic)
            .field("implementation", &self.implementation)
            .finish()
    }
}

/// Canonical form of signature text: whitespace removed.
pub fn normalize(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Compile a single `|`-separated parameter into a value predicate.
///
/// Ignored and empty names are dropped first. No remaining names accepts
/// anything; one name uses the registered predicate directly.
pub fn compile_parameter(registry: &TypeRegistry, text: &str) -> Result<TypeTest> {
    let mut tests = text
        .split('|')
        .map(str::trim)
        .filter(|name| !name.is_empty() && !registry.is_ignored(name))
        .map(|name| registry.lookup(name))
        .collect::<Result<Vec<_>>>()?;

    let test: TypeTest = match tests.len() {
        0 => Rc::new(|_: &Value| true),
        1 => tests.remove(0),
        2 => {
            let (first, second) = (Rc::clone(&tests[0]), Rc::clone(&tests[1]));
            Rc::new(move |v: &Value| first(v) || second(v))
        }
        _ => Rc::new(move |v: &Value| tests.iter().any(|test| test(v))),
    };
    Ok(test)
}

/// Split signature text into trimmed parameters.
fn split_params(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(',').map(str::trim).collect()
}

/// Compile signature text into a predicate over a whole argument list.
pub fn compile_signature(registry: &TypeRegistry, text: &str) -> Result<ArgsTest> {
    let params = split_params(text);

    if let Some(marker) = text.find(VARARGS_MARKER) {
        if text.rfind(',').is_some_and(|comma| comma > marker) {
            return Err(TypedError::syntax(
                text,
                "variable arguments operator \"...\" is only allowed on the last parameter",
            ));
        }
        return compile_variadic(registry, &params);
    }

    let mut tests = params
        .iter()
        .map(|param| compile_parameter(registry, param))
        .collect::<Result<Vec<_>>>()?;

    let test: ArgsTest = match tests.len() {
        0 => Rc::new(|args: &[Value]| args.is_empty()),
        1 => {
            let test0 = tests.remove(0);
            Rc::new(move |args: &[Value]| args.len() == 1 && test0(&args[0]))
        }
        2 => {
            let (test0, test1) = (Rc::clone(&tests[0]), Rc::clone(&tests[1]));
            Rc::new(move |args: &[Value]| args.len() == 2 && test0(&args[0]) && test1(&args[1]))
        }
        count => Rc::new(move |args: &[Value]| {
            args.len() == count && tests.iter().zip(args).all(|(test, arg)| test(arg))
        }),
    };
    Ok(test)
}

/// Fixed parameters are tested one by one; the last predicate tests every
/// trailing argument, of which there must be at least one.
fn compile_variadic(registry: &TypeRegistry, params: &[&str]) -> Result<ArgsTest> {
    let Some((last, fixed)) = params.split_last() else {
        return Ok(Rc::new(|args: &[Value]| !args.is_empty()));
    };

    let fixed_tests = fixed
        .iter()
        .map(|param| compile_parameter(registry, param))
        .collect::<Result<Vec<_>>>()?;
    let rest_test = compile_parameter(registry, &last.replacen(VARARGS_MARKER, "", 1))?;
    let fixed_count = fixed_tests.len();

    Ok(Rc::new(move |args: &[Value]| {
        args.len() > fixed_count
            && fixed_tests.iter().zip(args).all(|(test, arg)| test(arg))
            && args[fixed_count..].iter().all(|arg| rest_test(arg))
    }))
}

/// Build the argument regrouping for a variadic signature.
///
/// The returned function keeps the fixed arguments and collects everything
/// from the variadic position onward into a single trailing `Array`.
pub fn create_var_arg_preprocess(text: &str) -> PreProcess {
    let fixed_count = text.matches(',').count();

    Rc::new(move |mut args: Vec<Value>| {
        let rest = if args.len() > fixed_count {
            args.split_off(fixed_count)
        } else {
            Vec::new()
        };
        args.push(Value::Array(rest));
        args
    })
}
