//! # jsinterp
//!
//! jsinterp is a small interpreter for the subset of JavaScript found in
//! obfuscated web-page snippets: signature and URL-parameter transforms built
//! from functions, arithmetic and bitwise operators, arrays, strings, loops,
//! `switch` with fallthrough and `try`/`catch`.
//!
//! An interpreter is created from the snippet's source text. Construction only
//! tokenizes the text and indexes its top-level definitions; function bodies
//! are parsed the first time they run.
//!
//! ```
//! use jsinterp::{JsInterpreter, Value};
//!
//! let interp = JsInterpreter::new("function f(a){ return a.split('').reverse().join('') }").unwrap();
//! let result = interp.call_function("f", &[Value::from("abc")]).unwrap();
//! assert_eq!(result, Value::from("cba"));
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::rc::Rc;

use crate::interpreter::{
    evaluator::{core::Context, function::globals},
    program::Program,
    value::environment::Environment,
};

/// Defines the structure of parsed code.
///
/// This module declares the expression and statement trees built by the
/// parser and walked by the evaluator. Every node carries the byte offset of
/// the source text it came from.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// Parsing and runtime faults are kept as separate enums internally and
/// converted into the single [`ExtractorError`] at the public boundary.
pub mod error;
/// Orchestrates code execution.
///
/// Ties together the lexer, the parser, the lazily parsed program, the
/// evaluator and the value model.
pub mod interpreter;
/// Numeric conversions shared by the parser, the operators and the built-in
/// functions.
pub mod util;

pub use error::{ExtractorError, FaultKind};
pub use interpreter::value::core::Value;

/// Tunable limits of an interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterOptions {
    /// How deeply script functions may call each other before the call fails
    /// with [`ExtractorError::TooMuchRecursion`].
    pub max_call_depth: usize,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self { max_call_depth: 100 }
    }
}

/// An interpreter bound to one snippet.
///
/// The global scope lives as long as the interpreter: globals assigned by one
/// call are visible to the next. An interpreter is not `Send`; independent
/// snippets can run on different threads, each with its own interpreter.
#[derive(Debug)]
pub struct JsInterpreter {
    program: Rc<Program>,
    globals: Rc<Environment>,
    options: InterpreterOptions,
}

impl JsInterpreter {
    /// Creates an interpreter with default options.
    ///
    /// # Errors
    /// [`ExtractorError::Syntax`] if the source contains characters that do
    /// not form tokens or has unbalanced brackets at the top level.
    pub fn new(source: &str) -> Result<Self, ExtractorError> {
        Self::with_options(source, InterpreterOptions::default())
    }

    /// Creates an interpreter with the given options.
    pub fn with_options(source: &str, options: InterpreterOptions) -> Result<Self, ExtractorError> {
        let program = Rc::new(Program::new(source)?);
        let globals = Environment::global();
        globals::install(&globals);
        Ok(Self { program,
                  globals,
                  options })
    }

    /// Names of the top-level functions, in source order.
    #[must_use]
    pub fn function_names(&self) -> &[String] {
        self.program.function_names()
    }

    /// Calls the top-level function `name` with `args`.
    ///
    /// # Errors
    /// - [`ExtractorError::Reference`] if no such name is defined.
    /// - [`ExtractorError::Type`] if the name is not a function.
    /// - Any fault raised by the function and not caught inside it.
    ///
    /// ## Example
    /// ```
    /// use jsinterp::{JsInterpreter, Value};
    ///
    /// let interp = JsInterpreter::new("function x4(a){return 2*a+1;}").unwrap();
    /// assert_eq!(interp.call_function("x4", &[Value::from(3)]).unwrap(), Value::from(7));
    /// assert!(interp.call_function("missing", &[]).is_err());
    /// ```
    #[tracing::instrument(skip(self, args), fields(args = args.len()))]
    pub fn call_function(&self, name: &str, args: &[Value]) -> Result<Value, ExtractorError> {
        self.extract_function(name)?.call(args)
    }

    /// Looks up the top-level function `name` and returns a handle that can be
    /// called repeatedly.
    ///
    /// The function is parsed once, here; later calls through the handle skip
    /// the lookup.
    ///
    /// # Errors
    /// As for [`JsInterpreter::call_function`], minus faults raised by the
    /// call itself.
    pub fn extract_function(&self, name: &str) -> Result<JsFunctionHandle, ExtractorError> {
        let mut context = self.context();
        let function = context.lookup(name, &self.globals, 0)?;
        if !function.is_callable() {
            return Err(ExtractorError::Type { details: format!("{name} is not a function"),
                                              pos:     0, });
        }
        Ok(JsFunctionHandle { name: name.to_string(),
                              function,
                              program: Rc::clone(&self.program),
                              globals: Rc::clone(&self.globals),
                              options: self.options })
    }

    fn context(&self) -> Context {
        Context::new(Rc::clone(&self.program),
                     Rc::clone(&self.globals),
                     self.options.max_call_depth)
    }
}

/// A script function extracted from an interpreter.
///
/// The handle shares the interpreter's program and global scope, so it stays
/// usable after the interpreter itself is dropped.
#[derive(Debug)]
pub struct JsFunctionHandle {
    name:     String,
    function: Value,
    program:  Rc<Program>,
    globals:  Rc<Environment>,
    options:  InterpreterOptions,
}

impl JsFunctionHandle {
    /// The name the function was extracted under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calls the function.
    pub fn call(&self, args: &[Value]) -> Result<Value, ExtractorError> {
        tracing::debug!(name = %self.name, args = args.len(), "call started");
        let mut context = Context::new(Rc::clone(&self.program),
                                       Rc::clone(&self.globals),
                                       self.options.max_call_depth);
        match context.call_value(&self.function, args.to_vec(), 0) {
            Ok(value) => {
                tracing::debug!(name = %self.name, "call finished");
                Ok(value)
            },
            Err(error) => {
                let error = ExtractorError::from(error);
                tracing::debug!(name = %self.name, kind = ?error.kind(), %error, "call failed");
                Err(error)
            },
        }
    }

    /// Calls the function with JSON arguments and returns a JSON result.
    ///
    /// ## Example
    /// ```
    /// use jsinterp::JsInterpreter;
    /// use serde_json::json;
    ///
    /// let interp = JsInterpreter::new("var f = function(a){ a.push(a.length); return a }").unwrap();
    /// let f = interp.extract_function("f").unwrap();
    /// assert_eq!(f.call_json(&[json!([7])]).unwrap(), json!([7, 1]));
    /// ```
    pub fn call_json(&self, args: &[serde_json::Value]) -> Result<serde_json::Value, ExtractorError> {
        let args: Vec<Value> = args.iter().map(Value::from_json).collect();
        self.call(&args).map(|value| value.to_json())
    }
}

/// Creates an interpreter for `source` and calls `name` once.
///
/// ## Example
/// ```
/// use jsinterp::{Value, call_function};
///
/// let result = call_function("function f(){ return 1 << 5 }", "f", &[]).unwrap();
/// assert_eq!(result, Value::from(32));
/// ```
pub fn call_function(source: &str, name: &str, args: &[Value]) -> Result<Value, ExtractorError> {
    JsInterpreter::new(source)?.call_function(name, args)
}
