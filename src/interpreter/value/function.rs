use std::rc::Rc;

use crate::{
    ast::FunctionDef,
    interpreter::{evaluator::core::EvalResult, value::{core::Value, environment::Environment}},
};

/// Signature of a built-in function.
///
/// Receives the bound receiver (`Value::Undefined` for free functions), the
/// evaluated arguments and the offset of the call for error reporting.
pub type NativeFn = fn(&Value, &[Value], usize) -> EvalResult<Value>;

/// A script function value: a parsed definition closed over the scope it was
/// created in.
pub struct JsFunction {
    /// The shared parsed definition.
    pub def:   Rc<FunctionDef>,
    /// The defining scope; calls chain their frame to it.
    pub scope: Rc<Environment>,
}

impl JsFunction {
    /// Wraps a definition and its scope into a callable value.
    #[must_use]
    pub fn closure(def: Rc<FunctionDef>, scope: Rc<Environment>) -> Value {
        Value::Function(Rc::new(Self { def, scope }))
    }

    /// The declared name, or `"anonymous"`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.def.name.as_deref().unwrap_or("anonymous")
    }
}

impl std::fmt::Debug for JsFunction {
    // Scopes may refer back to the function, so only the signature is shown.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "function {}({})", self.name(), self.def.params.join(", "))
    }
}

/// A built-in function, such as `parseInt` or an array method bound to its
/// array.
pub struct NativeFunction {
    /// The name the function is reached by.
    pub name:     &'static str,
    /// The receiver for methods; `Value::Undefined` for free functions.
    pub receiver: Value,
    /// The implementation.
    pub func:     NativeFn,
}

impl NativeFunction {
    /// A free built-in function value.
    #[must_use]
    pub fn free(name: &'static str, func: NativeFn) -> Value {
        Value::Native(Rc::new(Self { name,
                                     receiver: Value::Undefined,
                                     func }))
    }

    /// A built-in method bound to `receiver`.
    #[must_use]
    pub fn bound(name: &'static str, receiver: Value, func: NativeFn) -> Value {
        Value::Native(Rc::new(Self { name, receiver, func }))
    }

    /// Invokes the function with its bound receiver.
    ///
    /// # Errors
    /// Whatever the implementation reports.
    pub fn call(&self, args: &[Value], pos: usize) -> EvalResult<Value> {
        (self.func)(&self.receiver, args, pos)
    }
}

impl std::fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "native {}", self.name)
    }
}
