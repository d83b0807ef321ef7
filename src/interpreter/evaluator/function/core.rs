use std::rc::Rc;

use crate::{
    ast::{Expr, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        value::{
            core::Value,
            environment::Environment,
            function::JsFunction,
        },
    },
};

/// A short description of a callee for error messages.
fn callee_name(callee: &Expr) -> String {
    match callee {
        Expr::Variable { name, .. } => name.clone(),
        Expr::Member { object, property, .. } => format!("{}.{property}", callee_name(object)),
        Expr::Index { object, .. } => format!("{}[...]", callee_name(object)),
        Expr::Function(def) => def.name.clone().unwrap_or_else(|| "function".to_string()),
        _ => "expression".to_string(),
    }
}

/// Binds the declarations of a function body in its call frame before the
/// first statement runs.
///
/// `var` names become `undefined` unless a parameter already holds the name;
/// nested function declarations are bound to closures over the frame. Nested
/// function bodies are not searched.
fn hoist(statements: &[Statement], frame: &Rc<Environment>) {
    for statement in statements {
        hoist_statement(statement, frame);
    }
}

fn hoist_statement(statement: &Statement, frame: &Rc<Environment>) {
    match statement {
        Statement::VarDeclaration { declarations, .. } => {
            for (name, _) in declarations {
                frame.declare_var_if_absent(name);
            }
        },
        Statement::FunctionDeclaration(def) => {
            if let Some(name) = &def.name {
                frame.define(name, JsFunction::closure(Rc::clone(def), Rc::clone(frame)));
            }
        },
        Statement::If { then_branch,
                        else_branch,
                        .. } => {
            hoist_statement(then_branch, frame);
            if let Some(else_branch) = else_branch {
                hoist_statement(else_branch, frame);
            }
        },
        Statement::For { init, body, .. } => {
            if let Some(init) = init {
                hoist_statement(init, frame);
            }
            hoist_statement(body, frame);
        },
        Statement::While { body, .. } | Statement::DoWhile { body, .. } => hoist_statement(body, frame),
        Statement::Switch { cases, .. } => {
            for case in cases {
                hoist(&case.body, frame);
            }
        },
        Statement::Try { block,
                         handler,
                         finalizer,
                         .. } => {
            hoist(block, frame);
            if let Some(handler) = handler {
                hoist(&handler.body, frame);
            }
            if let Some(finalizer) = finalizer {
                hoist(finalizer, frame);
            }
        },
        Statement::Block { statements, .. } => hoist(statements, frame),
        Statement::Empty
        | Statement::Expression { .. }
        | Statement::Return { .. }
        | Statement::Break { .. }
        | Statement::Continue { .. }
        | Statement::Throw { .. } => {},
    }
}

impl Context {
    /// Evaluates a call expression.
    ///
    /// The callee is evaluated first, then the arguments from left to right.
    /// An unknown name fails while evaluating the callee, as a
    /// `ReferenceError`.
    ///
    /// # Errors
    /// [`RuntimeError::TypeError`] if the callee is not a function.
    pub fn eval_call(&mut self,
                     callee: &Expr,
                     arguments: &[Expr],
                     env: &Rc<Environment>,
                     pos: usize)
                     -> EvalResult<Value> {
        let function = self.eval(callee, env)?;
        let args = arguments.iter()
                            .map(|arg| self.eval(arg, env))
                            .collect::<EvalResult<Vec<_>>>()?;

        if !function.is_callable() {
            return Err(RuntimeError::type_error(format!("{} is not a function", callee_name(callee)), pos));
        }
        self.call_value(&function, args, pos)
    }

    /// Calls a function value with evaluated arguments.
    ///
    /// # Errors
    /// [`RuntimeError::TypeError`] if `function` is not callable, and any
    /// error raised by the call.
    pub fn call_value(&mut self, function: &Value, args: Vec<Value>, pos: usize) -> EvalResult<Value> {
        match function {
            Value::Function(f) => self.call_function(f, args, pos),
            Value::Native(native) => native.call(&args, pos),
            other => Err(RuntimeError::type_error(format!("{} is not a function", other.type_of()), pos)),
        }
    }

    /// Runs a script function.
    ///
    /// The call frame's parent is the scope the function was defined in, not
    /// the caller's. Parameters without an argument are `undefined` and extra
    /// arguments are dropped. The call yields the value of the `return` that
    /// ended it, or `undefined` if the body ran to the end.
    ///
    /// # Errors
    /// [`RuntimeError::TooMuchRecursion`] when the call would nest deeper
    /// than the configured limit, plus anything the body raises.
    pub fn call_function(&mut self, function: &JsFunction, args: Vec<Value>, pos: usize) -> EvalResult<Value> {
        if self.depth >= self.max_call_depth() {
            return Err(RuntimeError::TooMuchRecursion { depth: self.max_call_depth(),
                                                        pos });
        }

        let frame = Environment::function_scope(&function.scope);
        let mut args = args.into_iter();
        for param in &function.def.params {
            frame.define(param, args.next().unwrap_or(Value::Undefined));
        }
        hoist(&function.def.body, &frame);

        tracing::trace!(name = function.name(), depth = self.depth, "entering function");
        self.depth += 1;
        let result = self.exec_block(&function.def.body, &frame);
        self.depth -= 1;

        match result? {
            Flow::Return(value) => Ok(value),
            Flow::Normal | Flow::Break | Flow::Continue => Ok(Value::Undefined),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{
        lexer::tokenize,
        parser::core::parse_function_tokens,
    };

    fn frame_after_hoisting(source: &str) -> Rc<Environment> {
        let tokens = tokenize(source).unwrap();
        let def = parse_function_tokens(&tokens, source.len()).unwrap();
        let frame = Environment::function_scope(&Environment::global());
        frame.define("p", Value::from(1));
        hoist(&def.body, &frame);
        frame
    }

    #[test]
    fn hoists_vars_from_nested_blocks_but_not_nested_functions() {
        let frame = frame_after_hoisting("function f(p) { if (p) { var a = 1 } \
                                          for (var i = 0; i < 2; i++) {} \
                                          var g = function() { var hidden; }; \
                                          var p; }");
        assert_eq!(frame.get("a"), Some(Value::Undefined));
        assert_eq!(frame.get("i"), Some(Value::Undefined));
        assert_eq!(frame.get("p"), Some(Value::from(1)));
        assert!(!frame.contains("hidden"));
    }

    #[test]
    fn hoists_function_declarations_as_closures() {
        let frame = frame_after_hoisting("function f() { return g(); function g() { return 1 } }");
        assert!(frame.get("g").is_some_and(|g| g.is_callable()));
    }

    #[test]
    fn callee_names_for_messages() {
        let tokens = tokenize("a.b[0]").unwrap();
        let expr = crate::interpreter::parser::core::parse_expression(&mut tokens.iter().peekable()).unwrap();
        assert_eq!(callee_name(&expr), "a.b[...]");
    }
}
