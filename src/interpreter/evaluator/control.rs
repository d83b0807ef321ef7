use std::rc::Rc;

use crate::{
    ast::{CatchClause, Expr, Statement, SwitchCase},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        value::{core::Value, environment::Environment},
    },
};

/// The value a `catch` clause binds for an error.
///
/// Thrown values are bound as they are. Runtime faults become an object with
/// `name` and `message` properties.
fn error_value(error: RuntimeError) -> Value {
    let (name, message) = match error {
        RuntimeError::Thrown { value, .. } => return value,
        RuntimeError::ReferenceError { name, .. } => ("ReferenceError", format!("{name} is not defined")),
        RuntimeError::TypeError { details, .. } => ("TypeError", details),
        other => ("Error", other.to_string()),
    };
    Value::object(vec![("name".to_string(), Value::from(name)),
                       ("message".to_string(), Value::from(message))])
}

impl Context {
    /// Executes a `for (init; condition; update) body` loop.
    ///
    /// A missing condition loops until the body breaks or returns. `continue`
    /// still runs the update expression.
    pub fn exec_for(&mut self,
                    init: Option<&Statement>,
                    condition: Option<&Expr>,
                    update: Option<&Expr>,
                    body: &Statement,
                    env: &Rc<Environment>)
                    -> EvalResult<Flow> {
        if let Some(init) = init {
            self.exec(init, env)?;
        }
        loop {
            if let Some(condition) = condition
               && !self.eval(condition, env)?.is_truthy()
            {
                break;
            }
            match self.exec(body, env)? {
                Flow::Break => break,
                flow @ Flow::Return(_) => return Ok(flow),
                Flow::Normal | Flow::Continue => {},
            }
            if let Some(update) = update {
                self.eval(update, env)?;
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a `while` loop.
    pub fn exec_while(&mut self, condition: &Expr, body: &Statement, env: &Rc<Environment>) -> EvalResult<Flow> {
        while self.eval(condition, env)?.is_truthy() {
            match self.exec(body, env)? {
                Flow::Break => break,
                flow @ Flow::Return(_) => return Ok(flow),
                Flow::Normal | Flow::Continue => {},
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a `do body while (condition)` loop; the body runs at least
    /// once.
    pub fn exec_do_while(&mut self,
                         body: &Statement,
                         condition: &Expr,
                         env: &Rc<Environment>)
                         -> EvalResult<Flow> {
        loop {
            match self.exec(body, env)? {
                Flow::Break => break,
                flow @ Flow::Return(_) => return Ok(flow),
                Flow::Normal | Flow::Continue => {},
            }
            if !self.eval(condition, env)?.is_truthy() {
                break;
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a `switch` statement.
    ///
    /// Case tests are evaluated in source order and compared with `===`
    /// until one matches. If none does, execution starts at `default`
    /// wherever it appears. From the starting clause, bodies run in order
    /// (falling through the following clauses, `default` included) until a
    /// `break`.
    pub fn exec_switch(&mut self,
                       discriminant: &Expr,
                       cases: &[SwitchCase],
                       env: &Rc<Environment>)
                       -> EvalResult<Flow> {
        let value = self.eval(discriminant, env)?;

        let mut start = None;
        for (index, case) in cases.iter().enumerate() {
            if let Some(test) = &case.test
               && self.eval(test, env)?.strict_equals(&value)
            {
                start = Some(index);
                break;
            }
        }
        let Some(start) = start.or_else(|| cases.iter().position(|case| case.test.is_none())) else {
            return Ok(Flow::Normal);
        };

        for case in &cases[start..] {
            match self.exec_block(&case.body, env)? {
                Flow::Normal => {},
                Flow::Break => break,
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes `try`/`catch`/`finally`.
    ///
    /// Reference faults, type faults and thrown values are caught; exhausting
    /// the call depth is not. The `finally` block runs however the other
    /// blocks ended, and if it itself returns, breaks or continues, that
    /// replaces the earlier outcome.
    pub fn exec_try(&mut self,
                    block: &[Statement],
                    handler: Option<&CatchClause>,
                    finalizer: Option<&[Statement]>,
                    env: &Rc<Environment>)
                    -> EvalResult<Flow> {
        let mut result = self.exec_block(block, env);

        if let Some(handler) = handler {
            result = match result {
                Err(error) if error.is_catchable() => {
                    tracing::trace!(%error, "caught");
                    let scope = Environment::block_scope(env);
                    if let Some(param) = &handler.param {
                        scope.define(param, error_value(error));
                    }
                    self.exec_block(&handler.body, &scope)
                },
                other => other,
            };
        }

        if let Some(finalizer) = finalizer {
            match self.exec_block(finalizer, env)? {
                Flow::Normal => {},
                flow => return Ok(flow),
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_faults_are_caught_as_named_objects() {
        let value = error_value(RuntimeError::ReferenceError { name: "q".to_string(),
                                                               pos:  0, });
        assert_eq!(value.to_json(),
                   serde_json::json!({"name": "ReferenceError", "message": "q is not defined"}));
    }

    #[test]
    fn thrown_values_are_caught_unchanged() {
        let value = error_value(RuntimeError::Thrown { value: Value::from(3),
                                                       pos:   0, });
        assert_eq!(value, Value::from(3));
    }
}
