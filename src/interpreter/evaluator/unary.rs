use std::rc::Rc;

use crate::{
    ast::{Expr, UnaryOperator, UpdateOperator},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{core::Value, environment::Environment},
    },
    util::num::to_int32,
};

impl Context {
    /// Evaluates a prefix operator.
    ///
    /// `typeof` applied to a bare name that is bound nowhere yields
    /// `"undefined"` instead of raising a `ReferenceError`.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `expr`: Operand expression.
    /// - `env`: Scope to evaluate the operand in.
    /// - `_pos`: Offset of the operator.
    pub fn eval_unary_op(&mut self,
                         op: UnaryOperator,
                         expr: &Expr,
                         env: &Rc<Environment>,
                         _pos: usize)
                         -> EvalResult<Value> {
        if op == UnaryOperator::Typeof
           && let Expr::Variable { name, .. } = expr
        {
            let value = match env.get(name) {
                Some(value) => Some(value),
                None => self.resolve_global(name)?,
            };
            return Ok(Value::from(value.as_ref().map_or("undefined", Value::type_of)));
        }

        let value = self.eval(expr, env)?;
        Ok(Self::apply_unary(op, &value))
    }

    /// Applies a prefix operator to an evaluated operand.
    ///
    /// ## Example
    /// ```
    /// use jsinterp::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// assert_eq!(Context::apply_unary(UnaryOperator::BitNot, &Value::from(5)), Value::from(-6));
    /// assert_eq!(Context::apply_unary(UnaryOperator::Plus, &Value::from("7")), Value::from(7));
    /// assert_eq!(Context::apply_unary(UnaryOperator::Not, &Value::from("")), Value::from(true));
    /// ```
    #[must_use]
    pub fn apply_unary(op: UnaryOperator, value: &Value) -> Value {
        match op {
            UnaryOperator::Negate => Value::Number(-value.to_number()),
            UnaryOperator::Plus => Value::Number(value.to_number()),
            UnaryOperator::Not => Value::Bool(!value.is_truthy()),
            UnaryOperator::BitNot => Value::Number(f64::from(!to_int32(value.to_number()))),
            UnaryOperator::Typeof => Value::from(value.type_of()),
            UnaryOperator::Void => Value::Undefined,
        }
    }

    /// Evaluates `++` and `--`, in prefix or postfix position.
    ///
    /// The target is read once, converted to a number and written back plus
    /// or minus one. A prefix update yields the new value, a postfix update
    /// the old (converted) one.
    pub fn eval_update(&mut self,
                       op: UpdateOperator,
                       prefix: bool,
                       target: &Expr,
                       env: &Rc<Environment>,
                       pos: usize)
                       -> EvalResult<Value> {
        let place = self.resolve_place(target, env)?;
        let old = self.read_place(&place, env, pos)?.to_number();
        let new = match op {
            UpdateOperator::Increment => old + 1.0,
            UpdateOperator::Decrement => old - 1.0,
        };
        self.write_place(&place, Value::Number(new), env, pos)?;
        Ok(Value::Number(if prefix { new } else { old }))
    }
}
