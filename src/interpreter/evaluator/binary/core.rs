use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{core::Value, environment::Environment},
    },
};

impl Context {
    /// Evaluates a binary expression.
    ///
    /// `&&` and `||` evaluate the right operand only when the left one does not
    /// decide the result, and return one of the operands rather than a
    /// boolean. Every other operator evaluates both sides, left first, and
    /// hands them to [`Context::apply_binary`].
    ///
    /// # Parameters
    /// - `left`: Left operand expression.
    /// - `op`: The operator.
    /// - `right`: Right operand expression.
    /// - `env`: Scope to evaluate the operands in.
    /// - `pos`: Offset of the operator, unused by the operators themselves.
    pub fn eval_binary_op(&mut self,
                          left: &Expr,
                          op: BinaryOperator,
                          right: &Expr,
                          env: &Rc<Environment>,
                          _pos: usize)
                          -> EvalResult<Value> {
        let left = self.eval(left, env)?;
        match op {
            BinaryOperator::And if !left.is_truthy() => Ok(left),
            BinaryOperator::Or if left.is_truthy() => Ok(left),
            BinaryOperator::And | BinaryOperator::Or => self.eval(right, env),
            _ => {
                let right = self.eval(right, env)?;
                Ok(Self::apply_binary(op, &left, &right))
            },
        }
    }

    /// Applies a binary operator to two evaluated operands.
    ///
    /// This is shared by binary expressions and compound assignment. None of
    /// the operators can fail: invalid arithmetic produces `NaN`.
    ///
    /// # Example
    /// ```
    /// use jsinterp::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let sum = Context::apply_binary(BinaryOperator::Add, &Value::from(2), &Value::from("3"));
    /// assert_eq!(sum, Value::from("23"));
    ///
    /// let lt = Context::apply_binary(BinaryOperator::Less, &Value::from(2), &Value::from("10"));
    /// assert_eq!(lt, Value::from(true));
    /// ```
    #[must_use]
    pub fn apply_binary(op: BinaryOperator, left: &Value, right: &Value) -> Value {
        use BinaryOperator::{
            Add, And, BitAnd, BitOr, BitXor, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul,
            NotEqual, Or, ShiftLeft, ShiftRight, StrictEqual, StrictNotEqual, Sub, UnsignedShiftRight,
        };

        match op {
            Add => Self::eval_add(left, right),
            Sub | Mul | Div | Mod => Self::eval_arithmetic(op, left.to_number(), right.to_number()),
            ShiftLeft | ShiftRight | UnsignedShiftRight | BitAnd | BitOr | BitXor => {
                Self::eval_bitwise(op, left.to_number(), right.to_number())
            },
            Equal | NotEqual | StrictEqual | StrictNotEqual => Self::eval_equality(op, left, right),
            Less | LessEqual | Greater | GreaterEqual => Self::eval_relational(op, left, right),
            And => if left.is_truthy() { right.clone() } else { left.clone() },
            Or => if left.is_truthy() { left.clone() } else { right.clone() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_operators_return_an_operand() {
        let zero = Value::from(0);
        let text = Value::from("x");
        assert_eq!(Context::apply_binary(BinaryOperator::Or, &zero, &text), text);
        assert_eq!(Context::apply_binary(BinaryOperator::And, &zero, &text), zero);
    }
}
