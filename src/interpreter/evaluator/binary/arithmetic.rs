use crate::{
    ast::BinaryOperator,
    interpreter::{evaluator::core::Context, value::core::Value},
    util::num::{to_int32, to_uint32},
};

impl Context {
    /// `+`: concatenates when either operand converts to a string, adds
    /// otherwise.
    ///
    /// Arrays and objects count as strings here, so `[1] + 1` is `"11"`.
    #[must_use]
    pub fn eval_add(left: &Value, right: &Value) -> Value {
        if left.is_string_like() || right.is_string_like() {
            Value::String(format!("{left}{right}"))
        } else {
            Value::Number(left.to_number() + right.to_number())
        }
    }

    /// `-`, `*`, `/` and `%` on numbers.
    ///
    /// Division by zero gives an infinity or `NaN`; `%` keeps the sign of
    /// the dividend.
    #[must_use]
    pub fn eval_arithmetic(op: BinaryOperator, left: f64, right: f64) -> Value {
        Value::Number(match op {
                          BinaryOperator::Sub => left - right,
                          BinaryOperator::Mul => left * right,
                          BinaryOperator::Div => left / right,
                          BinaryOperator::Mod => left % right,
                          _ => f64::NAN,
                      })
    }

    /// Shifts and bitwise operators.
    ///
    /// Operands are truncated to 32-bit integers and shift counts are taken
    /// modulo 32. All results are signed except `>>>`, which is unsigned.
    ///
    /// ## Example
    /// ```
    /// use jsinterp::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// assert_eq!(Context::eval_bitwise(BinaryOperator::ShiftLeft, 1.0, 5.0), Value::from(32));
    /// assert_eq!(Context::eval_bitwise(BinaryOperator::UnsignedShiftRight, -1.0, 0.0),
    ///            Value::from(4_294_967_295.0));
    /// ```
    #[must_use]
    pub fn eval_bitwise(op: BinaryOperator, left: f64, right: f64) -> Value {
        let count = to_uint32(right) & 31;
        let result = match op {
            BinaryOperator::ShiftLeft => f64::from(to_int32(left).wrapping_shl(count)),
            BinaryOperator::ShiftRight => f64::from(to_int32(left) >> count),
            BinaryOperator::UnsignedShiftRight => f64::from(to_uint32(left) >> count),
            BinaryOperator::BitAnd => f64::from(to_int32(left) & to_int32(right)),
            BinaryOperator::BitOr => f64::from(to_int32(left) | to_int32(right)),
            BinaryOperator::BitXor => f64::from(to_int32(left) ^ to_int32(right)),
            _ => f64::NAN,
        };
        Value::Number(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_from_minified_code() {
        assert_eq!(Context::eval_bitwise(BinaryOperator::BitAnd, 19.0, 21.0), Value::from(17));
        assert_eq!(Context::eval_bitwise(BinaryOperator::ShiftRight, 11.0, 2.0), Value::from(2));
        assert_eq!(Context::eval_bitwise(BinaryOperator::ShiftRight, -16.0, 2.0), Value::from(-4));
        assert_eq!(Context::eval_bitwise(BinaryOperator::ShiftLeft, 1.0, 33.0), Value::from(2));
        assert_eq!(Context::eval_bitwise(BinaryOperator::BitXor, 2_147_483_648.0, 0.0),
                   Value::from(-2_147_483_648));
    }

    #[test]
    fn remainder_keeps_dividend_sign() {
        assert_eq!(Context::eval_arithmetic(BinaryOperator::Mod, -7.0, 3.0), Value::from(-1));
        assert_eq!(Context::eval_arithmetic(BinaryOperator::Mod, 7.0, -3.0), Value::from(1));
    }

    #[test]
    fn concatenation_wins_over_addition() {
        let one = Value::from(1);
        assert_eq!(Context::eval_add(&Value::from(vec![one.clone()]), &one), Value::from("11"));
        assert_eq!(Context::eval_add(&Value::from(true), &one), Value::from(2));
        assert!(matches!(Context::eval_add(&Value::Undefined, &one), Value::Number(n) if n.is_nan()));
    }
}
