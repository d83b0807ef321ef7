use crate::{
    ast::BinaryOperator,
    interpreter::{evaluator::core::Context, value::core::Value},
};

/// Reduces a value to a primitive for relational comparison: arrays and
/// objects become their string form.
fn to_primitive(value: &Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Native(_) => {
            Value::String(value.to_string())
        },
        _ => value.clone(),
    }
}

impl Context {
    /// Evaluates `==`, `!=`, `===` and `!==`.
    ///
    /// Strict equality compares tags first and arrays by identity; loose
    /// equality converts between numbers, strings and booleans. See
    /// [`Value::loose_equals`].
    #[must_use]
    pub fn eval_equality(op: BinaryOperator, left: &Value, right: &Value) -> Value {
        Value::Bool(match op {
                        BinaryOperator::Equal => left.loose_equals(right),
                        BinaryOperator::NotEqual => !left.loose_equals(right),
                        BinaryOperator::StrictEqual => left.strict_equals(right),
                        BinaryOperator::StrictNotEqual => !left.strict_equals(right),
                        _ => false,
                    })
    }

    /// Evaluates `<`, `<=`, `>` and `>=`.
    ///
    /// Two strings compare lexicographically; anything else compares as
    /// numbers, and a comparison involving `NaN` is always `false`.
    ///
    /// ## Example
    /// ```
    /// use jsinterp::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let r = Context::eval_relational(BinaryOperator::Less, &Value::from("10"), &Value::from("9"));
    /// assert_eq!(r, Value::from(true));
    ///
    /// let r = Context::eval_relational(BinaryOperator::GreaterEqual, &Value::Undefined, &Value::from(0));
    /// assert_eq!(r, Value::from(false));
    /// ```
    #[must_use]
    pub fn eval_relational(op: BinaryOperator, left: &Value, right: &Value) -> Value {
        let ordering = match (to_primitive(left), to_primitive(right)) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(&b)),
            (a, b) => a.to_number().partial_cmp(&b.to_number()),
        };
        let Some(ordering) = ordering else {
            return Value::Bool(false);
        };
        Value::Bool(match op {
                        BinaryOperator::Less => ordering.is_lt(),
                        BinaryOperator::LessEqual => ordering.is_le(),
                        BinaryOperator::Greater => ordering.is_gt(),
                        BinaryOperator::GreaterEqual => ordering.is_ge(),
                        _ => false,
                    })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_compares_false_both_ways() {
        let nan = Value::from(f64::NAN);
        let one = Value::from(1);
        for op in [BinaryOperator::Less, BinaryOperator::GreaterEqual] {
            assert_eq!(Context::eval_relational(op, &nan, &one), Value::from(false));
            assert_eq!(Context::eval_relational(op, &one, &nan), Value::from(false));
        }
    }

    #[test]
    fn mixed_operands_compare_as_numbers() {
        let r = Context::eval_relational(BinaryOperator::Greater, &Value::from("10"), &Value::from(9));
        assert_eq!(r, Value::from(true));
        let r = Context::eval_relational(BinaryOperator::LessEqual, &Value::Null, &Value::from(0));
        assert_eq!(r, Value::from(true));
    }

    #[test]
    fn strict_and_loose_equality_differ_on_types() {
        let one = Value::from(1);
        let text = Value::from("1");
        assert_eq!(Context::eval_equality(BinaryOperator::Equal, &one, &text), Value::from(true));
        assert_eq!(Context::eval_equality(BinaryOperator::StrictEqual, &one, &text), Value::from(false));
        assert_eq!(Context::eval_equality(BinaryOperator::StrictNotEqual, &one, &text), Value::from(true));
    }
}
