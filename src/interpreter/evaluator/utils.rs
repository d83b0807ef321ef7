use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{ArrayRef, Value},
    },
};

/// Returns the argument at `index`, or `undefined` if too few were passed.
///
/// ## Example
/// ```
/// use jsinterp::interpreter::{evaluator::utils::arg, value::core::Value};
///
/// let args = [Value::from(1)];
/// assert_eq!(arg(&args, 0), Value::from(1));
/// assert_eq!(arg(&args, 3), Value::Undefined);
/// ```
#[must_use]
pub fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

/// Reads an integer argument the way built-in methods do.
///
/// A missing or `undefined` argument yields `default`. Anything else is
/// converted to a number and truncated toward zero, with `NaN` becoming `0`.
/// Infinities are kept so that callers can clamp them.
#[must_use]
pub fn integer_arg(args: &[Value], index: usize, default: f64) -> f64 {
    match args.get(index) {
        None | Some(Value::Undefined) => default,
        Some(value) => {
            let n = value.to_number();
            if n.is_nan() { 0.0 } else { n.trunc() }
        },
    }
}

/// The array a method was bound to.
///
/// # Errors
/// [`RuntimeError::TypeError`] if the receiver is not an array.
pub fn receiver_array(receiver: &Value, pos: usize) -> EvalResult<&ArrayRef> {
    match receiver {
        Value::Array(items) => Ok(items),
        other => Err(RuntimeError::type_error(format!("{} is not an array", other.type_of()), pos)),
    }
}

/// The string a method was bound to.
///
/// # Errors
/// [`RuntimeError::TypeError`] if the receiver is not a string.
pub fn receiver_string(receiver: &Value, pos: usize) -> EvalResult<&str> {
    match receiver {
        Value::String(s) => Ok(s),
        other => Err(RuntimeError::type_error(format!("{} is not a string", other.type_of()), pos)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_arguments_truncate_and_default() {
        let args = [Value::from(2.7), Value::from("x"), Value::Undefined, Value::from(-1.5)];
        assert_eq!(integer_arg(&args, 0, 9.0), 2.0);
        assert_eq!(integer_arg(&args, 1, 9.0), 0.0);
        assert_eq!(integer_arg(&args, 2, 9.0), 9.0);
        assert_eq!(integer_arg(&args, 3, 9.0), -1.0);
        assert_eq!(integer_arg(&args, 4, 9.0), 9.0);
    }

    #[test]
    fn receivers_must_match_the_method() {
        assert!(receiver_array(&Value::from("s"), 0).is_err());
        assert_eq!(receiver_string(&Value::from("s"), 0).unwrap(), "s");
    }
}
