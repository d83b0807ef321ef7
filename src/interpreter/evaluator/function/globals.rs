use crate::{
    interpreter::{
        evaluator::{core::EvalResult, utils::arg},
        value::{
            core::Value,
            environment::Environment,
            function::{NativeFn, NativeFunction},
        },
    },
    util::num::{parse_float, parse_int, to_int32, to_uint32},
};

/// Built-in functions reachable as global names.
static GLOBAL_FUNCTIONS: &[(&str, NativeFn)] = &[("parseInt", parse_int_fn),
                                                 ("parseFloat", parse_float_fn),
                                                 ("isNaN", is_nan)];

/// Members of the `Math` object.
static MATH_FUNCTIONS: &[(&str, NativeFn)] = &[("abs", |_, args, _| Ok(math_unary(args, f64::abs))),
                                               ("floor", |_, args, _| Ok(math_unary(args, f64::floor))),
                                               ("ceil", |_, args, _| Ok(math_unary(args, f64::ceil))),
                                               ("round", |_, args, _| Ok(math_unary(args, round_half_up))),
                                               ("trunc", |_, args, _| Ok(math_unary(args, f64::trunc))),
                                               ("sqrt", |_, args, _| Ok(math_unary(args, f64::sqrt))),
                                               ("pow", math_pow),
                                               ("min", |_, args, _| Ok(math_fold(args, f64::INFINITY, f64::min))),
                                               ("max",
                                                |_, args, _| Ok(math_fold(args, f64::NEG_INFINITY, f64::max)))];

/// Members of the `String` object.
static STRING_FUNCTIONS: &[(&str, NativeFn)] = &[("fromCharCode", from_char_code)];

/// Seeds a global scope with the built-in bindings.
///
/// Scripts may shadow or reassign any of them; they are ordinary bindings.
pub fn install(env: &Environment) {
    env.define("undefined", Value::Undefined);
    env.define("NaN", Value::Number(f64::NAN));
    env.define("Infinity", Value::Number(f64::INFINITY));

    for (name, func) in GLOBAL_FUNCTIONS {
        env.define(name, NativeFunction::free(*name, *func));
    }
    env.define("Math", namespace(MATH_FUNCTIONS));
    env.define("String", namespace(STRING_FUNCTIONS));
}

/// An object whose properties are the given free functions.
fn namespace(functions: &[(&'static str, NativeFn)]) -> Value {
    Value::object(functions.iter()
                           .map(|(name, func)| ((*name).to_string(), NativeFunction::free(*name, *func)))
                           .collect())
}

fn parse_int_fn(_: &Value, args: &[Value], _pos: usize) -> EvalResult<Value> {
    let radix = match arg(args, 1) {
        Value::Undefined => 0,
        radix => to_int32(radix.to_number()),
    };
    let Ok(radix) = u32::try_from(radix) else {
        return Ok(Value::Number(f64::NAN));
    };
    Ok(Value::Number(parse_int(&arg(args, 0).to_string(), radix)))
}

fn parse_float_fn(_: &Value, args: &[Value], _pos: usize) -> EvalResult<Value> {
    Ok(Value::Number(parse_float(&arg(args, 0).to_string())))
}

fn is_nan(_: &Value, args: &[Value], _pos: usize) -> EvalResult<Value> {
    Ok(Value::Bool(arg(args, 0).to_number().is_nan()))
}

fn math_unary(args: &[Value], f: fn(f64) -> f64) -> Value {
    Value::Number(f(arg(args, 0).to_number()))
}

/// Rounds to the nearest integer, halves toward positive infinity.
fn round_half_up(x: f64) -> f64 {
    if x.fract() == 0.0 || !x.is_finite() {
        return x;
    }
    (x + 0.5).floor()
}

fn math_pow(_: &Value, args: &[Value], _pos: usize) -> EvalResult<Value> {
    let base = arg(args, 0).to_number();
    let exponent = arg(args, 1).to_number();
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return Ok(Value::Number(f64::NAN));
    }
    Ok(Value::Number(base.powf(exponent)))
}

/// Folds the arguments with `min` or `max`; any `NaN` argument makes the
/// result `NaN`.
fn math_fold(args: &[Value], initial: f64, f: fn(f64, f64) -> f64) -> Value {
    let mut result = initial;
    for value in args {
        let n = value.to_number();
        if n.is_nan() {
            return Value::Number(f64::NAN);
        }
        result = f(result, n);
    }
    Value::Number(result)
}

/// `String.fromCharCode(...codes)`. Codes are taken modulo `2^16`; lone
/// surrogates become U+FFFD.
fn from_char_code(_: &Value, args: &[Value], _pos: usize) -> EvalResult<Value> {
    Ok(Value::String(args.iter()
                         .map(|code| {
                             let code = to_uint32(code.to_number()) & 0xFFFF;
                             char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
                         })
                         .collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(name: &str) -> Value {
        let env = Environment::global();
        install(&env);
        env.get(name).unwrap()
    }

    fn call(function: &Value, args: &[Value]) -> Value {
        let Value::Native(native) = function else { panic!("{function:?} is not native") };
        native.call(args, 0).unwrap()
    }

    fn member(object: &Value, name: &str) -> Value {
        let Value::Object(props) = object else { panic!("{object:?} is not an object") };
        props.borrow().iter().find(|(k, _)| k == name).unwrap().1.clone()
    }

    #[test]
    fn parse_int_takes_a_radix() {
        let parse_int = global("parseInt");
        assert_eq!(call(&parse_int, &[Value::from("ff"), Value::from(16)]), Value::from(255));
        assert_eq!(call(&parse_int, &[Value::from(" 12.7")]), Value::from(12));
        assert!(call(&parse_int, &[Value::from("12"), Value::from(-1)]).to_number().is_nan());
    }

    #[test]
    fn math_rounding_and_extremes() {
        let math = global("Math");
        assert_eq!(call(&member(&math, "round"), &[Value::from(-2.5)]), Value::from(-2));
        assert_eq!(call(&member(&math, "round"), &[Value::from(2.5)]), Value::from(3));
        assert_eq!(call(&member(&math, "max"), &[]), Value::from(f64::NEG_INFINITY));
        assert_eq!(call(&member(&math, "min"), &[Value::from(3), Value::from("1")]), Value::from(1));
        assert_eq!(call(&member(&math, "pow"), &[Value::from(2), Value::from(10)]), Value::from(1024));
    }

    #[test]
    fn from_char_code_builds_strings() {
        let string = global("String");
        let from = member(&string, "fromCharCode");
        assert_eq!(call(&from, &[Value::from(104), Value::from(105)]), Value::from("hi"));
    }
}
