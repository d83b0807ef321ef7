use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            utils::{arg, integer_arg, receiver_array, receiver_string},
        },
        value::{
            core::{Value, join_array},
            function::NativeFn,
        },
    },
    util::num::{f64_to_index, format_radix, relative_index, to_uint32, usize_to_f64},
};

/// Defines a method table and the function that looks names up in it.
///
/// Each entry maps the name a script uses to the native implementation. The
/// generated function returns the canonical `'static` name along with the
/// implementation so the caller can bind it to a receiver.
macro_rules! builtin_methods {
    (
        $(#[$meta:meta])*
        $lookup:ident {
            $($name:literal => $func:expr),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[must_use]
        pub fn $lookup(name: &str) -> Option<(&'static str, NativeFn)> {
            static TABLE: &[(&str, NativeFn)] = &[
                $(($name, $func),)*
            ];
            TABLE.iter().find(|(n, _)| *n == name).copied()
        }
    };
}

builtin_methods! {
    /// Looks up an array method.
    array_method {
        "push"     => array_push,
        "pop"      => array_pop,
        "shift"    => array_shift,
        "unshift"  => array_unshift,
        "splice"   => array_splice,
        "slice"    => array_slice,
        "reverse"  => array_reverse,
        "join"     => array_join,
        "indexOf"  => array_index_of,
        "includes" => array_includes,
        "concat"   => array_concat,
        "toString" => array_to_string,
    }
}

builtin_methods! {
    /// Looks up a string method.
    string_method {
        "split"      => string_split,
        "charAt"     => string_char_at,
        "charCodeAt" => string_char_code_at,
        "indexOf"    => string_index_of,
        "slice"      => string_slice,
        "substr"     => string_substr,
        "substring"  => string_substring,
        "includes"   => string_includes,
        "toString"   => string_to_string,
    }
}

builtin_methods! {
    /// Looks up a number method.
    number_method {
        "toString" => number_to_string,
    }
}

builtin_methods! {
    /// Looks up a method shared by all objects.
    object_method {
        "hasOwnProperty" => object_has_own_property,
    }
}

/// `SameValueZero`, used by `includes`: like `===` except that `NaN` matches
/// itself.
fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => a.strict_equals(b),
    }
}

fn array_push(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let items = receiver_array(receiver, pos)?;
    let mut items = items.borrow_mut();
    items.extend_from_slice(args);
    Ok(Value::Number(usize_to_f64(items.len())))
}

fn array_pop(receiver: &Value, _args: &[Value], pos: usize) -> EvalResult<Value> {
    Ok(receiver_array(receiver, pos)?.borrow_mut().pop().unwrap_or(Value::Undefined))
}

fn array_shift(receiver: &Value, _args: &[Value], pos: usize) -> EvalResult<Value> {
    let items = receiver_array(receiver, pos)?;
    let mut items = items.borrow_mut();
    if items.is_empty() {
        return Ok(Value::Undefined);
    }
    Ok(items.remove(0))
}

fn array_unshift(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let items = receiver_array(receiver, pos)?;
    let mut items = items.borrow_mut();
    items.splice(0..0, args.iter().cloned());
    Ok(Value::Number(usize_to_f64(items.len())))
}

/// `splice(start, deleteCount, ...items)`: removes and returns a run of
/// elements, inserting `items` in their place.
fn array_splice(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let items = receiver_array(receiver, pos)?;
    let mut items = items.borrow_mut();
    let len = items.len();
    let start = relative_index(arg(args, 0).to_number(), len);
    let delete_count = if args.len() < 2 {
        len - start
    } else {
        relative_index(integer_arg(args, 1, 0.0).max(0.0), len - start)
    };
    let removed: Vec<Value> = items.splice(start..start + delete_count, args.iter().skip(2).cloned())
                                   .collect();
    Ok(removed.into())
}

fn array_slice(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let items = receiver_array(receiver, pos)?.borrow();
    let len = items.len();
    let start = relative_index(integer_arg(args, 0, 0.0), len);
    let end = relative_index(integer_arg(args, 1, usize_to_f64(len)), len);
    let slice = if start < end { items[start..end].to_vec() } else { Vec::new() };
    Ok(slice.into())
}

fn array_reverse(receiver: &Value, _args: &[Value], pos: usize) -> EvalResult<Value> {
    receiver_array(receiver, pos)?.borrow_mut().reverse();
    Ok(receiver.clone())
}

fn array_join(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let separator = match arg(args, 0) {
        Value::Undefined => ",".to_string(),
        other => other.to_string(),
    };
    Ok(Value::String(join_array(receiver_array(receiver, pos)?, &separator)))
}

fn array_index_of(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let needle = arg(args, 0);
    let items = receiver_array(receiver, pos)?.borrow();
    let from = relative_index(integer_arg(args, 1, 0.0), items.len());
    Ok(items.iter()
            .enumerate()
            .skip(from)
            .find(|(_, v)| v.strict_equals(&needle))
            .map_or(Value::Number(-1.0), |(i, _)| Value::Number(usize_to_f64(i))))
}

fn array_includes(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let needle = arg(args, 0);
    let items = receiver_array(receiver, pos)?.borrow();
    Ok(Value::Bool(items.iter().any(|v| same_value_zero(v, &needle))))
}

/// `concat(...values)`: a new array with the receiver's elements followed by
/// each argument, arrays being spread one level.
fn array_concat(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let mut result = receiver_array(receiver, pos)?.borrow().clone();
    for value in args {
        match value {
            Value::Array(other) => result.extend(other.borrow().iter().cloned()),
            other => result.push(other.clone()),
        }
    }
    Ok(result.into())
}

fn array_to_string(receiver: &Value, _args: &[Value], _pos: usize) -> EvalResult<Value> {
    Ok(Value::String(receiver.to_string()))
}

/// `split(separator, limit)`. An empty separator splits into characters and
/// a missing one returns the whole string as the only element.
fn string_split(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let s = receiver_string(receiver, pos)?;
    let parts: Vec<String> = match arg(args, 0) {
        Value::Undefined => vec![s.to_string()],
        separator => {
            let separator = separator.to_string();
            if separator.is_empty() {
                s.chars().map(String::from).collect()
            } else {
                s.split(separator.as_str()).map(String::from).collect()
            }
        },
    };
    let limit = match arg(args, 1) {
        Value::Undefined => parts.len(),
        limit => to_uint32(limit.to_number()) as usize,
    };
    Ok(parts.into_iter().take(limit).map(Value::String).collect::<Vec<_>>().into())
}

fn string_char_at(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let s = receiver_string(receiver, pos)?;
    let index = integer_arg(args, 0, 0.0);
    Ok(Value::String(char_at(s, index).map(String::from).unwrap_or_default()))
}

fn string_char_code_at(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let s = receiver_string(receiver, pos)?;
    let index = integer_arg(args, 0, 0.0);
    Ok(Value::Number(char_at(s, index).map_or(f64::NAN, |c| f64::from(u32::from(c)))))
}

fn char_at(s: &str, index: f64) -> Option<char> {
    f64_to_index(index).and_then(|i| s.chars().nth(i))
}

/// `indexOf(search, from)` in characters.
fn string_index_of(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let s = receiver_string(receiver, pos)?;
    let needle = arg(args, 0).to_string();
    let chars: Vec<char> = s.chars().collect();
    let needle: Vec<char> = needle.chars().collect();
    let from = relative_index(integer_arg(args, 1, 0.0).max(0.0), chars.len());

    let found = (from..=chars.len()).find(|&i| chars[i..].starts_with(&needle));
    Ok(Value::Number(found.map_or(-1.0, usize_to_f64)))
}

fn string_slice(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let chars: Vec<char> = receiver_string(receiver, pos)?.chars().collect();
    let len = chars.len();
    let start = relative_index(integer_arg(args, 0, 0.0), len);
    let end = relative_index(integer_arg(args, 1, usize_to_f64(len)), len);
    Ok(Value::String(if start < end { chars[start..end].iter().collect() } else { String::new() }))
}

/// `substr(start, length)`.
fn string_substr(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let chars: Vec<char> = receiver_string(receiver, pos)?.chars().collect();
    let len = chars.len();
    let start = relative_index(integer_arg(args, 0, 0.0), len);
    let count = relative_index(integer_arg(args, 1, usize_to_f64(len)).max(0.0), len - start);
    Ok(Value::String(chars[start..start + count].iter().collect()))
}

/// `substring(start, end)`: negative and `NaN` bounds are `0`, and the
/// bounds are swapped if `start > end`.
fn string_substring(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let chars: Vec<char> = receiver_string(receiver, pos)?.chars().collect();
    let len = chars.len();
    let a = relative_index(integer_arg(args, 0, 0.0).max(0.0), len);
    let b = relative_index(integer_arg(args, 1, usize_to_f64(len)).max(0.0), len);
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    Ok(Value::String(chars[start..end].iter().collect()))
}

fn string_includes(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let s = receiver_string(receiver, pos)?;
    Ok(Value::Bool(s.contains(arg(args, 0).to_string().as_str())))
}

fn string_to_string(receiver: &Value, _args: &[Value], pos: usize) -> EvalResult<Value> {
    Ok(Value::from(receiver_string(receiver, pos)?))
}

/// `toString(radix)`, with the radix between 2 and 36.
fn number_to_string(receiver: &Value, args: &[Value], pos: usize) -> EvalResult<Value> {
    let radix = integer_arg(args, 0, 10.0);
    if !(2.0..=36.0).contains(&radix) {
        return Err(RuntimeError::type_error("toString() radix must be between 2 and 36", pos));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let radix = radix as u32;
    Ok(Value::String(format_radix(receiver.to_number(), radix)))
}

fn object_has_own_property(receiver: &Value, args: &[Value], _pos: usize) -> EvalResult<Value> {
    let key = arg(args, 0).to_string();
    Ok(Value::Bool(match receiver {
                       Value::Object(props) => props.borrow().iter().any(|(k, _)| *k == key),
                       _ => false,
                   }))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn call(method: Option<(&'static str, NativeFn)>, receiver: &Value, args: &[Value]) -> Value {
        let (_, func) = method.unwrap();
        func(receiver, args, 0).unwrap()
    }

    fn array(json: serde_json::Value) -> Value {
        Value::from_json(&json)
    }

    #[test]
    fn splice_removes_and_inserts_in_place() {
        let a = array(json!([1, 2, 3, 4, 5]));
        let removed = call(array_method("splice"), &a, &[Value::from(1), Value::from(2), Value::from(9)]);
        assert_eq!(removed.to_json(), json!([2, 3]));
        assert_eq!(a.to_json(), json!([1, 9, 4, 5]));

        let tail = call(array_method("splice"), &a, &[Value::from(-1)]);
        assert_eq!(tail.to_json(), json!([5]));
        assert_eq!(a.to_json(), json!([1, 9, 4]));
    }

    #[test]
    fn reverse_returns_the_same_array() {
        let a = array(json!([1, 2, 3]));
        let reversed = call(array_method("reverse"), &a, &[]);
        assert!(reversed.strict_equals(&a));
        assert_eq!(a.to_json(), json!([3, 2, 1]));
    }

    #[test]
    fn join_and_slice() {
        let a = array(json!(["a", null, "c"]));
        assert_eq!(call(array_method("join"), &a, &[]), Value::from("a,,c"));
        assert_eq!(call(array_method("join"), &a, &[Value::from("")]), Value::from("ac"));
        assert_eq!(call(array_method("slice"), &a, &[Value::from(-2)]).to_json(), json!([null, "c"]));
    }

    #[test]
    fn includes_finds_nan_but_index_of_does_not() {
        let a = Value::from(vec![Value::from(f64::NAN)]);
        assert_eq!(call(array_method("includes"), &a, &[Value::from(f64::NAN)]), Value::from(true));
        assert_eq!(call(array_method("indexOf"), &a, &[Value::from(f64::NAN)]), Value::from(-1));
    }

    #[test]
    fn string_methods_count_characters() {
        let s = Value::from("abcdef");
        assert_eq!(call(string_method("split"), &s, &[Value::from("")]).to_json(),
                   json!(["a", "b", "c", "d", "e", "f"]));
        assert_eq!(call(string_method("substr"), &s, &[Value::from(1), Value::from(3)]), Value::from("bcd"));
        assert_eq!(call(string_method("substring"), &s, &[Value::from(4), Value::from(1)]),
                   Value::from("bcd"));
        assert_eq!(call(string_method("slice"), &s, &[Value::from(-2)]), Value::from("ef"));
        assert_eq!(call(string_method("indexOf"), &s, &[Value::from("cd")]), Value::from(2));
        assert_eq!(call(string_method("charCodeAt"), &s, &[Value::from(0)]), Value::from(97));
        assert_eq!(call(string_method("charAt"), &s, &[Value::from(10)]), Value::from(""));
    }

    #[test]
    fn number_to_string_in_other_radixes() {
        let n = Value::from(255);
        assert_eq!(call(number_method("toString"), &n, &[Value::from(16)]), Value::from("ff"));
        assert_eq!(call(number_method("toString"), &n, &[]), Value::from("255"));
        let (_, func) = number_method("toString").unwrap();
        assert!(func(&n, &[Value::from(1)], 0).is_err());
    }

    #[test]
    fn unknown_names_are_not_methods() {
        assert!(array_method("map").is_none());
        assert!(string_method("push").is_none());
    }
}
