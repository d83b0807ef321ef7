use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::methods::{array_method, number_method, object_method, string_method},
        },
        value::{core::Value, function::NativeFunction},
    },
    util::num::{f64_to_index, usize_to_f64},
};

/// How far past its current end a single write may grow an array.
const MAX_ARRAY_GROWTH: usize = 1 << 20;

/// Interprets a property key as an array index.
///
/// Numbers must be non-negative integers; strings must be the canonical
/// decimal spelling of one (`"2"`, not `"02"` or `"2.0"`). An array key
/// goes through its string form, so `a[[1]]` is `a[1]`.
fn key_to_index(key: &Value) -> Option<usize> {
    match key {
        Value::Number(n) => f64_to_index(*n),
        Value::String(s) => s.parse::<usize>().ok().filter(|i| i.to_string() == *s),
        Value::Array(_) => key_to_index(&Value::String(key.to_string())),
        _ => None,
    }
}

impl Context {
    /// Reads `object[key]`.
    ///
    /// - Arrays: integer indices, `length` and the built-in array methods.
    /// - Strings: single-character indices, `length` and the string methods.
    /// - Objects: own properties, in the order they were added.
    /// - Numbers: `toString`.
    ///
    /// Anything else, including out-of-range and fractional indices, reads
    /// as `undefined`. Methods come back bound to `object`, so a method read
    /// through `a["push"]` can be called like `a.push`.
    ///
    /// # Errors
    /// [`RuntimeError::TypeError`] when `object` is `undefined` or `null`.
    pub fn get_property(object: &Value, key: &Value, pos: usize) -> EvalResult<Value> {
        match object {
            Value::Undefined | Value::Null => {
                Err(RuntimeError::type_error(format!("Cannot read properties of {object} (reading '{key}')"),
                                             pos))
            },
            Value::Array(items) => {
                if let Some(index) = key_to_index(key) {
                    return Ok(items.borrow().get(index).cloned().unwrap_or(Value::Undefined));
                }
                let name = key.to_string();
                if name == "length" {
                    return Ok(Value::Number(usize_to_f64(items.borrow().len())));
                }
                Ok(array_method(&name).map_or(Value::Undefined, |(name, func)| {
                                          NativeFunction::bound(name, object.clone(), func)
                                      }))
            },
            Value::String(s) => {
                if let Some(index) = key_to_index(key) {
                    return Ok(s.chars()
                               .nth(index)
                               .map_or(Value::Undefined, |c| Value::String(c.to_string())));
                }
                let name = key.to_string();
                if name == "length" {
                    return Ok(Value::Number(usize_to_f64(s.chars().count())));
                }
                Ok(string_method(&name).map_or(Value::Undefined, |(name, func)| {
                                           NativeFunction::bound(name, object.clone(), func)
                                       }))
            },
            Value::Object(props) => {
                let name = key.to_string();
                if let Some((_, value)) = props.borrow().iter().find(|(k, _)| *k == name) {
                    return Ok(value.clone());
                }
                Ok(object_method(&name).map_or(Value::Undefined, |(name, func)| {
                                           NativeFunction::bound(name, object.clone(), func)
                                       }))
            },
            Value::Number(_) => {
                Ok(number_method(&key.to_string()).map_or(Value::Undefined, |(name, func)| {
                                                       NativeFunction::bound(name, object.clone(), func)
                                                   }))
            },
            Value::Bool(_) | Value::Function(_) | Value::Native(_) => Ok(Value::Undefined),
        }
    }

    /// Writes `object[key] = value`.
    ///
    /// Writing past the end of an array fills the gap with `undefined`;
    /// writing `length` truncates or extends it. Objects add the key at the
    /// end if it is new. Writes to other primitives are ignored.
    ///
    /// # Errors
    /// [`RuntimeError::TypeError`] when `object` is `undefined` or `null`,
    /// when an array is given a key that is neither an index nor `length`, or
    /// when a write would grow an array by more than `MAX_ARRAY_GROWTH`
    /// elements at once.
    pub fn set_property(object: &Value, key: &Value, value: Value, pos: usize) -> EvalResult<()> {
        match object {
            Value::Undefined | Value::Null => {
                Err(RuntimeError::type_error(format!("Cannot set properties of {object} (setting '{key}')"),
                                             pos))
            },
            Value::Array(items) => {
                let index = key_to_index(key);
                let name = key.to_string();
                let len = items.borrow().len();
                let grow_to = |new_len: usize| {
                    if new_len > len.saturating_add(MAX_ARRAY_GROWTH) {
                        Err(RuntimeError::type_error(format!("Invalid array length {new_len}"), pos))
                    } else {
                        Ok(new_len)
                    }
                };

                if let Some(index) = index {
                    let new_len = grow_to(index.saturating_add(1).max(len))?;
                    let mut items = items.borrow_mut();
                    items.resize(new_len, Value::Undefined);
                    items[index] = value;
                    return Ok(());
                }
                if name == "length" {
                    let Some(new_len) = f64_to_index(value.to_number()) else {
                        return Err(RuntimeError::type_error("Invalid array length", pos));
                    };
                    items.borrow_mut().resize(grow_to(new_len)?, Value::Undefined);
                    return Ok(());
                }
                Err(RuntimeError::type_error(format!("Cannot set property '{name}' of an array"), pos))
            },
            Value::Object(props) => {
                let name = key.to_string();
                let mut props = props.borrow_mut();
                match props.iter_mut().find(|(k, _)| *k == name) {
                    Some((_, slot)) => *slot = value,
                    None => props.push((name, value)),
                }
                Ok(())
            },
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Function(_) | Value::Native(_) => {
                Ok(())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(values: &[i32]) -> Value {
        values.iter().map(|v| Value::from(*v)).collect::<Vec<_>>().into()
    }

    #[test]
    fn out_of_range_and_fractional_indices_are_undefined() {
        let a = array(&[1, 2]);
        assert_eq!(Context::get_property(&a, &Value::from(5), 0).unwrap(), Value::Undefined);
        assert_eq!(Context::get_property(&a, &Value::from(0.5), 0).unwrap(), Value::Undefined);
        assert_eq!(Context::get_property(&a, &Value::from(-1), 0).unwrap(), Value::Undefined);
        assert_eq!(Context::get_property(&a, &Value::from("1"), 0).unwrap(), Value::from(2));
    }

    #[test]
    fn writing_past_the_end_pads_with_undefined() {
        let a = array(&[1]);
        Context::set_property(&a, &Value::from(3), Value::from(4), 0).unwrap();
        assert_eq!(a,
                   Value::from(vec![Value::from(1), Value::Undefined, Value::Undefined, Value::from(4)]));
    }

    #[test]
    fn distant_writes_fail_instead_of_allocating() {
        let a = array(&[1]);
        let err = Context::set_property(&a, &Value::from(4_294_967_294.0), Value::from(1), 3).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeError { pos: 3, .. }));
        let err = Context::set_property(&a, &Value::from("length"), Value::from(1e12), 3).unwrap_err();
        assert!(err.is_catchable());
        assert_eq!(a, array(&[1]));

        Context::set_property(&a, &Value::from("length"), Value::from(0), 0).unwrap();
        assert_eq!(a, array(&[]));
    }

    #[test]
    fn an_array_can_be_its_own_key() {
        let a = array(&[1]);
        Context::set_property(&a, &a.clone(), Value::from(2), 0).unwrap();
        assert_eq!(a, array(&[1, 2]));
        let b = array(&[5]);
        Context::set_property(&b, &array(&[0]), Value::from(6), 0).unwrap();
        assert_eq!(b, array(&[6]));
    }

    #[test]
    fn reading_from_undefined_is_a_type_error() {
        let err = Context::get_property(&Value::Undefined, &Value::from("x"), 9).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeError { pos: 9, .. }));
    }

    #[test]
    fn string_indexing_counts_characters() {
        let s = Value::from("héllo");
        assert_eq!(Context::get_property(&s, &Value::from(1), 0).unwrap(), Value::from("é"));
        assert_eq!(Context::get_property(&s, &Value::from("length"), 0).unwrap(), Value::from(5));
    }

    #[test]
    fn object_properties_keep_insertion_order() {
        let o = Value::object(vec![]);
        Context::set_property(&o, &Value::from("b"), Value::from(1), 0).unwrap();
        Context::set_property(&o, &Value::from("a"), Value::from(2), 0).unwrap();
        Context::set_property(&o, &Value::from("b"), Value::from(3), 0).unwrap();
        assert_eq!(o.to_json(), serde_json::json!({"b": 3, "a": 2}));
    }
}
