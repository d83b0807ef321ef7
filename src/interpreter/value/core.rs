use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::LiteralValue,
    interpreter::value::function::{JsFunction, NativeFunction},
    util::num::{MAX_SAFE_INTEGER, format_number, parse_number},
};

/// Shared, mutable storage behind an array value.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
/// Shared, mutable storage behind an object value, in insertion order.
pub type ObjectRef = Rc<RefCell<Vec<(String, Value)>>>;

thread_local! {
    /// Arrays whose string conversion is in progress on this thread.
    static JOINING: RefCell<Vec<*const RefCell<Vec<Value>>>> = const { RefCell::new(Vec::new()) };
}

/// Joins the string forms of an array's elements with `separator`.
///
/// `undefined` and `null` elements print as empty strings, and so does an
/// array that is already being joined further up the stack, so an array that
/// contains itself converts without recursing forever.
///
/// ## Example
/// ```
/// use jsinterp::interpreter::value::core::{Value, join_array};
///
/// let a = Value::from(vec![Value::from(1), Value::Null, Value::from(2)]);
/// let Value::Array(items) = &a else { unreachable!() };
/// assert_eq!(join_array(items, "-"), "1--2");
/// ```
#[must_use]
pub fn join_array(items: &ArrayRef, separator: &str) -> String {
    let ptr = Rc::as_ptr(items);
    if JOINING.with_borrow(|joining| joining.contains(&ptr)) {
        return String::new();
    }

    JOINING.with_borrow_mut(|joining| joining.push(ptr));
    let joined = items.borrow()
                      .iter()
                      .map(|v| if v.is_nullish() { String::new() } else { v.to_string() })
                      .collect::<Vec<_>>()
                      .join(separator);
    JOINING.with_borrow_mut(|joining| joining.pop());
    joined
}

/// Represents a runtime value in the interpreter.
///
/// Scalars (`Undefined`, `Null`, `Bool`, `Number`, `String`) are copied on
/// assignment. Arrays, objects and functions are reference types: cloning a
/// `Value` clones the handle, so a mutation through one binding is visible
/// through every alias.
#[derive(Debug, Clone)]
pub enum Value {
    /// The value of missing arguments, unset variables and bare `return`.
    Undefined,
    /// `null`.
    Null,
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// A double-precision number. Bitwise operators truncate it to 32 bits.
    Number(f64),
    /// An immutable string.
    String(String),
    /// An ordered, growable array.
    Array(ArrayRef),
    /// A string-keyed object that remembers insertion order.
    Object(ObjectRef),
    /// A script function together with the scope it was created in.
    Function(Rc<JsFunction>),
    /// A built-in function, possibly bound to a receiver.
    Native(Rc<NativeFunction>),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(Rc::new(RefCell::new(v)))
    }
}

impl From<&LiteralValue> for Value {
    fn from(lit: &LiteralValue) -> Self {
        match lit {
            LiteralValue::Number(n) => (*n).into(),
            LiteralValue::Str(s) => s.as_str().into(),
            LiteralValue::Bool(b) => (*b).into(),
            LiteralValue::Null => Self::Null,
        }
    }
}

impl PartialEq for Value {
    /// Structural equality: arrays and objects compare by contents, functions
    /// by identity. This is what host code and tests want; script equality
    /// goes through [`Value::strict_equals`] and [`Value::loose_equals`].
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Builds an object value from properties in order.
    #[must_use]
    pub fn object(properties: Vec<(String, Self)>) -> Self {
        Self::Object(Rc::new(RefCell::new(properties)))
    }

    /// The result of the `typeof` operator.
    ///
    /// ## Example
    /// ```
    /// use jsinterp::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Null.type_of(), "object");
    /// assert_eq!(Value::from(vec![]).type_of(), "object");
    /// assert_eq!(Value::from("x").type_of(), "string");
    /// ```
    #[must_use]
    pub const fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Null | Self::Array(_) | Self::Object(_) => "object",
            Self::Function(_) | Self::Native(_) => "function",
        }
    }

    /// Whether the value counts as `true` in a condition.
    ///
    /// `undefined`, `null`, `false`, `0`, `NaN` and `""` are falsy; everything
    /// else, including empty arrays and objects, is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Array(_) | Self::Object(_) | Self::Function(_) | Self::Native(_) => true,
        }
    }

    /// Converts the value to a number as arithmetic operators do.
    ///
    /// Arrays convert through their string form, so `[]` is `0` and `[7]` is
    /// `7`.
    ///
    /// ## Example
    /// ```
    /// use jsinterp::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::from(" 12 ").to_number(), 12.0);
    /// assert_eq!(Value::Null.to_number(), 0.0);
    /// assert_eq!(Value::from(true).to_number(), 1.0);
    /// assert!(Value::Undefined.to_number().is_nan());
    /// assert_eq!(Value::from(vec![Value::from(7)]).to_number(), 7.0);
    /// ```
    #[must_use]
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Undefined | Self::Object(_) | Self::Function(_) | Self::Native(_) => f64::NAN,
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::String(s) => parse_number(s),
            Self::Array(_) => parse_number(&self.to_string()),
        }
    }

    /// Whether `+` should concatenate rather than add when this value is an
    /// operand.
    #[must_use]
    pub const fn is_string_like(&self) -> bool {
        matches!(self,
                 Self::String(_) | Self::Array(_) | Self::Object(_) | Self::Function(_) | Self::Native(_))
    }

    /// Whether the value can be called.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Native(_))
    }

    /// Whether the value is `undefined` or `null`.
    #[must_use]
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Strict equality (`===`).
    ///
    /// Both tags must match. Numbers compare numerically, so `NaN` is never
    /// equal to itself and `0 === -0`. Reference types compare by identity.
    #[must_use]
    pub fn strict_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Loose equality (`==`).
    ///
    /// `null` and `undefined` equal each other and nothing else. Booleans
    /// compare as numbers; a number compared with a string converts the
    /// string; an array or object compared with a primitive converts through
    /// its string form. Otherwise the rules of [`Value::strict_equals`] apply.
    ///
    /// ## Example
    /// ```
    /// use jsinterp::interpreter::value::core::Value;
    ///
    /// assert!(Value::from("1").loose_equals(&Value::from(1)));
    /// assert!(Value::Null.loose_equals(&Value::Undefined));
    /// assert!(!Value::Null.loose_equals(&Value::from(0)));
    /// assert!(Value::from(true).loose_equals(&Value::from("1")));
    /// ```
    #[must_use]
    pub fn loose_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Self::Bool(_), _) => Self::Number(self.to_number()).loose_equals(other),
            (_, Self::Bool(_)) => self.loose_equals(&Self::Number(other.to_number())),
            (Self::Number(a), Self::String(_)) => *a == other.to_number(),
            (Self::String(_), Self::Number(b)) => self.to_number() == *b,
            (Self::Array(_) | Self::Object(_), Self::Number(_) | Self::String(_)) => {
                Self::String(self.to_string()).loose_equals(other)
            },
            (Self::Number(_) | Self::String(_), Self::Array(_) | Self::Object(_)) => {
                self.loose_equals(&Self::String(other.to_string()))
            },
            _ => self.strict_equals(other),
        }
    }

    /// Converts the value to host JSON.
    ///
    /// Integral numbers become JSON integers and other finite numbers JSON
    /// floats; `NaN` and the infinities become `null`, as do `undefined`,
    /// `null` and functions. Object keys keep their insertion order.
    ///
    /// ## Example
    /// ```
    /// use jsinterp::interpreter::value::core::Value;
    /// use serde_json::json;
    ///
    /// let v = Value::from(vec![Value::from(1), Value::from(0.5), Value::from("a"), Value::Undefined]);
    /// assert_eq!(v.to_json(), json!([1, 0.5, "a", null]));
    /// ```
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        self.to_json_within(&mut Vec::new())
    }

    /// `to_json` for a value nested inside the arrays and objects in
    /// `enclosing`; a reference back to one of them becomes `null`.
    #[allow(clippy::cast_possible_truncation)]
    fn to_json_within(&self, enclosing: &mut Vec<*const ()>) -> serde_json::Value {
        use serde_json::Value as Json;

        let ptr = match self {
            Self::Array(items) => Rc::as_ptr(items).cast::<()>(),
            Self::Object(props) => Rc::as_ptr(props).cast::<()>(),
            _ => std::ptr::null(),
        };
        if !ptr.is_null() && enclosing.contains(&ptr) {
            return Json::Null;
        }

        match self {
            Self::Undefined | Self::Null | Self::Function(_) | Self::Native(_) => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                Json::from(*n as i64)
            },
            Self::Number(n) => serde_json::Number::from_f64(*n).map_or(Json::Null, Json::Number),
            Self::String(s) => Json::String(s.clone()),
            Self::Array(items) => {
                enclosing.push(ptr);
                let json = items.borrow().iter().map(|v| v.to_json_within(enclosing)).collect();
                enclosing.pop();
                Json::Array(json)
            },
            Self::Object(props) => {
                enclosing.push(ptr);
                let json = props.borrow()
                                .iter()
                                .map(|(k, v)| (k.clone(), v.to_json_within(enclosing)))
                                .collect();
                enclosing.pop();
                Json::Object(json)
            },
        }
    }

    /// Converts host JSON into a value, for passing arguments in.
    ///
    /// Every JSON array or object becomes a fresh reference value.
    #[must_use]
    pub fn from_json(json: &serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(*b),
            Json::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Self::String(s.clone()),
            Json::Array(items) => items.iter().map(Self::from_json).collect::<Vec<_>>().into(),
            Json::Object(props) => {
                Self::object(props.iter()
                                  .map(|(k, v)| (k.clone(), Self::from_json(v)))
                                  .collect())
            },
        }
    }
}

impl std::fmt::Display for Value {
    /// The string conversion used by `+`, `join` and `String(...)`.
    ///
    /// Arrays join their elements with `,`, printing `undefined` and `null`
    /// elements as empty strings.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(items) => write!(f, "{}", join_array(items, ",")),
            Self::Object(_) => write!(f, "[object Object]"),
            Self::Function(func) => {
                write!(f, "function {}() {{ [code] }}", func.def.name.as_deref().unwrap_or(""))
            },
            Self::Native(native) => write!(f, "function {}() {{ [native code] }}", native.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn self_containing_arrays_convert_without_recursing() {
        let a = Value::from(vec![Value::from(1)]);
        if let Value::Array(items) = &a {
            items.borrow_mut().push(a.clone());
        }
        assert_eq!(a.to_string(), "1,");
        assert_eq!(a.to_json(), json!([1, null]));

        let outer = Value::from(vec![a.clone(), a]);
        assert_eq!(outer.to_string(), "1,,1,");
    }

    #[test]
    fn arrays_are_shared_between_clones() {
        let a = Value::from(vec![Value::from(1)]);
        let alias = a.clone();
        if let Value::Array(items) = &alias {
            items.borrow_mut().push(Value::from(2));
        }
        assert_eq!(a.to_json(), json!([1, 2]));
        assert!(a.strict_equals(&alias));
    }

    #[test]
    fn equal_contents_are_not_strictly_equal() {
        let a = Value::from(vec![Value::from(1)]);
        let b = Value::from(vec![Value::from(1)]);
        assert_eq!(a, b);
        assert!(!a.strict_equals(&b));
    }

    #[test]
    fn nan_is_never_equal() {
        let nan = Value::from(f64::NAN);
        assert!(!nan.strict_equals(&nan));
        assert!(!nan.loose_equals(&nan));
    }

    #[test]
    fn string_forms() {
        let nested = Value::from(vec![Value::from(1),
                                      Value::Null,
                                      Value::from(vec![Value::from("a"), Value::from(2.5)])]);
        assert_eq!(nested.to_string(), "1,,a,2.5");
        assert_eq!(Value::object(vec![]).to_string(), "[object Object]");
        assert_eq!(Value::from(-0.0).to_string(), "0");
    }

    #[test]
    fn truthiness() {
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::from(vec![]).is_truthy());
    }

    #[test]
    fn json_keeps_object_order_and_drops_non_finite() {
        let obj = Value::object(vec![("z".to_string(), Value::from(1)),
                                     ("a".to_string(), Value::from(f64::INFINITY))]);
        let json = obj.to_json();
        assert_eq!(json, json!({"z": 1, "a": null}));
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn json_arguments_come_back_unchanged() {
        let json = json!({"list": [1, "two", null, true], "n": 2.5});
        assert_eq!(Value::from_json(&json).to_json(), json);
    }
}
