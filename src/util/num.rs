/// `2^32`, the modulus used when wrapping doubles into 32-bit integers.
const TWO_POW_32: f64 = 4_294_967_296.0;
/// `2^31`, the first value that wraps to a negative signed 32-bit integer.
const TWO_POW_31: f64 = 2_147_483_648.0;
/// Largest valid array index (`2^32 - 2`).
pub const MAX_ARRAY_INDEX: f64 = 4_294_967_294.0;
/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Truncates a double to a signed 32-bit integer the way bitwise operators do.
///
/// The value is truncated toward zero and then wrapped into the range
/// `[-2^31, 2^31)`. `NaN` and the infinities become `0`.
///
/// ## Example
/// ```
/// use jsinterp::util::num::to_int32;
///
/// assert_eq!(to_int32(3.9), 3);
/// assert_eq!(to_int32(-3.9), -3);
/// assert_eq!(to_int32(2_147_483_648.0), -2_147_483_648);
/// assert_eq!(to_int32(f64::NAN), 0);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn to_int32(value: f64) -> i32 {
    let wrapped = wrap_u32(value);
    if wrapped >= TWO_POW_31 {
        (wrapped - TWO_POW_32) as i32
    } else {
        wrapped as i32
    }
}

/// Truncates a double to an unsigned 32-bit integer, as `>>>` does.
///
/// ## Example
/// ```
/// use jsinterp::util::num::to_uint32;
///
/// assert_eq!(to_uint32(-1.0), 4_294_967_295);
/// assert_eq!(to_uint32(5.5), 5);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_uint32(value: f64) -> u32 {
    wrap_u32(value) as u32
}

fn wrap_u32(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.trunc().rem_euclid(TWO_POW_32)
}

/// Converts a number to an array index if it is a non-negative integer in
/// range. Fractional, negative, `NaN` and oversized values yield `None`.
///
/// ## Example
/// ```
/// use jsinterp::util::num::f64_to_index;
///
/// assert_eq!(f64_to_index(2.0), Some(2));
/// assert_eq!(f64_to_index(1.5), None);
/// assert_eq!(f64_to_index(-1.0), None);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn f64_to_index(value: f64) -> Option<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= MAX_ARRAY_INDEX {
        Some(value as usize)
    } else {
        None
    }
}

/// Converts a length or index back into a number.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

/// Resolves a relative position argument (as taken by `slice` and `splice`)
/// against a length: negative values count from the end, and the result is
/// clamped to `[0, len]`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn relative_index(value: f64, len: usize) -> usize {
    let len_f = usize_to_f64(len);
    if value.is_nan() {
        return 0;
    }
    let value = value.trunc();
    let resolved = if value < 0.0 { (len_f + value).max(0.0) } else { value.min(len_f) };
    resolved as usize
}

/// Formats a number the way string conversion does.
///
/// Integral values print without a fractional part, `-0` prints as `0`, and
/// very large or very small magnitudes use exponent notation with an explicit
/// sign (`1e+21`).
///
/// ## Example
/// ```
/// use jsinterp::util::num::format_number;
///
/// assert_eq!(format_number(42.0), "42");
/// assert_eq!(format_number(-0.0), "0");
/// assert_eq!(format_number(0.5), "0.5");
/// assert_eq!(format_number(f64::NAN), "NaN");
/// assert_eq!(format_number(1e21), "1e+21");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            },
            _ => formatted,
        };
    }
    format!("{value}")
}

/// Parses a string into a number following string-to-number conversion.
///
/// Surrounding whitespace is ignored, the empty string is `0`, `0x` prefixes
/// are hexadecimal, and anything else that is not a decimal literal is `NaN`.
///
/// ## Example
/// ```
/// use jsinterp::util::num::parse_number;
///
/// assert_eq!(parse_number(" 12 "), 12.0);
/// assert_eq!(parse_number(""), 0.0);
/// assert_eq!(parse_number("0x1f"), 31.0);
/// assert!(parse_number("12px").is_nan());
/// ```
#[must_use]
pub fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {},
    }
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return parse_radix_digits(hex, 16).filter(|(_, used)| *used == hex.len())
                                           .map_or(f64::NAN, |(v, _)| v);
    }
    let is_decimal_text = text.chars()
                              .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !is_decimal_text {
        return f64::NAN;
    }
    text.parse().unwrap_or(f64::NAN)
}

/// Parses the longest decimal prefix of a string, as `parseFloat` does.
/// Returns `NaN` when the string does not start with a number.
///
/// ## Example
/// ```
/// use jsinterp::util::num::parse_float;
///
/// assert_eq!(parse_float("3.5em"), 3.5);
/// assert_eq!(parse_float("  -2e3x"), -2000.0);
/// assert_eq!(parse_float("-Infinity!"), f64::NEG_INFINITY);
/// assert!(parse_float(".x").is_nan());
/// ```
#[must_use]
pub fn parse_float(text: &str) -> f64 {
    let text = text.trim_start();
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'-') => (-1.0, &text[1..]),
        Some(b'+') => (1.0, &text[1..]),
        _ => (1.0, text),
    };
    if rest.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let bytes = rest.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };
    let int_end = digits_from(0);
    let mut end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 || int_end > 0 {
            end = frac_end;
        }
    }
    if end == 0 {
        return f64::NAN;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    rest[..end].parse::<f64>().map_or(f64::NAN, |v| sign * v)
}

/// Formats a number in the given radix, as `Number.prototype.toString` does.
///
/// Radix 10 defers to [`format_number`]. Other radixes print the integer
/// part exactly and at most 52 fractional digits.
///
/// ## Example
/// ```
/// use jsinterp::util::num::format_radix;
///
/// assert_eq!(format_radix(255.0, 16), "ff");
/// assert_eq!(format_radix(-5.0, 2), "-101");
/// assert_eq!(format_radix(0.5, 2), "0.1");
/// assert_eq!(format_radix(35.0, 36), "z");
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_radix(value: f64, radix: u32) -> String {
    if radix == 10 || !value.is_finite() {
        return format_number(value);
    }
    let base = f64::from(radix);
    let magnitude = value.abs();
    let mut int_part = magnitude.trunc();
    let mut frac_part = magnitude - int_part;

    let mut digits = Vec::new();
    loop {
        let digit = (int_part % base) as u32;
        digits.push(std::char::from_digit(digit, radix).unwrap_or('0'));
        int_part = (int_part / base).trunc();
        if int_part == 0.0 {
            break;
        }
    }
    if value < 0.0 {
        digits.push('-');
    }
    let mut out: String = digits.into_iter().rev().collect();

    if frac_part > 0.0 {
        out.push('.');
        for _ in 0..52 {
            frac_part *= base;
            let digit = frac_part.trunc();
            out.push(std::char::from_digit(digit as u32, radix).unwrap_or('0'));
            frac_part -= digit;
            if frac_part == 0.0 {
                break;
            }
        }
    }
    out
}

/// Parses the leading integer of a string in the given radix, as `parseInt`
/// does. Returns `NaN` when no digits are present.
///
/// ## Example
/// ```
/// use jsinterp::util::num::parse_int;
///
/// assert_eq!(parse_int("42px", 10), 42.0);
/// assert_eq!(parse_int("-ff", 16), -255.0);
/// assert_eq!(parse_int("0x10", 0), 16.0);
/// assert!(parse_int("z", 10).is_nan());
/// ```
#[must_use]
pub fn parse_int(text: &str, radix: u32) -> f64 {
    let text = text.trim_start();
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'-') => (-1.0, &text[1..]),
        Some(b'+') => (1.0, &text[1..]),
        _ => (1.0, text),
    };
    let (radix, rest) = match radix {
        0 | 16 if rest.starts_with("0x") || rest.starts_with("0X") => (16, &rest[2..]),
        0 => (10, rest),
        r => (r, rest),
    };
    if !(2..=36).contains(&radix) {
        return f64::NAN;
    }
    parse_radix_digits(rest, radix).map_or(f64::NAN, |(v, _)| sign * v)
}

/// Reads the longest prefix of `digits` valid in `radix`; returns the value
/// and the number of bytes consumed, or `None` if no digit was read.
fn parse_radix_digits(digits: &str, radix: u32) -> Option<(f64, usize)> {
    let mut value = 0.0;
    let mut used = 0;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else { break };
        value = value * f64::from(radix) + f64::from(d);
        used += c.len_utf8();
    }
    (used > 0).then_some((value, used))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int32_wraps_around() {
        assert_eq!(to_int32(4_294_967_296.0 + 5.0), 5);
        assert_eq!(to_int32(-2_147_483_649.0), 2_147_483_647);
        assert_eq!(to_int32(f64::INFINITY), 0);
    }

    #[test]
    fn relative_index_clamps() {
        assert_eq!(relative_index(-2.0, 5), 3);
        assert_eq!(relative_index(-9.0, 5), 0);
        assert_eq!(relative_index(9.0, 5), 5);
        assert_eq!(relative_index(f64::NAN, 5), 0);
    }

    #[test]
    fn small_numbers_use_exponent_form() {
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(-2.25), "-2.25");
        assert_eq!(format_number(MAX_SAFE_INTEGER), "9007199254740991");
    }

    #[test]
    fn words_are_not_numbers() {
        assert!(parse_number("inf").is_nan());
        assert!(parse_number("nan").is_nan());
        assert_eq!(parse_number("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(parse_number("1e3"), 1000.0);
    }

    #[test]
    fn float_prefixes() {
        assert_eq!(parse_float("5."), 5.0);
        assert_eq!(parse_float(".25s"), 0.25);
        assert_eq!(parse_float("1e"), 1.0);
        assert!(parse_float("abc").is_nan());
    }

    #[test]
    fn radix_formatting_matches_decimal_for_base_ten() {
        assert_eq!(format_radix(12.5, 10), "12.5");
        assert_eq!(format_radix(0.0, 16), "0");
        assert_eq!(format_radix(4096.0, 8), "10000");
    }
}
