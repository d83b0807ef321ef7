/// Numeric conversion helpers.
///
/// This module provides the conversions the evaluator needs between the
/// interpreter's double-precision numbers and integers: 32-bit truncation for
/// bitwise operators, array index validation, and the string forms numbers
/// take when concatenated or printed.
pub mod num;
