/// Operator dispatch.
///
/// Routes a binary expression to arithmetic or comparison, and implements the
/// short-circuiting logical operators.
pub mod core;

/// Arithmetic, string concatenation, shifts and bitwise operators.
pub mod arithmetic;

/// Equality and relational operators.
pub mod comparison;
