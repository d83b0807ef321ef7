/// Runtime values.
///
/// Defines the tagged `Value` type together with the conversions between
/// values that the operators rely on: truthiness, number and string
/// conversion, loose and strict equality, and the mapping to and from host
/// JSON.
pub mod core;

/// Function values.
///
/// Script closures and built-in functions, including built-in methods bound
/// to the array or string they were read from.
pub mod function;

/// Variable scopes.
///
/// The scope chain used for variable lookup, `var` declarations and implicit
/// global assignment.
pub mod environment;
