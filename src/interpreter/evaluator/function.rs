/// Calls.
///
/// Evaluates call expressions, enforces the call-depth limit and runs script
/// functions in a fresh call frame with hoisted declarations.
pub mod core;

/// Built-in methods of arrays, strings, numbers and objects.
///
/// Methods are looked up by name when a property is read and come back bound
/// to the value they were read from.
pub mod methods;

/// Built-in global bindings.
///
/// Seeds every global scope with the constants and functions available to
/// scripts, such as `parseInt` and `Math`.
pub mod globals;
