/// Core evaluation logic and context management.
///
/// Contains the runtime context, the control-flow signals statements produce,
/// expression and statement dispatch, and lazy resolution of top-level names.
pub mod core;

/// Binary operator evaluation logic.
///
/// Handles arithmetic, concatenation, bitwise, comparison and logical
/// operators.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements prefix operators, including `typeof`, and the `++`/`--`
/// updates.
pub mod unary;

/// Assignment.
///
/// Resolves assignment targets once and implements plain and compound
/// assignment.
pub mod assign;

/// Property access on arrays, strings, objects and numbers.
pub mod member;

/// Loops, `switch` and `try`.
pub mod control;

/// Function calls and the built-in library.
///
/// Handles script and built-in calls, the call-depth limit, hoisting, and the
/// built-in methods and globals.
pub mod function;

/// Utility functions for evaluation.
///
/// Argument and receiver helpers shared by the built-in functions.
pub mod utils;
