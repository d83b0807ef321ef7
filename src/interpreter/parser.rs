/// Core parsing entry points.
///
/// Contains the comma and assignment levels of the expression grammar and the
/// helpers that parse a complete token slice as statements or as a single
/// function.
pub mod core;

/// Binary operator parsing.
///
/// Implements the precedence ladder from the conditional operator down to
/// multiplication, each level folding left-associative operator chains.
pub mod binary;

/// Unary, postfix and primary expressions.
///
/// Handles prefix operators, calls, member and index access, postfix updates
/// and the atomic forms: literals, identifiers, grouping, array and object
/// literals and function expressions.
pub mod unary;

/// Statement parsing.
///
/// Recognizes declarations, control flow, `switch`, `try` and expression
/// statements, and parses function parameter lists and bodies.
pub mod statement;

/// Block parsing and bracket scanning.
///
/// Parses brace-delimited statement lists and locates statement boundaries in
/// a raw token slice by balanced-bracket scanning.
pub mod block;

/// Small helpers shared by the parser modules.
pub mod utils;
