/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator walks statements and expressions against a chain of scopes,
/// applies the operator and coercion rules, and propagates control-flow
/// signals. It is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates expressions and executes statements.
/// - Handles scopes, closures, calls and control flow.
/// - Reports reference and type faults with their source offset.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// identifiers, operators, delimiters, and keywords. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with their byte offset.
/// - Handles numeric and string literals, identifiers, keywords and operators.
/// - Skips whitespace and comments.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of expressions and
/// statements. This enables later phases to analyze and execute user code.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Validates correct grammar and syntax, reporting errors with location info.
/// - Finds statement boundaries by scanning balanced brackets.
pub mod parser;
/// Top-level indexing of a snippet.
///
/// Records where each top-level function and assignment lives in the token
/// stream so that bodies can be parsed only when first needed.
pub mod program;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values scripts operate on: `undefined`, `null`,
/// booleans, numbers, strings, arrays, objects and functions, along with the
/// scopes variables live in.
///
/// # Responsibilities
/// - Defines the `Value` enum and its coercions.
/// - Gives arrays and objects shared reference semantics.
/// - Models the scope chain and function values.
pub mod value;
