use thiserror::Error;

use crate::{error::ParseError, interpreter::value::core::Value};

#[derive(Debug, Clone, Error)]
/// Represents all errors that can occur during evaluation.
///
/// Reference faults, type faults and thrown values are catchable by script
/// `try`/`catch`. Recursion exhaustion and syntax errors in lazily parsed
/// bodies are not.
pub enum RuntimeError {
    /// Tried to read an undeclared identifier.
    #[error("Error at offset {pos}: ReferenceError: {name} is not defined.")]
    ReferenceError {
        /// The name of the identifier.
        name: String,
        /// Byte offset in the source.
        pos:  usize,
    },
    /// An operation was applied to an unsuitable value.
    #[error("Error at offset {pos}: TypeError: {details}.")]
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// Byte offset in the source.
        pos:     usize,
    },
    /// A value raised by a `throw` statement.
    #[error("Error at offset {pos}: Uncaught {value}.")]
    Thrown {
        /// The thrown value.
        value: Value,
        /// Byte offset of the `throw`.
        pos:   usize,
    },
    /// The call depth limit was exceeded.
    #[error("Error at offset {pos}: Maximum call depth of {depth} exceeded.")]
    TooMuchRecursion {
        /// The configured limit.
        depth: usize,
        /// Byte offset of the call.
        pos:   usize,
    },
    /// A function body failed to parse when it was first called.
    #[error(transparent)]
    Syntax(#[from] ParseError),
}

impl RuntimeError {
    /// Whether a script-level `catch` may absorb this error.
    #[must_use]
    pub const fn is_catchable(&self) -> bool {
        matches!(self,
                 Self::ReferenceError { .. } | Self::TypeError { .. } | Self::Thrown { .. })
    }

    /// Convenience constructor for a [`RuntimeError::TypeError`].
    pub fn type_error(details: impl Into<String>, pos: usize) -> Self {
        Self::TypeError { details: details.into(),
                          pos }
    }
}
