use thiserror::Error;

/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code. Parse errors include unrecognised characters, unexpected tokens,
/// invalid assignment targets and unexpected end of input.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised while a snippet executes:
/// reference and type faults, values thrown by script code, and exhaustion of
/// the call-depth limit.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// The broad category of an [`ExtractorError`].
///
/// Calling code that only needs to decide between "the snippet changed" and
/// "the snippet failed at runtime" can branch on this instead of matching every
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Tokenizing or parsing failed.
    Syntax,
    /// An undeclared identifier or unknown function was referenced.
    Reference,
    /// An operation was applied to a value that does not support it.
    Type,
    /// A fault escaped the script without being caught.
    Uncaught,
}

/// The single error type surfaced to the host by the interpreter.
///
/// Every failure of [`crate::JsInterpreter`] is reported as one of these
/// variants, so extraction logic can treat them uniformly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractorError {
    /// Tokenizing or parsing failed.
    #[error("SyntaxError: {0}")]
    Syntax(#[from] ParseError),
    /// An undeclared identifier was read, or an unknown function was called.
    #[error("ReferenceError at offset {pos}: {name} is not defined")]
    Reference {
        /// The unresolved name.
        name: String,
        /// Byte offset in the source.
        pos:  usize,
    },
    /// An invalid operation such as calling a non-function.
    #[error("TypeError at offset {pos}: {details}")]
    Type {
        /// Details about the invalid operation.
        details: String,
        /// Byte offset in the source.
        pos:     usize,
    },
    /// A value thrown by the script was never caught.
    #[error("Uncaught exception at offset {pos}: {message}")]
    Uncaught {
        /// The thrown value rendered as a string.
        message: String,
        /// Byte offset of the `throw`.
        pos:     usize,
    },
    /// Script recursion exceeded the configured call depth.
    #[error("RangeError at offset {pos}: maximum call depth of {depth} exceeded")]
    TooMuchRecursion {
        /// The configured limit.
        depth: usize,
        /// Byte offset of the call that exceeded it.
        pos:   usize,
    },
}

impl ExtractorError {
    /// Returns the broad category of this error.
    ///
    /// Exhausting the call depth is an uncaught fault: it cannot be absorbed by
    /// a script-level `catch`.
    #[must_use]
    pub const fn kind(&self) -> FaultKind {
        match self {
            Self::Syntax(_) => FaultKind::Syntax,
            Self::Reference { .. } => FaultKind::Reference,
            Self::Type { .. } => FaultKind::Type,
            Self::Uncaught { .. } | Self::TooMuchRecursion { .. } => FaultKind::Uncaught,
        }
    }
}

impl From<RuntimeError> for ExtractorError {
    fn from(error: RuntimeError) -> Self {
        match error {
            RuntimeError::ReferenceError { name, pos } => Self::Reference { name, pos },
            RuntimeError::TypeError { details, pos } => Self::Type { details, pos },
            RuntimeError::Thrown { value, pos } => Self::Uncaught { message: value.to_string(),
                                                                    pos },
            RuntimeError::TooMuchRecursion { depth, pos } => Self::TooMuchRecursion { depth, pos },
            RuntimeError::Syntax(e) => Self::Syntax(e),
        }
    }
}
