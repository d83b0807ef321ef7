use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Represents all errors that can occur during lexing or parsing.
///
/// Every variant carries the byte offset (`pos`) of the offending input, which
/// is the only useful position for minified snippets that fit on one line.
pub enum ParseError {
    /// The lexer found a character that starts no token.
    #[error("Error at offset {pos}: Unrecognized character '{found}'.")]
    UnrecognizedCharacter {
        /// The unrecognized input.
        found: String,
        /// Byte offset in the source.
        pos:   usize,
    },
    /// Found an unexpected token while parsing.
    #[error("Error at offset {pos}: Unexpected token: {token}.")]
    UnexpectedToken {
        /// A description of the token encountered.
        token: String,
        /// Byte offset in the source.
        pos:   usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error at offset {pos}: Unexpected end of input.")]
    UnexpectedEndOfInput {
        /// Byte offset where input ended.
        pos: usize,
    },
    /// The left-hand side of an assignment or update cannot be assigned to.
    #[error("Error at offset {pos}: Invalid assignment target.")]
    InvalidAssignmentTarget {
        /// Byte offset of the operator.
        pos: usize,
    },
    /// A numeric literal could not be read as a number.
    #[error("Error at offset {pos}: Invalid numeric literal '{literal}'.")]
    InvalidNumber {
        /// The literal text.
        literal: String,
        /// Byte offset in the source.
        pos:     usize,
    },
    /// Some other kind of parse error, with a custom message.
    #[error("Error at offset {pos}: {message}")]
    Other {
        /// Details about the parse error.
        message: String,
        /// Byte offset in the source.
        pos:     usize,
    },
}

impl ParseError {
    /// Byte offset of the error in the source.
    #[must_use]
    pub const fn pos(&self) -> usize {
        match self {
            Self::UnrecognizedCharacter { pos, .. }
            | Self::UnexpectedToken { pos, .. }
            | Self::UnexpectedEndOfInput { pos }
            | Self::InvalidAssignmentTarget { pos }
            | Self::InvalidNumber { pos, .. }
            | Self::Other { pos, .. } => *pos,
        }
    }

    /// Fills in the offset of an [`ParseError::UnexpectedEndOfInput`].
    ///
    /// The token stream does not know where the source ends, so the parser
    /// reports end of input at offset `0` and the caller, which does, patches
    /// the real offset in.
    #[must_use]
    pub fn at_end_of_input(self, end: usize) -> Self {
        match self {
            Self::UnexpectedEndOfInput { .. } => Self::UnexpectedEndOfInput { pos: end },
            other => other,
        }
    }
}
