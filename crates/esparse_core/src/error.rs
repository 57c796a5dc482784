//! Error types for the esparse parser.

use thiserror::Error;

use crate::parser::scanner::Position;

/// All errors that can be produced while parsing.
///
/// Parsing stops at the first error; the variant tells whether the input
/// failed to tokenize or failed a grammar or early-error rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Malformed token: unterminated literal, bad escape, bad number.
    #[error("{message} ({}:{})", .pos.line, .pos.column)]
    Lexical {
        /// Human-readable description.
        message: String,
        /// Where the offending token starts.
        pos: Position,
    },

    /// Grammar mismatch or early-error violation.
    #[error("{message} ({}:{})", .pos.line, .pos.column)]
    Syntax {
        /// Human-readable description.
        message: String,
        /// Where the offending construct starts.
        pos: Position,
    },
}

impl ParseError {
    /// Build a [`ParseError::Lexical`].
    pub fn lexical(message: impl Into<String>, pos: Position) -> Self {
        Self::Lexical {
            message: message.into(),
            pos,
        }
    }

    /// Build a [`ParseError::Syntax`].
    pub fn syntax(message: impl Into<String>, pos: Position) -> Self {
        Self::Syntax {
            message: message.into(),
            pos,
        }
    }

    /// The error description without its position suffix.
    pub fn message(&self) -> &str {
        match self {
            Self::Lexical { message, .. } | Self::Syntax { message, .. } => message,
        }
    }

    /// Where in the source the error was detected.
    pub fn position(&self) -> Position {
        match self {
            Self::Lexical { pos, .. } | Self::Syntax { pos, .. } => *pos,
        }
    }

    /// Byte offset of the error.
    pub fn offset(&self) -> usize {
        self.position().offset
    }

    /// `true` for tokenizer failures.
    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::Lexical { .. })
    }
}

/// Convenient `Result` alias for fallible parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_line_and_column() {
        let pos = Position {
            offset: 12,
            line: 2,
            column: 4,
        };
        let err = ParseError::syntax("Unexpected token", pos);
        assert_eq!(err.to_string(), "Unexpected token (2:4)");
        assert_eq!(err.offset(), 12);
        assert!(!err.is_lexical());
    }
}
