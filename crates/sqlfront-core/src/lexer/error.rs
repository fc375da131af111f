//! Lexical errors.

/// An error raised while splitting source text into tokens.
///
/// Every variant carries the byte offset where the offending construct
/// starts; for unterminated literals that is the opening delimiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("unterminated quoted identifier starting at offset {offset}")]
    UnterminatedIdentifier { offset: usize },

    #[error("unterminated blob literal starting at offset {offset}")]
    UnterminatedBlob { offset: usize },

    #[error("invalid blob literal at offset {offset}: {reason}")]
    InvalidBlob { offset: usize, reason: &'static str },

    #[error("malformed number '{text}' at offset {offset}")]
    MalformedNumber { offset: usize, text: String },

    #[error("unknown symbol '{symbol}' at offset {offset}")]
    UnknownSymbol { offset: usize, symbol: String },

    #[error("placeholder at offset {offset} has no name")]
    InvalidPlaceholder { offset: usize },
}

impl LexError {
    /// Byte offset of the offending input.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::UnterminatedString { offset }
            | Self::UnterminatedIdentifier { offset }
            | Self::UnterminatedBlob { offset }
            | Self::InvalidBlob { offset, .. }
            | Self::MalformedNumber { offset, .. }
            | Self::UnknownSymbol { offset, .. }
            | Self::InvalidPlaceholder { offset } => *offset,
        }
    }
}
