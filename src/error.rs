//! Error types for address arithmetic.
//!
//! Every core operation fails fast with one [`NetError`] naming the
//! violated rule and the offending value.

use thiserror::Error;

/// Failure of a core address operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
    /// Malformed text: wrong part count, invalid digit, bad literal.
    #[error("format error: {0}")]
    Format(String),
    /// Value outside its numeric bound.
    #[error("range error: {0}")]
    Range(String),
    /// Address/prefix combination invalid for its family.
    #[error("parse error: {0}")]
    Parse(String),
}

impl NetError {
    pub fn format(msg: impl Into<String>) -> Self {
        NetError::Format(msg.into())
    }

    pub fn range(msg: impl Into<String>) -> Self {
        NetError::Range(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        NetError::Parse(msg.into())
    }

    /// Short category name, as reported to callers of the request layer.
    pub fn kind(&self) -> &'static str {
        match self {
            NetError::Format(_) => "FormatError",
            NetError::Range(_) => "RangeError",
            NetError::Parse(_) => "ParseError",
        }
    }
}
