//! Errors raised while parsing a source file.
//!
//! Every error is terminal: the parser stops at the first one and no
//! partial program is ever handed to the serializer.
use std::io;
use thiserror::Error;

/// The coarse error classes, each with a stable process exit status.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    InvalidHeader,
    InvalidOpcode,
    Syntax,
    Input,
    Internal,
}

impl ErrorKind {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::Input         => 11,
            ErrorKind::InvalidHeader => 21,
            ErrorKind::InvalidOpcode => 22,
            ErrorKind::Syntax        => 23,
            ErrorKind::Internal      => 99,
        }
    }
}

/// Operand count or operand grammar violations for a known opcode.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum SyntaxError {
    #[error("not enough operands (expected {expected}, found {found})")]
    TooFewOperands { expected: usize, found: usize },

    #[error("too many operands (expected {expected}, found {found})")]
    TooManyOperands { expected: usize, found: usize },

    #[error("invalid variable operand `{operand}` ({reason})")]
    InvalidVariable { operand: String, reason: &'static str },

    #[error("invalid variable or constant operand `{operand}` ({var_reason} / {const_reason})")]
    InvalidSymbol { operand: String, var_reason: &'static str, const_reason: &'static str },

    #[error("illegal characters in label name `{operand}`")]
    InvalidLabel { operand: String },

    #[error("invalid type name `{operand}`")]
    InvalidType { operand: String },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid header (language ID) `{found}` on line {line}")]
    InvalidHeader { line: usize, found: String },

    #[error("file header (language ID) is absent")]
    MissingHeader,

    #[error("invalid opcode `{opcode}` on line {line}")]
    InvalidOpcode { line: usize, opcode: String },

    #[error("{error} for opcode `{opcode}` on line {line}")]
    Syntax { line: usize, opcode: String, error: SyntaxError },

    #[error("error reading line {line}: {source}")]
    Input { line: usize, #[source] source: io::Error },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::InvalidHeader { .. } |
            ParseError::MissingHeader         => ErrorKind::InvalidHeader,
            ParseError::InvalidOpcode { .. }  => ErrorKind::InvalidOpcode,
            ParseError::Syntax { .. }         => ErrorKind::Syntax,
            ParseError::Input { .. }          => ErrorKind::Input,
            ParseError::Internal(_)           => ErrorKind::Internal,
        }
    }

    /// The source line the error refers to, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::InvalidHeader { line, .. } |
            ParseError::InvalidOpcode { line, .. } |
            ParseError::Syntax { line, .. }        |
            ParseError::Input { line, .. }         => Some(*line),
            ParseError::MissingHeader |
            ParseError::Internal(_)                => None,
        }
    }
}
