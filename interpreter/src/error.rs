use knot_core::{Error as CoreError, Token, Type};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("scanner error: {}", .0)]
    Scanner(#[from] CoreError),

    #[error("parser error: {}", .0)]
    Parser(#[from] ParseError),

    #[error("runtime error: {}", .0)]
    Runtime(#[from] EvalError),
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ParseError {
    #[error("[col {col}] expected {expected}, found {found}")]
    UnexpectedToken {
        expected: Type,
        found: Type,
        col: usize,
    },

    #[error("[col {col}] expected a number or nil, found {found}")]
    UnknownLiteral { found: Type, col: usize },

    #[error("[col {col}] expected a value, found {found}")]
    UnknownRhs { found: Type, col: usize },

    #[error("[col {col}] expected '{{' or '[' after '@', found {found}")]
    UnknownDefinition { found: Type, col: usize },

    #[error("[col {col}] expression nests too deeply")]
    TooDeep { col: usize },
}

impl ParseError {
    pub(crate) fn unexpected(expected: Type, found: &Token) -> Self {
        ParseError::UnexpectedToken {
            expected,
            found: found.ty,
            col: found.col,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EvalError {
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("variable '{0}' is already defined")]
    DuplicateVariable(String),

    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("key '{0}' not found")]
    KeyNotFound(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("failed to write output: {msg}")]
    Output { msg: String },
}

impl EvalError {
    pub(crate) fn unsupported(msg: std::fmt::Arguments) -> Self {
        EvalError::UnsupportedOperation(format!("{}", msg))
    }
}

impl From<std::io::Error> for EvalError {
    fn from(value: std::io::Error) -> Self {
        EvalError::Output {
            msg: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
