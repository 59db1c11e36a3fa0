use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("[col {col}] unexpected character {ch:?}")]
    UnexpectedCharacter { ch: char, col: usize },

    #[error("[col {col}] number literal {literal} does not fit in an integer")]
    NumberOutOfRange { literal: String, col: usize },

    // Only reachable through a scanner bug, the eof sentinel is returned before this can happen.
    #[error("[col {col}] attempted to read past end of input")]
    ReadPastEnd { col: usize },
}

