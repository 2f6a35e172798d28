// error.rs - Error type shared by every part of the core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifeError {
    #[error("line {line}: pattern row appears before any #P block header")]
    RowBeforeHeader { line: usize },

    #[error("line {line}: malformed block header `{text}`, expected `#P <x> <y>`")]
    BadBlockHeader { line: usize, text: String },

    #[error("pattern contains no live cells")]
    EmptyPattern,

    #[error("invalid grid dimensions {rows}x{cols}, both must be positive")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to start coroutine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl LifeError {
    /// True for the two malformed-text kinds produced by the parser.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, LifeError::RowBeforeHeader { .. } | LifeError::BadBlockHeader { .. })
    }
}

pub type Result<T> = std::result::Result<T, LifeError>;
