use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("line numbers start at 1 (got start line {0})")]
    ZeroLine(u32),
    #[error("line range ends before it starts: {start}-{end}")]
    InvertedRange { start: u32, end: u32 },
    #[error("board type cannot be empty")]
    EmptyBoardType,
    #[error("board type contains invalid characters: {0}")]
    InvalidBoardType(String),
}
