use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid expression: {0}")]
    InvalidExpression(String),
    #[error("entry text is empty")]
    EmptyInput,
    #[error("invalid snapshot: {0}")]
    InvalidFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
