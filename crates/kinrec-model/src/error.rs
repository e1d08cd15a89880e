use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid field name: {0:?}")]
    InvalidFieldName(String),
    #[error("unknown quantity kind: {0}")]
    UnknownQuantityKind(String),
    #[error("unknown join mode: {0}")]
    UnknownJoinMode(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
