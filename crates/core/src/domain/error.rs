// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Queue is empty")]
    EmptyQueue,

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Cannot move item {0} relative to itself")]
    SelfReference(String),

    #[error("Malformed item identifier: {0}")]
    MalformedId(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
