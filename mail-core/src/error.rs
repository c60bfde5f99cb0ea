use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MessageError {
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),

    #[error("Empty recipient list")]
    NoRecipients,
}

pub type Result<T> = std::result::Result<T, MessageError>;
