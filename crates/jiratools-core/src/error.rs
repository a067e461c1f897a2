//! Error types for document conversion

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The document uses a construct JIRA's API would reject, so the
    /// conversion refuses to produce it (e.g. blockquotes).
    #[error("Unsupported markdown construct: {0}")]
    UnsupportedConstruct(String),
}

pub type Result<T> = std::result::Result<T, Error>;
