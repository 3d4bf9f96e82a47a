use thiserror::Error;

/// Raised while normalizing a raw camera record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("malformed value for `{field}`: {reason}")]
    Format { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("Spypoint API returned {0}")]
    Api(reqwest::StatusCode),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Permanent failure: retrying with the same credentials will not help.
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Error::InvalidCredentials)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
