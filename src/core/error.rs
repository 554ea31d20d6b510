//! Request-path error taxonomy.

use thiserror::Error;

/// Stable, client-facing error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Validation,
    NotFound,
    Upstream,
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Validation => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Upstream => "UPSTREAM_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

pub type Result<T> = std::result::Result<T, FxError>;

#[derive(Debug, Error)]
pub enum FxError {
    /// Input rejected before any upstream call.
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("unknown entrypoint: {0}")]
    UnknownEntrypoint(String),
    #[error("upstream error: HTTP {status}")]
    UpstreamStatus { status: u16 },
    #[error("upstream request failed: {0}")]
    UpstreamRequest(#[from] reqwest::Error),
    #[error("malformed upstream response: {0}")]
    UpstreamBody(String),
    #[error("upstream response has no rate for {currency}")]
    MissingRate { currency: String },
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl FxError {
    pub fn validation(msg: impl Into<String>) -> Self {
        FxError::Validation(msg.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            FxError::Validation(_) => ErrorCode::Validation,
            FxError::UnknownEntrypoint(_) => ErrorCode::NotFound,
            FxError::UpstreamStatus { .. }
            | FxError::UpstreamRequest(_)
            | FxError::UpstreamBody(_)
            | FxError::MissingRate { .. } => ErrorCode::Upstream,
            FxError::Encode(_) => ErrorCode::Internal,
        }
    }
}
