//! Filer gateway error types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, FilerError>;

/// Errors surfaced by the filer client and the file gateway
#[derive(Error, Debug)]
pub enum FilerError {
    /// The filer reported 404 for the path
    #[error("entry not found: {0}")]
    NotFound(String),

    /// Content was requested for a directory
    #[error("cannot download a directory: {0}")]
    IsDirectory(String),

    /// A listing cursor could not be decoded
    #[error("malformed cursor: {0}")]
    Decode(String),

    /// Network or connection failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx, non-404 reply from the filer
    #[error("filer returned {status} for {path}: {message}")]
    RemoteService {
        status: u16,
        path: String,
        message: String,
    },

    /// The filer replied with a payload we could not parse
    #[error("invalid filer response: {0}")]
    InvalidResponse(String),

    /// Sink or source IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl FilerError {
    pub(crate) fn remote(status: reqwest::StatusCode, path: &str, body: &[u8]) -> Self {
        let message = String::from_utf8_lossy(body).trim().to_string();
        Self::RemoteService {
            status: status.as_u16(),
            path: path.to_string(),
            message,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if the failure happened talking to the filer rather than in our own input
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::RemoteService { .. } | Self::InvalidResponse(_)
        )
    }
}

impl From<serde_json::Error> for FilerError {
    fn from(err: serde_json::Error) -> Self {
        FilerError::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_keeps_body() {
        let err = FilerError::remote(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "/buckets/a.txt",
            b"  volume unavailable\n",
        );

        match &err {
            FilerError::RemoteService { status, path, message } => {
                assert_eq!(*status, 500);
                assert_eq!(path, "/buckets/a.txt");
                assert_eq!(message, "volume unavailable");
            }
            _ => panic!("Expected RemoteService"),
        }
        assert!(err.is_upstream());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_json_error_is_invalid_response() {
        let err: FilerError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, FilerError::InvalidResponse(_)));
    }
}
