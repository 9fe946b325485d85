//! Transport and server errors.

use thiserror::Error;

/// Shown when a failed response carries no usable message.
pub const GENERIC_SERVER_ERROR: &str = "Server returned an error response";

/// Anything that goes wrong after the request leaves validation.
///
/// `Display` is the text the error banner shows. For `Server` that is the
/// server's own message, unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The multipart request could not be built
    #[error("Could not build request: {0}")]
    Request(String),
    /// Connection refused, DNS failure, timeout, reset
    #[error("Network error: {0}")]
    Network(String),
    /// Non-2xx reply
    #[error("{message}")]
    Server { status: u16, message: String },
    /// 2xx reply in a shape we do not handle
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    /// `excel_file` was not valid base64
    #[error("Invalid file payload: {0}")]
    Decode(String),
    /// The processed file could not be written
    #[error("Could not save file: {0}")]
    Io(String),
}

impl UploadError {
    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Io(err.to_string())
    }
}

impl From<base64::DecodeError> for UploadError {
    fn from(err: base64::DecodeError) -> Self {
        UploadError::Decode(err.to_string())
    }
}
