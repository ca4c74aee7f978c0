//! Error types for the drive_links crate.

use thiserror::Error;

/// Errors that can occur while resolving or retrieving Drive documents.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse credentials JSON: {0}")]
    CredentialsParseError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Structured error reported by the Drive API.
    #[error("API error ({status}): {message}{}", details_suffix(.details))]
    ApiError {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// Drive refused to serve the file through its public download endpoint.
    #[error(
        "Cannot retrieve the public link of the file. You may need to change the permission to \
         'Anyone with the link', or have had many accesses. \n\nYou may still be able to access \
         the file from the browser:\n\n\t {url}\n"
    )]
    PublicLinkUnavailable { url: String },

    /// The one-shot fallback download also failed. The original error text is
    /// kept so the failure is still classified by its first cause.
    #[error("{original}\nFallback download from {url} failed: {source}")]
    FallbackFailed {
        original: String,
        url: String,
        #[source]
        source: Box<DriveError>,
    },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("JWT encoding error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Token refresh failed: {0}")]
    TokenRefreshError(String),
}

impl DriveError {
    /// Whether the error was reported by the remote service itself rather
    /// than by the transport or local filesystem.
    pub fn is_service_error(&self) -> bool {
        matches!(self, DriveError::ApiError { .. })
    }
}

fn details_suffix(details: &Option<String>) -> String {
    match details {
        Some(details) => format!(". Details: {}", details),
        None => String::new(),
    }
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_with_details() {
        let err = DriveError::ApiError {
            status: 403,
            message: "This file is too large to be exported".to_string(),
            details: Some("exportSizeLimitExceeded".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "API error (403): This file is too large to be exported. Details: exportSizeLimitExceeded"
        );
        assert!(err.is_service_error());
    }

    #[test]
    fn test_api_error_display_without_details() {
        let err = DriveError::ApiError {
            status: 500,
            message: "backend".to_string(),
            details: None,
        };
        assert_eq!(err.to_string(), "API error (500): backend");
    }

    #[test]
    fn test_fallback_failed_keeps_original_text() {
        let original = DriveError::PublicLinkUnavailable {
            url: "https://drive.google.com/uc?id=abc".to_string(),
        };
        let err = DriveError::FallbackFailed {
            original: original.to_string(),
            url: "https://drive.google.com/uc?id=abc".to_string(),
            source: Box::new(DriveError::UnexpectedResponse("HTML page".to_string())),
        };
        let text = err.to_string();
        assert!(text.starts_with("Cannot retrieve the public link"));
        assert!(text.contains("HTML page"));
        assert!(!err.is_service_error());
    }
}
