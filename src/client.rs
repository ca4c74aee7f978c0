//! Google Drive API client for authenticated document export.

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use crate::auth::Authenticator;
use crate::error::{DriveError, Result};
use crate::models::ApiErrorResponse;
use crate::retrieval::Exporter;

/// Base URL for Google Drive API v3.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Client for exporting native Drive documents.
pub struct DriveClient {
    auth: Authenticator,
    http: Client,
    api_base: String,
}

impl DriveClient {
    /// Create a new DriveClient against the public Drive API.
    pub fn new(auth: Authenticator) -> Self {
        Self::with_api_base(auth, DRIVE_API_BASE)
    }

    /// Create a client against a different API root (used by tests).
    pub fn with_api_base(auth: Authenticator, api_base: impl Into<String>) -> Self {
        Self {
            auth,
            http: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Export a native document to `mime_type` and return the converted bytes.
    ///
    /// # Arguments
    /// * `file_id` - The ID of the document
    /// * `mime_type` - Target MIME type, e.g. the OpenXML word processing type
    pub async fn export_file(&self, file_id: &str, mime_type: &str) -> Result<Vec<u8>> {
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .get(format!("{}/files/{}/export", self.api_base, file_id))
            .bearer_auth(&token)
            .query(&[("mimeType", mime_type)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let bytes = response.bytes().await?;
        debug!(file_id, mime_type, bytes = bytes.len(), "Export response received");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Exporter for DriveClient {
    async fn export(&self, file_id: &str, mime_type: &str) -> Result<Vec<u8>> {
        self.export_file(file_id, mime_type).await
    }
}

/// Convert a failed API response into [`DriveError::ApiError`].
async fn api_error(response: Response) -> DriveError {
    let status = response.status();
    let error_body = response.text().await.unwrap_or_default();
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        let details = api_error.error.details();
        return DriveError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
            details: Some(details),
        };
    }
    DriveError::ApiError {
        status: status.as_u16(),
        message: error_body,
        details: None,
    }
}

#[cfg(test)]
mod tests {
    // Tests are in tests/client_test.rs
}
