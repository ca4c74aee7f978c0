//! Failure classification for retrieval errors.
//!
//! The retrieval capabilities only promise human readable error text, so the
//! rules here match on `error.to_string()`. Swapping in a stricter classifier
//! does not touch retrieval or batch logic.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::DriveError;
use crate::models::{DocumentReference, FailureKind, FailureRecord};
use crate::url_parser::find_drive_url;

/// Reason recorded when a service error carries no detail text.
pub const UNKNOWN_REASON: &str = "Unknown reason";

/// Reason recorded when Drive refuses the public link.
pub const PUBLIC_LINK_REASON: &str = "Cannot retrieve the public link of the file.";

static DETAILS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Details: (.*)$").expect("Invalid details regex"));

static PUBLIC_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Cannot retrieve .*public link").expect("Invalid public link regex")
});

/// Turns retrieval errors into report records.
pub trait FailureClassifier: Send + Sync {
    /// Build the failure record for `error` raised while retrieving `reference`.
    fn classify(&self, error: &DriveError, reference: &DocumentReference) -> FailureRecord;

    /// A directly fetchable URL to retry with, if `error` is a refused public
    /// link that names one.
    fn fallback_url(&self, error: &DriveError) -> Option<String>;
}

/// Pattern-based classifier over error text.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextFailureClassifier;

impl TextFailureClassifier {
    fn is_public_link_refusal(text: &str) -> bool {
        PUBLIC_LINK_REGEX.is_match(text)
    }

    fn service_details(text: &str) -> String {
        DETAILS_REGEX
            .captures(text.trim_end())
            .and_then(|captures| captures.get(1))
            .map(|details| details.as_str().trim().to_string())
            .filter(|details| !details.is_empty())
            .unwrap_or_else(|| UNKNOWN_REASON.to_string())
    }
}

impl FailureClassifier for TextFailureClassifier {
    fn classify(&self, error: &DriveError, reference: &DocumentReference) -> FailureRecord {
        let text = error.to_string();

        let (kind, reason, alternate_url) = if error.is_service_error() {
            (FailureKind::Service, Self::service_details(&text), None)
        } else if Self::is_public_link_refusal(&text) {
            match find_drive_url(&text) {
                Some(url) => (
                    FailureKind::Permission,
                    format!("{} Try downloading it manually from {}", PUBLIC_LINK_REASON, url),
                    Some(url.to_string()),
                ),
                None => (FailureKind::Permission, PUBLIC_LINK_REASON.to_string(), None),
            }
        } else {
            (FailureKind::Unknown, text, None)
        };

        FailureRecord {
            source_path: reference.source_path().to_path_buf(),
            url: reference.url().to_string(),
            kind,
            reason,
            alternate_url,
        }
    }

    fn fallback_url(&self, error: &DriveError) -> Option<String> {
        if error.is_service_error() {
            return None;
        }
        let text = error.to_string();
        if !Self::is_public_link_refusal(&text) {
            return None;
        }
        find_drive_url(&text).map(str::to_string)
    }
}
