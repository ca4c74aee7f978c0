//! Data models for resolved documents, batch results and Drive API responses.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Kind of native Drive document a sharing link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Document,
    Spreadsheet,
    Presentation,
}

impl DocumentKind {
    /// Map Drive's literal URL path segment to a supported kind.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "document" => Some(Self::Document),
            "spreadsheets" => Some(Self::Spreadsheet),
            "presentation" => Some(Self::Presentation),
            _ => None,
        }
    }
}

/// Target format family for exported documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportProfile {
    /// `.docx`, `.xlsx`, `.pptx`
    #[default]
    OfficeOpenXml,
    /// `.odt`, `.ods`, `.odp`
    OpenDocument,
}

/// Concrete export MIME type and the extension appended to the output name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportFormat {
    pub mime_type: &'static str,
    pub extension: &'static str,
}

impl ExportProfile {
    /// Static lookup of the export format for a document kind.
    pub fn format_for(self, kind: DocumentKind) -> ExportFormat {
        let (mime_type, extension) = match (self, kind) {
            (Self::OfficeOpenXml, DocumentKind::Document) => (
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                ".docx",
            ),
            (Self::OfficeOpenXml, DocumentKind::Spreadsheet) => (
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                ".xlsx",
            ),
            (Self::OfficeOpenXml, DocumentKind::Presentation) => (
                "application/vnd.openxmlformats-officedocument.presentationml.presentation",
                ".pptx",
            ),
            (Self::OpenDocument, DocumentKind::Document) => {
                ("application/vnd.oasis.opendocument.text", ".odt")
            }
            (Self::OpenDocument, DocumentKind::Spreadsheet) => {
                ("application/vnd.oasis.opendocument.spreadsheet", ".ods")
            }
            (Self::OpenDocument, DocumentKind::Presentation) => {
                ("application/vnd.oasis.opendocument.presentation", ".odp")
            }
        };
        ExportFormat {
            mime_type,
            extension,
        }
    }
}

/// A fully resolved reference to a remote Drive document.
///
/// Only constructed once every field is known, so downstream code never sees
/// a partially parsed link-file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReference {
    source_path: PathBuf,
    url: String,
    display_name: String,
    file_id: String,
    kind: DocumentKind,
    export: ExportFormat,
}

impl DocumentReference {
    /// Build a reference, suffixing `name` with the profile's extension for `kind`.
    pub fn new(
        source_path: impl Into<PathBuf>,
        url: impl Into<String>,
        name: &str,
        file_id: impl Into<String>,
        kind: DocumentKind,
        profile: ExportProfile,
    ) -> Self {
        let export = profile.format_for(kind);
        Self {
            source_path: source_path.into(),
            url: url.into(),
            display_name: format!("{}{}", name, export.extension),
            file_id: file_id.into(),
            kind,
            export,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn export_mime(&self) -> &'static str {
        self.export.mime_type
    }
}

/// Classification of a failed retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The document's public link is not accessible.
    Permission,
    /// The Drive service reported a structured error.
    Service,
    /// Anything else.
    Unknown,
}

/// One failed retrieval, as shown in the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub source_path: PathBuf,
    pub url: String,
    pub kind: FailureKind,
    pub reason: String,
    pub alternate_url: Option<String>,
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File path: {}", self.source_path.display())?;
        writeln!(f, "URL: {}", self.url)?;
        write!(f, "Reason: {}", self.reason)?;
        if let Some(url) = &self.alternate_url {
            write!(f, "\nAlternate URL: {}", url)?;
        }
        Ok(())
    }
}

/// Counters and failures accumulated over one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failures: Vec<FailureRecord>,
    pub dry_run: bool,
    /// References that would have been retrieved in dry-run mode.
    pub planned: Vec<DocumentReference>,
}

impl BatchReport {
    pub fn summary(&self) -> String {
        format!(
            "{} files processed; {} files successfully downloaded; {} failures.",
            self.processed,
            self.succeeded,
            self.failures.len()
        )
    }

    pub fn permission_failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.failures
            .iter()
            .filter(|record| record.kind == FailureKind::Permission)
    }

    pub fn other_failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.failures
            .iter()
            .filter(|record| record.kind != FailureKind::Permission)
    }
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorItem>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorItem {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorDetail {
    /// Human readable detail for the first listed error, falling back to the
    /// top-level message.
    pub fn details(&self) -> String {
        self.errors
            .first()
            .and_then(|item| item.message.clone().or_else(|| item.reason.clone()))
            .unwrap_or_else(|| self.message.clone())
    }
}

/// Service account credentials from JSON file.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: Option<String>,
}

/// Authorized user credentials (a stored OAuth refresh token).
#[derive(Debug, Deserialize)]
pub struct AuthorizedUserCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub token_uri: Option<String>,
}

/// Any credentials file the authenticator understands.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Credentials {
    ServiceAccount(ServiceAccountCredentials),
    AuthorizedUser(AuthorizedUserCredentials),
}

/// OAuth2 token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: u64,
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
