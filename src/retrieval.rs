//! Retrieval strategies: how bytes are obtained for a [`DocumentReference`].
//!
//! Two interchangeable strategies sit behind [`RetrievalStrategy`]:
//!
//! - [`ExportStrategy`] asks an authenticated [`Exporter`] to convert the
//!   document server-side and writes the returned bytes.
//! - [`DirectFetchStrategy`] downloads through a [`Downloader`] by file id and,
//!   when the public link is refused, retries once with the Drive URL found in
//!   the error text.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{DriveError, Result};
use crate::failure::FailureClassifier;
use crate::models::{format_size, DocumentReference};
use crate::output::write_output;

/// Authenticated export capability.
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Export the native document `file_id` as `mime_type`.
    async fn export(&self, file_id: &str, mime_type: &str) -> Result<Vec<u8>>;
}

/// What to hand to a [`Downloader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadSource {
    Id(String),
    Url(String),
}

/// Generic download-by-id-or-url capability.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `source` to `output`, returning the number of bytes written.
    async fn download(&self, source: &DownloadSource, output: &Path) -> Result<u64>;
}

/// Obtains the artifact for one resolved reference.
#[async_trait]
pub trait RetrievalStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Retrieve `reference` into `output_dir`, returning the written path.
    async fn retrieve(&self, reference: &DocumentReference, output_dir: &Path) -> Result<PathBuf>;
}

/// Server-side export through an authenticated [`Exporter`].
pub struct ExportStrategy<E> {
    exporter: E,
}

impl<E: Exporter> ExportStrategy<E> {
    pub fn new(exporter: E) -> Self {
        Self { exporter }
    }
}

#[async_trait]
impl<E: Exporter> RetrievalStrategy for ExportStrategy<E> {
    fn name(&self) -> &'static str {
        "export"
    }

    async fn retrieve(&self, reference: &DocumentReference, output_dir: &Path) -> Result<PathBuf> {
        debug!(
            file_id = reference.file_id(),
            mime_type = reference.export_mime(),
            "Exporting document"
        );
        let bytes = self
            .exporter
            .export(reference.file_id(), reference.export_mime())
            .await?;

        let destination = output_dir.join(reference.display_name());
        let written = write_output(&destination, &bytes).await?;
        info!(
            path = %destination.display(),
            size = %format_size(written),
            "Exported document"
        );
        Ok(destination)
    }
}

/// Best-effort public download with a single URL fallback.
pub struct DirectFetchStrategy<D> {
    downloader: D,
    classifier: Arc<dyn FailureClassifier>,
}

impl<D: Downloader> DirectFetchStrategy<D> {
    /// `classifier` decides which errors carry a usable fallback URL.
    pub fn new(downloader: D, classifier: Arc<dyn FailureClassifier>) -> Self {
        Self {
            downloader,
            classifier,
        }
    }
}

#[async_trait]
impl<D: Downloader> RetrievalStrategy for DirectFetchStrategy<D> {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn retrieve(&self, reference: &DocumentReference, output_dir: &Path) -> Result<PathBuf> {
        let destination = output_dir.join(reference.display_name());
        let source = DownloadSource::Id(reference.file_id().to_string());

        let error = match self.downloader.download(&source, &destination).await {
            Ok(written) => {
                info!(
                    path = %destination.display(),
                    size = %format_size(written),
                    "Downloaded document"
                );
                return Ok(destination);
            }
            Err(error) => error,
        };

        let Some(url) = self.classifier.fallback_url(&error) else {
            return Err(error);
        };

        info!(%url, file_id = reference.file_id(), "Public link refused, retrying with fallback URL");
        match self
            .downloader
            .download(&DownloadSource::Url(url.clone()), &destination)
            .await
        {
            Ok(written) => {
                info!(
                    path = %destination.display(),
                    size = %format_size(written),
                    "Downloaded document from fallback URL"
                );
                Ok(destination)
            }
            Err(source) => Err(DriveError::FallbackFailed {
                original: error.to_string(),
                url,
                source: Box::new(source),
            }),
        }
    }
}
