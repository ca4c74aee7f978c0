//! drive_links - Resolve Google Drive shortcut files and download the documents
//! they point at.
//!
//! This library provides functionality to:
//! - Parse desktop link-files (`URL=` / `Name=` entries) into typed references
//! - Export Google Docs, Sheets and Slides through the Drive API
//! - Download publicly shared files without credentials, with a single
//!   fallback to the URL Drive suggests when the public link is refused
//! - Classify failures into a printable batch report
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! use drive_links::{
//!     Authenticator, BatchDriver, BatchOptions, DriveClient, ExportStrategy,
//!     TextFailureClassifier,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let auth = Authenticator::from_file("token.json")?;
//!     let strategy = ExportStrategy::new(DriveClient::new(auth));
//!     let driver = BatchDriver::new(
//!         Box::new(strategy),
//!         Arc::new(TextFailureClassifier),
//!         BatchOptions::default(),
//!     );
//!
//!     let report = driver.run(&[PathBuf::from("My Drive")]).await;
//!     println!("{}", report.summary());
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod batch;
pub mod client;
pub mod error;
pub mod failure;
pub mod link_file;
pub mod models;
pub mod output;
pub mod public;
pub mod retrieval;
pub mod url_parser;

// Re-exports for convenience
pub use auth::Authenticator;
pub use batch::{collect_link_files, BatchDriver, BatchOptions};
pub use client::DriveClient;
pub use error::{DriveError, Result};
pub use failure::{FailureClassifier, TextFailureClassifier};
pub use link_file::resolve_link_file;
pub use models::{
    BatchReport, DocumentKind, DocumentReference, ExportProfile, FailureKind, FailureRecord,
};
pub use public::PublicDownloader;
pub use retrieval::{
    DirectFetchStrategy, DownloadSource, Downloader, ExportStrategy, Exporter, RetrievalStrategy,
};
