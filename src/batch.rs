//! Batch driver: walks the input paths, resolves each link-file and hands
//! resolved references to the configured retrieval strategy.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::{glob, Pattern};
use tracing::{debug, info, warn};

use crate::failure::FailureClassifier;
use crate::link_file::resolve_link_file;
use crate::models::{BatchReport, ExportProfile};
use crate::retrieval::RetrievalStrategy;

/// Default link-file extension (freedesktop `.desktop` shortcuts).
pub const DEFAULT_EXTENSION: &str = "desktop";

/// Per-run settings for [`BatchDriver`].
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub dry_run: bool,
    pub profile: ExportProfile,
    pub output_dir: PathBuf,
    /// Extensions (without the dot) that mark a file as a link-file.
    pub extensions: Vec<String>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            profile: ExportProfile::default(),
            output_dir: PathBuf::from("."),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
        }
    }
}

/// Whether `path` carries one of the link-file `extensions`.
fn has_link_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

/// Expand input paths into link-file candidates.
///
/// Directories contribute the link-files directly inside them (not
/// recursive), sorted by path. Files named explicitly are taken as-is.
/// Anything else is skipped.
pub fn collect_link_files(inputs: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = match input.to_str() {
                Some(dir) => glob_link_files(dir, extensions),
                None => list_link_files(input, extensions),
            };
            found.sort();
            found.dedup();
            candidates.extend(found);
        } else if input.is_file() {
            candidates.push(input.clone());
        } else {
            debug!(path = %input.display(), "Skipping input that is neither a file nor a directory");
        }
    }

    candidates
}

fn glob_link_files(dir: &str, extensions: &[String]) -> Vec<PathBuf> {
    let escaped = Pattern::escape(dir);
    let mut found = Vec::new();
    for ext in extensions {
        let pattern = format!("{}/*.{}", escaped, Pattern::escape(ext));
        match glob(&pattern) {
            Ok(paths) => found.extend(
                paths
                    .filter_map(|entry| entry.ok())
                    .filter(|path| path.is_file()),
            ),
            Err(e) => warn!(pattern = %pattern, error = %e, "Invalid link-file pattern"),
        }
    }
    found
}

/// Directory listing for paths a glob pattern cannot express.
fn list_link_files(dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    debug!(path = %dir.display(), "Listing non UTF-8 directory without glob");
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_link_extension(path, extensions))
            .collect(),
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Failed to list directory");
            Vec::new()
        }
    }
}

/// Drives one batch run, one link-file at a time.
pub struct BatchDriver {
    strategy: Box<dyn RetrievalStrategy>,
    classifier: Arc<dyn FailureClassifier>,
    options: BatchOptions,
}

impl BatchDriver {
    pub fn new(
        strategy: Box<dyn RetrievalStrategy>,
        classifier: Arc<dyn FailureClassifier>,
        options: BatchOptions,
    ) -> Self {
        Self {
            strategy,
            classifier,
            options,
        }
    }

    /// Process every link-file reachable from `inputs`.
    ///
    /// Per-file errors are recorded in the report and never abort the run.
    pub async fn run(&self, inputs: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport {
            dry_run: self.options.dry_run,
            ..Default::default()
        };

        let candidates = collect_link_files(inputs, &self.options.extensions);
        info!(
            candidates = candidates.len(),
            strategy = self.strategy.name(),
            dry_run = self.options.dry_run,
            "Starting batch"
        );

        for path in candidates {
            report.processed += 1;

            let Some(reference) = resolve_link_file(&path, self.options.profile) else {
                continue;
            };
            debug!(
                path = %path.display(),
                file_id = reference.file_id(),
                name = reference.display_name(),
                "Resolved link-file"
            );

            if self.options.dry_run {
                report.planned.push(reference);
                continue;
            }

            match self
                .strategy
                .retrieve(&reference, &self.options.output_dir)
                .await
            {
                Ok(_) => report.succeeded += 1,
                Err(error) => {
                    let record = self.classifier.classify(&error, &reference);
                    warn!(
                        path = %path.display(),
                        kind = ?record.kind,
                        reason = %record.reason,
                        "Retrieval failed"
                    );
                    report.failures.push(record);
                }
            }
        }

        report
    }
}
