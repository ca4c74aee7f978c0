//! drive_links CLI - Download the Google Drive documents behind shortcut files.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;

use drive_links::batch::DEFAULT_EXTENSION;
use drive_links::{
    Authenticator, BatchDriver, BatchOptions, BatchReport, DirectFetchStrategy, DriveClient,
    ExportProfile, ExportStrategy, FailureClassifier, PublicDownloader, RetrievalStrategy,
    TextFailureClassifier,
};

/// Resolve Google Drive link-files and download the documents they point at.
#[derive(Parser, Debug)]
#[command(name = "drive_links")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Link-files, or directories containing link-files.
    #[arg(required = true, value_parser = existing_path)]
    paths: Vec<PathBuf>,

    /// Resolve link-files without downloading anything.
    #[arg(long)]
    dry_run: bool,

    /// How documents are retrieved.
    #[arg(long, value_enum, env = "DRIVE_LINKS_STRATEGY", default_value_t = Strategy::Export)]
    strategy: Strategy,

    /// Export format family.
    #[arg(long, value_enum, env = "DRIVE_LINKS_FORMAT", default_value_t = Format::Office)]
    format: Format,

    /// Directory the downloaded documents are written to.
    #[arg(long, short = 'o', default_value = ".")]
    output_dir: PathBuf,

    /// Link-file extension to pick up from directories (repeatable).
    #[arg(long = "extension", default_value = DEFAULT_EXTENSION)]
    extensions: Vec<String>,

    /// Credentials JSON (service account key or authorized user token),
    /// used by the export strategy.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS", default_value = "token.json")]
    credentials: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Authenticated export through the Drive API.
    Export,
    /// Public download by file id, without credentials.
    Direct,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// .docx / .xlsx / .pptx
    Office,
    /// .odt / .ods / .odp
    OpenDocument,
}

impl From<Format> for ExportProfile {
    fn from(format: Format) -> Self {
        match format {
            Format::Office => ExportProfile::OfficeOpenXml,
            Format::OpenDocument => ExportProfile::OpenDocument,
        }
    }
}

fn existing_path(value: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.exists() {
        Ok(path)
    } else {
        Err("check that the provided path exists".to_string())
    }
}

fn init_tracing(cli: &Cli) {
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    debug!(?cli, "CLI arguments parsed");

    let classifier: Arc<dyn FailureClassifier> = Arc::new(TextFailureClassifier);

    let strategy: Box<dyn RetrievalStrategy> = match cli.strategy {
        // Credentials are only needed when something will be exported.
        Strategy::Export if !cli.dry_run => {
            let auth = Authenticator::from_file(&cli.credentials).with_context(|| {
                format!("Failed to load credentials from {:?}", cli.credentials)
            })?;
            Box::new(ExportStrategy::new(DriveClient::new(auth)))
        }
        Strategy::Export | Strategy::Direct => Box::new(DirectFetchStrategy::new(
            PublicDownloader::new(),
            Arc::clone(&classifier),
        )),
    };

    if !cli.dry_run {
        std::fs::create_dir_all(&cli.output_dir)
            .with_context(|| format!("Failed to create directory: {:?}", cli.output_dir))?;
    }

    let options = BatchOptions {
        dry_run: cli.dry_run,
        profile: cli.format.into(),
        output_dir: cli.output_dir,
        extensions: cli.extensions,
    };

    let driver = BatchDriver::new(strategy, classifier, options);
    let report = driver.run(&cli.paths).await;

    print_report(&report);

    Ok(())
}

fn print_report(report: &BatchReport) {
    println!("{}", report.summary());

    if report.dry_run {
        println!("Dry run: {} files would be downloaded.", report.planned.len());
        for reference in &report.planned {
            println!(
                "  {} -> {}",
                reference.source_path().display(),
                reference.display_name()
            );
        }
    }

    let mut others = report.other_failures().peekable();
    if others.peek().is_some() {
        println!("Failures:");
        for record in others {
            println!("{}\n", record);
        }
    }

    let mut denied = report.permission_failures().peekable();
    if denied.peek().is_some() {
        println!(
            "\nThe following files failed because their public link could not be retrieved. \
             You may need to change the permission to 'Anyone with the link', or the file \
             has had too many accesses."
        );
        for record in denied {
            println!("\n{}", record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_paths() {
        assert!(Cli::try_parse_from(["drive_links"]).is_err());
        assert!(Cli::try_parse_from(["drive_links", "--dry-run"]).is_err());
    }

    #[test]
    fn test_rejects_missing_path() {
        let err = Cli::try_parse_from(["drive_links", "/nonexistent/links"]).unwrap_err();
        assert!(err.to_string().contains("check that the provided path exists"));
    }

    #[test]
    fn test_defaults() {
        let dir = std::env::temp_dir();
        let cli = Cli::try_parse_from([std::ffi::OsStr::new("drive_links"), dir.as_os_str()]).unwrap();
        assert_eq!(cli.paths, vec![dir]);
        assert!(!cli.dry_run);
        assert_eq!(cli.extensions, vec![DEFAULT_EXTENSION.to_string()]);
        assert_eq!(cli.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_format_profiles() {
        assert_eq!(ExportProfile::from(Format::Office), ExportProfile::OfficeOpenXml);
        assert_eq!(
            ExportProfile::from(Format::OpenDocument),
            ExportProfile::OpenDocument
        );
    }
}
