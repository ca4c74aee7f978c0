//! Whole-file output writes.
//!
//! Bytes are written to a hidden sibling `.part` file and renamed into place
//! once complete, so a failed retrieval never leaves a truncated artifact.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::error::Result;

fn part_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!(".{}.part", name))
}

/// Write `bytes` to `destination`, replacing any existing file.
pub async fn write_output(destination: &Path, bytes: &[u8]) -> Result<u64> {
    let part = part_path(destination);
    let result = write_part(&part, destination, bytes).await;
    if result.is_err() {
        let _ = fs::remove_file(&part).await;
    }
    result
}

/// Stream a response body to `destination`, replacing any existing file.
pub async fn stream_output(destination: &Path, response: reqwest::Response) -> Result<u64> {
    let part = part_path(destination);
    let result = stream_part(&part, destination, response).await;
    if result.is_err() {
        let _ = fs::remove_file(&part).await;
    }
    result
}

async fn write_part(part: &Path, destination: &Path, bytes: &[u8]) -> Result<u64> {
    let mut file = File::create(part).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);
    fs::rename(part, destination).await?;
    Ok(bytes.len() as u64)
}

async fn stream_part(part: &Path, destination: &Path, response: reqwest::Response) -> Result<u64> {
    let mut file = File::create(part).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    drop(file);
    fs::rename(part, destination).await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Path::new("out/Report.docx")),
            PathBuf::from("out/.Report.docx.part")
        );
    }

    #[tokio::test]
    async fn test_write_output_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("Report.docx");
        std::fs::write(&destination, b"old").unwrap();

        let written = write_output(&destination, b"new content").await.unwrap();

        assert_eq!(written, 11);
        assert_eq!(std::fs::read(&destination).unwrap(), b"new content");
        assert!(!dir.path().join(".Report.docx.part").exists());
    }

    #[tokio::test]
    async fn test_write_output_missing_directory_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("missing").join("Report.docx");

        assert!(write_output(&destination, b"data").await.is_err());
        assert!(!destination.exists());
    }
}
