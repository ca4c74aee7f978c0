//! Link-file parsing: turns a desktop shortcut into a [`DocumentReference`].
//!
//! Link-files are line-oriented `Key=Value` text. Only `URL` and `Name` are
//! significant. Anything that does not resolve to a supported Drive document
//! is reported as `None` and skipped by the caller.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{DocumentKind, DocumentReference, ExportProfile};
use crate::url_parser::parse_sharing_link;

static KEY_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(URL|Name)=(.+)$").expect("Invalid key line regex"));

/// Extract the recognized `Key=Value` pairs from link-file content.
///
/// When a key repeats, the last occurrence wins.
pub fn read_link_keys(content: &str) -> HashMap<&str, &str> {
    let mut keys = HashMap::new();
    for line in content.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(captures) = KEY_LINE_REGEX.captures(line) {
            if let (Some(key), Some(value)) = (captures.get(1), captures.get(2)) {
                keys.insert(key.as_str(), value.as_str());
            }
        }
    }
    keys
}

/// Turn a `Name` value into a single path component.
///
/// Separators and NUL become `_`, so the output always lands directly inside
/// the output directory. A name made only of dots is prefixed with `_`.
pub fn output_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    if stem.chars().all(|c| c == '.') {
        format!("_{}", stem)
    } else {
        stem
    }
}

/// Resolve link-file content read from `source_path`.
pub fn resolve_link_content(
    source_path: &Path,
    content: &str,
    profile: ExportProfile,
) -> Option<DocumentReference> {
    let keys = read_link_keys(content);

    let Some(url) = keys.get("URL") else {
        debug!(path = %source_path.display(), "No URL key in link-file");
        return None;
    };

    let Some(link) = parse_sharing_link(url) else {
        debug!(path = %source_path.display(), url, "URL is not a Drive sharing link");
        return None;
    };

    let Some(kind) = DocumentKind::from_segment(link.object_type) else {
        debug!(
            path = %source_path.display(),
            object_type = link.object_type,
            "Not a supported appfile"
        );
        return None;
    };

    let name = keys.get("Name").copied().unwrap_or_default();
    if name.trim().is_empty() {
        debug!(path = %source_path.display(), "No Name key in link-file");
        return None;
    }

    let file_name = output_file_stem(name);
    if file_name != name {
        debug!(
            path = %source_path.display(),
            name,
            file_name = %file_name,
            "Replaced path characters in Name"
        );
    }

    Some(DocumentReference::new(
        source_path,
        *url,
        &file_name,
        link.file_id,
        kind,
        profile,
    ))
}

/// Read and resolve the link-file at `path`.
///
/// Never fails: unreadable or irrelevant files yield `None`.
pub fn resolve_link_file(path: &Path, profile: ExportProfile) -> Option<DocumentReference> {
    match fs::read_to_string(path) {
        Ok(content) => resolve_link_content(path, &content, profile),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Unreadable link-file");
            None
        }
    }
}
