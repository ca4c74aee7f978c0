//! URL matching for Google Drive sharing links.

use regex::Regex;
use std::sync::LazyLock;

/// Sharing link shape: `.../<object type>/d/<file id>/...`.
static SHARING_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"google\.com/([^/]+)/d/([^/]+)/").expect("Invalid sharing link regex")
});

/// A Drive URL embedded in free text, such as an error message.
static EMBEDDED_DRIVE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://drive\.google\.com[^\s]+").expect("Invalid embedded URL regex")
});

/// Segments of a matched sharing link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharingLink<'a> {
    /// Drive's literal object type segment, e.g. `document` or `spreadsheets`.
    pub object_type: &'a str,
    pub file_id: &'a str,
}

/// Split a Drive sharing link into its object type and file id.
///
/// # Examples
///
/// ```
/// use drive_links::url_parser::parse_sharing_link;
///
/// let link = parse_sharing_link("https://docs.google.com/document/d/1abc/edit").unwrap();
/// assert_eq!(link.object_type, "document");
/// assert_eq!(link.file_id, "1abc");
/// ```
pub fn parse_sharing_link(url: &str) -> Option<SharingLink<'_>> {
    let captures = SHARING_LINK_REGEX.captures(url.trim())?;
    Some(SharingLink {
        object_type: captures.get(1)?.as_str(),
        file_id: captures.get(2)?.as_str(),
    })
}

/// Find the first Drive URL embedded in `text`.
pub fn find_drive_url(text: &str) -> Option<&str> {
    EMBEDDED_DRIVE_URL_REGEX.find(text).map(|m| m.as_str())
}
