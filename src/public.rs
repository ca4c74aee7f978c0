//! Public download of Drive files without authentication.
//!
//! Drive serves small public files straight from `uc?id=...`. Large files get
//! an HTML "can't scan for viruses" page carrying a confirmation form, which
//! is followed once. Any other HTML answer means the link is not public.

use std::path::Path;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::error::{DriveError, Result};
use crate::output::stream_output;
use crate::retrieval::{DownloadSource, Downloader};

/// Public Drive host, also used in the browser URL shown on refusal.
const DRIVE_BASE: &str = "https://drive.google.com";

static DOWNLOAD_FORM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<form[^>]*id="download-form"[^>]*action="([^"]+)"[^>]*>(.*?)</form>"#)
        .expect("Invalid download form regex")
});

static HIDDEN_INPUT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<input[^>]*type="hidden"[^>]*name="([^"]+)"[^>]*value="([^"]*)""#)
        .expect("Invalid hidden input regex")
});

static CONFIRM_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="(/uc\?export=download[^"]*confirm=[^"]+)""#)
        .expect("Invalid confirm link regex")
});

/// Follow-up request extracted from a confirmation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
}

/// Find the confirmation request in a Drive interstitial page.
pub fn parse_confirm_page(page: &str, base_url: &str) -> Option<ConfirmRequest> {
    if let Some(captures) = DOWNLOAD_FORM_REGEX.captures(page) {
        let action = captures.get(1)?.as_str();
        let body = captures.get(2)?.as_str();
        let params = HIDDEN_INPUT_REGEX
            .captures_iter(body)
            .filter_map(|input| {
                Some((input.get(1)?.as_str().to_string(), input.get(2)?.as_str().to_string()))
            })
            .collect();
        return Some(ConfirmRequest {
            url: absolute(action, base_url),
            params,
        });
    }

    let captures = CONFIRM_LINK_REGEX.captures(page)?;
    let href = captures.get(1)?.as_str().replace("&amp;", "&");
    Some(ConfirmRequest {
        url: absolute(&href, base_url),
        params: Vec::new(),
    })
}

fn absolute(url: &str, base_url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{}{}", base_url, url)
    }
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"))
}

/// Downloads publicly shared Drive files by id or URL.
pub struct PublicDownloader {
    http: Client,
    base_url: String,
}

impl PublicDownloader {
    pub fn new() -> Self {
        Self::with_base_url(DRIVE_BASE)
    }

    /// Create a downloader against a different host (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The URL a user could open in a browser for `source`.
    fn browser_url(source: &DownloadSource) -> String {
        match source {
            DownloadSource::Id(id) => format!("{}/uc?id={}", DRIVE_BASE, id),
            DownloadSource::Url(url) => url.clone(),
        }
    }

    async fn fetch(&self, source: &DownloadSource) -> Result<Response> {
        let request = match source {
            DownloadSource::Id(id) => self
                .http
                .get(format!("{}/uc", self.base_url))
                .query(&[("id", id.as_str()), ("export", "download")]),
            DownloadSource::Url(url) => self.http.get(url),
        };
        Ok(request.send().await?)
    }

    fn check_status(response: &Response, browser_url: &str) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        match status {
            StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::NOT_FOUND
            | StatusCode::TOO_MANY_REQUESTS => Err(DriveError::PublicLinkUnavailable {
                url: browser_url.to_string(),
            }),
            _ => Err(DriveError::UnexpectedResponse(format!(
                "Status {} from {}",
                status,
                response.url()
            ))),
        }
    }
}

impl Default for PublicDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Downloader for PublicDownloader {
    async fn download(&self, source: &DownloadSource, output: &Path) -> Result<u64> {
        let browser_url = Self::browser_url(source);
        let response = self.fetch(source).await?;
        Self::check_status(&response, &browser_url)?;

        if !is_html(&response) {
            return stream_output(output, response).await;
        }

        let page = response.text().await?;
        let Some(confirm) = parse_confirm_page(&page, &self.base_url) else {
            return Err(DriveError::PublicLinkUnavailable { url: browser_url });
        };

        debug!(url = %confirm.url, "Following download confirmation");
        let response = self
            .http
            .get(&confirm.url)
            .query(&confirm.params)
            .send()
            .await?;
        Self::check_status(&response, &browser_url)?;

        if is_html(&response) {
            return Err(DriveError::PublicLinkUnavailable { url: browser_url });
        }
        stream_output(output, response).await
    }
}
