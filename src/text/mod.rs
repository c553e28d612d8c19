// Document text retrieval.
//
// A text document carries its content either inline (`text.@value`) or by
// reference (`location`). Locations are `file://` URIs, plain paths or
// http(s) URLs. The TextSource trait keeps the fetching swappable so the
// annotator can be exercised without touching the filesystem or network.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::mmif::Annotation;

/// Fetches the text behind a document location.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<String>;
}

/// Reads locations from the local filesystem or over HTTP.
pub struct LocationReader {
    client: reqwest::Client,
}

impl LocationReader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("topic-annotator/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    async fn fetch_http(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch document text from {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Fetching {url} returned {}", response.status());
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read document text from {url}"))
    }
}

#[async_trait]
impl TextSource for LocationReader {
    async fn fetch(&self, location: &str) -> Result<String> {
        debug!(location, "Reading document text");

        if location.starts_with("http://") || location.starts_with("https://") {
            return self.fetch_http(location).await;
        }

        let path = local_path(location)?;
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read document text from {}", path.display()))
    }
}

/// Resolve a `file://` URI or plain path to a filesystem path.
pub fn local_path(location: &str) -> Result<PathBuf> {
    if location.starts_with("file:") {
        let url = Url::parse(location).with_context(|| format!("Invalid location {location:?}"))?;
        return url
            .to_file_path()
            .map_err(|_| anyhow::anyhow!("Location {location:?} is not a local file path"));
    }
    if location.contains("://") {
        anyhow::bail!("Unsupported location scheme in {location:?}");
    }
    Ok(PathBuf::from(location))
}

/// Text of a document: fetched from its location when it has one, otherwise
/// the inline value.
pub async fn read_text(doc: &Annotation, source: &dyn TextSource) -> Result<String> {
    if let Some(location) = doc.location() {
        return source.fetch(location).await;
    }
    match doc.text_value() {
        Some(text) => Ok(text.to_string()),
        None => anyhow::bail!(
            "Document {:?} has neither a location nor an inline text value",
            doc.id()
        ),
    }
}
