// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{CatalogError, Result};
use crate::models::SearchResponse;
use crate::pacer::RequestPacer;
use bytes::Bytes;
use flacquer_domain::{Candidate, LocalFingerprint};
use futures_util::Stream;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, trace, warn};
use url::Url;

const SEARCH_BASE: &str = "https://slavart.gamesdrive.net/api/search";
const DOWNLOAD_BASE: &str = "https://slavart-api.gamesdrive.net/api/download/track";
const USER_AGENT: &str = concat!("flacquer/", env!("CARGO_PKG_VERSION"));

/// Catalog client for track search and streaming download.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    search_base_url: String,
    download_base_url: String,
    pacer: RequestPacer,
}

impl CatalogClient {
    /// Create a new client with default settings.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a client builder for custom configuration.
    pub fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::default()
    }

    /// Search the catalog for candidates matching a local fingerprint.
    ///
    /// The query is the space-joined `"artist title"` pair. Candidates come
    /// back in server order, which is significant: it is the iteration
    /// order for matching. Transport errors, non-success statuses, and
    /// malformed bodies all degrade to an empty list; a failed lookup is
    /// indistinguishable from "no candidates found" and must not stop the
    /// batch. Individual malformed entries are skipped, not fatal.
    ///
    /// # Example
    /// ```no_run
    /// # use flacquer_catalog::CatalogClient;
    /// # use flacquer_domain::LocalFingerprint;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = CatalogClient::new()?;
    /// let fingerprint = LocalFingerprint::new("Daft Punk", "One More Time");
    /// let candidates = client.search(&fingerprint).await;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, fingerprint: &LocalFingerprint) -> Vec<Candidate> {
        let query = format!("{} {}", fingerprint.artist, fingerprint.title)
            .trim()
            .to_string();

        let mut url = match Url::parse(&self.search_base_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(target: "catalog", error = %e, "invalid search base URL");
                return Vec::new();
            }
        };
        url.query_pairs_mut().append_pair("q", &query);

        self.pacer.pause().await;

        match self.fetch_search(url.as_str()).await {
            Ok(response) => {
                let mut candidates = Vec::with_capacity(response.tracks.items.len());
                for item in response.tracks.items {
                    match item.into_candidate() {
                        Ok(candidate) => candidates.push(candidate),
                        Err(field) => {
                            warn!(
                                target: "catalog",
                                missing = field,
                                "skipping malformed search result entry"
                            );
                        }
                    }
                }
                debug!(target: "catalog", %query, count = candidates.len(), "search complete");
                candidates
            }
            Err(e) => {
                warn!(target: "catalog", %query, error = %e, "search failed, treating as no candidates");
                Vec::new()
            }
        }
    }

    /// Open a streaming download for the given track id.
    ///
    /// Unlike [`search`](Self::search), failures here propagate: a download
    /// failure for an accepted candidate is actionable, not silently
    /// skippable. A response without a `Content-Length` header is refused,
    /// since the declared length is what lets the caller verify the transfer.
    pub async fn download(&self, track_id: u64) -> Result<CatalogDownload> {
        let mut url = Url::parse(&self.download_base_url)
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("id", &track_id.to_string());

        debug!(target: "catalog", track_id, "requesting download");

        let response = self
            .client
            .get(url.as_str())
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        debug!(target: "catalog", track_id, status = %status, "download response");

        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let declared_length = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .ok_or(CatalogError::MissingContentLength)?;

        Ok(CatalogDownload {
            declared_length,
            response,
        })
    }

    async fn fetch_search(&self, url: &str) -> Result<SearchResponse> {
        trace!(target: "catalog", "GET {}", url);

        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        trace!(target: "catalog", "response body: {}", body);

        serde_json::from_str(&body)
            .map_err(|e| CatalogError::InvalidResponse(format!("failed to parse response: {e}")))
    }
}

/// An open streaming download with its declared total length.
#[derive(Debug)]
pub struct CatalogDownload {
    declared_length: u64,
    response: reqwest::Response,
}

impl CatalogDownload {
    /// Total length declared by the `Content-Length` header.
    pub fn declared_length(&self) -> u64 {
        self.declared_length
    }

    /// Consume the download into a chunk stream. I/O stays incremental;
    /// the payload is never buffered whole.
    pub fn into_stream(self) -> impl Stream<Item = reqwest::Result<Bytes>> {
        self.response.bytes_stream()
    }
}

/// Builder for configuring a catalog client.
#[derive(Debug)]
pub struct CatalogClientBuilder {
    search_base_url: String,
    download_base_url: String,
    timeout: Duration,
    min_search_interval: Duration,
}

impl Default for CatalogClientBuilder {
    fn default() -> Self {
        Self {
            search_base_url: SEARCH_BASE.to_string(),
            download_base_url: DOWNLOAD_BASE.to_string(),
            timeout: Duration::from_secs(30),
            min_search_interval: Duration::from_secs(1),
        }
    }
}

impl CatalogClientBuilder {
    /// Set a custom search base URL (useful for testing with mock servers).
    pub fn search_base_url(mut self, url: impl Into<String>) -> Self {
        self.search_base_url = url.into();
        self
    }

    /// Set a custom download base URL (useful for testing).
    pub fn download_base_url(mut self, url: impl Into<String>) -> Self {
        self.download_base_url = url.into();
        self
    }

    /// Set the connect and per-read timeout. A whole-request deadline
    /// would cut off large downloads that are still making progress.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the minimum pause between search requests.
    pub fn min_search_interval(mut self, interval: Duration) -> Self {
        self.min_search_interval = interval;
        self
    }

    /// Build the catalog client.
    pub fn build(self) -> Result<CatalogClient> {
        let client = Client::builder()
            .connect_timeout(self.timeout)
            .read_timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(CatalogClient {
            client,
            search_base_url: self.search_base_url,
            download_base_url: self.download_base_url,
            pacer: RequestPacer::new(self.min_search_interval),
        })
    }
}
