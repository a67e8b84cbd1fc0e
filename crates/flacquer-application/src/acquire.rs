// SPDX-License-Identifier: GPL-3.0-or-later

//! Verified streaming download of an accepted candidate.

use flacquer_catalog::{CatalogClient, CatalogError};
use flacquer_domain::Candidate;
use futures_util::StreamExt;
use std::path::Path;
use thiserror::Error;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

/// Errors that can occur while retrieving a candidate.
///
/// A partial output file from a failed attempt is not cleaned up; orphans
/// in the destination directory must be tolerated.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("catalog download failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("download stream interrupted: {0}")]
    Transfer(#[source] reqwest::Error),

    #[error("short download: expected {expected} bytes, wrote {actual}")]
    Truncated { expected: u64, actual: u64 },

    #[error("cannot write destination file: {0}")]
    Io(#[from] std::io::Error),
}

/// Incremental transfer feedback. Reporting is for the operator only and
/// never feeds back into control decisions.
pub trait DownloadProgress: Send + Sync {
    fn begin(&self, filename: &str, total_bytes: u64);
    fn advance(&self, bytes: u64);
    fn finish(&self);
}

/// Progress sink that reports nowhere.
pub struct NullProgress;

impl DownloadProgress for NullProgress {
    fn begin(&self, _filename: &str, _total_bytes: u64) {}
    fn advance(&self, _bytes: u64) {}
    fn finish(&self) {}
}

/// Download `candidate` into `destination_dir/{target_filename}`.
///
/// The stream is copied to disk chunk by chunk and verified against the
/// declared `Content-Length`; fewer bytes than declared is an error even
/// when the stream ends cleanly.
pub async fn acquire(
    catalog: &CatalogClient,
    candidate: &Candidate,
    destination_dir: &Path,
    progress: &dyn DownloadProgress,
) -> Result<u64, AcquireError> {
    let download = catalog.download(candidate.id).await?;
    let expected = download.declared_length();

    let filename = candidate.target_filename();
    let path = destination_dir.join(&filename);
    debug!(target: "acquire", path = %path.display(), expected, "starting download");

    let file = tokio::fs::File::create(&path).await?;
    let mut writer = BufWriter::new(file);
    let mut written: u64 = 0;

    progress.begin(&filename, expected);

    let mut stream = download.into_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(AcquireError::Transfer)?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
        progress.advance(chunk.len() as u64);
    }
    writer.flush().await?;
    progress.finish();

    if written != expected {
        return Err(AcquireError::Truncated {
            expected,
            actual: written,
        });
    }

    debug!(target: "acquire", path = %path.display(), written, "download complete");
    Ok(written)
}
