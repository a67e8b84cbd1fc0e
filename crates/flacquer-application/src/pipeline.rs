// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-file pipeline: fingerprint, search, classify, confirm, acquire.
//!
//! One local file is driven to exactly one terminal outcome: `Acquired`,
//! `AlreadyExists`, `NoMatch`, or `Aborted`. Candidates are tried in
//! catalog order; a failed acquisition moves on to the next candidate
//! instead of abandoning the file. The only condition allowed to unwind
//! past the file boundary is the operator quitting the whole batch.

use crate::acquire::{acquire, DownloadProgress};
use crate::classify::classify;
use crate::confirm::ConfirmationPort;
use crate::library::mark_processed;
use flacquer_catalog::CatalogClient;
use flacquer_config::AppConfig;
use flacquer_domain::{
    Candidate, FileOutcome, LocalFingerprint, MatchDecision, RejectReason, UserAction,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The operator ended the whole batch run. Not a fault, but it must
    /// unwind past the per-file boundary.
    #[error("batch run terminated by operator")]
    Quit,

    #[error("failed to mark source file processed: {0}")]
    Transition(#[from] std::io::Error),
}

/// Local metadata collaborator: reads the identity fingerprint for a file.
pub trait TagSource: Send + Sync {
    fn read_fingerprint(&self, path: &Path, noise_keywords: Option<&[String]>)
        -> LocalFingerprint;
}

/// [`TagSource`] backed by embedded audio tags.
pub struct EmbeddedTagSource;

impl TagSource for EmbeddedTagSource {
    fn read_fingerprint(
        &self,
        path: &Path,
        noise_keywords: Option<&[String]>,
    ) -> LocalFingerprint {
        flacquer_tags::read_fingerprint(path, noise_keywords)
    }
}

/// Drives one local file through match resolution and acquisition.
pub struct MatchPipeline {
    catalog: CatalogClient,
    config: AppConfig,
    tags: Arc<dyn TagSource>,
    confirm: Arc<dyn ConfirmationPort>,
    progress: Arc<dyn DownloadProgress>,
}

impl MatchPipeline {
    pub fn new(
        catalog: CatalogClient,
        config: AppConfig,
        tags: Arc<dyn TagSource>,
        confirm: Arc<dyn ConfirmationPort>,
        progress: Arc<dyn DownloadProgress>,
    ) -> Self {
        Self {
            catalog,
            config,
            tags,
            confirm,
            progress,
        }
    }

    /// Resolve one local file to a terminal outcome.
    pub async fn run_file(&self, source: &Path) -> Result<FileOutcome, PipelineError> {
        let matching = &self.config.matching;
        let noise = matching
            .trim_noise
            .then(|| matching.noise_keywords.as_slice());

        let fingerprint = self.tags.read_fingerprint(source, noise);
        info!(
            target: "pipeline",
            source = %source.display(),
            fingerprint = %fingerprint,
            "resolving"
        );

        let candidates = self.catalog.search(&fingerprint).await;
        if candidates.is_empty() {
            info!(target: "pipeline", fingerprint = %fingerprint, "no candidates found");
            return Ok(FileOutcome::NoMatch);
        }

        for candidate in candidates {
            let filename = candidate.target_filename();
            info!(target: "pipeline", found = %filename);

            let decision = classify(&fingerprint, &candidate, matching);

            // Excluded candidates never trigger the existence short-circuit.
            if let MatchDecision::Reject(reason @ RejectReason::Excluded { .. }) = &decision {
                info!(
                    target: "pipeline",
                    candidate = %candidate.display_name(),
                    %reason,
                    "rejected"
                );
                continue;
            }

            if self.config.library.destination_dir.join(&filename).exists() {
                info!(target: "pipeline", %filename, "destination file already exists");
                self.mark_source_processed(source)?;
                return Ok(FileOutcome::AlreadyExists);
            }

            match decision {
                MatchDecision::Reject(reason) => {
                    info!(
                        target: "pipeline",
                        candidate = %candidate.display_name(),
                        %reason,
                        "rejected"
                    );
                }
                MatchDecision::AutoAccept => {
                    if let Some(bytes_written) = self.try_acquire(&candidate).await {
                        self.mark_source_processed(source)?;
                        return Ok(FileOutcome::Acquired { bytes_written });
                    }
                }
                MatchDecision::NeedsConfirmation => {
                    match self.confirm.resolve(&candidate).await {
                        UserAction::Download => {
                            if let Some(bytes_written) = self.try_acquire(&candidate).await {
                                self.mark_source_processed(source)?;
                                return Ok(FileOutcome::Acquired { bytes_written });
                            }
                        }
                        UserAction::Skip => {
                            info!(
                                target: "pipeline",
                                candidate = %candidate.display_name(),
                                "skipped by operator"
                            );
                        }
                        UserAction::Exit => {
                            info!(
                                target: "pipeline",
                                source = %source.display(),
                                "file abandoned by operator"
                            );
                            return Ok(FileOutcome::Aborted);
                        }
                        UserAction::Quit => return Err(PipelineError::Quit),
                    }
                }
            }
        }

        info!(target: "pipeline", fingerprint = %fingerprint, "candidate list exhausted");
        Ok(FileOutcome::NoMatch)
    }

    /// One download attempt. Failures are logged and absorbed so the
    /// caller can move on to the next candidate.
    async fn try_acquire(&self, candidate: &Candidate) -> Option<u64> {
        let destination = &self.config.library.destination_dir;
        match acquire(&self.catalog, candidate, destination, self.progress.as_ref()).await {
            Ok(bytes) => {
                info!(
                    target: "pipeline",
                    candidate = %candidate.display_name(),
                    bytes,
                    "candidate acquired"
                );
                Some(bytes)
            }
            Err(e) => {
                warn!(
                    target: "pipeline",
                    candidate = %candidate.display_name(),
                    error = %e,
                    "acquisition failed, trying next candidate"
                );
                None
            }
        }
    }

    fn mark_source_processed(&self, source: &Path) -> Result<(), PipelineError> {
        mark_processed(source, &self.config.library)?;
        Ok(())
    }
}
