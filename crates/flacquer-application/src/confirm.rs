// SPDX-License-Identifier: GPL-3.0-or-later

//! Operator decision port for ambiguous matches.

use async_trait::async_trait;
use flacquer_domain::{Candidate, UserAction};

/// Obtains an explicit accept/skip/stop/terminate decision for a candidate
/// the scorer would not auto-accept.
///
/// Implementations block until a decision is available: the interactive
/// prompt re-asks indefinitely on unrecognized input, and there is no
/// timeout; ambiguous cases are expected to be rare and to have an
/// operator present.
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    async fn resolve(&self, candidate: &Candidate) -> UserAction;
}
