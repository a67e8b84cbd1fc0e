// SPDX-License-Identifier: GPL-3.0-or-later

//! Match resolution and acquisition services.
//!
//! This crate owns the decision logic of the pipeline: scoring candidates
//! against a local fingerprint, resolving ambiguous matches through an
//! operator port, performing the verified streaming download, and driving
//! the per-file state machine.

pub mod acquire;
pub mod classify;
pub mod confirm;
pub mod library;
pub mod pipeline;
pub mod similarity;

pub use acquire::{acquire, AcquireError, DownloadProgress, NullProgress};
pub use classify::{classify, has_cyrillic};
pub use confirm::ConfirmationPort;
pub use library::mark_processed;
pub use pipeline::{EmbeddedTagSource, MatchPipeline, PipelineError, TagSource};
pub use similarity::token_set_ratio;
