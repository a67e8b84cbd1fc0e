// SPDX-License-Identifier: GPL-3.0-or-later

//! Core value objects for the match-and-acquire pipeline.
//!
//! Everything in this crate is plain data: a fingerprint read from a local
//! file, a candidate parsed from a catalog search response, and the small
//! enums the pipeline threads between its stages. No I/O happens here.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// Local fingerprint
// ============================================================================

/// Identity extracted from a local file's embedded metadata.
///
/// Both fields may be empty (untagged or unreadable file); an empty
/// fingerprint is still a valid, matchless search key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFingerprint {
    pub artist: String,
    pub title: String,
}

impl LocalFingerprint {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// `"artist - title"`, the form candidates are scored against.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }

    pub fn is_empty(&self) -> bool {
        self.artist.is_empty() && self.title.is_empty()
    }
}

impl std::fmt::Display for LocalFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

// ============================================================================
// Catalog candidate
// ============================================================================

/// One remote catalog entry considered as a potential match.
///
/// Constructed fresh from each search-result item and never mutated; the
/// derived accessors below are pure functions of these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Opaque catalog track identifier, used for the download request.
    pub id: u64,
    pub artist: String,
    pub title: String,
    pub bit_depth: u32,
    /// Sampling rate in kHz as reported by the catalog (e.g. 44.1, 96.0).
    pub sample_rate: f64,
    /// Raw copyright line; the release year is mined out of it.
    pub copyright_text: String,
}

impl Candidate {
    /// `"artist - title"`, the form scored against the local fingerprint.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }

    /// First 4-digit token found in the copyright line, or empty.
    pub fn release_year(&self) -> String {
        lazy_static! {
            static ref YEAR_REGEX: Regex = Regex::new(r"\b\d{4}\b").expect("valid year regex");
        }

        YEAR_REGEX
            .find(&self.copyright_text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }

    /// Deterministic, filesystem-safe destination filename.
    ///
    /// Identical candidates always produce identical strings, and the
    /// output never contains a path separator.
    pub fn target_filename(&self) -> String {
        let name = format!(
            "{} - {} ({}) [FLAC] [{}B - {}kHz].flac",
            self.artist,
            self.title,
            self.release_year(),
            self.bit_depth,
            format_sample_rate(self.sample_rate),
        );
        sanitize_filename(&name)
    }
}

/// Render integral rates without a decimal point (96.0 -> "96") while
/// keeping fractional ones intact (44.1 -> "44.1").
fn format_sample_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{rate:.0}")
    } else {
        format!("{rate}")
    }
}

fn sanitize_filename(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

// ============================================================================
// Pipeline decisions
// ============================================================================

/// Why a candidate was rejected, for the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Title contains a configured exclusion keyword.
    Excluded { keyword: String },
    /// Similarity ratio fell short of the configured threshold.
    BelowThreshold { score: u8, threshold: u8 },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Excluded { keyword } => {
                write!(f, "title contains excluded keyword \"{keyword}\"")
            }
            RejectReason::BelowThreshold { score, threshold } => {
                write!(f, "similarity {score} below threshold {threshold}")
            }
        }
    }
}

/// Outcome of scoring one candidate against the local fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDecision {
    AutoAccept,
    Reject(RejectReason),
    /// Scoring is unreliable (non-Latin script); ask the operator.
    NeedsConfirmation,
}

/// Resolved operator choice for a candidate that needed confirmation.
///
/// `Exit` ends the candidate loop for the current file only; `Quit`
/// terminates the whole batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Download,
    Skip,
    Exit,
    Quit,
}

/// Terminal outcome of one local file's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// A candidate was downloaded and verified.
    Acquired { bytes_written: u64 },
    /// The destination already held the candidate's target filename.
    AlreadyExists,
    /// No candidate survived filtering and scoring.
    NoMatch,
    /// The operator chose to stop working on this file.
    Aborted,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> Candidate {
        Candidate {
            id: 42,
            artist: "Artist".to_string(),
            title: "Song".to_string(),
            bit_depth: 24,
            sample_rate: 96.0,
            copyright_text: "2019 Label".to_string(),
        }
    }

    #[test]
    fn target_filename_matches_catalog_convention() {
        assert_eq!(
            candidate().target_filename(),
            "Artist - Song (2019) [FLAC] [24B - 96kHz].flac"
        );
    }

    #[test]
    fn target_filename_is_deterministic() {
        let a = candidate();
        let b = a.clone();
        assert_eq!(a.target_filename(), b.target_filename());
        assert_eq!(a.target_filename(), a.target_filename());
    }

    #[test]
    fn target_filename_never_contains_path_separators() {
        let mut tricky = candidate();
        tricky.artist = "AC/DC".to_string();
        tricky.title = "Back\\In Black".to_string();

        let name = tricky.target_filename();
        assert!(!name.contains('/'), "got {name}");
        assert!(!name.contains('\\'), "got {name}");
    }

    #[test]
    fn fractional_sample_rate_keeps_fraction() {
        let mut cd = candidate();
        cd.bit_depth = 16;
        cd.sample_rate = 44.1;
        cd.copyright_text = "(C) 2001 Label".to_string();
        assert_eq!(
            cd.target_filename(),
            "Artist - Song (2001) [FLAC] [16B - 44.1kHz].flac"
        );
    }

    #[test]
    fn release_year_takes_first_four_digit_token() {
        let mut c = candidate();
        c.copyright_text = "released 1997, remastered 2017".to_string();
        assert_eq!(c.release_year(), "1997");
    }

    #[test]
    fn release_year_empty_when_absent() {
        let mut c = candidate();
        c.copyright_text = "no year here".to_string();
        assert_eq!(c.release_year(), "");
        assert_eq!(
            c.target_filename(),
            "Artist - Song () [FLAC] [24B - 96kHz].flac"
        );
    }

    #[test]
    fn release_year_ignores_longer_digit_runs() {
        let mut c = candidate();
        c.copyright_text = "catalog 123456, (P) 2003".to_string();
        assert_eq!(c.release_year(), "2003");
    }

    #[test]
    fn fingerprint_display_name() {
        let fp = LocalFingerprint::new("Artist", "Song");
        assert_eq!(fp.display_name(), "Artist - Song");
        assert!(!fp.is_empty());
        assert!(LocalFingerprint::default().is_empty());
    }
}
