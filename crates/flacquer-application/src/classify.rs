// SPDX-License-Identifier: GPL-3.0-or-later

//! Candidate filtering and scoring.
//!
//! Rules run in a fixed order: exclusion keywords first, then the script
//! heuristic, then numeric similarity. Script-mismatch is checked before
//! the ratio because transliterated strings produce unreliable scores;
//! those candidates go to the operator instead of being auto-accepted.

use crate::similarity::token_set_ratio;
use flacquer_config::MatchingConfig;
use flacquer_domain::{Candidate, LocalFingerprint, MatchDecision, RejectReason};
use tracing::debug;

/// True when the input contains any Cyrillic letter, the proxy used for
/// transliteration risk.
pub fn has_cyrillic(input: &str) -> bool {
    input.chars().any(|c| matches!(c, 'а'..='я' | 'А'..='Я'))
}

fn excluded_keyword<'a>(title: &str, keywords: &'a [String]) -> Option<&'a str> {
    keywords
        .iter()
        .find(|keyword| title.contains(keyword.as_str()))
        .map(String::as_str)
}

/// Score one candidate against the local fingerprint.
pub fn classify(
    fingerprint: &LocalFingerprint,
    candidate: &Candidate,
    config: &MatchingConfig,
) -> MatchDecision {
    if let Some(keyword) = excluded_keyword(&candidate.title, &config.exclusion_keywords) {
        return MatchDecision::Reject(RejectReason::Excluded {
            keyword: keyword.to_string(),
        });
    }

    let local = fingerprint.display_name();
    let remote = candidate.display_name();

    if has_cyrillic(&local) || has_cyrillic(&remote) {
        debug!(target: "classify", %local, %remote, "script heuristic triggered");
        return MatchDecision::NeedsConfirmation;
    }

    let score = token_set_ratio(&local, &remote);
    debug!(target: "classify", %local, %remote, score, "similarity computed");

    if score >= config.similarity_threshold {
        MatchDecision::AutoAccept
    } else {
        MatchDecision::Reject(RejectReason::BelowThreshold {
            score,
            threshold: config.similarity_threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MatchingConfig {
        MatchingConfig::default()
    }

    fn candidate(artist: &str, title: &str) -> Candidate {
        Candidate {
            id: 1,
            artist: artist.to_string(),
            title: title.to_string(),
            bit_depth: 24,
            sample_rate: 96.0,
            copyright_text: "2019 Label".to_string(),
        }
    }

    #[test]
    fn identical_names_auto_accept() {
        let fp = LocalFingerprint::new("Artist", "Song");
        let decision = classify(&fp, &candidate("Artist", "Song"), &config());
        assert_eq!(decision, MatchDecision::AutoAccept);
    }

    #[test]
    fn exclusion_keyword_rejects_despite_perfect_similarity() {
        let fp = LocalFingerprint::new("Artist", "Song (Instrumental)");
        let decision = classify(&fp, &candidate("Artist", "Song (Instrumental)"), &config());
        assert!(matches!(
            decision,
            MatchDecision::Reject(RejectReason::Excluded { ref keyword }) if keyword == "Instrumental"
        ));
    }

    #[test]
    fn exclusion_applies_to_candidate_title_only() {
        // The local file may carry noise; only the candidate's title is gated.
        let fp = LocalFingerprint::new("Artist", "Song");
        let decision = classify(&fp, &candidate("Artist", "Song (Karaoke)"), &config());
        assert!(matches!(
            decision,
            MatchDecision::Reject(RejectReason::Excluded { .. })
        ));
    }

    #[test]
    fn cyrillic_in_candidate_needs_confirmation() {
        let fp = LocalFingerprint::new("Artist", "Song");
        let decision = classify(&fp, &candidate("Исполнитель", "Song"), &config());
        assert_eq!(decision, MatchDecision::NeedsConfirmation);
    }

    #[test]
    fn cyrillic_in_fingerprint_needs_confirmation() {
        let fp = LocalFingerprint::new("Артист", "Песня");
        let decision = classify(&fp, &candidate("Artist", "Song"), &config());
        assert_eq!(decision, MatchDecision::NeedsConfirmation);
    }

    #[test]
    fn cyrillic_never_auto_accepts_even_when_identical() {
        let fp = LocalFingerprint::new("Кино", "Группа крови");
        let decision = classify(&fp, &candidate("Кино", "Группа крови"), &config());
        assert_eq!(decision, MatchDecision::NeedsConfirmation);
    }

    #[test]
    fn dissimilar_names_reject_with_score() {
        let fp = LocalFingerprint::new("Artist", "Song");
        let decision = classify(&fp, &candidate("Somebody", "Else Entirely"), &config());
        match decision {
            MatchDecision::Reject(RejectReason::BelowThreshold { score, threshold }) => {
                assert!(score < threshold);
                assert_eq!(threshold, 90);
            }
            other => panic!("expected below-threshold reject, got {other:?}"),
        }
    }

    #[test]
    fn has_cyrillic_detects_both_cases() {
        assert!(has_cyrillic("привет"));
        assert!(has_cyrillic("ПРИВЕТ"));
        assert!(has_cyrillic("mixed Иvan"));
        assert!(!has_cyrillic("plain latin"));
        assert!(!has_cyrillic(""));
    }
}
