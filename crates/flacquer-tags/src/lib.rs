// SPDX-License-Identifier: GPL-3.0-or-later

//! Fingerprint extraction from embedded audio tags.
//!
//! Reads artist/title with `lofty` and normalizes them into a
//! [`LocalFingerprint`]. A file that is missing, unreadable, or untagged
//! yields an *empty* fingerprint with a logged warning. Absence of tags is
//! a valid, matchless state, and batch processing must keep going.

use std::path::Path;

use flacquer_domain::LocalFingerprint;
use lofty::prelude::{Accessor, TaggedFileExt};
use lofty::read_from_path;
use lofty::tag::Tag;
use tracing::{debug, warn};

/// Read the identity fingerprint for one local file.
///
/// When `noise_keywords` is provided, each field is independently truncated
/// at the first listed keyword that occurs anywhere in the string; keywords
/// are scanned in list order, so an earlier-listed keyword wins even when a
/// later-listed one appears earlier in the text.
pub fn read_fingerprint(path: &Path, noise_keywords: Option<&[String]>) -> LocalFingerprint {
    let (artist, title) = match read_artist_title(path) {
        Ok(pair) => pair,
        Err(message) => {
            warn!(target: "tags", path = %path.display(), %message, "could not read tags");
            return LocalFingerprint::default();
        }
    };

    debug!(target: "tags", path = %path.display(), %artist, %title, "extracted tags");

    match noise_keywords {
        Some(keywords) => {
            let fingerprint = LocalFingerprint::new(
                truncate_at_noise(&artist, keywords),
                truncate_at_noise(&title, keywords),
            );
            debug!(target: "tags", cleaned = %fingerprint, "noise keywords applied");
            fingerprint
        }
        None => LocalFingerprint::new(artist, title),
    }
}

fn read_artist_title(path: &Path) -> Result<(String, String), String> {
    let tagged_file = read_from_path(path).map_err(|e| e.to_string())?;
    let primary_tag = tagged_file.primary_tag();
    let tags = tagged_file.tags();

    let artist = first_non_empty_value(primary_tag, tags, |tag| {
        tag.artist().map(|value| value.into_owned())
    });
    let title = first_non_empty_value(primary_tag, tags, |tag| {
        tag.title().map(|value| value.into_owned())
    });

    Ok((artist, title))
}

fn first_non_empty_value<F>(primary_tag: Option<&Tag>, tags: &[Tag], mut extractor: F) -> String
where
    F: FnMut(&Tag) -> Option<String>,
{
    for tag in primary_tag.into_iter().chain(tags) {
        if let Some(value) = extractor(tag) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }

    String::new()
}

/// Truncate `value` at the first keyword from `keywords` (in list order)
/// that occurs anywhere in it.
pub fn truncate_at_noise(value: &str, keywords: &[String]) -> String {
    for keyword in keywords {
        if let Some(index) = value.find(keyword.as_str()) {
            return value[..index].trim_end().to_string();
        }
    }
    value.to_string()
}
