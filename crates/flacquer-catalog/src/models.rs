// SPDX-License-Identifier: GPL-3.0-or-later

use flacquer_domain::Candidate;
use serde::Deserialize;

/// Top-level search response. Only the nested `tracks.items` array is
/// consumed; everything else the catalog sends is ignored.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tracks: TrackBlock,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrackBlock {
    #[serde(default)]
    pub items: Vec<TrackItem>,
}

/// One raw search-result entry.
///
/// Every field is optional at the wire level; [`TrackItem::into_candidate`]
/// decides which ones a usable candidate actually requires.
#[derive(Debug, Deserialize)]
pub struct TrackItem {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub performer: Option<Performer>,
    pub maximum_bit_depth: Option<u32>,
    pub maximum_sampling_rate: Option<f64>,
    pub copyright: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Performer {
    pub name: Option<String>,
}

impl TrackItem {
    /// Convert a raw entry into a [`Candidate`], naming the first missing
    /// required field. A malformed entry is skipped by the caller rather
    /// than failing the whole result list.
    pub fn into_candidate(self) -> std::result::Result<Candidate, &'static str> {
        let id = self.id.ok_or("id")?;
        let title = self.title.ok_or("title")?;
        let artist = self
            .performer
            .and_then(|performer| performer.name)
            .ok_or("performer.name")?;
        let bit_depth = self.maximum_bit_depth.ok_or("maximum_bit_depth")?;
        let sample_rate = self.maximum_sampling_rate.ok_or("maximum_sampling_rate")?;

        Ok(Candidate {
            id,
            artist,
            title,
            bit_depth,
            sample_rate,
            copyright_text: self.copyright.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_item() -> serde_json::Value {
        serde_json::json!({
            "id": 42,
            "title": "Song",
            "performer": { "name": "Artist" },
            "maximum_bit_depth": 24,
            "maximum_sampling_rate": 96.0,
            "copyright": "2019 Label"
        })
    }

    #[test]
    fn converts_complete_item() {
        let item: TrackItem = serde_json::from_value(full_item()).unwrap();
        let candidate = item.into_candidate().unwrap();

        assert_eq!(candidate.id, 42);
        assert_eq!(candidate.artist, "Artist");
        assert_eq!(candidate.title, "Song");
        assert_eq!(candidate.bit_depth, 24);
        assert_eq!(candidate.sample_rate, 96.0);
        assert_eq!(candidate.copyright_text, "2019 Label");
    }

    #[test]
    fn missing_performer_names_the_field() {
        let mut value = full_item();
        value.as_object_mut().unwrap().remove("performer");

        let item: TrackItem = serde_json::from_value(value).unwrap();
        assert_eq!(item.into_candidate().unwrap_err(), "performer.name");
    }

    #[test]
    fn missing_copyright_defaults_to_empty() {
        let mut value = full_item();
        value.as_object_mut().unwrap().remove("copyright");

        let item: TrackItem = serde_json::from_value(value).unwrap();
        let candidate = item.into_candidate().unwrap();
        assert_eq!(candidate.copyright_text, "");
        assert_eq!(candidate.release_year(), "");
    }

    #[test]
    fn integral_sampling_rate_parses_from_integer_json() {
        let value = serde_json::json!({
            "id": 7,
            "title": "T",
            "performer": { "name": "A" },
            "maximum_bit_depth": 16,
            "maximum_sampling_rate": 44,
            "copyright": null
        });

        let item: TrackItem = serde_json::from_value(value).unwrap();
        let candidate = item.into_candidate().unwrap();
        assert_eq!(candidate.sample_rate, 44.0);
    }

    #[test]
    fn response_without_tracks_block_is_empty() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.tracks.items.is_empty());
    }
}
