// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::{Path, PathBuf};

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// What happens to the local file after a terminal `Acquired` or
/// `AlreadyExists` outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessedMode {
    /// Swap the extension for `processed_extension`.
    Rename,
    /// Move the file into `done_dir` under the source directory.
    Move,
    /// Leave the file untouched.
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory scanned (non-recursively) for source files.
    pub source_dir: PathBuf,
    /// Extension of source files, without the dot.
    pub source_extension: String,
    /// Directory downloads are written into.
    pub destination_dir: PathBuf,
    pub processed_mode: ProcessedMode,
    /// Extension given to processed source files when `processed_mode = rename`.
    pub processed_extension: String,
    /// Subdirectory processed source files move into when `processed_mode = move`.
    pub done_dir: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            source_extension: "mp3".to_string(),
            destination_dir: PathBuf::from("./flac"),
            processed_mode: ProcessedMode::Rename,
            processed_extension: "mp3f".to_string(),
            done_dir: "done".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub search_base_url: String,
    pub download_base_url: String,
    pub timeout_secs: u64,
    /// Minimum pause between search requests.
    pub min_search_interval_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            search_base_url: "https://slavart.gamesdrive.net/api/search".to_string(),
            download_base_url: "https://slavart-api.gamesdrive.net/api/download/track".to_string(),
            timeout_secs: 30,
            min_search_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Token-set similarity (0-100) at or above which a candidate is
    /// accepted without confirmation.
    pub similarity_threshold: u8,
    /// Truncate tag fields at the first noise keyword before searching.
    pub trim_noise: bool,
    /// Scanned in order; the first keyword found anywhere in the field wins.
    pub noise_keywords: Vec<String>,
    /// Candidates whose title contains any of these are rejected outright.
    pub exclusion_keywords: Vec<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 90,
            trim_noise: true,
            noise_keywords: vec![
                "feat".to_string(),
                "(".to_string(),
                ",".to_string(),
                "&".to_string(),
            ],
            exclusion_keywords: vec![
                "Instrumental".to_string(),
                "Karaoke".to_string(),
                "Originally Performed".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub library: LibraryConfig,
    pub catalog: CatalogConfig,
    pub matching: MatchingConfig,
    pub telemetry: TelemetryConfig,
}

/// Load configuration from defaults, optional TOML file, and environment overrides (prefix: FLACQUER_).
pub fn load(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("FLACQUER_").split("__"));

    let config: AppConfig = figment.extract()?;
    info!(target: "config", "configuration loaded");
    Ok(config)
}
