// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Result;
use flacquer_config::LibraryConfig;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Collect source files from the configured directory, non-recursively,
/// keeping only the configured extension. Sorted for a stable processing
/// order.
pub fn source_files(config: &LibraryConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(&config.source_dir).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(&config.source_extension))
            .unwrap_or(false);

        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_at(dir: &std::path::Path) -> LibraryConfig {
        LibraryConfig {
            source_dir: dir.to_path_buf(),
            ..LibraryConfig::default()
        }
    }

    #[test]
    fn keeps_only_matching_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("b.MP3"), b"").unwrap();
        std::fs::write(dir.path().join("c.flac"), b"").unwrap();
        std::fs::write(dir.path().join("noext"), b"").unwrap();

        let files = source_files(&library_at(dir.path())).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, vec!["a.mp3", "b.MP3"]);
    }

    #[test]
    fn does_not_descend_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("deep.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("top.mp3"), b"").unwrap();

        let files = source_files(&library_at(dir.path())).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("top.mp3"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let config = library_at(std::path::Path::new("/definitely/not/here"));
        assert!(source_files(&config).is_err());
    }
}
