// SPDX-License-Identifier: GPL-3.0-or-later

//! Local-file state transition after a terminal outcome.

use flacquer_config::{LibraryConfig, ProcessedMode};
use std::io;
use std::path::Path;
use tracing::info;

/// Mark a source file processed according to the configured policy:
/// swap its extension, move it into the done-subdirectory, or do nothing.
pub fn mark_processed(path: &Path, config: &LibraryConfig) -> io::Result<()> {
    match config.processed_mode {
        ProcessedMode::None => Ok(()),
        ProcessedMode::Rename => {
            let renamed = path.with_extension(&config.processed_extension);
            std::fs::rename(path, &renamed)?;
            info!(
                target: "library",
                from = %path.display(),
                to = %renamed.display(),
                "source file renamed"
            );
            Ok(())
        }
        ProcessedMode::Move => {
            let parent = path.parent().unwrap_or_else(|| Path::new("."));
            let done_dir = parent.join(&config.done_dir);
            std::fs::create_dir_all(&done_dir)?;

            let file_name = path.file_name().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "source path has no file name")
            })?;
            let target = done_dir.join(file_name);
            std::fs::rename(path, &target)?;
            info!(
                target: "library",
                from = %path.display(),
                to = %target.display(),
                "source file moved"
            );
            Ok(())
        }
    }
}
