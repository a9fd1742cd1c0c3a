//! Media library publication
//!
//! Moves a finished track into the media directory served under
//! `/media` and derives the public URL clients play it from.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Publishes finished tracks into the served media library
#[derive(Debug, Clone)]
pub struct MediaStore {
    media_dir: PathBuf,
    base_url: String,
}

impl MediaStore {
    pub fn new(media_dir: PathBuf, base_url: impl Into<String>) -> Self {
        Self {
            media_dir,
            base_url: base_url.into(),
        }
    }

    /// Publish a file into the media library, returning its public URL
    ///
    /// The stored name is taken from the source file name. An existing
    /// file with the same name is replaced.
    pub fn publish(&self, source: &Path) -> Result<String> {
        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .context("Source file has no usable name")?;

        std::fs::create_dir_all(&self.media_dir).with_context(|| {
            format!("Failed to create media directory: {}", self.media_dir.display())
        })?;

        let destination = self.media_dir.join(file_name);
        // Rename when source and media dir share a filesystem; copy otherwise
        if std::fs::rename(source, &destination).is_err() {
            std::fs::copy(source, &destination).with_context(|| {
                format!("Failed to copy track into media library: {}", destination.display())
            })?;
            let _ = std::fs::remove_file(source);
        }

        let url = self.public_url(file_name);
        tracing::info!(file = file_name, url = %url, "Track published to media library");

        Ok(url)
    }

    /// Public URL for a file already in the media library
    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}/media/{}", self.base_url.trim_end_matches('/'), file_name)
    }

    /// Directory served under /media
    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }
}
