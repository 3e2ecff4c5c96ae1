// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Share targets for rendered cards.

use std::fs;
use std::path::{Path, PathBuf};

use crate::services::card::CardArtifact;
use crate::time_utils::now_millis;

/// Errors from a share target.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("Sharing is not supported on this platform")]
    Unsupported,

    #[error("Failed to write shared card: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can receive a rendered card.
pub trait ShareTarget: Send + Sync {
    fn share(&self, artifact: &CardArtifact, title: &str) -> Result<(), ShareError>;
}

/// Drops shared cards into a directory as `<millis>-<filename>`, with a
/// sidecar `.txt` carrying the share title.
#[derive(Debug, Clone)]
pub struct DirectoryShare {
    dir: PathBuf,
}

impl DirectoryShare {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, ShareError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl ShareTarget for DirectoryShare {
    fn share(&self, artifact: &CardArtifact, title: &str) -> Result<(), ShareError> {
        let stem = format!("{}-{}", now_millis(), artifact.filename);
        let path = self.dir.join(&stem);
        fs::write(&path, &artifact.bytes)?;
        fs::write(self.dir.join(format!("{}.txt", stem)), title)?;
        tracing::info!(path = %path.display(), "Card shared to directory");
        Ok(())
    }
}
