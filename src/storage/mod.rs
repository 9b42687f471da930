// src/storage/mod.rs

//! Durable persistence for the seen-set.
//!
//! One JSON document per store path, read fully at startup and written fully
//! (write-temp-then-rename) after a successful scan cycle. The store is not
//! designed for concurrent writers on the same path.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::pipeline::SeenSet;

/// File-backed seen-set store.
#[derive(Debug, Clone)]
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the seen-set, never failing the caller.
    ///
    /// A missing file is a normal first run; a malformed file is logged and
    /// treated as empty, which at worst re-notifies already-seen animals.
    pub async fn load(&self) -> SeenSet {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return SeenSet::new(),
            Err(e) => {
                log::warn!(
                    "Could not read seen store {}: {}. Starting with an empty set.",
                    self.path.display(),
                    e
                );
                return SeenSet::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(set) => set,
            Err(e) => {
                log::warn!(
                    "Seen store {} is malformed: {}. Starting with an empty set.",
                    self.path.display(),
                    e
                );
                SeenSet::new()
            }
        }
    }

    /// Persist the seen-set atomically (write to temp, then rename).
    pub async fn save(&self, seen: &SeenSet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(seen)?;
        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
