use std::fs;
use std::path::Path;

use fert_core::errors::{ErrorInfo, FertError};
use fert_core::TokenRecord;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::paginate::{PageCursor, TokenPages};
use crate::progress::ProgressSource;

/// Offline capture of both upstream reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Global progress counter.
    #[serde(alias = "bpf")]
    pub progress: u64,
    /// Token records in any order.
    pub tokens: Vec<TokenRecord>,
}

impl Snapshot {
    /// Parses a snapshot from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, FertError> {
        serde_json::from_slice(bytes).map_err(|err| {
            FertError::Serde(ErrorInfo::new("fert_source.snapshot_decode", err.to_string()))
        })
    }

    /// Reads and parses a snapshot file.
    pub fn load(path: &Path) -> Result<Self, FertError> {
        let bytes = fs::read(path).map_err(|err| {
            FertError::Io(
                ErrorInfo::new("fert_source.snapshot_read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let snapshot = Self::from_json_slice(&bytes)?;
        info!(
            path = %path.display(),
            tokens = snapshot.tokens.len(),
            progress = snapshot.progress,
            "loaded snapshot"
        );
        Ok(snapshot)
    }
}

/// Serves pages and progress from a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    progress: u64,
    tokens: Vec<TokenRecord>,
}

impl SnapshotSource {
    /// Orders the snapshot's tokens by `(season, id)` for paging.
    pub fn new(snapshot: Snapshot) -> Self {
        let mut tokens = snapshot.tokens;
        tokens.sort_by_key(|token| (token.season, token.id));
        Self {
            progress: snapshot.progress,
            tokens,
        }
    }
}

impl TokenPages for SnapshotSource {
    fn fetch_page(&self, cursor: &PageCursor, first: usize) -> Result<Vec<TokenRecord>, FertError> {
        Ok(self
            .tokens
            .iter()
            .filter(|token| cursor.admits(token))
            .take(first)
            .cloned()
            .collect())
    }
}

impl ProgressSource for SnapshotSource {
    fn global_progress(&self) -> Result<u64, FertError> {
        Ok(self.progress)
    }
}
