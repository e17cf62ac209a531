use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fert_core::errors::{ErrorInfo, FertError};

/// Destination for artifact bytes. Every write fully replaces the target.
pub trait ArtifactSink {
    /// Writes `bytes` at `relative`, below the sink's root.
    fn write(&self, relative: &Path, bytes: &[u8]) -> Result<(), FertError>;
}

fn io_error(code: &str, err: impl ToString, path: &Path) -> FertError {
    FertError::Io(ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()))
}

/// Writes artifacts below a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSink {
    root: PathBuf,
}

impl DirSink {
    /// Creates `root` if needed.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, FertError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| io_error("fert_web.output_dir", err, &root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactSink for DirSink {
    fn write(&self, relative: &Path, bytes: &[u8]) -> Result<(), FertError> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| io_error("fert_web.output_dir", err, parent))?;
        }
        fs::write(&path, bytes).map_err(|err| io_error("fert_web.write", err, &path))
    }
}

/// Keeps artifacts in memory; used for dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, relative: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock().get(relative.as_ref()).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock().keys().cloned().collect()
    }

    pub fn total_bytes(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, Vec<u8>>> {
        // A poisoned map still holds every completed write.
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ArtifactSink for MemorySink {
    fn write(&self, relative: &Path, bytes: &[u8]) -> Result<(), FertError> {
        self.lock().insert(relative.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}
