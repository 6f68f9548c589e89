//! Position persistence
//!
//! Storage sits behind the `PositionStore` trait so the production JSON
//! file and in-memory test doubles share the load/save logic.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::placement::PositionSet;
use crate::Result;

/// Storage interface for the raw position JSON
pub trait PositionStore {
    /// Read the stored JSON; `None` when nothing has been stored yet
    fn load(&self) -> Result<Option<String>>;

    /// Overwrite the stored JSON
    fn store(&self, data: &str) -> Result<()>;
}

/// Position storage backed by a JSON file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PositionStore for JsonFileStore {
    fn load(&self) -> Result<Option<String>> {
        // Only a missing file means "not stored"; other errors propagate
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, data: &str) -> Result<()> {
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

/// In-memory position storage for tests
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded storage
    pub fn with_data(data: &str) -> Self {
        Self {
            data: Mutex::new(Some(data.to_string())),
        }
    }
}

impl PositionStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        let guard = self
            .data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(guard.clone())
    }

    fn store(&self, data: &str) -> Result<()> {
        let mut guard = self
            .data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(data.to_string());
        Ok(())
    }
}

/// Load positions, falling back to the built-in defaults
///
/// Missing or unparsable data yields the defaults, which are written back
/// through the same store so the next load succeeds. On a successful parse
/// the fontSize attributes are stripped of unit suffixes.
pub fn load_or_default<S: PositionStore>(store: &S) -> Result<PositionSet> {
    if let Some(raw) = store.load()? {
        match serde_json::from_str::<PositionSet>(&raw) {
            Ok(mut positions) => {
                positions.strip_font_size_units();
                return Ok(positions);
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored positions unreadable, restoring defaults");
            }
        }
    }

    let defaults = PositionSet::defaults();
    save_positions(store, &defaults)?;
    Ok(defaults)
}

/// Normalize and persist the full position set as pretty-printed JSON
pub fn save_positions<S: PositionStore>(store: &S, positions: &PositionSet) -> Result<()> {
    let normalized = positions.normalized();
    let json = serde_json::to_string_pretty(&normalized)?;
    store.store(&json)?;
    Ok(())
}
