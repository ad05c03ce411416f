//! Storage layer: where the assembled paper records end up.
//!
//! The browsing page keeps every record in one named data block; a
//! standalone `meta.json` can mirror it. Both sit behind [`MetadataStore`],
//! which only knows how to read the current mapping or replace it wholesale.

pub mod block;
pub mod error;
pub mod meta_json;
pub mod page;

use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::warn;

pub use error::StoreError;
pub use meta_json::MetaJsonStore;
pub use page::PageBlockStore;

/// `paper_id -> record`, already serialized.
pub type Papers = serde_json::Map<String, serde_json::Value>;

/// Everything a store needs for one full replacement.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub papers: Papers,
    pub total_documents: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

pub trait MetadataStore {
    /// Human readable target, used in logs and summaries.
    fn target(&self) -> String;

    /// Current papers mapping, or `None` when the target holds nothing yet.
    fn read_current(&self) -> Result<Option<Papers>, StoreError>;

    /// Replace the whole mapping. Either everything is written or the
    /// previous content is left as it was.
    fn write_full(&self, snapshot: &Snapshot) -> Result<WriteOutcome, StoreError>;
}

/// Difference between the stored mapping and a freshly built one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PapersDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

impl PapersDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

pub fn diff_papers(current: Option<&Papers>, next: &Papers) -> PapersDiff {
    let mut diff = PapersDiff::default();
    let empty = Papers::new();
    let current = current.unwrap_or(&empty);
    for (id, record) in next {
        match current.get(id) {
            None => diff.added.push(id.clone()),
            Some(old) if old != record => diff.changed.push(id.clone()),
            Some(_) => {}
        }
    }
    for id in current.keys() {
        if !next.contains_key(id) {
            diff.removed.push(id.clone());
        }
    }
    diff
}

/// Write `contents` next to `path` and rename it into place.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(contents.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    if let Ok(meta) = fs::metadata(path) {
        // Keep the page's permissions instead of the temp file's 0600.
        if let Err(err) = tmp.as_file().set_permissions(meta.permissions()) {
            warn!("could not keep permissions of {:?}: {}", path, err);
        }
    }
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
