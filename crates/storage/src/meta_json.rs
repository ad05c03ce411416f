use crate::{MetadataStore, Papers, Snapshot, StoreError, WriteOutcome};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const FORMAT_VERSION: &str = "1.0.0";

/// Standalone `meta.json` mirror of the page data.
///
/// The papers mapping is fingerprinted with blake3; when the fingerprint
/// matches the file on disk nothing is rewritten, so `lastUpdated` only
/// moves when the records do.
#[derive(Debug, Clone)]
pub struct MetaJsonStore {
    path: PathBuf,
}

impl MetaJsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Option<Value>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

pub fn papers_digest(papers: &Papers) -> Result<String, StoreError> {
    let bytes = serde_json::to_vec(papers)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

impl MetadataStore for MetaJsonStore {
    fn target(&self) -> String {
        self.path.display().to_string()
    }

    fn read_current(&self) -> Result<Option<Papers>, StoreError> {
        Ok(self
            .read_document()?
            .and_then(|doc| doc.get("papers").and_then(Value::as_object).cloned())
            .filter(|papers| !papers.is_empty()))
    }

    fn write_full(&self, snapshot: &Snapshot) -> Result<WriteOutcome, StoreError> {
        let digest = papers_digest(&snapshot.papers)?;
        // An unreadable previous file is simply replaced.
        let previous = self.read_document().ok().flatten();
        if previous
            .as_ref()
            .and_then(|doc| doc.get("digest"))
            .and_then(Value::as_str)
            == Some(digest.as_str())
        {
            debug!(path = %self.path.display(), "meta.json already up to date");
            return Ok(WriteOutcome::Unchanged);
        }

        let document = json!({
            "papers": snapshot.papers,
            "statistics": {
                "totalPapers": snapshot.papers.len(),
                "totalDocuments": snapshot.total_documents,
            },
            "lastUpdated": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            "version": FORMAT_VERSION,
            "digest": digest,
        });
        let mut text = serde_json::to_string_pretty(&document)?;
        text.push('\n');
        crate::write_atomic(&self.path, &text)?;
        info!(path = %self.path.display(), papers = snapshot.papers.len(), "meta.json written");
        Ok(WriteOutcome::Written)
    }
}
