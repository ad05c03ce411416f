use crate::block::{self, BlockSpan};
use crate::{MetadataStore, Papers, Snapshot, StoreError, WriteOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The browsing page, holding every record in `const <block> = {...};`.
#[derive(Debug, Clone)]
pub struct PageBlockStore {
    path: PathBuf,
    block: String,
}

impl PageBlockStore {
    pub fn new(path: impl Into<PathBuf>, block: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block: block.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<(String, BlockSpan), StoreError> {
        let source = fs::read_to_string(&self.path).map_err(|source| StoreError::MissingPage {
            path: self.path.clone(),
            source,
        })?;
        let span = block::find_block(&source, &self.block).ok_or_else(|| {
            StoreError::WriteTargetMissing {
                path: self.path.clone(),
                block: self.block.clone(),
            }
        })?;
        Ok((source, span))
    }
}

/// Pretty JSON with `<`, U+2028 and U+2029 escaped, so record text can never
/// end the enclosing `<script>`.
pub fn render_literal(papers: &Papers) -> Result<String, StoreError> {
    let json = serde_json::to_string_pretty(papers)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    Ok(out)
}

impl MetadataStore for PageBlockStore {
    fn target(&self) -> String {
        format!("{}#{}", self.path.display(), self.block)
    }

    fn read_current(&self) -> Result<Option<Papers>, StoreError> {
        let (source, span) = self.load()?;
        let papers: Papers =
            serde_json::from_str(span.slice(&source)).map_err(|err| StoreError::MalformedBlock {
                path: self.path.clone(),
                block: self.block.clone(),
                source: err,
            })?;
        Ok(if papers.is_empty() { None } else { Some(papers) })
    }

    fn write_full(&self, snapshot: &Snapshot) -> Result<WriteOutcome, StoreError> {
        let (source, span) = self.load()?;
        let literal = render_literal(&snapshot.papers)?;
        if span.slice(&source) == literal {
            debug!(page = %self.path.display(), "data block already up to date");
            return Ok(WriteOutcome::Unchanged);
        }
        let updated = block::splice(&source, span, &literal);
        crate::write_atomic(&self.path, &updated)?;
        info!(
            page = %self.path.display(),
            block = %self.block,
            papers = snapshot.papers.len(),
            "data block replaced"
        );
        Ok(WriteOutcome::Written)
    }
}
