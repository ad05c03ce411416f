use crate::classifier;
use crate::config::{AppConfig, ExtractionConfig, OutputConfig};
use crate::error::SyncError;
use crate::extractor::{self, ExtractedText};
use crate::models::{FileEntry, PaperFolder, PaperMetadataRecord};
use crate::scanner::{self, ScanOptions, ScanReport};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use storage::{
    diff_papers, MetaJsonStore, MetadataStore, PageBlockStore, Papers, PapersDiff, Snapshot,
    WriteOutcome,
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Build records and replace the stored mapping.
    Write,
    /// Build records and report what a write would change.
    DryRun,
}

/// Prefers `<paper_id>.html`, then the lexically first `.html` file.
pub fn select_primary(folder: &PaperFolder) -> Option<&FileEntry> {
    let html = || folder.files.iter().filter(|f| f.is_html());
    html()
        .find(|f| f.stem() == folder.paper_id)
        .or_else(|| html().min_by(|a, b| a.name.cmp(&b.name)))
}

pub fn assemble(folder: &PaperFolder, cfg: &ExtractionConfig) -> PaperMetadataRecord {
    assemble_with(folder, cfg, FileEntry::read_text)
}

/// Builds one record; `load` supplies the text of the primary document.
pub fn assemble_with<F>(folder: &PaperFolder, cfg: &ExtractionConfig, mut load: F) -> PaperMetadataRecord
where
    F: FnMut(&FileEntry) -> io::Result<String>,
{
    let primary = select_primary(folder);
    let extracted = match primary {
        Some(file) => {
            info!("Processing {} from {}...", folder.paper_id, file.name);
            match load(file) {
                Ok(html) => extractor::extract_text(&html, cfg.description_max_chars),
                Err(err) => {
                    warn!("could not read {:?}: {}", file.path, err);
                    ExtractedText::default()
                }
            }
        }
        None => {
            info!("No HTML file found in '{}'", folder.folder);
            ExtractedText::default()
        }
    };

    let classification =
        classifier::classify_paper(extracted.title.as_deref().unwrap_or(""), &extracted.description);
    debug!(paper_id = %folder.paper_id, category = %classification.category, "classified");

    let mut attachments = Vec::with_capacity(folder.files.len());
    if let Some(file) = primary {
        attachments.push(classifier::primary_descriptor(file));
    }
    attachments.extend(
        folder
            .files
            .iter()
            .filter(|f| primary.map_or(true, |p| p.path != f.path))
            .map(classifier::classify_attachment),
    );

    PaperMetadataRecord {
        paper_id: folder.paper_id.clone(),
        title: extracted.title.unwrap_or_else(|| folder.paper_id.clone()),
        description: extracted.description,
        classification,
        folder: folder.folder.clone(),
        arxiv_url: cfg
            .arxiv_base_url
            .as_deref()
            .filter(|base| !base.is_empty())
            .map(|base| format!("{}{}", base, folder.paper_id)),
        attachments,
    }
}

/// Every scanned folder and the records built from it.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub scan: ScanReport,
    pub records: BTreeMap<String, PaperMetadataRecord>,
    /// Ids seen more than once; the later folder's record was kept.
    pub duplicates: Vec<String>,
    pub total_documents: usize,
}

impl Library {
    pub fn snapshot(&self) -> Result<Snapshot, SyncError> {
        let mut papers = Papers::new();
        for (id, record) in &self.records {
            papers.insert(id.clone(), serde_json::to_value(record)?);
        }
        Ok(Snapshot {
            papers,
            total_documents: self.total_documents,
        })
    }
}

pub fn build_records(scan: ScanReport, cfg: &ExtractionConfig) -> Library {
    let mut library = Library::default();
    for folder in &scan.folders {
        let record = assemble(folder, cfg);
        if library.records.insert(folder.paper_id.clone(), record).is_some() {
            warn!(
                "paper id {} appears in more than one folder; keeping '{}'",
                folder.paper_id, folder.folder
            );
            library.duplicates.push(folder.paper_id.clone());
        }
    }
    // Kept records only.
    library.total_documents = library.records.values().map(|r| r.attachments.len()).sum();
    library.scan = scan;
    library
}

pub fn build_library(cfg: &AppConfig) -> Result<Library, SyncError> {
    let opts = ScanOptions::from_config(&cfg.library)?;
    let scan = scanner::scan(Path::new(&cfg.library.root), &opts)?;
    info!(
        "Found {} paper folders ({} skipped)",
        scan.folders.len(),
        scan.skipped.len()
    );
    Ok(build_records(scan, &cfg.extraction))
}

/// Page first, then the optional meta.json mirror.
pub fn build_stores(cfg: &OutputConfig) -> Vec<Box<dyn MetadataStore>> {
    let mut stores: Vec<Box<dyn MetadataStore>> =
        vec![Box::new(PageBlockStore::new(&cfg.page, &cfg.block))];
    if let Some(path) = cfg.meta_json.as_deref().filter(|p| !p.is_empty()) {
        stores.push(Box::new(MetaJsonStore::new(path)));
    }
    stores
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreWrite {
    pub target: String,
    pub outcome: WriteOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncSummary {
    pub discovered: usize,
    pub skipped: Vec<String>,
    pub records: usize,
    pub total_documents: usize,
    pub duplicates: Vec<String>,
    pub writes: Vec<StoreWrite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<PapersDiff>,
}

impl SyncSummary {
    fn from_library(library: &Library) -> Self {
        Self {
            discovered: library.scan.folders.len(),
            skipped: library.scan.skipped.clone(),
            records: library.records.len(),
            total_documents: library.total_documents,
            duplicates: library.duplicates.clone(),
            ..Self::default()
        }
    }
}

pub struct SyncOutcome {
    pub library: Library,
    pub summary: SyncSummary,
    /// Set when records were built but could not be stored.
    pub write_error: Option<SyncError>,
}

/// Scans, classifies and stores. Root and configuration problems are
/// returned as errors; a failed write still yields the built records.
pub fn run(cfg: &AppConfig, mode: SyncMode) -> Result<SyncOutcome, SyncError> {
    let library = build_library(cfg)?;
    let mut summary = SyncSummary::from_library(&library);
    let snapshot = library.snapshot()?;
    let stores = build_stores(&cfg.output);

    let write_error = match mode {
        SyncMode::DryRun => {
            summary.diff = preview(stores.as_slice(), &snapshot.papers);
            None
        }
        SyncMode::Write => persist(stores.as_slice(), &snapshot, &mut summary.writes).err(),
    };

    Ok(SyncOutcome {
        library,
        summary,
        write_error,
    })
}

/// Diff against the first store that can be read.
pub fn preview(stores: &[Box<dyn MetadataStore>], papers: &Papers) -> Option<PapersDiff> {
    for store in stores {
        match store.read_current() {
            Ok(current) => return Some(diff_papers(current.as_ref(), papers)),
            Err(err) => warn!("cannot read {}: {}", store.target(), err),
        }
    }
    None
}

/// Writes to each store in turn, stopping at the first failure.
pub fn persist(
    stores: &[Box<dyn MetadataStore>],
    snapshot: &Snapshot,
    writes: &mut Vec<StoreWrite>,
) -> Result<(), SyncError> {
    for store in stores {
        let outcome = store.write_full(snapshot)?;
        writes.push(StoreWrite {
            target: store.target(),
            outcome,
        });
    }
    Ok(())
}
