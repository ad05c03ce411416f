use reader_core::config::{AppConfig, ExtractionConfig};
use reader_core::models::{AttachmentRole, Category, FileEntry, PaperFolder};
use reader_core::pipeline::{self, SyncMode};
use reader_core::SyncError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use storage::{StoreError, WriteOutcome};
use tempfile::{tempdir, TempDir};

const PAGE: &str = "<html><body><script>\nconst paperMetadata = {};\nrender(paperMetadata);\n</script></body></html>\n";

struct Fixture {
    _dir: TempDir,
    root: PathBuf,
    page: PathBuf,
    meta: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let root = dir.path().join("AI");
        fs::create_dir_all(&root).unwrap();
        let page = dir.path().join("index.html");
        fs::write(&page, PAGE).unwrap();
        let meta = dir.path().join("meta.json");
        Self {
            _dir: dir,
            root,
            page,
            meta,
        }
    }

    fn folder(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = self.root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for (file, content) in files {
            fs::write(dir.join(file), content).unwrap();
        }
        dir
    }

    fn config(&self) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.library.root = self.root.to_string_lossy().into_owned();
        cfg.output.page = self.page.to_string_lossy().into_owned();
        cfg.output.meta_json = Some(self.meta.to_string_lossy().into_owned());
        cfg
    }
}

fn names(record: &reader_core::models::PaperMetadataRecord) -> Vec<(AttachmentRole, String)> {
    record
        .attachments
        .iter()
        .map(|a| (a.role, a.display_name.clone()))
        .collect()
}

#[test]
fn kv_cache_paper_scenario() {
    let fx = Fixture::new();
    fx.folder(
        "2412.19255v2",
        &[
            (
                "2412.19255v2.html",
                "<html><head><title>Efficient KV Cache Compression</title></head>\
                 <body><p>We compress the key-value cache.</p></body></html>",
            ),
            ("2412.19255v2.pdf", "%PDF-1.4"),
            ("分析报告.pdf", "%PDF-1.4"),
        ],
    );

    let library = pipeline::build_library(&fx.config()).unwrap();
    let record = &library.records["2412.19255v2"];
    assert_eq!(record.paper_id, "2412.19255v2");
    assert_eq!(record.title, "Efficient KV Cache Compression");
    assert_eq!(record.description, "We compress the key-value cache.");
    assert_eq!(record.classification.category, Category::KvCacheOptimization);
    assert_eq!(
        record.arxiv_url.as_deref(),
        Some("https://arxiv.org/abs/2412.19255v2")
    );
    assert_eq!(
        names(record),
        vec![
            (AttachmentRole::PrimaryAnalysis, "2412.19255v2.html".to_string()),
            (AttachmentRole::OriginalDocument, "2412.19255v2.pdf".to_string()),
            (AttachmentRole::AnalysisReport, "分析报告.pdf".to_string()),
        ]
    );
    assert_eq!(library.total_documents, 3);
}

#[test]
fn empty_folder_gets_minimal_record() {
    let fx = Fixture::new();
    fx.folder("2501.00001", &[]);

    let library = pipeline::build_library(&fx.config()).unwrap();
    let record = &library.records["2501.00001"];
    assert_eq!(record.title, "2501.00001");
    assert_eq!(record.description, "");
    assert_eq!(record.classification.category, Category::AiResearch);
    assert!(record.attachments.is_empty());
}

#[test]
fn every_file_is_accounted_for_once() {
    let fx = Fixture::new();
    fx.folder(
        "2402.11111",
        &[
            ("b-notes.html", "<title>Speculative decoding</title>"),
            ("a-overview.html", "<title>Multi-token prediction</title>"),
            ("readme.md", "# notes"),
            ("tech_details.pdf", ""),
        ],
    );
    fx.folder("2402.22222", &[("paper.pdf", ""), ("log.txt", "")]);

    let library = pipeline::build_library(&fx.config()).unwrap();

    let with_primary = &library.records["2402.11111"];
    assert_eq!(with_primary.attachments.len(), 4);
    assert_eq!(
        names(with_primary),
        vec![
            (AttachmentRole::PrimaryAnalysis, "a-overview.html".to_string()),
            (AttachmentRole::OtherAttachment, "b-notes.html".to_string()),
            (AttachmentRole::OtherAttachment, "readme.md".to_string()),
            (AttachmentRole::TechnicalReport, "tech_details.pdf".to_string()),
        ]
    );
    assert_eq!(with_primary.title, "Multi-token prediction");
    assert_eq!(
        with_primary.classification.category,
        Category::InferenceAcceleration
    );

    let without_primary = &library.records["2402.22222"];
    assert_eq!(without_primary.attachments.len(), 2);
    assert_eq!(without_primary.title, "2402.22222");
    assert_eq!(without_primary.classification.category, Category::AiResearch);
}

#[test]
fn exact_id_match_beats_lexical_order() {
    let fx = Fixture::new();
    fx.folder(
        "2403.00001",
        &[
            ("2403.00001.html", "<title>Vision transformers</title>"),
            ("0-index.html", "<title>Index</title>"),
        ],
    );
    let library = pipeline::build_library(&fx.config()).unwrap();
    let record = &library.records["2403.00001"];
    assert_eq!(record.title, "Vision transformers");
    assert_eq!(record.attachments[0].display_name, "2403.00001.html");
    assert_eq!(record.attachments[1].role, AttachmentRole::OtherAttachment);
}

#[test]
fn duplicate_ids_keep_last_folder() {
    let fx = Fixture::new();
    fx.folder(
        "2401.00001",
        &[("a.html", "<title>First</title>"), ("draft.pdf", "")],
    );
    fx.folder("2401.00001-copy", &[("a.html", "<title>Second</title>")]);

    let library = pipeline::build_library(&fx.config()).unwrap();
    assert_eq!(library.records.len(), 1);
    let record = &library.records["2401.00001"];
    assert_eq!(record.title, "Second");
    assert_eq!(record.folder, "2401.00001-copy");
    assert_eq!(library.duplicates, vec!["2401.00001"]);
    assert_eq!(library.total_documents, 1);
    assert_eq!(library.snapshot().unwrap().total_documents, 1);
}

#[test]
fn scanner_ignores_non_papers_nested_dirs_and_hidden_files() {
    let fx = Fixture::new();
    fx.folder("drafts", &[("x.html", "")]);
    let paper = fx.folder("2404.54321", &[("2404.54321.html", ""), (".DS_Store", ""), ("tmp.swp", "")]);
    fs::create_dir_all(paper.join("figures")).unwrap();
    fs::write(paper.join("figures").join("fig1.png"), "").unwrap();
    fs::write(fx.root.join("2405.00000.txt"), "not a folder").unwrap();

    let mut cfg = fx.config();
    cfg.library.exclude = vec!["*.swp".to_string()];
    let library = pipeline::build_library(&cfg).unwrap();

    assert_eq!(library.scan.skipped, vec!["drafts"]);
    assert_eq!(library.records.len(), 1);
    assert_eq!(
        names(&library.records["2404.54321"]),
        vec![(AttachmentRole::PrimaryAnalysis, "2404.54321.html".to_string())]
    );
}

#[test]
fn unreadable_primary_degrades_to_filename_only() {
    let folder = PaperFolder {
        paper_id: "2406.00001".into(),
        folder: "2406.00001".into(),
        path: PathBuf::from("/library/2406.00001"),
        files: vec![
            FileEntry::new("/library/2406.00001/2406.00001.html"),
            FileEntry::new("/library/2406.00001/report.pdf"),
        ],
    };
    let record = pipeline::assemble_with(&folder, &ExtractionConfig::default(), |_| {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
    });
    assert_eq!(record.title, "2406.00001");
    assert_eq!(record.description, "");
    assert_eq!(record.classification.category, Category::AiResearch);
    assert_eq!(record.attachments.len(), 2);
    assert_eq!(record.attachments[1].role, AttachmentRole::ResearchReport);
}

#[test]
fn missing_root_aborts_without_writing() {
    let fx = Fixture::new();
    let mut cfg = fx.config();
    cfg.library.root = fx.root.join("nope").to_string_lossy().into_owned();

    let err = pipeline::run(&cfg, SyncMode::Write).err().unwrap();
    assert!(matches!(err, SyncError::MissingRoot(_)));
    assert_eq!(fs::read_to_string(&fx.page).unwrap(), PAGE);
    assert!(!fx.meta.exists());
}

#[test]
fn missing_block_reports_records_but_writes_nothing() {
    let fx = Fixture::new();
    fx.folder("2407.00001", &[("2407.00001.html", "<title>Reasoning</title>")]);
    fs::write(&fx.page, "<html></html>").unwrap();

    let outcome = pipeline::run(&fx.config(), SyncMode::Write).unwrap();
    assert_eq!(outcome.summary.records, 1);
    assert!(matches!(
        outcome.write_error,
        Some(SyncError::Store(StoreError::WriteTargetMissing { .. }))
    ));
    assert_eq!(fs::read_to_string(&fx.page).unwrap(), "<html></html>");
    assert!(!fx.meta.exists());
}

#[test]
fn rerun_on_unchanged_tree_is_byte_identical() {
    let fx = Fixture::new();
    fx.folder(
        "2408.00001",
        &[("2408.00001.html", "<title>LoRA fine-tuning</title><p>Adapters.</p>")],
    );
    fx.folder("2408.00002", &[("paper.pdf", "")]);
    let cfg = fx.config();

    let first = pipeline::run(&cfg, SyncMode::Write).unwrap();
    assert!(first.write_error.is_none());
    assert!(first
        .summary
        .writes
        .iter()
        .all(|w| w.outcome == WriteOutcome::Written));
    let page_bytes = fs::read(&fx.page).unwrap();
    let meta_bytes = fs::read(&fx.meta).unwrap();

    let second = pipeline::run(&cfg, SyncMode::Write).unwrap();
    assert!(second
        .summary
        .writes
        .iter()
        .all(|w| w.outcome == WriteOutcome::Unchanged));
    assert_eq!(fs::read(&fx.page).unwrap(), page_bytes);
    assert_eq!(fs::read(&fx.meta).unwrap(), meta_bytes);
    assert_eq!(
        first.library.snapshot().unwrap().papers,
        second.library.snapshot().unwrap().papers
    );

    let page = fs::read_to_string(&fx.page).unwrap();
    assert!(page.contains("\"category\": \"Model-Training\""));
    assert!(page.contains("render(paperMetadata);"));
}

#[test]
fn dry_run_reports_diff_only() {
    let fx = Fixture::new();
    fx.folder("2409.00001", &[("2409.00001.html", "<title>Multimodal agents</title>")]);

    let outcome = pipeline::run(&fx.config(), SyncMode::DryRun).unwrap();
    let diff = outcome.summary.diff.unwrap();
    assert_eq!(diff.added, vec!["2409.00001"]);
    assert!(outcome.summary.writes.is_empty());
    assert_eq!(fs::read_to_string(&fx.page).unwrap(), PAGE);
    assert!(!Path::new(&fx.meta).exists());
}

#[test]
fn record_serializes_in_page_format() {
    let fx = Fixture::new();
    fx.folder(
        "2410.00001",
        &[("2410.00001.html", "<title>Sparse attention</title>")],
    );
    let library = pipeline::build_library(&fx.config()).unwrap();
    let snapshot = library.snapshot().unwrap();
    let value = &snapshot.papers["2410.00001"];
    assert_eq!(value["paperId"], "2410.00001");
    assert_eq!(value["category"], "Model-Architecture");
    assert_eq!(value["categoryLabel"], "模型架构");
    assert_eq!(value["categoryColor"], "indigo");
    assert_eq!(value["gradient"], "from-indigo-600 to-blue-600");
    assert_eq!(value["tags"][1], "注意力机制");
    assert_eq!(value["files"][0]["type"], "primary_analysis");
    assert_eq!(value["files"][0]["icon"], "📖");
    assert_eq!(snapshot.total_documents, 1);
}
