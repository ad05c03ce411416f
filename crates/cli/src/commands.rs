use anyhow::Result;
use reader_core::classifier;
use reader_core::config::AppConfig;
use reader_core::extractor::truncate_chars;
use reader_core::models::ClassificationResult;
use reader_core::pipeline::{self, SyncMode, SyncOutcome};
use reader_core::scanner::{self, ScanOptions, ScanReport};
use serde_json::json;
use std::fmt::Write as _;
use std::path::Path;

pub fn run_sync(cfg: &AppConfig, dry_run: bool, json: bool) -> Result<()> {
    let mode = if dry_run { SyncMode::DryRun } else { SyncMode::Write };
    let outcome = pipeline::run(cfg, mode)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&sync_json(&outcome, mode))?);
    } else {
        print!("{}", render_sync(&outcome, mode));
    }
    match outcome.write_error {
        Some(err) => Err(anyhow::Error::new(err).context("records were built but not stored")),
        None => Ok(()),
    }
}

pub fn sync_json(outcome: &SyncOutcome, mode: SyncMode) -> serde_json::Value {
    let papers: Vec<_> = outcome
        .library
        .records
        .values()
        .map(|r| {
            json!({
                "id": r.paper_id,
                "title": r.title,
                "category": r.classification.category,
                "files": r.attachments.len(),
            })
        })
        .collect();
    let status = if outcome.write_error.is_some() { "error" } else { "ok" };
    json!({
        "status": status,
        "mode": mode_label(mode),
        "summary": outcome.summary,
        "papers": papers,
        "error": outcome.write_error.as_ref().map(|e| e.to_string()),
    })
}

pub fn render_sync(outcome: &SyncOutcome, mode: SyncMode) -> String {
    let s = &outcome.summary;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: discovered {}, skipped {}, records {}, documents {}",
        mode_label(mode),
        s.discovered,
        s.skipped.len(),
        s.records,
        s.total_documents
    );
    for record in outcome.library.records.values() {
        let _ = writeln!(
            out,
            "  - {}: {} [{}]",
            record.paper_id,
            truncate_chars(&record.title, 50),
            record.classification.category
        );
    }
    for id in &s.duplicates {
        let _ = writeln!(out, "duplicate paper id {} (last folder kept)", id);
    }
    if let Some(diff) = &s.diff {
        let _ = writeln!(
            out,
            "would add {}, remove {}, change {}",
            diff.added.len(),
            diff.removed.len(),
            diff.changed.len()
        );
    }
    for write in &s.writes {
        let _ = writeln!(out, "{}: {:?}", write.target, write.outcome);
    }
    out
}

fn mode_label(mode: SyncMode) -> &'static str {
    match mode {
        SyncMode::Write => "sync",
        SyncMode::DryRun => "dry-run",
    }
}

pub fn run_scan(cfg: &AppConfig, json: bool) -> Result<()> {
    let opts = ScanOptions::from_config(&cfg.library)?;
    let report = scanner::scan(Path::new(&cfg.library.root), &opts)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&scan_json(&report))?);
    } else {
        print!("{}", render_scan(&report));
    }
    Ok(())
}

pub fn scan_json(report: &ScanReport) -> serde_json::Value {
    let folders: Vec<_> = report
        .folders
        .iter()
        .map(|f| {
            json!({
                "id": f.paper_id,
                "folder": f.folder,
                "primary": pipeline::select_primary(f).map(|p| p.name.clone()),
                "files": f.files.iter().map(|e| e.name.clone()).collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({ "folders": folders, "skipped": report.skipped })
}

pub fn render_scan(report: &ScanReport) -> String {
    let mut out = String::new();
    for folder in &report.folders {
        let primary = pipeline::select_primary(folder);
        let _ = writeln!(out, "{} ({} files)", folder.folder, folder.files.len());
        for file in &folder.files {
            let marker = if primary.is_some_and(|p| p.path == file.path) { "*" } else { " " };
            let _ = writeln!(out, "  {} {}", marker, file.name);
        }
    }
    for name in &report.skipped {
        let _ = writeln!(out, "skipped '{}': no paper id", name);
    }
    out
}

pub fn run_classify(text: &str, json: bool) -> Result<()> {
    let result = classifier::classify_text(text);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_classification(&result));
    }
    Ok(())
}

pub fn render_classification(result: &ClassificationResult) -> String {
    format!(
        "category: {} ({})\ncolor: {}\ngradient: {}\ntags: {}\n",
        result.category,
        result.category_label,
        result.color_key,
        result.gradient_key,
        result.tags.join(", ")
    )
}
