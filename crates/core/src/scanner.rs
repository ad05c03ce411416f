//! Finds paper folders directly under the library root and lists the files
//! inside each one. Nothing is recursed into beyond that single level.

use crate::config::LibraryConfig;
use crate::error::SyncError;
use crate::models::{FileEntry, PaperFolder};
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub folder_pattern: Regex,
    pub excludes: GlobSet,
    pub include_hidden: bool,
}

impl ScanOptions {
    pub fn from_config(cfg: &LibraryConfig) -> Result<Self, SyncError> {
        let folder_pattern =
            Regex::new(&cfg.folder_pattern).map_err(|source| SyncError::InvalidPattern {
                pattern: cfg.folder_pattern.clone(),
                source,
            })?;
        Ok(Self {
            folder_pattern,
            excludes: build_globset(&cfg.exclude)?,
            include_hidden: cfg.include_hidden,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Matched folders in lexical name order.
    pub folders: Vec<PaperFolder>,
    /// Directory names that did not look like a paper id.
    pub skipped: Vec<String>,
}

pub fn scan(root: &Path, opts: &ScanOptions) -> Result<ScanReport, SyncError> {
    if !root.is_dir() {
        return Err(SyncError::MissingRoot(root.to_path_buf()));
    }

    let mut report = ScanReport::default();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("skipping unreadable entry under {:?}: {}", root, err);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !opts.include_hidden && is_hidden(&name) {
            continue;
        }
        match extract_paper_id(&opts.folder_pattern, &name) {
            Some(paper_id) => {
                let files = list_files(entry.path(), opts);
                debug!(%paper_id, files = files.len(), "found paper folder");
                report.folders.push(PaperFolder {
                    paper_id,
                    folder: name,
                    path: entry.path().to_path_buf(),
                    files,
                });
            }
            None => {
                debug!("skipping folder '{}': no paper id", name);
                report.skipped.push(name);
            }
        }
    }
    Ok(report)
}

/// Group 1 of the pattern if it has one, else the whole match.
pub fn extract_paper_id(pattern: &Regex, folder_name: &str) -> Option<String> {
    let caps = pattern.captures(folder_name)?;
    caps.get(1)
        .or_else(|| caps.get(0))
        .map(|m| m.as_str().to_string())
}

fn list_files(dir: &Path, opts: &ScanOptions) -> Vec<FileEntry> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("skipping unreadable entry in {:?}: {}", dir, err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !opts.include_hidden && is_hidden(&name) {
            debug!("ignoring hidden file {:?}", entry.path());
            continue;
        }
        if opts.excludes.is_match(&name) {
            debug!("ignoring excluded file {:?}", entry.path());
            continue;
        }
        files.push(FileEntry::new(entry.path()));
    }
    files
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, SyncError> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(builder.build()?)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
