use anyhow::Result;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use reader_core::config::AppConfig;
use reader_core::SyncError;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;
use tracing::{error, info, warn};

/// Runs `on_change` once, then again after every burst of changes under the
/// library root. Each run is a full rebuild.
pub fn watch_library<F>(cfg: &AppConfig, debounce: Duration, mut on_change: F) -> Result<()>
where
    F: FnMut(&AppConfig) -> Result<()>,
{
    let root = PathBuf::from(&cfg.library.root);
    if !root.is_dir() {
        return Err(SyncError::MissingRoot(root).into());
    }
    let outputs = output_paths(cfg);

    let (tx, rx) = channel();
    let mut watcher: RecommendedWatcher = Watcher::new(tx, notify::Config::default())?;
    watcher.watch(&root, RecursiveMode::Recursive)?;

    if let Err(e) = on_change(cfg) {
        error!("sync failed: {:#}", e);
    }
    info!("Watching {:?} for changes...", root);

    while let Ok(first) = rx.recv() {
        let mut relevant = is_relevant(first, &outputs);
        while let Ok(event) = rx.recv_timeout(debounce) {
            relevant |= is_relevant(event, &outputs);
        }
        if relevant {
            if let Err(e) = on_change(cfg) {
                error!("sync failed: {:#}", e);
            }
        }
    }
    Ok(())
}

fn is_relevant(event: notify::Result<notify::Event>, outputs: &[PathBuf]) -> bool {
    match event {
        Ok(ev) if ev.kind.is_access() => false,
        Ok(ev) => ev.paths.iter().any(|p| relevant_path(p, outputs)),
        Err(e) => {
            warn!("watch error: {}", e);
            false
        }
    }
}

/// Our own writes (outputs and their hidden temp files) must not retrigger.
pub fn relevant_path(path: &Path, outputs: &[PathBuf]) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'));
    if hidden {
        return false;
    }
    let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    !outputs.iter().any(|o| *o == path)
}

fn output_paths(cfg: &AppConfig) -> Vec<PathBuf> {
    std::iter::once(cfg.output.page.as_str())
        .chain(cfg.output.meta_json.as_deref())
        .filter(|p| !p.is_empty())
        .map(|p| {
            let path = PathBuf::from(p);
            path.canonicalize().unwrap_or(path)
        })
        .collect()
}
