use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::commands;
use cli::watch;
use reader_core::config::{self, AppConfig};
use std::time::Duration;
use tracing::Level;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let mut cfg = config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut cfg);

    match cli.command {
        Commands::Sync { dry_run, json } => commands::run_sync(&cfg, dry_run, json),
        Commands::Scan { json } => commands::run_scan(&cfg, json),
        Commands::Classify { text, json } => commands::run_classify(&text.join(" "), json),
        Commands::Watch { debounce_ms } => {
            watch::watch_library(&cfg, Duration::from_millis(debounce_ms), |cfg| {
                commands::run_sync(cfg, false, false)
            })
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Parser)]
#[command(name = "deep-reader")]
#[command(about = "Syncs paper folder metadata into the Deep Reader page", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    /// Override the library root directory
    #[arg(long, global = true)]
    root: Option<String>,

    /// Override the page holding the data block
    #[arg(long, global = true)]
    page: Option<String>,

    /// Override the meta.json path
    #[arg(long, global = true)]
    meta_json: Option<String>,

    /// Do not write meta.json
    #[arg(long, global = true, default_value_t = false)]
    no_meta_json: bool,

    /// Debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true, default_value_t = false)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn apply_overrides(&self, cfg: &mut AppConfig) {
        if let Some(root) = &self.root {
            cfg.library.root = root.clone();
        }
        if let Some(page) = &self.page {
            cfg.output.page = page.clone();
        }
        if let Some(meta) = &self.meta_json {
            cfg.output.meta_json = Some(meta.clone());
        }
        if self.no_meta_json {
            cfg.output.meta_json = None;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Scan, classify and rewrite the page data block
    Sync {
        /// Report what would change without writing
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// List paper folders and their files
    Scan {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify free text with the paper rule table
    Classify {
        /// Text to classify
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-run sync whenever the library changes
    Watch {
        /// Quiet period before a burst of changes triggers a sync
        #[arg(long, default_value_t = 500)]
        debounce_ms: u64,
    },
}
