use serde::{Deserialize, Serialize};

pub const DEFAULT_FOLDER_PATTERN: &str = r"(?:^|\D)(\d+\.\d+(?:[A-Za-z]\d+)?)(?:\D|$)";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub root: String,
    /// Regex applied to folder names; group 1 (or the whole match) is the id.
    pub folder_pattern: String,
    /// Globs matched against file names inside a paper folder.
    pub exclude: Vec<String>,
    pub include_hidden: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: "AI".to_string(),
            folder_pattern: DEFAULT_FOLDER_PATTERN.to_string(),
            exclude: Vec::new(),
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// 0 disables truncation.
    pub description_max_chars: usize,
    pub arxiv_base_url: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            description_max_chars: 200,
            arxiv_base_url: Some("https://arxiv.org/abs/".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub page: String,
    pub block: String,
    /// Empty string disables the meta.json mirror.
    pub meta_json: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            page: "index.html".to_string(),
            block: "paperMetadata".to_string(),
            meta_json: Some("meta.json".to_string()),
        }
    }
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(config::Environment::with_prefix("DEEP_READER").separator("__"));
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
