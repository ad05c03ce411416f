use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One paper directory found under the library root.
#[derive(Debug, Clone)]
pub struct PaperFolder {
    pub paper_id: String,
    /// Directory name as found on disk; may carry more than the id.
    pub folder: String,
    pub path: PathBuf,
    /// Immediate files, lexical filename order.
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    /// Lowercased and dot-prefixed (`.pdf`), empty when the name has none.
    pub extension: String,
    pub path: PathBuf,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = extension_of(&path);
        Self {
            name,
            extension,
            path,
        }
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(dot) if dot > 0 && !self.extension.is_empty() => &self.name[..dot],
            _ => &self.name,
        }
    }

    pub fn is_html(&self) -> bool {
        self.extension == ".html"
    }

    /// Reads the file as text; invalid UTF-8 is replaced, not rejected.
    pub fn read_text(&self) -> io::Result<String> {
        let bytes = fs::read(&self.path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "KV-Cache-Optimization")]
    KvCacheOptimization,
    #[serde(rename = "Inference-Acceleration")]
    InferenceAcceleration,
    #[serde(rename = "Model-Training")]
    ModelTraining,
    #[serde(rename = "Reasoning-Capability")]
    ReasoningCapability,
    #[serde(rename = "Multimodal")]
    Multimodal,
    #[serde(rename = "Model-Architecture")]
    ModelArchitecture,
    #[serde(rename = "AI-Research")]
    AiResearch,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::KvCacheOptimization => "KV-Cache-Optimization",
            Category::InferenceAcceleration => "Inference-Acceleration",
            Category::ModelTraining => "Model-Training",
            Category::ReasoningCapability => "Reasoning-Capability",
            Category::Multimodal => "Multimodal",
            Category::ModelArchitecture => "Model-Architecture",
            Category::AiResearch => "AI-Research",
        }
    }

    /// Label shown on the browsing page.
    pub fn label(&self) -> &'static str {
        match self {
            Category::KvCacheOptimization => "KV缓存优化",
            Category::InferenceAcceleration => "推理加速",
            Category::ModelTraining => "模型训练",
            Category::ReasoningCapability => "推理能力",
            Category::Multimodal => "多模态",
            Category::ModelArchitecture => "模型架构",
            Category::AiResearch => "AI研究",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: Category,
    pub category_label: String,
    #[serde(rename = "categoryColor")]
    pub color_key: String,
    pub tags: Vec<String>,
    pub tag_colors: Vec<String>,
    #[serde(rename = "gradient")]
    pub gradient_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentRole {
    PrimaryAnalysis,
    ResearchReport,
    TechnicalReport,
    AnalysisReport,
    OriginalDocument,
    OtherAttachment,
}

impl AttachmentRole {
    pub fn icon(&self) -> &'static str {
        match self {
            AttachmentRole::PrimaryAnalysis => "📖",
            AttachmentRole::ResearchReport => "📊",
            AttachmentRole::TechnicalReport => "🔧",
            AttachmentRole::AnalysisReport => "📊",
            AttachmentRole::OriginalDocument => "📄",
            AttachmentRole::OtherAttachment => "📎",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttachmentRole::PrimaryAnalysis => "深度解析",
            AttachmentRole::ResearchReport => "研究报告",
            AttachmentRole::TechnicalReport => "技术报告",
            AttachmentRole::AnalysisReport => "分析报告",
            AttachmentRole::OriginalDocument => "原文PDF",
            AttachmentRole::OtherAttachment => "其他文件",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentDescriptor {
    #[serde(rename = "type")]
    pub role: AttachmentRole,
    #[serde(rename = "icon")]
    pub icon_tag: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub label: String,
}

impl AttachmentDescriptor {
    pub fn new(role: AttachmentRole, file_name: &str) -> Self {
        Self {
            role,
            icon_tag: role.icon().to_string(),
            display_name: file_name.to_string(),
            label: role.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperMetadataRecord {
    pub paper_id: String,
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub classification: ClassificationResult,
    pub folder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arxiv_url: Option<String>,
    #[serde(rename = "files")]
    pub attachments: Vec<AttachmentDescriptor>,
}
