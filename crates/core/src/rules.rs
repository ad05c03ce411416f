//! Static rule tables: topical keyword rules for papers and filename marker
//! rules for PDF attachments. Both are evaluated first-match, in table order.

use crate::models::{AttachmentRole, Category};

#[derive(Debug, Clone, Copy)]
pub struct ContentRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
    pub color: &'static str,
    pub tags: &'static [&'static str],
    pub tag_colors: &'static [&'static str],
    pub gradient: &'static str,
}

impl ContentRule {
    /// `lowered` must already be lowercase.
    pub fn matches(&self, lowered: &str) -> bool {
        self.matched_keyword(lowered).is_some()
    }

    pub fn matched_keyword(&self, lowered: &str) -> Option<&'static str> {
        self.keywords.iter().copied().find(|kw| lowered.contains(kw))
    }
}

/// Priority order matters: a paper about both caching and training is a
/// cache paper.
pub static CONTENT_RULES: [ContentRule; 6] = [
    ContentRule {
        category: Category::KvCacheOptimization,
        keywords: &["kv cache", "kv缓存", "memory", "缓存"],
        color: "blue",
        tags: &["架构创新", "内存优化", "性能提升"],
        tag_colors: &["purple", "green", "orange"],
        gradient: "from-blue-600 to-purple-600",
    },
    ContentRule {
        category: Category::InferenceAcceleration,
        keywords: &["multi-token", "并行", "speculative", "加速"],
        color: "emerald",
        tags: &["并行计算", "推测解码", "效率优化"],
        tag_colors: &["blue", "red", "yellow"],
        gradient: "from-emerald-600 to-teal-600",
    },
    ContentRule {
        category: Category::ModelTraining,
        keywords: &["training", "微调", "fine-tun", "训练"],
        color: "purple",
        tags: &["训练优化", "参数高效", "微调技术"],
        tag_colors: &["blue", "green", "purple"],
        gradient: "from-purple-600 to-indigo-600",
    },
    ContentRule {
        category: Category::ReasoningCapability,
        keywords: &["reasoning", "推理", "chain-of-thought", "思维链"],
        color: "orange",
        tags: &["逻辑推理", "思维链", "问题解决"],
        tag_colors: &["red", "orange", "yellow"],
        gradient: "from-orange-600 to-red-600",
    },
    ContentRule {
        category: Category::Multimodal,
        keywords: &["multimodal", "多模态", "vision", "视觉"],
        color: "pink",
        tags: &["视觉理解", "多模态融合", "跨模态"],
        tag_colors: &["pink", "purple", "blue"],
        gradient: "from-pink-600 to-purple-600",
    },
    ContentRule {
        category: Category::ModelArchitecture,
        keywords: &["architecture", "架构", "attention", "注意力"],
        color: "indigo",
        tags: &["架构设计", "注意力机制", "模型创新"],
        tag_colors: &["indigo", "blue", "purple"],
        gradient: "from-indigo-600 to-blue-600",
    },
];

pub static FALLBACK_RULE: ContentRule = ContentRule {
    category: Category::AiResearch,
    keywords: &[],
    color: "gray",
    tags: &["机器学习", "AI技术"],
    tag_colors: &["blue", "green"],
    gradient: "from-gray-600 to-gray-700",
};

pub fn evaluate(lowered: &str) -> &'static ContentRule {
    CONTENT_RULES
        .iter()
        .find(|rule| rule.matches(lowered))
        .unwrap_or(&FALLBACK_RULE)
}

#[cfg(test)]
fn rule_for(category: Category) -> &'static ContentRule {
    CONTENT_RULES
        .iter()
        .find(|rule| rule.category == category)
        .unwrap_or(&FALLBACK_RULE)
}

const REPORT_MARKERS: &[&str] = &["报告", "report"];
const TECH_MARKERS: &[&str] = &["tech", "技术"];
const ANALYSIS_MARKERS: &[&str] = &["分析", "analysis"];

/// A PDF gets `role` when its lowercased name hits every marker group.
#[derive(Debug, Clone, Copy)]
pub struct FilenameRule {
    pub role: AttachmentRole,
    pub all_of: &'static [&'static [&'static str]],
}

impl FilenameRule {
    pub fn matches(&self, lowered_name: &str) -> bool {
        self.all_of
            .iter()
            .all(|group| group.iter().any(|m| lowered_name.contains(m)))
    }
}

/// "分析报告" (analysis report) is an analysis report, not a generic one, so
/// the combined rule sits ahead of the plain report rule.
pub static PDF_RULES: [FilenameRule; 4] = [
    FilenameRule {
        role: AttachmentRole::AnalysisReport,
        all_of: &[ANALYSIS_MARKERS, REPORT_MARKERS],
    },
    FilenameRule {
        role: AttachmentRole::ResearchReport,
        all_of: &[REPORT_MARKERS],
    },
    FilenameRule {
        role: AttachmentRole::TechnicalReport,
        all_of: &[TECH_MARKERS],
    },
    FilenameRule {
        role: AttachmentRole::AnalysisReport,
        all_of: &[ANALYSIS_MARKERS],
    },
];

pub fn pdf_role(lowered_name: &str) -> AttachmentRole {
    PDF_RULES
        .iter()
        .find(|rule| rule.matches(lowered_name))
        .map(|rule| rule.role)
        .unwrap_or(AttachmentRole::OriginalDocument)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_has_aligned_tag_colors() {
        for rule in CONTENT_RULES.iter().chain(std::iter::once(&FALLBACK_RULE)) {
            assert_eq!(rule.tags.len(), rule.tag_colors.len(), "{}", rule.category);
        }
    }

    #[test]
    fn keywords_are_lowercase() {
        for rule in &CONTENT_RULES {
            for kw in rule.keywords {
                assert_eq!(*kw, kw.to_lowercase());
            }
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        assert_eq!(
            evaluate("memory-efficient training").category,
            Category::KvCacheOptimization
        );
        assert_eq!(
            evaluate("speculative decoding with reasoning").category,
            Category::InferenceAcceleration
        );
        assert_eq!(evaluate("").category, Category::AiResearch);
    }

    #[test]
    fn matched_keyword_reports_trigger() {
        let rule = rule_for(Category::ModelTraining);
        assert_eq!(rule.matched_keyword("lora fine-tuning"), Some("fine-tun"));
        assert_eq!(rule_for(Category::AiResearch).matched_keyword("anything"), None);
    }

    #[test]
    fn pdf_markers_in_priority_order() {
        assert_eq!(pdf_role("分析报告.pdf"), AttachmentRole::AnalysisReport);
        assert_eq!(pdf_role("analysis_report.pdf"), AttachmentRole::AnalysisReport);
        assert_eq!(pdf_role("研究报告.pdf"), AttachmentRole::ResearchReport);
        assert_eq!(pdf_role("tech-report.pdf"), AttachmentRole::ResearchReport);
        assert_eq!(pdf_role("技术细节.pdf"), AttachmentRole::TechnicalReport);
        assert_eq!(pdf_role("tech_analysis.pdf"), AttachmentRole::TechnicalReport);
        assert_eq!(pdf_role("深度分析.pdf"), AttachmentRole::AnalysisReport);
        assert_eq!(pdf_role("2412.19255v2.pdf"), AttachmentRole::OriginalDocument);
    }
}
