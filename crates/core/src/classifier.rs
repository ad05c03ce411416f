use crate::models::{AttachmentDescriptor, AttachmentRole, ClassificationResult, FileEntry};
use crate::rules::{self, ContentRule};
use std::collections::HashSet;

/// Classifies a paper from its title and description.
pub fn classify_paper(title: &str, description: &str) -> ClassificationResult {
    classify_text(&format!("{title} {description}"))
}

pub fn classify_text(text: &str) -> ClassificationResult {
    let lowered = text.to_lowercase();
    from_rule(rules::evaluate(&lowered))
}

fn from_rule(rule: &ContentRule) -> ClassificationResult {
    let (tags, tag_colors) = dedup_tags(rule.tags, rule.tag_colors);
    ClassificationResult {
        category: rule.category,
        category_label: rule.category.label().to_string(),
        color_key: rule.color.to_string(),
        tags,
        tag_colors,
        gradient_key: rule.gradient.to_string(),
    }
}

/// Drops repeated tags, keeping the first occurrence and its color.
fn dedup_tags(tags: &[&str], colors: &[&str]) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut out_tags = Vec::with_capacity(tags.len());
    let mut out_colors = Vec::with_capacity(tags.len());
    for (i, tag) in tags.iter().enumerate() {
        if !seen.insert(*tag) {
            continue;
        }
        out_tags.push(tag.to_string());
        out_colors.push(colors.get(i).copied().unwrap_or("gray").to_string());
    }
    (out_tags, out_colors)
}

/// Role of a file that is not the folder's primary analysis document.
pub fn attachment_role(file: &FileEntry) -> AttachmentRole {
    match file.extension.as_str() {
        ".html" => AttachmentRole::OtherAttachment,
        ".pdf" => rules::pdf_role(&file.name.to_lowercase()),
        _ => AttachmentRole::OtherAttachment,
    }
}

pub fn classify_attachment(file: &FileEntry) -> AttachmentDescriptor {
    AttachmentDescriptor::new(attachment_role(file), &file.name)
}

pub fn primary_descriptor(file: &FileEntry) -> AttachmentDescriptor {
    AttachmentDescriptor::new(AttachmentRole::PrimaryAnalysis, &file.name)
}
