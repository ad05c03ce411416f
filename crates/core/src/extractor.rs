//! Pulls the title and a short description out of an analysis page.
//!
//! Parsing goes through html5ever (via `scraper`), which recovers from
//! malformed markup instead of failing; a missing tag is just "not present".

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

pub const TRUNCATION_MARKER: &str = "...";

static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static H1: Lazy<Selector> = Lazy::new(|| selector("h1"));
static META: Lazy<Selector> = Lazy::new(|| selector("meta[name][content]"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    /// `None` when neither `<title>` nor `<h1>` has text.
    pub title: Option<String>,
    pub description: String,
}

pub fn extract_text(html: &str, description_max_chars: usize) -> ExtractedText {
    let document = Html::parse_document(html);
    let title = first_text(&document, &TITLE).or_else(|| first_text(&document, &H1));
    let description = meta_description(&document)
        .or_else(|| first_text(&document, &PARAGRAPH))
        .map(|d| truncate_chars(&d, description_max_chars))
        .unwrap_or_default();
    ExtractedText { title, description }
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn meta_description(document: &Html) -> Option<String> {
    document
        .select(&META)
        .filter(|el| {
            el.value()
                .attr("name")
                .is_some_and(|n| n.trim().eq_ignore_ascii_case("description"))
        })
        .filter_map(|el| el.value().attr("content"))
        .map(collapse_whitespace)
        .find(|content| !content.is_empty())
}

fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to at most `max_chars` characters plus the marker. Counts
/// chars, so multibyte text is never split inside a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return text.to_string();
    }
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => {
            let mut out = text[..cut].trim_end().to_string();
            out.push_str(TRUNCATION_MARKER);
            out
        }
    }
}
