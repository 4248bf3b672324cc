//! Notes and resources arrive as backend-rendered HTML, or as raw markdown on
//! older sessions. Both are sanitized before they reach the webview.

use std::collections::{HashMap, HashSet};

#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
    options.insert(pulldown_cmark::Options::ENABLE_TABLES);
    options.insert(pulldown_cmark::Options::ENABLE_TASKLISTS);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "h1", "h2", "h3", "h4", "h5", "h6", "p", "div", "span", "br", "hr", "em", "strong", "b",
        "i", "del", "code", "pre", "blockquote", "ul", "ol", "li", "a", "table", "thead",
        "tbody", "tr", "th", "td",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href", "title"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .link_rel(Some("noopener noreferrer"))
        .clean(html)
        .to_string()
}

#[must_use]
pub fn looks_like_html(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    let Some(start) = lower.find('<') else {
        return false;
    };
    if !lower[start + 1..].contains('>') {
        return false;
    }

    let tags = [
        "<p", "<div", "<span", "<br", "<a ", "<h1", "<h2", "<h3", "<ul", "<ol", "<li", "<table",
        "<strong", "<em",
    ];
    tags.iter().any(|tag| lower.contains(tag))
}

/// Safe HTML for a notes or resources pane.
#[must_use]
pub fn render_rich_text(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    if looks_like_html(input) {
        sanitize_html(input)
    } else {
        markdown_to_html(input)
    }
}

/// Markdown for export; HTML is converted, markdown passes through.
#[must_use]
pub fn rich_text_to_markdown(input: &str) -> String {
    if looks_like_html(input) {
        normalize_markdown(&html2md::parse_html(input))
    } else {
        normalize_markdown(input)
    }
}

#[must_use]
pub fn normalize_markdown(input: &str) -> String {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = Vec::new();
    let mut blank_streak = 0usize;

    for line in normalized.trim().split('\n') {
        let trimmed = line.trim_end_matches([' ', '\t']);
        if trimmed.is_empty() {
            blank_streak += 1;
            if blank_streak > 1 {
                continue;
            }
        } else {
            blank_streak = 0;
        }
        lines.push(trimmed);
    }

    let mut output = lines.join("\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output
}
