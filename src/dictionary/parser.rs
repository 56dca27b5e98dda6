//! Extraction of dictionary entries from a result page
//!
//! Each article on the page sits in a `<div class="text">` block. The
//! headword is the first bold run of the block.

use std::sync::OnceLock;

use regex::Regex;

use super::DictionaryEntry;

fn div_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<(/?)div\b([^>]*)>").expect("valid div pattern"))
}

fn class_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("valid class pattern")
    })
}

fn line_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>|</?(p|div|li)\b[^>]*>").expect("valid break pattern"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag pattern"))
}

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<b\b[^>]*>(.*?)</b>").expect("valid bold pattern"))
}

/// Parse every article block of a result page
pub fn parse_entries(html: &str) -> Vec<DictionaryEntry> {
    text_blocks(html)
        .into_iter()
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            let text = block_to_text(block);
            let headword = headword(block, &text);
            DictionaryEntry {
                html: block.to_string(),
                text,
                headword,
                saved: false,
            }
        })
        .collect()
}

/// Inner HTML of every `<div class="text">` in document order
///
/// A text block nested in another one is returned as well as the outer
/// block that contains it.
fn text_blocks(html: &str) -> Vec<&str> {
    // (start of inner html, whether the div is a text block) per open div
    let mut open: Vec<(usize, bool)> = Vec::new();
    let mut blocks: Vec<(usize, &str)> = Vec::new();

    for caps in div_tag_re().captures_iter(html) {
        let Some(tag) = caps.get(0) else { continue };
        let closing = caps.get(1).map_or(false, |m| !m.as_str().is_empty());

        if closing {
            // Stray closing tags outside any div are ignored
            if let Some((start, true)) = open.pop() {
                blocks.push((start, &html[start..tag.start()]));
            }
        } else {
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            open.push((tag.end(), has_text_class(attrs)));
        }
    }

    // Inner blocks close first
    blocks.sort_by_key(|(start, _)| *start);
    blocks.into_iter().map(|(_, block)| block).collect()
}

fn has_text_class(attrs: &str) -> bool {
    class_attr_re().captures(attrs).map_or(false, |caps| {
        let classes = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map_or("", |m| m.as_str());
        classes.split_whitespace().any(|c| c == "text")
    })
}

/// Readable text of an HTML fragment, one line per `<br>`
pub fn block_to_text(html: &str) -> String {
    let with_breaks = line_break_re().replace_all(html, "\n");
    let stripped = tag_re().replace_all(&with_breaks, "");
    let decoded = html_escape::decode_html_entities(&stripped);

    decoded
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// First bold run of the block, or the first word of its text
fn headword(html: &str, text: &str) -> String {
    let bold = bold_re()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| block_to_text(m.as_str()))
        .filter(|b| !b.is_empty());

    match bold {
        Some(b) => b,
        None => text.split_whitespace().next().unwrap_or_default().to_string(),
    }
}
