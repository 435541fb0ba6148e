// src/platforms/page.rs
// =============================================================================
// Read-only view over a fetched HTML page, shared by the extractors.
//
// We use the `scraper` crate for anything DOM shaped (meta tags, profile
// nodes) and keep the raw body around for the checks that must see markup
// exactly as served, e.g. HTML entities like `&#064;` inside <title>.
//
// Rust concepts:
// - Lifetimes: Page<'a> borrows the body instead of copying it
// - LazyLock statics elsewhere compile each regex once, on first use
// =============================================================================

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

pub struct Page<'a> {
    raw: &'a str,
    document: Html,
}

impl<'a> Page<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Page {
            raw,
            document: Html::parse_document(raw),
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Content of `<meta property=KEY>` or `<meta name=KEY>`, entity-decoded.
    pub fn meta(&self, key: &str) -> Option<String> {
        let selector =
            Selector::parse(&format!(r#"meta[property="{key}"], meta[name="{key}"]"#)).ok()?;
        self.document
            .select(&selector)
            .find_map(|element| element.value().attr("content"))
            .map(|content| content.trim().to_string())
    }

    /// Text between the first `<title>` and `</title>`, exactly as served.
    pub fn raw_title(&self) -> Option<&'a str> {
        let start = self.raw.find("<title>")? + "<title>".len();
        let end = start + self.raw[start..].find("</title>")?;
        Some(self.raw[start..end].trim())
    }

    /// Decoded, whitespace-collapsed text of the `<title>` element.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.document
            .select(&selector)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
    }

    pub fn first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.document.select(selector).next()
    }
}

/// All descendant text of an element, whitespace collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First capture group of `re` in `text`.
pub fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First capture group of `re`, decoded as the body of a JSON string literal.
///
/// Embedded page JSON escapes quotes and non-ASCII (`\"`, `\u00e9`), so the
/// capture is fed back through serde_json. A capture that is not valid JSON
/// string content is returned as matched.
pub fn capture_json_string(re: &Regex, text: &str) -> Option<String> {
    capture(re, text).map(|raw| decode_json_string(&raw))
}

/// Decodes the inside of a JSON string literal (no surrounding quotes).
pub fn decode_json_string(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}

/// First capture group of `re`, or "0" when the count is absent.
pub fn count_or_zero(re: &Regex, text: &str) -> String {
    capture(re, text).unwrap_or_else(|| "0".to_string())
}

/// Drops a trailing " • ..." suffix from a page title.
pub fn strip_title_suffix(title: &str) -> &str {
    match title.find(" • ") {
        Some(idx) => title[..idx].trim(),
        None => title.trim(),
    }
}
