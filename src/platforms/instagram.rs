// src/platforms/instagram.rs
// =============================================================================
// Instagram: profile pages carry the counts in og:description, e.g.
//
//   "1,234 Followers, 56 Following, 78 Posts - See Instagram photos and
//    videos from Alice (@alice)"
//
// When that tag is missing or is about someone else we fall back to the raw
// <title>. A title of exactly "Instagram" is the login wall served for
// unknown accounts.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::page::{count_or_zero, Page};
use super::{first_match, Extractor, Strategy};
use crate::error::ProbeError;
use crate::probe::{Classification, HeaderProfile, Platform, ProbeRequest, Stats};

static FOLLOWERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d.,]+[KkMm]?)\s+Followers").expect("valid regex"));
static FOLLOWING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d.,]+[KkMm]?)\s+Following").expect("valid regex"));
static POSTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d.,]+[KkMm]?)\s+Posts").expect("valid regex"));

const PROFILE_TITLE_MARKER: &str = "Instagram photos and videos";

const STRATEGIES: &[Strategy<Classification>] = &[from_og_description, from_title];

pub struct Instagram;

impl Extractor for Instagram {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn canonical_url(&self, username: &str) -> String {
        format!("https://www.instagram.com/{username}")
    }

    fn request(&self, username: &str) -> ProbeRequest {
        ProbeRequest::get(self.canonical_url(username)).with_headers(HeaderProfile::Instagram)
    }

    fn classify(
        &self,
        body: &str,
        _status: u16,
        username: &str,
    ) -> Result<Classification, ProbeError> {
        let page = Page::parse(body);
        Ok(first_match(STRATEGIES, &page, username).unwrap_or_else(Classification::not_found))
    }
}

// Characters Instagram allows inside a handle. A '.' only counts when another
// handle character follows it, so "(@alice." still ends the handle.
fn continues_handle(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => true,
        Some('.') => chars
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

// `text` is a decoded meta value, so `&#064;` has already become '@'.
fn mentions(text: &str, username: &str) -> bool {
    let handle = format!("@{username}");
    text.match_indices(&handle)
        .any(|(idx, _)| !continues_handle(&text[idx + handle.len()..]))
}

fn from_og_description(page: &Page<'_>, username: &str) -> Option<Classification> {
    let description = page.meta("og:description")?;
    if !mentions(&description, username) {
        debug!(%username, "og:description does not mention the username");
        return None;
    }

    let mut stats = Stats::new();
    stats.insert("Followers".to_string(), count_or_zero(&FOLLOWERS_RE, &description));
    stats.insert("Following".to_string(), count_or_zero(&FOLLOWING_RE, &description));
    stats.insert("Posts".to_string(), count_or_zero(&POSTS_RE, &description));
    Some(Classification::found(stats))
}

fn from_title(page: &Page<'_>, username: &str) -> Option<Classification> {
    let title = page.raw_title()?;
    if title == "Instagram" {
        return Some(Classification::not_found());
    }

    // The raw title keeps entities, and the handle is always closed by ')'
    let handle = format!("&#064;{username})");
    let literal = format!("@{username})");
    if (title.contains(&handle) || title.contains(&literal)) && title.contains(PROFILE_TITLE_MARKER)
    {
        return Some(Classification::found_bare());
    }

    debug!(%username, title, "unrecognized Instagram title");
    None
}
