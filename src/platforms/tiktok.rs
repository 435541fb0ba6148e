// src/platforms/tiktok.rs
// =============================================================================
// TikTok: the profile page embeds a "shareMeta" object in its hydration
// script. That script is not standalone JSON, so the title/desc pair is
// pulled out with a regex and the desc sentence is mined for the counts:
//
//   "John @john123 1.2M Followers 300 Following 5K Likes"
//
// Counts keep their k/m suffix as served.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;

use super::page::{capture, count_or_zero, decode_json_string};
use super::Extractor;
use crate::error::ProbeError;
use crate::probe::{Classification, Platform, Stats};

// Both values are JSON string literals: a capture runs to the first quote
// that is not escaped.
static SHARE_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#""shareMeta"\s*:\s*\{\s*"title"\s*:\s*"((?:[^"\\]|\\.)*)"\s*,\s*"desc"\s*:\s*"((?:[^"\\]|\\.)*)""#,
    )
    .expect("valid regex")
});
static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(@[A-Za-z0-9_.]+)").expect("valid regex"));
static FOLLOWERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d[\d.,]*[km]?)\s+followers").expect("valid regex"));
static FOLLOWING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d[\d.,]*[km]?)\s+following").expect("valid regex"));
static LIKES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d[\d.,]*[km]?)\s+likes").expect("valid regex"));

pub struct Tiktok;

impl Extractor for Tiktok {
    fn platform(&self) -> Platform {
        Platform::Tiktok
    }

    fn canonical_url(&self, username: &str) -> String {
        format!("https://www.tiktok.com/@{username}")
    }

    fn classify(
        &self,
        body: &str,
        _status: u16,
        _username: &str,
    ) -> Result<Classification, ProbeError> {
        let Some(caps) = SHARE_META_RE.captures(body) else {
            return Ok(Classification::not_found());
        };
        // Group 2 is the desc, still JSON-escaped (\" and \uXXXX)
        let desc = caps
            .get(2)
            .map(|m| decode_json_string(m.as_str()))
            .unwrap_or_default();
        Ok(Classification::found(parse_desc(&desc)))
    }
}

fn parse_desc(desc: &str) -> Stats {
    let mut stats = Stats::new();
    stats.insert(
        "Username".to_string(),
        capture(&HANDLE_RE, desc).unwrap_or_else(|| "@UNKNOWN".to_string()),
    );
    stats.insert("Followers".to_string(), count_or_zero(&FOLLOWERS_RE, desc));
    stats.insert("Following".to_string(), count_or_zero(&FOLLOWING_RE, desc));
    stats.insert("Likes".to_string(), count_or_zero(&LIKES_RE, desc));
    stats
}
