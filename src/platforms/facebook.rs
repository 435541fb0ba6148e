// src/platforms/facebook.rs
// =============================================================================
// Facebook: an existing vanity URL serves a 200 page whose embedded JSON
// contains "userVanity". Unknown or renamed accounts redirect, so redirects
// are never followed and any 3xx reads as not found.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;

use super::page::capture_json_string;
use super::Extractor;
use crate::error::ProbeError;
use crate::probe::{Classification, Platform, ProbeRequest, Stats};

// The name sits in embedded JSON, so the capture runs to the closing quote
// and skips escaped ones (`\"`).
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""name"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid regex")
});

const VANITY_MARKER: &str = "\"userVanity\"";
const PROFILE_MARKER: &str = "content=\"profile\"";

pub struct Facebook;

impl Extractor for Facebook {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    fn canonical_url(&self, username: &str) -> String {
        format!("https://www.facebook.com/{username}")
    }

    fn request(&self, username: &str) -> ProbeRequest {
        ProbeRequest::get(self.canonical_url(username)).without_redirects()
    }

    fn classify(
        &self,
        body: &str,
        status: u16,
        _username: &str,
    ) -> Result<Classification, ProbeError> {
        if status != 200 {
            return Ok(Classification::not_found());
        }

        // A vanity marker means a live profile; the display name is a bonus
        if body.contains(VANITY_MARKER) {
            let name =
                capture_json_string(&NAME_RE, body).unwrap_or_else(|| "Unknown".to_string());
            let mut stats = Stats::new();
            stats.insert("Name".to_string(), name);
            return Ok(Classification::found(stats));
        }

        // Older layouts only tag the page type
        if body.contains(PROFILE_MARKER) {
            return Ok(Classification::found_bare());
        }

        Ok(Classification::not_found())
    }
}
