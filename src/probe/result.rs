// src/probe/result.rs
// =============================================================================
// The uniform result model every extractor feeds into.
//
// A ProbeResult can only be built from a Classification, and a not-found
// Classification carries no stats, so `found == false` always means an empty
// stats map.
//
// Rust concepts:
// - Private fields + constructors: callers cannot build an invalid Classification
// - serde attributes: camelCase keys, empty stats left out of the JSON
// =============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platforms the tool knows how to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Facebook,
    Tiktok,
    X,
    Telegram,
    Lemon8,
    Threads,
}

impl Platform {
    /// Every platform, in the order results are announced.
    pub const ALL: [Platform; 7] = [
        Platform::Instagram,
        Platform::Facebook,
        Platform::Tiktok,
        Platform::X,
        Platform::Telegram,
        Platform::Lemon8,
        Platform::Threads,
    ];

    /// Lowercase identifier, matches the serialized form.
    pub fn id(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Tiktok => "tiktok",
            Platform::X => "x",
            Platform::Telegram => "telegram",
            Platform::Lemon8 => "lemon8",
            Platform::Threads => "threads",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Tiktok => "TikTok",
            Platform::X => "X (Twitter)",
            Platform::Telegram => "Telegram",
            Platform::Lemon8 => "Lemon8",
            Platform::Threads => "Threads",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Profile statistics. Keys vary per platform (Followers, Following, Name...).
pub type Stats = BTreeMap<String, String>;

/// What an extractor decided about one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    found: bool,
    stats: Stats,
}

impl Classification {
    pub fn found(stats: Stats) -> Self {
        Classification { found: true, stats }
    }

    /// Found, but nothing structured could be recovered.
    pub fn found_bare() -> Self {
        Classification::found(Stats::new())
    }

    pub fn not_found() -> Self {
        Classification {
            found: false,
            stats: Stats::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        self.found
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}

/// The immutable input for one run.
#[derive(Debug, Clone)]
pub struct AccountQuery {
    pub username: String,
    pub output_path: Option<PathBuf>,
}

/// Output of one platform check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub platform: Platform,
    pub username: String,
    pub found: bool,
    /// Canonical profile URL for the platform
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stats: Stats,
    pub checked_at: DateTime<Utc>,
}

impl ProbeResult {
    pub fn new(
        platform: Platform,
        username: &str,
        url: String,
        classification: Classification,
    ) -> Self {
        ProbeResult::at(platform, username, url, classification, Utc::now())
    }

    pub fn at(
        platform: Platform,
        username: &str,
        url: String,
        classification: Classification,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let Classification { found, stats } = classification;
        ProbeResult {
            platform,
            username: username.to_string(),
            found,
            url,
            stats,
            checked_at,
        }
    }
}
