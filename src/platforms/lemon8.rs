// src/platforms/lemon8.rs
// =============================================================================
// Lemon8: the server-rendered profile header has a container with the
// display name and a row of labeled stat items ("12 followers"). The page
// may come back localized, so labels are matched in English and Indonesian.
// =============================================================================

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use super::page::{element_text, Page};
use super::Extractor;
use crate::error::ProbeError;
use crate::probe::{Classification, Platform, Stats};

static PROFILE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".user-desc").expect("valid selector"));
static NAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".user-desc-base-name, .user-desc-name").expect("valid selector")
});
static STAT_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".user-desc-main-info-item").expect("valid selector"));
static STAT_COUNT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".user-desc-main-info-item-count").expect("valid selector")
});
static STAT_LABEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".user-desc-main-info-item-label").expect("valid selector")
});

/// Stats key and the labels that map onto it.
const LABELS: &[(&str, &[&str])] = &[
    ("Following", &["following", "mengikuti"]),
    ("Followers", &["followers", "pengikut"]),
    ("Likes & Saves", &["likes and saves", "suka dan simpanan"]),
];

pub struct Lemon8;

impl Extractor for Lemon8 {
    fn platform(&self) -> Platform {
        Platform::Lemon8
    }

    fn canonical_url(&self, username: &str) -> String {
        format!("https://www.lemon8-app.com/@{username}")
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

        let page = Page::parse(body);
        let Some(profile) = page.first(&PROFILE) else {
            return Ok(Classification::not_found());
        };

        let mut stats = Stats::new();
        let name = profile
            .select(&NAME)
            .next()
            .map(element_text)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        stats.insert("Name".to_string(), name);

        for (key, _) in LABELS {
            stats.insert(key.to_string(), "0".to_string());
        }
        for item in profile.select(&STAT_ITEM) {
            if let Some((key, count)) = read_stat(item) {
                stats.insert(key.to_string(), count);
            }
        }

        Ok(Classification::found(stats))
    }
}

// An item either has separate count/label children or reads "12 followers".
fn read_stat(item: ElementRef<'_>) -> Option<(&'static str, String)> {
    let (count, label) = match (item.select(&STAT_COUNT).next(), item.select(&STAT_LABEL).next())
    {
        (Some(count), Some(label)) => (element_text(count), element_text(label)),
        _ => {
            let text = element_text(item);
            let (count, label) = text.split_once(' ')?;
            (count.to_string(), label.to_string())
        }
    };

    let label = label.trim().to_lowercase();
    LABELS
        .iter()
        .find(|(_, names)| names.contains(&label.as_str()))
        .map(|(key, _)| (*key, count.trim().to_string()))
}
