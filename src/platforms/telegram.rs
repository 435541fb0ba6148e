// src/platforms/telegram.rs
// =============================================================================
// Telegram: t.me serves a preview page for every name, but only real
// accounts get the full set of og:title, og:description and twitter:image.
// Anything less is treated as not found.
// =============================================================================

use super::page::Page;
use super::Extractor;
use crate::error::ProbeError;
use crate::probe::{Classification, Platform, Stats};

pub struct Telegram;

impl Extractor for Telegram {
    fn platform(&self) -> Platform {
        Platform::Telegram
    }

    fn canonical_url(&self, username: &str) -> String {
        format!("https://t.me/{username}")
    }

    fn classify(
        &self,
        body: &str,
        _status: u16,
        _username: &str,
    ) -> Result<Classification, ProbeError> {
        let page = Page::parse(body);
        let title = page.meta("og:title");
        let description = page.meta("og:description");
        let image = page.meta("twitter:image");

        match (title, description, image) {
            (Some(title), Some(description), Some(_)) => {
                let mut stats = Stats::new();
                stats.insert("Name".to_string(), title);
                stats.insert("Bio".to_string(), description);
                Ok(Classification::found(stats))
            }
            _ => Ok(Classification::not_found()),
        }
    }
}
