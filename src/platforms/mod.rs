// src/platforms/mod.rs
// =============================================================================
// One detection rule per platform.
//
// Every platform implements the Extractor trait: it says which request to
// make and how to classify the response. Classification is a pure function
// of (body, status, username), so each extractor is tested against inline
// fixtures without touching the network.
//
// Submodules:
// - page: shared HTML helpers (meta tags, titles, regex captures)
// - one file per platform
//
// Rust concepts:
// - Traits with default methods: request() is shared unless overridden
// - Trait objects: Arc<dyn Extractor> lets different structs live in one map
// - Function pointers: fallback chains are plain slices of fn items
// =============================================================================

mod facebook;
mod instagram;
mod lemon8;
mod page;
mod telegram;
mod threads;
mod tiktok;
mod x;

use std::collections::HashMap;
use std::sync::Arc;

pub use facebook::Facebook;
pub use instagram::Instagram;
pub use lemon8::Lemon8;
pub use telegram::Telegram;
pub use threads::Threads;
pub use tiktok::Tiktok;
pub use x::X;

use crate::error::ProbeError;
use crate::probe::{Classification, Platform, ProbeRequest};

pub trait Extractor: Send + Sync {
    fn platform(&self) -> Platform;

    /// Canonical profile URL, recorded in the result.
    fn canonical_url(&self, username: &str) -> String;

    /// The request to issue. Defaults to a browser GET of the profile URL.
    fn request(&self, username: &str) -> ProbeRequest {
        ProbeRequest::get(self.canonical_url(username))
    }

    fn classify(
        &self,
        body: &str,
        status: u16,
        username: &str,
    ) -> Result<Classification, ProbeError>;
}

/// One step of a fallback chain. `None` means "try the next one".
pub(crate) type Strategy<T> = fn(&page::Page<'_>, &str) -> Option<T>;

/// Runs strategies in order; the first `Some` wins.
pub(crate) fn first_match<T>(
    strategies: &[Strategy<T>],
    page: &page::Page<'_>,
    username: &str,
) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(page, username))
}

/// Extractors keyed by platform.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<Platform, Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        ExtractorRegistry {
            extractors: HashMap::new(),
        }
    }

    /// All seven platforms against their real endpoints.
    pub fn standard() -> Self {
        let mut registry = ExtractorRegistry::empty();
        registry.register(Instagram);
        registry.register(Facebook);
        registry.register(Tiktok);
        registry.register(X::new());
        registry.register(Telegram);
        registry.register(Lemon8);
        registry.register(Threads);
        registry
    }

    /// Adds or replaces the extractor for its platform.
    pub fn register<E: Extractor + 'static>(&mut self, extractor: E) {
        self.extractors
            .insert(extractor.platform(), Arc::new(extractor));
    }

    pub fn get(&self, platform: Platform) -> Option<Arc<dyn Extractor>> {
        self.extractors.get(&platform).cloned()
    }

    /// Registered extractors in `Platform::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = Arc<dyn Extractor>> + '_ {
        Platform::ALL
            .iter()
            .filter_map(move |platform| self.get(*platform))
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is Arc<dyn Extractor>?
//    - `dyn Extractor` is a trait object: any type implementing the trait
//    - Arc lets the registry and the running probe share one instance
//
// 2. What is a Strategy?
//    - A plain function pointer, so a fallback chain is just a const slice
//    - find_map() stops at the first strategy that returns Some
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_covers_every_platform() {
        let registry = ExtractorRegistry::standard();
        assert_eq!(registry.len(), Platform::ALL.len());
        for platform in Platform::ALL {
            let extractor = registry.get(platform).unwrap();
            assert_eq!(extractor.platform(), platform);
        }
    }

    #[test]
    fn test_iter_follows_platform_order() {
        let registry = ExtractorRegistry::standard();
        let order: Vec<_> = registry.iter().map(|e| e.platform()).collect();
        assert_eq!(order, Platform::ALL.to_vec());
    }

    #[test]
    fn test_canonical_urls() {
        let registry = ExtractorRegistry::standard();
        let url = |p| registry.get(p).unwrap().canonical_url("alice");
        assert_eq!(url(Platform::Instagram), "https://www.instagram.com/alice");
        assert_eq!(url(Platform::Facebook), "https://www.facebook.com/alice");
        assert_eq!(url(Platform::Tiktok), "https://www.tiktok.com/@alice");
        assert_eq!(url(Platform::X), "https://x.com/alice");
        assert_eq!(url(Platform::Telegram), "https://t.me/alice");
        assert_eq!(url(Platform::Lemon8), "https://www.lemon8-app.com/@alice");
        assert_eq!(url(Platform::Threads), "https://www.threads.net/@alice");
    }

    /// found == false must always come with empty stats, whatever the page.
    #[test]
    fn test_not_found_never_carries_stats() {
        let bodies = [
            "",
            "<html><head><title>Instagram</title></head></html>",
            r#"<meta property="og:title" content="x"><meta property="og:description" content="y">"#,
            r#"{"data":{}}"#,
            r#"<div class="user-desc-main-info"><span>12 followers</span></div>"#,
        ];
        let registry = ExtractorRegistry::standard();
        for extractor in registry.iter() {
            for status in [200, 301, 404] {
                for body in bodies {
                    if let Ok(classification) = extractor.classify(body, status, "alice") {
                        if !classification.is_found() {
                            assert!(
                                classification.stats().is_empty(),
                                "{} returned stats with found=false",
                                extractor.platform()
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_classification_is_repeatable() {
        let body = r#"<meta property="og:title" content="Alice">
            <meta property="og:description" content="bio">
            <meta property="twitter:image" content="a.jpg">"#;
        let registry = ExtractorRegistry::standard();
        let telegram = registry.get(Platform::Telegram).unwrap();
        let first = telegram.classify(body, 200, "alice").unwrap();
        let second = telegram.classify(body, 200, "alice").unwrap();
        assert_eq!(first, second);
    }
}
