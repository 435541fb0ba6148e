// src/platforms/x.rs
// =============================================================================
// X (Twitter): profiles are looked up through the web client's GraphQL
// `UserByScreenName` query. Unlike the HTML platforms there is no fallback:
// if the JSON does not have the shape we expect, that is reported as an
// error instead of a guess.
//
// The query id and feature flags belong to x.com and change without notice.
// =============================================================================

use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::Extractor;
use crate::error::ProbeError;
use crate::probe::{Classification, HeaderProfile, Platform, ProbeRequest, Stats};

pub const GRAPHQL_ENDPOINT: &str =
    "https://x.com/i/api/graphql/xmU6X_CKVnQ5lSrCbAmJsg/UserByScreenName";

pub struct X {
    endpoint: String,
}

impl X {
    pub fn new() -> Self {
        X::with_endpoint(GRAPHQL_ENDPOINT)
    }

    /// Points the probe at another GraphQL endpoint, e.g. a local mock.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        X {
            endpoint: endpoint.into(),
        }
    }

    fn query_url(&self, username: &str) -> String {
        let variables = json!({
            "screen_name": username,
            "withSafetyModeUserFields": true,
        });
        let features = json!({
            "hidden_profile_likes_enabled": true,
            "hidden_profile_subscriptions_enabled": true,
            "responsive_web_graphql_exclude_directive_enabled": true,
            "verified_phone_label_enabled": false,
            "subscriptions_verification_info_is_identity_verified_enabled": true,
            "subscriptions_verification_info_verified_since_enabled": true,
            "highlights_tweets_tab_ui_enabled": true,
            "responsive_web_twitter_article_notes_tab_enabled": true,
            "creator_subscriptions_tweet_preview_api_enabled": true,
            "responsive_web_graphql_skip_user_profile_image_extensions_enabled": false,
            "responsive_web_graphql_timeline_navigation_enabled": true,
        });
        let params = [
            ("variables", variables.to_string()),
            ("features", features.to_string()),
        ];

        match Url::parse_with_params(&self.endpoint, &params) {
            Ok(url) => url.to_string(),
            // Only reachable with a broken custom endpoint; the fetcher will
            // report it as a transport failure.
            Err(_) => self.endpoint.clone(),
        }
    }
}

impl Default for X {
    fn default() -> Self {
        X::new()
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Data,
}

#[derive(Debug, Deserialize)]
struct Data {
    #[serde(default)]
    user: Option<UserSlot>,
}

#[derive(Debug, Deserialize)]
struct UserSlot {
    #[serde(default)]
    result: Option<UserResult>,
}

#[derive(Debug, Deserialize)]
struct UserResult {
    core: UserCore,
    legacy: UserLegacy,
}

#[derive(Debug, Deserialize)]
struct UserCore {
    screen_name: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct UserLegacy {
    friends_count: u64,
    followers_count: u64,
}

impl Extractor for X {
    fn platform(&self) -> Platform {
        Platform::X
    }

    fn canonical_url(&self, username: &str) -> String {
        format!("https://x.com/{username}")
    }

    fn request(&self, username: &str) -> ProbeRequest {
        ProbeRequest::get(self.query_url(username)).with_headers(HeaderProfile::X)
    }

    fn classify(
        &self,
        body: &str,
        status: u16,
        _username: &str,
    ) -> Result<Classification, ProbeError> {
        match status {
            200 => {}
            404 => return Ok(Classification::not_found()),
            other => {
                return Err(ProbeError::unexpected(
                    Platform::X,
                    format!("GraphQL endpoint answered HTTP {other}"),
                ))
            }
        }

        let envelope: Envelope = serde_json::from_str(body)
            .map_err(|e| ProbeError::unexpected(Platform::X, format!("malformed JSON: {e}")))?;

        let Some(user) = envelope.data.user.and_then(|slot| slot.result) else {
            return Ok(Classification::not_found());
        };

        let mut stats = Stats::new();
        stats.insert("Username".to_string(), user.core.screen_name);
        stats.insert("Name".to_string(), user.core.name);
        stats.insert("Following".to_string(), user.legacy.friends_count.to_string());
        stats.insert("Followers".to_string(), user.legacy.followers_count.to_string());
        Ok(Classification::found(stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUND: &str = r#"{"data":{"user":{"result":{
        "__typename":"User",
        "core":{"screen_name":"alice","name":"Alice"},
        "legacy":{"friends_count":12,"followers_count":3400}
    }}}}"#;

    #[test]
    fn test_user_object_is_found() {
        let result = X::new().classify(FOUND, 200, "alice").unwrap();
        assert!(result.is_found());
        assert_eq!(result.stats()["Username"], "alice");
        assert_eq!(result.stats()["Name"], "Alice");
        assert_eq!(result.stats()["Following"], "12");
        assert_eq!(result.stats()["Followers"], "3400");
    }

    #[test]
    fn test_empty_data_is_not_found() {
        let result = X::new().classify(r#"{"data":{}}"#, 200, "alice").unwrap();
        assert!(!result.is_found());
        let result = X::new().classify(r#"{"data":{"user":{}}}"#, 200, "alice").unwrap();
        assert!(!result.is_found());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = X::new().classify("<html>", 200, "alice").unwrap_err();
        assert!(matches!(err, ProbeError::UnexpectedResponseShape { .. }));
    }

    #[test]
    fn test_missing_fields_is_an_error() {
        let body = r#"{"data":{"user":{"result":{"core":{"screen_name":"alice"}}}}}"#;
        let err = X::new().classify(body, 200, "alice").unwrap_err();
        assert!(matches!(err, ProbeError::UnexpectedResponseShape { .. }));
    }

    #[test]
    fn test_forbidden_is_an_error() {
        let err = X::new().classify("{}", 403, "alice").unwrap_err();
        assert!(matches!(err, ProbeError::UnexpectedResponseShape { .. }));
    }

    #[test]
    fn test_query_uses_input_username() {
        let request = X::new().request("alice_w");
        let url = Url::parse(&request.url).unwrap();
        let variables = url
            .query_pairs()
            .find(|(key, _)| key == "variables")
            .map(|(_, value)| value.into_owned())
            .unwrap();
        let variables: serde_json::Value = serde_json::from_str(&variables).unwrap();
        assert_eq!(variables["screen_name"], "alice_w");
        assert_eq!(request.headers, HeaderProfile::X);
    }
}
