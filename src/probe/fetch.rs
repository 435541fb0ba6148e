// src/probe/fetch.rs
// =============================================================================
// The fetcher issues exactly one GET per platform and hands back the raw
// status and body.
//
// Key functionality:
// - Per-platform header profiles (user agent, accept headers, X bearer)
// - Per-request redirect policy: some platforms are classified on the 3xx
//   response itself, so following has to be switched off for them
// - Mandatory timeouts, no retries
// - Transport failures are categorized (timeout, DNS, TLS...) the same way
//   for every platform
//
// reqwest fixes the redirect policy when the Client is built, so the fetcher
// keeps two clients with identical settings apart from redirects.
//
// Rust concepts:
// - Builder pattern: Client::builder() configures timeouts and redirects
// - Clone on Client is cheap (it is an Arc inside), so Fetcher derives Clone
// - map_err + ?: converts reqwest::Error into our ProbeError and returns early
// =============================================================================

use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE,
    USER_AGENT,
};
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::debug;

use crate::error::{ProbeError, TransportKind};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Bearer token shipped with the public x.com web client.
const X_WEB_BEARER: &str = "Bearer AAAAAAAAAAAAAAAAAAAAANRILgAAAAAAnNwIzUejRCOuH5E6I8xnZz4puTs\
     %3D1Zv7ttfk8LF81IUq16cHjhLTvJu4FA33AGWWjCpTnA";

const MAX_REDIRECTS: usize = 10;
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which set of request headers a platform expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProfile {
    /// A desktop browser asking for HTML
    Browser,
    /// Browser headers plus the fetch metadata Instagram checks for
    Instagram,
    /// JSON headers plus the public web-client bearer for the GraphQL API
    X,
}

impl HeaderProfile {
    pub fn headers(&self) -> HeaderMap {
        // Every profile starts from the same user agent and language
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9,id;q=0.8"),
        );

        match self {
            HeaderProfile::Browser => {
                headers.insert(
                    ACCEPT,
                    HeaderValue::from_static(
                        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                    ),
                );
            }
            HeaderProfile::Instagram => {
                headers.insert(
                    ACCEPT,
                    HeaderValue::from_static(
                        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                    ),
                );
                headers.insert(
                    HeaderName::from_static("sec-fetch-dest"),
                    HeaderValue::from_static("document"),
                );
                headers.insert(
                    HeaderName::from_static("sec-fetch-mode"),
                    HeaderValue::from_static("navigate"),
                );
                headers.insert(
                    HeaderName::from_static("sec-fetch-site"),
                    HeaderValue::from_static("none"),
                );
            }
            HeaderProfile::X => {
                headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                headers.insert(AUTHORIZATION, HeaderValue::from_static(X_WEB_BEARER));
                headers.insert(
                    HeaderName::from_static("x-twitter-active-user"),
                    HeaderValue::from_static("yes"),
                );
                headers.insert(
                    HeaderName::from_static("x-twitter-client-language"),
                    HeaderValue::from_static("en"),
                );
            }
        }

        headers
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectPolicy {
    Follow,
    /// Return the 3xx response as-is
    Manual,
}

/// Everything the fetcher needs to issue one probe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub url: String,
    pub headers: HeaderProfile,
    pub redirects: RedirectPolicy,
}

impl ProbeRequest {
    pub fn get(url: impl Into<String>) -> Self {
        ProbeRequest {
            url: url.into(),
            headers: HeaderProfile::Browser,
            redirects: RedirectPolicy::Follow,
        }
    }

    pub fn with_headers(mut self, headers: HeaderProfile) -> Self {
        self.headers = headers;
        self
    }

    pub fn without_redirects(mut self) -> Self {
        self.redirects = RedirectPolicy::Manual;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP transport for all probes. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Fetcher {
    following: Client,
    manual: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let following = build_client(timeout, Policy::limited(MAX_REDIRECTS))?;
        let manual = build_client(timeout, Policy::none())?;
        Ok(Fetcher { following, manual })
    }

    pub async fn fetch(&self, request: &ProbeRequest) -> Result<RawResponse, ProbeError> {
        // Pick the client whose redirect policy matches the request
        let client = match request.redirects {
            RedirectPolicy::Follow => &self.following,
            RedirectPolicy::Manual => &self.manual,
        };

        let response = client
            .get(&request.url)
            .headers(request.headers.headers())
            .send()
            .await
            .map_err(|e| categorize_error(&request.url, e))?;

        // Non-2xx is not an error here: the extractor decides what it means
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| categorize_error(&request.url, e))?;

        debug!(url = %request.url, status, bytes = body.len(), "fetched");
        Ok(RawResponse { status, body })
    }
}

fn build_client(timeout: Duration, redirects: Policy) -> Result<Client, ProbeError> {
    Client::builder()
        .timeout(timeout)
        // Connect timeout: at most 10s, never more than the overall timeout
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .redirect(redirects)
        .build()
        .map_err(ProbeError::Client)
}

// Maps reqwest's error flags onto a TransportKind. DNS and TLS failures only
// show up in the message text.
fn categorize_error(url: &str, error: reqwest::Error) -> ProbeError {
    let message = error.to_string();
    let lowered = message.to_lowercase();

    let kind = if error.is_timeout() {
        TransportKind::Timeout
    } else if error.is_redirect() {
        TransportKind::TooManyRedirects
    } else if error.is_connect() {
        // reqwest has no is_dns()/is_tls(), so look at the message
        if lowered.contains("dns") {
            TransportKind::Dns
        } else if lowered.contains("certificate") || lowered.contains("tls") {
            TransportKind::Tls
        } else {
            TransportKind::Connect
        }
    } else if lowered.contains("certificate") || lowered.contains("ssl") {
        TransportKind::Tls
    } else if error.is_body() || error.is_decode() {
        TransportKind::Body
    } else {
        TransportKind::Other
    };

    ProbeError::Transport {
        url: url.to_string(),
        kind,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> Fetcher {
        Fetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_manual_redirects_return_3xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alice"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "/login"),
            )
            .mount(&server)
            .await;

        let request = ProbeRequest::get(format!("{}/alice", server.uri())).without_redirects();
        let response = fetcher().fetch(&request).await.unwrap();
        assert_eq!(response.status, 301);
    }

    #[tokio::test]
    async fn test_follow_reaches_final_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alice"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("location", "/profile/alice"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/profile/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>alice</html>"))
            .mount(&server)
            .await;

        let request = ProbeRequest::get(format!("{}/alice", server.uri()));
        let response = fetcher().fetch(&request).await.unwrap();
        assert_eq!(response.status, 200);
        assert!(response.body.contains("alice"));
    }

    #[tokio::test]
    async fn test_slow_server_is_a_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(Duration::from_millis(300)).unwrap();
        let request = ProbeRequest::get(server.uri());
        match fetcher.fetch(&request).await {
            Err(ProbeError::Transport { kind, .. }) => assert_eq!(kind, TransportKind::Timeout),
            other => panic!("expected a timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_x_profile_sends_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header_exists("authorization"))
            .and(header("x-twitter-active-user", "yes"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let request = ProbeRequest::get(server.uri()).with_headers(HeaderProfile::X);
        let response = fetcher().fetch(&request).await.unwrap();
        assert_eq!(response.status, 200);
    }

    #[test]
    fn test_browser_profile_has_user_agent() {
        let headers = HeaderProfile::Browser.headers();
        assert_eq!(headers.get(USER_AGENT).unwrap(), BROWSER_USER_AGENT);
        assert!(headers.get(AUTHORIZATION).is_none());
    }
}
