// src/probe/runner.rs
// =============================================================================
// The runner probes every registered platform for one username.
//
// How it works:
// 1. Build one future per platform: fetch, then classify
// 2. Run up to `threads` of them at once with buffer_unordered
// 3. Consume outcomes one at a time as they finish: print the block and
//    append the JSON line, so output never interleaves
// 4. Count found / not found / failed / skipped for the summary
//
// A failing platform is logged and printed, never propagated.
//
// Rust concepts:
// - Streams: stream::iter + buffer_unordered bound the number of live futures
// - Arc<AtomicBool>: a flag shared with the Ctrl-C task without a lock
// - Private enums: Outcome never leaves this file
// =============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use super::fetch::Fetcher;
use super::result::{AccountQuery, Platform, ProbeResult};
use crate::error::ProbeError;
use crate::output::{Presenter, Recorder};
use crate::platforms::{Extractor, ExtractorRegistry};

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Maximum number of probes in flight
    pub threads: usize,
    /// Upper bound for one fetch, connect included
    pub timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            threads: 3,
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub found: usize,
    pub not_found: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.found + self.not_found + self.failed + self.skipped
    }
}

enum Outcome {
    Checked(ProbeResult),
    Failed(Platform, ProbeError),
    Skipped(Platform),
}

pub struct Runner {
    registry: ExtractorRegistry,
    fetcher: Fetcher,
    presenter: Presenter,
    recorder: Recorder,
    threads: usize,
    shutdown: Arc<AtomicBool>,
}

impl Runner {
    pub fn new(
        config: RunnerConfig,
        registry: ExtractorRegistry,
        presenter: Presenter,
        recorder: Recorder,
    ) -> Result<Self, ProbeError> {
        Ok(Runner {
            registry,
            fetcher: Fetcher::new(config.timeout)?,
            presenter,
            recorder,
            threads: config.threads.max(1),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Setting this flag stops new probes from starting. Probes already in
    /// flight finish or time out.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub async fn run(&self, query: &AccountQuery) -> RunSummary {
        let username = query.username.as_str();
        info!(%username, platforms = self.registry.len(), threads = self.threads, "starting probes");

        let probes = self.registry.iter().map(|extractor| {
            let fetcher = self.fetcher.clone();
            let shutdown = Arc::clone(&self.shutdown);
            async move {
                let platform = extractor.platform();
                if shutdown.load(Ordering::SeqCst) {
                    return Outcome::Skipped(platform);
                }
                match probe(&fetcher, extractor.as_ref(), username).await {
                    Ok(result) => Outcome::Checked(result),
                    Err(error) => Outcome::Failed(platform, error),
                }
            }
        });

        let mut outcomes = stream::iter(probes).buffer_unordered(self.threads);
        let mut summary = RunSummary::default();
        while let Some(outcome) = outcomes.next().await {
            self.emit(outcome, username, &mut summary);
        }

        info!(
            %username,
            found = summary.found,
            not_found = summary.not_found,
            failed = summary.failed,
            skipped = summary.skipped,
            "probes finished"
        );
        summary
    }

    fn emit(&self, outcome: Outcome, username: &str, summary: &mut RunSummary) {
        match outcome {
            Outcome::Checked(result) => {
                info!(platform = %result.platform, %username, found = result.found, "probe finished");
                self.presenter.print(&result);
                if let Err(e) = self.recorder.append(&result) {
                    warn!(platform = %result.platform, %username, error = %e, "failed to record result");
                }
                if result.found {
                    summary.found += 1;
                } else {
                    summary.not_found += 1;
                }
            }
            Outcome::Failed(platform, e) => {
                error!(%platform, %username, category = e.category(), error = %e, "probe failed");
                self.presenter.print_failure(platform, username, &e);
                summary.failed += 1;
            }
            Outcome::Skipped(platform) => {
                warn!(%platform, %username, "probe skipped during shutdown");
                summary.skipped += 1;
            }
        }
    }
}

/// One fetch + classify cycle.
async fn probe(
    fetcher: &Fetcher,
    extractor: &dyn Extractor,
    username: &str,
) -> Result<ProbeResult, ProbeError> {
    let request = extractor.request(username);
    let response = fetcher.fetch(&request).await?;
    let classification = extractor.classify(&response.body, response.status, username)?;
    debug!(
        platform = %extractor.platform(),
        status = response.status,
        found = classification.is_found(),
        stats = classification.stats().len(),
        "classified"
    );
    Ok(ProbeResult::new(
        extractor.platform(),
        username,
        extractor.canonical_url(username),
        classification,
    ))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why buffer_unordered instead of tokio::spawn?
//    - The probes borrow `username` and the runner itself
//    - buffer_unordered polls them all inside this task, so no 'static or
//      Send bound is needed, and at most `threads` run at once
//
// 2. Why an AtomicBool for shutdown?
//    - The Ctrl-C handler runs in its own task and only needs to flip a flag
//    - Each probe reads it once, right before it would start fetching
//
// 3. Why is emit() not async?
//    - Printing and the JSON append are quick and synchronous; doing them in
//      the consumer loop means only one outcome is written at a time
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PresenterConfig;
    use crate::platforms::X;
    use crate::probe::Classification;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Treats a 200 as found, anything else as not found.
    struct StatusOnly {
        platform: Platform,
        base: String,
    }

    impl Extractor for StatusOnly {
        fn platform(&self) -> Platform {
            self.platform
        }

        fn canonical_url(&self, username: &str) -> String {
            format!("{}/{}/{}", self.base, self.platform, username)
        }

        fn classify(
            &self,
            _body: &str,
            status: u16,
            _username: &str,
        ) -> Result<Classification, ProbeError> {
            Ok(if status == 200 {
                Classification::found_bare()
            } else {
                Classification::not_found()
            })
        }
    }

    fn presenter() -> Presenter {
        Presenter::new(PresenterConfig {
            color: false,
            ..PresenterConfig::default()
        })
    }

    async fn mock_registry(server: &MockServer) -> ExtractorRegistry {
        Mock::given(method("GET"))
            .and(path("/instagram/alice"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/telegram/alice"))
            .respond_with(ResponseTemplate::new(404))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(server)
            .await;

        let mut registry = ExtractorRegistry::empty();
        for platform in [Platform::Instagram, Platform::Telegram] {
            registry.register(StatusOnly {
                platform,
                base: server.uri(),
            });
        }
        registry.register(X::with_endpoint(format!("{}/graphql", server.uri())));
        registry
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_other_platforms() {
        let server = MockServer::start().await;
        let registry = mock_registry(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("results.json");

        let runner = Runner::new(
            RunnerConfig::default(),
            registry,
            presenter(),
            Recorder::open(Some(output.clone())).unwrap(),
        )
        .unwrap();

        let query = AccountQuery {
            username: "alice".to_string(),
            output_path: Some(output.clone()),
        };
        let summary = runner.run(&query).await;

        assert_eq!(
            summary,
            RunSummary {
                found: 1,
                not_found: 1,
                failed: 1,
                skipped: 0
            }
        );

        let written = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["username"], "alice");
            assert!(value.get("platform").is_some());
            assert!(value.get("found").is_some());
            assert!(value.get("url").is_some());
        }
    }

    #[tokio::test]
    async fn test_shutdown_skips_unstarted_probes() {
        let server = MockServer::start().await;
        let registry = mock_registry(&server).await;
        let runner = Runner::new(
            RunnerConfig {
                threads: 1,
                ..RunnerConfig::default()
            },
            registry,
            presenter(),
            Recorder::open(None).unwrap(),
        )
        .unwrap();

        runner.shutdown_flag().store(true, Ordering::SeqCst);
        let query = AccountQuery {
            username: "alice".to_string(),
            output_path: None,
        };
        let summary = runner.run(&query).await;
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.total(), 3);
    }
}
