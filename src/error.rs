// src/error.rs
// =============================================================================
// Error types shared by the fetcher, the extractors and the recorder.
//
// Every ProbeError is caught at the per-platform boundary in the runner and
// turned into a console error line. None of them stops the other platforms.
//
// Rust concepts:
// - thiserror: #[derive(Error)] writes Display and Error for us
// - #[source] / #[from]: keep the underlying error for the cause chain
// =============================================================================

use std::fmt;

use thiserror::Error;

use crate::probe::Platform;

/// Why a request never produced an HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Dns,
    Tls,
    Connect,
    TooManyRedirects,
    Body,
    Other,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportKind::Timeout => "timed out",
            TransportKind::Dns => "could not resolve hostname",
            TransportKind::Tls => "TLS error",
            TransportKind::Connect => "connection failed",
            TransportKind::TooManyRedirects => "too many redirects",
            TransportKind::Body => "failed to read body",
            TransportKind::Other => "request failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{kind} while fetching {url}: {message}")]
    Transport {
        url: String,
        kind: TransportKind,
        message: String,
    },

    #[error("unexpected {platform} response: {reason}")]
    UnexpectedResponseShape { platform: Platform, reason: String },

    #[error("{platform}: {reason}")]
    ExtractionAmbiguous { platform: Platform, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ProbeError {
    pub fn unexpected(platform: Platform, reason: impl Into<String>) -> Self {
        ProbeError::UnexpectedResponseShape {
            platform,
            reason: reason.into(),
        }
    }

    pub fn ambiguous(platform: Platform, reason: impl Into<String>) -> Self {
        ProbeError::ExtractionAmbiguous {
            platform,
            reason: reason.into(),
        }
    }

    /// Short tag used in log lines and the summary.
    pub fn category(&self) -> &'static str {
        match self {
            ProbeError::Transport { .. } => "transport",
            ProbeError::UnexpectedResponseShape { .. } => "unexpected_response",
            ProbeError::ExtractionAmbiguous { .. } => "ambiguous",
            ProbeError::Client(_) => "client",
        }
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("output file error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_message_names_platform() {
        let err = ProbeError::ambiguous(Platform::Threads, "could not determine followers");
        assert_eq!(err.to_string(), "threads: could not determine followers");
        assert_eq!(err.category(), "ambiguous");
    }

    #[test]
    fn test_transport_message() {
        let err = ProbeError::Transport {
            url: "https://t.me/alice".to_string(),
            kind: TransportKind::Timeout,
            message: "operation timed out".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "timed out while fetching https://t.me/alice: operation timed out"
        );
    }
}
