// src/probe/mod.rs
// =============================================================================
// Everything needed to run a probe except the platform rules themselves.
//
// Submodules:
// - result: Platform, Classification, ProbeResult, AccountQuery
// - fetch: the HTTP transport (header profiles, redirect policy, timeouts)
// - runner: drives fetch -> classify -> present -> record for every platform
// =============================================================================

mod fetch;
mod result;
mod runner;

pub use fetch::{HeaderProfile, ProbeRequest};
pub use result::{AccountQuery, Classification, Platform, ProbeResult, Stats};
pub use runner::{RunSummary, Runner, RunnerConfig};
