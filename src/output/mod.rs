// src/output/mod.rs
// =============================================================================
// Where results go once a probe finishes.
//
// - presenter: bordered console blocks, error lines, summary and banner
// - recorder: append-only JSON lines file
// =============================================================================

mod presenter;
mod recorder;

pub use presenter::{Presenter, PresenterConfig};
pub use recorder::Recorder;
