// src/output/recorder.rs
// =============================================================================
// Appends results to the output file, one JSON object per line.
//
// The file is opened once in append mode. Every record is serialized first
// and then written with a single write_all under a mutex, so concurrent
// callers never interleave partial lines and a crash leaves only whole
// records behind. Without an output path every append is a no-op.
//
// Rust concepts:
// - Mutex<File>: only one writer at a time, even across threads
// - OpenOptions: create + append instead of truncating
// =============================================================================

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::RecordError;
use crate::probe::ProbeResult;

#[derive(Debug)]
pub struct Recorder {
    sink: Option<Sink>,
}

#[derive(Debug)]
struct Sink {
    path: PathBuf,
    file: Mutex<File>,
}

impl Recorder {
    pub fn open(path: Option<PathBuf>) -> Result<Self, RecordError> {
        let Some(path) = path else {
            return Ok(Recorder { sink: None });
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| io_error(&path, source))?;

        Ok(Recorder {
            sink: Some(Sink {
                path,
                file: Mutex::new(file),
            }),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|sink| sink.path.as_path())
    }

    pub fn append(&self, result: &ProbeResult) -> Result<(), RecordError> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };

        let mut line = serde_json::to_string(result)?;
        line.push('\n');

        // Another writer panicking mid-append leaves the handle usable.
        let mut file = sink.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        file.write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| io_error(&sink.path, source))?;

        debug!(path = %sink.path.display(), platform = %result.platform, "recorded result");
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> RecordError {
    RecordError::Io {
        path: path.display().to_string(),
        source,
    }
}
