//! Files written around a run.
//!
//! Generated events are saved before dispatch and outcomes after it, each as
//! a pretty-printed JSON array named after the event count and the local time
//! of the write.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use cdp_loadgen_payload::ProfileEvent;
use serde::Serialize;
use time::{OffsetDateTime, macros::format_description};
use tracing::info;

use crate::dispatch::Outcome;

const EVENTS_PREFIX: &str = "generated_events";
const RESULTS_PREFIX: &str = "results";

#[derive(thiserror::Error, Debug)]
/// Errors produced while persisting a run.
pub enum Error {
    /// The timestamp could not be rendered into a file name
    #[error("Failed to format file timestamp: {0}")]
    Format(#[from] time::error::Format),
    /// The file could not be created or flushed
    #[error("Failed to write {path:?}: {source}")]
    Write {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },
    /// The records could not be serialized
    #[error("Failed to serialize records into {path:?}: {source}")]
    Json {
        /// File path
        path: PathBuf,
        /// Underlying serialization error
        #[source]
        source: serde_json::Error,
    },
}

/// Name of a persisted file: `<prefix>_<count>_<YYYYMMDD_HHMMSS>.json`.
///
/// # Errors
///
/// Returns an error if `at` cannot be formatted.
pub fn file_name(prefix: &str, count: usize, at: OffsetDateTime) -> Result<String, Error> {
    let stamp = at.format(format_description!(
        "[year][month][day]_[hour][minute][second]"
    ))?;
    Ok(format!("{prefix}_{count}_{stamp}.json"))
}

/// Write every generated event into `dir`, returning the path written.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_events(
    dir: &Path,
    events: &[ProfileEvent],
    at: OffsetDateTime,
) -> Result<PathBuf, Error> {
    let path = dir.join(file_name(EVENTS_PREFIX, events.len(), at)?);
    write_pretty(&path, events)?;
    info!("Saved {count} events to {path:?}", count = events.len());
    Ok(path)
}

/// Write every outcome into `dir`, returning the path written. `count` is the
/// number of events requested for the run.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_results(
    dir: &Path,
    count: usize,
    outcomes: &[Outcome],
    at: OffsetDateTime,
) -> Result<PathBuf, Error> {
    let path = dir.join(file_name(RESULTS_PREFIX, count, at)?);
    write_pretty(&path, outcomes)?;
    info!("Saved {count} outcomes to {path:?}", count = outcomes.len());
    Ok(path)
}

fn write_pretty<T: Serialize>(path: &Path, records: &[T]) -> Result<(), Error> {
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let fp = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(fp);
    serde_json::to_writer_pretty(&mut writer, records).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(write_err)
}
