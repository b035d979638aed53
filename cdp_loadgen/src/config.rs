//! This module controls configuration parsing from the end user, providing a
//! convenience mechanism for the rest of the program. Values come from an
//! optional YAML file and are then overridden by command-line flags in the
//! binary. Every field has a default, so an empty document is a valid
//! configuration.
use std::{
    fs,
    num::{NonZeroU16, NonZeroU32},
    path::{Path, PathBuf},
    time::Duration,
};

use http::Uri;
use serde::{Deserialize, Serialize};

use crate::dispatch::Strategy;

/// Errors produced by [`Config`]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Error for a serde [`serde_yaml`].
    #[error("Failed to deserialize yaml: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
    /// Error reading config file
    #[error("Failed to read config file {path:?}: {source}")]
    ReadFile {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: Box<std::io::Error>,
    },
}

/// How events are pushed at the target
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Send events concurrently through a bounded pool of workers
    #[default]
    Batch,
    /// Send events one at a time, pausing between each
    Sequential,
}

fn default_target_uri() -> Uri {
    Uri::from_static("http://localhost:8080/v1/profiles/track")
}

fn default_api_key() -> String {
    "cdp_demo_demo".to_string()
}

fn default_unique_idcards() -> NonZeroU32 {
    NonZeroU32::new(700).unwrap_or(NonZeroU32::MIN)
}

fn default_workers() -> NonZeroU16 {
    NonZeroU16::new(10).unwrap_or(NonZeroU16::MIN)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Main configuration struct for this program
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// The URI events are POSTed to
    #[serde(with = "http_serde::uri")]
    pub target_uri: Uri,
    /// Value of the `X-API-Key` header sent with every request
    pub api_key: String,
    /// Total number of events to generate and send
    pub num_events: u32,
    /// Size of the identity pool. Fewer identities mean more merges.
    pub unique_idcards: NonZeroU32,
    /// The sending strategy
    pub mode: Mode,
    /// Maximum requests in flight in [`Mode::Batch`]
    pub workers: NonZeroU16,
    /// Per-request timeout, in milliseconds
    pub request_timeout_millis: u64,
    /// Pause after each request in [`Mode::Sequential`], in milliseconds
    pub sequential_delay_millis: u64,
    /// Whether generated events and outcomes are written to disk
    pub save_to_file: bool,
    /// Whether dispatch progress is logged
    pub show_progress: bool,
    /// Directory persisted files are written into
    pub output_dir: PathBuf,
    /// Seed for event generation. A random seed is chosen and logged when
    /// absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_uri: default_target_uri(),
            api_key: default_api_key(),
            num_events: 1_000,
            unique_idcards: default_unique_idcards(),
            mode: Mode::default(),
            workers: default_workers(),
            request_timeout_millis: 10_000,
            sequential_delay_millis: 10,
            save_to_file: true,
            show_progress: true,
            output_dir: default_output_dir(),
            seed: None,
        }
    }
}

impl Config {
    /// Parse a configuration from YAML contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the contents are not valid YAML or name unknown
    /// fields.
    pub fn from_yaml(contents: &str) -> Result<Self, Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).map_err(Error::from)
    }

    /// The per-request timeout
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_millis)
    }

    /// The dispatch strategy selected by [`Config::mode`]
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        match self.mode {
            Mode::Batch => Strategy::Concurrent {
                workers: self.workers,
            },
            Mode::Sequential => Strategy::Sequential {
                delay: Duration::from_millis(self.sequential_delay_millis),
            },
        }
    }

    /// Whether the run will produce events that share an identity. Always
    /// true when the pool is smaller than the number of events.
    #[must_use]
    pub fn merges_expected(&self) -> bool {
        self.unique_idcards.get() < self.num_events
    }
}

/// Load configuration from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold a valid
/// configuration.
pub fn load_config_from_path(path: &Path) -> Result<Config, Error> {
    let contents = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;
    Config::from_yaml(&contents)
}
