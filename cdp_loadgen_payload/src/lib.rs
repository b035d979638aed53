//! The cdp-loadgen payloads
//!
//! This library supports synthetic profile event generation for the
//! cdp-loadgen project. Events are assembled from static value pools and a
//! caller-supplied source of randomness, so a seeded generator always yields
//! the same events for the same clock reading.

#![deny(clippy::cargo)]
#![allow(clippy::cargo_common_metadata)]
#![deny(missing_docs)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::multiple_crate_versions)]

pub use identity::{Identity, IdentityPool};
pub use profile::{
    Campaign, EventType, Metadata, Platforms, Profile, ProfileEvent, Traits,
};

pub mod identity;
mod locale;
pub mod profile;

/// Errors related to profile event generation and serialization
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Json payload could not be encoded
    #[error("Json payload could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
    /// The identity pool holds no identities
    #[error("Identity pool must not be empty")]
    EmptyPool,
    /// The two halves of an identity pool disagree in length
    #[error("Identity pool halves differ in length: {idcards} idcards, {old_idcards} old idcards")]
    PoolLengthMismatch {
        /// Number of primary identity keys supplied
        idcards: usize,
        /// Number of secondary identity keys supplied
        old_idcards: usize,
    },
}
