//! Identity pools shared across generated events.
//!
//! Events draw their identity from a fixed pool, so several events carry the
//! same `idcard`. The receiving platform treats those as one profile to be
//! merged. The pool is intentionally smaller than the number of events sent.

use std::num::NonZeroU32;

use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::Error;

const IDCARD_MIN: u64 = 100_000_000_000;
const IDCARD_MAX: u64 = 999_999_999_999;
const OLD_IDCARD_MIN: u32 = 100_000_000;
const OLD_IDCARD_MAX: u32 = 999_999_999;

/// A current identity key paired with the legacy key it replaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// The primary identity key, twelve digits
    pub idcard: String,
    /// The secondary identity key, nine digits
    pub old_idcard: String,
}

/// An ordered, non-empty pool of identities.
///
/// The pool stores the primary and secondary keys side by side, so the
/// secondary key at position `i` always belongs to the primary key at `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityPool {
    identities: Vec<Identity>,
}

impl IdentityPool {
    /// Create a pool of `size` identities with distinct primary keys.
    pub fn generate<R>(size: NonZeroU32, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let size = size.get() as usize;
        let mut seen: FxHashSet<u64> = FxHashSet::default();
        let mut identities = Vec::with_capacity(size);

        while identities.len() < size {
            let idcard = rng.random_range(IDCARD_MIN..=IDCARD_MAX);
            if !seen.insert(idcard) {
                continue;
            }
            let old_idcard = rng.random_range(OLD_IDCARD_MIN..=OLD_IDCARD_MAX);
            identities.push(Identity {
                idcard: idcard.to_string(),
                old_idcard: old_idcard.to_string(),
            });
        }

        Self { identities }
    }

    /// Create a pool from two parallel lists of keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolLengthMismatch`] if the lists differ in length and
    /// [`Error::EmptyPool`] if they are empty.
    pub fn from_parts(idcards: Vec<String>, old_idcards: Vec<String>) -> Result<Self, Error> {
        if idcards.len() != old_idcards.len() {
            return Err(Error::PoolLengthMismatch {
                idcards: idcards.len(),
                old_idcards: old_idcards.len(),
            });
        }
        if idcards.is_empty() {
            return Err(Error::EmptyPool);
        }

        let identities = idcards
            .into_iter()
            .zip(old_idcards)
            .map(|(idcard, old_idcard)| Identity { idcard, old_idcard })
            .collect();
        Ok(Self { identities })
    }

    /// Choose an identity uniformly at random.
    pub fn choose<R>(&self, rng: &mut R) -> &Identity
    where
        R: Rng + ?Sized,
    {
        // Construction guarantees at least one member.
        &self.identities[rng.random_range(0..self.identities.len())]
    }

    /// Number of identities in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Always false, pools are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Iterate the pool in order.
    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.identities.iter()
    }
}
