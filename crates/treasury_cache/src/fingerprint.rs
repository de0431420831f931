//! Deterministic content digests over engine inputs.

use std::fmt;
use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use treasury_core::config::CalcConfig;
use treasury_core::deal::DealSet;
use treasury_core::market::MarketSnapshot;

use crate::error::CacheError;

/// A cache key: the SHA-256 digest of the structural content of a
/// (deal set, configuration, snapshot) triple.
///
/// Equal content yields an equal key regardless of object identity or the
/// order deals were assembled in; any field difference yields a different
/// key with overwhelming probability.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wraps a raw key string.
    ///
    /// Intended for tests and for callers caching results that are not
    /// engine outputs; engine results should be keyed via [`fingerprint`].
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Computes the cache key for a PnL or risk computation.
///
/// Each deal is serialised to canonical JSON independently and the
/// encodings are sorted before hashing, so two sets holding structurally
/// equal deals in any order fingerprint identically. Configuration and
/// snapshot are appended afterwards; their containers are `BTreeMap`s, so
/// their encodings are order-stable by construction.
///
/// Numeric policy: floats are encoded with serde_json's shortest
/// round-trip formatting, making the digest a pure function of the exact
/// f64 bit patterns. Non-finite values never reach the digest because
/// validation rejects them.
///
/// # Errors
///
/// Returns `CacheError::Encoding` if an input fails to serialise. The
/// model types in this workspace cannot fail serialisation; the error
/// path exists for the degrade contract, not for expected traffic.
pub fn fingerprint(
    deals: &DealSet,
    config: &CalcConfig,
    snapshot: &MarketSnapshot,
) -> Result<Fingerprint, CacheError> {
    let mut encodings: Vec<Vec<u8>> = deals
        .iter()
        .map(serde_json::to_vec)
        .collect::<Result<_, _>>()
        .map_err(|e| CacheError::Encoding(e.to_string()))?;
    encodings.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(b"deals\x00");
    for encoding in &encodings {
        // Length prefix keeps deal boundaries unambiguous.
        hasher.update((encoding.len() as u64).to_le_bytes());
        hasher.update(encoding);
    }
    hasher.update(b"config\x00");
    hasher.update(serde_json::to_vec(config).map_err(|e| CacheError::Encoding(e.to_string()))?);
    hasher.update(b"snapshot\x00");
    hasher.update(serde_json::to_vec(snapshot).map_err(|e| CacheError::Encoding(e.to_string()))?);

    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // Infallible on String.
        let _ = write!(hex, "{:02x}", byte);
    }
    Ok(Fingerprint(hex))
}
