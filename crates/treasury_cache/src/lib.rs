//! # treasury_cache: Memoisation Layer for Analytics Results
//!
//! ## Layer 3 (Engine) Role
//!
//! Sits in front of the computation engines with fingerprint-keyed
//! memoisation:
//! - `fingerprint`: deterministic content digest over (deal set, config,
//!   snapshot), used as the cache key
//! - `CacheStore`: abstract key-value backend (put/get/delete/clear);
//!   [`MemoryStore`] is the in-process implementation
//! - `ResultCache`: TTL expiry, lazy eviction, single-flight on concurrent
//!   misses, hit/miss accounting
//!
//! ## Cache as optimisation, never as dependency
//!
//! Every backend failure degrades to direct computation: a broken store can
//! slow a caller down, it can never change or block a result. Failures are
//! logged and counted as misses.
//!
//! Composition is explicit: callers construct a cache and route
//! computations through [`ResultCache::get_or_compute`]; nothing is
//! intercepted behind the scenes.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use treasury_cache::ResultCache;
//!
//! let cache: ResultCache<u64> = ResultCache::in_memory();
//! let key = treasury_cache::Fingerprint::from_raw("demo-key");
//!
//! let (value, hit) = cache
//!     .get_or_compute(&key, Duration::from_secs(60), || Ok::<_, String>(42))
//!     .unwrap();
//! assert_eq!((value, hit), (42, false));
//!
//! let (value, hit) = cache
//!     .get_or_compute(&key, Duration::from_secs(60), || Ok::<_, String>(42))
//!     .unwrap();
//! assert_eq!((value, hit), (42, true));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

mod error;
mod fingerprint;
mod layer;
mod store;

pub use error::CacheError;
pub use fingerprint::{fingerprint, Fingerprint};
pub use layer::{CacheStats, ResultCache};
pub use store::{CacheEntry, CacheStore, MemoryStore};

/// Suggested TTLs per result kind.
///
/// The cache always takes TTL as a parameter; these constants keep the
/// policy with the caller rather than hard-coding it per kind.
pub mod ttl {
    use std::time::Duration;

    /// PnL tables: one hour.
    pub const PNL: Duration = Duration::from_secs(3600);

    /// Market-derived summaries: fifteen minutes.
    pub const MARKET_SUMMARY: Duration = Duration::from_secs(900);

    /// Risk analytics: thirty minutes.
    pub const RISK: Duration = Duration::from_secs(1800);
}
