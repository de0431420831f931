//! Cache error types.

use thiserror::Error;

/// Errors from the cache backend.
///
/// Never propagated out of a lookup: the layer logs the failure and falls
/// back to direct computation. A cache failure removes the speed-up, never
/// the result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CacheError {
    /// The backend is unreachable or its internal state is unusable.
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    /// The backend accepted the request but failed to serve it.
    #[error("cache backend failure: {0}")]
    Backend(String),

    /// An input could not be encoded for fingerprinting.
    #[error("fingerprint encoding failed: {0}")]
    Encoding(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = CacheError::Unavailable("connection refused".to_string());
        assert_eq!(format!("{}", err), "cache backend unavailable: connection refused");
    }
}
