//! Engine error types.

use thiserror::Error;

/// Errors from the PnL engine.
///
/// Raised for inputs that are individually valid but inconsistent as a
/// whole. The engine never partial-fails silently: either every requested
/// component of every row is populated, or the computation fails with one
/// of these kinds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputationError {
    /// A deal's base currency has no OIS curve in the snapshot and no
    /// override is configured.
    #[error("no OIS curve for currency {currency} (deal {deal_id})")]
    MissingCurve {
        /// Currency code with no curve.
        currency: String,
        /// Deal that needed it.
        deal_id: String,
    },

    /// An FX deal's pair is quoted neither directly nor inverted in the
    /// snapshot.
    #[error("no FX spot for pair {pair} (deal {deal_id})")]
    MissingFxSpot {
        /// Pair code with no spot.
        pair: String,
        /// Deal that needed it.
        deal_id: String,
    },
}
