//! # treasury_pnl: PnL Decomposition Engine
//!
//! ## Layer 2 (Engine) Role
//!
//! Pure function from (deal set, market snapshot, configuration) to a
//! per-deal, per-component PnL table. No hidden state: the same inputs
//! always produce the same table, irrespective of iteration order or
//! caller thread.
//!
//! The decomposition has four components per deal:
//! - **Accrued**: carry of the client rate over the deal's own day count
//! - **Mark-to-Market**: rate move since inception (duration-weighted),
//!   plus FX revaluation for spot/forward deals
//! - **Rate**: sensitivity-style revaluation against the current OIS level
//! - **Liquidity**: tenor- and size-scaled spread cost
//!
//! Disabled components are carried as exact zeros so the table shape never
//! depends on configuration. Floating deals with no index fixing are priced
//! off the snapshot OIS rate and flagged with a substitution warning.
//!
//! ## Example
//!
//! ```
//! use treasury_core::config::CalcConfig;
//! use treasury_core::deal::{DealBuilder, DealKind, DealSet};
//! use treasury_core::market::{Curve, MarketSnapshot};
//! use treasury_core::types::Date;
//! use treasury_pnl::compute_pnl;
//!
//! let deal = DealBuilder::new()
//!     .id("D001")
//!     .label("4M USD deposit")
//!     .kind(DealKind::Deposit)
//!     .pair("USD")
//!     .notional(-10_000_000.0)
//!     .trade_date(Date::from_ymd(2025, 8, 1).unwrap())
//!     .value_date(Date::from_ymd(2025, 8, 3).unwrap())
//!     .maturity_date(Date::from_ymd(2025, 12, 3).unwrap())
//!     .fixed_rate(0.045)
//!     .contract_rate(0.044)
//!     .build()
//!     .unwrap();
//! let deals = DealSet::new(vec![deal]).unwrap();
//!
//! let snapshot = MarketSnapshot::new()
//!     .with_curve("USD", Curve::from_pillars(&[(0.25, 0.052), (1.0, 0.050)]).unwrap());
//! let config = CalcConfig::new(Date::from_ymd(2025, 9, 1).unwrap());
//!
//! let result = compute_pnl(&deals, &snapshot, &config).unwrap();
//! assert_eq!(result.len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

mod engine;
mod error;
mod result;

pub use engine::compute_pnl;
pub use error::ComputationError;
pub use result::{PnlResult, PnlRow, PnlSummary, PnlWarning};
