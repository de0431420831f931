//! # treasury_core: Foundation Types for Treasury Analytics
//!
//! ## Layer 1 (Foundation) Role
//!
//! treasury_core is the bottom layer of the workspace, providing:
//! - Deal model with validate-on-construct semantics (`deal`)
//! - Ordered portfolio snapshots with unique deal identifiers (`deal::DealSet`)
//! - Market snapshot value objects: OIS curves, FX spots, float indices (`market`)
//! - Calculation configuration as a closed, validated record (`config`)
//! - Time types: `Date`, `DayCount` (`types::time`)
//! - Currency types: `Currency`, `CurrencyPair` (`types::currency`)
//! - Error types: `ValidationError`, `DateError`, `CurrencyError` (`types::error`)
//!
//! ## Minimal Dependency Principle
//!
//! Layer 1 has no dependencies on other treasury_* crates, with minimal
//! external dependencies:
//! - chrono: date arithmetic
//! - serde: structural serialisation (fingerprints are content digests)
//! - thiserror: structured error types
//! - uuid: generated deal identifiers
//!
//! ## Immutability
//!
//! Every type constructed here is a value: a `Deal` cannot be edited after
//! construction, and a `DealSet` is replaced wholesale rather than patched.
//! Cache fingerprints computed over these types are therefore pure functions
//! of their contents.
//!
//! ## Usage Examples
//!
//! ```rust
//! use treasury_core::deal::{DealBuilder, DealKind, DealSet};
//! use treasury_core::types::Date;
//!
//! let deal = DealBuilder::new()
//!     .label("3M USD deposit")
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
//!
//! let set = DealSet::new(vec![deal]).unwrap();
//! assert_eq!(set.len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod deal;
pub mod market;
pub mod types;

pub use config::CalcConfig;
pub use deal::{Deal, DealBuilder, DealId, DealKind, DealSet};
pub use market::{Curve, MarketSnapshot};
pub use types::{Currency, CurrencyError, CurrencyPair, Date, DateError, DayCount, ValidationError};
