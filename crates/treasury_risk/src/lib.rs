//! # treasury_risk: Portfolio Risk Analytics
//!
//! ## Layer 4 (Application) Role
//!
//! Consumes the PnL table and the deal model to compute:
//! - `concentration`: fraction of gross notional per bucket (pair,
//!   currency, tenor, trader)
//! - `value_at_risk`: seeded Monte Carlo simulation over correlated FX
//!   shocks plus a rate component, reported as a positive loss quantile
//! - `apply_scenario`: PnL delta under a shocked snapshot; the five named
//!   stress scenarios are plain shift triples, identical in kind to any
//!   custom triple
//! - `limit_violations`: exposures compared against configured limits
//!
//! Every operation is a pure function of its inputs. VaR draws from a
//! caller-supplied seed, never from the wall clock, so a fixed seed is
//! bit-for-bit reproducible. Whether risk results are cached is the
//! caller's decision; this crate does not depend on the cache layer.
//!
//! ## Example
//!
//! ```
//! use treasury_risk::{StressScenario, VarParams};
//!
//! // Presets are data: the same triple type a caller could build by hand.
//! let crisis = StressScenario::systemic_crisis();
//! assert_eq!(crisis.fx_shift, -0.15);
//!
//! let params = VarParams::default();
//! assert_eq!(params.seed, 123);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

mod concentration;
mod error;
mod limits;
mod scenarios;
mod var;

pub use concentration::{concentration, tenor_bucket, BucketBy};
pub use error::RiskError;
pub use limits::{limit_violations, LimitKind, RiskLimits, Violation};
pub use scenarios::{apply_scenario, shock_snapshot, DealDelta, ScenarioImpact, StressScenario};
pub use var::{value_at_risk, VarEstimate, VarParams};
