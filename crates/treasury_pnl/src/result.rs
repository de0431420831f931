//! PnL result table: one row per deal, one column per component.

use treasury_core::deal::{DealId, DealKind};

/// Non-fatal conditions surfaced alongside a row.
///
/// Warnings never block a computation; they mark substitutions the engine
/// made so the caller can distinguish a clean figure from a defaulted one.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PnlWarning {
    /// A floating deal had no index fixing at valuation time; the snapshot
    /// OIS rate was used in its place.
    FloatingRateSubstituted {
        /// The index that had no fixing, when the deal named one.
        index: Option<String>,
        /// The rate substituted for the missing fixing.
        substituted_rate: f64,
    },
}

/// One row of the PnL table.
///
/// Component columns are always present; a disabled component holds an
/// exact zero. `total` is the sum of the four component columns.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PnlRow {
    /// Deal identifier.
    pub deal_id: DealId,
    /// Currency pair code of the deal.
    pub pair: String,
    /// Deal kind.
    pub kind: DealKind,
    /// Signed notional of the deal.
    pub notional: f64,
    /// Remaining tenor in years as of the valuation date.
    pub time_to_maturity: f64,
    /// The OIS rate the row was priced against.
    pub ois_rate_used: f64,
    /// Accrued carry component.
    pub accrued: f64,
    /// Mark-to-market component.
    pub mtm: f64,
    /// Rate sensitivity component.
    pub rate: f64,
    /// Liquidity cost component.
    pub liquidity: f64,
    /// Sum of the enabled components.
    pub total: f64,
    /// Substitution warnings raised while pricing this row.
    pub warnings: Vec<PnlWarning>,
}

impl PnlRow {
    /// True when any substitution warning was raised for this row.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// The full PnL table for a deal set.
///
/// Rows are in portfolio order, one per deal; the table is never mutated
/// after creation, recomputation produces a new result.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PnlResult {
    rows: Vec<PnlRow>,
}

impl PnlResult {
    /// Wraps computed rows into a result.
    pub(crate) fn from_rows(rows: Vec<PnlRow>) -> Self {
        Self { rows }
    }

    /// Rows in portfolio order.
    pub fn rows(&self) -> &[PnlRow] {
        &self.rows
    }

    /// Number of rows (equals the deal count of the input set).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True for an empty table.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks a row up by deal identifier.
    pub fn get(&self, deal_id: &DealId) -> Option<&PnlRow> {
        self.rows.iter().find(|r| &r.deal_id == deal_id)
    }

    /// Portfolio total PnL.
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.total).sum()
    }

    /// Number of rows carrying at least one warning.
    pub fn warning_count(&self) -> usize {
        self.rows.iter().filter(|r| r.has_warnings()).count()
    }

    /// Aggregates the table into per-component totals.
    pub fn summary(&self) -> PnlSummary {
        let mut summary = PnlSummary {
            deal_count: self.rows.len(),
            ..PnlSummary::default()
        };
        for row in &self.rows {
            summary.accrued += row.accrued;
            summary.mtm += row.mtm;
            summary.rate += row.rate;
            summary.liquidity += row.liquidity;
            summary.total += row.total;
            summary.gross_notional += row.notional.abs();
        }
        summary.pnl_bps = if summary.gross_notional > 0.0 {
            summary.total / summary.gross_notional * 10_000.0
        } else {
            0.0
        };
        summary
    }
}

/// Portfolio-level aggregation of a PnL table.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PnlSummary {
    /// Sum of the accrued column.
    pub accrued: f64,
    /// Sum of the mark-to-market column.
    pub mtm: f64,
    /// Sum of the rate column.
    pub rate: f64,
    /// Sum of the liquidity column.
    pub liquidity: f64,
    /// Sum of the total column.
    pub total: f64,
    /// Number of deals aggregated.
    pub deal_count: usize,
    /// Sum of absolute notionals.
    pub gross_notional: f64,
    /// Total PnL in basis points of gross notional; 0 for an empty table.
    pub pnl_bps: f64,
}
