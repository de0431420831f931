//! Ordered deal collections forming a portfolio snapshot.

use std::collections::HashSet;

use super::{Deal, DealId};
use crate::types::ValidationError;

/// An ordered collection of deals forming a portfolio snapshot.
///
/// Identifiers are unique within a set; a duplicate is rejected at
/// construction. The set is replaced wholesale on each import or edit
/// (there is no API to patch it in place), which keeps any fingerprint
/// computed over it a pure function of its contents.
///
/// # Examples
///
/// ```
/// use treasury_core::deal::{DealBuilder, DealKind, DealSet};
/// use treasury_core::types::Date;
///
/// let deal = DealBuilder::new()
///     .id("D001")
///     .label("Overnight USD loan")
///     .kind(DealKind::Loan)
///     .pair("USD")
///     .notional(5_000_000.0)
///     .trade_date(Date::from_ymd(2025, 8, 1).unwrap())
///     .value_date(Date::from_ymd(2025, 8, 1).unwrap())
///     .maturity_date(Date::from_ymd(2025, 8, 4).unwrap())
///     .fixed_rate(0.05)
///     .contract_rate(0.05)
///     .build()
///     .unwrap();
///
/// let set = DealSet::new(vec![deal]).unwrap();
/// assert_eq!(set.len(), 1);
/// assert!(set.get(&"D001".into()).is_some());
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct DealSet {
    deals: Vec<Deal>,
}

impl DealSet {
    /// Creates a deal set, checking identifier uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::DuplicateId` naming the first identifier
    /// that appears twice.
    pub fn new(deals: Vec<Deal>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(deals.len());
        for deal in &deals {
            if !seen.insert(deal.id().clone()) {
                return Err(ValidationError::DuplicateId(deal.id().as_str().to_string()));
            }
        }
        Ok(Self { deals })
    }

    /// Creates an empty set.
    pub fn empty() -> Self {
        Self { deals: Vec::new() }
    }

    /// Number of deals in the set.
    pub fn len(&self) -> usize {
        self.deals.len()
    }

    /// True when the set holds no deals.
    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }

    /// Iterates deals in portfolio order.
    pub fn iter(&self) -> std::slice::Iter<'_, Deal> {
        self.deals.iter()
    }

    /// Deals as a slice, in portfolio order.
    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    /// Looks a deal up by identifier.
    pub fn get(&self, id: &DealId) -> Option<&Deal> {
        self.deals.iter().find(|d| d.id() == id)
    }

    /// Sum of absolute notionals across the set.
    pub fn gross_notional(&self) -> f64 {
        self.deals.iter().map(|d| d.notional().abs()).sum()
    }
}

impl<'a> IntoIterator for &'a DealSet {
    type Item = &'a Deal;
    type IntoIter = std::slice::Iter<'a, Deal>;

    fn into_iter(self) -> Self::IntoIter {
        self.deals.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{DealBuilder, DealKind};
    use crate::types::Date;

    fn deal(id: &str, notional: f64) -> Deal {
        DealBuilder::new()
            .id(id)
            .label("test")
            .kind(DealKind::Deposit)
            .pair("USD")
            .notional(notional)
            .trade_date(Date::from_ymd(2025, 8, 1).unwrap())
            .value_date(Date::from_ymd(2025, 8, 3).unwrap())
            .maturity_date(Date::from_ymd(2025, 12, 3).unwrap())
            .fixed_rate(0.045)
            .contract_rate(0.044)
            .build()
            .unwrap()
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = DealSet::new(vec![deal("D001", 1e6), deal("D001", 2e6)]);
        assert!(matches!(result, Err(ValidationError::DuplicateId(id)) if id == "D001"));
    }

    #[test]
    fn test_order_preserved() {
        let set = DealSet::new(vec![deal("B", 1e6), deal("A", 2e6)]).unwrap();
        let ids: Vec<_> = set.iter().map(|d| d.id().as_str().to_string()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_lookup_and_gross_notional() {
        let set = DealSet::new(vec![deal("D001", -1e6), deal("D002", 3e6)]).unwrap();
        assert_eq!(set.get(&"D002".into()).unwrap().notional(), 3e6);
        assert!(set.get(&"D999".into()).is_none());
        assert_eq!(set.gross_notional(), 4e6);
    }

    #[test]
    fn test_empty_set() {
        let set = DealSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.gross_notional(), 0.0);
    }
}
