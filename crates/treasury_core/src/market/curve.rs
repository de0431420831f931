//! Zero curve with pillar-point interpolation.

use thiserror::Error;

/// Errors from curve construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// The curve has no pillar points.
    #[error("curve has no pillar points")]
    Empty,

    /// A tenor is non-positive or non-finite.
    #[error("invalid tenor: {0}")]
    InvalidTenor(f64),

    /// Tenors are not strictly increasing.
    #[error("tenors not strictly increasing at {0}")]
    UnsortedTenor(f64),

    /// A rate is non-finite.
    #[error("non-finite rate at tenor {0}")]
    InvalidRate(f64),
}

/// A zero curve stored as sorted (tenor-years, rate) pillars.
///
/// Lookups interpolate linearly between pillars and extrapolate flat
/// beyond the first and last pillar. A single-pillar curve is legal and
/// behaves as a flat curve.
///
/// # Examples
///
/// ```
/// use treasury_core::market::Curve;
///
/// let curve = Curve::from_pillars(&[
///     (0.25, 0.052),
///     (1.0, 0.050),
///     (5.0, 0.043),
/// ]).unwrap();
///
/// // Flat before the first pillar, linear in between.
/// assert_eq!(curve.rate_at(0.1), 0.052);
/// assert!((curve.rate_at(3.0) - 0.0465).abs() < 1e-12);
/// assert_eq!(curve.rate_at(30.0), 0.043);
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Curve {
    tenors: Vec<f64>,
    rates: Vec<f64>,
}

impl Curve {
    /// Constructs a curve from (tenor, rate) pillars.
    ///
    /// # Errors
    ///
    /// Rejects empty input, non-positive or unsorted tenors, and
    /// non-finite rates.
    pub fn from_pillars(pillars: &[(f64, f64)]) -> Result<Self, CurveError> {
        if pillars.is_empty() {
            return Err(CurveError::Empty);
        }
        let mut tenors = Vec::with_capacity(pillars.len());
        let mut rates = Vec::with_capacity(pillars.len());
        for &(tenor, rate) in pillars {
            if !tenor.is_finite() || tenor <= 0.0 {
                return Err(CurveError::InvalidTenor(tenor));
            }
            if let Some(&prev) = tenors.last() {
                if tenor <= prev {
                    return Err(CurveError::UnsortedTenor(tenor));
                }
            }
            if !rate.is_finite() {
                return Err(CurveError::InvalidRate(tenor));
            }
            tenors.push(tenor);
            rates.push(rate);
        }
        Ok(Self { tenors, rates })
    }

    /// Rate at the given tenor: flat extrapolation outside the pillar
    /// range, linear interpolation inside it.
    pub fn rate_at(&self, tenor_years: f64) -> f64 {
        let first = self.tenors[0];
        let last = self.tenors[self.tenors.len() - 1];
        if tenor_years <= first {
            return self.rates[0];
        }
        if tenor_years >= last {
            return self.rates[self.rates.len() - 1];
        }
        // partition_point: first index with tenor > target; the target is
        // strictly inside the pillar range here, so 0 < idx < len.
        let idx = self.tenors.partition_point(|&t| t <= tenor_years);
        let (t0, t1) = (self.tenors[idx - 1], self.tenors[idx]);
        let (r0, r1) = (self.rates[idx - 1], self.rates[idx]);
        let weight = (tenor_years - t0) / (t1 - t0);
        r0 + weight * (r1 - r0)
    }

    /// Number of pillar points.
    pub fn pillar_count(&self) -> usize {
        self.tenors.len()
    }

    /// Pillars as (tenor, rate) pairs, in tenor order.
    pub fn pillars(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.tenors.iter().copied().zip(self.rates.iter().copied())
    }

    /// Returns a copy of the curve with every pillar rate shifted by
    /// `delta` (absolute, in decimal). Used by stress scenarios.
    pub fn shifted(&self, delta: f64) -> Curve {
        Curve {
            tenors: self.tenors.clone(),
            rates: self.rates.iter().map(|r| r + delta).collect(),
        }
    }
}
