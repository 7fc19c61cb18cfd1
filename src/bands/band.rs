//! A single quantity band.
//!
//! ## Range
//!
//! ```text
//! [lower, upper]      bounded band, both ends inclusive
//! [lower, ..)         unbounded band (upper = None)
//! ```

use rust_decimal::Decimal;

/// A quantity range mapped to a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateBand {
    /// Inclusive lower bound (at least 1)
    pub lower: u64,

    /// Inclusive upper bound, None for unbounded
    pub upper: Option<u64>,

    /// Rate applied to quantities in this band
    pub rate: Decimal,
}

impl RateBand {
    /// Create a bounded band `[lower, upper]`
    pub fn bounded(lower: u64, upper: u64, rate: Decimal) -> Self {
        Self {
            lower,
            upper: Some(upper),
            rate,
        }
    }

    /// Create an unbounded band `[lower, ..)`
    pub fn unbounded(lower: u64, rate: Decimal) -> Self {
        Self {
            lower,
            upper: None,
            rate,
        }
    }

    /// Check if the band has no upper bound
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.upper.is_none()
    }

    /// Check if `quantity` falls inside the band
    #[inline]
    pub fn contains(&self, quantity: u64) -> bool {
        quantity >= self.lower && self.upper.map_or(true, |upper| quantity <= upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_contains() {
        let band = RateBand::bounded(101, 1000, Decimal::new(8, 1));

        assert!(!band.contains(100));
        assert!(band.contains(101));
        assert!(band.contains(1000));
        assert!(!band.contains(1001));
        assert!(!band.is_unbounded());
    }

    #[test]
    fn test_unbounded_contains() {
        let band = RateBand::unbounded(1001, Decimal::new(5, 1));

        assert!(!band.contains(1000));
        assert!(band.contains(1001));
        assert!(band.contains(u64::MAX));
        assert!(band.is_unbounded());
    }
}
