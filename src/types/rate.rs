//! Rate and charge utilities.
//!
//! Rates are held as [`Decimal`] everywhere in the engine so that band
//! lookups and charges never touch floating point. Allocation records carry
//! the rate as a `u64` scaled by 10^8; band validation only admits rates
//! that [`exact_fixed`] can encode, so a validated rate survives the
//! conversion unchanged.
//!
//! ```
//! use allocation_engine::types::rate::{exact_fixed, from_fixed};
//! use rust_decimal::Decimal;
//!
//! let fixed = exact_fixed(Decimal::new(8, 1)).unwrap();
//! assert_eq!(fixed, 80_000_000);
//! assert_eq!(from_fixed(fixed), "0.80000000");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point rates: 10^8
pub const SCALE: u64 = 100_000_000;

/// Decimal places a fixed-point rate can hold
pub const MAX_RATE_DP: u32 = 8;

/// Convert a Decimal rate to fixed-point, rounding past the 8th place.
///
/// `None` for negative rates or rates too large for a `u64` once scaled.
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() && !d.is_zero() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Convert a Decimal rate to fixed-point only if nothing is lost.
///
/// ```
/// use allocation_engine::types::rate::exact_fixed;
/// use rust_decimal::Decimal;
///
/// assert_eq!(exact_fixed(Decimal::new(125, 3)), Some(12_500_000));
/// assert_eq!(exact_fixed(Decimal::new(1, 9)), None);
/// ```
pub fn exact_fixed(d: Decimal) -> Option<u64> {
    if d.normalize().scale() > MAX_RATE_DP {
        return None;
    }
    decimal_to_fixed(d)
}

/// Convert a fixed-point rate back to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Render a fixed-point rate with 8 decimal places
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

/// Charge for an assigned quantity at a given rate (`quantity * rate`).
///
/// Returns `None` on overflow.
///
/// ```
/// use allocation_engine::types::rate::checked_charge;
/// use rust_decimal::Decimal;
///
/// assert_eq!(checked_charge(500, Decimal::new(8, 1)), Some(Decimal::from(400)));
/// ```
pub fn checked_charge(quantity: u64, rate: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fixed_reference_rates() {
        assert_eq!(exact_fixed(Decimal::ONE), Some(SCALE));
        assert_eq!(exact_fixed(Decimal::new(10, 1)), Some(SCALE));
        assert_eq!(exact_fixed(Decimal::new(5, 1)), Some(50_000_000));
        assert_eq!(exact_fixed(Decimal::new(1, 8)), Some(1));
        assert_eq!(exact_fixed(Decimal::ZERO), Some(0));
    }

    #[test]
    fn test_exact_fixed_rejects_lossy_rates() {
        // Trailing zeros past the 8th place are not a loss
        assert_eq!(exact_fixed(Decimal::new(5_000_000_000, 10)), Some(50_000_000));
        assert_eq!(exact_fixed(Decimal::new(123_456_789, 9)), None);
        assert_eq!(exact_fixed(Decimal::new(-1, 1)), None);
        assert_eq!(exact_fixed(Decimal::from(u64::MAX)), None);
    }

    #[test]
    fn test_decimal_to_fixed_rounds_extra_precision() {
        assert_eq!(decimal_to_fixed(Decimal::new(123_456_789, 9)), Some(12_345_679));
    }

    #[test]
    fn test_fixed_roundtrip() {
        let rate = Decimal::new(125, 3);
        let fixed = exact_fixed(rate).unwrap();

        assert_eq!(fixed_to_decimal(fixed), rate);
        assert_eq!(from_fixed(fixed), "0.12500000");
    }

    #[test]
    fn test_checked_charge() {
        assert_eq!(checked_charge(0, Decimal::new(8, 1)), Some(Decimal::ZERO));
        assert_eq!(checked_charge(250, Decimal::new(5, 1)), Some(Decimal::from(125)));
        assert_eq!(checked_charge(u64::MAX, Decimal::MAX), None);
    }
}
