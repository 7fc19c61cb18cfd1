//! Per-category rate band tables.
//!
//! ## Validation
//!
//! A table is only constructed if, for every category:
//!
//! - there is at least one band
//! - the first band starts at 1
//! - each band starts right after the previous one ends (no gaps, no overlap)
//! - only the last band is unbounded, and the last band is unbounded
//! - rates are non-negative and fit the 8-decimal fixed-point encoding
//!
//! Once built, a table is immutable and every quantity >= 1 maps to exactly
//! one band.
//!
//! ## Example
//!
//! ```
//! use allocation_engine::bands::{ladder, RateBandTable};
//! use allocation_engine::types::Category;
//! use rust_decimal::Decimal;
//!
//! // <=100 -> 1.0, <=1000 -> 0.8, else -> 0.5
//! let bands = ladder(&[(100, Decimal::ONE), (1000, Decimal::new(8, 1))], Decimal::new(5, 1));
//! let table = RateBandTable::uniform(bands).unwrap();
//!
//! assert_eq!(table.rate_for(Category::Statutory, 500).unwrap(), Decimal::new(8, 1));
//! assert_eq!(table.rate_for(Category::Other, 5000).unwrap(), Decimal::new(5, 1));
//! ```

use std::collections::BTreeMap;

use log::debug;
use rust_decimal::Decimal;

use crate::bands::RateBand;
use crate::error::{AllocationError, AllocationResult};
use crate::types::rate::{exact_fixed, MAX_RATE_DP};
use crate::types::Category;

/// Immutable mapping of (category, quantity) to rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateBandTable {
    /// Bands per category, sorted by lower bound
    bands: BTreeMap<Category, Vec<RateBand>>,
}

impl RateBandTable {
    /// Build a table from per-category band lists.
    ///
    /// Bands may be given in any order; they are sorted by lower bound
    /// before validation. Every category must be present exactly once.
    pub fn new<I>(tables: I) -> AllocationResult<Self>
    where
        I: IntoIterator<Item = (Category, Vec<RateBand>)>,
    {
        let mut bands = BTreeMap::new();

        for (category, mut list) in tables {
            if bands.contains_key(&category) {
                return Err(AllocationError::Configuration(format!(
                    "category {} configured more than once",
                    category
                )));
            }
            list.sort_by_key(|band| band.lower);
            validate_bands(category, &list)?;
            bands.insert(category, list);
        }

        for category in Category::ALL {
            if !bands.contains_key(&category) {
                return Err(AllocationError::Configuration(format!(
                    "category {} has no rate bands",
                    category
                )));
            }
        }

        debug!(
            "rate band table built: {}",
            bands
                .iter()
                .map(|(c, b)| format!("{}={}", c, b.len()))
                .collect::<Vec<_>>()
                .join(" ")
        );

        Ok(Self { bands })
    }

    /// Build a table that uses the same bands for every category
    pub fn uniform(bands: Vec<RateBand>) -> AllocationResult<Self> {
        Self::new(Category::ALL.iter().map(|c| (*c, bands.clone())))
    }

    /// Rate of the band containing `quantity` for `category`.
    ///
    /// Fails with a configuration error if no band contains the quantity,
    /// which for a validated table only happens for quantity 0.
    pub fn rate_for(&self, category: Category, quantity: u64) -> AllocationResult<Decimal> {
        let bands = self.bands(category);

        // Last band whose lower bound is <= quantity
        let idx = bands.partition_point(|band| band.lower <= quantity);
        match idx.checked_sub(1).map(|i| &bands[i]) {
            Some(band) if band.contains(quantity) => Ok(band.rate),
            _ => Err(AllocationError::Configuration(format!(
                "no rate band for category {} at quantity {}",
                category, quantity
            ))),
        }
    }

    /// Bands configured for a category, sorted by lower bound
    pub fn bands(&self, category: Category) -> &[RateBand] {
        self.bands.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Build a contiguous band list from upper-bound steps and a tail rate.
///
/// `steps` are `(inclusive upper bound, rate)` pairs in ascending order; the
/// first band starts at 1 and the tail band is unbounded. Steps that are not
/// strictly ascending produce a list that table validation rejects.
pub fn ladder(steps: &[(u64, Decimal)], tail: Decimal) -> Vec<RateBand> {
    let mut bands = Vec::with_capacity(steps.len() + 1);
    let mut lower = 1u64;

    for &(upper, rate) in steps {
        bands.push(RateBand::bounded(lower, upper, rate));
        lower = upper.saturating_add(1);
    }
    bands.push(RateBand::unbounded(lower, tail));

    bands
}

fn validate_bands(category: Category, bands: &[RateBand]) -> AllocationResult<()> {
    let invalid = |reason: String| {
        Err(AllocationError::Configuration(format!(
            "category {}: {}",
            category, reason
        )))
    };

    let first = match bands.first() {
        Some(band) => band,
        None => return invalid("no rate bands".to_string()),
    };
    if first.lower != 1 {
        return invalid(format!("first band starts at {}, expected 1", first.lower));
    }

    for (i, band) in bands.iter().enumerate() {
        if band.rate.is_sign_negative() && !band.rate.is_zero() {
            return invalid(format!("negative rate {} in band {}", band.rate, i));
        }
        if exact_fixed(band.rate).is_none() {
            return invalid(format!(
                "rate {} in band {} does not fit {} decimal places",
                band.rate, i, MAX_RATE_DP
            ));
        }

        let is_last = i + 1 == bands.len();
        match band.upper {
            None if !is_last => {
                return invalid(format!("unbounded band {} is not the last band", i));
            }
            None => {}
            Some(_) if is_last => {
                return invalid(format!(
                    "last band ends at {:?}, expected unbounded",
                    band.upper
                ));
            }
            Some(upper) => {
                if upper < band.lower {
                    return invalid(format!(
                        "band {} has upper {} below lower {}",
                        i, upper, band.lower
                    ));
                }
                let next = &bands[i + 1];
                if Some(next.lower) != upper.checked_add(1) {
                    return invalid(format!(
                        "band {} ends at {} but band {} starts at {}",
                        i,
                        upper,
                        i + 1,
                        next.lower
                    ));
                }
            }
        }
    }

    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
