//! Realized allocation for a single entry.
//!
//! ## SSZ Serialization
//!
//! [`AllocationRecord`] derives `SimpleSerialize` from ssz_rs so that a
//! realized allocation list always encodes to the same bytes. Rates are
//! stored as fixed-point u64 (see [`crate::types::rate`]).

use rust_decimal::Decimal;
use ssz_rs::prelude::*;

use crate::types::rate::{checked_charge, decimal_to_fixed};
use crate::types::{Category, EntryId, EntryRequest};

/// The outcome of allocating one entry.
///
/// `assigned` never exceeds `requested`. A starved entry keeps its place in
/// the list with `assigned == 0` and a zero rate.
///
/// ## Example
///
/// ```
/// use allocation_engine::types::{Allocation, Category, EntryId, EntryRequest};
/// use rust_decimal::Decimal;
///
/// let request = EntryRequest::new(EntryId(1), Category::Duty, 500);
/// let allocation = Allocation::new(&request, 100, Decimal::ONE);
///
/// assert_eq!(allocation.shortfall(), 400);
/// assert_eq!(allocation.charge(), Decimal::from(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Allocation {
    /// Entry identity
    pub id: EntryId,

    /// Entry category
    pub category: Category,

    /// Quantity the entry asked for
    pub requested: u64,

    /// Quantity actually assigned
    pub assigned: u64,

    /// Rate looked up at the assigned quantity
    pub rate: Decimal,
}

impl Allocation {
    /// Create an allocation for a request
    pub fn new(request: &EntryRequest, assigned: u64, rate: Decimal) -> Self {
        Self {
            id: request.id,
            category: request.category,
            requested: request.requested,
            assigned,
            rate,
        }
    }

    /// Create a starved allocation (nothing assigned, zero rate)
    pub fn starved(request: &EntryRequest) -> Self {
        Self::new(request, 0, Decimal::ZERO)
    }

    /// Check if nothing was assigned
    #[inline]
    pub fn is_starved(&self) -> bool {
        self.assigned == 0
    }

    /// Check if the full request was satisfied
    #[inline]
    pub fn is_satisfied(&self) -> bool {
        self.assigned == self.requested
    }

    /// Requested quantity that could not be assigned
    #[inline]
    pub fn shortfall(&self) -> u64 {
        self.requested.saturating_sub(self.assigned)
    }

    /// Charge for this allocation (`assigned * rate`).
    ///
    /// Saturates at `Decimal::MAX` on overflow.
    pub fn charge(&self) -> Decimal {
        checked_charge(self.assigned, self.rate).unwrap_or(Decimal::MAX)
    }

    /// The request this allocation would make if fed back to the allocator
    /// as-is (requested = assigned).
    pub fn as_request(&self) -> EntryRequest {
        EntryRequest::new(self.id, self.category, self.assigned)
    }

    /// Deterministic encoding of this allocation.
    ///
    /// Rates from a validated band table encode exactly; a hand-built rate
    /// past the fixed-point range is clamped.
    pub fn to_record(&self) -> AllocationRecord {
        AllocationRecord {
            id: self.id.value(),
            category_raw: self.category.to_u8(),
            requested: self.requested,
            assigned: self.assigned,
            rate_fixed: decimal_to_fixed(self.rate).unwrap_or(u64::MAX),
        }
    }
}

// ============================================================================
// AllocationRecord
// ============================================================================

/// Fixed-size SSZ container for a realized allocation.
///
/// Total size: 33 bytes (8+1+8+8+8)
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct AllocationRecord {
    /// Entry identifier
    pub id: u64,

    /// Category as u8 (0=S, 1=D, 2=O)
    pub category_raw: u8,

    /// Requested quantity
    pub requested: u64,

    /// Assigned quantity
    pub assigned: u64,

    /// Rate in fixed-point (scaled by 10^8)
    pub rate_fixed: u64,
}

impl AllocationRecord {
    /// Get the category, if the raw value is valid
    pub fn category(&self) -> Option<Category> {
        Category::from_u8(self.category_raw)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
