//! Precedence-ordered allocation.
//!
//! ## Algorithm
//!
//! 1. Stable-sort requests by category rank (equal categories keep input order)
//! 2. Walk the sorted list with `remaining = capacity`
//! 3. `assigned = min(remaining, requested)`; a zero assignment emits a
//!    starved entry (rate 0) and the walk continues
//! 4. Look up the rate at the **assigned** quantity, not the requested one
//! 5. `remaining -= assigned`
//!
//! The result is a fresh list; nothing about a previous pass is reused, so
//! running the same input twice gives the same output.

use log::debug;

use crate::bands::RateBandTable;
use crate::error::AllocationResult;
use crate::types::{Allocation, EntryRequest};

/// Allocate `capacity` across `requests` in precedence order.
///
/// Every request appears exactly once in the output, in precedence order.
/// The sum of assigned quantities never exceeds `capacity`, and an entry is
/// never reduced to make room for a lower-precedence one.
///
/// # Errors
///
/// Returns a configuration error if the table has no band for an assigned
/// quantity. A validated [`RateBandTable`] covers every quantity >= 1, so
/// this only happens with hand-built tables.
///
/// # Example
///
/// ```
/// use allocation_engine::bands::{ladder, RateBandTable};
/// use allocation_engine::engine::allocate;
/// use allocation_engine::types::{Category, EntryId, EntryRequest};
/// use rust_decimal::Decimal;
///
/// let table = RateBandTable::uniform(ladder(&[(100, Decimal::ONE)], Decimal::new(5, 1))).unwrap();
/// let requests = vec![
///     EntryRequest::new(EntryId(1), Category::Duty, 500),
///     EntryRequest::new(EntryId(2), Category::Statutory, 500),
/// ];
///
/// let result = allocate(600, &requests, &table).unwrap();
///
/// // Statutory is served first, Duty gets what is left
/// assert_eq!(result[0].id, EntryId(2));
/// assert_eq!(result[0].assigned, 500);
/// assert_eq!(result[1].assigned, 100);
/// assert_eq!(result[1].rate, Decimal::ONE);
/// ```
pub fn allocate(
    capacity: u64,
    requests: &[EntryRequest],
    table: &RateBandTable,
) -> AllocationResult<Vec<Allocation>> {
    let ordered = precedence_order(requests);

    let mut remaining = capacity;
    let mut starved = 0usize;
    let mut allocations = Vec::with_capacity(ordered.len());

    for request in &ordered {
        let assigned = remaining.min(request.requested);
        if assigned == 0 {
            starved += 1;
            allocations.push(Allocation::starved(request));
            continue;
        }

        let rate = table.rate_for(request.category, assigned)?;
        remaining -= assigned;
        allocations.push(Allocation::new(request, assigned, rate));
    }

    debug!(
        "allocated {} of {} across {} entries ({} starved)",
        capacity - remaining,
        capacity,
        allocations.len(),
        starved
    );
    if starved > 0 && remaining == 0 {
        debug!("capacity {} exhausted, {} entries starved", capacity, starved);
    }

    Ok(allocations)
}

/// Requests sorted by category rank, input order preserved within a rank.
pub fn precedence_order(requests: &[EntryRequest]) -> Vec<EntryRequest> {
    let mut ordered = requests.to_vec();
    // sort_by_key is stable
    ordered.sort_by_key(|request| request.category.rank());
    ordered
}

/// An allocator bound to one band table.
///
/// Holders share an allocator so that every recalculation uses the same
/// immutable bands.
#[derive(Debug, Clone)]
pub struct Allocator {
    table: RateBandTable,
}

impl Allocator {
    /// Create an allocator over a validated table
    pub fn new(table: RateBandTable) -> Self {
        Self { table }
    }

    /// Allocate `capacity` across `requests`
    pub fn allocate(
        &self,
        capacity: u64,
        requests: &[EntryRequest],
    ) -> AllocationResult<Vec<Allocation>> {
        allocate(capacity, requests, &self.table)
    }

    /// The band table used for rate lookups
    pub fn table(&self) -> &RateBandTable {
        &self.table
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
