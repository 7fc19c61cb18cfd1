//! Summary of a realized allocation list.
//!
//! The summary gives downstream booking the totals it needs and a digest
//! that identifies the exact allocation. Two allocation lists with the same
//! ids, categories, quantities and rates in the same order always produce
//! the same digest.

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::error::{AllocationError, AllocationResult};
use crate::types::Allocation;

/// Totals and digest for one allocation pass.
///
/// ## Example
///
/// ```
/// use allocation_engine::types::{Allocation, AllocationSummary, Category, EntryId, EntryRequest};
/// use rust_decimal::Decimal;
///
/// let allocations = vec![
///     Allocation::new(&EntryRequest::new(EntryId(1), Category::Statutory, 500), 500, Decimal::new(8, 1)),
///     Allocation::new(&EntryRequest::new(EntryId(2), Category::Duty, 500), 100, Decimal::ONE),
/// ];
///
/// let summary = AllocationSummary::from_allocations(600, &allocations).unwrap();
/// assert_eq!(summary.total_assigned, 600);
/// assert_eq!(summary.unallocated, 0);
/// assert_eq!(summary.total_charge, Decimal::from(500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationSummary {
    /// Holder capacity the allocation ran against
    pub capacity: u64,

    /// Number of entries in the allocation (starved ones included)
    pub entry_count: u64,

    /// Sum of requested quantities
    pub total_requested: u64,

    /// Sum of assigned quantities (never above capacity)
    pub total_assigned: u64,

    /// Capacity left over after allocation
    pub unallocated: u64,

    /// Entries that received nothing
    pub starved_count: u64,

    /// Sum of per-entry charges
    pub total_charge: Decimal,

    /// SHA-256 over the SSZ encoding of every allocation, in order
    pub digest: [u8; 32],
}

impl AllocationSummary {
    /// Build a summary from a realized allocation list
    pub fn from_allocations(capacity: u64, allocations: &[Allocation]) -> AllocationResult<Self> {
        let mut total_requested = 0u64;
        let mut total_assigned = 0u64;
        let mut starved_count = 0u64;
        let mut total_charge = Decimal::ZERO;

        for allocation in allocations {
            total_requested = total_requested.saturating_add(allocation.requested);
            total_assigned = total_assigned.saturating_add(allocation.assigned);
            if allocation.is_starved() {
                starved_count += 1;
            }
            total_charge = total_charge.saturating_add(allocation.charge());
        }

        Ok(Self {
            capacity,
            entry_count: allocations.len() as u64,
            total_requested,
            total_assigned,
            unallocated: capacity.saturating_sub(total_assigned),
            starved_count,
            total_charge,
            digest: Self::compute_digest(allocations)?,
        })
    }

    /// Compute the SHA-256 digest of an allocation list
    pub fn compute_digest(allocations: &[Allocation]) -> AllocationResult<[u8; 32]> {
        let mut hasher = Sha256::new();
        for allocation in allocations {
            let bytes = ssz_rs::serialize(&allocation.to_record())
                .map_err(|e| AllocationError::Encoding(format!("{:?}", e)))?;
            hasher.update(&bytes);
        }
        let result = hasher.finalize();

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        Ok(hash)
    }

    /// Get the digest as a hex string
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// Check if the allocation had no entries
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Check if requests exceeded capacity
    pub fn is_oversubscribed(&self) -> bool {
        self.total_requested > self.capacity
    }

    /// Fraction of capacity assigned
    ///
    /// Returns None for zero capacity.
    pub fn utilization(&self) -> Option<Decimal> {
        if self.capacity == 0 {
            None
        } else {
            Some(Decimal::from(self.total_assigned) / Decimal::from(self.capacity))
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, EntryId, EntryRequest};

    fn alloc(id: u64, category: Category, requested: u64, assigned: u64, rate: Decimal) -> Allocation {
        Allocation::new(&EntryRequest::new(EntryId(id), category, requested), assigned, rate)
    }

    #[test]
    fn test_summary_totals() {
        let allocations = vec![
            alloc(1, Category::Statutory, 500, 500, Decimal::new(8, 1)),
            alloc(2, Category::Duty, 500, 100, Decimal::ONE),
            alloc(3, Category::Other, 250, 0, Decimal::ZERO),
        ];

        let summary = AllocationSummary::from_allocations(600, &allocations).unwrap();

        assert_eq!(summary.entry_count, 3);
        assert_eq!(summary.total_requested, 1250);
        assert_eq!(summary.total_assigned, 600);
        assert_eq!(summary.unallocated, 0);
        assert_eq!(summary.starved_count, 1);
        assert_eq!(summary.total_charge, Decimal::from(500));
        assert!(summary.is_oversubscribed());
        assert_eq!(summary.utilization(), Some(Decimal::ONE));
    }

    #[test]
    fn test_summary_empty() {
        let summary = AllocationSummary::from_allocations(0, &[]).unwrap();

        assert!(summary.is_empty());
        assert_eq!(summary.utilization(), None);
        assert!(!summary.is_oversubscribed());
    }

    #[test]
    fn test_digest_determinism() {
        let allocations = vec![
            alloc(1, Category::Statutory, 500, 500, Decimal::new(8, 1)),
            alloc(2, Category::Duty, 500, 500, Decimal::new(5, 1)),
        ];

        let d1 = AllocationSummary::compute_digest(&allocations).unwrap();
        let d2 = AllocationSummary::compute_digest(&allocations).unwrap();
        assert_eq!(d1, d2);

        // Order matters
        let reversed: Vec<Allocation> = allocations.iter().rev().copied().collect();
        let d3 = AllocationSummary::compute_digest(&reversed).unwrap();
        assert_ne!(d1, d3);
    }

    #[test]
    fn test_digest_changes_with_rate() {
        let a = vec![alloc(1, Category::Statutory, 500, 500, Decimal::new(8, 1))];
        let b = vec![alloc(1, Category::Statutory, 500, 500, Decimal::new(5, 1))];

        assert_ne!(
            AllocationSummary::compute_digest(&a).unwrap(),
            AllocationSummary::compute_digest(&b).unwrap()
        );
    }

    #[test]
    fn test_digest_hex() {
        let summary = AllocationSummary::from_allocations(10, &[]).unwrap();
        let hex = summary.digest_hex();

        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
