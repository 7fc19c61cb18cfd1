//! Allocation holder: fixed capacity plus the current entry set.
//!
//! ## Consistency
//!
//! The holder keeps two lists:
//!
//! - `requests`: entries as the caller supplied them, in insertion order
//! - `entries`: the realized allocation, in precedence order
//!
//! Every mutation builds a candidate request list, allocates it from
//! scratch, and only then stores both lists. If any step fails the holder
//! keeps its previous state, so callers only ever see consistent holders.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::engine::Allocator;
use crate::error::{AllocationError, AllocationResult};
use crate::ids::IdProvider;
use crate::types::{Allocation, AllocationSummary, Category, EntryId, EntryRequest};

/// What to do when requested quantities exceed capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPolicy {
    /// Accept the request; lower-precedence entries are starved
    #[default]
    Starve,
    /// Reject the mutation with `CapacityExceeded`
    Reject,
}

/// Aggregate owning a capacity and its entries.
///
/// ## Example
///
/// ```
/// use allocation_engine::bands::{ladder, RateBandTable};
/// use allocation_engine::engine::Allocator;
/// use allocation_engine::holder::AllocationHolder;
/// use allocation_engine::types::{Category, EntryId, EntryRequest};
/// use rust_decimal::Decimal;
///
/// let table = RateBandTable::uniform(ladder(&[(100, Decimal::ONE)], Decimal::new(5, 1))).unwrap();
/// let mut holder = AllocationHolder::new(600, Allocator::new(table));
///
/// holder.insert(EntryRequest::new(EntryId(1), Category::Duty, 500)).unwrap();
/// holder.insert(EntryRequest::new(EntryId(2), Category::Statutory, 500)).unwrap();
///
/// assert_eq!(holder.get(EntryId(1)).unwrap().assigned, 100);
///
/// holder.remove(EntryId(2)).unwrap();
/// assert_eq!(holder.get(EntryId(1)).unwrap().assigned, 500);
/// ```
#[derive(Debug, Clone)]
pub struct AllocationHolder {
    /// Quantity ceiling, fixed at construction
    capacity: u64,

    /// Oversubscription policy for mutations
    policy: InsertPolicy,

    /// Allocator bound to the immutable band table
    allocator: Allocator,

    /// Requests in insertion order
    requests: Vec<EntryRequest>,

    /// Realized allocation in precedence order
    entries: Vec<Allocation>,
}

impl AllocationHolder {
    /// Create an empty holder with the starve policy
    pub fn new(capacity: u64, allocator: Allocator) -> Self {
        Self {
            capacity,
            policy: InsertPolicy::default(),
            allocator,
            requests: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Set the oversubscription policy
    pub fn with_policy(mut self, policy: InsertPolicy) -> Self {
        self.policy = policy;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Total capacity
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Oversubscription policy
    #[inline]
    pub fn policy(&self) -> InsertPolicy {
        self.policy
    }

    /// Allocator used for recalculation
    #[inline]
    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    /// Realized entries in precedence order
    #[inline]
    pub fn entries(&self) -> &[Allocation] {
        &self.entries
    }

    /// Requests in insertion order
    #[inline]
    pub fn requests(&self) -> &[EntryRequest] {
        &self.requests
    }

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Check if the holder has no entries
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Realized allocation for an entry
    pub fn get(&self, id: EntryId) -> Option<&Allocation> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Check if an entry exists
    pub fn contains(&self, id: EntryId) -> bool {
        self.requests.iter().any(|request| request.id == id)
    }

    /// Sum of requested quantities
    pub fn total_requested(&self) -> u64 {
        sum_requested(&self.requests)
    }

    /// Sum of assigned quantities
    pub fn total_assigned(&self) -> u64 {
        self.entries.iter().map(|entry| entry.assigned).sum()
    }

    /// Totals and digest for the current allocation
    pub fn summary(&self) -> AllocationResult<AllocationSummary> {
        AllocationSummary::from_allocations(self.capacity, &self.entries)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Re-derive the allocation from the current requests.
    pub fn recalculate(&mut self) -> AllocationResult<()> {
        let requests = self.requests.clone();
        self.commit(requests)
    }

    /// Add an entry and recalculate.
    ///
    /// # Errors
    ///
    /// - `DuplicateEntry` if an entry with the same id exists
    /// - `CapacityExceeded` under [`InsertPolicy::Reject`] when the total
    ///   requested quantity would exceed capacity
    pub fn insert(&mut self, request: EntryRequest) -> AllocationResult<()> {
        if self.contains(request.id) {
            warn!("insert rejected: duplicate entry {}", request.id);
            return Err(AllocationError::DuplicateEntry(request.id));
        }

        let mut candidate = Vec::with_capacity(self.requests.len() + 1);
        candidate.extend_from_slice(&self.requests);
        candidate.push(request);
        self.check_capacity(&candidate)?;
        self.commit(candidate)?;

        info!(
            "inserted entry {} ({} x {}), {} entries",
            request.id,
            request.category,
            request.requested,
            self.requests.len()
        );
        Ok(())
    }

    /// Add an entry with an id drawn from `ids` and recalculate.
    ///
    /// The id is consumed even if the insert fails.
    pub fn insert_new<P>(
        &mut self,
        ids: &mut P,
        category: Category,
        requested: u64,
    ) -> AllocationResult<EntryId>
    where
        P: IdProvider + ?Sized,
    {
        let id = ids.next_id();
        self.insert(EntryRequest::new(id, category, requested))?;
        Ok(id)
    }

    /// Remove an entry and recalculate.
    ///
    /// Quantity the removed entry held flows to the next entries in
    /// precedence order. Returns the removed request.
    ///
    /// # Errors
    ///
    /// `NotFound` if no entry has this id; the holder is unchanged.
    pub fn remove(&mut self, id: EntryId) -> AllocationResult<EntryRequest> {
        let position = match self.requests.iter().position(|request| request.id == id) {
            Some(position) => position,
            None => {
                warn!("remove failed: entry {} not found", id);
                return Err(AllocationError::NotFound(id));
            }
        };

        let mut candidate = self.requests.clone();
        let removed = candidate.remove(position);
        self.commit(candidate)?;

        info!("removed entry {}, {} entries", id, self.requests.len());
        Ok(removed)
    }

    /// Replace the whole entry set and recalculate.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert), checked against the new set.
    pub fn replace(&mut self, requests: Vec<EntryRequest>) -> AllocationResult<()> {
        for (i, request) in requests.iter().enumerate() {
            if requests[..i].iter().any(|other| other.id == request.id) {
                warn!("replace rejected: duplicate entry {}", request.id);
                return Err(AllocationError::DuplicateEntry(request.id));
            }
        }
        self.check_capacity(&requests)?;
        self.commit(requests)?;

        info!("replaced entry set, {} entries", self.requests.len());
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn check_capacity(&self, candidate: &[EntryRequest]) -> AllocationResult<()> {
        if self.policy != InsertPolicy::Reject {
            return Ok(());
        }

        let requested = sum_requested(candidate);
        if requested > self.capacity {
            warn!(
                "mutation rejected: requested {} exceeds capacity {}",
                requested, self.capacity
            );
            return Err(AllocationError::CapacityExceeded {
                requested,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Allocate the candidate set and store it, or leave state untouched.
    fn commit(&mut self, candidate: Vec<EntryRequest>) -> AllocationResult<()> {
        let entries = self.allocator.allocate(self.capacity, &candidate)?;
        self.requests = candidate;
        self.entries = entries;
        Ok(())
    }
}

fn sum_requested(requests: &[EntryRequest]) -> u64 {
    requests
        .iter()
        .fold(0u64, |total, request| total.saturating_add(request.requested))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::{ladder, RateBandTable};
    use crate::ids::SequentialIds;
    use rust_decimal::Decimal;

    fn allocator() -> Allocator {
        Allocator::new(
            RateBandTable::uniform(ladder(
                &[(100, Decimal::ONE), (1000, Decimal::new(8, 1))],
                Decimal::new(5, 1),
            ))
            .unwrap(),
        )
    }

    fn req(id: u64, category: Category, requested: u64) -> EntryRequest {
        EntryRequest::new(EntryId(id), category, requested)
    }

    #[test]
    fn test_new_holder_is_empty() {
        let holder = AllocationHolder::new(1000, allocator());

        assert!(holder.is_empty());
        assert_eq!(holder.capacity(), 1000);
        assert_eq!(holder.policy(), InsertPolicy::Starve);
        assert!(holder.entries().is_empty());
    }

    #[test]
    fn test_insert_recalculates() {
        let mut holder = AllocationHolder::new(600, allocator());

        holder.insert(req(1, Category::Duty, 500)).unwrap();
        assert_eq!(holder.get(EntryId(1)).unwrap().assigned, 500);

        // Higher precedence entry takes priority on recalculation
        holder.insert(req(2, Category::Statutory, 500)).unwrap();
        assert_eq!(holder.entries()[0].id, EntryId(2));
        assert_eq!(holder.get(EntryId(1)).unwrap().assigned, 100);
        assert_eq!(holder.get(EntryId(1)).unwrap().rate, Decimal::ONE);
        assert_eq!(holder.total_assigned(), 600);
    }

    #[test]
    fn test_requests_keep_insertion_order() {
        let mut holder = AllocationHolder::new(600, allocator());
        holder.insert(req(1, Category::Other, 10)).unwrap();
        holder.insert(req(2, Category::Statutory, 10)).unwrap();

        let request_ids: Vec<EntryId> = holder.requests().iter().map(|r| r.id).collect();
        let entry_ids: Vec<EntryId> = holder.entries().iter().map(|e| e.id).collect();
        assert_eq!(request_ids, vec![EntryId(1), EntryId(2)]);
        assert_eq!(entry_ids, vec![EntryId(2), EntryId(1)]);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut holder = AllocationHolder::new(600, allocator());
        holder.insert(req(1, Category::Duty, 100)).unwrap();

        let err = holder.insert(req(1, Category::Other, 5)).unwrap_err();
        assert_eq!(err, AllocationError::DuplicateEntry(EntryId(1)));
        assert_eq!(holder.len(), 1);
    }

    #[test]
    fn test_reject_policy_blocks_oversubscription() {
        let mut holder = AllocationHolder::new(600, allocator()).with_policy(InsertPolicy::Reject);
        holder.insert(req(1, Category::Statutory, 500)).unwrap();

        let before = holder.entries().to_vec();
        let err = holder.insert(req(2, Category::Duty, 500)).unwrap_err();

        assert_eq!(
            err,
            AllocationError::CapacityExceeded {
                requested: 1000,
                capacity: 600
            }
        );
        assert_eq!(holder.entries(), before.as_slice());
        assert_eq!(holder.len(), 1);

        // Exactly at capacity is fine
        holder.insert(req(3, Category::Duty, 100)).unwrap();
        assert_eq!(holder.total_assigned(), 600);
    }

    #[test]
    fn test_starve_policy_accepts_oversubscription() {
        let mut holder = AllocationHolder::new(600, allocator());
        holder.insert(req(1, Category::Statutory, 600)).unwrap();
        holder.insert(req(2, Category::Other, 100)).unwrap();

        assert!(holder.get(EntryId(2)).unwrap().is_starved());
        assert_eq!(holder.len(), 2);
    }

    #[test]
    fn test_remove_redistributes() {
        let mut holder = AllocationHolder::new(600, allocator());
        holder.insert(req(1, Category::Statutory, 500)).unwrap();
        holder.insert(req(2, Category::Duty, 500)).unwrap();
        holder.insert(req(3, Category::Other, 500)).unwrap();

        assert_eq!(holder.get(EntryId(2)).unwrap().assigned, 100);
        assert!(holder.get(EntryId(3)).unwrap().is_starved());

        let removed = holder.remove(EntryId(1)).unwrap();
        assert_eq!(removed.requested, 500);

        assert_eq!(holder.get(EntryId(2)).unwrap().assigned, 500);
        assert_eq!(holder.get(EntryId(2)).unwrap().rate, Decimal::new(8, 1));
        assert_eq!(holder.get(EntryId(3)).unwrap().assigned, 100);
        assert!(holder.get(EntryId(1)).is_none());
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut holder = AllocationHolder::new(600, allocator());
        holder.insert(req(1, Category::Statutory, 500)).unwrap();

        let err = holder.remove(EntryId(99)).unwrap_err();
        assert_eq!(err, AllocationError::NotFound(EntryId(99)));
        assert_eq!(holder.len(), 1);
    }

    #[test]
    fn test_replace_whole_set() {
        let mut holder = AllocationHolder::new(600, allocator());
        holder.insert(req(1, Category::Statutory, 500)).unwrap();

        holder
            .replace(vec![req(5, Category::Other, 50), req(6, Category::Duty, 50)])
            .unwrap();

        assert!(!holder.contains(EntryId(1)));
        assert_eq!(holder.entries()[0].id, EntryId(6));
        assert_eq!(holder.total_assigned(), 100);
    }

    #[test]
    fn test_replace_rejects_duplicates_and_keeps_state() {
        let mut holder = AllocationHolder::new(600, allocator());
        holder.insert(req(1, Category::Statutory, 500)).unwrap();

        let err = holder
            .replace(vec![req(5, Category::Other, 50), req(5, Category::Duty, 50)])
            .unwrap_err();

        assert_eq!(err, AllocationError::DuplicateEntry(EntryId(5)));
        assert!(holder.contains(EntryId(1)));
    }

    #[test]
    fn test_replace_respects_reject_policy() {
        let mut holder = AllocationHolder::new(100, allocator()).with_policy(InsertPolicy::Reject);

        let err = holder
            .replace(vec![req(1, Category::Other, 60), req(2, Category::Duty, 60)])
            .unwrap_err();
        assert!(matches!(err, AllocationError::CapacityExceeded { .. }));
        assert!(holder.is_empty());
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let mut holder = AllocationHolder::new(700, allocator());
        holder.insert(req(1, Category::Other, 300)).unwrap();
        holder.insert(req(2, Category::Statutory, 500)).unwrap();

        let before = holder.entries().to_vec();
        holder.recalculate().unwrap();
        holder.recalculate().unwrap();
        assert_eq!(holder.entries(), before.as_slice());
    }

    #[test]
    fn test_insert_new_uses_provider() {
        let mut holder = AllocationHolder::new(600, allocator());
        let mut ids = SequentialIds::starting_at(40);

        let first = holder.insert_new(&mut ids, Category::Duty, 10).unwrap();
        let second = holder.insert_new(&mut ids, Category::Other, 10).unwrap();

        assert_eq!(first, EntryId(40));
        assert_eq!(second, EntryId(41));
        assert!(holder.contains(EntryId(41)));
    }

    #[test]
    fn test_insert_new_with_exhausted_ids_is_duplicate() {
        let mut holder = AllocationHolder::new(600, allocator());
        let mut ids = SequentialIds::starting_at(u64::MAX);

        assert_eq!(
            holder.insert_new(&mut ids, Category::Duty, 10).unwrap(),
            EntryId(u64::MAX)
        );
        assert_eq!(
            holder.insert_new(&mut ids, Category::Duty, 10),
            Err(AllocationError::DuplicateEntry(EntryId(u64::MAX)))
        );
        assert_eq!(holder.len(), 1);
    }

    #[test]
    fn test_summary_tracks_holder() {
        let mut holder = AllocationHolder::new(600, allocator());
        holder.insert(req(1, Category::Statutory, 500)).unwrap();
        holder.insert(req(2, Category::Duty, 500)).unwrap();

        let summary = holder.summary().unwrap();
        assert_eq!(summary.total_assigned, 600);
        assert_eq!(summary.total_requested, 1000);
        assert_eq!(summary.total_charge, Decimal::from(500));
    }

    #[test]
    fn test_policy_serde() {
        let policy: InsertPolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(policy, InsertPolicy::Reject);
        assert_eq!(serde_json::to_string(&InsertPolicy::Starve).unwrap(), "\"starve\"");
    }
}
