//! Thread-safe holder handle.
//!
//! Every operation takes the holder's lock for the whole
//! read-mutate-recalculate-store sequence, so concurrent callers never
//! observe a half-applied mutation.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::AllocationResult;
use crate::holder::AllocationHolder;
use crate::ids::IdProvider;
use crate::types::{Allocation, AllocationSummary, Category, EntryId, EntryRequest};

/// Cloneable handle to a holder shared across threads.
///
/// Clones refer to the same holder.
#[derive(Debug, Clone)]
pub struct SharedHolder {
    inner: Arc<Mutex<AllocationHolder>>,
}

impl SharedHolder {
    /// Wrap a holder
    pub fn new(holder: AllocationHolder) -> Self {
        Self {
            inner: Arc::new(Mutex::new(holder)),
        }
    }

    /// Add an entry and recalculate
    pub fn insert(&self, request: EntryRequest) -> AllocationResult<()> {
        self.inner.lock().insert(request)
    }

    /// Add an entry with an id drawn from `ids` and recalculate
    pub fn insert_new<P>(&self, ids: &mut P, category: Category, requested: u64) -> AllocationResult<EntryId>
    where
        P: IdProvider + ?Sized,
    {
        self.inner.lock().insert_new(ids, category, requested)
    }

    /// Remove an entry and recalculate
    pub fn remove(&self, id: EntryId) -> AllocationResult<EntryRequest> {
        self.inner.lock().remove(id)
    }

    /// Replace the entry set and recalculate
    pub fn replace(&self, requests: Vec<EntryRequest>) -> AllocationResult<()> {
        self.inner.lock().replace(requests)
    }

    /// Re-derive the allocation
    pub fn recalculate(&self) -> AllocationResult<()> {
        self.inner.lock().recalculate()
    }

    /// Copy of the realized entries
    pub fn snapshot(&self) -> Vec<Allocation> {
        self.inner.lock().entries().to_vec()
    }

    /// Summary of the current allocation
    pub fn summary(&self) -> AllocationResult<AllocationSummary> {
        self.inner.lock().summary()
    }

    /// Total capacity
    pub fn capacity(&self) -> u64 {
        self.inner.lock().capacity()
    }

    /// Run a read-only closure against the holder under the lock
    pub fn with<R>(&self, f: impl FnOnce(&AllocationHolder) -> R) -> R {
        f(&self.inner.lock())
    }
}

impl From<AllocationHolder> for SharedHolder {
    fn from(holder: AllocationHolder) -> Self {
        Self::new(holder)
    }
}
