//! Entry identity generation.
//!
//! Holders never mint ids themselves; callers inject an [`IdProvider`] when
//! they want ids assigned for them.

use crate::types::EntryId;

/// Source of entry identities.
///
/// Implementations must produce monotonically non-decreasing ids. An id
/// that repeats is caught by the holder as a duplicate entry.
pub trait IdProvider {
    /// Get the next id and advance the provider
    fn next_id(&mut self) -> EntryId;
}

/// Counter-backed id provider.
///
/// The counter saturates: once `u64::MAX` has been handed out it is handed
/// out again rather than wrapping back to 0.
///
/// ```
/// use allocation_engine::ids::{IdProvider, SequentialIds};
/// use allocation_engine::types::EntryId;
///
/// let mut ids = SequentialIds::new();
/// assert_eq!(ids.next_id(), EntryId(1));
/// assert_eq!(ids.next_id(), EntryId(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIds {
    next: u64,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl SequentialIds {
    /// Start at id 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start at a given id
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Get the next id without advancing
    #[inline]
    pub fn peek(&self) -> EntryId {
        EntryId(self.next)
    }
}

impl IdProvider for SequentialIds {
    fn next_id(&mut self) -> EntryId {
        let id = EntryId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

impl<F> IdProvider for F
where
    F: FnMut() -> EntryId,
{
    fn next_id(&mut self) -> EntryId {
        self()
    }
}
