//! Allocation holders.
//!
//! ## Components
//!
//! - [`AllocationHolder`]: Capacity plus entries, recalculated on every mutation
//! - [`SharedHolder`]: Lock-guarded handle for concurrent callers
//! - [`InsertPolicy`]: Starve or reject on oversubscription
//!
//! ## Operations
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | `insert` | append request, recalculate |
//! | `remove` | drop request, recalculate |
//! | `replace` | swap the whole request set, recalculate |
//! | `recalculate` | re-derive allocation from current requests |
//!
//! Recalculation is O(n log n) in the number of entries.

pub mod local;
pub mod shared;

pub use local::{AllocationHolder, InsertPolicy};
pub use shared::SharedHolder;
