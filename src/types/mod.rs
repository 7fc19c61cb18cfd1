//! Core data types for the allocation engine
//!
//! ## Types
//!
//! - [`EntryId`]: Opaque entry identity
//! - [`Category`]: Closed set of entry categories with precedence ranks
//! - [`EntryRequest`]: A typed request for a share of capacity
//! - [`Allocation`]: The realized quantity and rate for one entry
//! - [`AllocationRecord`]: Deterministic SSZ encoding of an allocation
//! - [`AllocationSummary`]: Totals and digest for an allocation pass
//!
//! ## Numeric Representation
//!
//! Quantities are plain `u64`. Rates and charges are `rust_decimal::Decimal`
//! and are only converted to fixed-point (scaled by 10^8) for encoding.

mod entry;
mod allocation;
mod summary;
pub mod rate;

pub use entry::{Category, EntryId, EntryRequest};
pub use allocation::{Allocation, AllocationRecord};
pub use summary::AllocationSummary;
