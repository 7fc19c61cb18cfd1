//! Allocation engine module.
//!
//! ## Design Principles
//!
//! 1. **Pure derivation**: an allocation is a function of (capacity, requests, bands)
//! 2. **Determinism**: same input always produces same output
//! 3. **Decimal rates**: no floating-point operations
//! 4. **Synchronous execution**: no I/O, no suspension points
//!
//! ## Allocation Rules
//!
//! - Requests are served in ascending category rank
//! - Requests of the same category are served in input order
//! - Each entry gets `min(remaining, requested)`
//! - Starved entries stay in the output with quantity 0 and rate 0
//! - Rates are looked up at the assigned quantity

pub mod allocator;

pub use allocator::{allocate, precedence_order, Allocator};
