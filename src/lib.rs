//! # Allocation Engine
//!
//! Precedence-ordered, volume-banded quantity allocation.
//!
//! ## Architecture
//!
//! - **Types**: Entries, categories, realized allocations and summaries
//! - **Bands**: Validated per-category rate band tables
//! - **Engine**: The allocator, a pure function of (capacity, requests, bands)
//! - **Holder**: Capacity plus entries, recalculated from scratch on every mutation
//! - **Config**: JSON configuration for capacity, policy and bands
//!
//! ## Design Principles
//!
//! 1. **Determinism**: All operations produce identical results for identical inputs
//! 2. **No Floating Point**: Rates and charges use `rust_decimal`
//! 3. **Re-derivation**: Holders never patch allocations in place
//! 4. **Synchronous Execution**: No I/O or suspension points in the engine

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: EntryRequest, Allocation, AllocationSummary
pub mod types;

/// Rate band tables
pub mod bands;

/// Allocator
pub mod engine;

/// Allocation holders
pub mod holder;

/// Entry id providers
pub mod ids;

/// Configuration loading
pub mod config;

/// Error types
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use types::{Allocation, AllocationSummary, Category, EntryId, EntryRequest};
pub use bands::{RateBand, RateBandTable};
pub use engine::{allocate, Allocator};
pub use holder::{AllocationHolder, InsertPolicy, SharedHolder};
pub use ids::{IdProvider, SequentialIds};
pub use config::EngineConfig;
pub use error::{AllocationError, AllocationResult, ConfigError};
