//! Rate band tables for the allocation engine.
//!
//! ## Components
//!
//! - [`RateBand`]: An inclusive quantity range mapped to a rate
//! - [`RateBandTable`]: Validated, immutable bands for every category
//! - [`ladder`]: Helper for building contiguous band lists
//!
//! ## Lookup
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Build table | O(b log b) per category |
//! | `rate_for` | O(log b) |

pub mod band;
pub mod table;

pub use band::RateBand;
pub use table::{ladder, RateBandTable};
