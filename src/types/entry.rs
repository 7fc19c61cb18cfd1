//! Entry types for the allocation engine.
//!
//! An entry is a typed request for a share of a holder's capacity. Its
//! [`Category`] decides when it is served: the allocator walks entries in
//! ascending category rank, preserving input order within a category.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AllocationError;

// ============================================================================
// EntryId
// ============================================================================

/// Opaque entry identity, unique within a holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl EntryId {
    /// Raw numeric value
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntryId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Category enum
// ============================================================================

/// Closed set of entry categories.
///
/// Each category carries a precedence rank; lower ranks are served first.
/// Ranks are distinct, so precedence is a total order.
///
/// Represented as u8 for encoding:
/// - Statutory = 0
/// - Duty = 1
/// - Other = 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Statutory levies, always served first
    #[serde(rename = "S", alias = "Statutory")]
    Statutory,
    /// Duties
    #[serde(rename = "D", alias = "Duty")]
    Duty,
    /// Everything else
    #[serde(rename = "O", alias = "Other")]
    Other,
}

impl Category {
    /// All categories in precedence order
    pub const ALL: [Category; 3] = [Category::Statutory, Category::Duty, Category::Other];

    /// Precedence rank (1 = served first)
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            Category::Statutory => 1,
            Category::Duty => 2,
            Category::Other => 3,
        }
    }

    /// One-letter code used in configuration and display
    pub fn code(self) -> char {
        match self {
            Category::Statutory => 'S',
            Category::Duty => 'D',
            Category::Other => 'O',
        }
    }

    /// Parse a one-letter code
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'S' => Some(Category::Statutory),
            'D' => Some(Category::Duty),
            'O' => Some(Category::Other),
            _ => None,
        }
    }

    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Category::Statutory => 0,
            Category::Duty => 1,
            Category::Other => 2,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Category::Statutory),
            1 => Some(Category::Duty),
            2 => Some(Category::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Category {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(category) = Category::from_code(c) {
                return Ok(category);
            }
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "statutory" => Ok(Category::Statutory),
            "duty" => Ok(Category::Duty),
            "other" => Ok(Category::Other),
            _ => Err(AllocationError::Configuration(format!(
                "unknown category '{}'",
                trimmed
            ))),
        }
    }
}

// ============================================================================
// EntryRequest struct
// ============================================================================

/// A request for a share of capacity.
///
/// ## Example
///
/// ```
/// use allocation_engine::types::{Category, EntryId, EntryRequest};
///
/// let request = EntryRequest::new(EntryId(1), Category::Statutory, 500);
/// assert_eq!(request.category.rank(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryRequest {
    /// Entry identity
    pub id: EntryId,

    /// Category deciding precedence and rate table
    pub category: Category,

    /// Requested quantity
    pub requested: u64,
}

impl EntryRequest {
    /// Create a new request
    pub fn new(id: EntryId, category: Category, requested: u64) -> Self {
        Self {
            id,
            category,
            requested,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ranks_are_distinct_and_ordered() {
        let ranks: Vec<u8> = Category::ALL.iter().map(|c| c.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3]);

        // Derived ordering agrees with rank ordering
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }

    #[test]
    fn test_category_code_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::from_code(category.code()), Some(category));
        }
        assert_eq!(Category::from_code('s'), Some(Category::Statutory));
        assert_eq!(Category::from_code('X'), None);
    }

    #[test]
    fn test_category_u8_conversion() {
        assert_eq!(Category::Statutory.to_u8(), 0);
        assert_eq!(Category::Other.to_u8(), 2);
        assert_eq!(Category::from_u8(1), Some(Category::Duty));
        assert_eq!(Category::from_u8(3), None);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("S".parse::<Category>().unwrap(), Category::Statutory);
        assert_eq!("duty".parse::<Category>().unwrap(), Category::Duty);
        assert_eq!(" O ".parse::<Category>().unwrap(), Category::Other);
        assert!(matches!(
            "tax".parse::<Category>(),
            Err(AllocationError::Configuration(_))
        ));
    }

    #[test]
    fn test_category_serde_codes() {
        let json = serde_json::to_string(&Category::Duty).unwrap();
        assert_eq!(json, "\"D\"");

        let parsed: Category = serde_json::from_str("\"Other\"").unwrap();
        assert_eq!(parsed, Category::Other);
    }

    #[test]
    fn test_entry_id_display() {
        assert_eq!(EntryId(42).to_string(), "42");
        assert_eq!(EntryId::from(7).value(), 7);
    }
}
