//! Engine configuration.
//!
//! A configuration document supplies the holder capacity, the
//! oversubscription policy and the rate bands for every category:
//!
//! ```json
//! {
//!   "capacity": 1250,
//!   "policy": "starve",
//!   "bands": {
//!     "S": [
//!       { "lower": 1,    "upper": 100,  "rate": "1.0" },
//!       { "lower": 101,  "upper": 1000, "rate": "0.8" },
//!       { "lower": 1001,                "rate": "0.5" }
//!     ],
//!     "D": [ ... ],
//!     "O": [ ... ]
//!   }
//! }
//! ```
//!
//! Bands are read once and turned into an immutable [`RateBandTable`].
//! Band lists are kept in document order, so a category written twice
//! (`"S"` and `"Statutory"`) reaches table validation and is rejected
//! there instead of one list silently replacing the other.

use std::fs;
use std::path::Path;

use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bands::{ladder, RateBand, RateBandTable};
use crate::engine::Allocator;
use crate::error::{AllocationResult, ConfigError};
use crate::holder::{AllocationHolder, InsertPolicy};
use crate::types::Category;

/// One band as written in a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSpec {
    /// Inclusive lower bound
    pub lower: u64,

    /// Inclusive upper bound; omitted for the final, unbounded band
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<u64>,

    /// Rate for the band
    pub rate: Decimal,
}

impl From<BandSpec> for RateBand {
    fn from(spec: BandSpec) -> Self {
        RateBand {
            lower: spec.lower,
            upper: spec.upper,
            rate: spec.rate,
        }
    }
}

impl From<RateBand> for BandSpec {
    fn from(band: RateBand) -> Self {
        BandSpec {
            lower: band.lower,
            upper: band.upper,
            rate: band.rate,
        }
    }
}

/// Capacity, policy and per-category bands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Holder capacity
    pub capacity: u64,

    /// Oversubscription policy
    #[serde(default)]
    pub policy: InsertPolicy,

    /// Band lists per category, in document order
    #[serde(with = "band_lists")]
    pub bands: Vec<(Category, Vec<BandSpec>)>,
}

impl EngineConfig {
    /// Parse a JSON document.
    ///
    /// Band coverage is checked here too, so a config that parses is one
    /// that builds a table.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.band_table()?;
        Ok(config)
    }

    /// Read and parse a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!(
            "loaded configuration from {} (capacity {}, policy {:?})",
            path.display(),
            config.capacity,
            config.policy
        );
        Ok(config)
    }

    /// Reference configuration.
    ///
    /// Statutory entries use `<=100 -> 1.0, <=1000 -> 0.8, else 0.5`; duty
    /// and other entries drop to the 0.5 tail above 200.
    pub fn reference() -> Self {
        let statutory = ladder(
            &[(100, Decimal::ONE), (1000, Decimal::new(8, 1))],
            Decimal::new(5, 1),
        );
        let secondary = ladder(
            &[(100, Decimal::ONE), (200, Decimal::new(8, 1))],
            Decimal::new(5, 1),
        );

        let specs = |bands: &[RateBand]| -> Vec<BandSpec> {
            bands.iter().copied().map(BandSpec::from).collect()
        };

        Self {
            capacity: 1250,
            policy: InsertPolicy::Starve,
            bands: vec![
                (Category::Statutory, specs(&statutory)),
                (Category::Duty, specs(&secondary)),
                (Category::Other, specs(&secondary)),
            ],
        }
    }

    /// Band list written for a category (the first one, if repeated)
    pub fn bands_for(&self, category: Category) -> Option<&[BandSpec]> {
        self.bands
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, specs)| specs.as_slice())
    }

    /// Build the validated band table
    pub fn band_table(&self) -> AllocationResult<RateBandTable> {
        RateBandTable::new(self.bands.iter().map(|(category, specs)| {
            (*category, specs.iter().copied().map(RateBand::from).collect())
        }))
    }

    /// Build an allocator over the configured bands
    pub fn allocator(&self) -> AllocationResult<Allocator> {
        Ok(Allocator::new(self.band_table()?))
    }

    /// Build an empty holder with the configured capacity and policy
    pub fn holder(&self) -> AllocationResult<AllocationHolder> {
        Ok(AllocationHolder::new(self.capacity, self.allocator()?).with_policy(self.policy))
    }

    /// Serialize to pretty JSON
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Category-keyed JSON object <-> ordered list, keeping repeated keys.
mod band_lists {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::BandSpec;
    use crate::types::Category;

    type BandLists = Vec<(Category, Vec<BandSpec>)>;

    pub fn serialize<S>(lists: &BandLists, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(lists.len()))?;
        for (category, specs) in lists {
            map.serialize_entry(category, specs)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BandLists, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(BandListsVisitor)
    }

    struct BandListsVisitor;

    impl<'de> Visitor<'de> for BandListsVisitor {
        type Value = BandLists;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of category code to band list")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut lists = Vec::with_capacity(access.size_hint().unwrap_or(3));
            while let Some(entry) = access.next_entry::<Category, Vec<BandSpec>>()? {
                lists.push(entry);
            }
            Ok(lists)
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
