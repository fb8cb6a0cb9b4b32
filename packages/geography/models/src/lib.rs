#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region coordinate and postal prefix table types.
//!
//! A [`PostcodeTable`] maps two-digit postcode prefixes to approximate
//! region centres. The table is immutable once built; the shared
//! Australian table is constructed on first use and lives for the rest of
//! the process.

pub mod postcodes;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::postcodes::AUSTRALIAN_REGIONS;

/// An approximate geographic position with a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCoordinate {
    /// Latitude in degrees (WGS84).
    pub latitude: f64,
    /// Longitude in degrees (WGS84).
    pub longitude: f64,
    /// Region or city name (e.g. "Canberra").
    pub place_name: String,
}

impl RegionCoordinate {
    /// Creates a coordinate.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, place_name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            place_name: place_name.into(),
        }
    }

    /// Whether latitude is within [-90, 90] and longitude within
    /// [-180, 180].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Error returned when building a [`PostcodeTable`] from invalid entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRegionError {
    /// The prefix is not exactly two ASCII digits.
    Prefix {
        /// The offending prefix.
        prefix: String,
    },
    /// The coordinate is outside the valid latitude/longitude range.
    OutOfRange {
        /// Prefix of the offending entry.
        prefix: String,
    },
}

impl std::fmt::Display for InvalidRegionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prefix { prefix } => {
                write!(f, "invalid postcode prefix {prefix:?}: expected two ASCII digits")
            }
            Self::OutOfRange { prefix } => {
                write!(f, "coordinate for prefix {prefix:?} is out of range")
            }
        }
    }
}

impl std::error::Error for InvalidRegionError {}

/// Fixed mapping from two-digit postcode prefixes to region coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostcodeTable {
    regions: BTreeMap<String, RegionCoordinate>,
}

static AUSTRALIA: LazyLock<PostcodeTable> = LazyLock::new(|| PostcodeTable {
    regions: AUSTRALIAN_REGIONS
        .iter()
        .map(|r| {
            (
                r.prefix.to_string(),
                RegionCoordinate::new(r.latitude, r.longitude, r.place_name),
            )
        })
        .collect(),
});

impl PostcodeTable {
    /// The shared Australian prefix table.
    #[must_use]
    pub fn australia() -> &'static Self {
        &AUSTRALIA
    }

    /// Builds a table from `(prefix, coordinate)` entries.
    ///
    /// Later entries with a duplicate prefix replace earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRegionError`] if a prefix is not exactly two ASCII
    /// digits or a coordinate is out of range.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, InvalidRegionError>
    where
        I: IntoIterator<Item = (S, RegionCoordinate)>,
        S: Into<String>,
    {
        let mut regions = BTreeMap::new();
        for (prefix, coordinate) in entries {
            let prefix = prefix.into();
            if prefix.len() != 2 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
                return Err(InvalidRegionError::Prefix { prefix });
            }
            if !coordinate.is_valid() {
                return Err(InvalidRegionError::OutOfRange { prefix });
            }
            regions.insert(prefix, coordinate);
        }
        Ok(Self { regions })
    }

    /// Looks up the region for an exact two-character prefix.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&RegionCoordinate> {
        self.regions.get(prefix)
    }

    /// Number of prefixes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterates over `(prefix, coordinate)` pairs in prefix order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegionCoordinate)> {
        self.regions.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn australia_has_every_static_region() {
        let table = PostcodeTable::australia();
        assert_eq!(table.len(), AUSTRALIAN_REGIONS.len());
        for (prefix, coordinate) in table.iter() {
            assert_eq!(prefix.len(), 2);
            assert!(coordinate.is_valid(), "{prefix}");
        }
    }

    #[test]
    fn canberra_prefix() {
        let canberra = PostcodeTable::australia().get("26").unwrap();
        assert_eq!(canberra.place_name, "Canberra");
        assert!((canberra.latitude - -35.2809).abs() < 1e-9);
        assert!((canberra.longitude - 149.13).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_prefix() {
        let err = PostcodeTable::from_entries([("2", RegionCoordinate::new(0.0, 0.0, "X"))])
            .unwrap_err();
        assert_eq!(
            err,
            InvalidRegionError::Prefix {
                prefix: "2".to_string()
            }
        );

        let err = PostcodeTable::from_entries([("2a", RegionCoordinate::new(0.0, 0.0, "X"))])
            .unwrap_err();
        assert!(matches!(err, InvalidRegionError::Prefix { .. }));
    }

    #[test]
    fn rejects_out_of_range_coordinate() {
        let err = PostcodeTable::from_entries([("10", RegionCoordinate::new(91.0, 0.0, "X"))])
            .unwrap_err();
        assert_eq!(
            err,
            InvalidRegionError::OutOfRange {
                prefix: "10".to_string()
            }
        );
    }

    #[test]
    fn custom_table() {
        let table =
            PostcodeTable::from_entries([("99", RegionCoordinate::new(1.0, 2.0, "Testville"))])
                .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("99").unwrap().place_name, "Testville");
        assert!(table.get("26").is_none());
    }
}
