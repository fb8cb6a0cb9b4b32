//! Coarse postcode to coordinate resolution.

use worker_dashboard_geography_models::{PostcodeTable, RegionCoordinate};

/// Number of leading characters kept after whitespace is stripped.
const MAX_POSTCODE_CHARS: usize = 4;

/// Number of leading characters used as the table key.
const PREFIX_CHARS: usize = 2;

/// Resolves postcodes against a [`PostcodeTable`].
#[derive(Debug, Clone, Copy)]
pub struct PostcodeResolver<'a> {
    table: &'a PostcodeTable,
}

impl Default for PostcodeResolver<'static> {
    fn default() -> Self {
        Self::new(PostcodeTable::australia())
    }
}

impl<'a> PostcodeResolver<'a> {
    /// Creates a resolver over `table`.
    #[must_use]
    pub const fn new(table: &'a PostcodeTable) -> Self {
        Self { table }
    }

    /// Resolves a raw postcode to its region coordinate.
    ///
    /// Whitespace is removed, the result is truncated to four characters
    /// and the first two are looked up. Returns `None` for missing or
    /// empty input, for input shorter than two characters after cleaning,
    /// and for prefixes the table does not know.
    #[must_use]
    pub fn resolve(&self, postcode: Option<&str>) -> Option<&'a RegionCoordinate> {
        let prefix = postcode_prefix(postcode?)?;
        self.table.get(&prefix)
    }
}

/// Extracts the two-character lookup prefix from a raw postcode.
fn postcode_prefix(postcode: &str) -> Option<String> {
    let cleaned: Vec<char> = postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(MAX_POSTCODE_CHARS)
        .collect();

    if cleaned.len() < PREFIX_CHARS {
        return None;
    }

    Some(cleaned[..PREFIX_CHARS].iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PostcodeResolver<'static> {
        PostcodeResolver::default()
    }

    #[test]
    fn resolves_canberra() {
        let coords = resolver().resolve(Some("2607")).unwrap();
        assert_eq!(coords.place_name, "Canberra");
        assert!((coords.latitude - -35.2809).abs() < 1e-9);
        assert!((coords.longitude - 149.13).abs() < 1e-9);
    }

    #[test]
    fn postcodes_in_same_prefix_collapse() {
        let a = resolver().resolve(Some("3000")).unwrap();
        let b = resolver().resolve(Some("3199")).unwrap();
        assert_eq!(a.latitude, b.latitude);
        assert_eq!(a.longitude, b.longitude);
    }

    #[test]
    fn strips_whitespace() {
        let coords = resolver().resolve(Some(" 2 6 0 7 ")).unwrap();
        assert_eq!(coords.place_name, "Canberra");
    }

    #[test]
    fn leading_zero_territory_prefix() {
        assert_eq!(resolver().resolve(Some("0800")).unwrap().place_name, "Darwin");
        assert_eq!(resolver().resolve(Some("0870")).unwrap().place_name, "Darwin");
        assert_eq!(
            resolver().resolve(Some("0900")).unwrap().place_name,
            "Alice Springs"
        );
    }

    #[test]
    fn two_characters_are_enough() {
        assert_eq!(resolver().resolve(Some("26")).unwrap().place_name, "Canberra");
    }

    #[test]
    fn unresolved_inputs() {
        let r = resolver();
        assert!(r.resolve(None).is_none());
        assert!(r.resolve(Some("")).is_none());
        assert!(r.resolve(Some("   ")).is_none());
        assert!(r.resolve(Some("2")).is_none());
        assert!(r.resolve(Some(" 2 ")).is_none());
        assert!(r.resolve(Some("8000")).is_none());
        assert!(r.resolve(Some("AB12")).is_none());
        assert!(r.resolve(Some("00")).is_none());
    }

    #[test]
    fn resolution_is_pure() {
        let r = resolver();
        for postcode in ["2607", "0800", "9999", "", "x"] {
            assert_eq!(r.resolve(Some(postcode)), r.resolve(Some(postcode)));
        }
    }

    #[test]
    fn uses_injected_table() {
        let table = PostcodeTable::from_entries([(
            "99",
            RegionCoordinate::new(-10.0, 120.0, "Testville"),
        )])
        .unwrap();
        let r = PostcodeResolver::new(&table);
        assert_eq!(r.resolve(Some("9912")).unwrap().place_name, "Testville");
        assert!(r.resolve(Some("2607")).is_none());
    }
}
