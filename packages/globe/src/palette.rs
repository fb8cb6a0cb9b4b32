//! Country to marker color lookup.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Marker color for countries the palette does not list.
pub const DEFAULT_COUNTRY_COLOR: &str = "#6b7280";

const PACIFIC_COLORS: &[(&str, &str)] = &[
    ("Fiji", "#10b981"),
    ("Samoa", "#3b82f6"),
    ("Tonga", "#f59e0b"),
    ("Vanuatu", "#8b5cf6"),
    ("Papua New Guinea", "#ef4444"),
    ("Solomon Islands", "#14b8a6"),
    ("Kiribati", "#f97316"),
    ("Tuvalu", "#06b6d4"),
    ("Timor-Leste", "#ec4899"),
    ("Nauru", "#a855f7"),
];

static PACIFIC: LazyLock<CountryPalette> =
    LazyLock::new(|| CountryPalette::new(PACIFIC_COLORS.iter().copied(), DEFAULT_COUNTRY_COLOR));

/// Maps country names to hex colors, with a fallback for everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryPalette {
    colors: BTreeMap<String, String>,
    default: String,
}

impl CountryPalette {
    /// Builds a palette from `(country, hex)` pairs.
    #[must_use]
    pub fn new<I, K, V>(colors: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            colors: colors
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            default: default.into(),
        }
    }

    /// Colors for the Pacific labour-scheme countries.
    #[must_use]
    pub fn pacific() -> &'static Self {
        &PACIFIC
    }

    /// Color for `country`. Unknown or missing countries get the default.
    /// Matching is exact.
    #[must_use]
    pub fn color_for(&self, country: Option<&str>) -> &str {
        country
            .and_then(|c| self.colors.get(c))
            .map_or(self.default.as_str(), String::as_str)
    }
}
