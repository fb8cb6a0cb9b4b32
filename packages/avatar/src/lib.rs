#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Initials and stable palette colors for worker avatars.
//!
//! The color for a name is picked by a 32-bit string hash over its UTF-16
//! code units (`hash = unit + (hash << 5) - hash`, wrapping), so the same
//! name maps to the same palette entry in every client that implements the
//! same recurrence.

use serde::Serialize;

/// Initials shown when a name has no usable letters.
pub const UNKNOWN_INITIALS: &str = "?";

/// A named display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PaletteColor {
    /// Palette name (e.g. `"blue-600"`).
    pub name: &'static str,
    /// Hex value (e.g. `"#2563eb"`).
    pub hex: &'static str,
}

impl PaletteColor {
    /// Creates a color.
    #[must_use]
    pub const fn new(name: &'static str, hex: &'static str) -> Self {
        Self { name, hex }
    }
}

/// Default avatar palette, in hash-index order.
pub const STANDARD_COLORS: &[PaletteColor] = &[
    PaletteColor::new("blue-600", "#2563eb"),
    PaletteColor::new("purple-600", "#9333ea"),
    PaletteColor::new("green-600", "#16a34a"),
    PaletteColor::new("orange-600", "#ea580c"),
    PaletteColor::new("pink-600", "#db2777"),
    PaletteColor::new("indigo-600", "#4f46e5"),
    PaletteColor::new("teal-600", "#0d9488"),
    PaletteColor::new("cyan-600", "#0891b2"),
    PaletteColor::new("emerald-600", "#059669"),
    PaletteColor::new("violet-600", "#7c3aed"),
    PaletteColor::new("fuchsia-600", "#c026d3"),
    PaletteColor::new("rose-600", "#e11d48"),
];

/// Color used when there is no name to hash.
pub const FALLBACK_COLOR: PaletteColor = PaletteColor::new("gray-500", "#6b7280");

/// An ordered set of avatar colors plus a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarPalette {
    colors: &'static [PaletteColor],
    fallback: PaletteColor,
}

static STANDARD: AvatarPalette = AvatarPalette::new(STANDARD_COLORS, FALLBACK_COLOR);

impl AvatarPalette {
    /// Creates a palette. An empty `colors` list always yields `fallback`.
    #[must_use]
    pub const fn new(colors: &'static [PaletteColor], fallback: PaletteColor) -> Self {
        Self { colors, fallback }
    }

    /// The shared twelve-color palette.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Colors in index order.
    #[must_use]
    pub const fn colors(&self) -> &'static [PaletteColor] {
        self.colors
    }

    /// Stable color for `name`. Missing or empty names get the fallback.
    #[must_use]
    pub fn color_for(&self, name: Option<&str>) -> PaletteColor {
        match name {
            Some(name) if !name.is_empty() && !self.colors.is_empty() => {
                let index = name_hash(name).unsigned_abs() as usize % self.colors.len();
                self.colors[index]
            }
            _ => self.fallback,
        }
    }
}

/// 32-bit signed string hash over UTF-16 code units.
#[must_use]
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16().fold(0_i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}

/// One or two uppercase initials for `name`.
///
/// Everything except ASCII letters and whitespace is dropped before the
/// name is split into words, so `"O'Brien"` reads as `"OBrien"` and a
/// hyphenated surname stays one word. One word gives its first letter;
/// several give the first letters of the first and last words. A name
/// with no letters left gives [`UNKNOWN_INITIALS`].
#[must_use]
pub fn initials(name: Option<&str>) -> String {
    let cleaned: String = name
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();

    let words: Vec<&str> = cleaned.split_whitespace().collect();

    let first_letter = |word: &str| word.chars().next().map(|c| c.to_ascii_uppercase());

    match words.as_slice() {
        [] => UNKNOWN_INITIALS.to_string(),
        [only] => first_letter(only).into_iter().collect(),
        [first, .., last] => first_letter(first)
            .into_iter()
            .chain(first_letter(last))
            .collect(),
    }
}

/// Initials and color for one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarIdentity {
    /// One or two uppercase letters, or `"?"`.
    pub initials: String,
    /// Background color.
    pub color: PaletteColor,
}

impl AvatarIdentity {
    /// Derives the avatar for `name` using `palette`.
    #[must_use]
    pub fn derive(name: Option<&str>, palette: &AvatarPalette) -> Self {
        Self {
            initials: initials(name),
            color: palette.color_for(name),
        }
    }
}
