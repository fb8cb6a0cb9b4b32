//! Deterministic anti-overlap offsets for map markers.
//!
//! The offset for a marker depends only on its index, so the same
//! `(coordinate, index)` pair always lands in the same place. Callers must
//! derive the index from a stable ordering of their result set; if the
//! ordering changes between fetches, markers will move.

use worker_dashboard_geography_models::RegionCoordinate;

/// Maximum offset applied to either axis, in degrees (roughly 5 km).
pub const JITTER_MAGNITUDE: f64 = 0.05;

/// Angular step per index for the latitude offset.
pub const LATITUDE_STEP: f64 = 1.618;

/// Angular step per index for the longitude offset.
pub const LONGITUDE_STEP: f64 = 2.618;

/// Returns the `(latitude, longitude)` offset for `index`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn offset(index: usize) -> (f64, f64) {
    let i = index as f64;
    (
        (i * LATITUDE_STEP).sin() * JITTER_MAGNITUDE,
        (i * LONGITUDE_STEP).cos() * JITTER_MAGNITUDE,
    )
}

/// Offsets `coordinate` by the deterministic jitter for `index`.
///
/// The place name is carried through unchanged.
#[must_use]
pub fn jitter(coordinate: &RegionCoordinate, index: usize) -> RegionCoordinate {
    let (lat_offset, lng_offset) = offset(index);
    RegionCoordinate {
        latitude: coordinate.latitude + lat_offset,
        longitude: coordinate.longitude + lng_offset,
        place_name: coordinate.place_name.clone(),
    }
}
