#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Turns worker records into globe markers.
//!
//! A worker becomes a [`GlobePoint`] only when its fallback-resolved
//! postcode maps to a known region and a state is present. The point sits
//! at the region centre plus the deterministic jitter for the worker's
//! position in the input sequence, and is colored by country.

pub mod palette;

use serde::Serialize;
use worker_dashboard_geography::{PostcodeResolver, jitter};
use worker_dashboard_worker::ResolvedFields;
use worker_dashboard_worker_models::WorkerRecord;

pub use palette::{CountryPalette, DEFAULT_COUNTRY_COLOR};

/// Marker radius used for every individual worker.
pub const POINT_SIZE: f64 = 0.3;

/// Placeholder for missing text fields.
pub const UNKNOWN: &str = "Unknown";

/// A plottable worker marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobePoint {
    pub lat: f64,
    pub lng: f64,
    pub size: f64,
    pub color: String,
    pub name: String,
    pub phone: String,
    pub country: String,
    pub state: String,
    pub postcode: String,
    /// Place name of the resolved region.
    pub city: String,
    pub industry: String,
}

/// Projects workers using a postcode resolver and a country palette.
#[derive(Debug, Clone, Copy)]
pub struct GlobeProjector<'a> {
    resolver: PostcodeResolver<'a>,
    palette: &'a CountryPalette,
}

impl Default for GlobeProjector<'static> {
    fn default() -> Self {
        Self::new(PostcodeResolver::default(), CountryPalette::pacific())
    }
}

impl<'a> GlobeProjector<'a> {
    #[must_use]
    pub const fn new(resolver: PostcodeResolver<'a>, palette: &'a CountryPalette) -> Self {
        Self { resolver, palette }
    }

    /// Projects one worker at sequence position `index`.
    ///
    /// Returns `None` when the postcode does not resolve or no state is
    /// found in any fallback source.
    #[must_use]
    pub fn project(&self, worker: &WorkerRecord, index: usize) -> Option<GlobePoint> {
        let fields = ResolvedFields::of(worker);

        let Some(region) = self.resolver.resolve(fields.postcode.as_deref()) else {
            log::debug!(
                "Omitting worker {}: postcode {:?} does not resolve",
                worker.phone_number,
                fields.postcode
            );
            return None;
        };

        let Some(state) = fields.state else {
            log::debug!("Omitting worker {}: no state", worker.phone_number);
            return None;
        };

        let position = jitter(region, index);

        Some(GlobePoint {
            lat: position.latitude,
            lng: position.longitude,
            size: POINT_SIZE,
            color: self.palette.color_for(worker.country.as_deref()).to_string(),
            name: text_or_unknown(worker.name.as_deref()),
            phone: worker.phone_number.clone(),
            country: text_or_unknown(worker.country.as_deref()),
            state,
            postcode: fields.postcode.unwrap_or_else(|| UNKNOWN.to_string()),
            city: position.place_name,
            industry: fields.industry.unwrap_or_else(|| UNKNOWN.to_string()),
        })
    }

    /// Projects an ordered sequence in a single pass. Each worker's index
    /// is its position in `workers`, so omitted workers still use up an
    /// index.
    #[must_use]
    pub fn project_all(&self, workers: &[WorkerRecord]) -> Vec<GlobePoint> {
        workers
            .iter()
            .enumerate()
            .filter_map(|(index, worker)| self.project(worker, index))
            .collect()
    }
}

fn text_or_unknown(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}
