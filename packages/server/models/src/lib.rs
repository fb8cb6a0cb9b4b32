#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the worker dashboard server.
//!
//! Query parameters arrive as loose strings and are interpreted here the
//! way the dashboard frontend expects: an empty parameter counts as absent.
//! Response types keep the snake_case field names the frontend reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use worker_dashboard_avatar::AvatarIdentity;
use worker_dashboard_gateway_models::{DistressAlert, WorkerGrouping};
use worker_dashboard_worker::{ResolvedFields, status::worker_status};
use worker_dashboard_worker_models::{ConversationMessage, WorkerRecord, WorkerStatus};

/// Placeholder for missing identity and location fields.
pub const UNKNOWN: &str = "Unknown";

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    pub healthy: bool,
    pub version: String,
}

/// Error body returned with 4xx and 5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Query parameters for `GET /api/dashboard/workers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkersQueryParams {
    /// `country`, `state` or `industry`.
    pub group_by: Option<String>,
}

impl WorkersQueryParams {
    /// The requested grouping, `country` when absent.
    ///
    /// # Errors
    ///
    /// Returns the rejected value if it names no known grouping.
    pub fn grouping(&self) -> Result<WorkerGrouping, String> {
        non_empty(self.group_by.as_ref()).map_or(Ok(WorkerGrouping::default()), |raw| {
            raw.parse().map_err(|_| raw.to_string())
        })
    }
}

/// Query parameters for `GET /api/dashboard/employers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerQueryParams {
    /// Column to sort by.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub order: Option<String>,
    pub min_rating: Option<String>,
    pub max_rating: Option<String>,
    pub state: Option<String>,
    pub industry: Option<String>,
}

impl EmployerQueryParams {
    #[must_use]
    pub fn sort_by(&self) -> Option<&str> {
        non_empty(self.sort_by.as_ref())
    }

    #[must_use]
    pub fn order(&self) -> Option<&str> {
        non_empty(self.order.as_ref())
    }

    /// Lower rating bound. Unparsable values are ignored.
    #[must_use]
    pub fn min_rating(&self) -> Option<f64> {
        parse_bound(self.min_rating.as_ref())
    }

    /// Upper rating bound. Unparsable values are ignored.
    #[must_use]
    pub fn max_rating(&self) -> Option<f64> {
        parse_bound(self.max_rating.as_ref())
    }

    #[must_use]
    pub fn state(&self) -> Option<&str> {
        non_empty(self.state.as_ref())
    }

    #[must_use]
    pub fn industry(&self) -> Option<&str> {
        non_empty(self.industry.as_ref())
    }
}

fn parse_bound(raw: Option<&String>) -> Option<f64> {
    non_empty(raw)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Query parameters for `GET /api/dashboard/map-data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapQueryParams {
    pub state: Option<String>,
    pub industry: Option<String>,
}

impl MapQueryParams {
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        non_empty(self.state.as_ref())
    }

    #[must_use]
    pub fn industry(&self) -> Option<&str> {
        non_empty(self.industry.as_ref())
    }
}

/// Query parameters for `GET /api/dashboard/alerts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertQueryParams {
    pub resolved: Option<String>,
}

impl AlertQueryParams {
    /// `Some(true)` for `resolved=true`, `Some(false)` for any other value,
    /// `None` when the parameter is absent.
    #[must_use]
    pub fn resolved(&self) -> Option<bool> {
        self.resolved.as_deref().map(|v| v == "true")
    }
}

/// Body of `PATCH /api/dashboard/alerts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertUpdateRequest {
    #[serde(default)]
    pub alert_id: Option<Value>,
    #[serde(default)]
    pub resolved: Option<bool>,
}

impl AlertUpdateRequest {
    /// The alert ID, unless it is missing or falsy (`null`, `0`, `""`,
    /// `false`).
    #[must_use]
    pub fn alert_id(&self) -> Option<&Value> {
        self.alert_id.as_ref().filter(|id| match id {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        })
    }
}

/// Response of `PATCH /api/dashboard/alerts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertUpdateResponse {
    pub success: bool,
    /// Updated rows as stored.
    pub data: Vec<Value>,
}

/// Which activity feed `GET /api/dashboard/activity` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityView {
    Trends,
    Recent,
}

/// Query parameters for `GET /api/dashboard/activity`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityQueryParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ActivityQueryParams {
    /// `trends` when absent or `trends`, otherwise the recent feed.
    #[must_use]
    pub fn view(&self) -> ActivityView {
        match non_empty(self.kind.as_ref()) {
            None | Some("trends") => ActivityView::Trends,
            Some(_) => ActivityView::Recent,
        }
    }
}

/// Query parameters for `GET /api/dashboard/worker-profile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerProfileParams {
    pub phone: Option<String>,
}

impl WorkerProfileParams {
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        non_empty(self.phone.as_ref())
    }
}

/// A registered worker with a known location, as listed for the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiWorkerMapEntry {
    pub phone: String,
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub industry: Option<String>,
    pub employer: Option<String>,
    pub visa_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub registration_complete: bool,
}

impl ApiWorkerMapEntry {
    /// Builds the entry from a worker and its fallback-resolved fields.
    #[must_use]
    pub fn new(worker: &WorkerRecord, fields: ResolvedFields) -> Self {
        Self {
            phone: worker.phone_number.clone(),
            name: or_unknown(worker.name.clone()),
            country: or_unknown(worker.country.clone()),
            state: fields.state,
            postcode: fields.postcode,
            industry: fields.industry,
            employer: fields.employer,
            visa_type: fields.visa_type,
            created_at: worker.created_at,
            updated_at: worker.updated_at,
            registration_complete: worker.registration_complete,
        }
    }
}

/// Public profile of one registered worker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiWorkerProfile {
    pub phone_number: String,
    pub name: String,
    pub country: String,
    pub state: String,
    pub postcode: String,
    /// Place name of the worker's postcode region.
    pub city: String,
    pub industry: Option<String>,
    pub employer: Option<String>,
    pub visa_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub registration_complete: bool,
    pub avatar: AvatarIdentity,
}

impl ApiWorkerProfile {
    #[must_use]
    pub fn new(
        worker: &WorkerRecord,
        fields: ResolvedFields,
        city: Option<&str>,
        avatar: AvatarIdentity,
    ) -> Self {
        Self {
            phone_number: worker.phone_number.clone(),
            name: or_unknown(worker.name.clone()),
            country: or_unknown(worker.country.clone()),
            state: or_unknown(fields.state),
            postcode: or_unknown(fields.postcode),
            city: or_unknown(city.map(ToString::to_string)),
            industry: fields.industry,
            employer: fields.employer,
            visa_type: fields.visa_type,
            created_at: worker.created_at,
            registration_complete: worker.registration_complete,
            avatar,
        }
    }
}

/// Everything the detail view shows for one worker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiWorkerDetail {
    pub phone_number: String,
    pub name: Option<String>,
    pub country: Option<String>,
    pub registration_complete: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Survey answers, or an empty object.
    pub survey_data: Value,
    /// Alerts for this worker, newest first.
    pub distress_alerts: Vec<DistressAlert>,
    /// Latest messages, newest first.
    pub recent_messages: Vec<ConversationMessage>,
    pub message_count: u64,
    pub last_active: Option<DateTime<Utc>>,
    pub status: WorkerStatus,
    pub avatar: AvatarIdentity,
}

impl ApiWorkerDetail {
    /// Assembles the detail view. The status is classified from the
    /// unresolved alerts and the worker's reported employer rating.
    #[must_use]
    pub fn new(
        worker: WorkerRecord,
        distress_alerts: Vec<DistressAlert>,
        recent_messages: Vec<ConversationMessage>,
        message_count: u64,
        avatar: AvatarIdentity,
    ) -> Self {
        let status = worker_status(&worker, &distress_alerts);

        Self {
            phone_number: worker.phone_number,
            name: worker.name,
            country: worker.country,
            registration_complete: worker.registration_complete,
            created_at: worker.created_at,
            last_active: worker.updated_at,
            updated_at: worker.updated_at,
            survey_data: worker
                .survey_data
                .unwrap_or_else(|| Value::Object(Map::new())),
            distress_alerts,
            recent_messages,
            message_count,
            status,
            avatar,
        }
    }
}
